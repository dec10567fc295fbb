//! End-to-end flow over the public API: groups, holdings, transactions,
//! refresh, aggregation, backup.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tokio::sync::RwLock;

use fundlens_core::groups::{GroupService, GroupServiceTrait, NewGroup};
use fundlens_core::holdings::{HoldingsService, HoldingsServiceTrait, NewHolding};
use fundlens_core::ledger::{NewTransaction, TransactionKind};
use fundlens_core::quotes::{QuoteSourceTrait, RefreshService};
use fundlens_core::store::{AppStore, FileStore};
use fundlens_market_data::FundQuote;

/// Source that knows two funds and fails everything else.
struct TwoFundSource;

#[async_trait]
impl QuoteSourceTrait for TwoFundSource {
    async fn fetch_quote(&self, instrument_code: &str) -> Option<FundQuote> {
        match instrument_code {
            "110022" => Some(FundQuote {
                reference_value: Some(dec!(3.14)),
                estimated_value: Some(dec!(3.20)),
                estimated_change_percent: Some(dec!(1.91)),
                display_name: Some("消费行业".to_string()),
                source: Some("OFFICIAL".to_string()),
                ..FundQuote::empty()
            }),
            "161725" => Some(FundQuote {
                reference_value: Some(dec!(1.10)),
                estimated_value: Some(dec!(1.08)),
                estimated_change_percent: Some(dec!(-1.82)),
                ..FundQuote::empty()
            }),
            _ => None,
        }
    }
}

struct Engine {
    holdings: HoldingsService<FileStore>,
    groups: GroupService<FileStore>,
    store: Arc<RwLock<AppStore<FileStore>>>,
    _dir: TempDir,
}

fn engine() -> Engine {
    let dir = TempDir::new().unwrap();
    let file_store = Arc::new(FileStore::open(dir.path()).unwrap());
    let app_store = Arc::new(RwLock::new(AppStore::load(file_store).unwrap()));
    let refresh = Arc::new(RefreshService::new(Arc::new(TwoFundSource)));
    Engine {
        holdings: HoldingsService::new(app_store.clone(), refresh),
        groups: GroupService::new(app_store.clone()),
        store: app_store,
        _dir: dir,
    }
}

fn new_holding(code: &str, name: &str, group_id: &str, shares: Decimal) -> NewHolding {
    NewHolding {
        instrument_code: code.to_string(),
        display_name: name.to_string(),
        manager: None,
        tags: vec![],
        group_id: group_id.to_string(),
        shares,
        average_cost: if shares > Decimal::ZERO {
            dec!(3.00)
        } else {
            Decimal::ZERO
        },
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_engine_flow() {
    let engine = engine();

    // groups: the bootstrapped default plus one user group
    let groups = engine.groups.list_groups().await;
    assert_eq!(groups.len(), 1);
    let default_id = groups[0].id.clone();
    let pension = engine
        .groups
        .create_group(NewGroup {
            name: "养老".to_string(),
        })
        .await
        .unwrap();

    // a position, a watchlist entry, and a fund the source cannot quote
    let consumer = engine
        .holdings
        .create_holding(new_holding("110022", "消费行业", &default_id, dec!(1000)))
        .await
        .unwrap();
    let liquor = engine
        .holdings
        .create_holding(new_holding("161725", "中证白酒", &pension.id, Decimal::ZERO))
        .await
        .unwrap();
    let unknown = engine
        .holdings
        .create_holding(new_holding("999999", "下架基金", &pension.id, dec!(10)))
        .await
        .unwrap();

    // creation already refreshed: quoted funds carry live valuations,
    // the unquotable one keeps its zero state
    assert_eq!(consumer.estimated_value, dec!(3.20));
    assert_eq!(liquor.estimated_value, dec!(1.08));
    assert_eq!(unknown.estimated_value, Decimal::ZERO);

    // ledger: partial sell books realized gain at the entered cost basis
    let consumer = engine
        .holdings
        .record_transaction(
            &consumer.id,
            NewTransaction {
                kind: TransactionKind::Sell,
                date: None,
                shares: dec!(400),
                unit_price: dec!(3.25),
                gross_amount: None,
                fee: dec!(4),
            },
        )
        .await
        .unwrap();
    assert_eq!(consumer.shares, dec!(600));
    // (3.25 - 3.00) * 400 - 4
    assert_eq!(consumer.realized_gain, dec!(96));

    // manual portfolio refresh settles every holding independently
    assert!(engine.holdings.refresh_portfolio().await.unwrap());
    let totals = engine.holdings.totals().await;
    // counted: consumer 600 sh * 3.20 and unknown 10 sh, still unvalued
    assert_eq!(totals.count, 2);
    assert_eq!(totals.market_value, dec!(1920.0));

    let stats = engine.holdings.group_statistics().await;
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].group_id, default_id);

    // backup round trip via the store
    let exported = {
        let store = engine.store.read().await;
        serde_json::to_vec(&store.export_backup()).unwrap()
    };
    {
        let mut store = engine.store.write().await;
        store.import_backup(br#"{"funds": [], "groups": []}"#).unwrap();
        assert!(store.holdings().is_empty());
        store.import_backup(&exported).unwrap();
        assert_eq!(store.holdings().len(), 3);
        assert_eq!(store.groups().len(), 2);
    }

    // cascade delete removes exactly the pension group's holdings
    let removed = engine.groups.delete_group(&pension.id).await.unwrap();
    assert_eq!(removed, 2);
    let remaining = engine.holdings.list_holdings().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].instrument_code, "110022");
}
