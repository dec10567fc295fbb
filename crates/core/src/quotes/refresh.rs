//! Batch refresh coordinator.
//!
//! Fans one quote fetch per holding out across the source, waits for
//! every outcome to settle, and reconciles each holding independently.
//! A slow or failing source never blocks or drops the other holdings;
//! the worst outcome for any holding is keeping its prior state.

use std::sync::Arc;

use log::{debug, error};

use crate::holdings::Holding;
use crate::valuation::apply_quote;

use super::QuoteSourceTrait;

/// Coordinates concurrent quote refreshes over a holdings snapshot.
pub struct RefreshService {
    source: Arc<dyn QuoteSourceTrait>,
}

impl RefreshService {
    pub fn new(source: Arc<dyn QuoteSourceTrait>) -> Self {
        Self { source }
    }

    /// Refresh every holding concurrently.
    ///
    /// The output has the same length and the same holding order as the
    /// input. Each holding's outcome is independent: a `None` quote (or
    /// even a panicked fetch task, which the source contract forbids but
    /// this layer still defends against) degrades that one holding to
    /// its prior state.
    pub async fn refresh_all(&self, holdings: &[Holding]) -> Vec<Holding> {
        if holdings.is_empty() {
            return Vec::new();
        }

        debug!("refreshing {} holdings", holdings.len());

        let tasks: Vec<_> = holdings
            .iter()
            .map(|holding| {
                let source = Arc::clone(&self.source);
                let holding = holding.clone();
                tokio::spawn(async move {
                    let quote = source.fetch_quote(&holding.instrument_code).await;
                    apply_quote(&holding, quote.as_ref())
                })
            })
            .collect();

        let outcomes = futures::future::join_all(tasks).await;

        let mut refreshed = Vec::with_capacity(holdings.len());
        for (outcome, prior) in outcomes.into_iter().zip(holdings) {
            match outcome {
                Ok(updated) => refreshed.push(updated),
                Err(e) => {
                    error!(
                        "refresh task for {} aborted ({}); keeping prior state",
                        prior.instrument_code, e
                    );
                    refreshed.push(prior.clone());
                }
            }
        }
        refreshed
    }

    /// Refresh a single holding, awaited. Used right after a holding is
    /// created so the new position shows a live valuation immediately,
    /// with no timing dependency.
    pub async fn refresh_one(&self, holding: &Holding) -> Holding {
        self.refresh_all(std::slice::from_ref(holding))
            .await
            .pop()
            .unwrap_or_else(|| holding.clone())
    }
}
