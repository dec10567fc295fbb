//! Shared constants.

use rust_decimal::Decimal;

/// Store key holding the serialized holdings collection.
pub const HOLDINGS_STORE_KEY: &str = "fundlens_holdings";

/// Store key holding the serialized groups collection.
pub const GROUPS_STORE_KEY: &str = "fundlens_groups";

/// Store key holding the market configuration.
pub const MARKET_CONFIG_STORE_KEY: &str = "fundlens_market_config";

/// Version stamp written into backup exports.
pub const BACKUP_VERSION: &str = "2";

/// Sentinel unit value used when an instrument has never produced a
/// positive valuation; keeps displays away from a false "total loss".
pub const FALLBACK_UNIT_VALUE: Decimal = Decimal::ONE;

/// Name given to the group created on first launch.
pub const DEFAULT_GROUP_NAME: &str = "自选";

/// Allocation bucket for holdings without any tag.
pub const UNTAGGED_BUCKET: &str = "other";
