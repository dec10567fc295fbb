use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::Asia::Shanghai;

/// Phase of the mainland trading day, evaluated in exchange-local time.
///
/// The phase decides how an official estimate is interpreted: outside
/// trading hours the settled reference value is authoritative and the
/// intraday estimate is meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketPhase {
    /// Before the opening call auction.
    PreMarket,
    /// Continuous trading, morning or afternoon session.
    Trading,
    /// Midday break between sessions.
    LunchBreak,
    /// After the close, same trading day.
    PostMarket,
    /// Weekend (and, to the upstreams, holidays look the same: no data).
    Closed,
}

impl MarketPhase {
    /// Phase right now.
    pub fn current() -> Self {
        Self::at(Utc::now())
    }

    /// Phase at an arbitrary instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        let local = instant.with_timezone(&Shanghai);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return Self::Closed;
        }

        let t = local.time();
        let pre_open = NaiveTime::from_hms_opt(9, 25, 0).expect("valid time");
        let lunch_start = NaiveTime::from_hms_opt(11, 30, 0).expect("valid time");
        let lunch_end = NaiveTime::from_hms_opt(13, 0, 0).expect("valid time");
        let close = NaiveTime::from_hms_opt(15, 0, 0).expect("valid time");

        if t < pre_open {
            Self::PreMarket
        } else if t >= lunch_start && t < lunch_end {
            Self::LunchBreak
        } else if t <= close {
            Self::Trading
        } else {
            Self::PostMarket
        }
    }

    /// True when the settled reference value should stand in for the
    /// live estimate.
    pub fn uses_settled_value(&self) -> bool {
        matches!(self, Self::Closed | Self::PreMarket)
    }
}
