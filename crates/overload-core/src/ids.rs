//! Dispatcher identifiers.
//!
//! # ULID ベースの ID
//! 各 Dispatcher は生成時に ULID を割り当てられ、ログのフィールドとして使われます。
//! - **時刻でソート可能**: 生成順序で並ぶ
//! - **調整不要**: どのスレッドからでも生成できる

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Identifier of a Dispatcher, displayed as `dispatcher-<ulid>`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DispatcherId(Ulid);

impl DispatcherId {
    const PREFIX: &'static str = "dispatcher-";

    /// A fresh id stamped with the current time.
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// A fresh id stamped with `now`. The random part still differs per call.
    /// Times before the Unix epoch are stamped as 0.
    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let timestamp_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        Self(Ulid::from_parts(timestamp_ms, rand::random()))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for DispatcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn generated_ids_are_unique() {
        let id1 = DispatcherId::generate();
        let id2 = DispatcherId::generate();
        assert_ne!(id1, id2);
        assert!(id1.to_string().starts_with("dispatcher-"));
    }

    #[test]
    fn fixed_time_gives_same_timestamp_part() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id1 = DispatcherId::generate_at(fixed_time);
        let id2 = DispatcherId::generate_at(fixed_time);

        // ランダム部分があるので ID は異なる
        assert_ne!(id1, id2);
        assert_eq!(id1.as_ulid().timestamp_ms(), id2.as_ulid().timestamp_ms());
        assert_eq!(id1.as_ulid().timestamp_ms(), fixed_time.timestamp_millis() as u64);
    }

    #[test]
    fn times_before_the_epoch_clamp_to_zero() {
        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        let id = DispatcherId::generate_at(before_epoch);
        assert_eq!(id.as_ulid().timestamp_ms(), 0);
    }

    #[test]
    fn ids_can_be_serialized() {
        let id = DispatcherId::generate();
        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: DispatcherId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
