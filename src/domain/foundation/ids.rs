//! Strongly-typed identifier value objects.
//!
//! Every aggregate in the billing store is keyed by a `BIGSERIAL` column, so
//! identifiers wrap `i64` rather than UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! bigint_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database key.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw database key.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

bigint_id!(
    /// Identifier of a registered user account.
    UserId
);

bigint_id!(
    /// Internal identifier of a purchase attempt in the order ledger.
    OrderId
);

bigint_id!(
    /// Identifier of a subscription plan in the catalog.
    PlanId
);

bigint_id!(
    /// Identifier of a referrer/referee pair.
    ReferralId
);

bigint_id!(
    /// Identifier of an in-app notification.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_as_plain_integers() {
        assert_eq!(UserId::new(42).to_string(), "42");
        assert_eq!(OrderId::new(7).to_string(), "7");
    }

    #[test]
    fn ids_parse_from_strings() {
        let id: UserId = "  1001 ".parse().unwrap();
        assert_eq!(id.as_i64(), 1001);
        assert!("abc".parse::<PlanId>().is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&ReferralId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: ReferralId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReferralId::new(9));
    }
}
