//! Strongly-typed ID wrappers
//!
//! Using newtype wrappers prevents accidentally mixing up identifiers with
//! other strings at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for identifiers derived from foreign record ids on import
const EXTERNAL_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_2a8e_9b3d_4e57_a0c4_58d1_f7e2_9b10);

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Prefix used by the short display form
            pub const PREFIX: &'static str = $display_prefix;

            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Derive a stable ID from an identifier issued by another system
            ///
            /// UUID strings are used as-is; anything else maps to the same
            /// UUID v5 every time it is seen.
            pub fn from_external(id: &str) -> Self {
                let id = id.trim();
                match Uuid::parse_str(id) {
                    Ok(uuid) => Self(uuid),
                    Err(_) => Self(Uuid::new_v5(&EXTERNAL_ID_NAMESPACE, id.as_bytes())),
                }
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Full hyphenated UUID string
            pub fn full(&self) -> String {
                self.0.to_string()
            }

            /// Check whether a user-supplied fragment identifies this ID
            ///
            /// Accepts the full UUID, the short display form or any prefix of
            /// the UUID, with or without the display prefix.
            pub fn matches_prefix(&self, fragment: &str) -> bool {
                let fragment = fragment.trim();
                let fragment = fragment.strip_prefix($display_prefix).unwrap_or(fragment);
                !fragment.is_empty() && self.0.to_string().starts_with(&fragment.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(TransactionId, "txn-");
