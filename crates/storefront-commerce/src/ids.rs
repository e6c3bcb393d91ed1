//! Newtype IDs for type-safe identifiers.
//!
//! The backend hands out every identifier as an opaque string. Wrapping them
//! keeps a zone id from being passed where a payment method id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Catalog product identifier; doubles as the cart line key.
    ProductId
);
define_id!(
    /// Order identifier assigned by the backend.
    OrderId
);
define_id!(
    /// Delivery zone identifier.
    ZoneId
);
define_id!(
    /// Payment method identifier.
    PaymentMethodId
);
define_id!(
    /// Authenticated customer identifier.
    CustomerId
);
define_id!(
    /// Company branch identifier.
    BranchId
);
