//! Authenticated customer profile.

use crate::ids::{CustomerId, ZoneId};
use serde::{Deserialize, Serialize};

/// Profile of a signed-in customer, used to pre-fill checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerProfile {
    /// Customer identifier.
    pub id: Option<CustomerId>,
    /// Identity document number (tax id, national id).
    pub document: String,
    /// Full name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Messaging app handle for order updates.
    pub messaging_handle: String,
    /// Email address.
    pub email: Option<String>,
    /// Last used delivery address.
    pub default_address: Option<String>,
    /// Last used delivery zone.
    pub default_zone: Option<ZoneId>,
}
