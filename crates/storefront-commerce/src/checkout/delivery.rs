//! Delivery zones and the customer's delivery selection.

use crate::ids::ZoneId;
use crate::money::{Currency, Money};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    /// Delivered to an address inside a zone.
    #[default]
    Delivery,
    /// Collected at the branch.
    Pickup,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Delivery => "delivery",
            DeliveryType::Pickup => "pickup",
        }
    }
}

/// Whether the order is for now or a later slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Scheduling {
    /// As soon as possible.
    #[default]
    Now,
    /// A future date and time. Both are required before submission.
    Scheduled {
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
    },
}

impl Scheduling {
    /// Schedule for a specific slot.
    pub fn at(date: NaiveDate, time: NaiveTime) -> Self {
        Scheduling::Scheduled {
            date: Some(date),
            time: Some(time),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, Scheduling::Scheduled { .. })
    }
}

/// A named delivery area with a flat fee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryZone {
    /// Unique identifier.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Flat delivery fee.
    pub fee: Money,
    /// Minimum estimated minutes.
    pub min_minutes: Option<u32>,
    /// Maximum estimated minutes.
    pub max_minutes: Option<u32>,
    /// Whether the zone currently accepts orders.
    pub active: bool,
}

impl DeliveryZone {
    /// Create an active zone with no time estimate.
    pub fn new(id: impl Into<ZoneId>, name: impl Into<String>, fee: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fee,
            min_minutes: None,
            max_minutes: None,
            active: true,
        }
    }

    /// Set the estimated time window.
    pub fn with_window(mut self, min_minutes: u32, max_minutes: u32) -> Self {
        self.min_minutes = Some(min_minutes);
        self.max_minutes = Some(max_minutes);
        self
    }

    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> Option<String> {
        match (self.min_minutes, self.max_minutes) {
            (Some(min), Some(max)) if min == max => Some(format!("{} min", min)),
            (Some(min), Some(max)) => Some(format!("{}-{} min", min, max)),
            (Some(min), None) => Some(format!("{}+ min", min)),
            (None, Some(max)) => Some(format!("Up to {} min", max)),
            (None, None) => None,
        }
    }
}

/// The customer's choice of delivery type, zone, address and time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySelection {
    /// Delivery or pickup.
    #[serde(rename = "type")]
    pub delivery_type: DeliveryType,
    /// Selected zone, required for delivery.
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    /// Street address, required for delivery.
    #[serde(default)]
    pub address: String,
    /// Landmark or apartment details.
    #[serde(default)]
    pub address_reference: Option<String>,
    /// Now or scheduled.
    #[serde(default)]
    pub scheduling: Scheduling,
}

impl DeliverySelection {
    /// Pickup at the branch, as soon as possible.
    pub fn pickup() -> Self {
        Self {
            delivery_type: DeliveryType::Pickup,
            ..Self::default()
        }
    }

    /// Delivery to an address in a zone, as soon as possible.
    pub fn delivery(zone: impl Into<ZoneId>, address: impl Into<String>) -> Self {
        Self {
            delivery_type: DeliveryType::Delivery,
            zone_id: Some(zone.into()),
            address: address.into(),
            ..Self::default()
        }
    }

    pub fn is_delivery(&self) -> bool {
        self.delivery_type == DeliveryType::Delivery
    }

    /// The selected zone, if it is among `zones`.
    pub fn zone<'a>(&self, zones: &'a [DeliveryZone]) -> Option<&'a DeliveryZone> {
        let id = self.zone_id.as_ref()?;
        zones.iter().find(|z| &z.id == id)
    }
}

/// Delivery fee for a selection.
///
/// Pickup is free. For delivery, the fee of the selected zone; an unknown
/// or missing zone contributes nothing.
pub fn delivery_fee_for(
    selection: &DeliverySelection,
    zones: &[DeliveryZone],
    currency: Currency,
) -> Money {
    if !selection.is_delivery() {
        return Money::zero(currency);
    }
    selection
        .zone(zones)
        .map(|z| z.fee)
        .unwrap_or_else(|| Money::zero(currency))
}
