//! Checkout form validation.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::find_enabled;
use crate::checkout::{CheckoutForm, CheckoutSettings, Scheduling};

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Document,
    Name,
    Phone,
    MessagingHandle,
    Address,
    Zone,
    PaymentMethod,
    ScheduledDate,
    ScheduledTime,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Document => "document",
            FormField::Name => "name",
            FormField::Phone => "phone",
            FormField::MessagingHandle => "messagingHandle",
            FormField::Address => "address",
            FormField::Zone => "zone",
            FormField::PaymentMethod => "paymentMethod",
            FormField::ScheduledDate => "scheduledDate",
            FormField::ScheduledTime => "scheduledTime",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline, field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// All validation failures of a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a field failed.
    pub fn has(&self, field: FormField) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Message for a field, if it failed.
    pub fn message_for(&self, field: FormField) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field.as_str()).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Validate a checkout draft against branch settings on `today`.
///
/// Returns every failing field rather than stopping at the first one.
pub fn validate(
    form: &CheckoutForm,
    settings: &CheckoutSettings,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let customer = &form.customer;

    for (field, value, message) in [
        (FormField::Document, &customer.document, "Document is required"),
        (FormField::Name, &customer.name, "Name is required"),
        (FormField::Phone, &customer.phone, "Phone is required"),
        (
            FormField::MessagingHandle,
            &customer.messaging_handle,
            "Messaging contact is required",
        ),
    ] {
        if value.trim().is_empty() {
            errors.push(field, message);
        }
    }

    let delivery = &form.delivery;
    if delivery.is_delivery() {
        if delivery.address.trim().is_empty() {
            errors.push(FormField::Address, "Delivery address is required");
        }
        match &delivery.zone_id {
            None => errors.push(FormField::Zone, "Select a delivery zone"),
            Some(id) if !settings.zones.is_empty() => {
                if !settings.active_zones().any(|z| &z.id == id) {
                    errors.push(FormField::Zone, "Selected zone does not deliver");
                }
            }
            Some(_) => {}
        }
    }

    let payment_ok = form
        .payment_method
        .as_ref()
        .is_some_and(|id| find_enabled(&settings.payment_methods, id).is_some());
    if !payment_ok {
        errors.push(FormField::PaymentMethod, "Select a payment method");
    }

    if let Scheduling::Scheduled { date, time } = delivery.scheduling {
        match date {
            None => errors.push(FormField::ScheduledDate, "Choose a date"),
            Some(d) if d < today => {
                errors.push(FormField::ScheduledDate, "Date cannot be in the past")
            }
            Some(_) => {}
        }
        if time.is_none() {
            errors.push(FormField::ScheduledTime, "Choose a time");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
