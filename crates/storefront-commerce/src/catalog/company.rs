//! Company and branch metadata.

use crate::ids::BranchId;
use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Company/branch information shown in the storefront header and receipts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyInfo {
    /// Trading name.
    pub name: String,
    /// Branch taking the orders, if the company has several.
    pub branch_id: Option<BranchId>,
    /// Branch display name.
    pub branch_name: Option<String>,
    /// Currency prices are quoted in.
    pub currency: Currency,
    /// Contact phone.
    pub phone: Option<String>,
    /// Messaging handle customers can write to.
    pub messaging_handle: Option<String>,
    /// Street address of the branch.
    pub address: Option<String>,
    /// Free-form opening hours (e.g., "Mon-Sat 11:00-23:00").
    pub opening_hours: Option<String>,
}

impl CompanyInfo {
    /// Placeholder used when the backend cannot be reached.
    pub fn placeholder() -> Self {
        Self {
            name: "Our store".to_string(),
            branch_id: None,
            branch_name: None,
            currency: Currency::default(),
            phone: None,
            messaging_handle: None,
            address: None,
            opening_hours: None,
        }
    }

    /// Name with branch, e.g. "Pizzeria Roma - Centro".
    pub fn display_name(&self) -> String {
        match &self.branch_name {
            Some(branch) if !branch.is_empty() => format!("{} - {}", self.name, branch),
            _ => self.name.clone(),
        }
    }
}
