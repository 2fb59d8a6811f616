//! Customer domain model.
//!
//! # Responsibility
//! - Define the persisted customer shape and the service-facing input/read
//!   models.
//!
//! # Invariants
//! - `id` is stable and never reused for another customer.
//! - The `phones` collection only appears on read models, resolved through a
//!   lookup-by-owner query; the persisted customer row never embeds phones.

use crate::model::phone::Phone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a customer row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CustomerId = Uuid;

/// Persisted customer attributes.
///
/// Free-text fields carry no format constraints; all phone-related state
/// lives in the `phones` table keyed by owner id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Stable id assigned by the repository on insert.
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub district: String,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Controller-facing input shape consumed by the consistency service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub address: String,
    pub district: String,
    /// Submitted phone numbers, digits only, 10 or 11 characters each.
    pub phones: Vec<String>,
}

/// Read model returned by service operations: one customer with its phone
/// collection materialized in stable attachment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub district: String,
    pub phones: Vec<Phone>,
}

impl CustomerRecord {
    /// Builds a read model from a persisted customer and its resolved phones.
    pub fn from_parts(customer: Customer, phones: Vec<Phone>) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            address: customer.address,
            district: customer.district,
            phones,
        }
    }

    /// Returns the owned numbers in attachment order.
    pub fn numbers(&self) -> Vec<&str> {
        self.phones.iter().map(|phone| phone.number.as_str()).collect()
    }
}
