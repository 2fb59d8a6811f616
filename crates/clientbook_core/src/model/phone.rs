//! Phone domain model and number format validation.
//!
//! # Responsibility
//! - Define the persisted phone shape.
//! - Provide the pure format check used on every submitted number.
//!
//! # Invariants
//! - `number` is globally unique across all phone rows; the schema-level
//!   UNIQUE constraint is the authoritative guard.
//! - `owner_id` always references exactly one existing customer.

use crate::model::customer::CustomerId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

// [0-9] instead of \d: the regex crate's \d is Unicode-aware and would admit
// non-ASCII digit characters.
static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,11}$").expect("valid phone number regex"));

/// Stable identifier for a phone row.
pub type PhoneId = Uuid;

/// Persisted phone record with its exclusive owner back-reference.
///
/// The owner id is kept out of serialized output so controller-layer
/// rendering of a customer record does not duplicate the owning id per
/// phone entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phone {
    /// Stable id assigned by the repository on insert.
    pub id: PhoneId,
    /// Digits only, length 10 or 11.
    pub number: String,
    /// Owning customer. A phone row never exists without an owner.
    #[serde(skip_serializing)]
    pub owner_id: CustomerId,
    /// Stable attachment order within one owner.
    pub sort_order: i64,
}

/// Returns true iff `number` consists of exactly 10 or 11 ASCII digits,
/// with no other characters permitted.
pub fn is_valid_number(number: &str) -> bool {
    PHONE_NUMBER_RE.is_match(number)
}
