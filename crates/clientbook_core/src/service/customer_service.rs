//! Customer consistency service.
//!
//! # Responsibility
//! - Own all customer↔phone invariant enforcement for insert, update and
//!   delete.
//! - Reconcile a submitted phone-number set against repository state.
//!
//! # Invariants
//! - A phone number is owned by at most one customer at any time.
//! - Every submitted number is validated uniformly on insert and update:
//!   format first, then ownership, fail-fast in submission order.
//! - All validation and conflict checks complete before the first write, so
//!   a rejected request never leaves partial state.
//! - Deleting a customer removes every owned phone explicitly; cascade is
//!   never delegated to the storage layer.
//!
//! # Concurrency
//! The check-then-write sequence on phone numbers is racy across concurrent
//! writers. The authoritative guard is the UNIQUE index on `phones.number`;
//! a losing writer surfaces the constraint violation as an unclassified
//! repository error. No in-process locking is used, since it cannot protect
//! a multi-process deployment. Callers needing mid-write atomicity against
//! infrastructure failures wrap one operation in their own storage
//! transaction.

use crate::model::customer::{Customer, CustomerId, CustomerInput, CustomerRecord};
use crate::model::phone::{is_valid_number, Phone};
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::phone_repo::PhoneRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-visible failures produced by the consistency service.
///
/// The first four kinds are rejected requests and propagate to the boundary
/// unmodified; `Repo` carries unexpected persistence failures which are
/// never retried or reinterpreted here.
#[derive(Debug)]
pub enum CustomerServiceError {
    /// Submitted phone list is empty or all-blank.
    PhoneEmpty,
    /// A submitted number is not exactly 10 or 11 ASCII digits.
    PhoneFormatInvalid(String),
    /// A submitted number already belongs to another customer.
    PhoneAlreadyLinked(String),
    /// Target customer does not exist.
    CustomerNotFound(CustomerId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for CustomerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhoneEmpty => write!(f, "phone list cannot be empty"),
            Self::PhoneFormatInvalid(number) => {
                write!(f, "invalid phone number format: `{number}`")
            }
            Self::PhoneAlreadyLinked(number) => {
                write!(f, "phone number already linked to a customer: `{number}`")
            }
            Self::CustomerNotFound(id) => write!(f, "customer not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent customer state: {details}")
            }
        }
    }
}

impl Error for CustomerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CustomerServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::CustomerNotFound(id) => Self::CustomerNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Consistency service over the two repository collaborators.
///
/// Stateless between calls; all state lives in the repositories, injected
/// through the constructor.
pub struct CustomerService<C: CustomerRepository, P: PhoneRepository> {
    customers: C,
    phones: P,
}

impl<C: CustomerRepository, P: PhoneRepository> CustomerService<C, P> {
    /// Creates a service using the provided repository implementations.
    pub fn new(customers: C, phones: P) -> Self {
        Self { customers, phones }
    }

    /// Inserts one customer with its phone numbers.
    ///
    /// # Contract
    /// - `PhoneEmpty` when the list is empty or every entry is blank.
    /// - Per number, in submission order: format check, then existence check
    ///   against the phone repository. At insert time any pre-existing match
    ///   is a conflict regardless of owner, since this customer does not
    ///   exist yet.
    /// - Duplicate numbers inside one submission collapse to the first
    ///   occurrence.
    /// - Returns the populated record on success.
    pub fn insert(&self, input: &CustomerInput) -> Result<CustomerRecord, CustomerServiceError> {
        ensure_some_number_present(&input.phones)?;

        let mut numbers: Vec<String> = Vec::new();
        for number in &input.phones {
            if !is_valid_number(number) {
                return Err(CustomerServiceError::PhoneFormatInvalid(number.clone()));
            }
            if numbers.contains(number) {
                continue;
            }
            if self.phones.find_by_number(number)?.is_some() {
                return Err(CustomerServiceError::PhoneAlreadyLinked(number.clone()));
            }
            numbers.push(number.clone());
        }

        let customer = self
            .customers
            .insert(&input.name, &input.address, &input.district)?;
        let phones = self.phones.insert_all(customer.id, &numbers)?;

        Ok(CustomerRecord::from_parts(customer, phones))
    }

    /// Lists every customer with its phone collection resolved per id.
    pub fn get_all(&self) -> Result<Vec<CustomerRecord>, CustomerServiceError> {
        let customers = self.customers.find_all()?;
        let mut records = Vec::with_capacity(customers.len());
        for customer in customers {
            let phones = self.phones.find_by_owner(customer.id)?;
            records.push(CustomerRecord::from_parts(customer, phones));
        }
        Ok(records)
    }

    /// Gets one customer by id with its phone collection resolved.
    pub fn get(&self, id: CustomerId) -> Result<CustomerRecord, CustomerServiceError> {
        let customer = self
            .customers
            .find_by_id(id)?
            .ok_or(CustomerServiceError::CustomerNotFound(id))?;
        let phones = self.phones.find_by_owner(id)?;
        Ok(CustomerRecord::from_parts(customer, phones))
    }

    /// Updates attributes and reconciles the phone set of one customer.
    ///
    /// # Contract
    /// - `CustomerNotFound` when `id` does not resolve; nothing is written.
    /// - The submitted list is validated exactly like insert, for every
    ///   number including ones already owned.
    /// - Reconciliation is a set difference: owned numbers absent from the
    ///   submission are deleted, unchanged numbers are re-saved idempotently
    ///   (same row, same id, same order), new numbers are attached.
    /// - A number owned by a different customer is `PhoneAlreadyLinked`;
    ///   the conflict is detected before any write, leaving both customers'
    ///   phone sets untouched.
    /// - `name`/`address`/`district` are overwritten unconditionally.
    pub fn update(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Result<CustomerRecord, CustomerServiceError> {
        let customer = self
            .customers
            .find_by_id(id)?
            .ok_or(CustomerServiceError::CustomerNotFound(id))?;

        ensure_some_number_present(&input.phones)?;
        let existing = self.phones.find_by_owner(id)?;

        // Plan the full reconciliation before touching storage.
        let mut submitted: Vec<String> = Vec::new();
        let mut kept: Vec<Phone> = Vec::new();
        let mut to_attach: Vec<String> = Vec::new();
        for number in &input.phones {
            if !is_valid_number(number) {
                return Err(CustomerServiceError::PhoneFormatInvalid(number.clone()));
            }
            if submitted.contains(number) {
                continue;
            }
            submitted.push(number.clone());

            if let Some(owned) = existing.iter().find(|phone| phone.number == *number) {
                kept.push(owned.clone());
            } else if self.phones.find_by_number(number)?.is_some() {
                // Present in storage but not in this customer's set, so it
                // belongs to a different owner.
                return Err(CustomerServiceError::PhoneAlreadyLinked(number.clone()));
            } else {
                to_attach.push(number.clone());
            }
        }

        for phone in &existing {
            if !submitted.contains(&phone.number) {
                self.phones.delete(phone.id)?;
            }
        }
        for phone in &kept {
            self.phones.update(phone)?;
        }
        for number in &to_attach {
            self.phones.insert(id, number)?;
        }

        let updated = Customer {
            name: input.name.clone(),
            address: input.address.clone(),
            district: input.district.clone(),
            ..customer
        };
        self.customers.update(&updated)?;

        let customer = self
            .customers
            .find_by_id(id)?
            .ok_or(CustomerServiceError::InconsistentState(
                "updated customer not found in read-back",
            ))?;
        let phones = self.phones.find_by_owner(id)?;
        Ok(CustomerRecord::from_parts(customer, phones))
    }

    /// Deletes one customer and every phone it owns.
    ///
    /// Phones are removed explicitly before the customer row, so no phone
    /// referencing a deleted customer can remain on stores without cascade
    /// support.
    pub fn delete(&self, id: CustomerId) -> Result<(), CustomerServiceError> {
        let customer = self
            .customers
            .find_by_id(id)?
            .ok_or(CustomerServiceError::CustomerNotFound(id))?;

        for phone in self.phones.find_by_owner(customer.id)? {
            self.phones.delete(phone.id)?;
        }
        self.customers.delete(customer.id)?;

        Ok(())
    }
}

/// Rejects a phone list that is absent in practice: no entries, or entries
/// that are all blank after trimming.
fn ensure_some_number_present(phones: &[String]) -> Result<(), CustomerServiceError> {
    if phones.iter().all(|number| number.trim().is_empty()) {
        return Err(CustomerServiceError::PhoneEmpty);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_some_number_present, CustomerServiceError};

    #[test]
    fn empty_list_is_rejected() {
        let err = ensure_some_number_present(&[]).unwrap_err();
        assert!(matches!(err, CustomerServiceError::PhoneEmpty));
    }

    #[test]
    fn all_blank_list_is_rejected() {
        let blanks = vec!["".to_string(), "   ".to_string()];
        let err = ensure_some_number_present(&blanks).unwrap_err();
        assert!(matches!(err, CustomerServiceError::PhoneEmpty));
    }

    #[test]
    fn list_with_one_candidate_passes() {
        let values = vec!["".to_string(), "1234567890".to_string()];
        assert!(ensure_some_number_present(&values).is_ok());
    }
}
