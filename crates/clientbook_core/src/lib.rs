//! Core domain logic for the clientbook customer registry.
//! This crate is the single source of truth for customer↔phone invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::customer::{Customer, CustomerId, CustomerInput, CustomerRecord};
pub use model::phone::{is_valid_number, Phone, PhoneId};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::phone_repo::{PhoneRepository, SqlitePhoneRepository};
pub use repo::{RepoError, RepoResult};
pub use service::customer_service::{CustomerService, CustomerServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
