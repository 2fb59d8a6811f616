//! Domain model for the customer registry.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the customer↔phone relation foreign-key shaped, never a live
//!   object graph.
//!
//! # Invariants
//! - Every customer and phone is identified by a stable uuid assigned at the
//!   repository write boundary.
//! - A phone row always carries exactly one owning customer id.

pub mod customer;
pub mod phone;
