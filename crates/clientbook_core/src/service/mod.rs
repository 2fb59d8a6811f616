//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep controller/transport layers decoupled from storage details.

pub mod customer_service;
