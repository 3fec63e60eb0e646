//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel
//! - **memory**: in-process store used without a database and in tests
//! - **images**: filesystem store for uploaded recipe images
//!
//! Adapters translate between domain values and storage representations and
//! carry no business rules.

pub mod images;
pub mod memory;
pub mod persistence;
