//! Integration test suite for device-spinner
//!
//! End-to-end tests that go from spec text or configuration files to built
//! instances, using the sample registries from `device_spinner::test_utils`.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! RUST_LOG=device_spinner=debug cargo test --test integration -- --nocapture
//! ```
//!
//! # Test Organization
//!
//! - **vehicles**: bikes and spoked wheels, every way of passing spokes
//! - **config_loading**: YAML/TOML configuration files to instances
//! - **error_scenarios**: missing names, cycles, lookup and construction failures
//! - **resolution_rules**: self-reference, skip lists, containers, explicit references
//! - **tree**: dependency graph queries and tree rendering

mod config_loading;
mod error_scenarios;
mod resolution_rules;
mod tree;
mod vehicles;
