//! Shared test utilities used across regioncut crates.

pub mod proptest_profile;
pub mod tracing;
