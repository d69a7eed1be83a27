//! Reference rows that must exist exactly once, keyed by natural key.

pub mod catalog;
pub mod seed;
pub mod store;
