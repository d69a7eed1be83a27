//! Assigns staging columns to the fixed `Products` fields.

pub mod mapper;
pub mod rules;
