//! Moves staged rows into the catalog tables.

pub mod analysis;
pub mod preview;
pub mod products;
