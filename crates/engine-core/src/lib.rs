pub mod error;
pub mod mapping;
pub mod migrate;
pub mod reference;
pub mod schema;
pub mod script;
pub mod staging;
pub mod verify;

#[cfg(test)]
pub(crate) mod test_utils;
