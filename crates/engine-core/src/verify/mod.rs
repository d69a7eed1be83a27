pub mod report;
pub mod users;
