pub mod auth;
pub mod ballot;
pub mod catalog;
pub mod code;
pub mod tally;
