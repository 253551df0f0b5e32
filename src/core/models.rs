pub mod ballot;
pub mod candidate;
pub mod category;
pub mod code;
pub mod common;
pub mod tally;
pub mod user;
