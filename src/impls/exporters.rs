pub mod pdf;
pub mod xlsx;

pub const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
