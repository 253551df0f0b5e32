pub mod exporters;
pub mod tokener;
