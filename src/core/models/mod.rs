pub mod metric;
pub mod report;
