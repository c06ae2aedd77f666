pub mod officer;
pub mod report;
pub mod table;
