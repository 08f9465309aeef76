pub mod comparison;
pub mod records;
pub mod summary;
