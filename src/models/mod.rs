pub mod entry;
pub mod summary;
