pub mod error;
pub mod measurements;
pub mod table;
