pub mod error;
pub mod result;
