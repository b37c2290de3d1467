pub mod check_repo;
pub mod install_mongo;
pub mod operate_binaries;

pub use check_repo::*;
pub use install_mongo::*;
pub use operate_binaries::*;
