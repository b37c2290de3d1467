pub mod build_binaries;
pub mod check_workspace;
pub mod clone_repositories;
pub mod install_mongo;
