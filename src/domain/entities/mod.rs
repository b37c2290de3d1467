pub mod app_config;
pub mod build_target;
pub mod mongo_setup;
pub mod repository;
pub mod workspace;
