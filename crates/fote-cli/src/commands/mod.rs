pub mod analyze;
pub mod classify;
pub mod estimate;
pub mod init_config;
