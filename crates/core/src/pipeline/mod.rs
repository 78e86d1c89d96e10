pub mod access_loop;
pub mod config;
pub mod enroll_identity_use_case;
pub mod loop_logger;
pub mod startup_error;
