pub mod config;
pub mod error;
pub mod gamification;
pub mod profiles;
pub mod telemetry;
