pub mod agent;
pub mod config;
pub mod identity;
pub mod session;
pub mod shared;
pub mod signature;
pub mod submission;
pub mod tenant;
