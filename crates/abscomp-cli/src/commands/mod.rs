mod common;
pub mod compare;
pub mod config;

pub use common::CompareOptions;
pub use compare::Compare;
pub use config::Config;
