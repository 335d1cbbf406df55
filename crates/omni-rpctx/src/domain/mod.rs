//! Domain layer: command requests, validation rules, fee policy and errors.

pub mod commands;
pub mod config;
pub mod entities;
pub mod errors;
pub mod fee_policy;
pub mod outcome;
pub mod payload;
pub mod rules;

pub use commands::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
pub use fee_policy::*;
pub use outcome::*;
pub use payload::*;
