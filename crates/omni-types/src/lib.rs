//! # Omni Types Crate
//!
//! Protocol primitives shared across the transaction command subsystem.
//!
//! ## Design Principles
//!
//! - **Newtypes over raw integers**: property identifiers, transaction ids and
//!   addresses are distinct types so they cannot be swapped at call sites.
//! - **Minor units everywhere**: amounts are `i64` counts of the smallest
//!   unit. Divisible tokens carry 8 decimal places, indivisible tokens none.
//! - **Ecosystem is derived**: a property's ecosystem follows from its id.

pub mod amount;
pub mod entities;
pub mod errors;

pub use amount::*;
pub use entities::*;
pub use errors::*;
