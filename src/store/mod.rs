//! Storage module
//!
//! Persistence is an external collaborator of the core: business logic
//! only ever sees the narrow traits defined here.
//!
//! # Components
//!
//! - `traits` - Storage-collaborator traits consumed by the core
//! - `memory` - In-memory implementation backing the test suite

pub mod memory;
pub mod traits;

pub use memory::MemoryBank;
pub use traits::{AccountDirectory, AccountStore, CardStore, ClientDirectory, MovementStore};
