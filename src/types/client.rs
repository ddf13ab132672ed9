//! Client-related types for the bank ledger engine
//!
//! A client is identified by a unique tax id (NIF) and is immutable once
//! created. Clients become relevant to the core when they are registered
//! as titulars of an account, which authorizes them to operate on it and
//! to receive cards against it.

use serde::{Deserialize, Serialize};

/// A bank client
///
/// Identified by a unique tax id. Immutable for the purposes of this core:
/// name changes, address data and similar concerns live outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique tax id (NIF)
    pub nif: String,

    /// Given name
    pub name: String,

    /// Family name
    pub surname: String,
}

impl Client {
    /// Create a new client
    pub fn new(nif: &str, name: &str, surname: &str) -> Self {
        Client {
            nif: nif.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
        }
    }
}
