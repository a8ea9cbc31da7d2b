// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The injected shareable-address seam.
//!
//! The controller never touches a global location; it reads and writes the address through a
//! [`Navigator`], which keeps address handling deterministic and testable.

use std::sync::Mutex;

use crate::params::{self, Params, ParamsDecodeError};

/// Read/write access to the shareable address query. Writing must not trigger navigation.
pub trait Navigator: Send + Sync {
    fn read_query(&self) -> String;
    fn write_query(&self, query: &str);
}

/// An in-memory address, used by the terminal host and by tests.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    query: Mutex<String>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self { query: Mutex::new(query.into()) }
    }
}

impl Navigator for MemoryNavigator {
    fn read_query(&self) -> String {
        self.query.lock().expect("navigator lock poisoned").clone()
    }

    fn write_query(&self, query: &str) {
        *self.query.lock().expect("navigator lock poisoned") = query.to_owned();
    }
}

/// Decodes the navigator's current query into the parameter set a host seeds `initialize` with.
pub fn params_from_address(navigator: &dyn Navigator) -> Result<Params, ParamsDecodeError> {
    params::decode(&navigator.read_query())
}

#[cfg(test)]
mod tests {
    use super::{params_from_address, MemoryNavigator, Navigator};

    #[test]
    fn memory_navigator_round_trips_writes() {
        let navigator = MemoryNavigator::new();
        assert_eq!(navigator.read_query(), "");

        navigator.write_query("branch=main&cursor=tok_a");
        assert_eq!(navigator.read_query(), "branch=main&cursor=tok_a");
    }

    #[test]
    fn params_from_address_decodes_the_seeded_query() {
        let navigator = MemoryNavigator::with_query("branch=release-1.4");
        let params = params_from_address(&navigator).expect("decode");
        assert_eq!(params.get("branch"), Some("release-1.4"));
    }

    #[test]
    fn params_from_address_reports_malformed_queries() {
        let navigator = MemoryNavigator::with_query("branch=%zz");
        params_from_address(&navigator).expect_err("malformed query");
    }
}
