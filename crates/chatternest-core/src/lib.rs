// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ChatterNest chat client.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the ChatterNest workspace. The storage,
//! completion, and auth backends implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ChatterNestError;
pub use types::{
    AdapterType, AuthUser, ChatTurn, HealthStatus, Message, MessageDraft, ProfileUpdate,
    Role, Sender, UserProfile, ASSISTANT_USER_ID, SYSTEM_USER_ID,
};

// Re-export adapter traits at crate root.
pub use traits::{is_error_label, CompletionProvider, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_has_all_variants() {
        let _config = ChatterNestError::Config("test".into());
        let _storage = ChatterNestError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _provider = ChatterNestError::Provider {
            message: "test".into(),
            source: None,
        };
        let _auth = ChatterNestError::Auth {
            message: "test".into(),
        };
        let _internal = ChatterNestError::Internal("test".into());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Provider, AdapterType::Storage, AdapterType::Auth] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn sentinel_ids_are_distinct_from_each_other() {
        assert_ne!(ASSISTANT_USER_ID, SYSTEM_USER_ID);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that the adapter traits are reachable through
        // the public API.
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_completion_provider<T: CompletionProvider>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }
}
