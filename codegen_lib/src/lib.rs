//! Codegen library - bot API client binding generation.
//!
//! Takes the machine-readable API description (methods, fields, types) and
//! produces the Go client bindings for it.

pub mod args;
pub mod encode;
pub mod go_client;
pub mod naming;
pub mod types;

use serde::{Deserialize, Serialize};

// Re-export schema types (the generator's input model)
pub use crate::schema::*;

pub mod schema {
    use std::collections::BTreeMap;

    use super::*;

    /// Complete API description, as published upstream.
    ///
    /// Methods and types are keyed by name in ordered maps, so iteration is
    /// lexicographic no matter what order the loader inserted them in.
    /// Regeneration from an unchanged description is byte-identical.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ApiDescription {
        pub types: BTreeMap<String, TypeDescription>,
        pub methods: BTreeMap<String, MethodDescription>,
    }

    /// An API object definition.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct TypeDescription {
        #[serde(default)]
        pub description: Vec<String>,
        #[serde(default)]
        pub fields: Vec<Field>,
    }

    /// One remote method.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MethodDescription {
        #[serde(default)]
        pub fields: Vec<Field>,
        /// Candidate return types; see [`crate::types::resolve_return_type`]
        /// for how multi-candidate lists are handled.
        pub returns: Vec<String>,
        #[serde(default)]
        pub description: Vec<String>,
        /// Upstream documentation URL.
        #[serde(default)]
        pub href: String,
    }

    /// One field of a method or type.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Field {
        /// Schema-case (snake_case) identifier.
        pub name: String,
        pub required: bool,
        /// Acceptable types for this field - a union when more than one.
        pub types: Vec<String>,
        #[serde(default)]
        pub description: String,
    }

    impl ApiDescription {
        /// Load a description from its JSON document.
        pub fn from_json(input: &str) -> anyhow::Result<Self> {
            Ok(serde_json::from_str(input)?)
        }
    }
}

/// Codegen trait - implement this for each target language
pub trait Codegen {
    fn generate(&self, schema: &ApiDescription) -> anyhow::Result<GeneratedCode>;
    fn language(&self) -> &str;
}

#[derive(Debug)]
pub struct GeneratedCode {
    pub files: Vec<GeneratedFile>,
}

#[derive(Debug)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
