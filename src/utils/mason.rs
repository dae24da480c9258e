//! Generic Mason document.
//!
//! Reserved keys (`@namespaces`, `@controls`, `@error`) are typed fields;
//! everything else a representation carries lives in `fields`. None of this
//! knows about areas or events; see [`crate::utils::builder`] for that.
//!
//! Fields, namespaces and controls serialize in the order they were added.

use axum::http::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
}

/// A named affordance. A control without a method is a plain link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub href: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,

    #[serde(
        rename = "isHrefTemplate",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_href_template: bool,
}

impl Control {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method.as_str().to_string());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn href_template(mut self) -> Self {
        self.is_href_template = true;
        self
    }

    /// The method a client should use; GET when none was declared.
    pub fn effective_method(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasonError {
    #[serde(rename = "@message")]
    pub message: String,

    #[serde(rename = "@messages")]
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasonDocument {
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MasonDocument>>,

    #[serde(
        rename = "@namespaces",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub namespaces: IndexMap<String, Namespace>,

    #[serde(
        rename = "@controls",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub controls: IndexMap<String, Control>,

    #[serde(rename = "@error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<MasonError>,
}

impl MasonDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Upserts a namespace prefix.
    pub fn add_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.namespaces
            .insert(prefix.into(), Namespace { name: uri.into() });
    }

    /// Upserts a control, replacing any previous control with the same name.
    pub fn add_control(&mut self, name: impl Into<String>, control: Control) {
        self.controls.insert(name.into(), control);
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    /// Sets the error block. Mason allows several messages; only one is carried.
    pub fn add_error(&mut self, title: impl Into<String>, detail: impl Into<String>) {
        self.error = Some(MasonError {
            message: title.into(),
            messages: vec![detail.into()],
        });
    }

    pub fn set_items(&mut self, items: Vec<MasonDocument>) {
        self.items = Some(items);
    }
}
