//! JSON-Schema descriptors for the resources clients can write.
//!
//! The same descriptor is used to gate inbound payloads and is embedded
//! verbatim in the `add-*` and `edit` controls so clients can validate a
//! document before submitting it.

use jsonschema::Validator;
use serde_json::{json, Value};
use thiserror::Error;

use crate::constants::DEFAULT_COUNTRY;

/// Pattern enforced on `event_begin`: `YYYY-MM-DDTHH:MM:SSZ`.
pub const EVENT_BEGIN_PATTERN: &str =
    "^[0-9]{4}-[01][0-9]-[0-3][0-9]T[0-9]{2}:[0-5][0-9]:[0-5][0-9]Z$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Area,
    Event,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema for {resource:?} failed to compile: {reason}")]
    Compile { resource: Resource, reason: String },

    #[error("{0}")]
    Invalid(String),
}

/// Returns the schema descriptor for `resource`. Pure and deterministic.
pub fn get_schema(resource: Resource) -> Value {
    match resource {
        Resource::Area => area_schema(),
        Resource::Event => event_schema(),
    }
}

fn area_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {
                "description": "Area name",
                "type": "string"
            },
            "country": {
                "description": "Country the area belongs to",
                "type": "string",
                "default": DEFAULT_COUNTRY
            }
        }
    })
}

fn event_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "status", "event_begin", "area_name"],
        "properties": {
            "name": {
                "description": "Event's unique name",
                "type": "string"
            },
            "status": {
                "description": "Event's status",
                "type": "string"
            },
            "event_begin": {
                "description": "Date for the happening",
                "type": "string",
                "pattern": EVENT_BEGIN_PATTERN
            },
            "area_name": {
                "description": "Name of the area",
                "type": "string"
            },
            "max_tickets": {
                "description": "Number of tickets available",
                "type": "integer",
                "minimum": 1
            },
            "ticket_price": {
                "description": "Price of a single ticket",
                "type": ["number", "null"],
                "minimum": 0
            }
        }
    })
}

/// Query parameters advertised by the collection href template.
///
/// Only advertised: the server does not paginate yet and ignores `start`.
pub fn paginator_schema() -> Value {
    json!({
        "type": "object",
        "required": [],
        "properties": {
            "index": {
                "description": "Starting index for pagination",
                "type": "integer",
                "default": 0
            }
        }
    })
}

/// Compiled validators for every writable resource, built once at startup.
pub struct SchemaRegistry {
    area: Validator,
    event: Validator,
}

impl SchemaRegistry {
    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            area: compile(Resource::Area)?,
            event: compile(Resource::Event)?,
        })
    }

    /// Validates `instance`, reporting the first violation the validator finds.
    pub fn validate(&self, resource: Resource, instance: &Value) -> Result<(), SchemaError> {
        let validator = match resource {
            Resource::Area => &self.area,
            Resource::Event => &self.event,
        };

        match validator.iter_errors(instance).next() {
            Some(violation) => Err(SchemaError::Invalid(violation.to_string())),
            None => Ok(()),
        }
    }
}

fn compile(resource: Resource) -> Result<Validator, SchemaError> {
    jsonschema::validator_for(&get_schema(resource)).map_err(|e| SchemaError::Compile {
        resource,
        reason: e.to_string(),
    })
}
