use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SyncError;

/// Fields of an edited form whose values differ from the original.
///
/// Values are compared by their JSON form, field by field. A field edited to
/// `null` is not a change: an absent value means "no update requested".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    fields: Map<String, Value>,
}

impl ChangeSet {
    pub fn between<F: Serialize>(original: &F, edited: &F) -> Result<Self, SyncError> {
        let original = as_object(serde_json::to_value(original)?)?;
        let edited = as_object(serde_json::to_value(edited)?)?;

        let fields = edited
            .into_iter()
            .filter(|(name, value)| !value.is_null() && original.get(name) != Some(value))
            .collect();

        Ok(Self { fields })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// The changed fields as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Build the partial payload type from the changed fields only.
    ///
    /// `P` normally has every field optional and skipped when `None`, so the
    /// unchanged fields are omitted from the serialized mutation.
    pub fn into_patch<P: DeserializeOwned>(self) -> Result<P, SyncError> {
        Ok(serde_json::from_value(Value::Object(self.fields))?)
    }
}

fn as_object(value: Value) -> Result<Map<String, Value>, SyncError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(SyncError::Decode(format!(
            "form must serialize to an object, got {}",
            other
        ))),
    }
}
