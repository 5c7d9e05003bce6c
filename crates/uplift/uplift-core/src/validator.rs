//! Schema-driven request validation.

use std::sync::Arc;

use serde_json::{Map, Value};
use uplift_api::FeatureSchema;
use uplift_spi::{Instance, Result, UpliftError};

const INSTANCES_FIELD: &str = "instances";

/// Checks a raw payload against structure and the feature schema before
/// anything is scored.
///
/// Fail-fast: the first offending instance rejects the whole batch.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    schema: Arc<FeatureSchema>,
    max_batch_size: Option<usize>,
}

impl RequestValidator {
    pub fn new(schema: Arc<FeatureSchema>) -> Self {
        Self {
            schema,
            max_batch_size: None,
        }
    }

    /// Reject batches longer than `limit`.
    pub fn with_max_batch_size(mut self, limit: Option<usize>) -> Self {
        self.max_batch_size = limit;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Validate raw JSON bytes.
    pub fn validate(&self, payload: &[u8]) -> Result<Vec<Instance>> {
        let value: Value =
            serde_json::from_slice(payload).map_err(|e| UpliftError::MalformedPayload {
                reason: e.to_string(),
            })?;
        self.validate_value(&value)
    }

    /// Validate an already parsed JSON document.
    pub fn validate_value(&self, payload: &Value) -> Result<Vec<Instance>> {
        let object = payload
            .as_object()
            .ok_or_else(|| UpliftError::MalformedPayload {
                reason: format!("expected a JSON object, got {}", type_name(payload)),
            })?;

        let instances = object
            .get(INSTANCES_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| UpliftError::MissingField {
                field: INSTANCES_FIELD.to_string(),
            })?;

        if instances.is_empty() {
            return Err(UpliftError::EmptyBatch);
        }
        if let Some(limit) = self.max_batch_size {
            if instances.len() > limit {
                return Err(UpliftError::BatchTooLarge {
                    limit,
                    actual: instances.len(),
                });
            }
        }

        instances
            .iter()
            .enumerate()
            .map(|(index, element)| self.validate_instance(index, element))
            .collect()
    }

    fn validate_instance(&self, index: usize, element: &Value) -> Result<Instance> {
        let fields: &Map<String, Value> =
            element
                .as_object()
                .ok_or_else(|| UpliftError::InvalidInstanceType {
                    index,
                    found: type_name(element).to_string(),
                })?;

        let missing: Vec<String> = self
            .schema
            .names()
            .iter()
            .filter(|name| !fields.contains_key(name.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(UpliftError::MissingFeature { index, missing });
        }

        let mut instance = Instance::with_capacity(self.schema.len());
        for name in self.schema.names() {
            let raw = &fields[name.as_str()];
            let value = numeric(raw).ok_or_else(|| UpliftError::InvalidFeatureValue {
                index,
                key: name.clone(),
                value: raw.clone(),
            })?;
            instance.insert(name.clone(), value);
        }
        Ok(instance)
    }
}

/// Integers and floats are accepted; strings, booleans and null are not.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
