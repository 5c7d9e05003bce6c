//! Canonical feature ordering shared by both scoring models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uplift_spi::{BundleError, FeatureVector, Instance};

/// Ordered, immutable list of the feature names the models were trained on.
///
/// Defines which keys an instance must carry and the order in which their
/// values are laid out in a [`FeatureVector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    names: Vec<String>,
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema. Names must be non-empty and unique.
    pub fn new<I, S>(names: I) -> Result<Self, BundleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(BundleError::InvalidSchema(
                "feature list must not be empty".to_string(),
            ));
        }

        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(BundleError::InvalidSchema(format!(
                    "feature {} has an empty name",
                    i
                )));
            }
            if positions.insert(name.clone(), i).is_some() {
                return Err(BundleError::InvalidSchema(format!(
                    "duplicate feature name '{}'",
                    name
                )));
            }
        }

        Ok(Self { names, positions })
    }

    /// Schema with `n` features named `f0..f{n-1}`.
    pub fn numbered(n: usize) -> Result<Self, BundleError> {
        Self::new((0..n).map(|i| format!("f{}", i)))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Position of a feature in the vector layout.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Schema names absent from `instance`, in schema order.
    pub fn missing_from(&self, instance: &Instance) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| !instance.contains(name))
            .cloned()
            .collect()
    }

    /// Project an instance onto the schema.
    ///
    /// Keys outside the schema are dropped. On failure returns the missing
    /// names in schema order.
    pub fn project(&self, instance: &Instance) -> Result<FeatureVector, Vec<String>> {
        let mut values = Vec::with_capacity(self.names.len());
        let mut missing = Vec::new();
        for name in &self.names {
            match instance.get(name) {
                Some(v) => values.push(v),
                None => missing.push(name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(FeatureVector::new(values))
        } else {
            Err(missing)
        }
    }
}

impl<'de> Deserialize<'de> for FeatureSchema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names = Vec::<String>::deserialize(deserializer)?;
        FeatureSchema::new(names).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_schema() {
        let schema = FeatureSchema::numbered(12).unwrap();
        assert_eq!(schema.len(), 12);
        assert_eq!(schema.names()[0], "f0");
        assert_eq!(schema.names()[11], "f11");
        assert_eq!(schema.index_of("f7"), Some(7));
        assert_eq!(schema.index_of("f12"), None);
    }

    #[test]
    fn test_empty_schema_rejected() {
        let result = FeatureSchema::new(Vec::<String>::new());
        assert!(matches!(result, Err(BundleError::InvalidSchema(_))));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = FeatureSchema::new(["a", "b", "a"]);
        match result {
            Err(BundleError::InvalidSchema(reason)) => assert!(reason.contains("'a'")),
            other => panic!("expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(FeatureSchema::new(["a", ""]).is_err());
    }

    #[test]
    fn test_project_follows_schema_order() {
        let schema = FeatureSchema::new(["b", "a", "c"]).unwrap();
        let instance: Instance = [("a", 1.0), ("c", 3.0), ("b", 2.0)].into_iter().collect();
        let vector = schema.project(&instance).unwrap();
        assert_eq!(vector.as_slice(), &[2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_project_drops_extras() {
        let schema = FeatureSchema::new(["a", "b"]).unwrap();
        let instance: Instance = [("a", 1.0), ("b", 2.0), ("z", 99.0)].into_iter().collect();
        let vector = schema.project(&instance).unwrap();
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_project_reports_missing_in_order() {
        let schema = FeatureSchema::numbered(4).unwrap();
        let instance: Instance = [("f1", 1.0)].into_iter().collect();
        let missing = schema.project(&instance).unwrap_err();
        assert_eq!(missing, vec!["f0", "f2", "f3"]);
        assert_eq!(schema.missing_from(&instance), missing);
    }

    #[test]
    fn test_deserialize_validates() {
        let schema: FeatureSchema = serde_json::from_str(r#"["x", "y"]"#).unwrap();
        assert_eq!(schema.index_of("y"), Some(1));
        assert!(serde_json::from_str::<FeatureSchema>(r#"["x", "x"]"#).is_err());
        assert!(serde_json::from_str::<FeatureSchema>("[]").is_err());
    }

    #[test]
    fn test_serializes_as_name_list() {
        let schema = FeatureSchema::new(["x", "y"]).unwrap();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            serde_json::json!(["x", "y"])
        );
    }
}
