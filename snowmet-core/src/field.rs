//! Node-indexed field storage.
//!
//! Components read their drivers from, and write their results to, a [`FieldStore`]:
//! a keyed collection of `f64` arrays that all share the store's node count.
//! Fields are created on first write and overwritten in place afterwards; a write
//! can never change the length of a field.
//!
//! [`NodeFields`] is the in-memory implementation used by the model runner and the
//! tests. Anything that can expose named `ndarray` columns (a raster grid, a mesh
//! wrapper) can implement the trait instead.

use crate::errors::{SnowMetError, SnowMetResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Keyed container of node-indexed arrays.
pub trait FieldStore {
    /// Number of nodes every field must hold
    fn number_of_nodes(&self) -> usize;

    /// Test if the store contains a field with the given name
    fn has(&self, name: &str) -> bool;

    /// Borrow a field
    ///
    /// Fails with [`SnowMetError::MissingField`] rather than defaulting, so a stage
    /// that runs before its prerequisite surfaces the ordering bug.
    fn get(&self, name: &str) -> SnowMetResult<&Array1<f64>>;

    /// Write a field, creating it if absent and overwriting it in place otherwise
    fn set(&mut self, name: &str, values: Array1<f64>) -> SnowMetResult<()>;

    /// Names of every stored field, sorted
    fn names(&self) -> Vec<String>;

    /// Write a field holding the same value at every node
    fn add_full(&mut self, name: &str, value: f64) -> SnowMetResult<()> {
        let n = self.number_of_nodes();
        self.set(name, Array1::from_elem(n, value))
    }

    /// Create a field filled with `value` only if it does not already exist.
    ///
    /// Returns `true` when the field was created.
    fn ensure_default(&mut self, name: &str, value: f64) -> SnowMetResult<bool> {
        if self.has(name) {
            return Ok(false);
        }
        self.add_full(name, value)?;
        Ok(true)
    }

    /// Number of stored fields
    fn len(&self) -> usize {
        self.names().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory field store keyed by field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFields {
    number_of_nodes: usize,
    fields: BTreeMap<String, Array1<f64>>,
}

impl NodeFields {
    /// Create an empty store for `number_of_nodes` nodes
    pub fn new(number_of_nodes: usize) -> Self {
        Self {
            number_of_nodes,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style helper to add a field from a slice of values
    pub fn with_field(mut self, name: &str, values: &[f64]) -> SnowMetResult<Self> {
        self.set(name, Array1::from(values.to_vec()))?;
        Ok(self)
    }

    /// Builder-style helper to add a field holding one value at every node
    pub fn with_full(mut self, name: &str, value: f64) -> SnowMetResult<Self> {
        self.add_full(name, value)?;
        Ok(self)
    }

    /// Mutable access to an existing field for in-place edits
    pub fn get_mut(&mut self, name: &str) -> SnowMetResult<&mut Array1<f64>> {
        self.fields
            .get_mut(name)
            .ok_or_else(|| SnowMetError::MissingField(name.to_string()))
    }

    /// Remove a field, returning its values
    pub fn remove(&mut self, name: &str) -> Option<Array1<f64>> {
        self.fields.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Array1<f64>)> {
        self.fields.iter()
    }
}

impl FieldStore for NodeFields {
    fn number_of_nodes(&self) -> usize {
        self.number_of_nodes
    }

    fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn get(&self, name: &str) -> SnowMetResult<&Array1<f64>> {
        self.fields
            .get(name)
            .ok_or_else(|| SnowMetError::MissingField(name.to_string()))
    }

    fn set(&mut self, name: &str, values: Array1<f64>) -> SnowMetResult<()> {
        if values.len() != self.number_of_nodes {
            return Err(SnowMetError::CardinalityMismatch {
                name: name.to_string(),
                expected: self.number_of_nodes,
                found: values.len(),
            });
        }

        match self.fields.get_mut(name) {
            Some(existing) => existing.assign(&values),
            None => {
                debug!(field = name, "Creating field");
                self.fields.insert(name.to_string(), values);
            }
        }
        Ok(())
    }

    fn names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Represents a value that can be either a single scalar or one value per node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    /// The same value at every node
    Scalar(f64),
    /// One value per node
    Nodes(Vec<f64>),
}

impl NodeValue {
    /// Get the scalar value if this is a Scalar variant
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            NodeValue::Scalar(v) => Some(*v),
            NodeValue::Nodes(_) => None,
        }
    }

    /// Get the per-node values if this is a Nodes variant
    pub fn as_nodes(&self) -> Option<&[f64]> {
        match self {
            NodeValue::Scalar(_) => None,
            NodeValue::Nodes(values) => Some(values),
        }
    }

    /// Expand to one value per node.
    ///
    /// `name` is only used to label a length mismatch.
    pub fn broadcast(&self, name: &str, number_of_nodes: usize) -> SnowMetResult<Array1<f64>> {
        match self {
            NodeValue::Scalar(v) => Ok(Array1::from_elem(number_of_nodes, *v)),
            NodeValue::Nodes(values) if values.len() == number_of_nodes => {
                Ok(Array1::from(values.clone()))
            }
            NodeValue::Nodes(values) => Err(SnowMetError::CardinalityMismatch {
                name: name.to_string(),
                expected: number_of_nodes,
                found: values.len(),
            }),
        }
    }
}

impl Default for NodeValue {
    fn default() -> Self {
        NodeValue::Scalar(0.0)
    }
}

impl From<f64> for NodeValue {
    fn from(value: f64) -> Self {
        NodeValue::Scalar(value)
    }
}

impl From<Vec<f64>> for NodeValue {
    fn from(values: Vec<f64>) -> Self {
        NodeValue::Nodes(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_set_creates_and_overwrites() {
        let mut fields = NodeFields::new(3);
        assert!(fields.is_empty());

        fields.set("snowpack__depth", array![0.1, 0.2, 0.3]).unwrap();
        assert!(fields.has("snowpack__depth"));

        fields.set("snowpack__depth", array![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(fields.get("snowpack__depth").unwrap(), &array![1.0, 2.0, 3.0]);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_set_rejects_wrong_length() {
        let mut fields = NodeFields::new(4);
        let err = fields.set("land_surface__albedo", array![0.3, 0.3]).unwrap_err();
        assert_eq!(
            err,
            SnowMetError::CardinalityMismatch {
                name: "land_surface__albedo".to_string(),
                expected: 4,
                found: 2,
            }
        );
        assert!(!fields.has("land_surface__albedo"));
    }

    #[test]
    fn test_get_missing_field() {
        let fields = NodeFields::new(2);
        assert_eq!(
            fields.get("land_surface__temperature").unwrap_err(),
            SnowMetError::MissingField("land_surface__temperature".to_string())
        );
    }

    #[test]
    fn test_ensure_default_keeps_existing_values() {
        let mut fields = NodeFields::new(2).with_full("land_surface__albedo", 0.8).unwrap();

        let created = fields.ensure_default("land_surface__albedo", 0.3).unwrap();
        assert!(!created);
        assert_eq!(fields.get("land_surface__albedo").unwrap(), &array![0.8, 0.8]);

        let created = fields.ensure_default("land_surface__emissivity", 0.98).unwrap();
        assert!(created);
        assert_eq!(fields.get("land_surface__emissivity").unwrap(), &array![0.98, 0.98]);
    }

    #[test]
    fn test_names_sorted() {
        let fields = NodeFields::new(1)
            .with_full("b__field", 1.0)
            .unwrap()
            .with_full("a__field", 2.0)
            .unwrap();
        assert_eq!(fields.names(), vec!["a__field", "b__field"]);
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut fields = NodeFields::new(2).with_field("x__y", &[1.0, 2.0]).unwrap();
        fields.get_mut("x__y").unwrap().fill(5.0);
        assert_eq!(fields.get("x__y").unwrap(), &array![5.0, 5.0]);
        assert!(fields.get_mut("missing__field").is_err());
    }

    #[test]
    fn test_node_fields_serialization() {
        let fields = NodeFields::new(2).with_field("x__y", &[1.0, 2.0]).unwrap();
        let json = serde_json::to_string(&fields).unwrap();
        let deserialized: NodeFields = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, fields);
    }

    // ===== NodeValue =====

    #[test]
    fn test_node_value_scalar() {
        let value = NodeValue::Scalar(-7.0);
        assert_eq!(value.as_scalar(), Some(-7.0));
        assert_eq!(value.as_nodes(), None);
        assert_eq!(value.broadcast("gmt", 3).unwrap(), array![-7.0, -7.0, -7.0]);
    }

    #[test]
    fn test_node_value_nodes() {
        let value = NodeValue::from(vec![-5.0, -6.0]);
        assert_eq!(value.as_scalar(), None);
        assert_eq!(value.broadcast("gmt", 2).unwrap(), array![-5.0, -6.0]);
        assert!(matches!(
            value.broadcast("gmt", 4),
            Err(SnowMetError::CardinalityMismatch { expected: 4, found: 2, .. })
        ));
    }

    #[test]
    fn test_node_value_untagged_deserialization() {
        let scalar: NodeValue = serde_json::from_str("-7").unwrap();
        assert_eq!(scalar, NodeValue::Scalar(-7.0));

        let nodes: NodeValue = serde_json::from_str("[-5, -6.5]").unwrap();
        assert_eq!(nodes, NodeValue::Nodes(vec![-5.0, -6.5]));
    }
}
