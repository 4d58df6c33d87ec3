//! Code generation output: content plus optional source map.

use bale_store::Blob;
use serde_json::Value;

/// What a plugin's generate capability returns for one asset.
#[derive(Debug)]
pub struct GeneratedCode {
    /// The rendered output, materialized or streaming.
    pub content: Blob,
    /// An optional source map for the rendered output.
    pub map: Option<SourceMap>,
}

/// A source map in its serializable JSON form.
///
/// The core never interprets mappings; it only persists the serialized
/// bytes next to the generated content and hands the map back to
/// consumers unchanged.
#[derive(Clone, PartialEq, Debug)]
pub struct SourceMap(Value);

impl SourceMap {
    /// Wraps a source-map JSON object.
    pub fn from_json(value: Value) -> Self {
        Self(value)
    }

    /// Returns the underlying JSON object.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Serializes the map to bytes for persistence.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bytes_is_serialized_json() {
        let map = SourceMap::from_json(serde_json::json!({"version": 3, "mappings": "AAAA"}));
        let bytes = map.to_bytes();
        let back: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(&back, map.as_json());
    }

    #[test]
    fn clone_is_equal() {
        let map = SourceMap::from_json(serde_json::json!({"version": 3}));
        assert_eq!(map.clone(), map);
    }
}
