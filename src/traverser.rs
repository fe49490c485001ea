use crate::error::SchemaError;
use crate::types::json_path::JsonPath;
use crate::types::primitive::JsonType;
use serde_json::{Map, Value};

type TraverseTypeResult<'n, T> = Result<&'n T, SchemaError>;
type TraverseOptionalResult<'n, T> = Result<Option<&'n T>, SchemaError>;

/// Typed access to the nodes of a resolved document.
///
/// Every accessor takes the [`JsonPath`] of the node it reads from so that a
/// missing field or a node of the wrong type is reported with its location.
/// A field explicitly set to `null` is treated as absent.
pub struct DocumentTraverser;

impl DocumentTraverser {
    /// Returns the field when present and not `null`.
    pub fn get_optional<'n>(node: &'n Value, field: &str) -> Option<&'n Value> {
        match node.get(field) {
            None | Some(Value::Null) => None,
            Some(found) => Some(found),
        }
    }

    /// Returns the field, failing with [`SchemaError::MissingField`] if it is absent.
    pub fn get_required<'n>(
        node: &'n Value,
        field: &str,
        at: &JsonPath,
    ) -> Result<&'n Value, SchemaError> {
        Self::get_optional(node, field).ok_or_else(|| SchemaError::missing_field(field, at))
    }

    /// Generic helper for reading an optional typed field.
    fn get_as_type<'n, T, F>(
        node: &'n Value,
        field: &str,
        at: &JsonPath,
        converter: F,
    ) -> TraverseOptionalResult<'n, T>
    where
        T: ?Sized,
        F: Fn(&'n Value, &JsonPath) -> TraverseTypeResult<'n, T>,
    {
        match Self::get_optional(node, field) {
            None => Ok(None),
            Some(found) => converter(found, &at.child(field)).map(Some),
        }
    }

    /// Generic helper for requiring a node to have a specific type.
    fn require_type<'n, T, F>(
        node: &'n Value,
        at: &JsonPath,
        converter: F,
        expected: JsonType,
    ) -> Result<T, SchemaError>
    where
        F: Fn(&'n Value) -> Option<T>,
    {
        converter(node).ok_or_else(|| SchemaError::invalid_document(at, expected, node))
    }

    pub fn get_optional_str<'n>(
        node: &'n Value,
        field: &str,
        at: &JsonPath,
    ) -> TraverseOptionalResult<'n, str> {
        Self::get_as_type(node, field, at, Self::require_str)
    }

    pub fn get_required_str<'n>(
        node: &'n Value,
        field: &str,
        at: &JsonPath,
    ) -> TraverseTypeResult<'n, str> {
        Self::get_optional_str(node, field, at)?.ok_or_else(|| SchemaError::missing_field(field, at))
    }

    pub fn get_optional_object<'n>(
        node: &'n Value,
        field: &str,
        at: &JsonPath,
    ) -> TraverseOptionalResult<'n, Map<String, Value>> {
        Self::get_as_type(node, field, at, Self::require_object)
    }

    pub fn get_optional_array<'n>(
        node: &'n Value,
        field: &str,
        at: &JsonPath,
    ) -> TraverseOptionalResult<'n, Vec<Value>> {
        Self::get_as_type(node, field, at, Self::require_array)
    }

    pub fn get_optional_bool(
        node: &Value,
        field: &str,
        at: &JsonPath,
    ) -> Result<Option<bool>, SchemaError> {
        match Self::get_optional(node, field) {
            None => Ok(None),
            Some(found) => Self::require_bool(found, &at.child(field)).map(Some),
        }
    }

    /// Reads a list of strings such as `consumes`, `produces`, `schemes` or `tags`.
    ///
    /// `Ok(None)` means the field is absent, which is distinct from an empty list.
    pub fn get_string_list(
        node: &Value,
        field: &str,
        at: &JsonPath,
    ) -> Result<Option<Vec<String>>, SchemaError> {
        let Some(items) = Self::get_optional_array(node, field, at)? else {
            return Ok(None);
        };
        let at = at.child(field);
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Self::require_str(item, &at.child(index.to_string())).map(str::to_string)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Reads a scalar as text. Numbers and booleans are accepted because YAML
    /// authors frequently write `version: 1.0` unquoted.
    pub fn get_optional_text(
        node: &Value,
        field: &str,
        at: &JsonPath,
    ) -> Result<Option<String>, SchemaError> {
        match Self::get_optional(node, field) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
            Some(other) => Err(SchemaError::invalid_document(
                &at.child(field),
                JsonType::String,
                other,
            )),
        }
    }

    pub fn require_bool(node: &Value, at: &JsonPath) -> Result<bool, SchemaError> {
        Self::require_type(node, at, Value::as_bool, JsonType::Bool)
    }

    pub fn require_str<'n>(node: &'n Value, at: &JsonPath) -> TraverseTypeResult<'n, str> {
        Self::require_type(node, at, Value::as_str, JsonType::String)
    }

    pub fn require_object<'n>(
        node: &'n Value,
        at: &JsonPath,
    ) -> TraverseTypeResult<'n, Map<String, Value>> {
        Self::require_type(node, at, Value::as_object, JsonType::Object)
    }

    pub fn require_array<'n>(node: &'n Value, at: &JsonPath) -> TraverseTypeResult<'n, Vec<Value>> {
        Self::require_type(node, at, Value::as_array, JsonType::Array)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::SchemaError;
    use crate::traverser::DocumentTraverser;
    use crate::types::json_path::JsonPath;
    use crate::types::primitive::JsonType;
    use serde_json::json;

    #[test]
    fn test_get_optional_treats_null_as_absent() {
        let node = json!({"security": null, "tags": []});
        assert!(DocumentTraverser::get_optional(&node, "security").is_none());
        assert!(DocumentTraverser::get_optional(&node, "missing").is_none());
        assert!(DocumentTraverser::get_optional(&node, "tags").is_some());
    }

    #[test]
    fn test_get_required_str_missing_field() {
        let mut at = JsonPath::new();
        at.add("info");
        let doc = json!({});
        let result = DocumentTraverser::get_required_str(&doc, "title", &at);
        match result {
            Err(SchemaError::MissingField { field, node }) => {
                assert_eq!(field, "title");
                assert_eq!(node.to_string(), "#/info");
            }
            other => panic!("Expected SchemaError::MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_require_object_with_non_object_type() {
        let doc = json!("text");
        let result = DocumentTraverser::require_object(&doc, &JsonPath::new());
        assert!(matches!(
            result,
            Err(SchemaError::InvalidDocument {
                expected: JsonType::Object,
                found: JsonType::String,
                ..
            })
        ));
    }

    #[test]
    fn test_get_string_list_absent_versus_empty() {
        let at = JsonPath::new();
        let node = json!({"consumes": []});
        assert_eq!(
            DocumentTraverser::get_string_list(&node, "consumes", &at).unwrap(),
            Some(vec![])
        );
        assert_eq!(
            DocumentTraverser::get_string_list(&node, "produces", &at).unwrap(),
            None
        );
    }

    #[test]
    fn test_get_string_list_rejects_non_string_items() {
        let node = json!({"schemes": ["https", 443]});
        match DocumentTraverser::get_string_list(&node, "schemes", &JsonPath::new()) {
            Err(SchemaError::InvalidDocument { node, found, .. }) => {
                assert_eq!(node.to_string(), "#/schemes/1");
                assert_eq!(found, JsonType::Number);
            }
            other => panic!("Expected SchemaError::InvalidDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_get_optional_text_accepts_numbers() {
        let node = json!({"version": 1.5});
        assert_eq!(
            DocumentTraverser::get_optional_text(&node, "version", &JsonPath::new()).unwrap(),
            Some("1.5".to_string())
        );
    }

    #[test]
    fn test_get_optional_bool_wrong_type() {
        let node = json!({"required": "yes"});
        let result = DocumentTraverser::get_optional_bool(&node, "required", &JsonPath::new());
        assert!(matches!(
            result,
            Err(SchemaError::InvalidDocument {
                expected: JsonType::Bool,
                ..
            })
        ));
    }
}
