use crate::error::SchemaError;
use crate::resolver::ReferenceResolver;
use serde_json::{Map, Number, Value};
use std::fmt::{Display, Formatter};
use std::path::Path;

/// The textual formats a document can be read from, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Selects the format from the extension of `path` (`json`, `yml` or
    /// `yaml`, case-insensitive). Nothing is read from disk.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yml") | Some("yaml") => Ok(DocumentFormat::Yaml),
            _ => Err(SchemaError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parses `content` into a document tree. `source` names the content in errors.
    pub fn parse(&self, content: &str, source: &str) -> Result<Value, SchemaError> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| SchemaError::parse_failure(source, e)),
            DocumentFormat::Yaml => {
                let document: serde_yaml::Value = serde_yaml::from_str(content)
                    .map_err(|e| SchemaError::parse_failure(source, e))?;
                yaml_to_json(document, source)
            }
        }
    }
}

impl Display for DocumentFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            DocumentFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Produces the resolved document tree the factory builds a schema from.
///
/// Implementations must return a tree without `$ref` nodes.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path, format: DocumentFormat) -> Result<Value, SchemaError>;
}

/// Reads documents from the file system and resolves local and relative-file
/// references.
///
/// The whole document is resolved, `definitions` included. A model that
/// refers to itself, directly or through other models, fails the load with
/// [`SchemaError::ReferenceResolutionFailure`] even when no operation uses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDocumentLoader;

impl DocumentLoader for FileDocumentLoader {
    fn load(&self, path: &Path, format: DocumentFormat) -> Result<Value, SchemaError> {
        log::debug!("Loading {} document from '{}'", format, path.display());
        let document = read_document(path, format)?;
        ReferenceResolver::new().resolve(&document, Some(path))
    }
}

/// Reads and parses a single file without resolving its references.
pub(crate) fn read_document(path: &Path, format: DocumentFormat) -> Result<Value, SchemaError> {
    let source = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
        path: source.clone(),
        message: e.to_string(),
    })?;
    format.parse(&content, &source)
}

/// Converts a YAML tree into a JSON tree.
///
/// YAML allows non-string mapping keys (`200:` in a responses map is an
/// integer); scalar keys are converted to their string form. Two keys
/// with the same string form are rejected.
fn yaml_to_json(value: serde_yaml::Value, source: &str) -> Result<Value, SchemaError> {
    match value {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(flag) => Ok(Value::Bool(flag)),
        serde_yaml::Value::Number(number) => yaml_number(&number, source),
        serde_yaml::Value::String(text) => Ok(Value::String(text)),
        serde_yaml::Value::Sequence(items) => items
            .into_iter()
            .map(|item| yaml_to_json(item, source))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = yaml_key(key, source)?;
                if object.contains_key(&key) {
                    return Err(SchemaError::parse_failure(
                        source,
                        format!("duplicate mapping key '{key}'"),
                    ));
                }
                let item = yaml_to_json(item, source)?;
                object.insert(key, item);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value, source),
    }
}

fn yaml_number(number: &serde_yaml::Number, source: &str) -> Result<Value, SchemaError> {
    if let Some(unsigned) = number.as_u64() {
        return Ok(Value::Number(unsigned.into()));
    }
    if let Some(signed) = number.as_i64() {
        return Ok(Value::Number(signed.into()));
    }
    number
        .as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| {
            SchemaError::parse_failure(source, format!("'{number}' cannot be represented in JSON"))
        })
}

fn yaml_key(key: serde_yaml::Value, source: &str) -> Result<String, SchemaError> {
    match key {
        serde_yaml::Value::String(text) => Ok(text),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value, source),
        _ => Err(SchemaError::parse_failure(
            source,
            "mapping keys must be scalars",
        )),
    }
}
