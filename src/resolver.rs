use crate::REF_FIELD;
use crate::error::SchemaError;
use crate::loader::{DocumentFormat, read_document};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const FRAGMENT_SEPARATOR: char = '#';
const ROOT_DOCUMENT: &str = "<root>";

/// The document a node was read from, used to resolve relative references.
#[derive(Clone)]
struct Scope {
    path: Option<PathBuf>,
    document: Arc<Value>,
}

impl Scope {
    fn name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ROOT_DOCUMENT.to_string(),
        }
    }
}

/// Replaces every `$ref` node of a document with a resolved copy of its target.
///
/// Local pointers (`#/definitions/Pet`) and references into other files
/// relative to the referring document (`common.json#/definitions/Error`,
/// `pet.yaml`) are supported. Referenced files are read once per resolver.
/// Keys next to a `$ref` are ignored.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    documents: HashMap<PathBuf, Arc<Value>>,
    resolving: Vec<String>,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `root`, which was read from `base` if given. Without a base,
    /// only references local to `root` can be resolved.
    pub fn resolve(&mut self, root: &Value, base: Option<&Path>) -> Result<Value, SchemaError> {
        let path = base.map(Self::normalize);
        let document = Arc::new(root.clone());
        if let Some(path) = &path {
            self.documents.insert(path.clone(), Arc::clone(&document));
        }
        let scope = Scope { path, document };
        self.resolve_node(root, &scope)
    }

    fn normalize(path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    fn resolve_node(&mut self, node: &Value, scope: &Scope) -> Result<Value, SchemaError> {
        match node {
            Value::Object(object) => {
                if let Some(Value::String(reference)) = object.get(REF_FIELD) {
                    return self.resolve_reference(reference, scope);
                }
                let mut resolved = Map::with_capacity(object.len());
                for (key, item) in object {
                    resolved.insert(key.clone(), self.resolve_node(item, scope)?);
                }
                Ok(Value::Object(resolved))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.resolve_node(item, scope))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }

    fn resolve_reference(&mut self, reference: &str, scope: &Scope) -> Result<Value, SchemaError> {
        let (file, fragment) = reference
            .split_once(FRAGMENT_SEPARATOR)
            .unwrap_or((reference, ""));
        let target_scope = if file.is_empty() {
            scope.clone()
        } else {
            self.external_scope(reference, file, scope)?
        };

        let pointer = percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|e| SchemaError::reference_failure(reference, e))?;
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(SchemaError::reference_failure(
                reference,
                "only JSON pointer fragments are supported",
            ));
        }

        let key = format!("{}{}{}", target_scope.name(), FRAGMENT_SEPARATOR, pointer);
        if self.resolving.contains(&key) {
            return Err(SchemaError::reference_failure(
                reference,
                "the reference is circular",
            ));
        }
        let target = target_scope.document.pointer(&pointer).ok_or_else(|| {
            SchemaError::reference_failure(reference, "the referenced node does not exist")
        })?;

        log::trace!("Resolving reference '{}'", reference);
        self.resolving.push(key);
        let resolved = self.resolve_node(target, &target_scope);
        self.resolving.pop();
        resolved
    }

    fn external_scope(
        &mut self,
        reference: &str,
        file: &str,
        scope: &Scope,
    ) -> Result<Scope, SchemaError> {
        let Some(current) = &scope.path else {
            return Err(SchemaError::reference_failure(
                reference,
                "references to other files need the location of the referring document",
            ));
        };
        let directory = current.parent().unwrap_or_else(|| Path::new(""));
        let path = Self::normalize(&directory.join(file));

        if let Some(document) = self.documents.get(&path) {
            return Ok(Scope {
                path: Some(path),
                document: Arc::clone(document),
            });
        }

        let format = DocumentFormat::from_path(&path)
            .map_err(|e| SchemaError::reference_failure(reference, e))?;
        let document = Arc::new(
            read_document(&path, format).map_err(|e| SchemaError::reference_failure(reference, e))?,
        );
        log::debug!("Read referenced document '{}'", path.display());
        self.documents.insert(path.clone(), Arc::clone(&document));
        Ok(Scope {
            path: Some(path),
            document,
        })
    }
}
