use crate::definition::info::Info;
use crate::definition::request::{RequestDefinition, RequestDefinitions};
use crate::definition::security::SecurityDefinitions;
use crate::definition::vendor::{ProvideVendorProperties, VendorProperties};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SNAPSHOT_FORMAT: &str = "oaschema-snapshot";
const SNAPSHOT_VERSION: u32 = 1;

/// The model built from one API description document.
///
/// A schema is immutable once built and can be shared between threads
/// without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    info: Info,
    security_definitions: SecurityDefinitions,
    request_definitions: RequestDefinitions,
    host: Option<String>,
    base_path: String,
    schemes: Vec<String>,
    vendor: VendorProperties,
}

#[derive(Serialize)]
struct SnapshotRef<'s> {
    format: &'s str,
    version: u32,
    schema: &'s Schema,
}

#[derive(Deserialize)]
struct Snapshot {
    format: String,
    version: u32,
    schema: Schema,
}

impl Schema {
    pub(crate) fn new(
        info: Info,
        security_definitions: SecurityDefinitions,
        request_definitions: RequestDefinitions,
        host: Option<String>,
        base_path: String,
        schemes: Vec<String>,
    ) -> Self {
        Self {
            info,
            security_definitions,
            request_definitions,
            host,
            base_path,
            schemes,
            vendor: VendorProperties::new(),
        }
    }

    pub(crate) fn set_vendor_properties(&mut self, vendor: VendorProperties) {
        self.vendor = vendor;
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn security_definitions(&self) -> &SecurityDefinitions {
        &self.security_definitions
    }

    pub fn request_definitions(&self) -> &RequestDefinitions {
        &self.request_definitions
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn schemes(&self) -> &[String] {
        &self.schemes
    }

    pub fn get_request_definition(
        &self,
        operation_id: &str,
    ) -> Result<&RequestDefinition, SchemaError> {
        self.request_definitions.get(operation_id)
    }

    /// Returns the operationId of the operation matching `method` and `path`.
    ///
    /// `path` is the concrete request path including the base path, without
    /// the query string. Operations are tried in declaration order and the
    /// first template `path` conforms to wins.
    pub fn find_operation_id(&self, method: &str, path: &str) -> Result<&str, SchemaError> {
        self.find_request_definition(method, path)
            .map(|(definition, _)| definition.operation_id())
    }

    /// Like [`Self::find_operation_id`], also returning the values of the
    /// path template variables.
    pub fn find_request_definition(
        &self,
        method: &str,
        path: &str,
    ) -> Result<(&RequestDefinition, HashMap<String, String>), SchemaError> {
        let method = method.to_ascii_uppercase();
        self.request_definitions
            .iter()
            .filter(|definition| definition.method() == method)
            .find_map(|definition| {
                definition
                    .path_template()
                    .extract(path)
                    .map(|variables| (definition, variables))
            })
            .ok_or_else(|| SchemaError::NoMatchingOperation {
                method,
                path: path.to_string(),
            })
    }

    /// Encodes the whole schema so that it can be restored without the
    /// source document.
    pub fn snapshot(&self) -> Result<Vec<u8>, SchemaError> {
        let snapshot = SnapshotRef {
            format: SNAPSHOT_FORMAT,
            version: SNAPSHOT_VERSION,
            schema: self,
        };
        serde_json::to_vec(&snapshot).map_err(|e| SchemaError::Snapshot(e.to_string()))
    }

    /// Restores a schema from the output of [`Self::snapshot`].
    pub fn restore(bytes: &[u8]) -> Result<Self, SchemaError> {
        let snapshot: Snapshot =
            serde_json::from_slice(bytes).map_err(|e| SchemaError::Snapshot(e.to_string()))?;
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(SchemaError::Snapshot(format!(
                "unknown snapshot format '{}'",
                snapshot.format
            )));
        }
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SchemaError::Snapshot(format!(
                "unsupported snapshot version {}, expected {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        Ok(snapshot.schema)
    }
}

impl ProvideVendorProperties for Schema {
    fn vendor_properties(&self) -> &VendorProperties {
        &self.vendor
    }
}
