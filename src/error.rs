use crate::types::json_path::JsonPath;
use crate::types::primitive::JsonType;
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Identifies one operation of the source document by method and path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub method: String,
    pub path: String,
}

impl Location {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq)]
pub enum SchemaErrorKind {
    /// The document (or snapshot) could not be read, parsed or resolved.
    Loading,
    /// The document was read but does not describe a valid schema.
    Document,
    /// A query against an already built schema found nothing.
    Lookup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    UnsupportedFormat(String),
    Io {
        path: String,
        message: String,
    },
    Parse {
        source: String,
        message: String,
    },
    ReferenceResolutionFailure {
        reference: String,
        message: String,
    },
    Snapshot(String),

    MissingTitleOrVersion(String),
    MissingField {
        field: String,
        node: JsonPath,
    },
    InvalidDocument {
        node: JsonPath,
        expected: JsonType,
        found: JsonType,
    },
    InvalidSecurityScheme {
        key: String,
        reason: String,
    },
    InvalidParameterLocation {
        location: String,
        node: JsonPath,
    },
    InvalidStatusCode {
        status: String,
        location: Location,
    },
    DuplicateStatusCode {
        status: String,
        location: Location,
    },
    MultipleBodyParameters(Option<Location>),
    MissingOperationId(Location),
    MissingContentType(Location),
    MissingResponses(Location),
    DuplicateOperationId {
        operation_id: String,
        first: Location,
        second: Location,
    },
    UnknownSecurityScheme {
        key: String,
        location: Option<Location>,
    },

    UnknownVendorProperty(String),
    InvalidVendorProperty {
        name: String,
        message: String,
    },
    UnknownStatusCode {
        operation_id: String,
        status_code: u16,
    },
    NoMatchingOperation {
        method: String,
        path: String,
    },
    UnknownOperationId(String),
}

impl SchemaError {
    pub(crate) fn missing_field(field: impl Into<String>, node: &JsonPath) -> Self {
        SchemaError::MissingField {
            field: field.into(),
            node: node.clone(),
        }
    }

    pub(crate) fn invalid_document(node: &JsonPath, expected: JsonType, found: &Value) -> Self {
        SchemaError::InvalidDocument {
            node: node.clone(),
            expected,
            found: JsonType::of(found),
        }
    }

    pub(crate) fn invalid_security_scheme(key: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidSecurityScheme {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn reference_failure(reference: &str, message: impl ToString) -> Self {
        SchemaError::ReferenceResolutionFailure {
            reference: reference.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse_failure(source: impl Into<String>, message: impl ToString) -> Self {
        SchemaError::Parse {
            source: source.into(),
            message: message.to_string(),
        }
    }

    /// Attaches the operation a model-level error was raised for.
    ///
    /// Only variants carrying an optional location are affected.
    pub(crate) fn at(self, location: &Location) -> Self {
        match self {
            SchemaError::UnknownSecurityScheme {
                key,
                location: None,
            } => SchemaError::UnknownSecurityScheme {
                key,
                location: Some(location.clone()),
            },
            SchemaError::MultipleBodyParameters(None) => {
                SchemaError::MultipleBodyParameters(Some(location.clone()))
            }
            other => other,
        }
    }

    pub fn kind(&self) -> SchemaErrorKind {
        match self {
            SchemaError::UnsupportedFormat(_)
            | SchemaError::Io { .. }
            | SchemaError::Parse { .. }
            | SchemaError::ReferenceResolutionFailure { .. }
            | SchemaError::Snapshot(_) => SchemaErrorKind::Loading,

            SchemaError::MissingTitleOrVersion(_)
            | SchemaError::MissingField { .. }
            | SchemaError::InvalidDocument { .. }
            | SchemaError::InvalidSecurityScheme { .. }
            | SchemaError::InvalidParameterLocation { .. }
            | SchemaError::InvalidStatusCode { .. }
            | SchemaError::DuplicateStatusCode { .. }
            | SchemaError::MultipleBodyParameters(_)
            | SchemaError::MissingOperationId(_)
            | SchemaError::MissingContentType(_)
            | SchemaError::MissingResponses(_)
            | SchemaError::DuplicateOperationId { .. }
            | SchemaError::UnknownSecurityScheme { .. } => SchemaErrorKind::Document,

            SchemaError::UnknownVendorProperty(_)
            | SchemaError::InvalidVendorProperty { .. }
            | SchemaError::UnknownStatusCode { .. }
            | SchemaError::NoMatchingOperation { .. }
            | SchemaError::UnknownOperationId(_) => SchemaErrorKind::Lookup,
        }
    }

    /// The operation the error was raised for, when it concerns a single operation.
    pub fn location(&self) -> Option<&Location> {
        match self {
            SchemaError::MissingOperationId(location)
            | SchemaError::MissingContentType(location)
            | SchemaError::MissingResponses(location)
            | SchemaError::InvalidStatusCode { location, .. }
            | SchemaError::DuplicateStatusCode { location, .. } => Some(location),
            SchemaError::DuplicateOperationId { second, .. } => Some(second),
            SchemaError::MultipleBodyParameters(location)
            | SchemaError::UnknownSecurityScheme { location, .. } => location.as_ref(),
            _ => None,
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::UnsupportedFormat(file) => write!(
                f,
                "UnsupportedFormat: file '{file}' does not provide a supported extension, choose either json, yml or yaml"
            ),
            SchemaError::Io { path, message } => {
                write!(f, "Io: unable to read '{path}': {message}")
            }
            SchemaError::Parse { source, message } => {
                write!(f, "Parse: unable to parse '{source}': {message}")
            }
            SchemaError::ReferenceResolutionFailure { reference, message } => {
                write!(
                    f,
                    "ReferenceResolutionFailure: unable to resolve '{reference}': {message}"
                )
            }
            SchemaError::Snapshot(msg) => write!(f, "Snapshot: {msg}"),
            SchemaError::MissingTitleOrVersion(field) => {
                write!(f, "MissingTitleOrVersion: info.{field} must be a non-empty string")
            }
            SchemaError::MissingField { field, node } => {
                write!(f, "MissingField: {node} is missing required field '{field}'")
            }
            SchemaError::InvalidDocument {
                node,
                expected,
                found,
            } => write!(
                f,
                "InvalidDocument: expected {node} to be '{expected}' but '{found}' was found"
            ),
            SchemaError::InvalidSecurityScheme { key, reason } => {
                write!(f, "InvalidSecurityScheme: security scheme '{key}' {reason}")
            }
            SchemaError::InvalidParameterLocation { location, node } => {
                write!(
                    f,
                    "InvalidParameterLocation: '{location}' at {node} is not a parameter location"
                )
            }
            SchemaError::InvalidStatusCode { status, location } => {
                write!(
                    f,
                    "InvalidStatusCode: '{status}' is not a status code for {location}"
                )
            }
            SchemaError::DuplicateStatusCode { status, location } => {
                write!(
                    f,
                    "DuplicateStatusCode: {location} declares more than one response for '{status}'"
                )
            }
            SchemaError::MultipleBodyParameters(location) => match location {
                Some(location) => write!(
                    f,
                    "MultipleBodyParameters: {location} declares more than one body parameter"
                ),
                None => write!(
                    f,
                    "MultipleBodyParameters: more than one body parameter declared"
                ),
            },
            SchemaError::MissingOperationId(location) => {
                write!(
                    f,
                    "MissingOperationId: you need to provide an operationId for {location}"
                )
            }
            SchemaError::MissingContentType(location) => {
                write!(
                    f,
                    "MissingContentType: you need to specify at least one content type for {location}"
                )
            }
            SchemaError::MissingResponses(location) => {
                write!(
                    f,
                    "MissingResponses: you need to specify at least one response for {location}"
                )
            }
            SchemaError::DuplicateOperationId {
                operation_id,
                first,
                second,
            } => write!(
                f,
                "DuplicateOperationId: '{operation_id}' is declared by both {first} and {second}"
            ),
            SchemaError::UnknownSecurityScheme { key, location } => match location {
                Some(location) => write!(
                    f,
                    "UnknownSecurityScheme: no security scheme found for '{key}' required by {location}"
                ),
                None => write!(
                    f,
                    "UnknownSecurityScheme: no security scheme found for '{key}'"
                ),
            },
            SchemaError::UnknownVendorProperty(name) => {
                write!(
                    f,
                    "UnknownVendorProperty: the vendor property '{name}' does not exist"
                )
            }
            SchemaError::InvalidVendorProperty { name, message } => {
                write!(
                    f,
                    "InvalidVendorProperty: the vendor property '{name}' cannot be converted: {message}"
                )
            }
            SchemaError::UnknownStatusCode {
                operation_id,
                status_code,
            } => write!(
                f,
                "UnknownStatusCode: no response definition for '{operation_id}' is available for status code {status_code}"
            ),
            SchemaError::NoMatchingOperation { method, path } => {
                write!(
                    f,
                    "NoMatchingOperation: unable to resolve the operationId for {method} {path}"
                )
            }
            SchemaError::UnknownOperationId(operation_id) => {
                write!(
                    f,
                    "UnknownOperationId: unable to get the request definition for '{operation_id}'"
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}
