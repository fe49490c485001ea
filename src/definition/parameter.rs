use crate::definition::vendor::{ProvideVendorProperties, VendorProperties};
use crate::error::SchemaError;
use crate::{PROPERTIES_FIELD, REQUIRED_FIELD, TYPE_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Body,
    FormData,
}

impl ParameterLocation {
    /// Parses the value of a parameter's `in` field.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "path" => Some(ParameterLocation::Path),
            "body" => Some(ParameterLocation::Body),
            "formData" => Some(ParameterLocation::FormData),
            _ => None,
        }
    }
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
        };
        write!(f, "{}", str)
    }
}

/// One parameter of a request or response.
///
/// A `body` parameter carries the payload schema, any other location carries
/// the constraint schema of the value itself. `schema` is `None` for
/// parameters that are not validated, such as file uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    location: ParameterLocation,
    name: String,
    required: bool,
    schema: Option<Value>,
    vendor: VendorProperties,
}

impl Parameter {
    pub fn new(
        location: ParameterLocation,
        name: impl Into<String>,
        required: bool,
        schema: Option<Value>,
    ) -> Self {
        Self {
            location,
            name: name.into(),
            required,
            schema,
            vendor: VendorProperties::new(),
        }
    }

    pub(crate) fn set_vendor_properties(&mut self, vendor: VendorProperties) {
        self.vendor = vendor;
    }

    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    pub fn has_schema(&self) -> bool {
        self.schema.is_some()
    }
}

impl ProvideVendorProperties for Parameter {
    fn vendor_properties(&self) -> &VendorProperties {
        &self.vendor
    }
}

/// The ordered parameters of one message (a request or one response).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    parameters: Vec<Parameter>,
}

impl Parameters {
    /// Fails with [`SchemaError::MultipleBodyParameters`] when more than one
    /// parameter is located in the body.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, SchemaError> {
        let bodies = parameters
            .iter()
            .filter(|parameter| parameter.location == ParameterLocation::Body)
            .count();
        if bodies > 1 {
            return Err(SchemaError::MultipleBodyParameters(None));
        }
        Ok(Self { parameters })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    pub fn by_location(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |parameter| parameter.location == location)
    }

    pub fn path(&self) -> impl Iterator<Item = &Parameter> {
        self.by_location(ParameterLocation::Path)
    }

    pub fn query(&self) -> impl Iterator<Item = &Parameter> {
        self.by_location(ParameterLocation::Query)
    }

    pub fn headers(&self) -> impl Iterator<Item = &Parameter> {
        self.by_location(ParameterLocation::Header)
    }

    pub fn body(&self) -> Option<&Parameter> {
        self.by_location(ParameterLocation::Body).next()
    }

    pub fn has_body_schema(&self) -> bool {
        self.body_schema().is_some()
    }

    pub fn body_schema(&self) -> Option<&Value> {
        self.body().and_then(Parameter::schema)
    }

    pub fn has_headers_schema(&self) -> bool {
        self.has_location_schema(ParameterLocation::Header)
    }

    pub fn headers_schema(&self) -> Option<Value> {
        self.location_schema(ParameterLocation::Header)
    }

    pub fn has_query_parameters_schema(&self) -> bool {
        self.has_location_schema(ParameterLocation::Query)
    }

    pub fn query_parameters_schema(&self) -> Option<Value> {
        self.location_schema(ParameterLocation::Query)
    }

    pub fn has_path_schema(&self) -> bool {
        self.has_location_schema(ParameterLocation::Path)
    }

    pub fn path_schema(&self) -> Option<Value> {
        self.location_schema(ParameterLocation::Path)
    }

    fn has_location_schema(&self, location: ParameterLocation) -> bool {
        self.by_location(location).any(Parameter::has_schema)
    }

    /// Combines the parameters of one location into a single object schema
    /// keyed by parameter name. Parameters without a schema are left out.
    fn location_schema(&self, location: ParameterLocation) -> Option<Value> {
        if !self.has_location_schema(location) {
            return None;
        }
        let mut required = Vec::new();
        let mut properties = Map::new();
        for parameter in self.by_location(location) {
            let Some(schema) = parameter.schema() else {
                continue;
            };
            if parameter.required {
                required.push(Value::String(parameter.name.clone()));
            }
            properties.insert(parameter.name.clone(), schema.clone());
        }
        Some(json!({
            TYPE_FIELD: "object",
            REQUIRED_FIELD: required,
            PROPERTIES_FIELD: properties,
        }))
    }
}
