use crate::definition::parameter::Parameters;
use crate::definition::response::{ResponseDefinition, ResponseStatus};
use crate::definition::security::Security;
use crate::definition::vendor::{ProvideVendorProperties, VendorProperties};
use crate::error::{Location, SchemaError};
use crate::uri_template::UriTemplate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One operation of the API: an HTTP method bound to a path template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDefinition {
    method: String,
    operation_id: String,
    summary: String,
    description: String,
    declared_path: String,
    template: UriTemplate,
    parameters: Parameters,
    content_types: Vec<String>,
    responses: Vec<ResponseDefinition>,
    securities: Vec<Security>,
    tags: Vec<String>,
    vendor: VendorProperties,
}

impl RequestDefinition {
    /// Creates an operation declared under `path`. The template used for
    /// matching is `base_path` followed by `path`.
    pub fn new(
        method: impl Into<String>,
        operation_id: impl Into<String>,
        base_path: &str,
        path: impl Into<String>,
    ) -> Self {
        let operation_id = operation_id.into();
        let declared_path = path.into();
        Self {
            method: method.into(),
            summary: operation_id.clone(),
            operation_id,
            description: String::new(),
            template: UriTemplate::parse(format!("{base_path}{declared_path}")),
            declared_path,
            parameters: Parameters::default(),
            content_types: Vec::new(),
            responses: Vec::new(),
            securities: Vec::new(),
            tags: Vec::new(),
            vendor: VendorProperties::new(),
        }
    }

    /// A missing summary falls back to the operationId.
    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        if let Some(summary) = summary {
            self.summary = summary;
        }
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.unwrap_or_default();
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_content_types(mut self, content_types: Vec<String>) -> Self {
        self.content_types = content_types;
        self
    }

    pub fn with_responses(mut self, responses: Vec<ResponseDefinition>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_securities(mut self, securities: Vec<Security>) -> Self {
        self.securities = securities;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub(crate) fn set_vendor_properties(&mut self, vendor: VendorProperties) {
        self.vendor = vendor;
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The template concrete request paths are matched against, base path included.
    pub fn path_template(&self) -> &UriTemplate {
        &self.template
    }

    /// Method and path as declared in the document, without the base path.
    pub fn location(&self) -> Location {
        Location::new(&self.method, &self.declared_path)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    pub fn responses(&self) -> impl Iterator<Item = &ResponseDefinition> {
        self.responses.iter()
    }

    pub fn securities(&self) -> &[Security] {
        &self.securities
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_response_definition(&self, status_code: u16) -> bool {
        self.get_response_definition(status_code).is_ok()
    }

    /// Returns the response declared for `status_code`, or the `default`
    /// response when the code itself is not declared.
    pub fn get_response_definition(
        &self,
        status_code: u16,
    ) -> Result<&ResponseDefinition, SchemaError> {
        let find = |status: ResponseStatus| {
            self.responses
                .iter()
                .find(|response| response.status() == status)
        };
        find(ResponseStatus::Code(status_code))
            .or_else(|| find(ResponseStatus::Default))
            .ok_or_else(|| SchemaError::UnknownStatusCode {
                operation_id: self.operation_id.clone(),
                status_code,
            })
    }

    /// Whether any accepted security requirement uses a scheme of `type_name`
    /// (`apiKey`, `oauth2`, `basic`, ...).
    pub fn supports_security_type(&self, type_name: &str) -> bool {
        self.securities
            .iter()
            .any(|security| security.scheme().type_name() == type_name)
    }

    pub fn has_body_schema(&self) -> bool {
        self.parameters.has_body_schema()
    }

    pub fn body_schema(&self) -> Option<&Value> {
        self.parameters.body_schema()
    }

    pub fn has_headers_schema(&self) -> bool {
        self.parameters.has_headers_schema()
    }

    pub fn headers_schema(&self) -> Option<Value> {
        self.parameters.headers_schema()
    }

    pub fn has_query_parameters_schema(&self) -> bool {
        self.parameters.has_query_parameters_schema()
    }

    pub fn query_parameters_schema(&self) -> Option<Value> {
        self.parameters.query_parameters_schema()
    }

    pub fn has_path_schema(&self) -> bool {
        self.parameters.has_path_schema()
    }

    pub fn path_schema(&self) -> Option<Value> {
        self.parameters.path_schema()
    }
}

impl ProvideVendorProperties for RequestDefinition {
    fn vendor_properties(&self) -> &VendorProperties {
        &self.vendor
    }
}

/// All operations of a document keyed by operationId, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<RequestDefinition>",
    into = "Vec<RequestDefinition>"
)]
pub struct RequestDefinitions {
    definitions: Vec<RequestDefinition>,
    index: HashMap<String, usize>,
}

impl RequestDefinitions {
    /// Fails with [`SchemaError::DuplicateOperationId`] if two operations
    /// share an operationId.
    pub fn new(definitions: Vec<RequestDefinition>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            if let Some(first) = index.insert(definition.operation_id.clone(), position) {
                return Err(SchemaError::DuplicateOperationId {
                    operation_id: definition.operation_id.clone(),
                    first: definitions[first].location(),
                    second: definition.location(),
                });
            }
        }
        Ok(Self { definitions, index })
    }

    pub fn get(&self, operation_id: &str) -> Result<&RequestDefinition, SchemaError> {
        self.index
            .get(operation_id)
            .and_then(|position| self.definitions.get(*position))
            .ok_or_else(|| SchemaError::UnknownOperationId(operation_id.to_string()))
    }

    pub fn contains(&self, operation_id: &str) -> bool {
        self.index.contains_key(operation_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl TryFrom<Vec<RequestDefinition>> for RequestDefinitions {
    type Error = SchemaError;

    fn try_from(definitions: Vec<RequestDefinition>) -> Result<Self, Self::Error> {
        RequestDefinitions::new(definitions)
    }
}

impl From<RequestDefinitions> for Vec<RequestDefinition> {
    fn from(definitions: RequestDefinitions) -> Self {
        definitions.definitions
    }
}
