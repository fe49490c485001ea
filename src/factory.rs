use crate::definition::parameter::{Parameter, ParameterLocation, Parameters};
use crate::definition::request::{RequestDefinition, RequestDefinitions};
use crate::definition::response::{ResponseDefinition, ResponseStatus};
use crate::definition::security::{
    API_KEY_TYPE, BASIC_TYPE, OAUTH2_TYPE, Security, SecurityDefinitions, SecurityScheme,
};
use crate::definition::info::Info;
use crate::definition::vendor::VendorProperties;
use crate::error::{Location, SchemaError};
use crate::loader::{DocumentFormat, DocumentLoader, FileDocumentLoader};
use crate::resolver::ReferenceResolver;
use crate::schema::Schema;
use crate::traverser::DocumentTraverser;
use crate::types::json_path::JsonPath;
use crate::types::primitive::JsonType;
use crate::{
    AUTHORIZATION_URL_FIELD, BASE_PATH_FIELD, CONSUMES_FIELD, DEFAULT_SCHEME,
    DEFAULT_VENDOR_PREFIX, DESCRIPTION_FIELD, FILE_TYPE, FLOW_FIELD, FORMAT_FIELD, HEADERS_FIELD,
    HOST_FIELD, IN_FIELD, INFO_FIELD, NAME_FIELD, OPERATION_ID_FIELD, PARAMETERS_FIELD,
    PATHS_FIELD, PRODUCES_FIELD, REF_FIELD, REQUIRED_FIELD, RESPONSES_FIELD, SCHEMA_FIELD,
    SCHEMES_FIELD, SCOPES_FIELD, SECURITY_DEFINITIONS_FIELD, SECURITY_FIELD, SUMMARY_FIELD,
    TAGS_FIELD, TITLE_FIELD, TOKEN_URL_FIELD, TYPE_FIELD, VERSION_FIELD,
};
use http::Method;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// The path item keys that declare an operation.
static OPERATION_METHODS: [Method; 7] = [
    Method::GET,
    Method::PUT,
    Method::POST,
    Method::DELETE,
    Method::OPTIONS,
    Method::HEAD,
    Method::PATCH,
];
const BODY_PARAMETER_NAME: &str = "body";
const INLINE_SOURCE: &str = "<inline>";

/// Which content types a response definition carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseContentTypePolicy {
    /// Always the document-level `produces` list, even when the response
    /// declares its own.
    #[default]
    DocumentDefault,
    /// The response's own `produces` list when present, else the document-level one.
    Declared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryOptions {
    vendor_prefix: String,
    response_content_types: ResponseContentTypePolicy,
    merge_path_parameters: bool,
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            vendor_prefix: DEFAULT_VENDOR_PREFIX.to_string(),
            response_content_types: ResponseContentTypePolicy::default(),
            merge_path_parameters: true,
        }
    }
}

impl FactoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys starting with `prefix` are collected as vendor extensions.
    pub fn with_vendor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.vendor_prefix = prefix.into();
        self
    }

    pub fn with_response_content_types(mut self, policy: ResponseContentTypePolicy) -> Self {
        self.response_content_types = policy;
        self
    }

    /// Whether parameters declared on a path item apply to each of its operations.
    pub fn with_merge_path_parameters(mut self, merge: bool) -> Self {
        self.merge_path_parameters = merge;
        self
    }

    pub fn vendor_prefix(&self) -> &str {
        &self.vendor_prefix
    }

    pub fn response_content_types(&self) -> ResponseContentTypePolicy {
        self.response_content_types
    }

    pub fn merge_path_parameters(&self) -> bool {
        self.merge_path_parameters
    }
}

/// Document-level values operations fall back to.
struct DocumentDefaults {
    base_path: String,
    consumes: Vec<String>,
    produces: Vec<String>,
    securities: Vec<Security>,
}

/// Builds a [`Schema`] from a Swagger 2.0 document.
///
/// Every build is a single pass over a resolved document. Any error aborts
/// the build; no partially built schema is returned.
pub struct SchemaFactory {
    loader: Box<dyn DocumentLoader>,
    options: FactoryOptions,
}

impl Default for SchemaFactory {
    fn default() -> Self {
        Self::new(FactoryOptions::default())
    }
}

impl SchemaFactory {
    pub fn new(options: FactoryOptions) -> Self {
        Self::with_loader(FileDocumentLoader, options)
    }

    /// Uses `loader` to read and resolve documents passed to [`Self::create_schema`].
    pub fn with_loader(loader: impl DocumentLoader + 'static, options: FactoryOptions) -> Self {
        Self {
            loader: Box::new(loader),
            options,
        }
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Loads the document at `path` and builds its schema.
    ///
    /// The format is chosen from the file extension before the loader is
    /// invoked, so an unsupported extension fails without any I/O.
    pub fn create_schema(&self, path: impl AsRef<Path>) -> Result<Schema, SchemaError> {
        let path = path.as_ref();
        let format = DocumentFormat::from_path(path)?;
        let document = self.loader.load(path, format)?;
        self.create_schema_from_value(&document)
    }

    /// Parses `content` and builds its schema. Only references local to the
    /// document can be resolved.
    ///
    /// As with [`FileDocumentLoader`], every reference in the document is
    /// inlined, so a self-referencing model anywhere in it fails the build
    /// with [`SchemaError::ReferenceResolutionFailure`].
    pub fn create_schema_from_str(
        &self,
        content: &str,
        format: DocumentFormat,
    ) -> Result<Schema, SchemaError> {
        let document = format.parse(content, INLINE_SOURCE)?;
        let document = ReferenceResolver::new().resolve(&document, None)?;
        self.create_schema_from_value(&document)
    }

    /// Builds a schema from a document tree that no longer contains `$ref` nodes.
    pub fn create_schema_from_value(&self, document: &Value) -> Result<Schema, SchemaError> {
        let root = JsonPath::new();
        let object = DocumentTraverser::require_object(document, &root)?;

        let info = Self::create_info(document, &root)?;
        let host = DocumentTraverser::get_optional_str(document, HOST_FIELD, &root)?
            .map(str::to_string);
        let base_path = DocumentTraverser::get_optional_str(document, BASE_PATH_FIELD, &root)?
            .unwrap_or_default()
            .to_string();
        let schemes = DocumentTraverser::get_string_list(document, SCHEMES_FIELD, &root)?
            .unwrap_or_else(|| vec![DEFAULT_SCHEME.to_string()]);
        let security_definitions = Self::create_security_definitions(document, &root)?;

        let defaults = DocumentDefaults {
            base_path: base_path.clone(),
            consumes: DocumentTraverser::get_string_list(document, CONSUMES_FIELD, &root)?
                .unwrap_or_default(),
            produces: DocumentTraverser::get_string_list(document, PRODUCES_FIELD, &root)?
                .unwrap_or_default(),
            securities: Self::create_securities(document, &root, &security_definitions)?
                .unwrap_or_default(),
        };
        let request_definitions =
            self.create_request_definitions(document, &root, &defaults, &security_definitions)?;

        log::debug!(
            "Built schema '{}' {} with {} operation(s) and {} security scheme(s)",
            info.title(),
            info.version(),
            request_definitions.len(),
            security_definitions.len()
        );

        let mut schema = Schema::new(
            info,
            security_definitions,
            request_definitions,
            host,
            base_path,
            schemes,
        );
        schema.set_vendor_properties(self.vendor_properties(object));
        Ok(schema)
    }

    fn vendor_properties(&self, object: &Map<String, Value>) -> VendorProperties {
        VendorProperties::collect(object, &self.options.vendor_prefix)
    }

    fn create_info(document: &Value, root: &JsonPath) -> Result<Info, SchemaError> {
        let Some(info) = DocumentTraverser::get_optional(document, INFO_FIELD) else {
            return Err(SchemaError::MissingTitleOrVersion(TITLE_FIELD.to_string()));
        };
        let at = root.child(INFO_FIELD);
        DocumentTraverser::require_object(info, &at)?;
        let title = DocumentTraverser::get_optional_text(info, TITLE_FIELD, &at)?;
        let version = DocumentTraverser::get_optional_text(info, VERSION_FIELD, &at)?;
        let description = DocumentTraverser::get_optional_str(info, DESCRIPTION_FIELD, &at)?
            .map(str::to_string);
        Info::new(
            title.unwrap_or_default(),
            version.unwrap_or_default(),
            description,
        )
    }

    fn create_security_definitions(
        document: &Value,
        root: &JsonPath,
    ) -> Result<SecurityDefinitions, SchemaError> {
        let Some(definitions) =
            DocumentTraverser::get_optional_object(document, SECURITY_DEFINITIONS_FIELD, root)?
        else {
            return Ok(SecurityDefinitions::default());
        };
        let at = root.child(SECURITY_DEFINITIONS_FIELD);
        let schemes = definitions
            .iter()
            .map(|(key, scheme)| Self::create_security_scheme(key, scheme, &at.child(key)))
            .collect::<Result<Vec<_>, _>>()?;
        SecurityDefinitions::new(schemes)
    }

    fn create_security_scheme(
        key: &str,
        node: &Value,
        at: &JsonPath,
    ) -> Result<SecurityScheme, SchemaError> {
        DocumentTraverser::require_object(node, at)?;
        let type_name = DocumentTraverser::get_required_str(node, TYPE_FIELD, at)?;
        let optional = |field: &str| -> Result<Option<String>, SchemaError> {
            Ok(DocumentTraverser::get_optional_str(node, field, at)?.map(str::to_string))
        };

        let scheme = match type_name {
            API_KEY_TYPE => SecurityScheme::api_key(
                key,
                optional(NAME_FIELD)?,
                DocumentTraverser::get_optional_str(node, IN_FIELD, at)?,
            )?,
            OAUTH2_TYPE => {
                let mut scopes = BTreeMap::new();
                if let Some(declared) =
                    DocumentTraverser::get_optional_object(node, SCOPES_FIELD, at)?
                {
                    let scopes_at = at.child(SCOPES_FIELD);
                    for (scope, description) in declared {
                        let description =
                            DocumentTraverser::require_str(description, &scopes_at.child(scope))?;
                        scopes.insert(scope.clone(), description.to_string());
                    }
                }
                SecurityScheme::oauth2(
                    key,
                    DocumentTraverser::get_optional_str(node, FLOW_FIELD, at)?,
                    optional(AUTHORIZATION_URL_FIELD)?,
                    optional(TOKEN_URL_FIELD)?,
                    scopes,
                )?
            }
            BASIC_TYPE => SecurityScheme::basic(key),
            other => SecurityScheme::other(key, other),
        };
        Ok(scheme.with_description(optional(DESCRIPTION_FIELD)?))
    }

    /// Reads the `security` requirement list of `node`.
    ///
    /// `Ok(None)` means the list is absent, which is distinct from an empty
    /// list. All keys of every requirement object are flattened into one list;
    /// a key seen twice keeps its first position with the later scopes.
    fn create_securities(
        node: &Value,
        at: &JsonPath,
        definitions: &SecurityDefinitions,
    ) -> Result<Option<Vec<Security>>, SchemaError> {
        let Some(requirements) = DocumentTraverser::get_optional_array(node, SECURITY_FIELD, at)?
        else {
            return Ok(None);
        };
        let at = at.child(SECURITY_FIELD);
        let mut securities: Vec<Security> = Vec::new();
        for (index, requirement) in requirements.iter().enumerate() {
            let requirement_at = at.child(index.to_string());
            let keys = DocumentTraverser::require_object(requirement, &requirement_at)?;
            for key in keys.keys() {
                let scopes = DocumentTraverser::get_string_list(requirement, key, &requirement_at)?
                    .unwrap_or_default();
                let security = definitions.requirement(key, scopes)?;
                match securities.iter_mut().find(|existing| existing.key() == key) {
                    Some(existing) => *existing = security,
                    None => securities.push(security),
                }
            }
        }
        Ok(Some(securities))
    }

    fn create_request_definitions(
        &self,
        document: &Value,
        root: &JsonPath,
        defaults: &DocumentDefaults,
        security_definitions: &SecurityDefinitions,
    ) -> Result<RequestDefinitions, SchemaError> {
        let Some(paths) = DocumentTraverser::get_optional_object(document, PATHS_FIELD, root)?
        else {
            return Ok(RequestDefinitions::default());
        };
        let paths_at = root.child(PATHS_FIELD);
        let mut definitions = Vec::new();

        for (path, item) in paths {
            let item_at = paths_at.child(path);
            let operations = DocumentTraverser::require_object(item, &item_at)?;
            let shared = if self.options.merge_path_parameters {
                self.create_parameter_list(item, &item_at)?
            } else {
                Vec::new()
            };

            for (key, operation) in operations {
                let Some(method) = OPERATION_METHODS
                    .iter()
                    .find(|method| method.as_str().eq_ignore_ascii_case(key))
                else {
                    if key != PARAMETERS_FIELD
                        && key != REF_FIELD
                        && !key.starts_with(&self.options.vendor_prefix)
                    {
                        log::warn!("Skipping unrecognized key '{}' of path '{}'", key, path);
                    }
                    continue;
                };
                let definition = self.create_request_definition(
                    method,
                    path,
                    operation,
                    &item_at.child(key),
                    &shared,
                    defaults,
                    security_definitions,
                )?;
                definitions.push(definition);
            }
        }

        RequestDefinitions::new(definitions)
    }

    #[allow(clippy::too_many_arguments)]
    fn create_request_definition(
        &self,
        method: &Method,
        path: &str,
        operation: &Value,
        at: &JsonPath,
        shared: &[Parameter],
        defaults: &DocumentDefaults,
        security_definitions: &SecurityDefinitions,
    ) -> Result<RequestDefinition, SchemaError> {
        let location = Location::new(method.as_str(), path);
        let object = DocumentTraverser::require_object(operation, at)?;

        let operation_id = DocumentTraverser::get_optional_str(operation, OPERATION_ID_FIELD, at)?
            .ok_or_else(|| SchemaError::MissingOperationId(location.clone()))?;

        let content_types = DocumentTraverser::get_string_list(operation, CONSUMES_FIELD, at)?
            .unwrap_or_else(|| defaults.consumes.clone());
        if content_types.is_empty() {
            return Err(SchemaError::MissingContentType(location));
        }

        let securities = Self::create_securities(operation, at, security_definitions)
            .map_err(|e| e.at(&location))?
            .unwrap_or_else(|| defaults.securities.clone());

        let responses = match DocumentTraverser::get_optional_object(operation, RESPONSES_FIELD, at)? {
            Some(responses) if !responses.is_empty() => responses,
            _ => return Err(SchemaError::MissingResponses(location)),
        };

        let parameters = self
            .create_operation_parameters(operation, at, shared)
            .map_err(|e| e.at(&location))?;

        let responses_at = at.child(RESPONSES_FIELD);
        let mut definitions: Vec<ResponseDefinition> = Vec::with_capacity(responses.len());
        for (status, response) in responses {
            let definition = self.create_response_definition(
                status,
                response,
                &responses_at.child(status),
                &location,
                defaults,
            )?;
            // "200" and "0200" name the same status
            if definitions.iter().any(|d| d.status() == definition.status()) {
                return Err(SchemaError::DuplicateStatusCode {
                    status: status.to_string(),
                    location,
                });
            }
            definitions.push(definition);
        }
        let responses = definitions;

        let summary = DocumentTraverser::get_optional_str(operation, SUMMARY_FIELD, at)?
            .map(str::to_string);
        let description = DocumentTraverser::get_optional_str(operation, DESCRIPTION_FIELD, at)?
            .map(str::to_string);
        let tags = DocumentTraverser::get_string_list(operation, TAGS_FIELD, at)?
            .unwrap_or_default();

        let mut definition =
            RequestDefinition::new(method.as_str(), operation_id, &defaults.base_path, path)
                .with_summary(summary)
                .with_description(description)
                .with_parameters(parameters)
                .with_content_types(content_types)
                .with_responses(responses)
                .with_securities(securities)
                .with_tags(tags);
        definition.set_vendor_properties(self.vendor_properties(object));

        log::trace!(
            "Built operation '{}' for {} {}",
            definition.operation_id(),
            location,
            definition.path_template().template()
        );
        Ok(definition)
    }

    /// Path-level parameters first, each replaced by an operation parameter
    /// with the same location and name.
    fn create_operation_parameters(
        &self,
        operation: &Value,
        at: &JsonPath,
        shared: &[Parameter],
    ) -> Result<Parameters, SchemaError> {
        let own = self.create_parameter_list(operation, at)?;
        let mut parameters: Vec<Parameter> = shared
            .iter()
            .filter(|inherited| {
                !own.iter().any(|parameter| {
                    parameter.location() == inherited.location()
                        && parameter.name() == inherited.name()
                })
            })
            .cloned()
            .collect();
        parameters.extend(own);
        Parameters::new(parameters)
    }

    fn create_parameter_list(
        &self,
        node: &Value,
        at: &JsonPath,
    ) -> Result<Vec<Parameter>, SchemaError> {
        let Some(parameters) = DocumentTraverser::get_optional_array(node, PARAMETERS_FIELD, at)?
        else {
            return Ok(Vec::new());
        };
        let at = at.child(PARAMETERS_FIELD);
        parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| self.create_parameter(parameter, &at.child(index.to_string())))
            .collect()
    }

    fn create_parameter(&self, node: &Value, at: &JsonPath) -> Result<Parameter, SchemaError> {
        let object = DocumentTraverser::require_object(node, at)?;
        let location = DocumentTraverser::get_required_str(node, IN_FIELD, at)?;
        let location = ParameterLocation::from_name(location).ok_or_else(|| {
            SchemaError::InvalidParameterLocation {
                location: location.to_string(),
                node: at.child(IN_FIELD),
            }
        })?;
        let name = DocumentTraverser::get_required_str(node, NAME_FIELD, at)?;
        let required = DocumentTraverser::get_optional_bool(node, REQUIRED_FIELD, at)?
            .unwrap_or(false);
        self.build_parameter(location, name, required, object, at)
    }

    /// Builds a parameter whose schema is its `schema` field with every other
    /// non-vendor key merged in. A parameter of type or format `file` gets no
    /// schema at all.
    fn build_parameter(
        &self,
        location: ParameterLocation,
        name: &str,
        required: bool,
        object: &Map<String, Value>,
        at: &JsonPath,
    ) -> Result<Parameter, SchemaError> {
        let mut schema = match object.get(SCHEMA_FIELD) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(schema)) => schema.clone(),
            Some(other) => {
                return Err(SchemaError::invalid_document(
                    &at.child(SCHEMA_FIELD),
                    JsonType::Object,
                    other,
                ));
            }
        };
        for (key, value) in object {
            let reserved = matches!(
                key.as_str(),
                IN_FIELD | NAME_FIELD | REQUIRED_FIELD | SCHEMA_FIELD
            );
            if reserved || key.starts_with(&self.options.vendor_prefix) {
                continue;
            }
            schema.insert(key.clone(), value.clone());
        }

        let is_file = [TYPE_FIELD, FORMAT_FIELD]
            .iter()
            .any(|field| schema.get(*field).and_then(Value::as_str) == Some(FILE_TYPE));
        let schema = if is_file {
            None
        } else {
            Some(Value::Object(schema))
        };

        let mut parameter = Parameter::new(location, name, required, schema);
        parameter.set_vendor_properties(self.vendor_properties(object));
        Ok(parameter)
    }

    fn create_response_definition(
        &self,
        status: &str,
        response: &Value,
        at: &JsonPath,
        location: &Location,
        defaults: &DocumentDefaults,
    ) -> Result<ResponseDefinition, SchemaError> {
        let status_code =
            ResponseStatus::parse(status).ok_or_else(|| SchemaError::InvalidStatusCode {
                status: status.to_string(),
                location: location.clone(),
            })?;
        let object = DocumentTraverser::require_object(response, at)?;

        let mut parameters = Vec::new();
        if let Some(schema) = DocumentTraverser::get_optional(response, SCHEMA_FIELD) {
            let mut body = Map::new();
            body.insert(SCHEMA_FIELD.to_string(), schema.clone());
            parameters.push(self.build_parameter(
                ParameterLocation::Body,
                BODY_PARAMETER_NAME,
                true,
                &body,
                at,
            )?);
        }
        if let Some(headers) = DocumentTraverser::get_optional_object(response, HEADERS_FIELD, at)? {
            let headers_at = at.child(HEADERS_FIELD);
            for (name, header) in headers {
                let header_at = headers_at.child(name);
                let header = DocumentTraverser::require_object(header, &header_at)?;
                parameters.push(self.build_parameter(
                    ParameterLocation::Header,
                    name,
                    true,
                    header,
                    &header_at,
                )?);
            }
        }

        let declared = DocumentTraverser::get_string_list(response, PRODUCES_FIELD, at)?;
        let content_types = match (self.options.response_content_types, declared) {
            (ResponseContentTypePolicy::Declared, Some(declared)) => declared,
            _ => defaults.produces.clone(),
        };

        let parameters = Parameters::new(parameters).map_err(|e| e.at(location))?;
        let mut definition = ResponseDefinition::new(status_code, content_types, parameters);
        definition.set_vendor_properties(self.vendor_properties(object));
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use crate::definition::parameter::ParameterLocation;
    use crate::definition::response::ResponseStatus;
    use crate::definition::vendor::ProvideVendorProperties;
    use crate::error::{Location, SchemaError};
    use crate::factory::{FactoryOptions, ResponseContentTypePolicy, SchemaFactory};
    use crate::loader::{DocumentFormat, DocumentLoader};
    use crate::types::json_path::JsonPath;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::path::Path;

    fn document(paths: Value) -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "consumes": ["application/json"],
            "produces": ["application/json"],
            "securityDefinitions": {
                "api_key": {"type": "apiKey", "name": "X-API-Key", "in": "header"},
                "petstore_auth": {
                    "type": "oauth2",
                    "flow": "implicit",
                    "authorizationUrl": "https://petstore.example/oauth/dialog",
                    "scopes": {"read:pets": "read your pets", "write:pets": "modify pets"}
                }
            },
            "security": [{"api_key": []}],
            "paths": paths
        })
    }

    fn build(document: &Value) -> Result<crate::schema::Schema, SchemaError> {
        SchemaFactory::default().create_schema_from_value(document)
    }

    #[test]
    fn test_document_level_values() {
        let schema = build(&document(json!({}))).unwrap();
        assert_eq!(schema.info().title(), "Petstore");
        assert_eq!(schema.info().description(), "");
        assert_eq!(schema.host(), None);
        assert_eq!(schema.base_path(), "");
        assert_eq!(schema.schemes(), ["http"]);
        assert_eq!(schema.security_definitions().len(), 2);
        assert!(schema.request_definitions().is_empty());
    }

    #[test]
    fn test_missing_title_or_version() {
        let mut doc = document(json!({}));
        doc["info"] = json!({"title": "Petstore"});
        assert_eq!(
            build(&doc).err(),
            Some(SchemaError::MissingTitleOrVersion("version".to_string()))
        );

        doc.as_object_mut().unwrap().remove("info");
        assert_eq!(
            build(&doc).err(),
            Some(SchemaError::MissingTitleOrVersion("title".to_string()))
        );
    }

    #[test]
    fn test_numeric_version_is_accepted() {
        let mut doc = document(json!({}));
        doc["info"]["version"] = json!(2);
        assert_eq!(build(&doc).unwrap().info().version(), "2");
    }

    #[test]
    fn test_content_types_inherit_document_default() {
        let schema = build(&document(json!({
            "/pets": {
                "get": {"operationId": "listPets", "responses": {"200": {}}},
                "post": {
                    "operationId": "createPet",
                    "consumes": ["application/xml"],
                    "responses": {"201": {}}
                }
            }
        })))
        .unwrap();
        let list = schema.get_request_definition("listPets").unwrap();
        assert_eq!(list.content_types(), ["application/json"]);
        let create = schema.get_request_definition("createPet").unwrap();
        assert_eq!(create.content_types(), ["application/xml"]);
    }

    #[test]
    fn test_security_inheritance() {
        let schema = build(&document(json!({
            "/pets": {
                "get": {"operationId": "listPets", "responses": {"200": {}}},
                "post": {
                    "operationId": "createPet",
                    "security": [{"petstore_auth": ["write:pets", "read:pets"]}],
                    "responses": {"201": {}}
                },
                "delete": {"operationId": "deletePets", "security": [], "responses": {"204": {}}}
            }
        })))
        .unwrap();

        let list = schema.get_request_definition("listPets").unwrap();
        assert_eq!(list.securities().len(), 1);
        assert_eq!(list.securities()[0].key(), "api_key");
        assert!(list.supports_security_type("apiKey"));

        let create = schema.get_request_definition("createPet").unwrap();
        assert_eq!(create.securities().len(), 1);
        assert_eq!(create.securities()[0].scopes(), ["write:pets", "read:pets"]);
        assert!(create.supports_security_type("oauth2"));
        assert!(!create.supports_security_type("apiKey"));

        let delete = schema.get_request_definition("deletePets").unwrap();
        assert!(delete.securities().is_empty());
    }

    #[test]
    fn test_unknown_security_scheme() {
        let result = build(&document(json!({
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "security": [{"basic_auth": []}],
                    "responses": {"200": {}}
                }
            }
        })));
        assert_eq!(
            result.err(),
            Some(SchemaError::UnknownSecurityScheme {
                key: "basic_auth".to_string(),
                location: Some(Location::new("GET", "/pets")),
            })
        );
    }

    #[test]
    fn test_unknown_document_security_scheme() {
        let mut doc = document(json!({}));
        doc["security"] = json!([{"missing": []}]);
        assert!(matches!(
            build(&doc),
            Err(SchemaError::UnknownSecurityScheme { location: None, .. })
        ));
    }

    #[test]
    fn test_invalid_security_scheme_shape() {
        let mut doc = document(json!({}));
        doc["securityDefinitions"]["password"] = json!({"type": "oauth2", "flow": "password"});
        assert!(matches!(
            build(&doc),
            Err(SchemaError::InvalidSecurityScheme { key, .. }) if key == "password"
        ));

        let mut doc = document(json!({}));
        doc["securityDefinitions"]["key"] = json!({"type": "apiKey", "in": "header"});
        assert!(matches!(
            build(&doc),
            Err(SchemaError::InvalidSecurityScheme { key, .. }) if key == "key"
        ));
    }

    #[test]
    fn test_missing_operation_id() {
        let result = build(&document(json!({
            "/pets/{id}": {"get": {"responses": {"200": {}}}}
        })));
        assert_eq!(
            result.err(),
            Some(SchemaError::MissingOperationId(Location::new("GET", "/pets/{id}")))
        );
    }

    #[test]
    fn test_missing_content_type() {
        let result = build(&document(json!({
            "/pets": {"post": {"operationId": "createPet", "consumes": [], "responses": {"201": {}}}}
        })));
        assert_eq!(
            result.err(),
            Some(SchemaError::MissingContentType(Location::new("POST", "/pets")))
        );

        let mut doc = document(json!({
            "/pets": {"get": {"operationId": "listPets", "responses": {"200": {}}}}
        }));
        doc.as_object_mut().unwrap().remove("consumes");
        assert_eq!(
            build(&doc).err(),
            Some(SchemaError::MissingContentType(Location::new("GET", "/pets")))
        );
    }

    #[test]
    fn test_missing_responses() {
        for operation in [
            json!({"operationId": "listPets"}),
            json!({"operationId": "listPets", "responses": {}}),
        ] {
            let result = build(&document(json!({"/pets": {"get": operation}})));
            assert_eq!(
                result.err(),
                Some(SchemaError::MissingResponses(Location::new("GET", "/pets")))
            );
        }
    }

    #[test]
    fn test_duplicate_operation_id() {
        let result = build(&document(json!({
            "/pets": {"get": {"operationId": "listPets", "responses": {"200": {}}}},
            "/animals": {"get": {"operationId": "listPets", "responses": {"200": {}}}}
        })));
        assert!(matches!(
            result,
            Err(SchemaError::DuplicateOperationId { operation_id, .. }) if operation_id == "listPets"
        ));
    }

    #[test]
    fn test_parameters_merge_extra_keys_into_schema() {
        let schema = build(&document(json!({
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "parameters": [
                        {"in": "query", "name": "limit", "type": "integer", "maximum": 100, "x-internal": true},
                        {"in": "header", "name": "X-Trace", "required": true, "type": "string"}
                    ],
                    "responses": {"200": {}}
                }
            }
        })))
        .unwrap();
        let definition = schema.get_request_definition("listPets").unwrap();
        let limit = definition.parameters().by_name("limit").unwrap();
        assert_eq!(limit.location(), ParameterLocation::Query);
        assert!(!limit.is_required());
        assert_eq!(limit.schema(), Some(&json!({"type": "integer", "maximum": 100})));
        assert!(limit.has_vendor_property("x-internal"));

        assert_eq!(
            definition.headers_schema(),
            Some(json!({
                "type": "object",
                "required": ["X-Trace"],
                "properties": {"X-Trace": {"type": "string"}}
            }))
        );
    }

    #[test]
    fn test_body_parameter_schema() {
        let schema = build(&document(json!({
            "/pets": {
                "post": {
                    "operationId": "createPet",
                    "parameters": [{
                        "in": "body",
                        "name": "pet",
                        "required": true,
                        "schema": {"type": "object", "required": ["name"]}
                    }],
                    "responses": {"201": {}}
                }
            }
        })))
        .unwrap();
        let definition = schema.get_request_definition("createPet").unwrap();
        assert_eq!(
            definition.body_schema(),
            Some(&json!({"type": "object", "required": ["name"]}))
        );
    }

    #[test]
    fn test_file_parameters_are_not_validated() {
        let schema = build(&document(json!({
            "/pets/{id}/photo": {
                "post": {
                    "operationId": "uploadPhoto",
                    "consumes": ["multipart/form-data"],
                    "parameters": [
                        {"in": "path", "name": "id", "required": true, "type": "integer"},
                        {"in": "formData", "name": "photo", "required": true, "type": "file"},
                        {"in": "formData", "name": "thumbnail", "type": "string", "format": "file"}
                    ],
                    "responses": {"200": {}}
                }
            }
        })))
        .unwrap();
        let definition = schema.get_request_definition("uploadPhoto").unwrap();
        assert_eq!(definition.parameters().len(), 3);
        assert!(!definition.parameters().by_name("photo").unwrap().has_schema());
        assert!(!definition.parameters().by_name("thumbnail").unwrap().has_schema());
        assert!(definition.has_path_schema());
    }

    #[test]
    fn test_multiple_body_parameters() {
        let result = build(&document(json!({
            "/pets": {
                "post": {
                    "operationId": "createPet",
                    "parameters": [
                        {"in": "body", "name": "a", "schema": {}},
                        {"in": "body", "name": "b", "schema": {}}
                    ],
                    "responses": {"201": {}}
                }
            }
        })));
        assert_eq!(
            result.err(),
            Some(SchemaError::MultipleBodyParameters(Some(Location::new(
                "POST", "/pets"
            ))))
        );
    }

    #[test]
    fn test_invalid_parameter_location() {
        let result = build(&document(json!({
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "parameters": [{"in": "cookie", "name": "session"}],
                    "responses": {"200": {}}
                }
            }
        })));
        let mut node = JsonPath::new();
        node.add("paths").add("/pets").add("get").add("parameters").add("0").add("in");
        assert_eq!(
            result.err(),
            Some(SchemaError::InvalidParameterLocation {
                location: "cookie".to_string(),
                node,
            })
        );
    }

    #[test]
    fn test_missing_parameter_name() {
        let result = build(&document(json!({
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "parameters": [{"in": "query"}],
                    "responses": {"200": {}}
                }
            }
        })));
        assert!(matches!(
            result,
            Err(SchemaError::MissingField { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_path_level_parameters_are_merged() {
        let paths = json!({
            "/pets/{id}": {
                "parameters": [
                    {"in": "path", "name": "id", "required": true, "type": "string"},
                    {"in": "header", "name": "X-Tenant", "type": "string"}
                ],
                "get": {
                    "operationId": "getPetById",
                    "parameters": [{"in": "path", "name": "id", "required": true, "type": "integer"}],
                    "responses": {"200": {}}
                }
            }
        });
        let schema = build(&document(paths.clone())).unwrap();
        let parameters = schema
            .get_request_definition("getPetById")
            .unwrap()
            .parameters();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.by_name("X-Tenant").unwrap().location(), ParameterLocation::Header);
        assert_eq!(
            parameters.by_name("id").unwrap().schema(),
            Some(&json!({"type": "integer"}))
        );

        let factory = SchemaFactory::new(FactoryOptions::new().with_merge_path_parameters(false));
        let schema = factory.create_schema_from_value(&document(paths)).unwrap();
        let parameters = schema
            .get_request_definition("getPetById")
            .unwrap()
            .parameters();
        assert_eq!(parameters.len(), 1);
    }

    #[test]
    fn test_responses() {
        let schema = build(&document(json!({
            "/pets/{id}": {
                "get": {
                    "operationId": "getPetById",
                    "responses": {
                        "200": {
                            "description": "a pet",
                            "schema": {"type": "object"},
                            "headers": {"X-Rate-Limit": {"type": "integer", "description": "calls per hour"}},
                            "x-cache": "public"
                        },
                        "default": {"description": "error"}
                    }
                }
            }
        })))
        .unwrap();
        let definition = schema.get_request_definition("getPetById").unwrap();

        let ok = definition.get_response_definition(200).unwrap();
        assert_eq!(ok.status(), ResponseStatus::Code(200));
        assert_eq!(ok.content_types(), ["application/json"]);
        assert_eq!(ok.body_schema().unwrap()["type"], json!("object"));
        assert_eq!(
            ok.headers_schema(),
            Some(json!({
                "type": "object",
                "required": ["X-Rate-Limit"],
                "properties": {"X-Rate-Limit": {"type": "integer", "description": "calls per hour"}}
            }))
        );
        assert_eq!(ok.get_vendor_property("x-cache").unwrap(), &json!("public"));

        let fallback = definition.get_response_definition(503).unwrap();
        assert_eq!(fallback.status(), ResponseStatus::Default);
        assert!(!fallback.has_body_schema());
    }

    #[test]
    fn test_invalid_status_code() {
        let result = build(&document(json!({
            "/pets": {"get": {"operationId": "listPets", "responses": {"2XX": {}}}}
        })));
        assert!(matches!(
            result,
            Err(SchemaError::InvalidStatusCode { status, .. }) if status == "2XX"
        ));
    }

    #[test]
    fn test_status_codes_are_unique_per_operation() {
        let result = build(&document(json!({
            "/pets": {"get": {
                "operationId": "listPets",
                "responses": {
                    "200": {"schema": {"type": "array"}},
                    "0200": {"schema": {"type": "string"}}
                }
            }}
        })));
        assert_eq!(
            result.err(),
            Some(SchemaError::DuplicateStatusCode {
                status: "0200".to_string(),
                location: Location::new("GET", "/pets"),
            })
        );
    }

    #[test]
    fn test_response_content_type_policy() {
        let paths = json!({
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "responses": {"200": {"produces": ["application/xml"]}}
                }
            }
        });

        let schema = build(&document(paths.clone())).unwrap();
        let response = schema
            .get_request_definition("listPets")
            .unwrap()
            .get_response_definition(200)
            .unwrap();
        assert_eq!(response.content_types(), ["application/json"]);

        let factory = SchemaFactory::new(
            FactoryOptions::new().with_response_content_types(ResponseContentTypePolicy::Declared),
        );
        let schema = factory.create_schema_from_value(&document(paths)).unwrap();
        let response = schema
            .get_request_definition("listPets")
            .unwrap()
            .get_response_definition(200)
            .unwrap();
        assert_eq!(response.content_types(), ["application/xml"]);
    }

    #[test]
    fn test_operation_details_and_vendor_properties() {
        let mut doc = document(json!({
            "/pets": {
                "x-resource": "pets",
                "get": {
                    "operationId": "listPets",
                    "summary": "List all pets",
                    "description": "Returns every pet",
                    "tags": ["pets"],
                    "x-roles": {"admin": ["read"]},
                    "responses": {"200": {}}
                },
                "trace": {"operationId": "tracePets", "responses": {"200": {}}}
            }
        }));
        doc["basePath"] = json!("/v1");
        doc["host"] = json!("petstore.example");
        doc["schemes"] = json!(["https"]);
        doc["x-api-owner"] = json!("pets-team");
        let schema = build(&doc).unwrap();

        assert_eq!(schema.host(), Some("petstore.example"));
        assert_eq!(schema.base_path(), "/v1");
        assert_eq!(schema.schemes(), ["https"]);
        assert!(schema.has_vendor_property("x-api-owner"));
        assert_eq!(schema.request_definitions().len(), 1);

        let definition = schema.get_request_definition("listPets").unwrap();
        assert_eq!(definition.method(), "GET");
        assert_eq!(definition.summary(), "List all pets");
        assert_eq!(definition.description(), "Returns every pet");
        assert_eq!(definition.tags(), ["pets"]);
        assert_eq!(definition.path_template().template(), "/v1/pets");
        let roles: HashMap<String, Vec<String>> =
            definition.get_vendor_property_as("x-roles").unwrap();
        assert_eq!(roles["admin"], vec!["read"]);
    }

    #[test]
    fn test_custom_vendor_prefix() {
        let mut doc = document(json!({}));
        doc["vnd-owner"] = json!("pets-team");
        doc["x-ignored"] = json!(true);
        let factory = SchemaFactory::new(FactoryOptions::new().with_vendor_prefix("vnd-"));
        let schema = factory.create_schema_from_value(&doc).unwrap();
        assert!(schema.has_vendor_property("vnd-owner"));
        assert!(!schema.has_vendor_property("x-ignored"));
    }

    #[test]
    fn test_invalid_document_shape() {
        let result = build(&document(json!([])));
        assert!(matches!(result, Err(SchemaError::InvalidDocument { .. })));
        assert!(matches!(
            build(&json!("swagger")),
            Err(SchemaError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_unsupported_format_fails_before_loading() {
        struct FailingLoader;

        impl DocumentLoader for FailingLoader {
            fn load(&self, _: &Path, _: DocumentFormat) -> Result<Value, SchemaError> {
                panic!("Expected the format check to fail first")
            }
        }

        let factory = SchemaFactory::with_loader(FailingLoader, FactoryOptions::default());
        assert_eq!(
            factory.create_schema("missing/petstore.txt").err(),
            Some(SchemaError::UnsupportedFormat("missing/petstore.txt".to_string()))
        );
    }

    #[test]
    fn test_injected_loader() {
        struct StaticLoader(Value);

        impl DocumentLoader for StaticLoader {
            fn load(&self, _: &Path, format: DocumentFormat) -> Result<Value, SchemaError> {
                assert_eq!(format, DocumentFormat::Yaml);
                Ok(self.0.clone())
            }
        }

        let loader = StaticLoader(document(json!({
            "/pets": {"get": {"operationId": "listPets", "responses": {"200": {}}}}
        })));
        let factory = SchemaFactory::with_loader(loader, FactoryOptions::default());
        let schema = factory.create_schema("remote/petstore.yml").unwrap();
        assert!(schema.request_definitions().contains("listPets"));
    }

    #[test]
    fn test_create_schema_from_str_resolves_local_references() {
        let content = r##"
swagger: "2.0"
info:
  title: Petstore
  version: 1.0.0
consumes: [application/json]
produces: [application/json]
paths:
  /pets/{id}:
    get:
      operationId: getPetById
      responses:
        200:
          description: a pet
          schema:
            $ref: "#/definitions/Pet"
definitions:
  Pet:
    type: object
    required: [id]
"##;
        let schema = SchemaFactory::default()
            .create_schema_from_str(content, DocumentFormat::Yaml)
            .unwrap();
        let response = schema
            .get_request_definition("getPetById")
            .unwrap()
            .get_response_definition(200)
            .unwrap();
        assert_eq!(
            response.body_schema(),
            Some(&json!({"type": "object", "required": ["id"]}))
        );
    }

    #[test]
    fn test_create_schema_from_str_rejects_recursive_models() {
        let content = r##"{
            "info": {"title": "Petstore", "version": "1.0.0"},
            "consumes": ["application/json"],
            "paths": {"/pets": {"get": {"operationId": "listPets", "responses": {"200": {}}}}},
            "definitions": {
                "Category": {
                    "type": "object",
                    "properties": {"parent": {"$ref": "#/definitions/Category"}}
                }
            }
        }"##;
        let result = SchemaFactory::default().create_schema_from_str(content, DocumentFormat::Json);
        assert!(matches!(
            result,
            Err(SchemaError::ReferenceResolutionFailure { reference, .. })
                if reference == "#/definitions/Category"
        ));
    }

    #[test]
    fn test_create_schema_from_files() {
        let factory = SchemaFactory::default();
        let from_json = factory.create_schema("test/petstore.json").unwrap();
        let from_yaml = factory.create_schema("test/petstore.yaml").unwrap();

        for schema in [&from_json, &from_yaml] {
            assert_eq!(schema.info().title(), "Swagger Petstore");
            assert_eq!(schema.base_path(), "/v1");
            assert_eq!(schema.find_operation_id("GET", "/v1/pets/42"), Ok("getPetById"));
        }
        assert_eq!(
            from_json.request_definitions().len(),
            from_yaml.request_definitions().len()
        );

        let error = from_json
            .get_request_definition("getPetById")
            .unwrap()
            .get_response_definition(500)
            .unwrap();
        assert_eq!(error.body_schema().unwrap()["required"], json!(["code", "message"]));
    }
}
