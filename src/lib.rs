//! Builds a queryable schema model from a Swagger 2.0 API description.
//!
//! A [`SchemaFactory`] reads a `json`, `yml` or `yaml` document, resolves its
//! `$ref` pointers and normalizes every operation into a [`RequestDefinition`]
//! (content types, parameters, responses and security requirements, with the
//! document-level defaults applied). The resulting [`Schema`] answers lookups
//! by operationId and maps an inbound `(method, path)` back to the operation
//! that declared it.

pub mod cache;
pub mod definition;
pub mod error;
pub mod factory;
pub mod loader;
pub mod resolver;
pub mod schema;
pub mod traverser;
pub mod types;
pub mod uri_template;

pub use cache::{CacheError, SchemaCollection, global_schema_cache};
pub use definition::{
    Info, Parameter, ParameterLocation, Parameters, ProvideVendorProperties, RequestDefinition,
    RequestDefinitions, ResponseDefinition, ResponseStatus, Security, SecurityDefinitions,
    SecurityScheme, VendorProperties,
};
pub use error::{Location, SchemaError, SchemaErrorKind};
pub use factory::{FactoryOptions, ResponseContentTypePolicy, SchemaFactory};
pub use loader::{DocumentFormat, DocumentLoader, FileDocumentLoader};
pub use schema::Schema;

const PATH_SEPARATOR: &'static str = "/";
const POINTER_ROOT: &'static str = "#";
const TILDE: &'static str = "~";
const ENCODED_SLASH: &'static str = "~1";
const ENCODED_TILDE: &'static str = "~0";
const REF_FIELD: &'static str = "$ref";

const INFO_FIELD: &'static str = "info";
const TITLE_FIELD: &'static str = "title";
const VERSION_FIELD: &'static str = "version";
const DESCRIPTION_FIELD: &'static str = "description";
const HOST_FIELD: &'static str = "host";
const BASE_PATH_FIELD: &'static str = "basePath";
const SCHEMES_FIELD: &'static str = "schemes";
const CONSUMES_FIELD: &'static str = "consumes";
const PRODUCES_FIELD: &'static str = "produces";
const SECURITY_FIELD: &'static str = "security";
const SECURITY_DEFINITIONS_FIELD: &'static str = "securityDefinitions";
const PATHS_FIELD: &'static str = "paths";

const OPERATION_ID_FIELD: &'static str = "operationId";
const SUMMARY_FIELD: &'static str = "summary";
const TAGS_FIELD: &'static str = "tags";
const PARAMETERS_FIELD: &'static str = "parameters";
const RESPONSES_FIELD: &'static str = "responses";
const HEADERS_FIELD: &'static str = "headers";
const SCHEMA_FIELD: &'static str = "schema";

const IN_FIELD: &'static str = "in";
const NAME_FIELD: &'static str = "name";
const REQUIRED_FIELD: &'static str = "required";
const TYPE_FIELD: &'static str = "type";
const FORMAT_FIELD: &'static str = "format";
const PROPERTIES_FIELD: &'static str = "properties";

const FLOW_FIELD: &'static str = "flow";
const AUTHORIZATION_URL_FIELD: &'static str = "authorizationUrl";
const TOKEN_URL_FIELD: &'static str = "tokenUrl";
const SCOPES_FIELD: &'static str = "scopes";

const DEFAULT_SCHEME: &'static str = "http";
const DEFAULT_VENDOR_PREFIX: &'static str = "x-";
const FILE_TYPE: &'static str = "file";
