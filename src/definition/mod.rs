//! The schema model: value types built once by the factory and read-only afterwards.

pub mod info;
pub mod parameter;
pub mod request;
pub mod response;
pub mod security;
pub mod vendor;

pub use info::Info;
pub use parameter::{Parameter, ParameterLocation, Parameters};
pub use request::{RequestDefinition, RequestDefinitions};
pub use response::{ResponseDefinition, ResponseStatus};
pub use security::{
    ApiKeyLocation, OAuth2Flow, Security, SecurityDefinitions, SecurityScheme, SecuritySchemeType,
};
pub use vendor::{ProvideVendorProperties, VendorProperties};
