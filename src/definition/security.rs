use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

pub(crate) const API_KEY_TYPE: &str = "apiKey";
pub(crate) const OAUTH2_TYPE: &str = "oauth2";
pub(crate) const BASIC_TYPE: &str = "basic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiKeyLocation {
    Query,
    Header,
}

impl FromStr for ApiKeyLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ApiKeyLocation::Query),
            "header" => Ok(ApiKeyLocation::Header),
            other => Err(format!("has an unsupported apiKey location '{other}'")),
        }
    }
}

impl Display for ApiKeyLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKeyLocation::Query => write!(f, "query"),
            ApiKeyLocation::Header => write!(f, "header"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OAuth2Flow {
    Implicit,
    Password,
    Application,
    AccessCode,
}

impl OAuth2Flow {
    pub fn requires_authorization_url(&self) -> bool {
        matches!(self, OAuth2Flow::Implicit | OAuth2Flow::AccessCode)
    }

    pub fn requires_token_url(&self) -> bool {
        matches!(
            self,
            OAuth2Flow::Password | OAuth2Flow::Application | OAuth2Flow::AccessCode
        )
    }
}

impl FromStr for OAuth2Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "implicit" => Ok(OAuth2Flow::Implicit),
            "password" => Ok(OAuth2Flow::Password),
            "application" => Ok(OAuth2Flow::Application),
            "accessCode" => Ok(OAuth2Flow::AccessCode),
            other => Err(format!("has an unsupported oauth2 flow '{other}'")),
        }
    }
}

impl Display for OAuth2Flow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuth2Flow::Implicit => write!(f, "implicit"),
            OAuth2Flow::Password => write!(f, "password"),
            OAuth2Flow::Application => write!(f, "application"),
            OAuth2Flow::AccessCode => write!(f, "accessCode"),
        }
    }
}

/// The type-specific part of a security scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecuritySchemeType {
    ApiKey {
        name: String,
        location: ApiKeyLocation,
    },
    OAuth2 {
        flow: OAuth2Flow,
        authorization_url: Option<String>,
        token_url: Option<String>,
        scopes: BTreeMap<String, String>,
    },
    Basic,
    /// A type this model has no dedicated fields for.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScheme {
    key: String,
    description: String,
    scheme_type: SecuritySchemeType,
}

impl SecurityScheme {
    pub fn api_key(
        key: impl Into<String>,
        name: Option<String>,
        location: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let key = key.into();
        let Some(name) = name else {
            return Err(SchemaError::invalid_security_scheme(
                &key,
                "must provide a name for security scheme of type apiKey",
            ));
        };
        let Some(location) = location else {
            return Err(SchemaError::invalid_security_scheme(
                &key,
                "must provide a location for security scheme of type apiKey",
            ));
        };
        let location = ApiKeyLocation::from_str(location)
            .map_err(|reason| SchemaError::invalid_security_scheme(&key, reason))?;
        Ok(Self::new(key, SecuritySchemeType::ApiKey { name, location }))
    }

    pub fn oauth2(
        key: impl Into<String>,
        flow: Option<&str>,
        authorization_url: Option<String>,
        token_url: Option<String>,
        scopes: BTreeMap<String, String>,
    ) -> Result<Self, SchemaError> {
        let key = key.into();
        let Some(flow) = flow else {
            return Err(SchemaError::invalid_security_scheme(
                &key,
                "must provide a flow for security scheme of type oauth2",
            ));
        };
        let flow = OAuth2Flow::from_str(flow)
            .map_err(|reason| SchemaError::invalid_security_scheme(&key, reason))?;
        if flow.requires_authorization_url() && authorization_url.is_none() {
            return Err(SchemaError::invalid_security_scheme(
                &key,
                format!("must provide an authorizationUrl for the oauth2 flow {flow}"),
            ));
        }
        if flow.requires_token_url() && token_url.is_none() {
            return Err(SchemaError::invalid_security_scheme(
                &key,
                format!("must provide a tokenUrl for the oauth2 flow {flow}"),
            ));
        }
        Ok(Self::new(
            key,
            SecuritySchemeType::OAuth2 {
                flow,
                authorization_url,
                token_url,
                scopes,
            },
        ))
    }

    pub fn basic(key: impl Into<String>) -> Self {
        Self::new(key.into(), SecuritySchemeType::Basic)
    }

    pub fn other(key: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(key.into(), SecuritySchemeType::Other(type_name.into()))
    }

    fn new(key: String, scheme_type: SecuritySchemeType) -> Self {
        Self {
            key,
            description: String::new(),
            scheme_type,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.unwrap_or_default();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The document spelling of the type: `apiKey`, `oauth2`, `basic`, ...
    pub fn type_name(&self) -> &str {
        match &self.scheme_type {
            SecuritySchemeType::ApiKey { .. } => API_KEY_TYPE,
            SecuritySchemeType::OAuth2 { .. } => OAUTH2_TYPE,
            SecuritySchemeType::Basic => BASIC_TYPE,
            SecuritySchemeType::Other(type_name) => type_name,
        }
    }

    pub fn scheme_type(&self) -> &SecuritySchemeType {
        &self.scheme_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn name(&self) -> Option<&str> {
        match &self.scheme_type {
            SecuritySchemeType::ApiKey { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<ApiKeyLocation> {
        match &self.scheme_type {
            SecuritySchemeType::ApiKey { location, .. } => Some(*location),
            _ => None,
        }
    }

    pub fn flow(&self) -> Option<OAuth2Flow> {
        match &self.scheme_type {
            SecuritySchemeType::OAuth2 { flow, .. } => Some(*flow),
            _ => None,
        }
    }

    pub fn authorization_url(&self) -> Option<&str> {
        match &self.scheme_type {
            SecuritySchemeType::OAuth2 {
                authorization_url, ..
            } => authorization_url.as_deref(),
            _ => None,
        }
    }

    pub fn token_url(&self) -> Option<&str> {
        match &self.scheme_type {
            SecuritySchemeType::OAuth2 { token_url, .. } => token_url.as_deref(),
            _ => None,
        }
    }

    pub fn scopes(&self) -> Option<&BTreeMap<String, String>> {
        match &self.scheme_type {
            SecuritySchemeType::OAuth2 { scopes, .. } => Some(scopes),
            _ => None,
        }
    }
}

/// Registry of the named security schemes of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityDefinitions {
    schemes: BTreeMap<String, Arc<SecurityScheme>>,
}

impl SecurityDefinitions {
    pub fn new(schemes: Vec<SecurityScheme>) -> Result<Self, SchemaError> {
        let mut registry = BTreeMap::new();
        for scheme in schemes {
            let key = scheme.key().to_string();
            if registry.insert(key.clone(), Arc::new(scheme)).is_some() {
                return Err(SchemaError::invalid_security_scheme(
                    &key,
                    "is declared more than once",
                ));
            }
        }
        Ok(Self { schemes: registry })
    }

    pub fn all(&self) -> impl Iterator<Item = &SecurityScheme> {
        self.schemes.values().map(Arc::as_ref)
    }

    pub fn has_security_scheme(&self, key: &str) -> bool {
        self.schemes.contains_key(key)
    }

    pub fn get_security_scheme(&self, key: &str) -> Result<&SecurityScheme, SchemaError> {
        self.schemes
            .get(key)
            .map(Arc::as_ref)
            .ok_or_else(|| SchemaError::UnknownSecurityScheme {
                key: key.to_string(),
                location: None,
            })
    }

    /// Builds a requirement on the scheme registered under `key`.
    pub fn requirement(
        &self,
        key: &str,
        scopes: Vec<String>,
    ) -> Result<Security, SchemaError> {
        let scheme = self
            .schemes
            .get(key)
            .ok_or_else(|| SchemaError::UnknownSecurityScheme {
                key: key.to_string(),
                location: None,
            })?;
        Ok(Security {
            key: key.to_string(),
            scopes,
            scheme: Arc::clone(scheme),
        })
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// A security requirement of one operation: a scheme plus the scopes it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    key: String,
    scopes: Vec<String>,
    scheme: Arc<SecurityScheme>,
}

impl Security {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn scheme(&self) -> &SecurityScheme {
        &self.scheme
    }
}
