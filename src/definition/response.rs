use crate::definition::parameter::Parameters;
use crate::definition::vendor::{ProvideVendorProperties, VendorProperties};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

pub(crate) const DEFAULT_RESPONSE: &str = "default";

/// The key a response is declared under: a numeric status code or `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ResponseStatus {
    Code(u16),
    Default,
}

impl ResponseStatus {
    /// Parses a response key. Codes must lie within `100..=599`.
    pub fn parse(status: &str) -> Option<Self> {
        if status == DEFAULT_RESPONSE {
            return Some(ResponseStatus::Default);
        }
        let code = http::StatusCode::from_u16(status.parse::<u16>().ok()?).ok()?;
        (code.as_u16() < 600).then_some(ResponseStatus::Code(code.as_u16()))
    }
}

impl Display for ResponseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseStatus::Code(code) => write!(f, "{}", code),
            ResponseStatus::Default => write!(f, "{}", DEFAULT_RESPONSE),
        }
    }
}

/// One declared response of an operation.
///
/// The response body (if any) and the declared headers are exposed as
/// [`Parameters`]: a `body` parameter for the payload and one required
/// `header` parameter per header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDefinition {
    status: ResponseStatus,
    content_types: Vec<String>,
    parameters: Parameters,
    vendor: VendorProperties,
}

impl ResponseDefinition {
    pub fn new(status: ResponseStatus, content_types: Vec<String>, parameters: Parameters) -> Self {
        Self {
            status,
            content_types,
            parameters,
            vendor: VendorProperties::new(),
        }
    }

    pub(crate) fn set_vendor_properties(&mut self, vendor: VendorProperties) {
        self.vendor = vendor;
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn content_types(&self) -> &[String] {
        &self.content_types
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
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
}

impl ProvideVendorProperties for ResponseDefinition {
    fn vendor_properties(&self) -> &VendorProperties {
        &self.vendor
    }
}

#[cfg(test)]
mod tests {
    use crate::definition::parameter::{Parameter, ParameterLocation, Parameters};
    use crate::definition::response::{ResponseDefinition, ResponseStatus};
    use serde_json::json;

    #[test]
    fn test_parse_status() {
        assert_eq!(ResponseStatus::parse("200"), Some(ResponseStatus::Code(200)));
        assert_eq!(ResponseStatus::parse("default"), Some(ResponseStatus::Default));
        assert_eq!(ResponseStatus::parse("2XX"), None);
        assert_eq!(ResponseStatus::parse("42"), None);
        assert_eq!(ResponseStatus::parse("1000"), None);
        assert_eq!(ResponseStatus::parse("599"), Some(ResponseStatus::Code(599)));
        assert_eq!(ResponseStatus::parse("799"), None);
        assert_eq!(ResponseStatus::parse("0200"), Some(ResponseStatus::Code(200)));
        assert_eq!(ResponseStatus::Code(404).to_string(), "404");
        assert_eq!(ResponseStatus::Default.to_string(), "default");
    }

    #[test]
    fn test_response_body_and_headers() {
        let parameters = Parameters::new(vec![
            Parameter::new(
                ParameterLocation::Body,
                "body",
                true,
                Some(json!({"type": "object", "required": ["id"]})),
            ),
            Parameter::new(
                ParameterLocation::Header,
                "X-Rate-Limit",
                true,
                Some(json!({"type": "integer"})),
            ),
        ])
        .unwrap();
        let response = ResponseDefinition::new(
            ResponseStatus::Code(200),
            vec!["application/json".to_string()],
            parameters,
        );

        assert_eq!(response.status(), ResponseStatus::Code(200));
        assert_eq!(response.content_types(), ["application/json"]);
        assert!(response.has_body_schema());
        assert_eq!(response.body_schema().unwrap()["type"], json!("object"));
        assert_eq!(
            response.headers_schema().unwrap()["required"],
            json!(["X-Rate-Limit"])
        );
    }

    #[test]
    fn test_response_without_schema() {
        let response = ResponseDefinition::new(
            ResponseStatus::Code(204),
            vec!["application/json".to_string()],
            Parameters::default(),
        );
        assert!(!response.has_body_schema());
        assert!(!response.has_headers_schema());
    }
}
