use crate::error::SchemaError;
use crate::{TITLE_FIELD, VERSION_FIELD};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    title: String,
    version: String,
    description: String,
}

impl Info {
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, SchemaError> {
        let title = title.into();
        let version = version.into();
        if title.trim().is_empty() {
            return Err(SchemaError::MissingTitleOrVersion(TITLE_FIELD.to_string()));
        }
        if version.trim().is_empty() {
            return Err(SchemaError::MissingTitleOrVersion(VERSION_FIELD.to_string()));
        }
        Ok(Self {
            title,
            version,
            description: description.unwrap_or_default(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
