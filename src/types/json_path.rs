use crate::{ENCODED_SLASH, ENCODED_TILDE, PATH_SEPARATOR, POINTER_ROOT, TILDE};
use std::fmt::{Display, Formatter};

/// A JSON pointer to a node of the source document.
///
/// Used to tell the document author where a build failure happened, e.g.
/// `#/paths/~1pets~1{id}/get/responses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(pub Vec<String>);

impl JsonPath {
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    pub fn add(&mut self, segment: impl AsRef<str>) -> &mut Self {
        let segment = segment.as_ref();
        if segment.contains(TILDE) || segment.contains(PATH_SEPARATOR) {
            let segment = segment
                .replace(TILDE, ENCODED_TILDE)
                .replace(PATH_SEPARATOR, ENCODED_SLASH);
            self.0.push(segment);
        } else {
            self.0.push(segment.to_owned());
        }

        self
    }

    /// Returns a copy of this path extended by one segment.
    pub fn child(&self, segment: impl AsRef<str>) -> JsonPath {
        let mut child = self.clone();
        child.add(segment);
        child
    }

    pub fn format_path(&self) -> String {
        self.0.join(PATH_SEPARATOR)
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "{}", POINTER_ROOT)
        } else {
            write!(f, "{}{}{}", POINTER_ROOT, PATH_SEPARATOR, self.format_path())
        }
    }
}
