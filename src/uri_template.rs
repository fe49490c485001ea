//! Path template matching for templates such as `/users/{id}` or
//! `/files/{name}.{ext}`.
//!
//! Simple expressions (`{id}`) match one or more characters up to the next
//! `/`. Reserved expressions (`{+path}`) may also span `/`. Extracted values
//! are percent-decoded.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const EXPRESSION_START: char = '{';
const EXPRESSION_END: char = '}';
const RESERVED_OPERATORS: [char; 2] = ['+', '#'];
const SEGMENT_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum TemplatePart {
    Literal(String),
    Variable { name: String, reserved: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriTemplate {
    template: String,
    parts: Vec<TemplatePart>,
}

impl UriTemplate {
    /// Parses a template. An unterminated `{` is kept as literal text.
    pub fn parse(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut parts = Vec::new();
        let mut rest = template.as_str();

        while let Some(start) = rest.find(EXPRESSION_START) {
            let Some(length) = rest[start..].find(EXPRESSION_END) else {
                break;
            };
            if start > 0 {
                Self::push_literal(&mut parts, &rest[..start]);
            }
            let expression = &rest[start + 1..start + length];
            let reserved = expression.starts_with(RESERVED_OPERATORS);
            let name = expression
                .trim_start_matches(RESERVED_OPERATORS)
                .trim_end_matches('*');
            let name = name.split(':').next().unwrap_or(name);
            parts.push(TemplatePart::Variable {
                name: name.to_string(),
                reserved,
            });
            rest = &rest[start + length + 1..];
        }
        if !rest.is_empty() {
            Self::push_literal(&mut parts, rest);
        }

        Self { template, parts }
    }

    fn push_literal(parts: &mut Vec<TemplatePart>, literal: &str) {
        if let Some(TemplatePart::Literal(previous)) = parts.last_mut() {
            previous.push_str(literal);
        } else {
            parts.push(TemplatePart::Literal(literal.to_string()));
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Variable { name, .. } => Some(name.as_str()),
            TemplatePart::Literal(_) => None,
        })
    }

    /// Extracts the template variables from a concrete path.
    ///
    /// Returns `None` when the path does not have the template's shape. The
    /// whole path must be consumed; a trailing segment is never ignored.
    pub fn extract(&self, path: &str) -> Option<HashMap<String, String>> {
        let mut captures = Vec::new();
        if !Self::match_parts(&self.parts, path, &mut captures) {
            return None;
        }
        Some(
            captures
                .into_iter()
                .map(|(name, value)| {
                    let decoded = percent_decode_str(value).decode_utf8_lossy().into_owned();
                    (name.to_string(), decoded)
                })
                .collect(),
        )
    }

    pub fn matches(&self, path: &str) -> bool {
        Self::match_parts(&self.parts, path, &mut Vec::new())
    }

    fn match_parts<'p, 'i>(
        parts: &'p [TemplatePart],
        input: &'i str,
        captures: &mut Vec<(&'p str, &'i str)>,
    ) -> bool {
        let Some((part, rest)) = parts.split_first() else {
            return input.is_empty();
        };

        match part {
            TemplatePart::Literal(literal) => input
                .strip_prefix(literal.as_str())
                .is_some_and(|remaining| Self::match_parts(rest, remaining, captures)),
            TemplatePart::Variable { name, reserved } => {
                let limit = if *reserved {
                    input.len()
                } else {
                    input.find(SEGMENT_SEPARATOR).unwrap_or(input.len())
                };

                // Shortest candidate first so that `{name}.{ext}` splits on the first dot.
                for (index, character) in input[..limit].char_indices() {
                    let end = index + character.len_utf8();
                    captures.push((name.as_str(), &input[..end]));
                    if Self::match_parts(rest, &input[end..], captures) {
                        return true;
                    }
                    captures.pop();
                }
                false
            }
        }
    }
}
