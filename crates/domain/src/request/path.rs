//! Path templates with `{name}` placeholders.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Named values substituted into a [`PathTemplate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathParams {
    items: BTreeMap<String, String>,
}

impl PathParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Sets a parameter, replacing any previous value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.insert(name.into(), value.into());
    }

    /// Returns the value for a parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(String::as_str)
    }

    /// Returns true if the parameter is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Iterates over `(name, value)` pairs ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PathParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A request target containing `{name}` placeholders.
///
/// # Examples
///
/// ```
/// use apiprobe_domain::request::{PathParams, PathTemplate};
///
/// let template = PathTemplate::parse("/{country}/{zipcode}").unwrap();
/// let params: PathParams = [("country", "us"), ("zipcode", "90210")].into_iter().collect();
/// assert_eq!(template.expand(&params).unwrap(), "/us/90210");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPathTemplate` for an unclosed or empty
    /// placeholder.
    pub fn parse(input: &str) -> DomainResult<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = input.chars();

        while let Some(ch) = chars.next() {
            if ch != '{' {
                literal.push(ch);
                continue;
            }

            let mut name = String::new();
            let mut closed = false;
            for inner in chars.by_ref() {
                match inner {
                    '}' => {
                        closed = true;
                        break;
                    }
                    '{' => {
                        return Err(DomainError::InvalidPathTemplate(format!(
                            "nested '{{' in `{input}`"
                        )));
                    }
                    _ => name.push(inner),
                }
            }

            if !closed {
                return Err(DomainError::InvalidPathTemplate(format!(
                    "unclosed '{{' in `{input}`"
                )));
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(DomainError::InvalidPathTemplate(format!(
                    "empty placeholder in `{input}`"
                )));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(name.to_string()));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: input.to_string(),
            segments,
        })
    }

    /// Returns the placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns true if the template has no placeholders.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.placeholders().next().is_none()
    }

    /// Substitutes every placeholder with its percent-encoded value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingPathParam` if a placeholder has no value
    /// and `DomainError::UnusedPathParam` if a parameter names no placeholder.
    pub fn expand(&self, params: &PathParams) -> DomainResult<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| DomainError::MissingPathParam(name.clone()))?;
                    out.push_str(&urlencoding::encode(value));
                }
            }
        }

        if let Some((unused, _)) = params
            .iter()
            .find(|(name, _)| !self.placeholders().any(|p| p == *name))
        {
            return Err(DomainError::UnusedPathParam(unused.to_string()));
        }

        Ok(out)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
