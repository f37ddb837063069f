//! Path expressions over JSON bodies.
//!
//! Supports the dotted/indexed syntax HTTP test suites use to reach into a
//! response body:
//!
//! - `meta.pagination.page` - nested fields
//! - `places[0].state`, `places[-1]` - array indexing (negative from the end)
//! - `places[0].'state abbreviation'` - quoted keys containing spaces
//! - `places.'place name'` - a field applied to an array collects that
//!   field from every element
//! - an optional leading `$` or `$.`

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors raised while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsonPathError {
    /// The path is empty.
    #[error("empty path")]
    Empty,

    /// A quoted key is missing its closing quote.
    #[error("unterminated quote starting at offset {0}")]
    UnterminatedQuote(usize),

    /// An index is missing its closing bracket.
    #[error("unterminated '[' at offset {0}")]
    UnterminatedBracket(usize),

    /// An index is not an integer.
    #[error("invalid array index `{0}`")]
    InvalidIndex(String),

    /// A character appears where it is not allowed.
    #[error("unexpected '{ch}' at offset {offset}")]
    Unexpected {
        /// Offending character.
        ch: char,
        /// Byte offset in the path.
        offset: usize,
    },

    /// The path ends right after a '.'.
    #[error("path ends with '.'")]
    TrailingDot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Field(String),
    Index(i64),
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    source: String,
    steps: Vec<Step>,
}

impl JsonPath {
    /// Parses a path expression.
    ///
    /// # Errors
    ///
    /// Returns a `JsonPathError` describing the first syntax problem.
    pub fn parse(input: &str) -> Result<Self, JsonPathError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(JsonPathError::Empty);
        }

        let offset = source.len() - source.trim_start_matches('$').len();
        if offset > 1 {
            return Err(JsonPathError::Unexpected { ch: '$', offset: 1 });
        }
        let mut rest = &source[offset..];
        let mut base = offset;
        if offset == 1 {
            if let Some(stripped) = rest.strip_prefix('.') {
                rest = stripped;
                base += 1;
                if rest.is_empty() {
                    return Err(JsonPathError::TrailingDot);
                }
            } else if let Some(ch) = rest.chars().next().filter(|c| *c != '[') {
                return Err(JsonPathError::Unexpected { ch, offset: base });
            }
        }

        let steps = parse_steps(rest, base)?;
        Ok(Self {
            source: source.to_string(),
            steps,
        })
    }

    /// Resolves the path against a document.
    ///
    /// Returns `None` when the path does not resolve: a missing object key,
    /// an index out of range, or a field/index applied to a scalar.
    #[must_use]
    pub fn evaluate(&self, root: &Value) -> Option<Value> {
        let mut current = Cow::Borrowed(root);
        for step in &self.steps {
            current = match step {
                Step::Field(name) => field(current, name)?,
                Step::Index(index) => element(current, *index)?,
            };
        }
        Some(current.into_owned())
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_steps(path: &str, base: usize) -> Result<Vec<Step>, JsonPathError> {
    let chars: Vec<(usize, char)> = path.char_indices().collect();
    let mut steps = Vec::new();
    let mut i = 0;
    // A field may start here: at the beginning or right after a '.'.
    let mut at_segment_start = true;

    while i < chars.len() {
        let (pos, ch) = chars[i];
        let offset = base + pos;
        match ch {
            '.' => {
                if at_segment_start {
                    return Err(JsonPathError::Unexpected { ch, offset });
                }
                at_segment_start = true;
                i += 1;
                if i == chars.len() {
                    return Err(JsonPathError::TrailingDot);
                }
            }
            '[' => {
                if at_segment_start && !steps.is_empty() {
                    return Err(JsonPathError::Unexpected { ch, offset });
                }
                let close = chars[i + 1..]
                    .iter()
                    .position(|(_, c)| *c == ']')
                    .map(|p| i + 1 + p)
                    .ok_or(JsonPathError::UnterminatedBracket(offset))?;
                let raw: String = chars[i + 1..close].iter().map(|(_, c)| c).collect();
                let index = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| JsonPathError::InvalidIndex(raw.clone()))?;
                steps.push(Step::Index(index));
                at_segment_start = false;
                i = close + 1;
            }
            '\'' | '"' => {
                if !at_segment_start {
                    return Err(JsonPathError::Unexpected { ch, offset });
                }
                let close = chars[i + 1..]
                    .iter()
                    .position(|(_, c)| *c == ch)
                    .map(|p| i + 1 + p)
                    .ok_or(JsonPathError::UnterminatedQuote(offset))?;
                let name: String = chars[i + 1..close].iter().map(|(_, c)| c).collect();
                steps.push(Step::Field(name));
                at_segment_start = false;
                i = close + 1;
            }
            ']' => return Err(JsonPathError::Unexpected { ch, offset }),
            _ => {
                if !at_segment_start {
                    return Err(JsonPathError::Unexpected { ch, offset });
                }
                let end = chars[i..]
                    .iter()
                    .position(|(_, c)| matches!(c, '.' | '[' | ']' | '\'' | '"'))
                    .map_or(chars.len(), |p| i + p);
                let name: String = chars[i..end].iter().map(|(_, c)| c).collect();
                steps.push(Step::Field(name.trim().to_string()));
                at_segment_start = false;
                i = end;
            }
        }
    }

    Ok(steps)
}

fn field<'a>(value: Cow<'a, Value>, name: &str) -> Option<Cow<'a, Value>> {
    match value {
        Cow::Borrowed(Value::Object(map)) => map.get(name).map(Cow::Borrowed),
        Cow::Owned(Value::Object(mut map)) => map.remove(name).map(Cow::Owned),
        Cow::Borrowed(Value::Array(items)) => Some(Cow::Owned(project(items, name))),
        Cow::Owned(Value::Array(items)) => Some(Cow::Owned(project(&items, name))),
        _ => None,
    }
}

/// Collects `name` from every element; elements without it yield `null`.
fn project(items: &[Value], name: &str) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Null),
                Value::Array(inner) => project(inner, name),
                _ => Value::Null,
            })
            .collect(),
    )
}

fn element(value: Cow<'_, Value>, index: i64) -> Option<Cow<'_, Value>> {
    let len = match &*value {
        Value::Array(items) => items.len(),
        _ => return None,
    };
    let idx = normalize_index(index, len)?;
    match value {
        Cow::Borrowed(Value::Array(items)) => items.get(idx).map(Cow::Borrowed),
        Cow::Owned(Value::Array(mut items)) => Some(Cow::Owned(items.swap_remove(idx))),
        _ => None,
    }
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let idx = if index < 0 { len + index } else { index };
    if (0..len).contains(&idx) {
        usize::try_from(idx).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn zippo() -> Value {
        json!({
            "post code": "90210",
            "country": "United States",
            "country abbreviation": "US",
            "places": [
                {
                    "place name": "Beverly Hills",
                    "longitude": "-118.4065",
                    "state": "California",
                    "state abbreviation": "CA",
                    "latitude": "34.0901"
                }
            ]
        })
    }

    fn eval(path: &str, doc: &Value) -> Option<Value> {
        JsonPath::parse(path).unwrap().evaluate(doc)
    }

    #[test]
    fn test_top_level_field() {
        assert_eq!(eval("country", &zippo()), Some(json!("United States")));
        assert_eq!(eval("$.country", &zippo()), Some(json!("United States")));
    }

    #[test]
    fn test_indexed_field() {
        assert_eq!(eval("places[0].state", &zippo()), Some(json!("California")));
    }

    #[test]
    fn test_quoted_key() {
        assert_eq!(
            eval("places[0].'state abbreviation'", &zippo()),
            Some(json!("CA"))
        );
        assert_eq!(eval("\"post code\"", &zippo()), Some(json!("90210")));
    }

    #[test]
    fn test_projection_over_array() {
        let doc = json!({"places": [
            {"place name": "Büyükdikili Köyü"},
            {"place name": "Adana"},
            {"other": 1}
        ]});
        assert_eq!(
            eval("places.'place name'", &doc),
            Some(json!(["Büyükdikili Köyü", "Adana", null]))
        );
        assert_eq!(eval("places.'place name'[1]", &doc), Some(json!("Adana")));
    }

    #[test]
    fn test_nested_path() {
        let doc = json!({"meta": {"pagination": {"page": 3, "pages": 10}}});
        assert_eq!(eval("meta.pagination.page", &doc), Some(json!(3)));
    }

    #[test]
    fn test_negative_index() {
        let doc = json!({"items": [1, 2, 3]});
        assert_eq!(eval("items[-1]", &doc), Some(json!(3)));
        assert_eq!(eval("items[-4]", &doc), None);
    }

    #[test]
    fn test_root_path() {
        let doc = json!([1, 2]);
        assert_eq!(eval("$", &doc), Some(json!([1, 2])));
        assert_eq!(eval("$[0]", &doc), Some(json!(1)));
    }

    #[test]
    fn test_missing_paths_are_none() {
        assert_eq!(eval("missing", &zippo()), None);
        assert_eq!(eval("places[5].state", &zippo()), None);
        assert_eq!(eval("country.name", &zippo()), None);
        assert_eq!(eval("country[0]", &zippo()), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(JsonPath::parse("  "), Err(JsonPathError::Empty));
        assert_eq!(
            JsonPath::parse("places[0"),
            Err(JsonPathError::UnterminatedBracket(6))
        );
        assert_eq!(
            JsonPath::parse("places[x]"),
            Err(JsonPathError::InvalidIndex("x".to_string()))
        );
        assert_eq!(
            JsonPath::parse("places.'place name"),
            Err(JsonPathError::UnterminatedQuote(7))
        );
        assert_eq!(JsonPath::parse("places."), Err(JsonPathError::TrailingDot));
        assert_eq!(
            JsonPath::parse("a..b"),
            Err(JsonPathError::Unexpected { ch: '.', offset: 2 })
        );
        assert_eq!(
            JsonPath::parse("a.[0]"),
            Err(JsonPathError::Unexpected { ch: '[', offset: 2 })
        );
    }

    #[test]
    fn test_display_keeps_source() {
        let path = JsonPath::parse("places[0].'state abbreviation'").unwrap();
        assert_eq!(path.to_string(), "places[0].'state abbreviation'");
    }
}
