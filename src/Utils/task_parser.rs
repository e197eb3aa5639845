/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values. A template lists the keys a caller expects: keys of the template missing from the
/// document appear in the result as `key: None`.
///
/// A scene document:
/// ```text
/// // comments start with //, # or %
/// function
///  id: custom
///  expression: "0.5*x^2 + 1"
/// interval
///  a: -2 b: 4
/// family
///  constants: -3, -1.5, 0, 1.5, 3
/// ```
/// Values of one key are separated by commas, pairs by whitespace. Unquoted values end at a comma or
/// whitespace; quoted values may contain both.
use crate::errors::ConfigError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, char, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::fmt::Display;

pub type DocumentMap = HashMap<String, SectionMap>;
pub type SectionMap = HashMap<String, Option<Vec<Value>>>;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    // Helper functions to access different value types
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Integers are accepted where a real number is expected.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        match self {
            Value::Integer(i) if *i >= 0 => Some(*i as usize),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = identifier(input)?;
    let input = input.trim();
    Ok((input, result))
}

pub(crate) fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let mut parser = map(
        delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        |s: &str| Value::String(s.to_string()),
    );
    parser.parse(input)
}

/// Unquoted value, ended by a separator or `:`. Values containing `:` must be quoted.
fn parse_bare(input: &str) -> IResult<&str, Value> {
    let value_parser =
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';' | ':' | '"'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        let s = s.trim();
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare)).parse(input)
}

pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    let input = input.trim_start_matches(';');
    Ok((input.trim(), result))
}

pub(crate) fn parse_section(input: &str) -> IResult<&str, (String, HashMap<String, Vec<Value>>)> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;

    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, multispace0));
    let (input, pairs) = parser.parse(input)?;

    let mut section_map = HashMap::new();
    for (key, values) in pairs {
        section_map.insert(key, values);
    }

    Ok((input, (title, section_map)))
}

/// Drops blank lines and lines starting with `//`, `#`, `%`.
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

pub fn parse_document(input: &str) -> IResult<&str, DocumentMap> {
    let mut parser = many1(delimited(
        multispace0, // Allow optional whitespace before a section
        parse_section,
        multispace0, // Allow optional whitespace after a section
    ));

    let (input, sections) = parser.parse(input)?;

    let mut result: DocumentMap = HashMap::new();
    for (title, section_map) in sections.into_iter() {
        // a repeated section extends the earlier one
        let title_map = result.entry(title).or_default();
        for (key, values) in section_map {
            title_map.insert(key, Some(values));
        }
    }

    Ok((input, result))
}

/// Parses a whole document (comments removed first). With a template, every templated section
/// and key is present in the result, absent ones as `None`.
pub fn parse_document_as(
    input: &str,
    template: Option<&DocumentMap>,
) -> Result<DocumentMap, ConfigError> {
    let filtered = filter_comments(input);
    let (remaining, mut parsed) = match parse_document(&filtered) {
        Ok(result) => result,
        Err(e) => return Err(ConfigError::Parse(format!("{:?}", e))),
    };
    if !remaining.trim().is_empty() {
        return Err(ConfigError::Parse(format!(
            "Failed to parse entire document. Remaining: '{}'",
            remaining
        )));
    }
    if let Some(template) = template {
        for (title, keys_map) in template {
            let section_map = parsed.entry(title.clone()).or_default();
            for key in keys_map.keys() {
                section_map.entry(key.clone()).or_insert(None);
            }
        }
    }
    Ok(parsed)
}

/// Values of `section.key`, `None` when absent or given without values.
pub fn lookup<'a>(document: &'a DocumentMap, section: &str, key: &str) -> Option<&'a [Value]> {
    document
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_deref())
        .filter(|v| !v.is_empty())
}
