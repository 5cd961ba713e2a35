//! Owned XML tree for the voting records, plus the generic value view used for summary blocks.

use crate::error::{Result, ScraperError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const ATTRIBUTES_KEY: &str = "$";
pub const TEXT_KEY: &str = "_";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlElement>,
    pub text: String,
}

impl XmlElement {
    pub fn parse(body: &str) -> Result<Self> {
        let body = body.trim_start_matches('\u{feff}');
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(body, options)?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = XmlElement {
            name: node.tag_name().name().to_string(),
            ..Default::default()
        };
        for attr in node.attributes() {
            element.attributes.insert(attr.name().to_string(), attr.value().to_string());
        }
        for child in node.children() {
            if child.is_element() {
                element.children.push(Self::from_node(child));
            } else if child.is_text() {
                element.text.push_str(child.text().unwrap_or_default());
            }
        }
        element
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn require_child(&self, name: &str) -> Result<&XmlElement> {
        self.child(name)
            .ok_or_else(|| ScraperError::MissingField(format!("<{}> in <{}>", name, self.name)))
    }

    pub fn require_attr(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| ScraperError::MissingField(format!("@{} on <{}>", name, self.name)))
    }

    /// Text content of the first child called `name`
    pub fn child_text(&self, name: &str) -> Result<String> {
        Ok(self.require_child(name)?.text.clone())
    }

    /// Nested-mapping view: attributes under `$`, text under `_`, every child
    /// element as an array under its tag name. Leaf elements collapse to their text.
    pub fn to_value(&self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(self.text.clone());
        }

        let mut map = Map::new();
        if !self.attributes.is_empty() {
            let attrs = self
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attrs));
        }
        if !self.text.trim().is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(self.text.clone()));
        }
        for child in &self.children {
            let entry = map
                .entry(child.name.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                items.push(child.to_value());
            }
        }
        Value::Object(map)
    }
}

/// Collapses sequences to their first element and recurses into mapping values.
/// `{a: [{b: [1]}]}` becomes `{a: {b: 1}}`.
pub fn unwrap_array(value: Value) -> Value {
    match value {
        Value::Array(items) => items.into_iter().next().map(unwrap_array).unwrap_or(Value::Null),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, unwrap_array(v))).collect()),
        other => other,
    }
}

/// Best-effort integer parse: leading whitespace, optional sign, then digits.
/// Anything without leading digits is returned unchanged.
pub fn try_parse_int(value: Value) -> Value {
    let Value::String(s) = &value else {
        return value;
    };
    let trimmed = s.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i64>() {
        Ok(n) => Value::from(sign * n),
        Err(_) => value,
    }
}
