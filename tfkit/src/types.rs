//! Core value model for tfkit
//!
//! Configuration and state are both maps of attribute names to `Dynamic`
//! values. Resources read config through the typed accessors and build state
//! by inserting values back into the map.

use std::collections::HashMap;

/// Dynamic represents a Terraform attribute value of any type.
/// IMPORTANT: Always use the typed accessors instead of matching directly
#[derive(Debug, Clone, PartialEq)]
pub enum Dynamic {
    /// Explicit null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Number value (all numbers are f64 to match Terraform)
    Number(f64),
    /// String value
    String(String),
    /// List of values (ordered, allows duplicates)
    List(Vec<Dynamic>),
    /// Map of string keys to values (objects are represented as Maps)
    Map(HashMap<String, Dynamic>),
}

impl Dynamic {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Dynamic::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Dynamic::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Dynamic::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Dynamic]> {
        match self {
            Dynamic::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Dynamic>> {
        match self {
            Dynamic::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Dynamic::Null)
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Dynamic::Null => "null",
            Dynamic::Bool(_) => "bool",
            Dynamic::Number(_) => "number",
            Dynamic::String(_) => "string",
            Dynamic::List(_) => "list",
            Dynamic::Map(_) => "map",
        }
    }
}

/// Config holds the attribute values from a resource or provider block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub values: HashMap<String, Dynamic>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_string())
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(|v| v.as_number())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(|v| v.as_bool())
    }

    pub fn get_list(&self, name: &str) -> Option<&[Dynamic]> {
        self.values.get(name).and_then(|v| v.as_list())
    }
}

/// State holds the attribute values tracked for a resource instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub values: HashMap<String, Dynamic>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.as_string())
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(|v| v.as_number())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(|v| v.as_bool())
    }
}

/// Diagnostic represents a single warning or error from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: Option<String>,
}

/// Diagnostics collects errors and warnings raised while handling a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error<S: Into<String>, D: Into<String>>(&mut self, summary: S, detail: Option<D>) {
        self.errors.push(Diagnostic {
            summary: summary.into(),
            detail: detail.map(Into::into),
        });
    }

    pub fn add_warning<S: Into<String>, D: Into<String>>(&mut self, summary: S, detail: Option<D>) {
        self.warnings.push(Diagnostic {
            summary: summary.into(),
            detail: detail.map(Into::into),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
