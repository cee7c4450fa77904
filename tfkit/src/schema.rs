//! Schema types and builders for tfkit
//!
//! Schemas declare the shape of a resource or provider configuration block:
//! attributes with types, requiredness and validators, plus nested blocks
//! with item-count bounds. `Schema::validate` checks a `Config` against the
//! declaration and `Schema::apply_defaults` fills in declared defaults.

use crate::types::{Config, Diagnostics, Dynamic};
use crate::validator::Validator;
use std::collections::HashMap;
use std::sync::Arc;

/// AttributeType defines the type system for attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number, // Always f64
    Bool,
    List(Box<AttributeType>),
}

impl AttributeType {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Bool => "bool",
            AttributeType::List(_) => "list",
        }
    }

    fn matches(&self, value: &Dynamic) -> bool {
        match (self, value) {
            (AttributeType::String, Dynamic::String(_)) => true,
            (AttributeType::Number, Dynamic::Number(_)) => true,
            (AttributeType::Bool, Dynamic::Bool(_)) => true,
            (AttributeType::List(elem), Dynamic::List(items)) => {
                items.iter().all(|item| elem.matches(item))
            }
            _ => false,
        }
    }
}

/// Attribute represents a single configuration attribute
#[derive(Clone)]
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing this attribute requires replacing the resource
    pub force_new: bool,
    /// Static default applied when the attribute is absent from config
    pub default: Option<Dynamic>,
    pub validators: Vec<Arc<dyn Validator>>,
}

// Manual Debug implementation since validators don't implement Debug
impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("force_new", &self.force_new)
            .field("default", &self.default)
            .field(
                "validators",
                &format!("{} validators", self.validators.len()),
            )
            .finish()
    }
}

/// NestedBlock represents a named nested configuration block, modeled as a
/// list of objects with item-count bounds
#[derive(Debug, Clone)]
pub struct NestedBlock {
    pub type_name: String,
    pub description: String,
    pub attributes: HashMap<String, Attribute>,
    pub required: bool,
    pub force_new: bool,
    pub min_items: usize,
    pub max_items: usize,
}

/// Schema is returned by providers and resources
#[derive(Debug, Clone)]
pub struct Schema {
    /// Incremented when schema changes require state migration
    pub version: i64,
    pub attributes: HashMap<String, Attribute>,
    pub blocks: HashMap<String, NestedBlock>,
}

impl Schema {
    /// Validate a config against this schema
    ///
    /// Checks required attributes, value types, per-attribute validators and
    /// nested block item counts. Computed attributes may be absent.
    pub fn validate(&self, config: &Config) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for (name, attr) in &self.attributes {
            validate_attribute(name, attr, config.values.get(name), &mut diags);
        }

        for (name, block) in &self.blocks {
            match config.values.get(name) {
                None | Some(Dynamic::Null) => {
                    if block.required {
                        diags.add_error(format!("{} block is required", name), None::<String>);
                    }
                }
                Some(Dynamic::List(items)) => {
                    if items.len() < block.min_items || items.len() > block.max_items {
                        diags.add_error(
                            format!(
                                "{} must contain between {} and {} blocks",
                                name, block.min_items, block.max_items
                            ),
                            Some(format!("Got {}", items.len())),
                        );
                        continue;
                    }
                    for (idx, item) in items.iter().enumerate() {
                        let Some(entry) = item.as_map() else {
                            diags.add_error(
                                format!("{}.{} must be a block", name, idx),
                                Some(format!("Got {}", item.type_name())),
                            );
                            continue;
                        };
                        for (attr_name, attr) in &block.attributes {
                            let path = format!("{}.{}.{}", name, idx, attr_name);
                            validate_attribute(&path, attr, entry.get(attr_name), &mut diags);
                        }
                    }
                }
                Some(other) => {
                    diags.add_error(
                        format!("{} must be a list of blocks", name),
                        Some(format!("Got {}", other.type_name())),
                    );
                }
            }
        }

        if diags.has_errors() {
            tracing::debug!(
                errors = diags.errors.len(),
                "schema validation produced errors"
            );
        }

        diags
    }

    /// Fill absent optional attributes that declare a static default
    pub fn apply_defaults(&self, config: &mut Config) {
        for (name, attr) in &self.attributes {
            let Some(default) = &attr.default else {
                continue;
            };
            let absent = matches!(config.values.get(name), None | Some(Dynamic::Null));
            if absent {
                config.values.insert(name.clone(), default.clone());
            }
        }
    }
}

fn validate_attribute(
    path: &str,
    attr: &Attribute,
    value: Option<&Dynamic>,
    diags: &mut Diagnostics,
) {
    match value {
        None | Some(Dynamic::Null) => {
            if attr.required {
                diags.add_error(format!("{} is required", path), None::<String>);
            }
        }
        Some(value) => {
            if !attr.r#type.matches(value) {
                diags.add_error(
                    format!("{} must be a {}", path, attr.r#type.name()),
                    Some(format!("Got {}", value.type_name())),
                );
                return;
            }
            for validator in &attr.validators {
                validator.validate(value, path, diags);
            }
        }
    }
}

/// AttributeBuilder provides a fluent API for building attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                force_new: false,
                default: None,
                validators: Vec::new(),
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.attribute.force_new = true;
        self
    }

    pub fn default_value(mut self, value: Dynamic) -> Self {
        self.attribute.default = Some(value);
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.attribute.validators.push(Arc::new(validator));
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// NestedBlockBuilder provides a fluent API for building nested blocks
pub struct NestedBlockBuilder {
    block: NestedBlock,
}

impl NestedBlockBuilder {
    pub fn new(type_name: &str) -> Self {
        Self {
            block: NestedBlock {
                type_name: type_name.to_string(),
                description: String::new(),
                attributes: HashMap::new(),
                required: false,
                force_new: false,
                min_items: 0,
                max_items: usize::MAX,
            },
        }
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.block.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.block.required = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.block.force_new = true;
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.block.min_items = min;
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.block.max_items = max;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.block.attributes.insert(attr.name.clone(), attr);
        self
    }

    pub fn build(self) -> NestedBlock {
        self.block
    }
}

/// SchemaBuilder provides a fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                attributes: HashMap::new(),
                blocks: HashMap::new(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.attributes.insert(attr.name.clone(), attr);
        self
    }

    pub fn block(mut self, block: NestedBlock) -> Self {
        self.schema.blocks.insert(block.type_name.clone(), block);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
