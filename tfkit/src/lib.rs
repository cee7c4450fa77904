//! tfkit - trait-level Terraform plugin framework
//!
//! Declares the schema, value and lifecycle model that providers are written
//! against: dynamic values, schema declarations with validators, and async
//! provider/resource traits with request/response envelopes. The wire
//! protocol between Terraform and the provider process is out of scope.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;
pub mod validator;

// Provider API modules
pub mod provider;
pub mod request;
pub mod resource;

// Re-exports for convenience
pub use context::Context;
pub use error::{Result, TfkitError};
pub use provider::Provider;
pub use request::{
    ConfigureRequest, ConfigureResponse, CreateRequest, CreateResponse, DeleteRequest,
    DeleteResponse, ImportRequest, ImportResponse, ReadRequest, ReadResponse, UpdateRequest,
    UpdateResponse,
};
pub use resource::Resource;
pub use schema::{
    Attribute, AttributeBuilder, AttributeType, NestedBlock, NestedBlockBuilder, Schema,
    SchemaBuilder,
};
pub use types::{Config, Diagnostic, Diagnostics, Dynamic, State};
pub use validator::{NumberRangeValidator, StringInSetValidator, Validator};
