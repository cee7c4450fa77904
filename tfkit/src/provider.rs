//! Provider trait tying configuration to the resource types it serves

use crate::error::Result;
use crate::request::{ConfigureRequest, ConfigureResponse};
use crate::resource::Resource;
use crate::schema::Schema;
use async_trait::async_trait;
use std::collections::HashMap;

/// A plugin exposing one or more manageable resource types
#[async_trait]
pub trait Provider: Send + Sync {
    /// Schema for the provider's own configuration block
    fn schema(&self) -> Schema;

    /// Called once with the provider configuration before any resource is
    /// served. Builds clients and stores them for `create_resource`.
    async fn configure(&mut self, request: ConfigureRequest) -> ConfigureResponse;

    /// Instantiate a resource handler by type name
    /// Fails when the provider has not been configured or the name is unknown
    async fn create_resource(&self, name: &str) -> Result<Box<dyn Resource>>;

    /// Schemas for every resource type this provider registers, keyed by
    /// type name
    fn resource_schemas(&self) -> HashMap<String, Schema>;
}
