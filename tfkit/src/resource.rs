//! Resource trait mapping Terraform lifecycle verbs onto remote calls

use crate::error::{Result, TfkitError};
use crate::request::{
    CreateRequest, CreateResponse, DeleteRequest, DeleteResponse, ImportRequest, ImportResponse,
    ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
};
use crate::schema::Schema;
use async_trait::async_trait;

/// A single managed resource type with a schema and CRUD lifecycle
#[async_trait]
pub trait Resource: Send + Sync {
    /// Schema for this resource - cache the construction in your implementation
    fn schema(&self) -> Schema;

    /// Create a new remote object
    /// MUST populate all known attributes in the returned state, including
    /// computed ones
    async fn create(&self, request: CreateRequest) -> Result<CreateResponse>;

    /// Read current remote state - used for refresh and after create/update
    /// MUST return `state: None` when the remote object no longer exists
    async fn read(&self, request: ReadRequest) -> Result<ReadResponse>;

    /// Apply config changes to an existing remote object
    async fn update(&self, request: UpdateRequest) -> Result<UpdateResponse>;

    /// Remove the remote object completely
    async fn delete(&self, request: DeleteRequest) -> Result<DeleteResponse>;

    /// Seed state from an externally supplied ID (`terraform import`)
    /// The following refresh fills in the remaining attributes
    async fn import(&self, request: ImportRequest) -> Result<ImportResponse> {
        Err(TfkitError::ImportFailed(format!(
            "resource does not support import (id '{}')",
            request.id
        )))
    }
}
