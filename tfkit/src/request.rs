//! Request and response envelopes for provider and resource operations

use crate::context::Context;
use crate::types::{Config, Diagnostics, State};

#[derive(Clone)]
pub struct ConfigureRequest {
    pub context: Context,
    pub config: Config,
}

#[derive(Clone)]
pub struct ConfigureResponse {
    pub diagnostics: Diagnostics,
}

#[derive(Clone)]
pub struct CreateRequest {
    pub context: Context,
    pub config: Config,
    pub planned_state: State,
}

#[derive(Clone)]
pub struct CreateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Clone)]
pub struct ReadRequest {
    pub context: Context,
    pub current_state: State,
}

#[derive(Clone)]
pub struct ReadResponse {
    /// None means the remote object no longer exists and should be dropped
    /// from state
    pub state: Option<State>,
    pub diagnostics: Diagnostics,
}

#[derive(Clone)]
pub struct UpdateRequest {
    pub context: Context,
    pub config: Config,
    pub planned_state: State,
    pub current_state: State,
}

#[derive(Clone)]
pub struct UpdateResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

#[derive(Clone)]
pub struct DeleteRequest {
    pub context: Context,
    pub current_state: State,
}

#[derive(Clone)]
pub struct DeleteResponse {
    pub diagnostics: Diagnostics,
}

#[derive(Clone)]
pub struct ImportRequest {
    pub context: Context,
    /// Externally supplied identifier, e.g. from `terraform import`
    pub id: String,
}

#[derive(Clone)]
pub struct ImportResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}
