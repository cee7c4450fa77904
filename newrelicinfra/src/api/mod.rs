//! New Relic Infrastructure alerting API client

mod alert_conditions;
mod client;
mod error;

pub use alert_conditions::{AlertInfraCondition, AlertInfraThreshold};
pub use client::Client;
pub use error::ApiError;
