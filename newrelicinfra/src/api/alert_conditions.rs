//! Infra alert condition endpoints and wire structs

use super::client::Client;
use super::error::ApiError;
use serde::{Deserialize, Serialize};

/// Threshold describing when a condition triggers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertInfraThreshold {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,

    #[serde(rename = "duration_minutes", skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_function: Option<String>,
}

/// An infra alert condition as the API represents it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertInfraCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<String>,

    #[serde(default)]
    pub enabled: bool,

    #[serde(rename = "event_type", skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,

    #[serde(rename = "select_value", skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<String>,

    #[serde(rename = "where_clause", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    #[serde(
        rename = "created_at_epoch_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<i64>,

    #[serde(
        rename = "updated_at_epoch_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<i64>,

    #[serde(rename = "critical_threshold", skip_serializing_if = "Option::is_none")]
    pub critical: Option<AlertInfraThreshold>,

    #[serde(rename = "warning_threshold", skip_serializing_if = "Option::is_none")]
    pub warning: Option<AlertInfraThreshold>,
}

// Request and response bodies wrap the condition in a "data" envelope.

#[derive(Debug, Serialize)]
struct ConditionRequest {
    data: AlertInfraCondition,
}

#[derive(Debug, Deserialize)]
struct ConditionResponse {
    data: AlertInfraCondition,
}

#[derive(Debug, Deserialize)]
struct ConditionListResponse {
    data: Vec<AlertInfraCondition>,
}

impl Client {
    /// Create a condition under the policy set in `condition.policy_id`
    /// The server assigns `id` and the timestamps
    pub async fn create_alert_infra_condition(
        &self,
        condition: AlertInfraCondition,
    ) -> Result<AlertInfraCondition, ApiError> {
        let response: ConditionResponse = self
            .post("/alerts/conditions", &ConditionRequest { data: condition })
            .await?;
        Ok(response.data)
    }

    /// List every condition attached to a policy
    pub async fn list_alert_infra_conditions(
        &self,
        policy_id: i64,
    ) -> Result<Vec<AlertInfraCondition>, ApiError> {
        let response: ConditionListResponse = self
            .get(&format!("/alerts/conditions?policy_id={}", policy_id))
            .await?;
        Ok(response.data)
    }

    /// Fetch one condition by scanning the policy's condition list, the way
    /// the upstream API is addressed. `None` when neither the policy nor the
    /// condition exists anymore.
    pub async fn get_alert_infra_condition(
        &self,
        policy_id: i64,
        id: i64,
    ) -> Result<Option<AlertInfraCondition>, ApiError> {
        let conditions = match self.list_alert_infra_conditions(policy_id).await {
            Ok(conditions) => conditions,
            Err(ApiError::NotFound) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(conditions.into_iter().find(|c| c.id == Some(id)))
    }

    /// Update a condition in place; `condition.id` selects the target
    pub async fn update_alert_infra_condition(
        &self,
        condition: AlertInfraCondition,
    ) -> Result<AlertInfraCondition, ApiError> {
        let id = condition.id.ok_or_else(|| {
            ApiError::InvalidRequest("condition ID is required for update".to_string())
        })?;

        let response: ConditionResponse = self
            .put(
                &format!("/alerts/conditions/{}", id),
                &ConditionRequest { data: condition },
            )
            .await?;
        Ok(response.data)
    }

    pub async fn delete_alert_infra_condition(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/alerts/conditions/{}", id)).await
    }
}
