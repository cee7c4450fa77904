//! The `newrelicinfra_alert_condition` resource
//!
//! Maps Terraform lifecycle verbs onto the infra alerting API. The remote
//! (policy ID, condition ID) pair is packed into the resource's single ID
//! token; see `crate::ids`.

use crate::api::{AlertInfraCondition, AlertInfraThreshold, Client};
use crate::ids::{parse_ids, serialize_ids};
use async_trait::async_trait;
use std::collections::HashMap;
use tfkit::{
    AttributeBuilder, Config, CreateRequest, CreateResponse, DeleteRequest, DeleteResponse,
    Diagnostics, Dynamic, ImportRequest, ImportResponse, NestedBlockBuilder, ReadRequest,
    ReadResponse, Resource, Schema, SchemaBuilder, State, StringInSetValidator, TfkitError,
    UpdateRequest, UpdateResponse,
};

pub const RESOURCE_TYPE_NAME: &str = "newrelicinfra_alert_condition";

pub struct AlertConditionResource {
    client: Client,
}

impl AlertConditionResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn threshold_block(type_name: &str) -> NestedBlockBuilder {
        NestedBlockBuilder::new(type_name)
            .min_items(1)
            .max_items(1)
            .attribute(AttributeBuilder::number("value").optional().build())
            .attribute(AttributeBuilder::number("duration").optional().build())
            .attribute(
                AttributeBuilder::string("time_function")
                    .optional()
                    .validator(StringInSetValidator::new(&["any", "all"]))
                    .build(),
            )
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::string("id")
                    .computed()
                    .description("Composite ID packing the policy ID and condition ID")
                    .build(),
            )
            .attribute(
                AttributeBuilder::number("policy_id")
                    .required()
                    .force_new()
                    .description("ID of the alert policy the condition belongs to")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .required()
                    .description("Name of the condition")
                    .build(),
            )
            .attribute(
                AttributeBuilder::bool("enabled")
                    .optional()
                    .default_value(Dynamic::Bool(true))
                    .description("Whether the condition is evaluated")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("type")
                    .required()
                    .force_new()
                    .validator(StringInSetValidator::new(&[
                        "infra_process_running",
                        "infra_metric",
                        "infra_host_not_reporting",
                    ]))
                    .description("Kind of infra condition")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("event")
                    .optional()
                    .description("Event type to evaluate")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("where")
                    .optional()
                    .description("Infrastructure WHERE clause limiting matched hosts")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("comparison")
                    .optional()
                    .validator(StringInSetValidator::new(&["above", "below", "equal"]))
                    .description("Comparison applied to the selected value")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("select")
                    .optional()
                    .description("Attribute compared against the threshold")
                    .build(),
            )
            .attribute(AttributeBuilder::number("created_at").computed().build())
            .attribute(AttributeBuilder::number("updated_at").computed().build())
            .block(Self::threshold_block("critical").build())
            .block(Self::threshold_block("warning").force_new().build())
            .build()
    }
}

fn build_condition_struct(config: &Config) -> tfkit::Result<AlertInfraCondition> {
    let policy_id = config.get_number("policy_id").ok_or("policy_id is required")? as i64;
    let name = config.get_string("name").ok_or("name is required")?;
    let condition_type = config.get_string("type").ok_or("type is required")?;

    Ok(AlertInfraCondition {
        policy_id: Some(policy_id),
        name: Some(name.to_string()),
        condition_type: Some(condition_type.to_string()),
        enabled: config.get_bool("enabled").unwrap_or(true),
        event: config.get_string("event").map(str::to_string),
        select: config.get_string("select").map(str::to_string),
        comparison: config.get_string("comparison").map(str::to_string),
        where_clause: config.get_string("where").map(str::to_string),
        critical: expand_threshold(config.values.get("critical")),
        warning: expand_threshold(config.values.get("warning")),
        ..Default::default()
    })
}

/// One-element threshold block list -> API struct
fn expand_threshold(value: Option<&Dynamic>) -> Option<AlertInfraThreshold> {
    let entry = value?.as_list()?.first()?.as_map()?;

    Some(AlertInfraThreshold {
        value: entry.get("value").and_then(|v| v.as_number()).map(|n| n as i64),
        duration: entry
            .get("duration")
            .and_then(|v| v.as_number())
            .map(|n| n as i64),
        time_function: entry
            .get("time_function")
            .and_then(|v| v.as_string())
            .map(str::to_string),
    })
}

/// API struct -> one-element threshold block list
fn flatten_threshold(threshold: &AlertInfraThreshold) -> Dynamic {
    let mut entry = HashMap::new();
    if let Some(value) = threshold.value {
        entry.insert("value".to_string(), Dynamic::Number(value as f64));
    }
    if let Some(duration) = threshold.duration {
        entry.insert("duration".to_string(), Dynamic::Number(duration as f64));
    }
    if let Some(time_function) = &threshold.time_function {
        entry.insert(
            "time_function".to_string(),
            Dynamic::String(time_function.clone()),
        );
    }
    Dynamic::List(vec![Dynamic::Map(entry)])
}

/// Assemble resource state from an API condition
///
/// The API does not echo every configured attribute back, so `type`, `event`,
/// `comparison` and `select` are carried over from the config or prior state
/// that `carried` points at.
fn condition_state(
    id: &str,
    policy_id: i64,
    condition: &AlertInfraCondition,
    carried: &HashMap<String, Dynamic>,
) -> State {
    let mut values = HashMap::new();

    values.insert("id".to_string(), Dynamic::String(id.to_string()));
    values.insert(
        "policy_id".to_string(),
        Dynamic::Number(policy_id as f64),
    );
    values.insert("enabled".to_string(), Dynamic::Bool(condition.enabled));

    if let Some(name) = &condition.name {
        values.insert("name".to_string(), Dynamic::String(name.clone()));
    }
    if let Some(created_at) = condition.created_at {
        values.insert("created_at".to_string(), Dynamic::Number(created_at as f64));
    }
    if let Some(updated_at) = condition.updated_at {
        values.insert("updated_at".to_string(), Dynamic::Number(updated_at as f64));
    }
    if let Some(where_clause) = &condition.where_clause {
        if !where_clause.is_empty() {
            values.insert("where".to_string(), Dynamic::String(where_clause.clone()));
        }
    }
    if let Some(critical) = &condition.critical {
        values.insert("critical".to_string(), flatten_threshold(critical));
    }
    if let Some(warning) = &condition.warning {
        values.insert("warning".to_string(), flatten_threshold(warning));
    }

    for name in ["type", "event", "comparison", "select"] {
        if let Some(value) = carried.get(name) {
            if !value.is_null() {
                values.insert(name.to_string(), value.clone());
            }
        }
    }

    State { values }
}

#[async_trait]
impl Resource for AlertConditionResource {
    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn create(&self, request: CreateRequest) -> tfkit::Result<CreateResponse> {
        let schema = Self::schema_static();
        let mut config = request.config;
        schema.apply_defaults(&mut config);

        let diagnostics = schema.validate(&config);
        if diagnostics.has_errors() {
            return Ok(CreateResponse {
                state: request.planned_state,
                diagnostics,
            });
        }

        let condition = build_condition_struct(&config)?;
        tracing::info!(
            "creating New Relic Infra alert condition {}",
            condition.name.as_deref().unwrap_or_default()
        );

        let created = self
            .client
            .create_alert_infra_condition(condition)
            .await
            .map_err(|e| format!("failed to create alert condition: {}", e))?;

        let policy_id = created.policy_id.ok_or("API response missing policy_id")?;
        let condition_id = created.id.ok_or("API response missing condition ID")?;
        let id = serialize_ids(&[policy_id, condition_id]);

        let state = condition_state(&id, policy_id, &created, &config.values);
        Ok(CreateResponse { state, diagnostics })
    }

    async fn read(&self, request: ReadRequest) -> tfkit::Result<ReadResponse> {
        let diagnostics = Diagnostics::new();

        let id = request
            .current_state
            .get_string("id")
            .ok_or("id is missing from state")?
            .to_string();
        let ids = parse_ids(&id, 2)?;
        let (policy_id, condition_id) = (ids[0], ids[1]);

        tracing::info!("reading New Relic Infra alert condition {}", id);

        let condition = self
            .client
            .get_alert_infra_condition(policy_id, condition_id)
            .await
            .map_err(|e| format!("failed to read alert condition: {}", e))?;

        match condition {
            Some(condition) => Ok(ReadResponse {
                state: Some(condition_state(
                    &id,
                    policy_id,
                    &condition,
                    &request.current_state.values,
                )),
                diagnostics,
            }),
            // Deleted out of band; drop it from state
            None => Ok(ReadResponse {
                state: None,
                diagnostics,
            }),
        }
    }

    async fn update(&self, request: UpdateRequest) -> tfkit::Result<UpdateResponse> {
        let schema = Self::schema_static();
        let mut config = request.config;
        schema.apply_defaults(&mut config);

        let diagnostics = schema.validate(&config);
        if diagnostics.has_errors() {
            return Ok(UpdateResponse {
                state: request.current_state,
                diagnostics,
            });
        }

        let id = request
            .current_state
            .get_string("id")
            .ok_or("id is missing from state")?
            .to_string();
        let ids = parse_ids(&id, 2)?;

        let mut condition = build_condition_struct(&config)?;
        condition.policy_id = Some(ids[0]);
        condition.id = Some(ids[1]);

        tracing::info!("updating New Relic Infra alert condition {}", ids[1]);

        let updated = self
            .client
            .update_alert_infra_condition(condition)
            .await
            .map_err(|e| format!("failed to update alert condition: {}", e))?;

        let state = condition_state(&id, ids[0], &updated, &config.values);
        Ok(UpdateResponse { state, diagnostics })
    }

    async fn delete(&self, request: DeleteRequest) -> tfkit::Result<DeleteResponse> {
        let diagnostics = Diagnostics::new();

        let id = request
            .current_state
            .get_string("id")
            .ok_or("id is missing from state")?;
        let ids = parse_ids(id, 2)?;

        tracing::info!("deleting New Relic Infra alert condition {}", ids[1]);

        self.client
            .delete_alert_infra_condition(ids[1])
            .await
            .map_err(|e| format!("failed to delete alert condition: {}", e))?;

        Ok(DeleteResponse { diagnostics })
    }

    async fn import(&self, request: ImportRequest) -> tfkit::Result<ImportResponse> {
        // Passthrough import; the refresh that follows fills in the rest
        parse_ids(&request.id, 2).map_err(|e| TfkitError::ImportFailed(e.to_string()))?;

        let mut values = HashMap::new();
        values.insert("id".to_string(), Dynamic::String(request.id.clone()));

        Ok(ImportResponse {
            state: State { values },
            diagnostics: Diagnostics::new(),
        })
    }
}
