//! Terraform provider for New Relic Infrastructure alerting
//!
//! Registers the `newrelicinfra_alert_condition` resource and builds the
//! authenticated REST client from provider configuration.

pub mod api;
pub mod ids;
pub mod resources;

use async_trait::async_trait;
use resources::alert_condition::RESOURCE_TYPE_NAME;
use std::collections::HashMap;
use tfkit::{
    AttributeBuilder, ConfigureRequest, ConfigureResponse, Diagnostics, Provider, Resource, Schema,
    SchemaBuilder, TfkitError,
};

pub const DEFAULT_API_URL: &str = "https://infra-api.newrelic.com/v2";

pub struct NewRelicInfraProvider {
    client: Option<api::Client>,
}

impl Default for NewRelicInfraProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl NewRelicInfraProvider {
    pub fn new() -> Self {
        Self { client: None }
    }
}

#[async_trait]
impl Provider for NewRelicInfraProvider {
    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::string("api_key")
                    .required()
                    .sensitive()
                    .description("New Relic API key (or NEWRELIC_API_KEY)")
                    .build(),
            )
            .attribute(
                AttributeBuilder::string("api_url")
                    .optional()
                    .description("Infra alerting API base URL (or NEWRELIC_INFRA_API_URL)")
                    .build(),
            )
            .build()
    }

    async fn configure(&mut self, request: ConfigureRequest) -> ConfigureResponse {
        let api_key = request
            .config
            .get_string("api_key")
            .map(|s| s.to_string())
            .or_else(|| std::env::var("NEWRELIC_API_KEY").ok());

        let api_url = request
            .config
            .get_string("api_url")
            .map(|s| s.to_string())
            .or_else(|| std::env::var("NEWRELIC_INFRA_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let mut diags = Diagnostics::new();

        match api_key {
            Some(api_key) => {
                tracing::info!("initializing New Relic Infra client for {}", api_url);
                match api::Client::new(&api_url, &api_key) {
                    Ok(client) => {
                        self.client = Some(client);
                    }
                    Err(e) => {
                        diags.add_error(
                            format!("Failed to create API client: {}", e),
                            None::<String>,
                        );
                    }
                }
            }
            None => {
                diags.add_error(
                    "api_key is required (set in provider config or NEWRELIC_API_KEY env var)",
                    None::<String>,
                );
            }
        }

        ConfigureResponse { diagnostics: diags }
    }

    async fn create_resource(&self, name: &str) -> tfkit::Result<Box<dyn Resource>> {
        let client = self
            .client
            .as_ref()
            .ok_or(TfkitError::ProviderNotConfigured)?
            .clone();

        match name {
            RESOURCE_TYPE_NAME => Ok(Box::new(resources::AlertConditionResource::new(client))),
            _ => Err(TfkitError::ResourceNotFound(name.to_string())),
        }
    }

    fn resource_schemas(&self) -> HashMap<String, Schema> {
        static SCHEMAS: std::sync::OnceLock<HashMap<String, Schema>> = std::sync::OnceLock::new();

        SCHEMAS
            .get_or_init(|| {
                let mut schemas = HashMap::new();
                schemas.insert(
                    RESOURCE_TYPE_NAME.to_string(),
                    resources::AlertConditionResource::schema_static(),
                );
                schemas
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tfkit::{Config, Context, Dynamic};

    fn configure_request_with(values: &[(&str, &str)]) -> ConfigureRequest {
        let mut config = Config::new();
        for (name, value) in values {
            config
                .values
                .insert(name.to_string(), Dynamic::String(value.to_string()));
        }
        ConfigureRequest {
            context: Context::new(),
            config,
        }
    }

    #[tokio::test]
    #[serial]
    async fn provider_configures_from_config_values() {
        std::env::remove_var("NEWRELIC_API_KEY");
        std::env::remove_var("NEWRELIC_INFRA_API_URL");

        let mut provider = NewRelicInfraProvider::new();
        let response = provider
            .configure(configure_request_with(&[("api_key", "secret-key")]))
            .await;

        assert!(response.diagnostics.errors.is_empty());
        assert!(provider.client.is_some());
    }

    #[tokio::test]
    #[serial]
    async fn provider_configures_from_env_vars() {
        std::env::set_var("NEWRELIC_API_KEY", "env-key");
        std::env::set_var("NEWRELIC_INFRA_API_URL", "https://infra.example.com/v2");

        let mut provider = NewRelicInfraProvider::new();
        let response = provider.configure(configure_request_with(&[])).await;

        assert!(response.diagnostics.errors.is_empty());
        assert!(provider.client.is_some());

        std::env::remove_var("NEWRELIC_API_KEY");
        std::env::remove_var("NEWRELIC_INFRA_API_URL");
    }

    #[tokio::test]
    #[serial]
    async fn provider_configure_requires_api_key() {
        std::env::remove_var("NEWRELIC_API_KEY");

        let mut provider = NewRelicInfraProvider::new();
        let response = provider.configure(configure_request_with(&[])).await;

        assert!(!response.diagnostics.errors.is_empty());
        assert!(response.diagnostics.errors[0]
            .summary
            .contains("api_key is required"));
    }

    #[tokio::test]
    #[serial]
    async fn provider_configure_rejects_invalid_api_url() {
        std::env::remove_var("NEWRELIC_API_KEY");
        std::env::remove_var("NEWRELIC_INFRA_API_URL");

        let mut provider = NewRelicInfraProvider::new();
        let response = provider
            .configure(configure_request_with(&[
                ("api_key", "secret-key"),
                ("api_url", "not a url"),
            ]))
            .await;

        assert!(!response.diagnostics.errors.is_empty());
        assert!(response.diagnostics.errors[0]
            .summary
            .contains("Failed to create API client"));
    }

    #[tokio::test]
    #[serial]
    async fn provider_creates_resources_after_configuration() {
        std::env::remove_var("NEWRELIC_INFRA_API_URL");

        let mut provider = NewRelicInfraProvider::new();
        provider
            .configure(configure_request_with(&[("api_key", "secret-key")]))
            .await;

        let resource = provider
            .create_resource("newrelicinfra_alert_condition")
            .await;
        assert!(resource.is_ok());

        let unknown = provider.create_resource("newrelicinfra_unknown").await;
        assert!(matches!(unknown, Err(TfkitError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn provider_fails_to_create_resources_before_configuration() {
        let provider = NewRelicInfraProvider::new();

        let resource = provider
            .create_resource("newrelicinfra_alert_condition")
            .await;
        assert!(matches!(resource, Err(TfkitError::ProviderNotConfigured)));
    }

    #[tokio::test]
    async fn provider_schema_marks_api_key_sensitive() {
        let provider = NewRelicInfraProvider::new();
        let schema = provider.schema();

        assert!(schema.attributes["api_key"].required);
        assert!(schema.attributes["api_key"].sensitive);
        assert!(schema.attributes["api_url"].optional);
    }

    #[tokio::test]
    async fn provider_registers_the_alert_condition_resource() {
        let provider = NewRelicInfraProvider::new();
        let schemas = provider.resource_schemas();

        assert_eq!(schemas.len(), 1);
        assert!(schemas.contains_key("newrelicinfra_alert_condition"));
    }
}
