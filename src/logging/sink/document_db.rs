//! Azure Cosmos DB sink
//!
//! Every record becomes one document in the configured container. Documents
//! get a random `id` and are partitioned by API id. `prepare` creates the
//! database and then the container when they are missing.

use super::LogSink;
use crate::config::DocumentDbConfig;
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use crate::logging::record::LogRecord;
use async_trait::async_trait;
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{ContainerProperties, IndexingPolicy, PartitionKeyDefinition};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, PartitionKey};
use serde::Serialize;
use std::borrow::Cow;

/// Partition key path of the log container
pub const PARTITION_KEY_PATH: &str = "/partition_key";

/// Stored form of a record
#[derive(Debug, Serialize)]
struct LogDocument<'a> {
    id: String,
    partition_key: String,
    #[serde(flatten)]
    record: &'a LogRecord,
}

pub struct DocumentDbSink {
    client: CosmosClient,
    database: DatabaseClient,
    container: ContainerClient,
    database_name: String,
    container_name: String,
}

impl DocumentDbSink {
    /// Create the sink; no request is sent until the first write
    pub fn new(config: &DocumentDbConfig) -> Result<Self> {
        use secrecy::ExposeSecret;

        let key = Secret::new(config.key.expose_secret().as_ref().to_string());
        let options = Some(CosmosClientOptions::default());

        let client = CosmosClient::with_key(&config.endpoint, key, options).map_err(|e| {
            AppError::Database(format!("Failed to create Cosmos client: {e}"))
        })?;

        let database = client.database_client(&config.database);
        let container = database.container_client(&config.container);

        Ok(Self {
            client,
            database,
            container,
            database_name: config.database.clone(),
            container_name: config.container.clone(),
        })
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Create the database if it does not exist yet
    pub async fn ensure_database(&self) -> Result<()> {
        if self.database.read(None).await.is_ok() {
            tracing::debug!(database = %self.database_name, "Log database already exists");
            return Ok(());
        }

        tracing::info!(database = %self.database_name, "Creating log database");
        self.client
            .create_database(&self.database_name, None)
            .await
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to create database {}: {e}",
                    self.database_name
                ))
            })?;
        Ok(())
    }

    /// Create the log container if it does not exist yet
    ///
    /// The database must exist; see [`Self::ensure_database`].
    pub async fn ensure_container(&self) -> Result<()> {
        if self.container.read(None).await.is_ok() {
            tracing::debug!(container = %self.container_name, "Log container already exists");
            return Ok(());
        }

        tracing::info!(container = %self.container_name, "Creating log container");
        let properties = ContainerProperties {
            id: Cow::Owned(self.container_name.clone()),
            partition_key: PartitionKeyDefinition {
                paths: vec![PARTITION_KEY_PATH.to_string()],
                kind: azure_data_cosmos::models::PartitionKeyKind::Hash,
                version: None,
            },
            indexing_policy: Some(IndexingPolicy::default()),
            ..Default::default()
        };

        self.database
            .create_container(properties, None)
            .await
            .map_err(|e| {
                AppError::Database(format!(
                    "Failed to create container {}: {e}",
                    self.container_name
                ))
            })?;
        Ok(())
    }
}

#[async_trait]
impl LogSink for DocumentDbSink {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn write(&self, record: &LogRecord) -> Result<()> {
        let partition_key = record.api_id.to_string();
        let document = serde_json::to_value(LogDocument {
            id: uuid::Uuid::new_v4().to_string(),
            partition_key: partition_key.clone(),
            record,
        })?;

        self.container
            .create_item(PartitionKey::from(partition_key), document, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert log record: {e}")))?;
        Ok(())
    }

    async fn prepare(&self) -> Result<()> {
        self.ensure_database().await?;
        self.ensure_container().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::logging::{LogEntry, LogLevel, LogMode, Logger};

    #[test]
    fn test_document_shape() {
        let logger = Logger::console(4, LogMode::Error).with_string_args(true);
        let record = logger.record(LogEntry::new(LogLevel::Warning, 400, "bad"));
        let document = serde_json::to_value(LogDocument {
            id: "1".to_string(),
            partition_key: "4".to_string(),
            record: &record,
        })
        .unwrap();

        assert_eq!(document["id"], "1");
        assert_eq!(document["partition_key"], "4");
        assert_eq!(document["api_id"], "4");
        assert_eq!(document["message"], "bad");
    }

    #[test]
    fn test_new_does_not_connect() {
        let config = DocumentDbConfig {
            endpoint: "https://localhost:8081/".to_string(),
            key: secret_string("a2V5".to_string()),
            database: "db".to_string(),
            container: "logs".to_string(),
        };
        let sink = DocumentDbSink::new(&config).unwrap();
        assert_eq!(sink.database_name(), "db");
        assert_eq!(sink.container_name(), "logs");
        assert_eq!(sink.name(), "database");
    }
}
