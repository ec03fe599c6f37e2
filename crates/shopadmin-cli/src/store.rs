use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use shopadmin_core::{CoreError, EntityId, EntityStore, Product, Result, Version};

use crate::client::ApiClient;

/// REST-backed store for the editable catalog entities.
#[derive(Clone)]
pub struct CatalogStore {
    client: Arc<ApiClient>,
    page_size: u32,
}

impl CatalogStore {
    pub fn new(client: Arc<ApiClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

fn network(err: anyhow::Error) -> CoreError {
    CoreError::network(format!("{err:#}"))
}

#[async_trait]
impl EntityStore<Version> for CatalogStore {
    async fn fetch(&self, id: EntityId) -> Result<Version> {
        self.client.get_version(id).await.map_err(network)
    }

    async fn update(&self, id: EntityId, body: &Value) -> Result<()> {
        self.client
            .update_version(id, body)
            .await
            .map(|_| ())
            .map_err(network)
    }
}

#[async_trait]
impl EntityStore<Product> for CatalogStore {
    async fn fetch(&self, id: EntityId) -> Result<Product> {
        self.client
            .find_product(id, self.page_size)
            .await
            .map_err(network)?
            .ok_or_else(|| CoreError::not_found("product", id))
    }

    async fn update(&self, id: EntityId, body: &Value) -> Result<()> {
        self.client
            .update_product(id, body)
            .await
            .map(|_| ())
            .map_err(network)
    }
}
