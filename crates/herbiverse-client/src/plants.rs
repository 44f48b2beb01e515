//! Plant lookup.

use std::sync::Arc;

use herbiverse_types::ValidationError;
use serde::Deserialize;

use crate::error::ClientError;
use crate::gateway::{Access, Gateway};

#[derive(Debug, Deserialize)]
struct PlantIdentity {
    #[serde(rename = "_id")]
    id: Option<String>,
}

/// Handle for the public plant endpoints.
#[derive(Debug, Clone)]
pub struct PlantsApi {
    gateway: Arc<Gateway>,
}

impl PlantsApi {
    /// Create a handle over a gate.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Server id of the plant called `name`, or `None` if unknown.
    pub async fn find_id(&self, name: &str) -> Result<Option<String>, ClientError> {
        ValidationError::require_text("name", name, "Plant name is required")?;
        let result: Result<PlantIdentity, _> =
            self.gateway.get(&["plants", "name", name], Access::Anonymous).await;

        match result {
            Ok(plant) => Ok(plant.id.filter(|id| !id.is_empty())),
            Err(ClientError::ServerError { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
