//! Favourites endpoints.

use std::sync::Arc;

use herbiverse_types::models::{FavouriteRequest, FavouriteStatus};
use herbiverse_types::{AddFavouriteOutcome, Favourite, ValidationError};
use reqwest::Method;

use crate::error::ClientError;
use crate::gateway::{Access, Gateway};

/// Handle for `/api/favourite`. All calls need a stored token.
#[derive(Debug, Clone)]
pub struct FavouritesApi {
    gateway: Arc<Gateway>,
}

impl FavouritesApi {
    /// Create a handle over a gate.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// The user's favourites.
    pub async fn list(&self) -> Result<Vec<Favourite>, ClientError> {
        self.gateway.require_token()?;
        self.gateway.get(&["api", "favourite"], Access::Authenticated).await
    }

    /// Add a plant. A plant that is already a favourite is not an error.
    pub async fn add(&self, plant_id: &str) -> Result<AddFavouriteOutcome, ClientError> {
        let plant_id = require_plant_id(plant_id)?;
        self.gateway.require_token()?;

        let body = FavouriteRequest { plant_id: plant_id.to_string() };
        let result = self
            .gateway
            .send(Method::POST, &["api", "favourite"], Some(&body), Access::Authenticated)
            .await;

        match result {
            Ok(()) => Ok(AddFavouriteOutcome::Added),
            Err(ClientError::Conflict { .. }) => Ok(AddFavouriteOutcome::AlreadyFavourite),
            Err(e) if e.server_message().is_some_and(mentions_already) => {
                Ok(AddFavouriteOutcome::AlreadyFavourite)
            },
            Err(e) => Err(e),
        }
    }

    /// Remove a plant.
    pub async fn remove(&self, plant_id: &str) -> Result<(), ClientError> {
        let plant_id = require_plant_id(plant_id)?;
        self.gateway.require_token()?;
        self.gateway
            .send::<()>(Method::DELETE, &["api", "favourite", plant_id], None, Access::Authenticated)
            .await
    }

    /// Check whether a plant is a favourite.
    pub async fn is_favourite(&self, plant_id: &str) -> Result<bool, ClientError> {
        let plant_id = require_plant_id(plant_id)?;
        self.gateway.require_token()?;
        let status: FavouriteStatus =
            self.gateway.get(&["api", "favourite", plant_id], Access::Authenticated).await?;
        Ok(status.is_favourite)
    }
}

fn require_plant_id(plant_id: &str) -> Result<&str, ClientError> {
    let plant_id = plant_id.trim();
    ValidationError::require_text("plantId", plant_id, "Plant ID is required")?;
    Ok(plant_id)
}

fn mentions_already(message: &str) -> bool {
    message.to_lowercase().contains("already")
}
