use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::favourites::FavouritesApi;
use crate::notes::NotesApi;
use crate::panel::HerbPanel;
use crate::plants::PlantsApi;
use crate::session::SessionManager;
use crate::storage::SessionStorage;

/// Entry point of the SDK.
///
/// Builds one HTTP client, one session and one gate, and hands out API
/// handles that share them. A 401 seen through any handle ends the session.
#[derive(Debug, Clone)]
pub struct HerbiverseClient {
    config: ClientConfig,
    session: SessionManager,
}

impl HerbiverseClient {
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> Result<Self, ClientError> {
        let base_url = config.parsed_base_url()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;
        tracing::debug!("Herbiverse client targeting {}", base_url);
        let session = SessionManager::new(http, base_url, storage);
        Ok(Self { config, session })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn favourites(&self) -> FavouritesApi {
        FavouritesApi::new(self.session.gateway())
    }

    pub fn notes(&self) -> NotesApi {
        NotesApi::new(self.session.gateway())
    }

    pub fn plants(&self) -> PlantsApi {
        PlantsApi::new(self.session.gateway())
    }

    /// A fresh, unopened herb panel bound to this client's session.
    pub fn herb_panel(&self) -> HerbPanel {
        HerbPanel::new(self.session.clone(), self.favourites(), self.notes(), self.plants())
    }
}
