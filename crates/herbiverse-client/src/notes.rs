//! Notes endpoints.

use std::sync::Arc;

use herbiverse_types::models::{NewNote, NoteUpdate};
use herbiverse_types::{Note, ValidationError};
use reqwest::Method;

use crate::error::ClientError;
use crate::gateway::{Access, Gateway};

const EMPTY_NOTE: &str = "Note content cannot be empty";

/// Handle for `/api/notes`. All calls need a stored token.
#[derive(Debug, Clone)]
pub struct NotesApi {
    gateway: Arc<Gateway>,
}

impl NotesApi {
    /// Create a handle over a gate.
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Every note of the user.
    pub async fn list_all(&self) -> Result<Vec<Note>, ClientError> {
        self.gateway.require_token()?;
        self.gateway.get(&["api", "notes"], Access::Authenticated).await
    }

    /// Notes attached to one plant.
    ///
    /// The server has no per-plant listing, so this filters client-side.
    pub async fn list_for(&self, plant_id: &str) -> Result<Vec<Note>, ClientError> {
        ValidationError::require_text("plantId", plant_id, "Plant ID is required")?;
        let mut notes = self.list_all().await?;
        notes.retain(|note| note.belongs_to(plant_id));
        Ok(notes)
    }

    /// Attach a new note to a plant.
    pub async fn add(&self, plant_id: &str, content: &str) -> Result<Note, ClientError> {
        ValidationError::require_text("plantId", plant_id, "Plant ID is required")?;
        ValidationError::require_text("content", content, EMPTY_NOTE)?;
        self.gateway.require_token()?;

        let body = NewNote { plant_id: plant_id.to_string(), content: content.to_string() };
        self.gateway.post(&["api", "notes"], &body, Access::Authenticated).await
    }

    /// Replace a note's text.
    pub async fn update(&self, note_id: &str, content: &str) -> Result<Note, ClientError> {
        ValidationError::require_text("noteId", note_id, "Note ID is required")?;
        ValidationError::require_text("content", content, EMPTY_NOTE)?;
        self.gateway.require_token()?;

        let body = NoteUpdate { content: content.to_string() };
        self.gateway.put(&["api", "notes", note_id], &body, Access::Authenticated).await
    }

    /// Delete a note.
    pub async fn delete(&self, note_id: &str) -> Result<(), ClientError> {
        ValidationError::require_text("noteId", note_id, "Note ID is required")?;
        self.gateway.require_token()?;
        self.gateway
            .send::<()>(Method::DELETE, &["api", "notes", note_id], None, Access::Authenticated)
            .await
    }
}
