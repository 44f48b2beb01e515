//! Note models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference from a note to its plant.
///
/// The notes endpoint returns either the bare plant id or the populated
/// plant document depending on the server query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlantRef {
    /// Bare plant id
    Id(String),
    /// Populated plant document
    Embedded(PlantSummary),
}

/// Populated plant document inside a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSummary {
    /// Plant id
    #[serde(rename = "_id")]
    pub id: String,
    /// Remaining plant fields
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl PlantRef {
    /// The referenced plant id.
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Embedded(plant) => &plant.id,
        }
    }
}

/// A user's note on a plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Note identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Plant the note belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<PlantRef>,
    /// Note text
    #[serde(default)]
    pub content: String,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last edit time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Check whether the note is attached to `plant_id`.
    pub fn belongs_to(&self, plant_id: &str) -> bool {
        self.plant.as_ref().is_some_and(|plant| plant.id() == plant_id)
    }
}

/// Body of `POST /api/notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    /// Plant to attach the note to
    pub plant_id: String,
    /// Note text
    pub content: String,
}

/// Body of `PUT /api/notes/:noteId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteUpdate {
    /// Replacement text
    pub content: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plant_ref_variants() {
        let notes: Vec<Note> = serde_json::from_value(json!([
            {"_id": "n1", "plant": "p1", "content": "bitter"},
            {"_id": "n2", "plant": {"_id": "p2", "name": "Neem"}, "content": "leaves",
             "createdAt": "2024-03-01T10:00:00.000Z"},
            {"_id": "n3", "content": "orphan"}
        ]))
        .unwrap();

        assert!(notes[0].belongs_to("p1"));
        assert!(notes[1].belongs_to("p2"));
        assert!(!notes[1].belongs_to("p1"));
        assert!(!notes[2].belongs_to("p1"));
        assert!(notes[1].created_at.is_some());
    }
}
