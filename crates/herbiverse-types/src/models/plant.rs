//! Plant and favourite models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A plant record as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Server identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Common name
    #[serde(default)]
    pub name: String,
    /// Botanical name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    /// Free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path of the 3D model asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    /// Any other fields the server sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the user's favourites list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favourite {
    /// Favourite record identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// The favourited plant
    pub plant: Plant,
}

/// Body of `POST /api/favourite`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteRequest {
    /// Plant to favourite
    pub plant_id: String,
}

/// Response of `GET /api/favourite/:plantId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FavouriteStatus {
    /// Plant is in the user's favourites
    #[serde(rename = "isFavourite", default)]
    pub is_favourite: bool,
}

/// Result of adding a favourite. A duplicate is not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddFavouriteOutcome {
    /// Newly added
    Added,
    /// Plant was already a favourite
    AlreadyFavourite,
}

impl AddFavouriteOutcome {
    /// Banner text for the outcome.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Added => "Added to Favorites",
            Self::AlreadyFavourite => "Plant is already in your favorites",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_favourite_deserialization() {
        let fav: Favourite = serde_json::from_value(json!({
            "_id": "f1",
            "plant": {
                "_id": "p1",
                "name": "Tulsi",
                "scientificName": "Ocimum sanctum",
                "modelPath": "/models/tulsi.glb",
                "region": "South Asia"
            }
        }))
        .unwrap();

        assert_eq!(fav.plant.id, "p1");
        assert_eq!(fav.plant.scientific_name.as_deref(), Some("Ocimum sanctum"));
        assert_eq!(fav.plant.model_path.as_deref(), Some("/models/tulsi.glb"));
        assert_eq!(fav.plant.extra["region"], "South Asia");
    }

    #[test]
    fn test_favourite_request_wire_name() {
        let body = serde_json::to_value(FavouriteRequest { plant_id: "p1".to_string() }).unwrap();
        assert_eq!(body, json!({"plantId": "p1"}));
    }
}
