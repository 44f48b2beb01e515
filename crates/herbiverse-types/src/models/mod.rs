//! Domain models for Herbiverse.
//!
//! This module contains the core data structures used throughout the client:
//!
//! - **`session`** - Authentication state and the opaque user profile
//! - **`plant`** - Plants and favourites as returned by the REST API
//! - **`note`** - Per-plant user notes
//! - **`forms`** - Validated login/signup payloads
//! - **`catalog`** - Searchable, category-grouped herb catalog

pub mod catalog;
pub mod forms;
pub mod note;
pub mod plant;
pub mod session;
pub mod user;

pub use catalog::{Catalog, CatalogQuery, Category, Herb};
pub use forms::{LoginForm, SignupForm};
pub use note::{NewNote, Note, NoteUpdate, PlantRef, PlantSummary};
pub use plant::{AddFavouriteOutcome, Favourite, FavouriteRequest, FavouriteStatus, Plant};
pub use session::Session;
pub use user::UserProfile;
