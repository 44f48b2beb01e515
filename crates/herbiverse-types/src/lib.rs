//! # Herbiverse Types
//!
//! Core types, models, and error definitions for the Herbiverse client.
//!
//! This crate provides the foundational type system for the workspace:
//!
//! - **`error`** - Typed failures for authentication, validation and storage
//! - **`models`** - Domain models (Session, UserProfile, Plant, Note, Catalog)
//!
//! ## Architecture Role
//!
//! `herbiverse-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          herbiverse-types (this crate)
//!                   │
//!                   ▼
//!          herbiverse-client
//!                   │
//!                   ▼
//!            herbiverse-cli
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde, matching the REST API's JSON shapes
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{AuthFailure, AuthFailureReason, StorageError, ValidationError};

// Re-export core model types
pub use models::{
    AddFavouriteOutcome, Catalog, CatalogQuery, Category, Favourite, Herb, LoginForm, Note,
    Plant, PlantRef, Session, SignupForm, UserProfile,
};
