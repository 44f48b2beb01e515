#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod favourites;
mod gateway;
mod notes;
pub mod panel;
mod plants;
pub mod reconcile;
mod scope;
mod session;
mod storage;

pub use client::HerbiverseClient;
pub use config::{ClientConfig, API_URL_ENV, DEFAULT_BASE_URL, TIMEOUT_ENV};
pub use error::ClientError;
pub use favourites::FavouritesApi;
pub use gateway::{Gateway, IgnoreUnauthorized, UnauthorizedHook};
pub use notes::NotesApi;
pub use panel::{HerbPanel, Notice, NoticeKind, PanelState, NOTICE_TTL};
pub use plants::PlantsApi;
pub use reconcile::{reconcile, ProfileFetch, Reconciliation, StorageAction};
pub use scope::{Ticket, ViewScope};
pub use session::SessionManager;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, SNAPSHOT_KEY, TOKEN_KEY};
