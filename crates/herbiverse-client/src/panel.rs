//! View-model of a herb detail panel.
//!
//! The panel resolves a herb name to its plant id, shows whether the plant
//! is a favourite, lists the user's notes on it, and lets the user toggle
//! the favourite and add, edit or delete notes. Each action leaves a
//! transient [`Notice`] for the panel to display.
//!
//! Async work is stamped with a [`ViewScope`] ticket. Results arriving after
//! [`HerbPanel::close`], or after the panel was opened on another herb, are
//! dropped instead of written into state nobody is looking at.

use std::sync::Arc;
use std::time::{Duration, Instant};

use herbiverse_types::Note;
use parking_lot::Mutex;

use crate::favourites::FavouritesApi;
use crate::notes::NotesApi;
use crate::plants::PlantsApi;
use crate::scope::{Ticket, ViewScope};
use crate::session::SessionManager;

const LOGIN_REQUIRED: &str = "Please log in to add favorites and notes";

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The action worked
    Success,
    /// The action failed
    Error,
}

/// Transient banner text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Text to show
    pub message: String,
    raised_at: Instant,
}

impl Notice {
    /// Success notice raised now.
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into(), raised_at: Instant::now() }
    }

    /// Error notice raised now.
    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into(), raised_at: Instant::now() }
    }

    /// Check whether the notice should still be shown.
    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }

    /// Check visibility at a given instant.
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) < NOTICE_TTL
    }
}

/// Everything the panel displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    /// Herb the panel is open on
    pub herb_name: Option<String>,
    /// Resolved plant id
    pub plant_id: Option<String>,
    /// Plant is in the user's favourites
    pub is_favourite: bool,
    /// User's notes on the plant
    pub notes: Vec<Note>,
    /// A favourite request is running
    pub favourite_busy: bool,
    /// A notes request is running
    pub notes_busy: bool,
    /// Last favourite banner
    pub favourite_notice: Option<Notice>,
    /// Last notes banner
    pub note_notice: Option<Notice>,
}

impl PanelState {
    /// Favourite banner, if still visible.
    pub fn visible_favourite_notice(&self) -> Option<&Notice> {
        self.favourite_notice.as_ref().filter(|n| n.is_visible())
    }

    /// Notes banner, if still visible.
    pub fn visible_note_notice(&self) -> Option<&Notice> {
        self.note_notice.as_ref().filter(|n| n.is_visible())
    }
}

/// Herb detail panel.
#[derive(Debug, Clone)]
pub struct HerbPanel {
    scope: ViewScope,
    state: Arc<Mutex<PanelState>>,
    session: SessionManager,
    favourites: FavouritesApi,
    notes: NotesApi,
    plants: PlantsApi,
}

impl HerbPanel {
    /// Create a panel with empty state; nothing is shown until [`open`](Self::open).
    pub fn new(
        session: SessionManager,
        favourites: FavouritesApi,
        notes: NotesApi,
        plants: PlantsApi,
    ) -> Self {
        Self {
            scope: ViewScope::new(),
            state: Arc::new(Mutex::new(PanelState::default())),
            session,
            favourites,
            notes,
            plants,
        }
    }

    /// Snapshot of the displayed state.
    pub fn state(&self) -> PanelState {
        self.state.lock().clone()
    }

    /// Liveness scope of the panel.
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// The panel went away; in-flight work will not touch its state.
    pub fn close(&self) {
        self.scope.close();
    }

    /// Show `herb_name`: resolve its plant id, then load favourite status
    /// and notes when logged in.
    pub async fn open(&self, herb_name: &str) {
        let ticket = self.scope.renew();
        let opened = self.update(&ticket, |s| {
            *s = PanelState { herb_name: Some(herb_name.to_string()), ..PanelState::default() };
        });
        if !opened {
            return;
        }

        let plant_id = match self.plants.find_id(herb_name).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::warn!("No plant id for {:?}", herb_name);
                return;
            },
            Err(e) => {
                tracing::warn!("Plant id lookup for {:?} failed: {}", herb_name, e);
                self.update(&ticket, |s| {
                    s.favourite_notice = Some(Notice::error("Failed to get plant ID"));
                });
                return;
            },
        };

        if self.update(&ticket, |s| s.plant_id = Some(plant_id.clone())) {
            self.load_plant_data(&ticket, &plant_id).await;
        }
    }

    async fn load_plant_data(&self, ticket: &Ticket, plant_id: &str) {
        if !self.session.is_authenticated() {
            return;
        }
        self.update(ticket, |s| {
            s.favourite_busy = true;
            s.notes_busy = true;
        });

        let (favourite, notes) = futures::join!(
            self.favourites.is_favourite(plant_id),
            self.notes.list_for(plant_id)
        );

        self.update(ticket, |s| {
            s.favourite_busy = false;
            s.notes_busy = false;
            s.is_favourite = match favourite {
                Ok(is_favourite) => is_favourite,
                Err(e) => {
                    tracing::warn!("Favourite status check failed: {}", e);
                    false
                },
            };
            match notes {
                Ok(notes) => s.notes = notes,
                Err(e) => {
                    tracing::warn!("Loading notes failed: {}", e);
                    s.note_notice = Some(Notice::error("Failed to load notes"));
                },
            }
        });
    }

    /// Add or remove the plant from favourites. Returns true when the
    /// change went through and was applied.
    pub async fn toggle_favourite(&self) -> bool {
        let ticket = self.scope.ticket();
        let Some((plant_id, currently)) = self.favourite_target(&ticket) else {
            return false;
        };
        self.update(&ticket, |s| s.favourite_busy = true);

        if currently {
            let result = self.favourites.remove(&plant_id).await;
            self.update(&ticket, |s| {
                s.favourite_busy = false;
                s.favourite_notice = Some(match &result {
                    Ok(()) => {
                        s.is_favourite = false;
                        Notice::success("Removed from Favorites")
                    },
                    Err(e) => Notice::error(e.user_message("Failed to remove from favorites")),
                });
            }) && result.is_ok()
        } else {
            let result = self.favourites.add(&plant_id).await;
            self.update(&ticket, |s| {
                s.favourite_busy = false;
                s.favourite_notice = Some(match &result {
                    Ok(outcome) => {
                        s.is_favourite = true;
                        Notice::success(outcome.message())
                    },
                    Err(e) => Notice::error(e.user_message("Failed to add to favorites")),
                });
            }) && result.is_ok()
        }
    }

    /// Attach a note to the plant.
    pub async fn add_note(&self, content: &str) -> bool {
        let ticket = self.scope.ticket();
        let Some(plant_id) = self.note_target(&ticket, content) else {
            return false;
        };
        self.update(&ticket, |s| s.notes_busy = true);

        let result = self.notes.add(&plant_id, content).await;
        self.finish_note_action(&ticket, result, "Note added successfully", "Failed to add note", |s, note| {
            s.notes.push(note);
        })
    }

    /// Replace the text of one of the plant's notes.
    pub async fn edit_note(&self, note_id: &str, content: &str) -> bool {
        let ticket = self.scope.ticket();
        if !self.accepts_note(&ticket, content) {
            return false;
        }
        self.update(&ticket, |s| s.notes_busy = true);

        let result = self.notes.update(note_id, content).await;
        self.finish_note_action(
            &ticket,
            result,
            "Note updated successfully",
            "Failed to update note",
            |s, updated| {
                if let Some(note) = s.notes.iter_mut().find(|n| n.id == updated.id) {
                    *note = updated;
                }
            },
        )
    }

    /// Delete one of the plant's notes.
    pub async fn delete_note(&self, note_id: &str) -> bool {
        let ticket = self.scope.ticket();
        if !self.require_login(&ticket, |s, notice| s.note_notice = Some(notice)) {
            return false;
        }
        self.update(&ticket, |s| s.notes_busy = true);

        let result = self.notes.delete(note_id).await;
        self.finish_note_action(
            &ticket,
            result,
            "Note deleted successfully",
            "Failed to delete note",
            |s, ()| s.notes.retain(|n| n.id != note_id),
        )
    }

    /// Apply `f` if `ticket` is still current. Returns whether it ran.
    fn update(&self, ticket: &Ticket, f: impl FnOnce(&mut PanelState)) -> bool {
        let mut state = self.state.lock();
        if !self.scope.is_current(ticket) {
            tracing::debug!("Dropping panel update from a stale view");
            return false;
        }
        f(&mut state);
        true
    }

    fn require_login(&self, ticket: &Ticket, set: impl FnOnce(&mut PanelState, Notice)) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        self.update(ticket, |s| set(s, Notice::error(LOGIN_REQUIRED)));
        false
    }

    fn favourite_target(&self, ticket: &Ticket) -> Option<(String, bool)> {
        if !self.require_login(ticket, |s, notice| s.favourite_notice = Some(notice)) {
            return None;
        }
        let state = self.state();
        match state.plant_id {
            Some(id) => Some((id, state.is_favourite)),
            None => {
                self.update(ticket, |s| {
                    s.favourite_notice = Some(Notice::error("Plant ID not available yet"));
                });
                None
            },
        }
    }

    /// Logged in and `content` is not blank.
    fn accepts_note(&self, ticket: &Ticket, content: &str) -> bool {
        if !self.require_login(ticket, |s, notice| s.note_notice = Some(notice)) {
            return false;
        }
        if content.trim().is_empty() {
            self.update(ticket, |s| {
                s.note_notice = Some(Notice::error("Note content cannot be empty"));
            });
            return false;
        }
        true
    }

    fn note_target(&self, ticket: &Ticket, content: &str) -> Option<String> {
        if !self.accepts_note(ticket, content) {
            return None;
        }
        let plant_id = self.state().plant_id;
        if plant_id.is_none() {
            self.update(ticket, |s| {
                s.note_notice = Some(Notice::error("Plant ID not available yet"));
            });
        }
        plant_id
    }

    fn finish_note_action<T>(
        &self,
        ticket: &Ticket,
        result: Result<T, crate::ClientError>,
        success: &str,
        failure: &str,
        apply: impl FnOnce(&mut PanelState, T),
    ) -> bool {
        let succeeded = result.is_ok();
        let applied = self.update(ticket, |s| {
            s.notes_busy = false;
            match result {
                Ok(value) => {
                    apply(s, value);
                    s.note_notice = Some(Notice::success(success));
                },
                Err(e) => s.note_notice = Some(Notice::error(e.user_message(failure))),
            }
        });
        applied && succeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires() {
        let notice = Notice::success("Added to Favorites");
        assert!(notice.is_visible());
        assert!(!notice.is_visible_at(Instant::now() + NOTICE_TTL));
    }
}
