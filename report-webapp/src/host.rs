//! Host container seam
//!
//! The mini-app container supplies the caller identity and owns a native main
//! button. The pipeline only talks to it through these traits so a terminal
//! driver or a test stub can stand in for the real container.

use crate::error::HostError;
use crate::types::CallerIdentity;
use std::cell::{Cell, RefCell};

/// Native action button rendered by the host container
///
/// Methods take `&self`: the button is a handle into host-owned state.
pub trait MainButton {
    fn show(&self);
    fn hide(&self);
    fn enable(&self);
    fn disable(&self);
    fn set_text(&self, text: &str);
    fn is_visible(&self) -> bool;
    fn show_progress(&self);
    fn hide_progress(&self);
}

/// Identity and button provider
pub trait HostContainer {
    /// Tell the host the page finished loading
    fn ready(&self) -> Result<(), HostError>;

    /// Caller identity, `Ok(None)` when the page was opened outside a chat
    fn user(&self) -> Result<Option<CallerIdentity>, HostError>;

    /// The native main button, if this host has one
    fn main_button(&self) -> Option<&dyn MainButton>;
}

/// Main button that keeps its state in memory
#[derive(Debug)]
pub struct MemoryMainButton {
    visible: Cell<bool>,
    enabled: Cell<bool>,
    progress: Cell<bool>,
    text: RefCell<String>,
}

impl Default for MemoryMainButton {
    fn default() -> Self {
        Self {
            visible: Cell::new(false),
            enabled: Cell::new(true),
            progress: Cell::new(false),
            text: RefCell::new(String::new()),
        }
    }
}

impl MemoryMainButton {
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn is_progress_visible(&self) -> bool {
        self.progress.get()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl MainButton for MemoryMainButton {
    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }

    fn enable(&self) {
        self.enabled.set(true);
    }

    fn disable(&self) {
        self.enabled.set(false);
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn is_visible(&self) -> bool {
        self.visible.get()
    }

    fn show_progress(&self) {
        self.progress.set(true);
    }

    fn hide_progress(&self) {
        self.progress.set(false);
    }
}

/// Canned host used by tests and offline runs
#[derive(Debug)]
pub enum StubHost {
    /// Host is up and knows the caller
    WithUser {
        user: CallerIdentity,
        button: MemoryMainButton,
    },
    /// Host is up but the page was not opened from a chat
    WithoutUser { button: MemoryMainButton },
    /// Every call into the host fails
    Unavailable { reason: String },
}

impl StubHost {
    pub fn with_user(user: CallerIdentity) -> Self {
        StubHost::WithUser {
            user,
            button: MemoryMainButton::default(),
        }
    }

    pub fn without_user() -> Self {
        StubHost::WithoutUser {
            button: MemoryMainButton::default(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        StubHost::Unavailable {
            reason: reason.into(),
        }
    }

    /// Concrete button for assertions
    pub fn button(&self) -> Option<&MemoryMainButton> {
        match self {
            StubHost::WithUser { button, .. } | StubHost::WithoutUser { button } => Some(button),
            StubHost::Unavailable { .. } => None,
        }
    }
}

impl HostContainer for StubHost {
    fn ready(&self) -> Result<(), HostError> {
        match self {
            StubHost::Unavailable { reason } => Err(HostError::Unavailable(reason.clone())),
            _ => Ok(()),
        }
    }

    fn user(&self) -> Result<Option<CallerIdentity>, HostError> {
        match self {
            StubHost::WithUser { user, .. } => Ok(Some(user.clone())),
            StubHost::WithoutUser { .. } => Ok(None),
            StubHost::Unavailable { reason } => Err(HostError::Unavailable(reason.clone())),
        }
    }

    fn main_button(&self) -> Option<&dyn MainButton> {
        self.button().map(|b| b as &dyn MainButton)
    }
}
