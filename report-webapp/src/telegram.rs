//! Telegram WebApp host backed by the launch `initData` string
//!
//! Telegram opens the mini-app with URL-encoded launch parameters
//! (`query_id=..&user=%7B..%7D&auth_date=..&hash=..`), optionally wrapped in a
//! `tgWebAppData=` fragment parameter. The `hash` is not checked here; that is
//! the backend's job.

use crate::error::HostError;
use crate::host::{HostContainer, MainButton, MemoryMainButton};
use crate::types::CallerIdentity;
use std::cell::Cell;
use tracing::debug;
use url::form_urlencoded;

const WRAPPER_KEY: &str = "tgWebAppData";
const USER_KEY: &str = "user";

#[derive(Debug, Default)]
pub struct InitDataHost {
    init_data: Option<String>,
    ready: Cell<bool>,
    button: MemoryMainButton,
}

impl InitDataHost {
    /// `None` models a page opened outside Telegram: the host object is missing.
    pub fn new(init_data: Option<String>) -> Self {
        Self {
            init_data,
            ready: Cell::new(false),
            button: MemoryMainButton::default(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    pub fn button(&self) -> &MemoryMainButton {
        &self.button
    }

    fn raw(&self) -> Result<&str, HostError> {
        self.init_data.as_deref().ok_or_else(|| {
            HostError::Unavailable("Telegram WebApp init data is not available".to_string())
        })
    }
}

impl HostContainer for InitDataHost {
    fn ready(&self) -> Result<(), HostError> {
        self.raw()?;
        self.ready.set(true);
        Ok(())
    }

    fn user(&self) -> Result<Option<CallerIdentity>, HostError> {
        parse_user(self.raw()?)
    }

    fn main_button(&self) -> Option<&dyn MainButton> {
        self.init_data.as_ref().map(|_| &self.button as &dyn MainButton)
    }
}

/// Extract the `user` record from an init data string
pub fn parse_user(init_data: &str) -> Result<Option<CallerIdentity>, HostError> {
    let init_data = init_data.trim().trim_start_matches(['#', '?']);

    let unwrapped = form_urlencoded::parse(init_data.as_bytes())
        .find(|(key, _)| key == WRAPPER_KEY)
        .map(|(_, value)| value.into_owned());
    let init_data = unwrapped.as_deref().unwrap_or(init_data);

    let user_json = form_urlencoded::parse(init_data.as_bytes())
        .find(|(key, _)| key == USER_KEY)
        .map(|(_, value)| value.into_owned());

    let Some(user_json) = user_json else {
        debug!("init data carries no user record");
        return Ok(None);
    };

    let user: CallerIdentity = serde_json::from_str(&user_json)
        .map_err(|e| HostError::InvalidInitData(format!("user record: {}", e)))?;
    Ok(Some(user))
}
