//! Page-ready initialization
//!
//! Validates the endpoint, acquires the caller identity from the host and
//! decides which control triggers submissions. Never touches the network.

use crate::config::WebAppConfig;
use crate::error::ConfigError;
use crate::host::HostContainer;
use crate::status::StatusReporter;
use crate::types::{CallerIdentity, Trigger};
use crate::ui::{Page, SUBMIT_LABEL};
use tracing::{info, warn};

const NO_USER_MESSAGE: &str =
    "Could not retrieve Telegram user data. Please open this page through the bot.";

/// Outcome of bootstrapping one page load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<CallerIdentity>,
    pub trigger: Trigger,
    /// Endpoint problem that disabled the session, if that is what did
    pub config_error: Option<ConfigError>,
}

impl Session {
    fn disabled() -> Self {
        Self {
            identity: None,
            trigger: Trigger::Disabled,
            config_error: None,
        }
    }

    fn misconfigured(error: ConfigError) -> Self {
        Self {
            config_error: Some(error),
            ..Self::disabled()
        }
    }
}

pub fn bootstrap(
    config: &WebAppConfig,
    host: &dyn HostContainer,
    page: &dyn Page,
    reporter: &StatusReporter,
) -> Session {
    reporter.info(format!(
        "Initializing. Backend URL configured as: {}",
        config.endpoint.as_deref().unwrap_or("<unset>")
    ));

    // A broken endpoint disables the page before the host is even asked
    if let Err(e) = config.endpoint_url() {
        reporter.error(format!("FATAL ERROR: {}", e));
        disable_in_page_submit(page);
        if let Some(button) = host.main_button() {
            if button.is_visible() {
                button.disable();
            }
        }
        return Session::misconfigured(e);
    }

    let acquired = host.ready().and_then(|_| host.user());
    let identity = match acquired {
        Ok(Some(identity)) if identity.is_usable() => identity,
        Ok(_) => {
            fail(page, reporter, NO_USER_MESSAGE.to_string());
            return Session::disabled();
        }
        Err(e) => {
            warn!("host integration failed: {}", e);
            fail(
                page,
                reporter,
                format!(
                    "Error initializing Telegram WebApp. Ensure you are opening this from Telegram. Error: {}",
                    e
                ),
            );
            return Session::disabled();
        }
    };

    if let Some(slot) = page.user_info() {
        slot.set_text(&submitting_as(&identity));
    }

    let trigger = match host.main_button() {
        Some(button) => {
            button.set_text(SUBMIT_LABEL);
            button.show();
            button.enable();
            if let Some(control) = page.submit_control() {
                control.set_visible(false);
            }
            Trigger::MainButton
        }
        None => Trigger::InPage,
    };

    info!(user_id = identity.id, ?trigger, "mini-app ready");
    Session {
        identity: Some(identity),
        trigger,
        config_error: None,
    }
}

/// `Submitting as: Ann Lee (ID: 42)`
pub fn submitting_as(identity: &CallerIdentity) -> String {
    let name = identity.full_name();
    if name.is_empty() {
        format!("Submitting as: (ID: {})", identity.id)
    } else {
        format!("Submitting as: {} (ID: {})", name, identity.id)
    }
}

fn fail(page: &dyn Page, reporter: &StatusReporter, message: String) {
    if let Some(slot) = page.user_info() {
        slot.set_text(&message);
    }
    reporter.error(message);
    disable_in_page_submit(page);
}

fn disable_in_page_submit(page: &dyn Page) {
    if let Some(control) = page.submit_control() {
        control.set_enabled(false);
    }
}
