//! Submission orchestration
//!
//! One async pipeline per click: precondition checks, UI lock, a single POST,
//! response interpretation, UI update. The lock is a scope guard, so the
//! submit control and the host progress indicator are restored on every exit,
//! including early returns and panics.

use crate::config::WebAppConfig;
use crate::error::{excerpt, SubmitError, EXCERPT_LIMIT};
use crate::host::MainButton;
use crate::request::SubmissionRequest;
use crate::response::{interpret, Accepted};
use crate::status::StatusReporter;
use crate::transport::Transport;
use crate::types::CallerIdentity;
use crate::ui::{Page, SubmitControl, SUBMITTING_LABEL, SUBMIT_LABEL};
use std::cell::Cell;
use tracing::{debug, info};
use url::Url;

pub struct Submitter<T> {
    config: WebAppConfig,
    transport: T,
    identity: Option<CallerIdentity>,
    in_flight: Cell<bool>,
}

impl<T: Transport> Submitter<T> {
    pub fn new(config: WebAppConfig, transport: T, identity: Option<CallerIdentity>) -> Self {
        Self {
            config,
            transport,
            identity,
            in_flight: Cell::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one submission attempt and report its outcome
    ///
    /// Every error except [`SubmitError::Busy`] is reported through
    /// `reporter` before it is returned; a click landing on a running
    /// submission is dropped silently, as the disabled control would drop it.
    pub async fn submit(
        &self,
        page: &dyn Page,
        main_button: Option<&dyn MainButton>,
        reporter: &StatusReporter,
    ) -> Result<Accepted, SubmitError> {
        if self.in_flight.get() {
            debug!("submit ignored: a submission is already running");
            return Err(SubmitError::Busy);
        }

        let (identity, url) = match self.preconditions(page) {
            Ok(checked) => checked,
            Err(e) => {
                reporter.error(e.to_string());
                return Err(e);
            }
        };

        let form = page.form();
        let request = SubmissionRequest::build(
            form.map(|f| f.fields()).unwrap_or_default(),
            form.and_then(|f| f.attachment()),
            identity,
        );

        let _busy = BusyGuard::engage(&self.in_flight, page.submit_control(), main_button);
        reporter.info("Attempting to submit...");

        match self.dispatch(&url, request, reporter).await {
            Ok(accepted) => {
                info!(user_id = identity.id, "report accepted");
                reporter.success(&accepted.message);
                if let Some(form) = form {
                    form.reset();
                }
                if let Some(preview) = page.preview() {
                    preview.hide();
                }
                Ok(accepted)
            }
            Err(e) => {
                reporter.error(e.user_message());
                Err(e)
            }
        }
    }

    /// Identity, endpoint and attachment checks; nothing here touches the network
    fn preconditions(&self, page: &dyn Page) -> Result<(&CallerIdentity, Url), SubmitError> {
        let identity = self
            .identity
            .as_ref()
            .filter(|identity| identity.is_usable())
            .ok_or(SubmitError::MissingIdentity)?;

        let url = self.config.endpoint_url()?;

        if let Some(limit) = self.config.max_attachment_bytes {
            if let Some(attachment) = page.form().and_then(|f| f.attachment()) {
                let size = attachment.len();
                if size > limit {
                    return Err(SubmitError::AttachmentTooLarge {
                        file_name: attachment.file_name,
                        size,
                        limit,
                    });
                }
            }
        }

        Ok((identity, url))
    }

    async fn dispatch(
        &self,
        url: &Url,
        request: SubmissionRequest,
        reporter: &StatusReporter,
    ) -> Result<Accepted, SubmitError> {
        let verbose = self.config.is_verbose();

        if verbose {
            reporter.info(format!("Sending request to: {}", url));
        }
        debug!(%url, fields = request.fields.len(), "sending report");

        let raw = self.transport.post(url, request).await?;

        if verbose {
            reporter.info(format!("Response status: {}", raw.status));
            reporter.info(format!(
                "Raw response text: {}",
                excerpt(&raw.body, EXCERPT_LIMIT)
            ));
        }
        debug!(status = raw.status, body = %excerpt(&raw.body, EXCERPT_LIMIT), "raw response");

        interpret(&raw)
    }
}

/// Locks the submit affordances for the lifetime of one attempt
struct BusyGuard<'a> {
    in_flight: &'a Cell<bool>,
    control: Option<&'a dyn SubmitControl>,
    main_button: Option<&'a dyn MainButton>,
    progress_shown: bool,
}

impl<'a> BusyGuard<'a> {
    fn engage(
        in_flight: &'a Cell<bool>,
        control: Option<&'a dyn SubmitControl>,
        main_button: Option<&'a dyn MainButton>,
    ) -> Self {
        in_flight.set(true);

        let progress_shown = match main_button {
            Some(button) if button.is_visible() => {
                button.show_progress();
                true
            }
            _ => false,
        };
        if let Some(control) = control {
            control.set_enabled(false);
            control.set_label(SUBMITTING_LABEL);
        }

        Self {
            in_flight,
            control,
            main_button,
            progress_shown,
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if self.progress_shown {
            if let Some(button) = self.main_button {
                button.hide_progress();
            }
        }
        if let Some(control) = self.control {
            control.set_enabled(true);
            control.set_label(SUBMIT_LABEL);
        }
        self.in_flight.set(false);
    }
}
