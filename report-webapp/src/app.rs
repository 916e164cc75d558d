//! Event wiring for one loaded page
//!
//! Owns the host, the page and the pipeline components, and routes UI events
//! to them the way the page's listeners would.

use crate::bootstrap::{bootstrap, Session};
use crate::config::WebAppConfig;
use crate::error::SubmitError;
use crate::host::HostContainer;
use crate::preview::{AttachmentPreviewer, FileLoader, PreviewOutcome, SelectedFile};
use crate::response::Accepted;
use crate::status::StatusReporter;
use crate::submit::Submitter;
use crate::transport::Transport;
use crate::types::{EventDisposition, Trigger};
use crate::ui::Page;
use tracing::debug;

/// Something the user did on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The host's native main button was pressed
    MainButtonClicked,
    /// The report form fired its submit event
    FormSubmitted,
    /// The image input changed; `None` when the selection was cleared
    AttachmentChanged(Option<SelectedFile>),
}

/// What handling an event produced
#[derive(Debug)]
pub struct Handled {
    pub disposition: EventDisposition,
    pub submission: Option<Result<Accepted, SubmitError>>,
    pub preview: Option<PreviewOutcome>,
}

impl Handled {
    fn nothing() -> Self {
        Self {
            disposition: EventDisposition::Default,
            submission: None,
            preview: None,
        }
    }
}

pub struct WebApp<H, P, T, L> {
    host: H,
    page: P,
    reporter: StatusReporter,
    session: Session,
    submitter: Submitter<T>,
    previewer: AttachmentPreviewer<L>,
}

impl<H, P, T, L> WebApp<H, P, T, L>
where
    H: HostContainer,
    P: Page,
    T: Transport,
    L: FileLoader,
{
    /// Run the page-ready bootstrap and wire the handlers
    pub fn launch(
        config: WebAppConfig,
        host: H,
        page: P,
        reporter: StatusReporter,
        transport: T,
        loader: L,
    ) -> Self {
        let session = bootstrap(&config, &host, &page, &reporter);
        let previewer = AttachmentPreviewer::new(loader).with_limit(config.max_attachment_bytes);
        let submitter = Submitter::new(config, transport, session.identity.clone());

        Self {
            host,
            page,
            reporter,
            session,
            submitter,
            previewer,
        }
    }

    pub async fn handle(&self, event: UiEvent) -> Handled {
        match event {
            UiEvent::MainButtonClicked => {
                if self.session.trigger != Trigger::MainButton {
                    debug!("main button click ignored: not bound");
                    return Handled::nothing();
                }
                Handled {
                    submission: Some(self.submit().await),
                    ..Handled::nothing()
                }
            }
            UiEvent::FormSubmitted => Handled {
                disposition: EventDisposition::PreventDefault,
                submission: Some(self.submit().await),
                preview: None,
            },
            UiEvent::AttachmentChanged(selection) => {
                let outcome = self
                    .previewer
                    .on_change(&self.page, &self.reporter, selection)
                    .await;
                Handled {
                    preview: Some(outcome),
                    ..Handled::nothing()
                }
            }
        }
    }

    /// Event the currently active submit control would fire
    pub fn submit_event(&self) -> UiEvent {
        match self.session.trigger {
            Trigger::MainButton => UiEvent::MainButtonClicked,
            Trigger::InPage | Trigger::Disabled => UiEvent::FormSubmitted,
        }
    }

    /// Submit with whatever the form holds now
    ///
    /// A session disabled by a bad endpoint keeps reporting that endpoint
    /// problem instead of running the submitter's checks.
    pub async fn submit(&self) -> Result<Accepted, SubmitError> {
        if let Some(e) = &self.session.config_error {
            let err = SubmitError::Config(e.clone());
            self.reporter.error(err.to_string());
            return Err(err);
        }
        self.submitter
            .submit(&self.page, self.host.main_button(), &self.reporter)
            .await
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn reporter(&self) -> &StatusReporter {
        &self.reporter
    }
}
