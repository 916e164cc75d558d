//! Incident report mini-app client
//!
//! Submission pipeline for a report form running inside a Telegram mini-app:
//! 1. Bootstrap: validate the endpoint, take the caller identity from the host
//! 2. Preview: show the selected image locally, latest selection wins
//! 3. Submit: gate, POST one multipart payload, interpret the JSON answer
//! 4. Report: keep a short newest-first status log for the user
//!
//! The host container, the page and the HTTP client sit behind traits
//! ([`HostContainer`], [`ui::Page`], [`Transport`]) so the pipeline runs the
//! same against Telegram, the terminal driver or test stubs.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod host;
pub mod preview;
pub mod request;
pub mod response;
pub mod status;
pub mod submit;
pub mod telegram;
pub mod transport;
pub mod types;
pub mod ui;

pub use app::{Handled, UiEvent, WebApp};
pub use config::{Verbosity, WebAppConfig};
pub use error::{ConfigError, HostError, SubmitError, TransportError};
pub use host::{HostContainer, MainButton, MemoryMainButton, StubHost};
pub use preview::{AttachmentPreviewer, FileLoader, FsLoader, PreviewOutcome, SelectedFile};
pub use request::SubmissionRequest;
pub use response::Accepted;
pub use status::{StatusEntry, StatusReporter};
pub use submit::Submitter;
pub use telegram::InitDataHost;
pub use transport::{RawResponse, ReqwestTransport, Transport};
pub use types::{Attachment, CallerIdentity, EventDisposition, LogLevel, SubmissionResult, Trigger};
