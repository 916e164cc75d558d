//! Attachment preview
//!
//! Reads the selected image locally and shows it as a data URL. Each change
//! takes a ticket when the event fires; a read that finishes after a newer
//! change is dropped, so the preview always reflects the latest selection.

use crate::status::StatusReporter;
use crate::types::Attachment;
use crate::ui::Page;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::cell::Cell;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Multipart field name of the image input
pub const DEFAULT_ATTACHMENT_FIELD: &str = "bol_image";

/// A file picked in the image input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
}

impl SelectedFile {
    /// Describe a file on disk, guessing its MIME type from the extension
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            path,
            file_name,
            mime,
        }
    }
}

/// Reads selected files; the only I/O the previewer performs
#[async_trait(?Send)]
pub trait FileLoader {
    async fn load(&self, file: &SelectedFile) -> std::io::Result<Vec<u8>>;
}

/// Loads files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

#[async_trait(?Send)]
impl FileLoader for FsLoader {
    async fn load(&self, file: &SelectedFile) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&file.path).await
    }
}

/// How a change event ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// Preview shows the file
    Shown,
    /// Selection was cleared; preview hidden
    Cleared,
    /// A newer change arrived while this file was being read
    Superseded,
    /// File exceeded the configured size limit
    Rejected,
    /// File could not be read
    Failed,
}

pub struct AttachmentPreviewer<L> {
    loader: L,
    field: String,
    max_bytes: Option<u64>,
    latest: Cell<u64>,
}

impl<L: FileLoader> AttachmentPreviewer<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            field: DEFAULT_ATTACHMENT_FIELD.to_string(),
            max_bytes: None,
            latest: Cell::new(0),
        }
    }

    /// Reject files larger than `max_bytes`; `None` accepts anything
    pub fn with_limit(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Handle a file-input change
    ///
    /// The ticket is taken synchronously so the order of calls, not the order
    /// in which reads complete, decides which selection wins.
    pub fn on_change<'a>(
        &'a self,
        page: &'a dyn Page,
        reporter: &'a StatusReporter,
        selection: Option<SelectedFile>,
    ) -> impl Future<Output = PreviewOutcome> + 'a {
        let ticket = self.latest.get() + 1;
        self.latest.set(ticket);

        async move {
            let Some(file) = selection else {
                clear(page);
                return PreviewOutcome::Cleared;
            };

            let loaded = self.loader.load(&file).await;
            if self.latest.get() != ticket {
                debug!(file = %file.file_name, ticket, "dropping stale attachment read");
                return PreviewOutcome::Superseded;
            }

            let bytes = match loaded {
                Ok(bytes) => bytes,
                Err(e) => {
                    clear(page);
                    reporter.error(format!("Could not read {}: {}", file.file_name, e));
                    return PreviewOutcome::Failed;
                }
            };

            if let Some(limit) = self.max_bytes {
                let size = bytes.len() as u64;
                if size > limit {
                    clear(page);
                    reporter.error(format!(
                        "Attachment {} is {} bytes (limit {} bytes)",
                        file.file_name, size, limit
                    ));
                    return PreviewOutcome::Rejected;
                }
            }

            if let Some(preview) = page.preview() {
                preview.show(&data_url(&file.mime, &bytes));
            }
            if let Some(form) = page.form() {
                form.set_attachment(Some(Attachment {
                    field: self.field.clone(),
                    file_name: file.file_name,
                    mime: file.mime,
                    bytes,
                }));
            }
            PreviewOutcome::Shown
        }
    }
}

fn clear(page: &dyn Page) {
    if let Some(preview) = page.preview() {
        preview.hide();
    }
    if let Some(form) = page.form() {
        form.set_attachment(None);
    }
}

/// `data:<mime>;base64,<payload>`
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
