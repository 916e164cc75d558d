//! Page surface seam
//!
//! Every element lookup is optional, like `getElementById` on a page whose
//! markup may not match the script. Handles take `&self` and keep their own
//! interior state.

mod memory;

pub use memory::{MemoryForm, MemoryLog, MemoryPage, MemoryPreview, MemorySubmitButton, MemoryText};

use crate::status::StatusEntry;
use crate::types::Attachment;

pub const SUBMIT_LABEL: &str = "Submit Report";
pub const SUBMITTING_LABEL: &str = "Submitting...";

/// The report form element
pub trait ReportForm {
    /// Current text fields in document order
    fn fields(&self) -> Vec<(String, String)>;
    /// Selected image, if any
    fn attachment(&self) -> Option<Attachment>;
    /// Replace the file input's selection
    fn set_attachment(&self, attachment: Option<Attachment>);
    /// Clear every field and the file input
    fn reset(&self);
}

/// The page's own submit button
pub trait SubmitControl {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
    fn set_label(&self, label: &str);
    fn label(&self) -> String;
    fn set_visible(&self, visible: bool);
}

/// `<img>` element showing the selected attachment
pub trait PreviewPane {
    fn show(&self, src: &str);
    fn hide(&self);
}

/// Plain text slot, e.g. the "Submitting as" line
pub trait TextSlot {
    fn set_text(&self, text: &str);
}

/// Visible message area the status reporter writes into
pub trait LogSurface {
    /// Replace the rendered entries, newest first
    fn render(&self, entries: &[StatusEntry]);
}

/// Element lookups for one loaded page
pub trait Page {
    fn form(&self) -> Option<&dyn ReportForm>;
    fn submit_control(&self) -> Option<&dyn SubmitControl>;
    fn preview(&self) -> Option<&dyn PreviewPane>;
    fn user_info(&self) -> Option<&dyn TextSlot>;
}

impl<T: LogSurface + ?Sized> LogSurface for std::rc::Rc<T> {
    fn render(&self, entries: &[StatusEntry]) {
        (**self).render(entries)
    }
}
