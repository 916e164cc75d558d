//! In-memory page used by the terminal driver and the test suites

use super::{LogSurface, Page, PreviewPane, ReportForm, SubmitControl, TextSlot, SUBMIT_LABEL};
use crate::status::StatusEntry;
use crate::types::Attachment;
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct MemoryForm {
    fields: RefCell<Vec<(String, String)>>,
    attachment: RefCell<Option<Attachment>>,
}

impl MemoryForm {
    /// Set a field, keeping its original position if it already exists
    pub fn set_field(&self, name: &str, value: &str) {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value.to_string(),
            None => fields.push((name.to_string(), value.to_string())),
        }
    }

    pub fn field(&self, name: &str) -> Option<String> {
        self.fields
            .borrow()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
    }
}

impl ReportForm for MemoryForm {
    fn fields(&self) -> Vec<(String, String)> {
        self.fields.borrow().clone()
    }

    fn attachment(&self) -> Option<Attachment> {
        self.attachment.borrow().clone()
    }

    fn set_attachment(&self, attachment: Option<Attachment>) {
        *self.attachment.borrow_mut() = attachment;
    }

    fn reset(&self) {
        for (_, value) in self.fields.borrow_mut().iter_mut() {
            value.clear();
        }
        self.attachment.borrow_mut().take();
    }
}

#[derive(Debug)]
pub struct MemorySubmitButton {
    enabled: Cell<bool>,
    visible: Cell<bool>,
    label: RefCell<String>,
}

impl Default for MemorySubmitButton {
    fn default() -> Self {
        Self {
            enabled: Cell::new(true),
            visible: Cell::new(true),
            label: RefCell::new(SUBMIT_LABEL.to_string()),
        }
    }
}

impl MemorySubmitButton {
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl SubmitControl for MemorySubmitButton {
    fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn set_label(&self, label: &str) {
        *self.label.borrow_mut() = label.to_string();
    }

    fn label(&self) -> String {
        self.label.borrow().clone()
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreview {
    src: RefCell<Option<String>>,
    visible: Cell<bool>,
}

impl MemoryPreview {
    pub fn src(&self) -> Option<String> {
        self.src.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl PreviewPane for MemoryPreview {
    fn show(&self, src: &str) {
        *self.src.borrow_mut() = Some(src.to_string());
        self.visible.set(true);
    }

    fn hide(&self) {
        self.src.borrow_mut().take();
        self.visible.set(false);
    }
}

#[derive(Debug, Default)]
pub struct MemoryText {
    text: RefCell<String>,
}

impl MemoryText {
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl TextSlot for MemoryText {
    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }
}

/// Message area keeping the last rendered lines
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: RefCell<Vec<String>>,
}

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl LogSurface for MemoryLog {
    fn render(&self, entries: &[StatusEntry]) {
        *self.lines.borrow_mut() = entries.iter().map(StatusEntry::render).collect();
    }
}

/// Page whose elements may each be missing
#[derive(Debug, Default)]
pub struct MemoryPage {
    pub form: Option<MemoryForm>,
    pub submit: Option<MemorySubmitButton>,
    pub preview: Option<MemoryPreview>,
    pub user_info: Option<MemoryText>,
}

impl MemoryPage {
    /// Page with every element present
    pub fn complete() -> Self {
        Self {
            form: Some(MemoryForm::default()),
            submit: Some(MemorySubmitButton::default()),
            preview: Some(MemoryPreview::default()),
            user_info: Some(MemoryText::default()),
        }
    }

    pub fn memory_form(&self) -> Option<&MemoryForm> {
        self.form.as_ref()
    }

    pub fn memory_submit(&self) -> Option<&MemorySubmitButton> {
        self.submit.as_ref()
    }

    pub fn memory_preview(&self) -> Option<&MemoryPreview> {
        self.preview.as_ref()
    }

    pub fn user_info_text(&self) -> Option<String> {
        self.user_info.as_ref().map(MemoryText::text)
    }
}

impl Page for MemoryPage {
    fn form(&self) -> Option<&dyn ReportForm> {
        self.form.as_ref().map(|f| f as &dyn ReportForm)
    }

    fn submit_control(&self) -> Option<&dyn SubmitControl> {
        self.submit.as_ref().map(|s| s as &dyn SubmitControl)
    }

    fn preview(&self) -> Option<&dyn PreviewPane> {
        self.preview.as_ref().map(|p| p as &dyn PreviewPane)
    }

    fn user_info(&self) -> Option<&dyn TextSlot> {
        self.user_info.as_ref().map(|t| t as &dyn TextSlot)
    }
}
