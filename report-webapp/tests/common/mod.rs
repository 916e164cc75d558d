#![allow(dead_code)]

use async_trait::async_trait;
use report_webapp::ui::{LogSurface, MemoryLog, MemoryPage};
use report_webapp::{
    FileLoader, RawResponse, SelectedFile, StatusEntry, StatusReporter, SubmissionRequest,
    Transport, TransportError,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::oneshot;
use url::Url;

pub const ENDPOINT: &str = "https://api.example.com/web/submit_report";

/// Transport replaying queued answers and recording every request it sees
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    answers: Rc<RefCell<VecDeque<Answer>>>,
    requests: Rc<RefCell<Vec<(Url, SubmissionRequest)>>>,
}

pub enum Answer {
    Ready(Result<RawResponse, TransportError>),
    /// Resolves when the paired sender fires
    Gated(oneshot::Receiver<RawResponse>),
}

impl ScriptedTransport {
    pub fn push(&self, answer: Result<RawResponse, TransportError>) {
        self.answers.borrow_mut().push_back(Answer::Ready(answer));
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.push(Ok(response(status, Some("application/json"), body)));
    }

    pub fn push_gated(&self) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.answers.borrow_mut().push_back(Answer::Gated(rx));
        tx
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<SubmissionRequest> {
        self.requests.borrow().last().map(|(_, r)| r.clone())
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn post(
        &self,
        url: &Url,
        request: SubmissionRequest,
    ) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push((url.clone(), request));
        let answer = self.answers.borrow_mut().pop_front();
        match answer {
            Some(Answer::Ready(result)) => result,
            Some(Answer::Gated(rx)) => rx
                .await
                .map_err(|_| TransportError::Other("gate dropped".to_string())),
            None => Err(TransportError::Other("no scripted answer".to_string())),
        }
    }
}

pub fn response(status: u16, content_type: Option<&str>, body: &str) -> RawResponse {
    RawResponse {
        status,
        content_type: content_type.map(str::to_string),
        body: body.to_string(),
    }
}

/// Loader serving in-memory file contents by file name
#[derive(Default)]
pub struct MapLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MapLoader {
    pub fn with(mut self, name: &str, bytes: &[u8]) -> Self {
        self.files.insert(name.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait(?Send)]
impl FileLoader for MapLoader {
    async fn load(&self, file: &SelectedFile) -> std::io::Result<Vec<u8>> {
        self.files
            .get(&file.file_name)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"))
    }
}

pub fn image(name: &str) -> SelectedFile {
    SelectedFile {
        path: name.into(),
        file_name: name.to_string(),
        mime: "image/jpeg".to_string(),
    }
}

/// Page with the two fields of the report form already filled in
pub fn filled_page() -> MemoryPage {
    let page = MemoryPage::complete();
    if let Some(form) = page.memory_form() {
        form.set_field("truck_number", "TX-1");
        form.set_field("description", "Pallet dropped at dock 4");
    }
    page
}

/// Reporter rendering into a shared message area the test can read
pub fn visible_reporter() -> (StatusReporter, Rc<MemoryLog>) {
    let log = Rc::new(MemoryLog::default());
    let surface: Box<dyn LogSurface> = Box::new(log.clone());
    (StatusReporter::new(Some(surface)), log)
}

pub fn messages(entries: &[StatusEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.message.as_str()).collect()
}
