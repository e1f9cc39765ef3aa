use crate::{
    domain::{AppError, PendingYoink, SubmissionStatus, YoinkResult},
    storage::{KeyValueStore, ACCESS_KEY_ENTRY},
};

pub const YOINK_SUCCEEDED: &str = "Yoinked successfully!";

/// Why a submit never left the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRejection {
    EmptyUrl,
    InvalidUrl,
}

/// Drives one request/response cycle per submit.
///
/// Owns the form input, the lifecycle status and the derived display data.
/// Every accepted submit gets a ticket; only the resolution carrying the
/// latest ticket is applied, so an older request that finishes late cannot
/// overwrite a newer one.
pub struct SubmissionController {
    store: Box<dyn KeyValueStore>,
    url: String,
    access_key: String,
    status: SubmissionStatus,
    message: String,
    result: Option<YoinkResult>,
    ticket: u64,
}

impl SubmissionController {
    /// Hydrates the access key from `store`; this is the only read.
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let access_key = match store.get(ACCESS_KEY_ENTRY) {
            Ok(key) => key.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("could not read saved access key: {}", e);
                String::new()
            }
        };

        Self {
            store,
            url: String::new(),
            access_key,
            status: SubmissionStatus::Idle,
            message: String::new(),
            result: None,
            ticket: 0,
        }
    }

    pub fn set_url(&mut self, url: String) {
        self.url = url;
    }

    pub fn set_access_key(&mut self, access_key: String) {
        self.access_key = access_key;
    }

    /// Accepts the current form input, or says why it was refused.
    ///
    /// On acceptance the key is persisted, the previous result is cleared and
    /// the status becomes `Loading` before anything goes over the wire.
    pub fn submit(&mut self) -> Result<PendingYoink, InputRejection> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(InputRejection::EmptyUrl);
        }
        if url::Url::parse(url).is_err() {
            return Err(InputRejection::InvalidUrl);
        }
        let url = url.to_string();

        if let Err(e) = self.store.set(ACCESS_KEY_ENTRY, &self.access_key) {
            tracing::warn!("could not persist access key: {}", e);
        }

        self.ticket += 1;
        self.status = SubmissionStatus::Loading;
        self.message.clear();
        self.result = None;

        tracing::info!(ticket = self.ticket, %url, "yoink submitted");

        Ok(PendingYoink {
            ticket: self.ticket,
            url,
            access_key: self.access_key.clone(),
        })
    }

    /// Applies the outcome of the request issued with `ticket`.
    ///
    /// Returns `false` if a newer submit has superseded it.
    pub fn resolve(&mut self, ticket: u64, outcome: Result<YoinkResult, AppError>) -> bool {
        if ticket != self.ticket || self.status != SubmissionStatus::Loading {
            tracing::debug!(ticket, latest = self.ticket, "dropping stale yoink result");
            return false;
        }

        match outcome {
            Ok(result) => {
                tracing::info!(ticket, title = %result.title, "yoink succeeded");
                self.status = SubmissionStatus::Success;
                self.message = YOINK_SUCCEEDED.to_string();
                self.result = Some(result);
            }
            Err(e) => {
                tracing::info!(ticket, "yoink failed: {}", e);
                self.status = SubmissionStatus::Error;
                self.message = e.user_message();
                self.result = None;
            }
        }
        true
    }

    /// Ticket of the most recent accepted submit; 0 before the first.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SubmissionStatus::Loading
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn result(&self) -> Option<&YoinkResult> {
        self.result.as_ref()
    }

    pub fn file_name(&self) -> &str {
        self.result.as_ref().map_or("", |r| r.title.as_str())
    }

    pub fn download_link(&self) -> &str {
        self.result.as_ref().map_or("", |r| r.download_link.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use std::sync::{Arc, Mutex};

    /// Records writes so tests can look at them after the controller owns the store.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.lock().unwrap().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.lock().unwrap().set(key, value)
        }
    }

    fn controller() -> (SubmissionController, SharedStore) {
        let store = SharedStore::default();
        (SubmissionController::new(Box::new(store.clone())), store)
    }

    fn cat_video() -> YoinkResult {
        YoinkResult {
            title: "Funny Cat Video".into(),
            download_link: "http://localhost:8000/files/cat.mp4?token=mykey".into(),
        }
    }

    #[test]
    fn hydrates_saved_key() {
        let mut store = MemoryStore::default();
        store.set(ACCESS_KEY_ENTRY, "secret123").unwrap();
        let controller = SubmissionController::new(Box::new(store));
        assert_eq!(controller.access_key(), "secret123");
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn empty_url_changes_nothing() {
        let (mut controller, store) = controller();
        controller.set_access_key("mykey".into());

        assert_eq!(controller.submit(), Err(InputRejection::EmptyUrl));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(!controller.is_loading());
        assert_eq!(store.get(ACCESS_KEY_ENTRY).unwrap(), None);
    }

    #[test]
    fn unparseable_url_is_refused() {
        let (mut controller, _) = controller();
        controller.set_url("not a url".into());
        assert_eq!(controller.submit(), Err(InputRejection::InvalidUrl));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn submit_enters_loading_and_persists_key() {
        let (mut controller, store) = controller();
        controller.set_url("https://example.com/video".into());
        controller.set_access_key("mykey".into());

        let pending = controller.submit().unwrap();

        assert!(controller.is_loading());
        assert_eq!(controller.status(), SubmissionStatus::Loading);
        assert_eq!(pending.url, "https://example.com/video");
        assert_eq!(pending.access_key, "mykey");
        assert_eq!(
            store.get(ACCESS_KEY_ENTRY).unwrap().as_deref(),
            Some("mykey")
        );
    }

    #[test]
    fn success_populates_result() {
        let (mut controller, _) = controller();
        controller.set_url("https://example.com/video".into());
        controller.set_access_key("mykey".into());
        let pending = controller.submit().unwrap();

        assert!(controller.resolve(pending.ticket, Ok(cat_video())));

        assert!(!controller.is_loading());
        assert_eq!(controller.status(), SubmissionStatus::Success);
        assert_eq!(controller.file_name(), "Funny Cat Video");
        assert_eq!(
            controller.download_link(),
            "http://localhost:8000/files/cat.mp4?token=mykey"
        );
        assert_eq!(controller.message(), YOINK_SUCCEEDED);
    }

    #[test]
    fn failure_keeps_key_and_shows_detail() {
        let (mut controller, store) = controller();
        controller.set_url("https://valid-format-but-fails.com".into());
        controller.set_access_key("wrong".into());
        let pending = controller.submit().unwrap();

        controller.resolve(
            pending.ticket,
            Err(AppError::Rejected("Invalid URL".into())),
        );

        assert_eq!(controller.status(), SubmissionStatus::Error);
        assert_eq!(controller.message(), "Invalid URL");
        assert!(controller.result().is_none());
        assert_eq!(
            store.get(ACCESS_KEY_ENTRY).unwrap().as_deref(),
            Some("wrong")
        );
    }

    #[test]
    fn resubmit_clears_previous_result() {
        let (mut controller, _) = controller();
        controller.set_url("https://example.com/video".into());
        let first = controller.submit().unwrap();
        controller.resolve(first.ticket, Ok(cat_video()));

        controller.submit().unwrap();

        assert!(controller.is_loading());
        assert_eq!(controller.message(), "");
        assert_eq!(controller.download_link(), "");
        assert_eq!(controller.file_name(), "");
    }

    #[test]
    fn stale_resolution_is_dropped() {
        let (mut controller, _) = controller();
        controller.set_url("https://example.com/one".into());
        let first = controller.submit().unwrap();
        controller.set_url("https://example.com/two".into());
        let second = controller.submit().unwrap();

        assert!(controller.resolve(second.ticket, Err(AppError::Transport("boom".into()))));
        assert!(!controller.resolve(first.ticket, Ok(cat_video())));

        assert_eq!(controller.status(), SubmissionStatus::Error);
        assert_eq!(controller.message(), "boom");
    }

    #[test]
    fn loading_ends_only_once() {
        let (mut controller, _) = controller();
        controller.set_url("https://example.com/video".into());
        let pending = controller.submit().unwrap();

        assert!(controller.resolve(pending.ticket, Ok(cat_video())));
        assert!(!controller.resolve(
            pending.ticket,
            Err(AppError::Transport("late".into()))
        ));
        assert_eq!(controller.status(), SubmissionStatus::Success);
    }
}
