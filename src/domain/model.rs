/// Where the current submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// What a successful yoink produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YoinkResult {
    pub title: String,
    pub download_link: String,
}

/// A submit that has been accepted and is waiting on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingYoink {
    pub ticket: u64,
    pub url: String,
    pub access_key: String,
}
