use std::path::PathBuf;

use futures::{stream::BoxStream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::{
    api::ApiClient,
    domain::{AppError, PendingYoink, YoinkResult},
};

#[derive(Debug, Clone)]
pub enum SaveEvent {
    Progress(f32),
    Completed(PathBuf),
    Failed(AppError),
}

/// Runs the network side of a submit and saves staged files to disk.
#[derive(Clone)]
pub struct YoinkCoordinator {
    api_client: ApiClient,
}

impl YoinkCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Issues the single `/yoink` request for an accepted submit.
    pub async fn yoink(&self, pending: PendingYoink) -> Result<YoinkResult, AppError> {
        let response = self
            .api_client
            .yoink(&pending.url, &pending.access_key)
            .await?;

        Ok(YoinkResult {
            download_link: self
                .api_client
                .download_link(&response.download_url, &pending.access_key),
            title: response.title,
        })
    }

    /// True when the backend answers its health check with "ok".
    pub async fn backend_online(&self) -> bool {
        match self.api_client.health().await {
            Ok(health) => health.status == "ok",
            Err(e) => {
                tracing::warn!("backend health check failed: {}", e);
                false
            }
        }
    }

    pub async fn choose_save_path(&self, suggested_filename: String) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .set_file_name(&suggested_filename)
            .save_file()
            .await
            .map(|handle| handle.path().to_path_buf())
    }

    pub fn save_stream(&self, download_link: String, path: PathBuf) -> BoxStream<'static, SaveEvent> {
        futures::stream::unfold(
            SaveRuntimeState::Start {
                client: self.api_client.clone(),
                download_link,
                path,
            },
            |state| async move {
                match state {
                    SaveRuntimeState::Start {
                        client,
                        download_link,
                        path,
                    } => {
                        let (total_size, stream) =
                            match client.download_file_stream(&download_link).await {
                                Ok(response) => response,
                                Err(e) => {
                                    return Some((
                                        SaveEvent::Failed(e.into()),
                                        SaveRuntimeState::Finished,
                                    ));
                                }
                            };

                        match tokio::fs::File::create(&path).await {
                            Ok(file) => Some((
                                SaveEvent::Progress(0.0),
                                SaveRuntimeState::Saving {
                                    file,
                                    stream: stream.boxed(),
                                    written: 0,
                                    total: total_size,
                                    path,
                                },
                            )),
                            Err(e) => Some((
                                SaveEvent::Failed(AppError::Io(format!(
                                    "Failed to create file: {}",
                                    e
                                ))),
                                SaveRuntimeState::Finished,
                            )),
                        }
                    }
                    SaveRuntimeState::Saving {
                        mut file,
                        mut stream,
                        mut written,
                        total,
                        path,
                    } => match stream.next().await {
                        Some(Ok(chunk)) => {
                            if let Err(e) = file.write_all(&chunk).await {
                                return Some((
                                    SaveEvent::Failed(AppError::Io(format!(
                                        "Write error: {}",
                                        e
                                    ))),
                                    SaveRuntimeState::Finished,
                                ));
                            }

                            written += chunk.len() as u64;

                            let progress = match total {
                                Some(total_size) if total_size > 0 => {
                                    written as f32 / total_size as f32
                                }
                                _ => 0.0,
                            };

                            Some((
                                SaveEvent::Progress(progress),
                                SaveRuntimeState::Saving {
                                    file,
                                    stream,
                                    written,
                                    total,
                                    path,
                                },
                            ))
                        }
                        Some(Err(e)) => Some((
                            SaveEvent::Failed(e.into()),
                            SaveRuntimeState::Finished,
                        )),
                        None => {
                            if let Err(e) = file.sync_all().await {
                                return Some((
                                    SaveEvent::Failed(AppError::Io(format!(
                                        "Failed to sync file: {}",
                                        e
                                    ))),
                                    SaveRuntimeState::Finished,
                                ));
                            }

                            tracing::info!(written, "saved {}", path.display());
                            Some((SaveEvent::Completed(path), SaveRuntimeState::Finished))
                        }
                    },
                    SaveRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }
}

enum SaveRuntimeState {
    Start {
        client: ApiClient,
        download_link: String,
        path: PathBuf,
    },
    Saving {
        file: tokio::fs::File,
        stream: BoxStream<'static, crate::api::Result<bytes::Bytes>>,
        written: u64,
        total: Option<u64>,
        path: PathBuf,
    },
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;

    fn coordinator_for(server: &mockito::ServerGuard) -> YoinkCoordinator {
        YoinkCoordinator::new(ApiClient::new(ApiConfig::new(server.url())))
    }

    fn pending(url: &str, access_key: &str) -> PendingYoink {
        PendingYoink {
            ticket: 1,
            url: url.to_string(),
            access_key: access_key.to_string(),
        }
    }

    #[tokio::test]
    async fn yoink_builds_tokenized_link() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/yoink")
            .match_header("x-access-key", "mykey")
            .with_status(200)
            .with_body(
                r#"{"status":"success","title":"Funny Cat Video","download_url":"/files/cat.mp4"}"#,
            )
            .create_async()
            .await;

        let coordinator = coordinator_for(&server);
        let result = coordinator
            .yoink(pending("https://example.com/video", "mykey"))
            .await
            .unwrap();

        assert_eq!(result.title, "Funny Cat Video");
        assert_eq!(
            result.download_link,
            format!("{}/files/cat.mp4?token=mykey", server.url())
        );
    }

    #[tokio::test]
    async fn yoink_maps_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/yoink")
            .with_status(401)
            .with_body(r#"{"detail":"Invalid Access Key."}"#)
            .create_async()
            .await;

        let err = coordinator_for(&server)
            .yoink(pending("https://example.com/video", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid Access Key.");
    }

    #[tokio::test]
    async fn backend_offline_when_unreachable() {
        let coordinator = YoinkCoordinator::new(ApiClient::new(ApiConfig::new("http://127.0.0.1:1")));
        assert!(!coordinator.backend_online().await);
    }

    #[tokio::test]
    async fn save_stream_writes_file() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/files/cat.mp4")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("meow meow")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.mp4");

        let link = format!("{}/files/cat.mp4?token=k", server.url());
        let events: Vec<SaveEvent> = coordinator_for(&server)
            .save_stream(link, path.clone())
            .collect()
            .await;

        assert!(matches!(events.first(), Some(SaveEvent::Progress(_))));
        assert!(matches!(events.last(), Some(SaveEvent::Completed(p)) if *p == path));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"meow meow");
    }

    #[tokio::test]
    async fn save_stream_reports_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/files/cat.mp4")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"detail":"Invalid Access Key."}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat.mp4");

        let link = format!("{}/files/cat.mp4?token=bad", server.url());
        let events: Vec<SaveEvent> = coordinator_for(&server)
            .save_stream(link, path.clone())
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        assert!(
            matches!(&events[0], SaveEvent::Failed(AppError::Rejected(d)) if d == "Invalid Access Key.")
        );
        assert!(!path.exists());
    }
}
