use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use iced::Task;

use crate::api::ApiClient;
use crate::application::{InputRejection, SaveEvent, SubmissionController, YoinkCoordinator};
use crate::config::AppConfig;
use crate::domain::{AppError, SubmissionStatus, YoinkResult};
use crate::host::HostAdapter;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::ui::{BackendStatus, FormMessage, Presentation, SaveState};

pub struct VortexApp {
    form: SubmissionController,
    presentation: Presentation,
    coordinator: YoinkCoordinator,
}

impl VortexApp {
    pub fn new(store: Box<dyn KeyValueStore>, config: &AppConfig, host: &dyn HostAdapter) -> Self {
        Self {
            form: SubmissionController::new(store),
            presentation: Presentation {
                embedded: host.is_embedded(),
                ..Default::default()
            },
            coordinator: YoinkCoordinator::new(ApiClient::new(config.api_config())),
        }
    }

    /// Startup: open the key store, build the app and check the backend.
    pub fn boot(config: AppConfig, host: Arc<dyn HostAdapter>) -> (Self, Task<Message>) {
        let app = Self::new(open_store(), &config, host.as_ref());

        let coordinator = app.coordinator.clone();
        let health_check = Task::perform(
            async move { coordinator.backend_online().await },
            Message::BackendChecked,
        );

        (app, health_check)
    }
}

fn open_store() -> Box<dyn KeyValueStore> {
    match FileStore::open_default() {
        Ok(store) => {
            tracing::info!("access key store at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("access key will not survive restarts: {}", e);
            Box::new(MemoryStore::default())
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(FormMessage),
    /// (Ticket, outcome of the yoink issued with it)
    YoinkResolved(u64, Result<YoinkResult, AppError>),
    BackendChecked(bool),
    /// Save messages carry the ticket of the result being saved.
    SavePathSelected(u64, Option<PathBuf>),
    Save(u64, SaveEvent),
}

pub fn update(app: &mut VortexApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(FormMessage::UrlChanged(url)) => {
            app.form.set_url(url);
            app.presentation.input_hint = None;
        }
        Message::UiMessage(FormMessage::AccessKeyChanged(key)) => {
            app.form.set_access_key(key);
        }
        Message::UiMessage(FormMessage::Submit) => {
            if app.form.is_loading() {
                return Task::none();
            }

            match app.form.submit() {
                Ok(pending) => {
                    app.presentation.input_hint = None;
                    app.presentation.save = SaveState::Idle;

                    let ticket = pending.ticket;
                    let coordinator = app.coordinator.clone();
                    return Task::perform(
                        async move { coordinator.yoink(pending).await },
                        move |outcome| Message::YoinkResolved(ticket, outcome),
                    );
                }
                Err(InputRejection::EmptyUrl) => {
                    app.presentation.input_hint = Some("Please fill out this field.");
                }
                Err(InputRejection::InvalidUrl) => {
                    app.presentation.input_hint = Some("Please enter a URL.");
                }
            }
        }
        Message::UiMessage(FormMessage::SaveFile) => {
            if app.presentation.save.is_busy() {
                return Task::none();
            }
            if let Some(result) = app.form.result() {
                app.presentation.save = SaveState::Choosing;
                let ticket = app.form.ticket();
                let suggested =
                    crate::utils::suggested_filename(&result.download_link, &result.title);
                let coordinator = app.coordinator.clone();
                return Task::perform(
                    async move { coordinator.choose_save_path(suggested).await },
                    move |path| Message::SavePathSelected(ticket, path),
                );
            }
        }
        Message::YoinkResolved(ticket, outcome) => {
            app.form.resolve(ticket, outcome);
        }
        Message::BackendChecked(online) => {
            app.presentation.backend = if online {
                BackendStatus::Online
            } else {
                BackendStatus::Offline
            };
        }
        Message::SavePathSelected(ticket, _) | Message::Save(ticket, _)
            if ticket != app.form.ticket() =>
        {
            tracing::debug!(ticket, latest = app.form.ticket(), "dropping stale save event");
        }
        Message::SavePathSelected(ticket, Some(path)) => {
            if app.form.status() != SubmissionStatus::Success {
                app.presentation.save = SaveState::Idle;
                return Task::none();
            }
            app.presentation.save = SaveState::Saving(0.0);
            let link = app.form.download_link().to_string();
            return Task::stream(
                app.coordinator
                    .save_stream(link, path)
                    .map(move |event| Message::Save(ticket, event)),
            );
        }
        Message::SavePathSelected(_, None) => {
            // User cancelled dialog
            app.presentation.save = SaveState::Idle;
        }
        Message::Save(_, event) => {
            app.presentation.save = match event {
                SaveEvent::Progress(progress) => SaveState::Saving(progress),
                SaveEvent::Completed(path) => SaveState::Saved(path),
                SaveEvent::Failed(e) => SaveState::Failed(e.user_message()),
            };
        }
    }
    Task::none()
}

pub fn view(app: &VortexApp) -> iced::Element<'_, Message> {
    app.presentation.view(&app.form).map(Message::UiMessage)
}
