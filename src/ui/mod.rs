use std::path::PathBuf;

use iced::{
    alignment::{Horizontal, Vertical},
    widget::{button, column, container, progress_bar, text, text_input, Space},
    Element, Length,
};

use crate::{application::SubmissionController, domain::SubmissionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

/// Saving the staged file to disk, independent of the yoink lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Choosing,
    Saving(f32),
    Saved(PathBuf),
    Failed(String),
}

impl SaveState {
    pub fn is_busy(&self) -> bool {
        matches!(self, SaveState::Choosing | SaveState::Saving(_))
    }
}

/// Presentation-only state around the form
#[derive(Debug, Default)]
pub struct Presentation {
    pub embedded: bool,
    pub backend: BackendStatus,
    pub save: SaveState,
    pub input_hint: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub enum FormMessage {
    UrlChanged(String),
    AccessKeyChanged(String),
    Submit,
    SaveFile,
}

impl Presentation {
    pub fn view<'a>(&'a self, form: &'a SubmissionController) -> Element<'a, FormMessage> {
        let subtitle = if self.embedded {
            "Mini App"
        } else {
            "Private Media Downloader"
        };

        let submit_label = if form.is_loading() {
            "Pulling..."
        } else {
            "Vortex It"
        };

        let mut card = column![
            text_input("Access Key", form.access_key())
                .on_input(FormMessage::AccessKeyChanged)
                .on_submit(FormMessage::Submit)
                .secure(true)
                .padding(10),
            text_input("Paste media URL here...", form.url())
                .on_input(FormMessage::UrlChanged)
                .on_submit(FormMessage::Submit)
                .padding(10),
        ]
        .spacing(12);

        if let Some(hint) = self.input_hint {
            card = card.push(text(hint).size(12).style(text::danger));
        }

        card = card.push(
            button(container(text(submit_label)).center_x(Length::Fill))
                .on_press_maybe((!form.is_loading()).then_some(FormMessage::Submit))
                .width(Length::Fill)
                .padding([10, 20]),
        );

        match form.status() {
            SubmissionStatus::Error => {
                card = card.push(text(form.message()).size(14).style(text::danger));
            }
            SubmissionStatus::Success => {
                card = card.push(self.result_panel(form));
            }
            SubmissionStatus::Idle | SubmissionStatus::Loading => {}
        }

        let content = column![
            text("Vortex").size(40),
            text(subtitle).size(14).style(text::secondary),
            Space::new().height(Length::Fixed(20.0)),
            card,
            Space::new().height(Length::Fixed(20.0)),
            self.footer(),
        ]
        .spacing(6)
        .max_width(448.0);

        let (align_y, padding): (Vertical, [u16; 2]) = if self.embedded {
            (Vertical::Top, [32, 16])
        } else {
            (Vertical::Center, [16, 16])
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(align_y)
            .padding(padding)
            .into()
    }

    fn result_panel<'a>(&'a self, form: &'a SubmissionController) -> Element<'a, FormMessage> {
        let mut panel = column![
            text("Ready to Download").size(16).style(text::success),
            text(form.file_name()).size(12),
            text(form.download_link()).size(11).style(text::secondary),
            button(container(text("Download File")).center_x(Length::Fill))
                .on_press_maybe((!self.save.is_busy()).then_some(FormMessage::SaveFile))
                .width(Length::Fill)
                .padding([8, 16]),
        ]
        .spacing(8);

        match &self.save {
            SaveState::Idle => {}
            SaveState::Choosing => {
                panel = panel.push(text("Choose where to save...").size(12));
            }
            SaveState::Saving(progress) => {
                panel = panel.push(progress_bar(0.0..=1.0, *progress));
            }
            SaveState::Saved(path) => {
                panel = panel.push(text(format!("Saved: {}", path.display())).size(12));
            }
            SaveState::Failed(e) => {
                panel = panel.push(text(e.as_str()).size(12).style(text::danger));
            }
        }

        panel.into()
    }

    fn footer(&self) -> Element<'_, FormMessage> {
        let mode = if self.embedded {
            "Embedded Mode"
        } else {
            "Desktop Mode"
        };
        let backend = match self.backend {
            BackendStatus::Unknown => "Checking backend...",
            BackendStatus::Online => "Backend online",
            BackendStatus::Offline => "Backend unreachable",
        };

        column![
            text(format!("Powered by yt-dlp • {}", mode))
                .size(12)
                .style(text::secondary),
            text(backend).size(12).style(text::secondary),
        ]
        .spacing(2)
        .into()
    }
}
