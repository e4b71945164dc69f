use iced::widget::{button, column, pick_list, row, text, text_input, Space};
use iced::{Element, Length};

use crate::domain::{Quality, Settings};

/// Settings page state; committed to `Settings` only on save.
pub struct SettingsView {
    pub location: String,
    pub quality: Quality,
    pub status: String,
}

#[derive(Debug, Clone)]
pub enum SettingsMessage {
    LocationChanged(String),
    BrowsePressed,
    QualitySelected(Quality),
    SavePressed,
}

impl SettingsView {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            location: settings.download_dir.display().to_string(),
            quality: settings.quality,
            status: String::new(),
        }
    }

    pub fn view(&self) -> Element<'_, SettingsMessage> {
        column![
            text("Download Location:").size(16),
            row![
                text_input("Download directory...", &self.location)
                    .on_input(SettingsMessage::LocationChanged)
                    .padding(10),
                button("Browse")
                    .on_press(SettingsMessage::BrowsePressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            text("Download Quality:").size(16),
            pick_list(
                Quality::ALL,
                Some(self.quality),
                SettingsMessage::QualitySelected
            ),
            Space::new().height(Length::Fixed(10.0)),
            button("Save Settings")
                .on_press(SettingsMessage::SavePressed)
                .padding([10, 20]),
            text(&self.status).size(14),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
