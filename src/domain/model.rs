use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// A show found on the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRef {
    pub title: String,
    pub description: String,
    pub href: Url,
}

/// One episode parsed from a show's listing pages. Identity is `href`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    pub series_name: String,
    pub episode_name: String,
    pub href: Url,
}

impl EpisodeRef {
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.series_name, self.episode_name)
    }
}

/// A queued download. Consumed when its worker starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub href: Url,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];

    /// The yt-dlp format selector this quality maps to.
    pub fn format_selector(self) -> &'static str {
        match self {
            Quality::Low => "worstaudio",
            Quality::Medium => "bestaudio[abr<=128]",
            Quality::High => "bestaudio",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quality::Low => "Low",
            Quality::Medium => "Medium",
            Quality::High => "High",
        };
        f.write_str(name)
    }
}

/// User settings, read (not mutated) by the download pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub download_dir: PathBuf,
    pub quality: Quality,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            quality: Quality::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_format_selectors() {
        assert_eq!(Quality::Low.format_selector(), "worstaudio");
        assert_eq!(Quality::Medium.format_selector(), "bestaudio[abr<=128]");
        assert_eq!(Quality::High.format_selector(), "bestaudio");
    }

    #[test]
    fn test_display_label() {
        let episode = EpisodeRef {
            series_name: "In Our Time".to_string(),
            episode_name: "The Haber Process".to_string(),
            href: Url::parse("https://www.bbc.co.uk/sounds/play/abc").unwrap(),
        };
        assert_eq!(episode.display_label(), "In Our Time - The Haber Process");
    }
}
