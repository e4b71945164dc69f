use std::io;
use std::path::Path;

use tempfile::TempDir;

use crate::application::metadata::MetadataCache;
use crate::domain::{EpisodeRef, ShowRef};

/// One episode-browsing session: the episode list for a show, the metadata
/// cache, and the temp directory holding fetched cover images.
///
/// Dropping the session is teardown: the temp directory is removed even
/// while fetches are in flight, and every completion message carries the
/// session `id` so the update loop can drop results that arrive late.
pub struct EpisodeSession {
    pub id: u64,
    pub show: ShowRef,
    pub episodes: Vec<EpisodeRef>,
    pub loading: bool,
    pub cache: MetadataCache,
    pub selected: Option<usize>,
    temp_dir: TempDir,
}

impl EpisodeSession {
    pub fn new(id: u64, show: ShowRef) -> io::Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("sounds-dl-").tempdir()?;
        Ok(Self {
            id,
            show,
            episodes: Vec::new(),
            loading: true,
            cache: MetadataCache::default(),
            selected: None,
            temp_dir,
        })
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn selected_episode(&self) -> Option<&EpisodeRef> {
        self.selected.and_then(|index| self.episodes.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn show() -> ShowRef {
        ShowRef {
            title: "Newscast".to_string(),
            description: String::new(),
            href: Url::parse("https://example.com/show").unwrap(),
        }
    }

    #[test]
    fn test_teardown_removes_temp_dir() {
        let session = EpisodeSession::new(1, show()).unwrap();
        let path = session.temp_path().to_path_buf();
        assert!(path.is_dir());

        drop(session);
        assert!(!path.exists());
    }

    #[test]
    fn test_selected_episode_bounds() {
        let mut session = EpisodeSession::new(1, show()).unwrap();
        session.episodes.push(EpisodeRef {
            series_name: "Newscast".to_string(),
            episode_name: "Ep 1".to_string(),
            href: Url::parse("https://example.com/ep1").unwrap(),
        });

        assert!(session.selected_episode().is_none());
        session.selected = Some(0);
        assert!(session.selected_episode().is_some());
        session.selected = Some(9);
        assert!(session.selected_episode().is_none());
    }
}
