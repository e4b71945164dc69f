use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use iced::widget::{button, column, row, text};
use iced::{Element, Length, Task};
use url::Url;

use crate::api::{SiteParser, SoundsClient, SoundsParser};
use crate::application::queue::{DownloadManager, StartCommand};
use crate::application::session::EpisodeSession;
use crate::application::worker::{self, WorkerEvent, WorkerSpawn};
use crate::application::{catalog, metadata, settings};
use crate::domain::{AppError, EpisodeRef, Settings, ShowRef};
use crate::ui::episodes::{self, EpisodesMessage};
use crate::ui::search::{SearchMessage, SearchView};
use crate::ui::settings::{SettingsMessage, SettingsView};
use crate::ui::{downloads, queue};
use crate::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Queue,
    Downloads,
    Settings,
}

pub struct App {
    client: SoundsClient,
    parser: Arc<dyn SiteParser>,
    settings: Settings,
    settings_path: PathBuf,
    manager: DownloadManager,
    tab: Tab,
    search: SearchView,
    // The liveness boundary: completions carry a session id, and anything
    // not matching the current session is dropped.
    session: Option<EpisodeSession>,
    next_session_id: u64,
    settings_view: SettingsView,
    downloaded_files: Vec<String>,
    last_download_message: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let settings_path = settings::default_path();
        let settings = settings::load(&settings_path);
        let settings_view = SettingsView::from_settings(&settings);
        let downloaded_files = utils::audio_files_in(&settings.download_dir);

        Self {
            client: SoundsClient::new(),
            parser: Arc::new(SoundsParser::default()),
            settings,
            settings_path,
            manager: DownloadManager::default(),
            tab: Tab::Search,
            search: SearchView::default(),
            session: None,
            next_session_id: 0,
            settings_view,
            downloaded_files,
            last_download_message: None,
        }
    }

    fn session_mut(&mut self, id: u64) -> Option<&mut EpisodeSession> {
        self.session.as_mut().filter(|session| session.id == id)
    }

    fn open_session(&mut self, show: ShowRef) -> Task<Message> {
        self.next_session_id += 1;
        let id = self.next_session_id;

        match EpisodeSession::new(id, show.clone()) {
            Ok(session) => {
                self.session = Some(session);
                let client = self.client.clone();
                let parser = self.parser.clone();
                Task::perform(
                    catalog::load_episodes(client, parser, show.href),
                    move |episodes| Message::EpisodesLoaded { session: id, episodes },
                )
            }
            Err(e) => {
                self.search.status_message = format!("Could not open show: {e}");
                Task::none()
            }
        }
    }

    /// Dispatch the fetches for whichever metadata halves of `href` are
    /// neither cached nor already in flight.
    fn fetch_missing_metadata(&mut self, href: Url) -> Task<Message> {
        let client = self.client.clone();
        let parser = self.parser.clone();
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };
        let id = session.id;
        let temp_dir = session.temp_path().to_path_buf();

        let mut tasks = Vec::new();
        if session.cache.begin_description(&href) {
            let client = client.clone();
            let parser = parser.clone();
            let fetch_href = href.clone();
            tasks.push(Task::perform(
                async move {
                    let text = metadata::fetch_description(client, parser, fetch_href.clone()).await;
                    (fetch_href, text)
                },
                move |(href, text)| Message::DescriptionFetched {
                    session: id,
                    href,
                    text,
                },
            ));
        }
        if session.cache.begin_cover(&href) {
            let fetch_href = href.clone();
            tasks.push(Task::perform(
                async move {
                    let path = metadata::fetch_cover(client, parser, fetch_href.clone(), temp_dir).await;
                    (fetch_href, path)
                },
                move |(href, path)| Message::CoverFetched {
                    session: id,
                    href,
                    path,
                },
            ));
        }
        Task::batch(tasks)
    }

    fn start_worker(&self, command: StartCommand) -> Task<Message> {
        let spawn = WorkerSpawn::new(
            command.worker_id,
            command.href,
            self.settings.download_dir.clone(),
            self.settings.quality.format_selector().to_string(),
        );
        Task::stream(worker::run(spawn).map(Message::Worker))
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    Search(SearchMessage),
    Episodes(EpisodesMessage),
    Settings(SettingsMessage),
    SearchCompleted(Result<Vec<ShowRef>, AppError>),
    EpisodesLoaded {
        session: u64,
        episodes: Vec<EpisodeRef>,
    },
    DescriptionFetched {
        session: u64,
        href: Url,
        text: String,
    },
    CoverFetched {
        session: u64,
        href: Url,
        path: Option<PathBuf>,
    },
    Worker(WorkerEvent),
    DownloadDirPicked(Option<PathBuf>),
}

pub fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::TabSelected(tab) => {
            app.tab = tab;
            Task::none()
        }
        Message::Search(msg) => match msg {
            SearchMessage::QueryChanged(query) => {
                app.search.query = query;
                Task::none()
            }
            SearchMessage::SearchPressed => {
                let term = app.search.query.trim().to_string();
                if term.is_empty() {
                    return Task::none();
                }
                app.search.status_message = format!("Searching for: {term}");
                app.search.results.clear();
                app.search.selected = None;

                let client = app.client.clone();
                let parser = app.parser.clone();
                Task::perform(
                    catalog::search_shows(client, parser, term),
                    Message::SearchCompleted,
                )
            }
            SearchMessage::ResultSelected(index) => {
                app.search.selected = Some(index);
                Task::none()
            }
            SearchMessage::GoToShow => {
                let show = app
                    .search
                    .selected
                    .and_then(|index| app.search.results.get(index))
                    .cloned();
                match show {
                    Some(show) => app.open_session(show),
                    None => Task::none(),
                }
            }
        },
        Message::SearchCompleted(result) => {
            match result {
                Ok(results) => {
                    app.search.status_message = if results.is_empty() {
                        "No shows found.".to_string()
                    } else {
                        format!("{} shows found.", results.len())
                    };
                    app.search.results = results;
                }
                Err(e) => {
                    log::warn!("search failed: {e}");
                    app.search.status_message = "Error fetching search results.".to_string();
                }
            }
            Task::none()
        }
        Message::EpisodesLoaded { session, episodes } => {
            match app.session_mut(session) {
                Some(live) => {
                    live.loading = false;
                    live.episodes = episodes;
                }
                None => log::debug!("dropping episode list for stale session {session}"),
            }
            Task::none()
        }
        Message::Episodes(msg) => match msg {
            EpisodesMessage::Back => {
                // Teardown: the temp dir goes with the session.
                app.session = None;
                Task::none()
            }
            EpisodesMessage::Selected(index) => {
                let Some(session) = app.session.as_mut() else {
                    return Task::none();
                };
                session.selected = Some(index);
                match session.selected_episode().map(|episode| episode.href.clone()) {
                    Some(href) => app.fetch_missing_metadata(href),
                    None => Task::none(),
                }
            }
            EpisodesMessage::DownloadPressed => {
                let href = app
                    .session
                    .as_ref()
                    .and_then(|session| session.selected_episode())
                    .map(|episode| episode.href.clone());
                let Some(href) = href else {
                    return Task::none();
                };
                match app.manager.enqueue(href) {
                    Some(command) => app.start_worker(command),
                    None => Task::none(),
                }
            }
        },
        Message::DescriptionFetched {
            session,
            href,
            text,
        } => {
            match app.session_mut(session) {
                Some(live) => live.cache.complete_description(href, text),
                None => log::debug!("dropping stale description for session {session}"),
            }
            Task::none()
        }
        Message::CoverFetched {
            session,
            href,
            path,
        } => {
            match app.session_mut(session) {
                Some(live) => live.cache.complete_cover(href, path),
                None => log::debug!("dropping stale cover for session {session}"),
            }
            Task::none()
        }
        Message::Worker(event) => match event {
            WorkerEvent::Progress { worker_id, percent } => {
                app.manager.on_progress(worker_id, percent);
                Task::none()
            }
            WorkerEvent::Finished {
                worker_id,
                href,
                message,
                ..
            } => {
                app.last_download_message = Some(format!("{message} ({href})"));
                app.downloaded_files = utils::audio_files_in(&app.settings.download_dir);
                match app.manager.on_worker_terminal(worker_id) {
                    Some(command) => app.start_worker(command),
                    None => Task::none(),
                }
            }
        },
        Message::Settings(msg) => match msg {
            SettingsMessage::LocationChanged(location) => {
                app.settings_view.location = location;
                Task::none()
            }
            SettingsMessage::BrowsePressed => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .pick_folder()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::DownloadDirPicked,
            ),
            SettingsMessage::QualitySelected(quality) => {
                app.settings_view.quality = quality;
                Task::none()
            }
            SettingsMessage::SavePressed => {
                let location = app.settings_view.location.trim();
                if !location.is_empty() {
                    app.settings.download_dir = PathBuf::from(location);
                }
                app.settings.quality = app.settings_view.quality;
                app.settings_view.status =
                    match settings::save(&app.settings_path, &app.settings) {
                        Ok(()) => "Settings saved.".to_string(),
                        Err(e) => format!("Could not save settings: {e}"),
                    };
                app.downloaded_files = utils::audio_files_in(&app.settings.download_dir);
                Task::none()
            }
        },
        Message::DownloadDirPicked(path) => {
            if let Some(path) = path {
                app.settings_view.location = path.display().to_string();
            }
            Task::none()
        }
    }
}

pub fn view(app: &App) -> Element<'_, Message> {
    let tab_bar = row![
        tab_button("Search", Tab::Search),
        tab_button("Queue", Tab::Queue),
        tab_button("Downloads", Tab::Downloads),
        tab_button("Settings", Tab::Settings),
    ]
    .spacing(8);

    let body: Element<'_, Message> = match app.tab {
        Tab::Search => match &app.session {
            Some(session) => episodes::view(session).map(Message::Episodes),
            None => app.search.view().map(Message::Search),
        },
        Tab::Queue => queue::view(&app.manager),
        Tab::Downloads => downloads::view(
            &app.downloaded_files,
            app.manager.active().map(|active| active.percent),
            app.last_download_message.as_deref(),
        ),
        Tab::Settings => app.settings_view.view().map(Message::Settings),
    };

    column![tab_bar, body]
        .padding(10)
        .spacing(10)
        .height(Length::Fill)
        .into()
}

fn tab_button(label: &str, tab: Tab) -> Element<'_, Message> {
    button(text(label).size(14))
        .on_press(Message::TabSelected(tab))
        .padding([6, 12])
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show() -> ShowRef {
        ShowRef {
            title: "Newscast".to_string(),
            description: String::new(),
            href: Url::parse("https://example.com/show").unwrap(),
        }
    }

    fn href(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_live_completions_populate_cache() {
        let mut app = App::new();
        app.session = Some(EpisodeSession::new(3, show()).unwrap());
        app.next_session_id = 3;
        let ep = href("https://example.com/ep");

        let _ = update(
            &mut app,
            Message::DescriptionFetched {
                session: 3,
                href: ep.clone(),
                text: "synopsis".to_string(),
            },
        );
        let _ = update(
            &mut app,
            Message::CoverFetched {
                session: 3,
                href: ep.clone(),
                path: None,
            },
        );

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.cache.record(&ep).unwrap().description, "synopsis");
    }

    #[test]
    fn test_stale_session_completion_is_suppressed() {
        let mut app = App::new();
        app.session = Some(EpisodeSession::new(3, show()).unwrap());
        app.next_session_id = 3;
        let ep = href("https://example.com/ep");

        // A completion from a torn-down session must not write to the
        // live session's cache.
        let _ = update(
            &mut app,
            Message::DescriptionFetched {
                session: 2,
                href: ep.clone(),
                text: "stale".to_string(),
            },
        );
        let _ = update(
            &mut app,
            Message::CoverFetched {
                session: 2,
                href: ep.clone(),
                path: None,
            },
        );

        let session = app.session.as_ref().unwrap();
        assert!(session.cache.record(&ep).is_none());
        assert!(!session.cache.is_pending(&ep));
    }

    #[test]
    fn test_completion_after_full_teardown_is_dropped() {
        let mut app = App::new();
        app.session = None;

        let _ = update(
            &mut app,
            Message::DescriptionFetched {
                session: 1,
                href: href("https://example.com/ep"),
                text: "late".to_string(),
            },
        );
        assert!(app.session.is_none());
    }
}
