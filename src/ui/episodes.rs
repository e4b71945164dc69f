use iced::widget::{button, column, image, row, scrollable, text, Space};
use iced::{Element, Length};

use crate::application::session::EpisodeSession;

#[derive(Debug, Clone)]
pub enum EpisodesMessage {
    Back,
    Selected(usize),
    DownloadPressed,
}

pub fn view(session: &EpisodeSession) -> Element<'_, EpisodesMessage> {
    let mut list = column![].spacing(4);
    for (index, episode) in session.episodes.iter().enumerate() {
        list = list.push(
            button(text(episode.display_label()).size(14))
                .on_press(EpisodesMessage::Selected(index))
                .width(Length::Fill),
        );
    }
    if session.loading {
        list = list.push(text("Loading episodes...").size(14));
    } else if session.episodes.is_empty() {
        list = list.push(text("Failed to retrieve any episodes.").size(14));
    }

    column![
        button("Back to Search")
            .on_press(EpisodesMessage::Back)
            .padding([6, 12]),
        text(session.show.title.as_str()).size(24),
        row![
            scrollable(list)
                .width(Length::FillPortion(2))
                .height(Length::Fill),
            column![details(session)].width(Length::FillPortion(3)),
        ]
        .spacing(20)
        .height(Length::Fill),
    ]
    .padding(20)
    .spacing(10)
    .into()
}

fn details(session: &EpisodeSession) -> Element<'_, EpisodesMessage> {
    let Some(episode) = session.selected_episode() else {
        return text("Select an episode.").size(14).into();
    };

    let mut details = column![
        text(format!("Series: {}", episode.series_name)).size(16),
        text(format!("Episode: {}", episode.episode_name)).size(16),
        text(episode.href.as_str()).size(12),
        Space::new().height(Length::Fixed(10.0)),
    ]
    .spacing(6);

    // Rendered only once both metadata halves have completed.
    match session.cache.record(&episode.href) {
        Some(record) => {
            match record.cover {
                Some(path) => {
                    details = details
                        .push(image(image::Handle::from_path(path)).width(Length::Fixed(320.0)));
                }
                None => details = details.push(text("Cover image not available.").size(14)),
            }
            details = details.push(text(record.description).size(14));
        }
        None => {
            details = details.push(text("Loading description and cover image...").size(14));
        }
    }

    details = details.push(Space::new().height(Length::Fixed(10.0)));
    details = details.push(
        button("Download Episode")
            .on_press(EpisodesMessage::DownloadPressed)
            .padding([10, 20]),
    );

    scrollable(details).height(Length::Fill).into()
}
