use iced::widget::{button, column, row, scrollable, text, text_input, Space};
use iced::{Element, Length};

use crate::domain::ShowRef;

/// Search page state
pub struct SearchView {
    pub query: String,
    pub results: Vec<ShowRef>,
    pub status_message: String,
    pub selected: Option<usize>,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            status_message: "Enter a search term to find shows".to_string(),
            selected: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SearchMessage {
    QueryChanged(String),
    SearchPressed,
    ResultSelected(usize),
    GoToShow,
}

impl SearchView {
    pub fn view(&self) -> Element<'_, SearchMessage> {
        let mut results = column![].spacing(4);
        for (index, show) in self.results.iter().enumerate() {
            results = results.push(
                button(text(show.title.as_str()).size(14))
                    .on_press(SearchMessage::ResultSelected(index))
                    .width(Length::Fill),
            );
        }

        let details: Element<'_, SearchMessage> =
            match self.selected.and_then(|index| self.results.get(index)) {
                Some(show) => column![
                    text(show.title.as_str()).size(20),
                    text(if show.description.is_empty() {
                        "No description available."
                    } else {
                        show.description.as_str()
                    })
                    .size(14),
                    Space::new().height(Length::Fixed(10.0)),
                    button("Go to Show")
                        .on_press(SearchMessage::GoToShow)
                        .padding([10, 20]),
                ]
                .spacing(10)
                .into(),
                None => text("Select a show to see details").size(14).into(),
            };

        column![
            row![
                text_input("Search for shows...", &self.query)
                    .on_input(SearchMessage::QueryChanged)
                    .padding(10),
                button("Search")
                    .on_press(SearchMessage::SearchPressed)
                    .padding([10, 20]),
            ]
            .spacing(10),
            text(&self.status_message).size(14),
            row![
                scrollable(results)
                    .width(Length::FillPortion(2))
                    .height(Length::Fill),
                column![details].width(Length::FillPortion(3)),
            ]
            .spacing(20)
            .height(Length::Fill),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}
