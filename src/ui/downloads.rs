use iced::widget::{column, progress_bar, scrollable, text};
use iced::{Element, Length};

pub fn view<'a, M: 'a>(
    files: &'a [String],
    active_percent: Option<u32>,
    last_message: Option<&'a str>,
) -> Element<'a, M> {
    let mut list = column![].spacing(4);
    for file in files {
        list = list.push(text(file.as_str()).size(14));
    }
    if files.is_empty() {
        list = list.push(text("No downloaded episodes yet.").size(14));
    }

    let mut body = column![
        text("Downloaded Episodes:").size(16),
        scrollable(list).height(Length::Fill),
        text("Current Download Progress:").size(14),
        progress_bar(0.0..=100.0, active_percent.unwrap_or(0) as f32),
    ]
    .spacing(10);

    if let Some(message) = last_message {
        body = body.push(text(message).size(14));
    }

    body.padding(20).into()
}
