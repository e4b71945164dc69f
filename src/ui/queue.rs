use iced::widget::{column, progress_bar, text};
use iced::Element;

use crate::application::queue::DownloadManager;

pub fn view<'a, M: 'a>(manager: &'a DownloadManager) -> Element<'a, M> {
    let mut body = column![text("Download Queue:").size(16)].spacing(10);

    match manager.active() {
        Some(active) => {
            body = body.push(text(active.href.as_str()).size(14));
            body = body.push(progress_bar(0.0..=100.0, active.percent as f32));
        }
        None => {
            body = body.push(text("No active download.").size(14));
        }
    }

    for request in manager.pending() {
        body = body.push(text(request.href.as_str()).size(14));
    }

    body.padding(20).into()
}
