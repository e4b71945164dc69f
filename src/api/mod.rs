mod client;
mod parser;

pub use client::{ApiError, Result, SoundsClient};
pub use parser::{EpisodeEntry, SearchEntry, SelectorConfig, SiteParser, SoundsParser};
