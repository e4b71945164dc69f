use scraper::{ElementRef, Html, Selector};

/// One extraction method per piece of markup the app reads. Selectors are
/// configuration, so a site markup change is a config change, not a code
/// change.
pub trait SiteParser: Send + Sync {
    /// (label, href) pairs from one episode listing page, in page order.
    fn episode_entries(&self, html: &str) -> Vec<EpisodeEntry>;

    /// Deduplicated show entries from the search page.
    fn search_entries(&self, html: &str) -> Vec<SearchEntry>;

    /// Synopsis text from an episode page.
    fn description(&self, html: &str) -> Option<String>;

    /// Cover image src (possibly relative) from an episode page.
    fn cover_url(&self, html: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeEntry {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    pub title: String,
    pub description: String,
    pub href: String,
}

/// CSS selectors for the pieces of the site the app cares about.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub episode_item: String,
    pub episode_link: String,
    pub search_item: String,
    pub search_title: String,
    pub search_description: String,
    pub synopsis: String,
    pub cover_image: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            episode_item: r#"div[class="sw-grow sw--ml-2 m:sw--ml-4 sw-relative"]"#.to_string(),
            episode_link: "a".to_string(),
            search_item: "div.sw-relative.sw-pt-2".to_string(),
            search_title: r#"span[class*="sw-text-primary"]"#.to_string(),
            search_description: r#"p[class*="sw-text-brevier"]"#.to_string(),
            synopsis: ".sc-c-synopsis".to_string(),
            cover_image: "picture img".to_string(),
        }
    }
}

pub struct SoundsParser {
    config: SelectorConfig,
}

impl SoundsParser {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }
}

impl Default for SoundsParser {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

impl SiteParser for SoundsParser {
    fn episode_entries(&self, html: &str) -> Vec<EpisodeEntry> {
        let Ok(item_selector) = Selector::parse(&self.config.episode_item) else {
            return Vec::new();
        };
        let Ok(link_selector) = Selector::parse(&self.config.episode_link) else {
            return Vec::new();
        };

        let document = Html::parse_document(html);
        let mut entries = Vec::new();
        for item in document.select(&item_selector) {
            let Some(anchor) = item.select(&link_selector).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let label = anchor.value().attr("aria-label").unwrap_or_default();
            entries.push(EpisodeEntry {
                label: label.to_string(),
                href: href.to_string(),
            });
        }
        entries
    }

    fn search_entries(&self, html: &str) -> Vec<SearchEntry> {
        let Ok(item_selector) = Selector::parse(&self.config.search_item) else {
            return Vec::new();
        };
        let Ok(title_selector) = Selector::parse(&self.config.search_title) else {
            return Vec::new();
        };
        let Ok(description_selector) = Selector::parse(&self.config.search_description) else {
            return Vec::new();
        };

        let document = Html::parse_document(html);
        let mut entries: Vec<SearchEntry> = Vec::new();
        for item in document.select(&item_selector) {
            // Results are anchors wrapping the item markup.
            let anchor = item
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "a" && el.value().attr("href").is_some());
            let Some(anchor) = anchor else {
                continue;
            };
            let href = anchor.value().attr("href").unwrap_or_default().to_string();

            let title = item
                .select(&title_selector)
                .next()
                .map(|el| text_of(&el))
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| text_of(&anchor));
            if title.is_empty() {
                continue;
            }

            let description = item
                .select(&description_selector)
                .next()
                .map(|el| text_of(&el))
                .unwrap_or_default();

            let entry = SearchEntry {
                title,
                description,
                href,
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        entries
    }

    fn description(&self, html: &str) -> Option<String> {
        let selector = Selector::parse(&self.config.synopsis).ok()?;
        let document = Html::parse_document(html);
        let element = document.select(&selector).next()?;
        Some(text_of(&element))
    }

    fn cover_url(&self, html: &str) -> Option<String> {
        let selector = Selector::parse(&self.config.cover_image).ok()?;
        let document = Html::parse_document(html);
        let img = document.select(&selector).next()?;
        img.value().attr("src").map(str::to_string)
    }
}
