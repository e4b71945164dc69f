use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::api::{SiteParser, SoundsClient};
use crate::utils::cover_filename;

/// One half of an episode's metadata. `InFlight` is inserted before the
/// fetch is dispatched and overwritten by the completion handler; entries
/// are never removed within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact<T> {
    InFlight,
    Ready(T),
}

/// Session-wide store of fetched episode metadata, keyed by episode href.
/// Descriptions and covers are independent artifact kinds with independent
/// in-flight markers; the single-flight guarantee is per (href, kind).
/// Mutated only from the update loop, so no locking is involved.
#[derive(Default)]
pub struct MetadataCache {
    descriptions: HashMap<Url, Artifact<String>>,
    covers: HashMap<Url, Artifact<Option<PathBuf>>>,
}

/// Both halves of an episode's metadata, available only once both fetches
/// have completed (errors included, as sentinels).
pub struct MetadataView<'a> {
    pub description: &'a str,
    pub cover: Option<&'a Path>,
}

impl MetadataCache {
    /// Check-and-insert the in-flight marker for a description fetch.
    /// Returns true when the caller must dispatch the fetch; false means a
    /// fetch is already in flight or the value is cached.
    pub fn begin_description(&mut self, href: &Url) -> bool {
        match self.descriptions.entry(href.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Artifact::InFlight);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Check-and-insert the in-flight marker for a cover fetch.
    pub fn begin_cover(&mut self, href: &Url) -> bool {
        match self.covers.entry(href.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Artifact::InFlight);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Error text is stored like any other description; failed fetches are
    /// not retried.
    pub fn complete_description(&mut self, href: Url, text: String) {
        self.descriptions.insert(href, Artifact::Ready(text));
    }

    /// `None` records an absent or failed cover.
    pub fn complete_cover(&mut self, href: Url, path: Option<PathBuf>) {
        self.covers.insert(href, Artifact::Ready(path));
    }

    /// The combined record, present only when both halves are ready. Called
    /// again on every individual completion so an out-of-order pair still
    /// renders exactly once both halves have landed.
    pub fn record(&self, href: &Url) -> Option<MetadataView<'_>> {
        let Artifact::Ready(description) = self.descriptions.get(href)? else {
            return None;
        };
        let Artifact::Ready(cover) = self.covers.get(href)? else {
            return None;
        };
        Some(MetadataView {
            description,
            cover: cover.as_deref(),
        })
    }

    /// True while either half of the record is still being fetched.
    pub fn is_pending(&self, href: &Url) -> bool {
        self.descriptions.get(href) == Some(&Artifact::InFlight)
            || self.covers.get(href) == Some(&Artifact::InFlight)
    }
}

/// Fetch an episode's synopsis text. Never fails: network and extraction
/// problems come back as inline error text, cached like a real description.
pub async fn fetch_description(
    client: SoundsClient,
    parser: Arc<dyn SiteParser>,
    href: Url,
) -> String {
    match client.page(&href).await {
        Ok(html) => parser
            .description(&html)
            .unwrap_or_else(|| "Error retrieving description: synopsis not found".to_string()),
        Err(e) => format!("Error fetching page: {e}"),
    }
}

/// Fetch an episode's cover image into `dir` under a content-addressed
/// filename, so repeat fetches of the same image URL overwrite in place.
/// Any miss along the way (request, markup, write) yields `None`; a write
/// into an already-removed session directory fails the same quiet way.
pub async fn fetch_cover(
    client: SoundsClient,
    parser: Arc<dyn SiteParser>,
    href: Url,
    dir: PathBuf,
) -> Option<PathBuf> {
    let html = client.page(&href).await.ok()?;
    let src = parser.cover_url(&html)?;
    let img_url = client.resolve(&src)?;
    let body = client.fetch_bytes(&img_url).await.ok()?;

    let path = dir.join(cover_filename(img_url.as_str()));
    tokio::fs::write(&path, &body).await.ok()?;
    Some(path)
}
