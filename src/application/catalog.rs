use std::sync::Arc;

use url::Url;

use crate::api::{SiteParser, SoundsClient};
use crate::domain::{AppError, EpisodeRef, ShowRef};

/// Search the site for shows matching a term.
pub async fn search_shows(
    client: SoundsClient,
    parser: Arc<dyn SiteParser>,
    term: String,
) -> Result<Vec<ShowRef>, AppError> {
    let html = client
        .search_page(&term)
        .await
        .map_err(|e| AppError::Api(e.to_string()))?;

    let shows = parser
        .search_entries(&html)
        .into_iter()
        .filter_map(|entry| {
            let href = client.resolve(&entry.href)?;
            Some(ShowRef {
                title: entry.title,
                description: entry.description,
                href,
            })
        })
        .collect();

    Ok(shows)
}

/// Walk a show's listing pages from `?page=1`, accumulating episodes in page
/// order. Pagination stops on the first empty page or the first failed
/// request; duplicate hrefs across pages are preserved (the metadata cache
/// dedups by href downstream). No retries, no page cap.
pub async fn load_episodes(
    client: SoundsClient,
    parser: Arc<dyn SiteParser>,
    show_url: Url,
) -> Vec<EpisodeRef> {
    let mut episodes = Vec::new();
    let mut page = 1u32;
    loop {
        let html = match client.episode_listing_page(&show_url, page).await {
            Ok(html) => html,
            Err(e) => {
                log::debug!("episode listing stopped at page {page}: {e}");
                break;
            }
        };

        let entries = parser.episode_entries(&html);
        if entries.is_empty() {
            break;
        }

        for entry in entries {
            let Some(href) = client.resolve(&entry.href) else {
                continue;
            };
            let (series_name, episode_name) = split_label(&entry.label);
            episodes.push(EpisodeRef {
                series_name,
                episode_name,
                href,
            });
        }
        page += 1;
    }
    episodes
}

/// Listing labels are formatted `"<series>, <episode>"`; labels without a
/// comma degrade to sentinel names rather than failing the listing.
fn split_label(label: &str) -> (String, String) {
    let mut parts = label.split(',');
    match (parts.next(), parts.next()) {
        (Some(series), Some(episode)) => (series.trim().to_string(), episode.trim().to_string()),
        _ => (
            "Unknown Series".to_string(),
            "Unknown Episode".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SoundsParser;
    use mockito::Matcher;

    fn listing_html(entries: &[(&str, &str)]) -> String {
        let items: String = entries
            .iter()
            .map(|(label, href)| {
                format!(
                    r#"<div class="sw-grow sw--ml-2 m:sw--ml-4 sw-relative"><a href="{href}" aria-label="{label}">play</a></div>"#
                )
            })
            .collect();
        format!("<html><body>{items}</body></html>")
    }

    fn page_mock(server: &mut mockito::Server, page: &str, body: String) -> mockito::Mock {
        server
            .mock("GET", "/show")
            .match_query(Matcher::UrlEncoded("page".into(), page.into()))
            .with_status(200)
            .with_body(body)
            .expect(1)
    }

    #[tokio::test]
    async fn test_pagination_stops_on_first_empty_page() {
        let mut server = mockito::Server::new_async().await;
        let page1 = page_mock(
            &mut server,
            "1",
            listing_html(&[("Show A, Ep 1", "/play/1"), ("Show A, Ep 2", "/play/2")]),
        )
        .create_async()
        .await;
        let page2 = page_mock(&mut server, "2", listing_html(&[("Show A, Ep 3", "/play/3")]))
            .create_async()
            .await;
        let page3 = page_mock(&mut server, "3", listing_html(&[]))
            .create_async()
            .await;

        let client = SoundsClient::with_base_url(server.url());
        let parser: Arc<dyn SiteParser> = Arc::new(SoundsParser::default());
        let show_url = Url::parse(&format!("{}/show", server.url())).unwrap();

        let episodes = load_episodes(client, parser, show_url).await;

        let names: Vec<&str> = episodes.iter().map(|e| e.episode_name.as_str()).collect();
        assert_eq!(names, vec!["Ep 1", "Ep 2", "Ep 3"]);
        // Exactly three requests: two content pages plus the terminating empty one.
        page1.assert_async().await;
        page2.assert_async().await;
        page3.assert_async().await;
    }

    #[tokio::test]
    async fn test_pagination_stops_on_non_200() {
        let mut server = mockito::Server::new_async().await;
        let page1 = page_mock(&mut server, "1", listing_html(&[("Show A, Ep 1", "/play/1")]))
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/show")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let client = SoundsClient::with_base_url(server.url());
        let parser: Arc<dyn SiteParser> = Arc::new(SoundsParser::default());
        let show_url = Url::parse(&format!("{}/show", server.url())).unwrap();

        let episodes = load_episodes(client, parser, show_url).await;

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].episode_name, "Ep 1");
        page1.assert_async().await;
        page2.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_shows_resolves_relative_hrefs() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"
            <a href="/sounds/brand/show1">
              <div class="sw-relative sw-pt-2">
                <span class="sw-text-primary">Newscast</span>
                <p class="sw-text-brevier">Daily news chat.</p>
              </div>
            </a>
        "#;
        let mock = server
            .mock("GET", "/sounds/search")
            .match_query(Matcher::UrlEncoded("q".into(), "news".into()))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = SoundsClient::with_base_url(server.url());
        let parser: Arc<dyn SiteParser> = Arc::new(SoundsParser::default());

        let shows = search_shows(client, parser, "news".to_string()).await.unwrap();

        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].title, "Newscast");
        assert_eq!(
            shows[0].href.as_str(),
            format!("{}/sounds/brand/show1", server.url())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_shows_surfaces_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sounds/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = SoundsClient::with_base_url(server.url());
        let parser: Arc<dyn SiteParser> = Arc::new(SoundsParser::default());

        let result = search_shows(client, parser, "news".to_string()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_split_label() {
        assert_eq!(
            split_label("In Our Time, The Haber Process"),
            ("In Our Time".to_string(), "The Haber Process".to_string())
        );
        // Only the first two comma segments are used.
        assert_eq!(
            split_label("Series, Episode, Extra"),
            ("Series".to_string(), "Episode".to_string())
        );
        assert_eq!(
            split_label("No comma here"),
            ("Unknown Series".to_string(), "Unknown Episode".to_string())
        );
    }
}
