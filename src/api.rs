//! API client for the AniList GraphQL service.
//!
//! Each invocation issues exactly one POST request. The query document is
//! chosen by the effective [`Mode`], and the response is normalized into
//! [`ScheduleEntry`] values. Fields the service may omit or null out are
//! handled here, so the rest of the crate only sees complete entries.

use crate::aggregate::{sort_by_airing, within_window};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{AiringEntry, ListEntry, MediaTitle, Mode, ScheduleEntry};
use crate::window::DayWindow;
use log::{debug, warn};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

pub const API_URL: &str = "https://graphql.anilist.co";
const USER_AGENT: &str = "waybar-anime-schedule/1.0";

/// Upper bound for the whole request, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size of the global airing query.
const GLOBAL_PAGE_SIZE: u32 = 20;

const LIST_QUERY: &str = r#"
    query ($user: String, $status: [MediaListStatus]) {
        MediaListCollection(userName: $user, type: ANIME, status_in: $status) {
            lists {
                entries {
                    progress
                    media {
                        title { romaji english }
                        episodes
                        siteUrl
                    }
                }
            }
        }
    }
"#;

const USER_AIRING_QUERY: &str = r#"
    query ($user: String) {
        MediaListCollection(userName: $user, type: ANIME, status_in: [CURRENT, PLANNING]) {
            lists {
                entries {
                    media {
                        title { romaji english }
                        siteUrl
                        nextAiringEpisode { airingAt episode }
                    }
                }
            }
        }
    }
"#;

const GLOBAL_AIRING_QUERY: &str = r#"
    query ($start: Int, $end: Int, $page: Int, $perPage: Int) {
        Page(page: $page, perPage: $perPage) {
            airingSchedules(airingAt_greater: $start, airingAt_lesser: $end, sort: TIME) {
                airingAt
                episode
                media { title { romaji english } siteUrl }
            }
        }
    }
"#;

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// GraphQL envelope
#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
}

impl<T> GraphqlResponse<T> {
    fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// Response types for MediaListCollection queries
#[derive(Debug, Default, Deserialize)]
struct ListCollectionData {
    #[serde(rename = "MediaListCollection", default)]
    collection: Option<MediaListCollection>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaListCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    lists: Vec<MediaListGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaListGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    entries: Vec<MediaListItem>,
}

#[derive(Debug, Default, Deserialize)]
struct MediaListItem {
    #[serde(default)]
    progress: Option<i64>,
    #[serde(default)]
    media: Option<Media>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    #[serde(default, deserialize_with = "null_as_default")]
    title: MediaTitle,
    #[serde(default)]
    episodes: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    site_url: String,
    #[serde(default)]
    next_airing_episode: Option<NextAiringEpisode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextAiringEpisode {
    #[serde(default, deserialize_with = "null_as_default")]
    airing_at: i64,
    #[serde(default)]
    episode: Option<i64>,
}

// Response types for the global airing query
#[derive(Debug, Default, Deserialize)]
struct PageData {
    #[serde(rename = "Page", default)]
    page: Option<Page>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    #[serde(default, deserialize_with = "null_as_default")]
    airing_schedules: Vec<AiringSchedule>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiringSchedule {
    #[serde(default, deserialize_with = "null_as_default")]
    airing_at: i64,
    #[serde(default)]
    episode: Option<i64>,
    #[serde(default)]
    media: Option<Media>,
}

fn list_items(data: Option<ListCollectionData>) -> impl Iterator<Item = MediaListItem> {
    data.and_then(|d| d.collection)
        .map(|c| c.lists)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|group| group.entries)
}

/// One entry per list item, in response order.
fn normalize_list(data: Option<ListCollectionData>) -> Vec<ScheduleEntry> {
    list_items(data)
        .map(|item| {
            let media = item.media.unwrap_or_default();
            ScheduleEntry::Listed(ListEntry {
                title: media.title.resolve(),
                progress: item.progress,
                episodes: media.episodes,
                url: media.site_url,
            })
        })
        .collect()
}

/// Next airing episode of every list item that has one, in response order.
fn normalize_user_airing(data: Option<ListCollectionData>) -> Vec<ScheduleEntry> {
    list_items(data)
        .filter_map(|item| item.media)
        .filter_map(|media| {
            let next = media.next_airing_episode?;
            Some(ScheduleEntry::Airing(AiringEntry {
                airing: next.airing_at,
                episode: next.episode,
                title: media.title.resolve(),
                url: media.site_url,
            }))
        })
        .collect()
}

fn normalize_global_airing(data: Option<PageData>) -> Vec<ScheduleEntry> {
    data.and_then(|d| d.page)
        .map(|p| p.airing_schedules)
        .unwrap_or_default()
        .into_iter()
        .map(|schedule| {
            let media = schedule.media.unwrap_or_default();
            ScheduleEntry::Airing(AiringEntry {
                airing: schedule.airing_at,
                episode: schedule.episode,
                title: media.title.resolve(),
                url: media.site_url,
            })
        })
        .collect()
}

/// Window-filtered and time-ordered airing entries.
fn in_window_sorted(entries: Vec<ScheduleEntry>, window: &DayWindow) -> Vec<ScheduleEntry> {
    let mut entries = within_window(entries, window);
    sort_by_airing(&mut entries);
    entries
}

/// HTTP client bound to one GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct AniListClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AniListClient {
    /// Client for the public AniList endpoint with the default timeout.
    pub fn new() -> Result<Self> {
        let http = Self::http_builder(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_http_client(http, API_URL))
    }

    /// HTTP client builder with the widget's headers and `timeout` applied.
    pub fn http_builder(timeout: Duration) -> reqwest::ClientBuilder {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
    }

    /// Client for an arbitrary endpoint, e.g. a local test server.
    pub fn with_http_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch the entries for the effective mode of `config`.
    ///
    /// List mode without a username yields an empty list and sends nothing.
    /// Airing entries come back filtered to `window` and sorted by time.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> anime_schedule::error::Result<()> {
    /// use anime_schedule::api::AniListClient;
    /// use anime_schedule::config::Config;
    /// use anime_schedule::window::DayWindow;
    ///
    /// let config = Config::new();
    /// let client = AniListClient::new()?;
    /// let entries = client.fetch(&config, &DayWindow::today(0)).await?;
    /// println!("{} episodes today", entries.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, config: &Config, window: &DayWindow) -> Result<Vec<ScheduleEntry>> {
        let mode = config.effective_mode();
        debug!(
            "Fetching in {} mode for window [{}, {})",
            mode, window.start, window.end
        );

        let entries = match (mode, config.username.as_deref()) {
            (Mode::List, None) => {
                debug!("List mode without a username, skipping request");
                Vec::new()
            }
            (Mode::List, Some(user)) => self.fetch_list(user, &config.list_statuses).await?,
            (Mode::User, Some(user)) => self.fetch_user_airing(user, window).await?,
            _ => self.fetch_global_airing(window).await?,
        };

        debug!("Fetched {} entries", entries.len());
        Ok(entries)
    }

    async fn fetch_list(&self, user: &str, statuses: &[String]) -> Result<Vec<ScheduleEntry>> {
        let variables = serde_json::json!({
            "user": user,
            "status": statuses,
        });
        let data = self.query::<ListCollectionData>(LIST_QUERY, variables).await?;
        Ok(normalize_list(data))
    }

    async fn fetch_user_airing(&self, user: &str, window: &DayWindow) -> Result<Vec<ScheduleEntry>> {
        let variables = serde_json::json!({ "user": user });
        let data = self
            .query::<ListCollectionData>(USER_AIRING_QUERY, variables)
            .await?;
        Ok(in_window_sorted(normalize_user_airing(data), window))
    }

    async fn fetch_global_airing(&self, window: &DayWindow) -> Result<Vec<ScheduleEntry>> {
        let variables = serde_json::json!({
            "start": window.start,
            "end": window.end,
            "page": 1,
            "perPage": GLOBAL_PAGE_SIZE,
        });
        let data = self.query::<PageData>(GLOBAL_AIRING_QUERY, variables).await?;
        Ok(in_window_sorted(normalize_global_airing(data), window))
    }

    /// POST one GraphQL document and decode its `data` member.
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Option<T>> {
        debug!("POST {} variables={}", self.endpoint, variables);

        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let resp = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GraphqlResponse<serde_json::Value>>(&text)
                .map(|r| r.error_message())
                .unwrap_or_default();
            return Err(AppError::Api(if message.is_empty() {
                status.to_string()
            } else {
                format!("{} ({})", message, status)
            }));
        }

        let parsed: GraphqlResponse<T> = serde_json::from_str(&text)?;
        if !parsed.errors.is_empty() {
            warn!("GraphQL errors in response: {}", parsed.error_message());
        }

        Ok(parsed.data)
    }
}
