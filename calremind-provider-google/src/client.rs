//! Google Calendar v3 REST client.

use async_trait::async_trait;
use calremind_core::error::{ProviderError, ProviderResult};
use calremind_core::event::{Calendar, RawEvent, Reminder};
use calremind_core::provider::{CalendarProvider, EventsPage, EventsRequest};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::from_google::FromGoogle;
use crate::types::{CalendarList, CalendarListEntry, ErrorResponse, Events};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
const PAGE_SIZE: &str = "250";

/// Calendar access for one Google account, using an already issued OAuth
/// access token.
pub struct GoogleCalendarProvider {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GoogleCalendarProvider {
    pub fn new(access_token: impl Into<String>) -> Self {
        GoogleCalendarProvider {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Point the client at another API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Transport(format!("Invalid API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport(format!("Invalid API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ProviderResult<T> {
        debug!(path = url.path(), "GET");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

fn error_for(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        // Google answers an expired sync token with 410 Gone
        StatusCode::GONE => ProviderError::CursorInvalidated,
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized(message),
        _ => ProviderError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

fn rfc3339(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn list_calendars(&self) -> ProviderResult<Vec<Calendar>> {
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url(&["users", "me", "calendarList"])?;
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let page: CalendarList = self.get(url).await?;
            calendars.extend(page.items.into_iter().map(Calendar::from_google));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(calendars)
    }

    async fn default_reminders(&self, calendar_id: &str) -> ProviderResult<Vec<Reminder>> {
        let url = self.url(&["users", "me", "calendarList", calendar_id])?;
        let entry: CalendarListEntry = self.get(url).await?;

        Ok(entry
            .default_reminders
            .into_iter()
            .map(Reminder::from_google)
            .collect())
    }

    async fn list_events(&self, request: &EventsRequest) -> ProviderResult<EventsPage> {
        let mut url = self.url(&["calendars", request.calendar_id.as_str(), "events"])?;
        {
            let mut query = url.query_pairs_mut();
            // Expand recurring events into their occurrences
            query.append_pair("singleEvents", "true");
            query.append_pair("timeZone", "UTC");
            query.append_pair("maxResults", PAGE_SIZE);

            match &request.sync_token {
                // Time bounds are rejected alongside a sync token
                Some(token) => {
                    query.append_pair("syncToken", token);
                }
                None => {
                    if let Some(min) = request.time_min {
                        query.append_pair("timeMin", &rfc3339(min));
                    }
                    if let Some(max) = request.time_max {
                        query.append_pair("timeMax", &rfc3339(max));
                    }
                }
            }
            if let Some(token) = &request.page_token {
                query.append_pair("pageToken", token);
            }
        }

        let page: Events = self.get(url).await?;

        Ok(EventsPage {
            items: page.items.into_iter().map(RawEvent::from_google).collect(),
            next_page_token: page.next_page_token,
            next_sync_token: page.next_sync_token,
        })
    }
}
