//! Public destination catalog: offset-paginated browsing with a load-more
//! tail. No auth; `has_more` comes from the "returned fewer than requested"
//! heuristic since the public endpoint carries no meta.
use tracing::warn;

use crate::api::TravelApi;
use crate::model::Destination;

#[derive(Debug)]
pub struct DestinationBrowser {
    items: Vec<Destination>,
    page_size: u32,
    offset: u32,
    has_more: bool,
    is_loading_more: bool,
    error: Option<String>,
}

impl DestinationBrowser {
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page_size,
            offset: 0,
            has_more: true,
            is_loading_more: false,
            error: None,
        }
    }

    pub fn items(&self) -> &[Destination] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Initial page load; replaces whatever is currently shown.
    pub async fn fetch_first(&mut self, api: &dyn TravelApi) {
        match api.list_destinations(self.page_size, 0).await {
            Ok(items) => {
                self.has_more = items.len() as u32 == self.page_size;
                self.items = items;
                self.offset = 0;
                self.error = None;
            }
            Err(err) => {
                warn!(%err, "failed to load destinations");
                self.error = Some(err.to_string());
            }
        }
    }

    /// Append the next page. No-op while a load is already running or when
    /// the previous page came back short.
    pub async fn load_more(&mut self, api: &dyn TravelApi) {
        if self.is_loading_more || !self.has_more {
            return;
        }
        self.is_loading_more = true;
        let next_offset = self.offset + self.page_size;
        let result = api.list_destinations(self.page_size, next_offset).await;
        self.is_loading_more = false;

        match result {
            Ok(items) => {
                self.has_more = items.len() as u32 == self.page_size;
                self.offset = next_offset;
                self.items.extend(items);
                self.error = None;
            }
            Err(err) => {
                warn!(%err, "failed to load more destinations");
                self.error = Some(err.to_string());
            }
        }
    }
}
