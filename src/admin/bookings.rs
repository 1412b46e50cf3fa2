//! Bookings administration: the paginated list with delete confirmation and
//! the two-step status change. Status changes are the one mutation that
//! patches the local row after server confirmation instead of refetching.
use tracing::warn;

use crate::api::{ApiError, TravelApi};
use crate::model::{BookingRecord, BookingStatus, PageMeta};
use crate::session::SessionStore;

use super::{session_rejected, AdminNav, Pager};

/// Pending status change shown in the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: i64,
    pub new_status: BookingStatus,
    pub old_status: BookingStatus,
    pub customer_name: String,
}

#[derive(Debug)]
pub struct BookingList {
    rows: Vec<BookingRecord>,
    meta: Option<PageMeta>,
    pager: Pager,
    is_loading: bool,
    loaded: bool,
    error: Option<String>,
    pending_delete: Option<i64>,
    pending_status: Option<StatusChange>,
}

impl BookingList {
    pub fn new(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            meta: None,
            pager: Pager::new(page_size),
            is_loading: false,
            loaded: false,
            error: None,
            pending_delete: None,
            pending_status: None,
        }
    }

    pub fn rows(&self) -> &[BookingRecord] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn show_spinner(&self) -> bool {
        self.is_loading && !self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.loaded && self.rows.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.pager.total_pages(self.meta.map(|m| m.total_count))
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn pending_status(&self) -> Option<&StatusChange> {
        self.pending_status.as_ref()
    }

    pub async fn fetch(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        let Some(token) = session.token() else {
            return AdminNav::Login;
        };
        self.is_loading = true;
        let result = api
            .list_bookings(&token, self.pager.limit, self.pager.offset)
            .await;
        self.is_loading = false;

        match result {
            Ok(page) => {
                self.rows = page.bookings;
                self.meta = page.meta;
                self.loaded = true;
                self.error = None;
                AdminNav::Stay
            }
            Err(ApiError::Unauthorized) => {
                self.rows.clear();
                self.loaded = false;
                session_rejected(session)
            }
            Err(err) => {
                warn!(%err, "failed to load bookings");
                self.error = Some(err.to_string());
                AdminNav::Stay
            }
        }
    }

    pub async fn set_page(
        &mut self,
        api: &dyn TravelApi,
        session: &SessionStore,
        page: u32,
    ) -> AdminNav {
        let total = self.meta.map(|m| m.total_count);
        let Some(offset) = self.pager.offset_for(page, total) else {
            return AdminNav::Stay;
        };
        self.pager.offset = offset;
        self.fetch(api, session).await
    }

    pub async fn next_page(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        self.set_page(api, session, self.pager.current_page() + 1)
            .await
    }

    pub async fn prev_page(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        let current = self.pager.current_page();
        if current == 1 {
            return AdminNav::Stay;
        }
        self.set_page(api, session, current - 1).await
    }

    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Same contract as the offer list: one DELETE, one refetch, confirmation
    /// closed regardless of outcome.
    pub async fn confirm_delete(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        let Some(id) = self.pending_delete else {
            return AdminNav::Stay;
        };
        if let Some(token) = session.token() {
            match api.delete_booking(&token, id).await {
                Ok(()) => {}
                Err(ApiError::Unauthorized) => session.clear(),
                Err(err) => {
                    warn!(%err, id, "failed to delete booking");
                    self.error = Some(err.to_string());
                }
            }
        }
        let nav = self.fetch(api, session).await;
        self.pending_delete = None;
        nav
    }

    /// Open the status confirmation carrying old→new and the customer name.
    /// Selecting the current status again is a no-op.
    pub fn request_status_change(&mut self, id: i64, new_status: BookingStatus) {
        let Some(row) = self.rows.iter().find(|b| b.id == id) else {
            return;
        };
        if row.status == new_status {
            return;
        }
        self.pending_status = Some(StatusChange {
            id,
            new_status,
            old_status: row.status,
            customer_name: if row.customer.full_name.is_empty() {
                "Client".to_string()
            } else {
                row.customer.full_name.clone()
            },
        });
    }

    pub fn cancel_status_change(&mut self) {
        self.pending_status = None;
    }

    /// Send the full updated record; on success patch only the targeted row.
    /// On failure the error is surfaced and the prior status stays displayed
    /// (the confirmation stays open for another attempt or a cancel).
    pub async fn confirm_status_change(
        &mut self,
        api: &dyn TravelApi,
        session: &SessionStore,
    ) -> AdminNav {
        let Some(change) = self.pending_status.clone() else {
            return AdminNav::Stay;
        };
        let Some(token) = session.token() else {
            self.pending_status = None;
            return AdminNav::Login;
        };
        let Some(row) = self.rows.iter().find(|b| b.id == change.id) else {
            self.pending_status = None;
            return AdminNav::Stay;
        };

        let mut updated = row.clone();
        updated.status = change.new_status;

        match api.update_booking(&token, change.id, &updated).await {
            Ok(()) => {
                if let Some(row) = self.rows.iter_mut().find(|b| b.id == change.id) {
                    row.status = change.new_status;
                }
                self.pending_status = None;
                self.error = None;
                AdminNav::Stay
            }
            Err(ApiError::Unauthorized) => {
                self.pending_status = None;
                session_rejected(session)
            }
            Err(err) => {
                warn!(%err, id = change.id, "failed to update booking status");
                self.error = Some(err.to_string());
                AdminNav::Stay
            }
        }
    }
}
