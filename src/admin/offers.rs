//! Tour-offer administration: the paginated list with delete confirmation,
//! and the single-offer editor behind the list rows.
use tracing::warn;

use crate::api::{ApiError, TourOfferForm, TravelApi};
use crate::model::{PageMeta, TourOffer};
use crate::session::SessionStore;

use super::{session_rejected, AdminNav, Pager};

#[derive(Debug)]
pub struct OfferList {
    rows: Vec<TourOffer>,
    meta: Option<PageMeta>,
    pager: Pager,
    is_loading: bool,
    loaded: bool,
    error: Option<String>,
    pending_delete: Option<i64>,
}

impl OfferList {
    pub fn new(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            meta: None,
            pager: Pager::new(page_size),
            is_loading: false,
            loaded: false,
            error: None,
            pending_delete: None,
        }
    }

    pub fn rows(&self) -> &[TourOffer] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True only for the initial fetch; later refetches keep the current
    /// table visible instead of blanking it.
    pub fn show_spinner(&self) -> bool {
        self.is_loading && !self.loaded
    }

    /// The list has loaded and the server really has no records (as opposed
    /// to "not fetched yet").
    pub fn is_empty(&self) -> bool {
        self.loaded && self.rows.is_empty()
    }

    pub fn current_page(&self) -> u32 {
        self.pager.current_page()
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.pager.total_pages(self.meta.map(|m| m.total_count))
    }

    pub fn total_count(&self) -> Option<u64> {
        self.meta.map(|m| m.total_count)
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Fetch the current page. Redirects to login without a request when no
    /// token is stored; clears the session on a 401.
    pub async fn fetch(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        let Some(token) = session.token() else {
            return AdminNav::Login;
        };
        self.is_loading = true;
        let result = api
            .list_tour_offers(&token, self.pager.limit, self.pager.offset)
            .await;
        self.is_loading = false;

        match result {
            Ok(page) => {
                self.rows = page.tour_offers;
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
                warn!(%err, "failed to load tour offers");
                self.error = Some(err.to_string());
                AdminNav::Stay
            }
        }
    }

    /// Jump to an explicit page. Out-of-range targets are no-ops.
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

    /// Open the delete confirmation for one row; nothing is sent yet.
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// One DELETE, then unconditionally one refetch of the current page; the
    /// confirmation closes whatever happened. A failed delete surfaces an
    /// error and the intent is dropped, not retried.
    pub async fn confirm_delete(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        let Some(id) = self.pending_delete else {
            return AdminNav::Stay;
        };
        if let Some(token) = session.token() {
            match api.delete_tour_offer(&token, id).await {
                Ok(()) => {}
                Err(ApiError::Unauthorized) => session.clear(),
                Err(err) => {
                    warn!(%err, id, "failed to delete tour offer");
                    self.error = Some(err.to_string());
                }
            }
        }
        // The refetch short-circuits to the login redirect when the session
        // is gone.
        let nav = self.fetch(api, session).await;
        self.pending_delete = None;
        nav
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    RedirectLogin,
    Failed(String),
}

/// Single tour offer: read view with an edit-in-place toggle. Saving an edit
/// reloads the offer from the server rather than trusting the local copy.
#[derive(Debug, Default)]
pub struct OfferEditor {
    offer: Option<TourOffer>,
    is_editing: bool,
    error: Option<String>,
}

impl OfferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offer(&self) -> Option<&TourOffer> {
        self.offer.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(
        &mut self,
        api: &dyn TravelApi,
        session: &SessionStore,
        id: i64,
    ) -> AdminNav {
        let Some(token) = session.token() else {
            return AdminNav::Login;
        };
        match api.get_tour_offer(&token, id).await {
            Ok(offer) => {
                self.offer = Some(offer);
                self.error = None;
                AdminNav::Stay
            }
            Err(ApiError::Unauthorized) => session_rejected(session),
            Err(err) => {
                self.error = Some(err.to_string());
                AdminNav::Stay
            }
        }
    }

    pub fn begin_edit(&mut self) {
        self.is_editing = true;
    }

    pub fn cancel_edit(&mut self) {
        self.is_editing = false;
    }

    /// Save the edit form for the loaded offer, then reload it.
    pub async fn save(
        &mut self,
        api: &dyn TravelApi,
        session: &SessionStore,
        form: &TourOfferForm,
    ) -> SaveOutcome {
        let Some(id) = self.offer.as_ref().map(|o| o.id) else {
            return SaveOutcome::Failed("no offer loaded".to_string());
        };
        let Some(token) = session.token() else {
            return SaveOutcome::RedirectLogin;
        };
        match api.update_tour_offer(&token, id, form).await {
            Ok(()) => {}
            Err(ApiError::Unauthorized) => {
                session.clear();
                return SaveOutcome::RedirectLogin;
            }
            Err(err) => {
                warn!(%err, id, "failed to update tour offer");
                self.error = Some(err.to_string());
                return SaveOutcome::Failed(err.to_string());
            }
        }
        if let AdminNav::Login = self.load(api, session, id).await {
            return SaveOutcome::RedirectLogin;
        }
        self.is_editing = false;
        SaveOutcome::Saved
    }
}

/// Create a new offer from the "new" form.
pub async fn create_offer(
    api: &dyn TravelApi,
    session: &SessionStore,
    form: &TourOfferForm,
) -> SaveOutcome {
    let Some(token) = session.token() else {
        return SaveOutcome::RedirectLogin;
    };
    match api.create_tour_offer(&token, form).await {
        Ok(()) => SaveOutcome::Saved,
        Err(ApiError::Unauthorized) => {
            session.clear();
            SaveOutcome::RedirectLogin
        }
        Err(err) => {
            warn!(%err, "failed to create tour offer");
            SaveOutcome::Failed(err.to_string())
        }
    }
}
