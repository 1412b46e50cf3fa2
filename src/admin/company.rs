//! Company-profile form: fetch, edit, change detection against the last
//! server copy, save with a short-lived success notice.
use tokio::time::{Duration, Instant};
use tracing::warn;

use crate::api::{ApiError, TravelApi};
use crate::model::CompanyInfo;
use crate::session::SessionStore;

use super::{session_rejected, AdminNav};

/// Success notices disappear faster than the intake banners.
pub const SUCCESS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug)]
struct Notice {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct CompanyForm {
    fields: CompanyInfo,
    original: Option<CompanyInfo>,
    is_saving: bool,
    error: Option<String>,
    success: Option<Notice>,
}

impl CompanyForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &CompanyInfo {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut CompanyInfo {
        &mut self.fields
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|n| Instant::now() < n.expires_at)
            .map(|n| n.message.as_str())
    }

    /// Anything to save? Before the first server copy arrives this means
    /// "the required fields are filled in"; afterwards, any drift from it.
    pub fn has_changes(&self) -> bool {
        match &self.original {
            None => {
                !self.fields.description.is_empty()
                    && !self.fields.address.is_empty()
                    && !self.fields.phone.is_empty()
                    && !self.fields.email.is_empty()
            }
            Some(original) => self.fields != *original,
        }
    }

    /// Discard edits, restoring the last server copy.
    pub fn reset(&mut self) {
        if let Some(original) = &self.original {
            self.fields = original.clone();
        }
        self.error = None;
        self.success = None;
    }

    pub async fn fetch(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        let Some(token) = session.token() else {
            return AdminNav::Login;
        };
        match api.company_info(&token).await {
            Ok(info) => {
                self.fields = info.clone();
                self.original = Some(info);
                self.error = None;
                AdminNav::Stay
            }
            Err(ApiError::Unauthorized) => session_rejected(session),
            Err(err) => {
                warn!(%err, "failed to load company info");
                self.error = Some(err.to_string());
                AdminNav::Stay
            }
        }
    }

    /// Save the edited profile. Re-entrant calls while one is in flight are
    /// no-ops; a failure keeps the edits for another try.
    pub async fn save(&mut self, api: &dyn TravelApi, session: &SessionStore) -> AdminNav {
        if self.is_saving {
            return AdminNav::Stay;
        }
        let Some(token) = session.token() else {
            return AdminNav::Login;
        };

        self.is_saving = true;
        self.error = None;
        self.success = None;
        let result = api.update_company_info(&token, &self.fields).await;
        self.is_saving = false;

        match result {
            Ok(saved) => {
                self.fields = saved.clone();
                self.original = Some(saved);
                self.success = Some(Notice {
                    message: "Company info updated.".to_string(),
                    expires_at: Instant::now() + SUCCESS_TTL,
                });
                AdminNav::Stay
            }
            Err(ApiError::Unauthorized) => session_rejected(session),
            Err(err) => {
                warn!(%err, "failed to update company info");
                self.error = Some(err.to_string());
                AdminNav::Stay
            }
        }
    }
}
