//! Booking-intake form state machine: traveler contact info, destination,
//! date range, adult/children counters with per-child ages, budget bracket.
//! Validated locally, submitted once, success/error surfaced as an
//! auto-hiding banner.
use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tokio::time::{Duration, Instant};
use tracing::warn;

use crate::api::{NewBooking, TravelApi};
use crate::model::{BudgetBracket, Customer};

pub const MIN_ADULTS: u8 = 1;
pub const MAX_ADULTS: u8 = 10;
pub const MAX_CHILDREN: u8 = 6;
pub const MIN_CHILD_AGE: u8 = 1;
pub const MAX_CHILD_AGE: u8 = 17;

/// Banners disappear on their own after this long; a newer banner always
/// supersedes the previous deadline.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9()\s\-]{5,20}$").expect("valid phone regex"));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address does not look valid")]
    InvalidEmail,
    #[error("phone number does not look valid")]
    InvalidPhone,
    #[error("both travel dates are required")]
    MissingDates,
    #[error("the start date cannot be in the past")]
    StartInPast,
    #[error("the end date cannot be before the start date")]
    DatesOutOfOrder,
    #[error("a budget bracket is required")]
    MissingBudget,
    #[error("an age is required for every child")]
    MissingChildAges,
}

/// Everything the visitor has typed so far. Client-only and transient:
/// reset after a successful submit, dropped on teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub adults: u8,
    pub children: u8,
    /// Always exactly `children` entries; `None` marks a slot the visitor has
    /// not picked yet.
    pub children_ages: Vec<Option<u8>>,
    pub budget: Option<BudgetBracket>,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            destination: String::new(),
            start_date: None,
            end_date: None,
            adults: 2,
            children: 0,
            children_ages: Vec::new(),
            budget: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Request accepted by the backend; form reset to its initial state.
    Accepted,
    /// Request issued and failed; form contents preserved for a retry.
    Failed,
    /// Local validation stopped the submit; no request was issued.
    Invalid(ValidationError),
    /// A submit is already in flight; this call was a no-op.
    AlreadyInFlight,
}

#[derive(Debug)]
pub struct BookingForm {
    draft: BookingDraft,
    is_submitting: bool,
    banner: Option<Banner>,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self {
            draft: BookingDraft::default(),
            is_submitting: false,
            banner: None,
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Current banner, if any and not yet past its auto-hide deadline.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner
            .as_ref()
            .filter(|b| Instant::now() < b.expires_at)
    }

    pub fn set_name(&mut self, value: &str) {
        self.draft.name = value.to_string();
    }

    pub fn set_phone(&mut self, value: &str) {
        self.draft.phone = value.to_string();
    }

    pub fn set_email(&mut self, value: &str) {
        self.draft.email = value.to_string();
    }

    pub fn set_destination(&mut self, value: &str) {
        self.draft.destination = value.to_string();
    }

    pub fn set_budget(&mut self, bracket: BudgetBracket) {
        self.draft.budget = Some(bracket);
    }

    /// Setting a start date past the current end date clears the end date;
    /// the visitor has to pick a new one.
    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.draft.start_date = Some(date);
        if matches!(self.draft.end_date, Some(end) if date > end) {
            self.draft.end_date = None;
        }
    }

    /// An end date before the start date is silently rejected, leaving the
    /// previous value in place. Not surfaced as an error.
    pub fn set_end_date(&mut self, date: NaiveDate) {
        if matches!(self.draft.start_date, Some(start) if date < start) {
            return;
        }
        self.draft.end_date = Some(date);
    }

    pub fn adjust_adults(&mut self, delta: i32) {
        let next = (i32::from(self.draft.adults) + delta)
            .clamp(i32::from(MIN_ADULTS), i32::from(MAX_ADULTS));
        self.draft.adults = next as u8;
    }

    /// Growing the count appends empty age slots; shrinking truncates the age
    /// sequence from the tail. Ages below the surviving count are untouched.
    pub fn adjust_children(&mut self, delta: i32) {
        let next = (i32::from(self.draft.children) + delta).clamp(0, i32::from(MAX_CHILDREN));
        self.draft.children = next as u8;
        self.draft.children_ages.resize(next as usize, None);
    }

    /// Panics on an out-of-range index: the UI only renders one selector per
    /// existing slot, so a bad index is a programming error.
    pub fn set_child_age(&mut self, index: usize, age: u8) {
        debug_assert!((MIN_CHILD_AGE..=MAX_CHILD_AGE).contains(&age));
        self.draft.children_ages[index] = Some(age);
    }

    /// Check the draft and package it into the wire-ready booking. Returns
    /// the first violation found.
    pub fn validate(&self) -> Result<NewBooking, ValidationError> {
        let d = &self.draft;
        if d.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if d.phone.trim().is_empty() {
            return Err(ValidationError::MissingField("phone"));
        }
        if !PHONE_RE.is_match(d.phone.trim()) {
            return Err(ValidationError::InvalidPhone);
        }
        if d.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if !EMAIL_RE.is_match(d.email.trim()) {
            return Err(ValidationError::InvalidEmail);
        }
        if d.destination.trim().is_empty() {
            return Err(ValidationError::MissingField("destination"));
        }
        let (start, end) = match (d.start_date, d.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ValidationError::MissingDates),
        };
        if start < Local::now().date_naive() {
            return Err(ValidationError::StartInPast);
        }
        if end < start {
            return Err(ValidationError::DatesOutOfOrder);
        }
        let budget = d.budget.ok_or(ValidationError::MissingBudget)?;
        if d.children_ages.iter().any(|age| age.is_none()) {
            return Err(ValidationError::MissingChildAges);
        }

        Ok(NewBooking {
            customer: Customer {
                full_name: d.name.trim().to_string(),
                email: d.email.trim().to_string(),
                phone: d.phone.trim().to_string(),
            },
            description: d.destination.trim().to_string(),
            date_start: start,
            date_end: end,
            budget: budget.amount(),
            adult_count: u32::from(d.adults),
            children_count: u32::from(d.children),
            // Unfilled slots were rejected above; the filter is a safety net.
            children_ages: d.children_ages.iter().filter_map(|a| *a).collect(),
        })
    }

    /// Submit the draft. A second call while one is in flight is a no-op.
    pub async fn submit(&mut self, api: &dyn TravelApi) -> SubmitOutcome {
        if self.is_submitting {
            return SubmitOutcome::AlreadyInFlight;
        }
        let booking = match self.validate() {
            Ok(b) => b,
            Err(err) => return SubmitOutcome::Invalid(err),
        };

        self.is_submitting = true;
        let result = api.submit_booking(&booking).await;
        self.is_submitting = false;

        match result {
            Ok(()) => {
                self.draft = BookingDraft::default();
                self.show_banner(
                    BannerKind::Success,
                    "Request sent. We will contact you shortly.",
                );
                SubmitOutcome::Accepted
            }
            Err(err) => {
                warn!(%err, "booking submit failed");
                self.show_banner(BannerKind::Error, &err.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    fn show_banner(&mut self, kind: BannerKind, message: &str) {
        self.banner = Some(Banner {
            kind,
            message: message.to_string(),
            expires_at: Instant::now() + BANNER_TTL,
        });
    }
}
