use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::model::{BookingRecord, Customer};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Admin tour-offer page. The backend has shipped both `tour_offers` and
/// `data` as the list key; accept either.
#[derive(Debug, Clone, Deserialize)]
pub struct OffersPage {
    #[serde(alias = "data")]
    pub tour_offers: Vec<crate::model::TourOffer>,
    #[serde(default)]
    pub meta: Option<crate::model::PageMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingsPage {
    #[serde(alias = "data")]
    pub bookings: Vec<BookingRecord>,
    #[serde(default)]
    pub meta: Option<crate::model::PageMeta>,
}

/// Public catalog page; same key drift as the admin list.
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationsPage {
    #[serde(alias = "data", alias = "tour_offers")]
    pub destinations: Vec<crate::model::Destination>,
}

/// Fully validated booking ready for the wire, produced by the intake form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub customer: Customer,
    pub description: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub budget: u64,
    pub adult_count: u32,
    pub children_count: u32,
    pub children_ages: Vec<u8>,
}

/// Editable tour-offer fields; `image` is optional on update.
#[derive(Debug, Clone, PartialEq)]
pub struct TourOfferForm {
    pub title: String,
    pub hotel: String,
    pub price: i64,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub image: Option<PathBuf>,
}

pub fn build_login_request(email: &str, password: &str, recaptcha_token: &str) -> Value {
    json!({
        "email": email,
        "password": password,
        "recaptcha_token": recaptcha_token,
    })
}

pub fn build_booking_request(booking: &NewBooking) -> Value {
    json!({
        "customer": {
            "full_name": booking.customer.full_name,
            "phone": booking.customer.phone,
            "email": booking.customer.email,
        },
        "booking": {
            "description": booking.description,
            "date_start": booking.date_start.format("%Y-%m-%d").to_string(),
            "date_end": booking.date_end.format("%Y-%m-%d").to_string(),
            "budget": booking.budget,
            "adult_count": booking.adult_count,
            "children_count": booking.children_count,
            "children_ages": booking.children_ages,
            "status": "pending",
        },
    })
}

/// Status updates send the full record back, not a partial patch.
pub fn build_booking_update_request(booking: &BookingRecord) -> Value {
    json!({ "booking": booking })
}

/// Namespaced text fields for the tour-offer multipart form. The image part
/// is attached separately since it needs file I/O.
pub fn offer_text_fields(form: &TourOfferForm) -> Vec<(&'static str, String)> {
    vec![
        ("tour_offer[title]", form.title.clone()),
        ("tour_offer[hotel]", form.hotel.clone()),
        ("tour_offer[price]", form.price.to_string()),
        ("tour_offer[description]", form.description.clone()),
        (
            "tour_offer[start_date]",
            form.start_date.format("%Y-%m-%d").to_string(),
        ),
        (
            "tour_offer[end_date]",
            form.end_date.format("%Y-%m-%d").to_string(),
        ),
    ]
}
