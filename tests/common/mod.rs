#![allow(dead_code)]
//! Recording `TravelApi` double shared by the integration tests: every call
//! is logged, responses are scripted per endpoint and fall back to benign
//! defaults.
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use tourdesk::api::{
    ApiError, BookingsPage, LoginResponse, NewBooking, OffersPage, TourOfferForm, TravelApi,
};
use tourdesk::model::{BookingRecord, CompanyInfo, Destination, TourOffer};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login,
    SubmitBooking(NewBooking),
    ListDestinations { limit: u32, offset: u32 },
    ListOffers { limit: u32, offset: u32 },
    GetOffer(i64),
    CreateOffer,
    UpdateOffer(i64),
    DeleteOffer(i64),
    ListBookings { limit: u32, offset: u32 },
    UpdateBooking(i64, BookingRecord),
    DeleteBooking(i64),
    GetCompany,
    UpdateCompany(CompanyInfo),
}

#[derive(Default)]
pub struct RecordingApi {
    pub calls: Mutex<Vec<Call>>,
    pub submit_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub destination_results: Mutex<VecDeque<Result<Vec<Destination>, ApiError>>>,
    pub offers_results: Mutex<VecDeque<Result<OffersPage, ApiError>>>,
    pub offer_results: Mutex<VecDeque<Result<TourOffer, ApiError>>>,
    pub save_offer_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub delete_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub bookings_results: Mutex<VecDeque<Result<BookingsPage, ApiError>>>,
    pub update_booking_results: Mutex<VecDeque<Result<(), ApiError>>>,
    pub company_results: Mutex<VecDeque<Result<CompanyInfo, ApiError>>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn pop<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>, default: T) -> Result<T, ApiError> {
        queue.lock().unwrap().pop_front().unwrap_or(Ok(default))
    }
}

pub fn server_error(message: &str) -> ApiError {
    ApiError::Api {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
    }
}

pub fn empty_offers_page() -> OffersPage {
    OffersPage {
        tour_offers: Vec::new(),
        meta: None,
    }
}

pub fn empty_bookings_page() -> BookingsPage {
    BookingsPage {
        bookings: Vec::new(),
        meta: None,
    }
}

#[async_trait]
impl TravelApi for RecordingApi {
    async fn login(
        &self,
        _email: &str,
        _password: &str,
        _recaptcha_token: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.record(Call::Login);
        Ok(LoginResponse {
            token: "test-token".to_string(),
        })
    }

    async fn submit_booking(&self, booking: &NewBooking) -> Result<(), ApiError> {
        self.record(Call::SubmitBooking(booking.clone()));
        Self::pop(&self.submit_results, ())
    }

    async fn list_destinations(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Destination>, ApiError> {
        self.record(Call::ListDestinations { limit, offset });
        Self::pop(&self.destination_results, Vec::new())
    }

    async fn list_tour_offers(
        &self,
        _token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<OffersPage, ApiError> {
        self.record(Call::ListOffers { limit, offset });
        Self::pop(&self.offers_results, empty_offers_page())
    }

    async fn get_tour_offer(&self, _token: &str, id: i64) -> Result<TourOffer, ApiError> {
        self.record(Call::GetOffer(id));
        self.offer_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(server_error("offer not scripted")))
    }

    async fn create_tour_offer(&self, _token: &str, _form: &TourOfferForm) -> Result<(), ApiError> {
        self.record(Call::CreateOffer);
        Self::pop(&self.save_offer_results, ())
    }

    async fn update_tour_offer(
        &self,
        _token: &str,
        id: i64,
        _form: &TourOfferForm,
    ) -> Result<(), ApiError> {
        self.record(Call::UpdateOffer(id));
        Self::pop(&self.save_offer_results, ())
    }

    async fn delete_tour_offer(&self, _token: &str, id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteOffer(id));
        Self::pop(&self.delete_results, ())
    }

    async fn list_bookings(
        &self,
        _token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<BookingsPage, ApiError> {
        self.record(Call::ListBookings { limit, offset });
        Self::pop(&self.bookings_results, empty_bookings_page())
    }

    async fn update_booking(
        &self,
        _token: &str,
        id: i64,
        booking: &BookingRecord,
    ) -> Result<(), ApiError> {
        self.record(Call::UpdateBooking(id, booking.clone()));
        Self::pop(&self.update_booking_results, ())
    }

    async fn delete_booking(&self, _token: &str, id: i64) -> Result<(), ApiError> {
        self.record(Call::DeleteBooking(id));
        Self::pop(&self.delete_results, ())
    }

    async fn company_info(&self, _token: &str) -> Result<CompanyInfo, ApiError> {
        self.record(Call::GetCompany);
        Self::pop(&self.company_results, CompanyInfo::default())
    }

    async fn update_company_info(
        &self,
        _token: &str,
        info: &CompanyInfo,
    ) -> Result<CompanyInfo, ApiError> {
        self.record(Call::UpdateCompany(info.clone()));
        Self::pop(&self.company_results, info.clone())
    }
}

/// Session store backed by a temp dir, pre-loaded with a valid token.
pub fn logged_in_session() -> (tempfile::TempDir, tourdesk::session::SessionStore) {
    let td = tempfile::tempdir().unwrap();
    let store = tourdesk::session::SessionStore::new(td.path());
    store.save("test-token").unwrap();
    (td, store)
}

/// Session store backed by a temp dir with no token.
pub fn logged_out_session() -> (tempfile::TempDir, tourdesk::session::SessionStore) {
    let td = tempfile::tempdir().unwrap();
    let store = tourdesk::session::SessionStore::new(td.path());
    (td, store)
}
