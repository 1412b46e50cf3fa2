use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{BookingRecord, CompanyInfo, Destination, TourOffer};

pub mod model;

pub use self::model::{
    build_booking_request, build_booking_update_request, build_login_request, offer_text_fields,
    BookingsPage, LoginResponse, NewBooking, OffersPage, TourOfferForm,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401. Callers clear the stored session and bounce to login.
    #[error("unauthorized")]
    Unauthorized,
    /// Any other non-2xx; `message` comes verbatim from the error body when
    /// the backend supplied one.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every REST operation the two client flows depend on. Controllers take
/// `&dyn TravelApi` so tests can drive them against a recording mock.
#[async_trait]
pub trait TravelApi: Send + Sync {
    async fn login(
        &self,
        email: &str,
        password: &str,
        recaptcha_token: &str,
    ) -> Result<LoginResponse, ApiError>;

    async fn submit_booking(&self, booking: &NewBooking) -> Result<(), ApiError>;

    async fn list_destinations(&self, limit: u32, offset: u32)
        -> Result<Vec<Destination>, ApiError>;

    async fn list_tour_offers(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<OffersPage, ApiError>;

    async fn get_tour_offer(&self, token: &str, id: i64) -> Result<TourOffer, ApiError>;

    async fn create_tour_offer(&self, token: &str, form: &TourOfferForm) -> Result<(), ApiError>;

    async fn update_tour_offer(
        &self,
        token: &str,
        id: i64,
        form: &TourOfferForm,
    ) -> Result<(), ApiError>;

    async fn delete_tour_offer(&self, token: &str, id: i64) -> Result<(), ApiError>;

    async fn list_bookings(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<BookingsPage, ApiError>;

    async fn update_booking(
        &self,
        token: &str,
        id: i64,
        booking: &BookingRecord,
    ) -> Result<(), ApiError>;

    async fn delete_booking(&self, token: &str, id: i64) -> Result<(), ApiError>;

    async fn company_info(&self, token: &str) -> Result<CompanyInfo, ApiError>;

    async fn update_company_info(
        &self,
        token: &str,
        info: &CompanyInfo,
    ) -> Result<CompanyInfo, ApiError>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self, ApiError> {
        // join() treats the last path segment as a file unless it ends in '/'.
        let mut base = cfg.api.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|_| ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            message: format!("invalid API base URL: {base}"),
        })?;
        Ok(Self::with_base_url(
            base_url,
            Duration::from_secs(cfg.api.timeout_seconds),
        ))
    }

    pub fn with_base_url(base_url: Url, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("tourdesk/0.1")
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|_| ApiError::Api {
            status: StatusCode::BAD_REQUEST,
            message: format!("invalid endpoint path: {path}"),
        })
    }

    /// Translate a non-2xx response into an `ApiError`, pulling the
    /// user-visible string out of the `{message}` error body when present.
    async fn check(res: Response) -> Result<Response, ApiError> {
        let status = res.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(%status, url = %res.url(), "request rejected; session invalid");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let url = res.url().clone();
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<model::ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            warn!(%status, %url, %message, "API error");
            return Err(ApiError::Api { status, message });
        }
        Ok(res)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let mut req = self.http.get(url).query(query);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = Self::check(req.send().await?).await?;
        Ok(res.json::<T>().await?)
    }

    async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, method = %method, "sending JSON request");
        let mut req = self.http.request(method, url).json(body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Self::check(req.send().await?).await
    }

    /// Assemble the tour-offer multipart body: namespaced text fields plus an
    /// optional binary image part.
    async fn offer_form(form: &TourOfferForm) -> Result<reqwest::multipart::Form, ApiError> {
        let mut mp = reqwest::multipart::Form::new();
        for (name, value) in offer_text_fields(form) {
            mp = mp.text(name, value);
        }
        if let Some(path) = &form.image {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("image")
                .to_string();
            let part = reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(image_content_type(path))?;
            mp = mp.part("tour_offer[image]", part);
        }
        Ok(mp)
    }

    async fn send_offer_form(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
        form: &TourOfferForm,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, method = %method, "sending tour offer form");
        let mp = Self::offer_form(form).await?;
        let res = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .multipart(mp)
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }
}

fn image_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_ascii_lowercase())
    {
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "gif" => "image/gif",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl TravelApi for ApiClient {
    async fn login(
        &self,
        email: &str,
        password: &str,
        recaptcha_token: &str,
    ) -> Result<LoginResponse, ApiError> {
        let body = build_login_request(email, password, recaptcha_token);
        let res = self
            .send_json(reqwest::Method::POST, "api/v1/admin/login", None, &body)
            .await?;
        Ok(res.json::<LoginResponse>().await?)
    }

    async fn submit_booking(&self, booking: &NewBooking) -> Result<(), ApiError> {
        let body = build_booking_request(booking);
        self.send_json(reqwest::Method::POST, "api/v1/web/bookings", None, &body)
            .await?;
        Ok(())
    }

    async fn list_destinations(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Destination>, ApiError> {
        let page: model::DestinationsPage = self
            .get_json(
                "api/v1/web/tour_offers",
                None,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(page.destinations)
    }

    async fn list_tour_offers(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<OffersPage, ApiError> {
        self.get_json(
            "api/v1/admin/tour_offers",
            Some(token),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn get_tour_offer(&self, token: &str, id: i64) -> Result<TourOffer, ApiError> {
        self.get_json(&format!("api/v1/admin/tour_offers/{id}"), Some(token), &[])
            .await
    }

    async fn create_tour_offer(&self, token: &str, form: &TourOfferForm) -> Result<(), ApiError> {
        self.send_offer_form(
            reqwest::Method::POST,
            "api/v1/admin/tour_offers",
            token,
            form,
        )
        .await
    }

    async fn update_tour_offer(
        &self,
        token: &str,
        id: i64,
        form: &TourOfferForm,
    ) -> Result<(), ApiError> {
        self.send_offer_form(
            reqwest::Method::PUT,
            &format!("api/v1/admin/tour_offers/{id}"),
            token,
            form,
        )
        .await
    }

    async fn delete_tour_offer(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/v1/admin/tour_offers/{id}"))?;
        debug!(%url, "DELETE");
        let res = self.http.delete(url).bearer_auth(token).send().await?;
        Self::check(res).await?;
        Ok(())
    }

    async fn list_bookings(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<BookingsPage, ApiError> {
        self.get_json(
            "api/v1/admin/bookings",
            Some(token),
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    async fn update_booking(
        &self,
        token: &str,
        id: i64,
        booking: &BookingRecord,
    ) -> Result<(), ApiError> {
        let body = build_booking_update_request(booking);
        self.send_json(
            reqwest::Method::PUT,
            &format!("api/v1/admin/bookings/{id}"),
            Some(token),
            &body,
        )
        .await?;
        Ok(())
    }

    async fn delete_booking(&self, token: &str, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/v1/admin/bookings/{id}"))?;
        debug!(%url, "DELETE");
        let res = self.http.delete(url).bearer_auth(token).send().await?;
        Self::check(res).await?;
        Ok(())
    }

    async fn company_info(&self, token: &str) -> Result<CompanyInfo, ApiError> {
        self.get_json("api/v1/admin/company_info", Some(token), &[])
            .await
    }

    async fn update_company_info(
        &self,
        token: &str,
        info: &CompanyInfo,
    ) -> Result<CompanyInfo, ApiError> {
        let body = serde_json::to_value(info).unwrap_or(Value::Null);
        let res = self
            .send_json(
                reqwest::Method::PUT,
                "api/v1/admin/company_info",
                Some(token),
                &body,
            )
            .await?;
        Ok(res.json::<CompanyInfo>().await?)
    }
}
