mod common;

use chrono::NaiveDate;
use common::{
    empty_bookings_page, logged_in_session, logged_out_session, server_error, Call, RecordingApi,
};
use tourdesk::admin::{AdminNav, BookingList, CompanyForm, OfferList};
use tourdesk::api::{ApiError, BookingsPage, OffersPage};
use tourdesk::model::{
    BookingRecord, BookingStatus, CompanyInfo, Customer, PageMeta, TourOffer,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn offer(id: i64, title: &str) -> TourOffer {
    TourOffer {
        id,
        title: title.to_string(),
        hotel: "Hotel Astra".to_string(),
        price: 120_000,
        description: "Sea view".to_string(),
        start_date: date(2025, 6, 1),
        end_date: date(2025, 6, 8),
        image_url: None,
    }
}

fn booking(id: i64, name: &str, status: BookingStatus) -> BookingRecord {
    BookingRecord {
        id,
        customer: Customer {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_ascii_lowercase()),
            phone: "+79990001122".to_string(),
        },
        description: "Sochi".to_string(),
        date_start: date(2025, 1, 10),
        date_end: date(2025, 1, 20),
        budget: Some(250_000),
        adult_count: 2,
        children_count: 1,
        children_ages: vec![7],
        status,
    }
}

fn offers_page(rows: Vec<TourOffer>, total: u64) -> OffersPage {
    OffersPage {
        tour_offers: rows,
        meta: Some(PageMeta { total_count: total }),
    }
}

fn bookings_page(rows: Vec<BookingRecord>) -> BookingsPage {
    BookingsPage {
        bookings: rows,
        meta: None,
    }
}

#[tokio::test]
async fn missing_token_redirects_without_a_request() {
    let api = RecordingApi::new();
    let (_td, session) = logged_out_session();
    let mut list = OfferList::new(12);

    assert_eq!(list.fetch(&api, &session).await, AdminNav::Login);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn unauthorized_fetch_clears_session_and_redirects() {
    let api = RecordingApi::new();
    api.offers_results
        .lock()
        .unwrap()
        .push_back(Err(ApiError::Unauthorized));
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);

    assert_eq!(list.fetch(&api, &session).await, AdminNav::Login);
    assert!(session.token().is_none());
    assert!(list.rows().is_empty());
}

#[tokio::test]
async fn failed_refetch_keeps_prior_rows_visible() {
    let api = RecordingApi::new();
    api.offers_results
        .lock()
        .unwrap()
        .push_back(Ok(offers_page(vec![offer(1, "A"), offer(2, "B")], 2)));
    api.offers_results
        .lock()
        .unwrap()
        .push_back(Err(server_error("boom")));
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);

    assert_eq!(list.fetch(&api, &session).await, AdminNav::Stay);
    assert_eq!(list.rows().len(), 2);

    assert_eq!(list.fetch(&api, &session).await, AdminNav::Stay);
    assert_eq!(list.error(), Some("boom"));
    assert_eq!(list.rows().len(), 2);
    assert!(!list.show_spinner());
}

#[tokio::test]
async fn empty_page_is_an_explicit_no_records_state() {
    let api = RecordingApi::new();
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);

    assert!(!list.is_empty());
    list.fetch(&api, &session).await;
    assert!(list.is_empty());
}

#[tokio::test]
async fn confirm_delete_sends_one_delete_then_one_refetch() {
    let api = RecordingApi::new();
    api.offers_results
        .lock()
        .unwrap()
        .push_back(Ok(offers_page(vec![offer(5, "Doomed")], 1)));
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);
    list.fetch(&api, &session).await;

    list.request_delete(5);
    assert_eq!(list.pending_delete(), Some(5));
    assert_eq!(list.confirm_delete(&api, &session).await, AdminNav::Stay);

    let calls = api.calls();
    assert_eq!(
        calls,
        vec![
            Call::ListOffers {
                limit: 12,
                offset: 0
            },
            Call::DeleteOffer(5),
            Call::ListOffers {
                limit: 12,
                offset: 0
            },
        ]
    );
    assert_eq!(list.pending_delete(), None);
}

#[tokio::test]
async fn failed_delete_surfaces_error_but_still_refetches_and_closes() {
    let api = RecordingApi::new();
    api.delete_results
        .lock()
        .unwrap()
        .push_back(Err(server_error("cannot delete")));
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);
    list.fetch(&api, &session).await;

    list.request_delete(9);
    assert_eq!(list.confirm_delete(&api, &session).await, AdminNav::Stay);

    let calls = api.calls();
    let deletes = calls
        .iter()
        .filter(|c| matches!(c, Call::DeleteOffer(_)))
        .count();
    let lists = calls
        .iter()
        .filter(|c| matches!(c, Call::ListOffers { .. }))
        .count();
    assert_eq!(deletes, 1);
    // Initial fetch plus the post-delete refetch.
    assert_eq!(lists, 2);
    assert_eq!(list.error(), Some("cannot delete"));
    assert_eq!(list.pending_delete(), None);
}

#[tokio::test]
async fn unauthorized_delete_redirects_without_a_refetch_request() {
    let api = RecordingApi::new();
    api.delete_results
        .lock()
        .unwrap()
        .push_back(Err(ApiError::Unauthorized));
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);
    list.fetch(&api, &session).await;

    list.request_delete(3);
    assert_eq!(list.confirm_delete(&api, &session).await, AdminNav::Login);
    assert!(session.token().is_none());
    assert_eq!(list.pending_delete(), None);
    // One initial list, one delete; the refetch saw the cleared session and
    // never reached the network.
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListOffers { .. }))
            .count(),
        1
    );
}

#[tokio::test]
async fn out_of_range_pages_are_noops() {
    let api = RecordingApi::new();
    api.offers_results
        .lock()
        .unwrap()
        .push_back(Ok(offers_page(vec![offer(1, "A")], 24)));
    let (_td, session) = logged_in_session();
    let mut list = OfferList::new(12);
    list.fetch(&api, &session).await;
    assert_eq!(list.total_pages(), Some(2));

    // Page 3 of 2 and page 0 both stay put without a request.
    assert_eq!(list.set_page(&api, &session, 3).await, AdminNav::Stay);
    assert_eq!(list.set_page(&api, &session, 0).await, AdminNav::Stay);
    assert_eq!(list.prev_page(&api, &session).await, AdminNav::Stay);
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListOffers { .. }))
            .count(),
        1
    );

    assert_eq!(list.next_page(&api, &session).await, AdminNav::Stay);
    assert_eq!(list.current_page(), 2);
    assert!(api.calls().contains(&Call::ListOffers {
        limit: 12,
        offset: 12
    }));
}

#[tokio::test]
async fn status_change_patches_only_the_target_row() {
    let api = RecordingApi::new();
    api.bookings_results
        .lock()
        .unwrap()
        .push_back(Ok(bookings_page(vec![
            booking(1, "Anna", BookingStatus::Pending),
            booking(2, "Boris", BookingStatus::Confirmed),
        ])));
    let (_td, session) = logged_in_session();
    let mut list = BookingList::new(12);
    list.fetch(&api, &session).await;
    let untouched_before = list.rows()[1].clone();

    list.request_status_change(1, BookingStatus::Confirmed);
    let change = list.pending_status().unwrap();
    assert_eq!(change.old_status, BookingStatus::Pending);
    assert_eq!(change.new_status, BookingStatus::Confirmed);
    assert_eq!(change.customer_name, "Anna");

    assert_eq!(
        list.confirm_status_change(&api, &session).await,
        AdminNav::Stay
    );

    // The update carried the full record with the new status.
    let sent = api
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::UpdateBooking(id, rec) => Some((id, rec)),
            _ => None,
        })
        .unwrap();
    assert_eq!(sent.0, 1);
    assert_eq!(sent.1.status, BookingStatus::Confirmed);
    assert_eq!(sent.1.customer.full_name, "Anna");

    // Local patch, no refetch: exactly the initial list request.
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListBookings { .. }))
            .count(),
        1
    );
    assert_eq!(list.rows()[0].status, BookingStatus::Confirmed);
    assert_eq!(list.rows()[1], untouched_before);
    assert!(list.pending_status().is_none());
}

#[tokio::test]
async fn failed_status_change_leaves_prior_status_displayed() {
    let api = RecordingApi::new();
    api.bookings_results
        .lock()
        .unwrap()
        .push_back(Ok(bookings_page(vec![booking(
            1,
            "Anna",
            BookingStatus::Pending,
        )])));
    api.update_booking_results
        .lock()
        .unwrap()
        .push_back(Err(server_error("update refused")));
    let (_td, session) = logged_in_session();
    let mut list = BookingList::new(12);
    list.fetch(&api, &session).await;

    list.request_status_change(1, BookingStatus::Cancelled);
    assert_eq!(
        list.confirm_status_change(&api, &session).await,
        AdminNav::Stay
    );

    assert_eq!(list.rows()[0].status, BookingStatus::Pending);
    assert_eq!(list.error(), Some("update refused"));
    // The confirmation stays open for a retry or cancel.
    assert!(list.pending_status().is_some());
}

#[tokio::test]
async fn selecting_the_current_status_is_a_noop() {
    let api = RecordingApi::new();
    api.bookings_results
        .lock()
        .unwrap()
        .push_back(Ok(bookings_page(vec![booking(
            1,
            "Anna",
            BookingStatus::Pending,
        )])));
    let (_td, session) = logged_in_session();
    let mut list = BookingList::new(12);
    list.fetch(&api, &session).await;

    list.request_status_change(1, BookingStatus::Pending);
    assert!(list.pending_status().is_none());
}

#[tokio::test]
async fn booking_delete_follows_the_same_contract() {
    let api = RecordingApi::new();
    api.bookings_results
        .lock()
        .unwrap()
        .push_back(Ok(bookings_page(vec![booking(
            4,
            "Anna",
            BookingStatus::Pending,
        )])));
    api.bookings_results
        .lock()
        .unwrap()
        .push_back(Ok(empty_bookings_page()));
    let (_td, session) = logged_in_session();
    let mut list = BookingList::new(12);
    list.fetch(&api, &session).await;

    list.request_delete(4);
    assert_eq!(list.confirm_delete(&api, &session).await, AdminNav::Stay);
    assert!(list.is_empty());
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| matches!(c, Call::DeleteBooking(4)))
            .count(),
        1
    );
}

#[tokio::test]
async fn company_first_fill_counts_required_fields_as_changes() {
    let api = RecordingApi::new();
    let (_td, session) = logged_in_session();
    let mut form = CompanyForm::new();

    assert!(!form.has_changes());
    form.fields_mut().description = "Family-run agency".to_string();
    form.fields_mut().address = "12 Seaside st".to_string();
    form.fields_mut().phone = "+79990001122".to_string();
    assert!(!form.has_changes());
    form.fields_mut().email = "hello@agency.ru".to_string();
    assert!(form.has_changes());

    assert_eq!(form.save(&api, &session).await, AdminNav::Stay);
    assert!(form.success().is_some());
    assert!(!form.has_changes());
}

#[tokio::test]
async fn company_reset_restores_the_server_copy() {
    let api = RecordingApi::new();
    let original = CompanyInfo {
        description: "Agency".to_string(),
        address: "Old street 1".to_string(),
        phone: "+7".to_string(),
        email: "old@agency.ru".to_string(),
        ..CompanyInfo::default()
    };
    api.company_results
        .lock()
        .unwrap()
        .push_back(Ok(original.clone()));
    let (_td, session) = logged_in_session();
    let mut form = CompanyForm::new();
    form.fetch(&api, &session).await;

    form.fields_mut().address = "New street 2".to_string();
    assert!(form.has_changes());
    form.reset();
    assert!(!form.has_changes());
    assert_eq!(form.fields(), &original);
}

#[tokio::test]
async fn company_save_failure_keeps_edits() {
    let api = RecordingApi::new();
    api.company_results
        .lock()
        .unwrap()
        .push_back(Ok(CompanyInfo::default()));
    api.company_results
        .lock()
        .unwrap()
        .push_back(Err(server_error("save refused")));
    let (_td, session) = logged_in_session();
    let mut form = CompanyForm::new();
    form.fetch(&api, &session).await;

    form.fields_mut().description = "Edited".to_string();
    assert_eq!(form.save(&api, &session).await, AdminNav::Stay);
    assert_eq!(form.error(), Some("save refused"));
    assert_eq!(form.fields().description, "Edited");
    assert!(form.has_changes());
}
