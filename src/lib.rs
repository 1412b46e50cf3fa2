//! Client for the travel agency's REST API: the public booking-intake flow
//! and the admin back office (tour offers, bookings, company profile).
//!
//! The remote API is the source of truth. This crate owns only transient
//! form/list state and a persisted bearer session; every mutation except the
//! documented booking-status patch is followed by a refetch.

pub mod admin;
pub mod api;
pub mod catalog;
pub mod config;
pub mod intake;
pub mod model;
pub mod session;
