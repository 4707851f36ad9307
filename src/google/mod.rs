//! One-way export of closed records to Google Calendar.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::GoogleAuthenticator;
pub use client::CalendarClient;
pub use models::{EventDateTime, GoogleEvent, TokenSet};
