//! Client for the spreadsheet/calendar-backed script endpoint.

pub mod client;
pub mod models;

pub use client::RemoteClient;
pub use models::RemoteRecord;
