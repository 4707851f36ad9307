pub mod commands;
pub mod config;
pub mod error;
pub mod google;
pub mod ical;
pub mod keyring;
pub mod platform;
pub mod records;
pub mod remote;
pub mod repository;
pub mod store;
pub mod utils;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
