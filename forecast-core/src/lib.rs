//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The forecast provider abstraction and its OpenWeather implementation
//! - Grouping of 3-hour samples into calendar days
//! - Unit conversions and day/night icon resolution
//!
//! The pipeline runs one way: fetch a [`ForecastResponse`], group it with
//! [`grouping::forecast_days`], and turn samples into [`display::DisplaySample`]s.

pub mod config;
pub mod convert;
pub mod display;
pub mod error;
pub mod grouping;
pub mod icon;
pub mod model;
pub mod provider;
pub mod session;

pub use config::{Config, ProviderConfig};
pub use error::FetchError;
pub use model::{
    CityInfo, DailyRepresentative, ForecastRequest, ForecastResponse, ForecastSample, TimeBasis,
};
pub use provider::{ForecastProvider, ProviderId};
pub use session::ForecastSession;
