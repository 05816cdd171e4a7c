use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Provider-side upper bound on the number of 3-hour samples per request.
pub const MAX_SAMPLE_COUNT: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub place: String,
    pub count: u32,
}

impl ForecastRequest {
    pub fn new(place: impl Into<String>, count: u32) -> Self {
        Self { place: place.into(), count }
    }

    /// Sample count clamped to what the provider accepts.
    pub fn bounded_count(&self) -> u32 {
        self.count.clamp(1, MAX_SAMPLE_COUNT)
    }
}

/// One 3-hour forecast slot as reported by the provider.
///
/// Raw units: kelvin for temperatures, m/s for wind, meters for visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub visibility: u32,
    pub wind_speed: f64,
    pub wind_gust: Option<f64>,
    pub wind_direction: Option<u16>,
    pub cloudiness: Option<u8>,
    pub precipitation_probability: Option<f64>,
    /// Pictogram code such as `"10d"`; the last character is the day/night flag.
    pub condition_icon: String,
    pub condition_description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub timezone: FixedOffset,
}

impl CityInfo {
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Result of a single successful fetch. Samples are in ascending time order.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResponse {
    pub samples: Vec<ForecastSample>,
    pub city: CityInfo,
}

impl ForecastResponse {
    /// The sample describing current conditions.
    pub fn first(&self) -> Option<&ForecastSample> {
        self.samples.first()
    }
}

/// The sample chosen to summarize one calendar date.
///
/// `sample` is `None` when no slot on that date starts at 06:00 or later.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRepresentative {
    pub date: NaiveDate,
    pub sample: Option<ForecastSample>,
}

impl DailyRepresentative {
    /// Iterate only the dates that actually have a representative.
    pub fn present(days: &[DailyRepresentative]) -> impl Iterator<Item = (NaiveDate, &ForecastSample)> {
        days.iter().filter_map(|d| d.sample.as_ref().map(|s| (d.date, s)))
    }
}

/// Which clock the "local" hour and date derivations run on.
///
/// Defaults to the queried city's own offset so sunrise, sunset and sample
/// hours line up with the location's daylight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    Utc,
    #[default]
    City,
}

impl TimeBasis {
    pub fn offset(self, city: &CityInfo) -> FixedOffset {
        match self {
            TimeBasis::Utc => Utc.fix(),
            TimeBasis::City => city.timezone,
        }
    }
}
