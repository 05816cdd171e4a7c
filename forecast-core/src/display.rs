use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::{
    convert::{kelvin_to_celsius, meters_to_kilometers, mps_to_kmh},
    icon::day_or_night_icon,
    model::{CityInfo, ForecastSample, TimeBasis},
};

/// Display-ready values for one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySample {
    pub time: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub visibility_km: f64,
    pub wind_speed_kmh: f64,
    pub wind_gust_kmh: Option<f64>,
    pub wind_direction_deg: Option<u16>,
    pub cloudiness_pct: Option<u8>,
    pub precipitation_chance_pct: Option<f64>,
    pub icon: String,
    pub description: String,
}

impl DisplaySample {
    pub fn from_sample(sample: &ForecastSample, city: &CityInfo, basis: TimeBasis) -> Self {
        let offset = basis.offset(city);

        Self {
            time: sample.timestamp.with_timezone(&offset),
            temperature_c: kelvin_to_celsius(sample.temperature),
            feels_like_c: kelvin_to_celsius(sample.feels_like),
            temp_min_c: kelvin_to_celsius(sample.temp_min),
            temp_max_c: kelvin_to_celsius(sample.temp_max),
            humidity_pct: sample.humidity,
            pressure_hpa: sample.pressure,
            visibility_km: meters_to_kilometers(f64::from(sample.visibility)),
            wind_speed_kmh: mps_to_kmh(sample.wind_speed),
            wind_gust_kmh: sample.wind_gust.map(mps_to_kmh),
            wind_direction_deg: sample.wind_direction,
            cloudiness_pct: sample.cloudiness,
            precipitation_chance_pct: sample.precipitation_probability.map(|p| (p * 100.0).round()),
            icon: day_or_night_icon(
                &sample.condition_icon,
                sample.timestamp,
                city.sunrise,
                city.sunset,
                offset,
            ),
            description: sample.condition_description.clone(),
        }
    }
}

/// Sunrise and sunset on the same clock as the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunTimes {
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
}

impl SunTimes {
    pub fn for_city(city: &CityInfo, basis: TimeBasis) -> Self {
        let offset = basis.offset(city);
        Self {
            sunrise: city.sunrise.with_timezone(&offset),
            sunset: city.sunset.with_timezone(&offset),
        }
    }
}
