//! Terminal rendering of a fetched forecast.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use forecast_core::{
    DailyRepresentative, ForecastResponse, TimeBasis,
    display::{DisplaySample, SunTimes},
    grouping::forecast_days,
    icon::icon_url,
};
use serde::Serialize;

/// Everything one screen of the dashboard shows, in display units.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub location: String,
    pub current: Option<DisplaySample>,
    pub icon_url: Option<String>,
    pub hourly: Vec<DisplaySample>,
    pub sun: SunTimes,
    pub daily: Vec<DailyRow>,
}

/// One line of the multi-day list. Dates without a slot from 06:00 on are not listed.
#[derive(Debug, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub forecast: DisplaySample,
}

impl Dashboard {
    pub fn build(response: &ForecastResponse, basis: TimeBasis, days: usize) -> Self {
        let city = &response.city;
        let hourly: Vec<DisplaySample> = response
            .samples
            .iter()
            .map(|s| DisplaySample::from_sample(s, city, basis))
            .collect();

        let representatives = forecast_days(response, basis, days);
        let daily = DailyRepresentative::present(&representatives)
            .map(|(date, sample)| DailyRow {
                date,
                forecast: DisplaySample::from_sample(sample, city, basis),
            })
            .collect();

        let current = response.first().map(|s| DisplaySample::from_sample(s, city, basis));
        Self {
            location: city.display_name(),
            icon_url: current.as_ref().map(|c| icon_url(&c.icon)),
            current,
            hourly,
            sun: SunTimes::for_city(city, basis),
            daily,
        }
    }
}

fn deg(value: f64) -> String {
    // + 0.0 turns -0 into 0
    format!("{:.0}", value + 0.0)
}

fn clock(time: &DateTime<FixedOffset>) -> String {
    time.format("%-I:%M %p").to_string()
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location)?;

        let Some(now) = &self.current else {
            return writeln!(f, "No forecast data available.");
        };

        writeln!(f, "{} {}", now.time.format("%A"), now.time.format("%m-%d-%Y"))?;
        writeln!(f)?;
        writeln!(f, "  {}°C", deg(now.temperature_c))?;
        writeln!(f, "  Feels like {}°", deg(now.feels_like_c))?;
        writeln!(f, "  {}° ↓  {}° ↑", deg(now.temp_min_c), deg(now.temp_max_c))?;
        writeln!(f)?;

        for slot in &self.hourly {
            writeln!(f, "  {:>8}  {:<4} {:>4}°C", clock(&slot.time), slot.icon, deg(slot.temperature_c))?;
        }
        writeln!(f)?;

        writeln!(f, "  {} [{}]", now.description, now.icon)?;
        if let Some(url) = &self.icon_url {
            writeln!(f, "  {url}")?;
        }
        writeln!(f)?;

        writeln!(f, "  Visibility    {} km", now.visibility_km)?;
        writeln!(f, "  Humidity      {}%", now.humidity_pct)?;
        writeln!(f, "  Wind speed    {} km/h", deg(now.wind_speed_kmh))?;
        if let Some(gust) = now.wind_gust_kmh {
            writeln!(f, "  Wind gusts    {} km/h", deg(gust))?;
        }
        if let Some(direction) = now.wind_direction_deg {
            writeln!(f, "  Wind from     {direction}°")?;
        }
        if let Some(clouds) = now.cloudiness_pct {
            writeln!(f, "  Cloud cover   {clouds}%")?;
        }
        if let Some(chance) = now.precipitation_chance_pct {
            writeln!(f, "  Rain chance   {}%", deg(chance))?;
        }
        writeln!(f, "  Air pressure  {} hPa", now.pressure_hpa)?;
        writeln!(f, "  Sunrise       {}", clock(&self.sun.sunrise))?;
        writeln!(f, "  Sunset        {}", clock(&self.sun.sunset))?;
        writeln!(f)?;

        writeln!(f, "Forecast ({} days)", self.daily.len())?;
        for row in &self.daily {
            let s = &row.forecast;
            writeln!(
                f,
                "  {}  {:<4} {:>4}°C  {}° ↓ {}° ↑  {:<20} {} km  {} km/h  {}%  {} hPa",
                row.date.format("%a %m-%d"),
                s.icon,
                deg(s.temperature_c),
                deg(s.temp_min_c),
                deg(s.temp_max_c),
                s.description,
                s.visibility_km,
                deg(s.wind_speed_kmh),
                s.humidity_pct,
                s.pressure_hpa,
            )?;
        }

        Ok(())
    }
}
