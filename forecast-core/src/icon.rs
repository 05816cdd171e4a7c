use chrono::{DateTime, FixedOffset, Timelike, Utc};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Resolve the day/night variant of a pictogram code from sun position.
///
/// The hour of `timestamp`, `sunrise` and `sunset` are all taken on `offset`.
/// Both ends are inclusive, so a slot starting in the sunset hour is still day.
/// If the sunrise hour is after the sunset hour no hour counts as day.
pub fn day_or_night_icon(
    icon: &str,
    timestamp: DateTime<Utc>,
    sunrise: DateTime<Utc>,
    sunset: DateTime<Utc>,
    offset: FixedOffset,
) -> String {
    let hour = timestamp.with_timezone(&offset).hour();
    let sunrise_hour = sunrise.with_timezone(&offset).hour();
    let sunset_hour = sunset.with_timezone(&offset).hour();

    let is_day = sunrise_hour <= hour && hour <= sunset_hour;
    with_variant(icon, if is_day { 'd' } else { 'n' })
}

fn with_variant(icon: &str, variant: char) -> String {
    match icon.char_indices().next_back() {
        Some((idx, _)) => {
            let mut out = String::with_capacity(idx + 1);
            out.push_str(&icon[..idx]);
            out.push(variant);
            out
        }
        None => String::new(),
    }
}

/// Pictogram image URL for an icon code.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@4x.png")
}
