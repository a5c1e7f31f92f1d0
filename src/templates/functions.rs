//! Custom functions registered with every template set.

use chrono::{DateTime, TimeZone, Utc};
use minijinja::{Environment, Error, ErrorKind};

const HUMAN_DATE_FORMAT: &str = "%d %b %Y at %H:%M";

/// Register the function registry on a template environment
pub fn register(env: &mut Environment<'static>) {
    env.add_filter("human_date", human_date_filter);
}

/// Format a timestamp for display, e.g. `17 Mar 2022 at 10:15`
///
/// The output is always in UTC, so two timestamps for the same instant render
/// identically whatever zone they carry. An unset timestamp renders as an
/// empty string.
pub fn human_date<Tz: TimeZone>(t: Option<&DateTime<Tz>>) -> String {
    match t {
        Some(t) => t.with_timezone(&Utc).format(HUMAN_DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

/// `{{ snippet.created | human_date }}`
///
/// Timestamps reach the templates as RFC 3339 strings.
fn human_date_filter(value: Option<String>) -> Result<String, Error> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(String::new());
    };

    let parsed = DateTime::parse_from_rfc3339(&value).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("human_date: cannot parse {:?}: {}", value, e),
        )
    })?;

    Ok(human_date(Some(&parsed)))
}
