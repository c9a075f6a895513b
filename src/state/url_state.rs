//! URL query parameters for shareable views.
//!
//! `?lat=..&lon=..` centers the globe, `labels=1` turns on country names and
//! `topology=<url>` points the loader at another dataset. Keys and values
//! are percent-decoded, with `+` read as a space.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub labels: Option<bool>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub topology: Option<String>,
}

/// Parses a query string such as `?lat=40&lon=-100&labels=1`.
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = decode_component(kv.next().unwrap_or(""));
        let value = decode_component(kv.next().unwrap_or(""));
        match key.as_ref() {
            "labels" => params.labels = parse_flag(&value),
            "lat" => params.lat = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "lon" => params.lon = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "topology" if !value.is_empty() => params.topology = Some(value.into_owned()),
            _ => {}
        }
    }

    params
}

/// Decodes one `application/x-www-form-urlencoded` component. Invalid UTF-8
/// is replaced rather than rejected.
fn decode_component(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['%', '+']) {
        return Cow::Borrowed(raw);
    }
    let spaced = raw.replace('+', " ");
    Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" | "" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let search = web_sys::window().and_then(|w| w.location().search().ok());
    match search {
        Some(search) => parse_query(&search),
        None => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}
