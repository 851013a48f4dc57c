//! Event records as served by the backend API
//!
//! The backend owns these shapes; we deserialize leniently (missing strings
//! become empty) and pass them through unchanged.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single event listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Event {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub performers: String,
    pub venue: String,
    pub address: String,
    /// ISO date (`2021-05-14`) or full timestamp, as stored by the backend
    pub date: String,
    pub time: String,
    pub description: String,
    pub image: Option<Image>,
}

/// Uploaded image with its resized variants
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Image {
    pub url: Option<String>,
    pub formats: ImageFormats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageFormats {
    pub thumbnail: Option<ImageFormat>,
    pub small: Option<ImageFormat>,
    pub medium: Option<ImageFormat>,
    pub large: Option<ImageFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageFormat {
    pub url: String,
}

impl Event {
    /// Preview URL shown on the dashboard and edit page
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .and_then(|img| img.formats.thumbnail.as_ref())
            .map(|f| f.url.as_str())
    }

    /// Largest available rendition, for the detail page
    pub fn display_image_url(&self) -> Option<&str> {
        let image = self.image.as_ref()?;
        let formats = &image.formats;
        formats
            .medium
            .as_ref()
            .or(formats.small.as_ref())
            .or(formats.thumbnail.as_ref())
            .map(|f| f.url.as_str())
            .or(image.url.as_deref())
    }

    /// Date as `m/d/yyyy`, or the raw value when it doesn't parse
    pub fn display_date(&self) -> String {
        match parse_event_date(&self.date) {
            Some(date) => date.format("%-m/%-d/%Y").to_string(),
            None => self.date.clone(),
        }
    }
}

/// Parse a backend date that may be a plain date or an RFC 3339 timestamp
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
