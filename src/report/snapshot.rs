use serde::{Deserialize, Serialize};

/// One immutable bundle of aggregate analytics counts for a date range.
///
/// Every numeric field defaults to 0 and every sequence to empty when
/// absent, so a minimally-shaped snapshot always deserializes; only a
/// wholly malformed body fails, upstream in the source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSnapshot {
    pub overview: Overview,
    pub conversions: Conversions,
    pub devices: Vec<DeviceRow>,
    pub geographic: Vec<GeoRow>,
    pub traffic_sources: Vec<TrafficSourceRow>,
    pub rooms: Vec<RoomRow>,
}

/// Site-wide totals with prior-period trend deltas.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Overview {
    pub total_visits: u64,
    pub new_users: u64,
    /// Seconds.
    pub avg_session_duration: f64,
    pub bounce_rate: f64,
    pub engagement_rate: f64,
    pub conversion_rate: f64,
    pub trends: Trends,
}

/// Prior-period percentage deltas, already computed upstream. Absent
/// metrics stay None and classify as neutral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trends {
    pub total_visits: Option<f64>,
    pub new_users: Option<f64>,
    pub avg_session_duration: Option<f64>,
    pub bounce_rate: Option<f64>,
    pub engagement_rate: Option<f64>,
    pub conversion_rate: Option<f64>,
}

/// Ordered funnel counts. Usually monotonically non-increasing, but
/// real data may violate that; the derivation must not reject it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversions {
    pub room_views: u64,
    pub date_selections: u64,
    pub price_checks: u64,
    pub whatsapp_clicks: u64,
}

/// Per-device-category session counts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceRow {
    pub device: String,
    pub sessions: u64,
    pub users: u64,
    pub bounce_rate: f64,
}

/// One geographic origin, ordered by the snapshot producer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeoRow {
    pub country: String,
    pub city: String,
    pub users: u64,
    pub sessions: u64,
}

/// One traffic source, ordered by the snapshot producer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrafficSourceRow {
    pub source: String,
    pub medium: String,
    pub sessions: u64,
    pub users: u64,
}

/// Per-room engagement counts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomRow {
    #[serde(alias = "path")]
    pub room_slug: String,
    pub views: u64,
    /// Seconds; may be absent upstream.
    pub avg_duration: Option<f64>,
    pub bounce_rate: f64,
}
