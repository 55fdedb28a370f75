pub mod breakdown;
pub mod format;
pub mod funnel;
pub mod snapshot;

use serde::Serialize;

use self::breakdown::{
    classify_trend, device_breakdown, room_leaderboard, top_countries, top_sources, DeviceShare,
    RoomPerformance, TrendIndicator,
};
use self::format::format_count;
use self::funnel::{conversion_funnel, FunnelStep};
use self::snapshot::{AnalyticsSnapshot, GeoRow, TrafficSourceRow};

/// Default leaderboard ordering.
const ROOM_SORT: &str = "views";

/// Formatted KPI headline values with classified trends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSummary {
    pub total_visits: String,
    pub new_users: String,
    pub room_views: String,
    pub whatsapp_clicks: String,
    /// Raw upstream rate with a percent sign.
    pub conversion_rate: String,
    pub avg_session_seconds: u64,
    pub bounce_rate_percent: u64,
    pub engagement_rate_percent: u64,
    pub trends: OverviewTrends,
}

/// Classified trend per overview metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewTrends {
    pub total_visits: TrendIndicator,
    pub new_users: TrendIndicator,
    pub avg_session_duration: TrendIndicator,
    pub bounce_rate: TrendIndicator,
    pub engagement_rate: TrendIndicator,
    pub conversion_rate: TrendIndicator,
}

/// Presentation-ready views derived from one snapshot. Plain data, no
/// behavior attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedViews {
    pub overview: OverviewSummary,
    pub funnel: Vec<FunnelStep>,
    pub devices: Vec<DeviceShare>,
    pub top_countries: Vec<GeoRow>,
    pub top_sources: Vec<TrafficSourceRow>,
    pub rooms: Vec<RoomPerformance>,
}

/// Pure, synchronous transformation of one snapshot into every derived
/// view. Stateless per call; the same snapshot always yields the same
/// views, and the input is never mutated.
pub fn derive_views(snapshot: &AnalyticsSnapshot) -> DerivedViews {
    DerivedViews {
        overview: overview_summary(snapshot),
        funnel: conversion_funnel(&snapshot.conversions),
        devices: device_breakdown(&snapshot.devices),
        top_countries: top_countries(&snapshot.geographic),
        top_sources: top_sources(&snapshot.traffic_sources),
        rooms: room_leaderboard(&snapshot.rooms, ROOM_SORT),
    }
}

fn overview_summary(snapshot: &AnalyticsSnapshot) -> OverviewSummary {
    let overview = &snapshot.overview;
    let trends = &overview.trends;

    OverviewSummary {
        total_visits: format_count(overview.total_visits),
        new_users: format_count(overview.new_users),
        room_views: format_count(snapshot.conversions.room_views),
        whatsapp_clicks: format_count(snapshot.conversions.whatsapp_clicks),
        conversion_rate: format!("{}%", overview.conversion_rate),
        avg_session_seconds: round_nonneg(overview.avg_session_duration),
        bounce_rate_percent: round_nonneg(overview.bounce_rate),
        engagement_rate_percent: round_nonneg(overview.engagement_rate),
        trends: OverviewTrends {
            total_visits: classify_trend(trends.total_visits),
            new_users: classify_trend(trends.new_users),
            avg_session_duration: classify_trend(trends.avg_session_duration),
            bounce_rate: classify_trend(trends.bounce_rate),
            engagement_rate: classify_trend(trends.engagement_rate),
            conversion_rate: classify_trend(trends.conversion_rate),
        },
    }
}

/// Round to a whole non-negative integer; non-finite input counts as 0.
fn round_nonneg(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}
