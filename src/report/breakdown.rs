use serde::Serialize;

use super::snapshot::{DeviceRow, GeoRow, RoomRow, TrafficSourceRow};

/// Geographic rows surfaced to presentation.
pub const GEO_TOP_N: usize = 10;

/// Traffic-source rows surfaced to presentation.
pub const SOURCE_TOP_N: usize = 8;

/// One device's share of total sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceShare {
    pub device: String,
    pub sessions: u64,
    pub users: u64,
    pub bounce_rate: f64,
    /// Share of all sessions, rounded to one decimal. 0 when the
    /// snapshot has no sessions at all.
    pub percentage: f64,
}

/// Per-device session shares, preserving snapshot order.
pub fn device_breakdown(devices: &[DeviceRow]) -> Vec<DeviceShare> {
    let total: u64 = devices.iter().map(|d| d.sessions).sum();

    devices
        .iter()
        .map(|d| DeviceShare {
            device: d.device.clone(),
            sessions: d.sessions,
            users: d.users,
            bounce_rate: d.bounce_rate,
            percentage: if total == 0 {
                0.0
            } else {
                round1(d.sessions as f64 / total as f64 * 100.0)
            },
        })
        .collect()
}

/// Leading geographic rows in snapshot order. The producer owns the
/// ordering; this never re-sorts.
pub fn top_countries(geographic: &[GeoRow]) -> Vec<GeoRow> {
    geographic.iter().take(GEO_TOP_N).cloned().collect()
}

/// Leading traffic-source rows in snapshot order.
pub fn top_sources(traffic_sources: &[TrafficSourceRow]) -> Vec<TrafficSourceRow> {
    traffic_sources.iter().take(SOURCE_TOP_N).cloned().collect()
}

/// Room leaderboard sort keys. Only `views` is implemented; an
/// unrecognized key leaves snapshot order unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSort {
    Views,
}

impl RoomSort {
    /// Parse a sort key label.
    pub fn from_str(key: &str) -> Option<Self> {
        match key {
            "views" => Some(Self::Views),
            _ => None,
        }
    }
}

/// One room's derived leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomPerformance {
    pub room_slug: String,
    pub views: u64,
    pub avg_time_minutes: u64,
    pub bounce_rate: f64,
}

/// Derive the room leaderboard, sorted per the requested key.
pub fn room_leaderboard(rooms: &[RoomRow], sort_key: &str) -> Vec<RoomPerformance> {
    let mut rows: Vec<RoomPerformance> = rooms
        .iter()
        .map(|r| RoomPerformance {
            room_slug: r.room_slug.clone(),
            views: r.views,
            avg_time_minutes: avg_time_minutes(r.avg_duration),
            bounce_rate: r.bounce_rate,
        })
        .collect();

    match RoomSort::from_str(sort_key) {
        Some(RoomSort::Views) => rows.sort_by(|a, b| b.views.cmp(&a.views)),
        None => {}
    }

    rows
}

/// Average dwell in whole minutes; 0 for missing or non-finite input.
fn avg_time_minutes(avg_duration: Option<f64>) -> u64 {
    match avg_duration {
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => (seconds / 60.0).round() as u64,
        _ => 0,
    }
}

/// Sign classification of an upstream trend delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improvement,
    Regression,
    Neutral,
}

/// A classified, display-ready trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendIndicator {
    pub direction: TrendDirection,
    /// Absolute delta formatted to one decimal.
    pub magnitude: String,
}

/// Classify a percentage delta: positive improves, negative regresses,
/// zero or absent is neutral.
pub fn classify_trend(delta: Option<f64>) -> TrendIndicator {
    match delta {
        Some(d) if d.is_finite() && d > 0.0 => TrendIndicator {
            direction: TrendDirection::Improvement,
            magnitude: format!("{:.1}", d),
        },
        Some(d) if d.is_finite() && d < 0.0 => TrendIndicator {
            direction: TrendDirection::Regression,
            magnitude: format!("{:.1}", d.abs()),
        },
        _ => TrendIndicator {
            direction: TrendDirection::Neutral,
            magnitude: "0.0".to_string(),
        },
    }
}

/// Round to one decimal place.
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(device: &str, sessions: u64) -> DeviceRow {
        DeviceRow {
            device: device.to_string(),
            sessions,
            users: 0,
            bounce_rate: 0.0,
        }
    }

    #[test]
    fn test_device_breakdown_reference_example() {
        let shares = device_breakdown(&[device("mobile", 70), device("desktop", 30)]);
        assert_eq!(shares[0].percentage, 70.0);
        assert_eq!(shares[1].percentage, 30.0);
        // Input order preserved.
        assert_eq!(shares[0].device, "mobile");
    }

    #[test]
    fn test_device_breakdown_zero_total() {
        let shares = device_breakdown(&[device("mobile", 0), device("desktop", 0)]);
        assert!(shares.iter().all(|s| s.percentage == 0.0));
    }

    #[test]
    fn test_device_percentages_sum_within_tolerance() {
        let rows = [
            device("mobile", 333),
            device("desktop", 333),
            device("tablet", 334),
        ];
        let shares = device_breakdown(&rows);
        let sum: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1 * shares.len() as f64, "sum={sum}");
    }

    #[test]
    fn test_top_n_truncates_preserving_order() {
        let geographic: Vec<GeoRow> = (0..15)
            .map(|i| GeoRow {
                country: format!("country-{i}"),
                ..GeoRow::default()
            })
            .collect();

        let top = top_countries(&geographic);
        assert_eq!(top.len(), GEO_TOP_N);
        assert_eq!(top[0].country, "country-0");
        assert_eq!(top[9].country, "country-9");

        let traffic_sources: Vec<TrafficSourceRow> = (0..12)
            .map(|i| TrafficSourceRow {
                source: format!("source-{i}"),
                ..TrafficSourceRow::default()
            })
            .collect();

        let top = top_sources(&traffic_sources);
        assert_eq!(top.len(), SOURCE_TOP_N);
        assert_eq!(top[7].source, "source-7");
    }

    #[test]
    fn test_top_n_short_input_passes_through() {
        let geographic = vec![GeoRow::default(); 3];
        assert_eq!(top_countries(&geographic).len(), 3);
    }

    fn room(slug: &str, views: u64, avg_duration: Option<f64>) -> RoomRow {
        RoomRow {
            room_slug: slug.to_string(),
            views,
            avg_duration,
            bounce_rate: 0.0,
        }
    }

    #[test]
    fn test_leaderboard_sorts_by_views_descending() {
        let rows = room_leaderboard(
            &[room("a", 5, None), room("b", 50, None), room("c", 20, None)],
            "views",
        );
        let slugs: Vec<&str> = rows.iter().map(|r| r.room_slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_leaderboard_unknown_key_keeps_order() {
        let rows = room_leaderboard(
            &[room("a", 5, None), room("b", 50, None)],
            "bounce_rate",
        );
        let slugs: Vec<&str> = rows.iter().map(|r| r.room_slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
    }

    #[test]
    fn test_avg_time_minutes_reference_example() {
        assert_eq!(avg_time_minutes(Some(125.0)), 2);
        assert_eq!(avg_time_minutes(None), 0);
        assert_eq!(avg_time_minutes(Some(f64::NAN)), 0);
        assert_eq!(avg_time_minutes(Some(29.0)), 0);
        assert_eq!(avg_time_minutes(Some(30.0)), 1);
    }

    #[test]
    fn test_trend_classification() {
        let up = classify_trend(Some(12.34));
        assert_eq!(up.direction, TrendDirection::Improvement);
        assert_eq!(up.magnitude, "12.3");

        let down = classify_trend(Some(-7.89));
        assert_eq!(down.direction, TrendDirection::Regression);
        assert_eq!(down.magnitude, "7.9");

        assert_eq!(classify_trend(Some(0.0)).direction, TrendDirection::Neutral);
        assert_eq!(classify_trend(None).direction, TrendDirection::Neutral);
        assert_eq!(
            classify_trend(Some(f64::NAN)).direction,
            TrendDirection::Neutral
        );
    }
}
