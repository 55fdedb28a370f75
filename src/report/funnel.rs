use serde::Serialize;

use super::snapshot::Conversions;

/// One derived conversion-funnel step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelStep {
    pub name: String,
    pub value: u64,
    /// Share of the first step, in percent.
    pub percentage: f64,
    /// Drop-off to the next step, in percent. None on the final step.
    /// Negative when the count grows downstream; real data can do that
    /// and the derivation does not clamp it.
    pub dropoff: Option<f64>,
}

/// Derive ordered funnel steps from (name, count) definitions.
///
/// The reference maximum is the first step's count. When it is 0 every
/// percentage is 0; no division ever sees a zero denominator, so the
/// output never carries NaN or infinities.
pub fn derive_funnel(steps: &[(&str, u64)]) -> Vec<FunnelStep> {
    let max = steps.first().map_or(0, |&(_, value)| value);

    steps
        .iter()
        .enumerate()
        .map(|(i, &(name, value))| {
            let percentage = if max == 0 {
                0.0
            } else {
                value as f64 / max as f64 * 100.0
            };

            let dropoff = steps.get(i + 1).map(|&(_, next)| {
                if value == 0 {
                    0.0
                } else {
                    (value as f64 - next as f64) / value as f64 * 100.0
                }
            });

            FunnelStep {
                name: name.to_string(),
                value,
                percentage,
                dropoff,
            }
        })
        .collect()
}

/// The site's canonical four-step conversion funnel.
pub fn conversion_funnel(conversions: &Conversions) -> Vec<FunnelStep> {
    derive_funnel(&[
        ("Room Views", conversions.room_views),
        ("Date Selections", conversions.date_selections),
        ("Price Checks", conversions.price_checks),
        ("WhatsApp Clicks", conversions.whatsapp_clicks),
    ])
}
