use dashmap::DashMap;

use crate::viewport::RegionBounds;

/// A declared page region with a one-shot reported latch.
#[derive(Debug, Clone)]
pub struct TrackedRegion {
    pub section_id: String,
    pub section_name: String,
    pub reported: bool,
}

impl TrackedRegion {
    /// Create an unreported region. The display name falls back to the
    /// id when none is declared.
    pub fn new(section_id: impl Into<String>, section_name: Option<&str>) -> Self {
        let section_id = section_id.into();
        let section_name = section_name
            .map(str::to_string)
            .unwrap_or_else(|| section_id.clone());

        Self {
            section_id,
            section_name,
            reported: false,
        }
    }
}

/// Region registry keyed by section id, holding each region's
/// `unseen -> reported` state for the lifetime of one page instance.
pub struct RegionRegistry {
    regions: DashMap<String, TrackedRegion>,
}

impl RegionRegistry {
    /// Register the declared regions, all unreported.
    pub fn new(regions: impl IntoIterator<Item = TrackedRegion>) -> Self {
        let map = DashMap::new();
        for region in regions {
            map.insert(region.section_id.clone(), region);
        }
        Self { regions: map }
    }

    /// Ids of regions not yet reported, in no particular order.
    pub fn unreported_ids(&self) -> Vec<String> {
        self.regions
            .iter()
            .filter(|entry| !entry.reported)
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Latch a region to reported. Returns the region exactly when this
    /// call is the first report; later calls return None.
    pub fn mark_reported(&self, section_id: &str) -> Option<TrackedRegion> {
        let mut entry = self.regions.get_mut(section_id)?;
        if entry.reported {
            return None;
        }
        entry.reported = true;
        Some(entry.clone())
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// A region counts as visible when its viewport-relative bounds span
/// the viewport's vertical midline.
pub fn spans_midline(bounds: RegionBounds, viewport_height: f64) -> bool {
    let midline = viewport_height * 0.5;
    bounds.top < midline && bounds.bottom > midline
}
