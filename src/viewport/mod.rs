use std::collections::HashMap;

use parking_lot::Mutex;

/// Page geometry at one instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageGeometry {
    /// Vertical scroll offset in pixels.
    pub scroll_y: f64,
    /// Height of the visible viewport in pixels.
    pub viewport_height: f64,
    /// Total height of the document in pixels.
    pub document_height: f64,
}

/// Viewport-relative vertical bounds of a tracked region, as a bounding
/// rect reports them: negative `top` means the region starts above the
/// visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBounds {
    pub top: f64,
    pub bottom: f64,
}

/// Injected geometry capability. The tracker never touches ambient
/// window state directly; everything it needs about the rendering
/// surface comes through this trait.
pub trait ViewportProvider: Send + Sync {
    /// Current page geometry.
    fn geometry(&self) -> PageGeometry;

    /// Viewport-relative bounds of a tracked region, or None when the
    /// region is not laid out.
    fn region_bounds(&self, section_id: &str) -> Option<RegionBounds>;
}

/// In-memory viewport with scriptable scroll position and region layout.
/// Regions are placed in document coordinates; their viewport-relative
/// bounds shift as the scroll offset moves, the way a real bounding rect
/// would.
pub struct SimulatedViewport {
    geometry: Mutex<PageGeometry>,
    regions: Mutex<HashMap<String, (f64, f64)>>,
}

impl SimulatedViewport {
    /// Create a viewport with the given dimensions, scrolled to the top.
    pub fn new(viewport_height: f64, document_height: f64) -> Self {
        Self {
            geometry: Mutex::new(PageGeometry {
                scroll_y: 0.0,
                viewport_height,
                document_height,
            }),
            regions: Mutex::new(HashMap::new()),
        }
    }

    /// Move the scroll offset.
    pub fn set_scroll_y(&self, scroll_y: f64) {
        self.geometry.lock().scroll_y = scroll_y;
    }

    /// Change the document height (e.g. after a reflow).
    pub fn set_document_height(&self, document_height: f64) {
        self.geometry.lock().document_height = document_height;
    }

    /// Lay out a region at a document-space offset with the given height.
    pub fn place_region(&self, section_id: &str, doc_top: f64, height: f64) {
        self.regions
            .lock()
            .insert(section_id.to_string(), (doc_top, doc_top + height));
    }
}

impl ViewportProvider for SimulatedViewport {
    fn geometry(&self) -> PageGeometry {
        *self.geometry.lock()
    }

    fn region_bounds(&self, section_id: &str) -> Option<RegionBounds> {
        let scroll_y = self.geometry.lock().scroll_y;
        self.regions
            .lock()
            .get(section_id)
            .map(|&(doc_top, doc_bottom)| RegionBounds {
                top: doc_top - scroll_y,
                bottom: doc_bottom - scroll_y,
            })
    }
}
