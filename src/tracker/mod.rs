pub mod actions;
pub mod debounce;
pub mod event;
pub mod scroll;
pub mod section;
pub mod stats;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::sink::EventSink;
use crate::viewport::ViewportProvider;

use self::actions::{InteractionKind, ViewType};
use self::debounce::Debouncer;
use self::event::{Event, EventName};
use self::scroll::ScrollState;
use self::section::{RegionRegistry, TrackedRegion};
use self::stats::EmitStats;

/// PageTracker observes one live page instance through an injected
/// viewport and emits each behaviorally significant moment exactly once
/// to the sink.
///
/// Scroll state and region latches are scoped to this instance and are
/// discarded, not pooled, on teardown.
pub struct PageTracker {
    inner: Arc<Inner>,
}

struct Inner {
    component_name: String,
    page_url: String,
    scroll_threshold: u32,
    viewport: Arc<dyn ViewportProvider>,
    sink: Arc<dyn EventSink>,
    stats: EmitStats,
    scroll: Mutex<ScrollState>,
    regions: RegionRegistry,
    debounce: Debouncer,
    loaded_at: Mutex<Instant>,
    load_fired: AtomicBool,
    unload_fired: AtomicBool,
}

impl Inner {
    fn emit(&self, event: Event) {
        self.stats.record(event.name);
        self.sink.emit(event);
    }

    /// Region-visibility pass, run only after the debounce quiet period.
    fn evaluate_sections(&self) {
        let viewport_height = self.viewport.geometry().viewport_height;

        for id in self.regions.unreported_ids() {
            let Some(bounds) = self.viewport.region_bounds(&id) else {
                continue;
            };

            if !section::spans_midline(bounds, viewport_height) {
                continue;
            }

            if let Some(region) = self.regions.mark_reported(&id) {
                debug!(section = %region.section_id, "section first visible");
                self.emit(
                    Event::new(EventName::SectionView)
                        .with("section_id", region.section_id.as_str())
                        .with("section_name", region.section_name.as_str())
                        .with("page_url", self.page_url.as_str()),
                );
            }
        }
    }

    /// Guaranteed teardown: fires exactly once, and only if load fired.
    fn emit_unload(&self) {
        if !self.load_fired.load(Ordering::SeqCst) {
            return;
        }
        if self.unload_fired.swap(true, Ordering::SeqCst) {
            return;
        }

        self.debounce.cancel();

        let elapsed_ms = self.loaded_at.lock().elapsed().as_secs_f64() * 1000.0;
        self.emit(
            Event::new(EventName::ComponentUnload)
                .with("component_name", self.component_name.as_str())
                .with("page_url", self.page_url.as_str())
                .with("time_loaded", elapsed_ms.round() as i64),
        );
    }
}

impl PageTracker {
    /// Create a tracker for one page instance. Nothing is emitted until
    /// `start` is called.
    pub fn new(
        cfg: &TrackerConfig,
        page_url: impl Into<String>,
        viewport: Arc<dyn ViewportProvider>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let regions = RegionRegistry::new(
            cfg.sections
                .iter()
                .map(|s| TrackedRegion::new(s.id.as_str(), s.name.as_deref())),
        );

        Self {
            inner: Arc::new(Inner {
                component_name: cfg.component_name.clone(),
                page_url: page_url.into(),
                scroll_threshold: cfg.scroll_threshold_percent,
                viewport,
                sink,
                stats: EmitStats::new(),
                scroll: Mutex::new(ScrollState::default()),
                regions,
                debounce: Debouncer::new(cfg.debounce_quiet),
                loaded_at: Mutex::new(Instant::now()),
                load_fired: AtomicBool::new(false),
                unload_fired: AtomicBool::new(false),
            }),
        }
    }

    /// Activate the page instance: emits `component_load` and starts
    /// the session timer. Idempotent.
    pub fn start(&self) {
        if self.inner.load_fired.swap(true, Ordering::SeqCst) {
            return;
        }

        *self.inner.loaded_at.lock() = Instant::now();

        info!(
            component = %self.inner.component_name,
            page_url = %self.inner.page_url,
            sections = self.inner.regions.len(),
            "page tracker started",
        );

        self.inner.emit(
            Event::new(EventName::ComponentLoad)
                .with("component_name", self.inner.component_name.as_str())
                .with("page_url", self.inner.page_url.as_str()),
        );
    }

    /// Tear down the page instance: emits `component_unload` with the
    /// elapsed session time. Also runs on `Drop`, so every exit path
    /// releases the session exactly once.
    pub fn stop(&self) {
        self.inner.emit_unload();
    }

    /// Feed one raw scroll signal.
    ///
    /// Threshold detection runs immediately on the raw signal; region
    /// evaluation is deferred until the quiet period passes with no
    /// further signals, so only the final scroll position is evaluated.
    pub fn on_scroll(&self) {
        if let Some(percent) = scroll::scroll_percent(self.inner.viewport.geometry()) {
            let crossed = self
                .inner
                .scroll
                .lock()
                .observe(percent, f64::from(self.inner.scroll_threshold));

            if crossed {
                debug!(threshold = self.inner.scroll_threshold, "scroll depth reached");
                self.inner.emit(
                    Event::new(EventName::Scroll)
                        .with("percent_scrolled", self.inner.scroll_threshold),
                );
            }
        }

        if !self.inner.regions.is_empty() {
            let inner = Arc::clone(&self.inner);
            self.inner.debounce.signal(move || inner.evaluate_sections());
        }
    }

    /// Deepest scroll percentage observed so far.
    pub fn max_scroll_seen(&self) -> f64 {
        self.inner.scroll.lock().max_scroll_seen
    }

    /// Read and reset the per-event emission counters.
    pub fn stats_snapshot(&self) -> Vec<(EventName, u64)> {
        self.inner.stats.snapshot()
    }

    // Stateless action pass-throughs. Deliberately unlatched: every
    // call emits.

    /// Emit a page-view for this page instance.
    pub fn track_page_view(&self, page_title: &str) {
        self.inner
            .emit(actions::page_view(&self.inner.page_url, page_title));
    }

    /// Emit a contact-channel click.
    pub fn track_whatsapp_click(&self, source: &str, phone_number: Option<&str>) {
        self.inner.emit(actions::whatsapp_click(source, phone_number));
    }

    /// Emit a content-item view.
    pub fn track_room_view(&self, room_id: &str, room_name: &str, view_type: ViewType) {
        self.inner.emit(actions::room_view(room_id, room_name, view_type));
    }

    /// Emit a date-range selection.
    pub fn track_date_selection(&self, check_in: &str, check_out: &str, nights: Option<u32>) {
        self.inner
            .emit(actions::date_selection(check_in, check_out, nights));
    }

    /// Emit a price check.
    pub fn track_price_check(&self, room_id: &str, source: &str) {
        self.inner.emit(actions::price_check(room_id, source));
    }

    /// Emit a generic section interaction.
    pub fn track_section_interaction(&self, section: &str, kind: InteractionKind) {
        self.inner.emit(actions::section_interaction(
            section,
            kind,
            &self.inner.page_url,
        ));
    }

    /// Emit a media-item click.
    pub fn track_image_click(&self, image_id: &str, gallery_name: &str) {
        self.inner
            .emit(actions::image_click(image_id, gallery_name, &self.inner.page_url));
    }

    /// Emit a media playback start.
    pub fn track_video_play(&self, video_id: &str, video_title: &str) {
        self.inner
            .emit(actions::video_play(video_id, video_title, &self.inner.page_url));
    }
}

impl Drop for PageTracker {
    fn drop(&mut self) {
        self.inner.emit_unload();
    }
}
