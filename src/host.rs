use crate::animation::props::{Prop, PropSet};
use crate::config::REDUCED_MOTION_QUERY;
use crate::foundation::core::{NodeId, ScrollBehavior, ScrollRange, Viewport};

/// Global scroll-observer configuration applied once at init.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScrollConfig {
    /// Draw debug markers for every trigger.
    pub markers: bool,
    /// Collapse resize notifications caused by mobile address-bar show/hide.
    pub ignore_mobile_resize: bool,
    /// Throttle callbacks while scrolling.
    pub limit_callbacks: bool,
}

/// Registration request for the pinned, scrubbed master trigger.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ScrollTriggerSpec {
    /// Handle used to release the binding later.
    pub id: String,
    /// Element pinned for the whole range.
    pub trigger: NodeId,
    /// Scroll distance covered while pinned (`viewport height * scene count`).
    pub length: f64,
    /// Hold the trigger in place while the range is scrolled.
    pub pin: bool,
    /// Engine-side smoothing lag in seconds.
    pub scrub: f64,
    /// Draw debug markers.
    pub markers: bool,
}

/// Environment and animation-engine capabilities consumed by the stage.
pub trait Host {
    /// Whether the tweening/scroll-observation engine is present at all.
    fn motion_available(&self) -> bool;
    /// Current viewport size.
    fn viewport(&self) -> Viewport;
    /// `None` when media queries are unsupported.
    fn media_matches(&self, query: &str) -> Option<bool>;
    /// Apply global scroll-observer settings.
    fn configure_scroll(&mut self, config: &ScrollConfig);
    /// Set element properties immediately.
    fn apply_props(&mut self, node: NodeId, props: &PropSet);
    /// Pin `spec.trigger` and report the document scroll range it occupies.
    fn bind_scroll(&mut self, spec: &ScrollTriggerSpec) -> ScrollRange;
    /// Unpin and forget the binding called `id`.
    fn release_scroll(&mut self, id: &str);
    /// Recompute trigger geometry.
    fn refresh_scroll(&mut self);
    /// Drop any scroll positions the engine remembered.
    fn clear_scroll_memory(&mut self);
    /// Move the window to document offset `top`.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

/// Recording [`Host`] for headless runs and tests.
#[derive(Clone, Debug)]
pub struct InMemoryHost {
    /// Reported by [`Host::motion_available`].
    pub available: bool,
    /// Reported by [`Host::viewport`].
    pub viewport: Viewport,
    /// `false` simulates a host without media-query support.
    pub media_support: bool,
    /// Answer for the reduced-motion query.
    pub reduced_motion: bool,
    /// Document offset of the trigger element's top.
    pub trigger_top: f64,
    /// Last global scroll config received.
    pub config: Option<ScrollConfig>,
    /// Every property write, oldest first.
    pub applied: Vec<(NodeId, PropSet)>,
    /// Every binding request, oldest first.
    pub bindings: Vec<ScrollTriggerSpec>,
    /// Ids of released bindings.
    pub released: Vec<String>,
    /// Number of geometry refreshes.
    pub refreshes: usize,
    /// Whether scroll memory was cleared.
    pub memory_cleared: bool,
    /// Requested window scrolls.
    pub scrolls: Vec<(f64, ScrollBehavior)>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl InMemoryHost {
    /// Host with motion and media queries available at `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            available: true,
            viewport,
            media_support: true,
            reduced_motion: false,
            trigger_top: 0.0,
            config: None,
            applied: Vec::new(),
            bindings: Vec::new(),
            released: Vec::new(),
            refreshes: 0,
            memory_cleared: false,
            scrolls: Vec::new(),
        }
    }

    /// Bindings registered and not yet released.
    pub fn live_bindings(&self) -> usize {
        self.bindings.len().saturating_sub(self.released.len())
    }

    /// Latest value written for `prop` on `node`, if any.
    pub fn last_value(&self, node: NodeId, prop: &Prop) -> Option<f64> {
        self.applied
            .iter()
            .rev()
            .filter(|(n, _)| *n == node)
            .find_map(|(_, p)| p.get(prop))
    }
}

impl Host for InMemoryHost {
    fn motion_available(&self) -> bool {
        self.available
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn media_matches(&self, query: &str) -> Option<bool> {
        if !self.media_support {
            return None;
        }
        let q = query.trim();
        if q == REDUCED_MOTION_QUERY {
            return Some(self.reduced_motion);
        }
        let max_width = q
            .strip_prefix("(max-width:")
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::trim)
            .and_then(|px| px.strip_suffix("px"))
            .and_then(|px| px.trim().parse::<f64>().ok());
        max_width.map(|w| self.viewport.width <= w)
    }

    fn configure_scroll(&mut self, config: &ScrollConfig) {
        self.config = Some(config.clone());
    }

    fn apply_props(&mut self, node: NodeId, props: &PropSet) {
        self.applied.push((node, props.clone()));
    }

    fn bind_scroll(&mut self, spec: &ScrollTriggerSpec) -> ScrollRange {
        self.bindings.push(spec.clone());
        ScrollRange::new(self.trigger_top, self.trigger_top + spec.length)
    }

    fn release_scroll(&mut self, id: &str) {
        self.released.push(id.to_owned());
    }

    fn refresh_scroll(&mut self) {
        self.refreshes += 1;
    }

    fn clear_scroll_memory(&mut self) {
        self.memory_cleared = true;
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push((top, behavior));
    }
}
