use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{CinescrollError, CinescrollResult};
use crate::host::ScrollConfig;

/// Media query for the user's reduced-motion preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Markup selectors and engine knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// `id` of the scroll root holding the panels.
    pub root_id: String,
    /// Class every panel carries.
    pub section_class: String,
    /// Class of the content wrapper inside a panel.
    pub content_class: String,
    /// Class of the nav list whose fragment links jump between panels.
    pub nav_list_class: String,
    /// Id of the master scroll binding.
    pub trigger_id: String,
    /// Ask the engine to draw trigger markers.
    pub debug_markers: bool,
    /// Quiet period before a resize rebuilds.
    pub resize_debounce_ms: u64,
    /// Widest viewport, in CSS pixels, treated as mobile.
    pub mobile_max_width_px: u32,
    /// Skip engine refreshes caused by mobile toolbar resizes.
    pub ignore_mobile_resize: bool,
    /// Throttle engine scroll callbacks.
    pub limit_callbacks: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            root_id: "scroll-root".to_owned(),
            section_class: "panel".to_owned(),
            content_class: "panel-content".to_owned(),
            nav_list_class: "nav-list".to_owned(),
            trigger_id: "master-scroll-timeline".to_owned(),
            debug_markers: false,
            resize_debounce_ms: 200,
            mobile_max_width_px: 900,
            ignore_mobile_resize: true,
            limit_callbacks: true,
        }
    }
}

impl StageConfig {
    /// Reject empty selectors and a zero breakpoint.
    pub fn validate(&self) -> CinescrollResult<()> {
        for (name, value) in [
            ("root_id", &self.root_id),
            ("section_class", &self.section_class),
            ("content_class", &self.content_class),
            ("nav_list_class", &self.nav_list_class),
            ("trigger_id", &self.trigger_id),
        ] {
            if value.trim().is_empty() {
                return Err(CinescrollError::config(format!("{name} must be non-empty")));
            }
        }
        if self.mobile_max_width_px == 0 {
            return Err(CinescrollError::config("mobile_max_width_px must be > 0"));
        }
        Ok(())
    }

    /// Parse a (possibly partial) config and validate it.
    pub fn from_json_str(s: &str) -> CinescrollResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> CinescrollResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Media query matching the mobile breakpoint.
    pub fn mobile_query(&self) -> String {
        format!("(max-width: {}px)", self.mobile_max_width_px)
    }

    /// [`StageConfig::resize_debounce_ms`] as a duration.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Global engine settings derived from this config.
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            markers: self.debug_markers,
            ignore_mobile_resize: self.ignore_mobile_resize,
            limit_callbacks: self.limit_callbacks,
        }
    }
}
