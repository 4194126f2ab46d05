use crate::config::{REDUCED_MOTION_QUERY, StageConfig};
use crate::foundation::core::round3;
use crate::host::Host;

/// Motion intensity tier. Reduced motion dominates a mobile viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionTier {
    /// The user asked for less motion.
    ReducedMotion,
    /// Narrow viewport.
    Mobile,
    /// Everything else.
    Desktop,
}

impl MotionTier {
    /// Pick the tier for the given media-query answers.
    pub fn classify(is_mobile_viewport: bool, prefers_reduced_motion: bool) -> Self {
        if prefers_reduced_motion {
            Self::ReducedMotion
        } else if is_mobile_viewport {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Normalized timeline units per scene phase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PhaseDurations {
    /// Enter phase.
    pub enter: f64,
    /// Dwell phase.
    pub active: f64,
    /// Exit phase, shared with the panel shift.
    pub exit: f64,
}

impl PhaseDurations {
    /// Budget one scene occupies on the master timeline.
    pub fn total(self) -> f64 {
        self.enter + self.active + self.exit
    }
}

/// Parallax travel (yPercent) for one layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayerTravel {
    /// Offset the layer enters from.
    pub enter_from_y: f64,
    /// Offset reached by the end of the dwell.
    pub active_to_y: f64,
    /// Offset the layer leaves at.
    pub exit_to_y: f64,
}

impl LayerTravel {
    fn scaled(enter_from_y: f64, active_to_y: f64, exit_to_y: f64, scale: f64) -> Self {
        Self {
            enter_from_y: round3(enter_from_y * scale),
            active_to_y: round3(active_to_y * scale),
            exit_to_y: round3(exit_to_y * scale),
        }
    }
}

/// Travel for each parallax layer; nearer layers move further.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct DepthMotion {
    /// Content wrapper.
    pub background: LayerTravel,
    /// Heading.
    pub midground: LayerTravel,
    /// Body copy.
    pub foreground: LayerTravel,
}

impl DepthMotion {
    /// Base travel multiplied by `scale`, rounded to 3 decimals.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            background: LayerTravel::scaled(1.5, -1.2, -1.8, scale),
            midground: LayerTravel::scaled(3.0, -2.4, -3.4, scale),
            foreground: LayerTravel::scaled(4.5, -3.6, -5.0, scale),
        }
    }
}

/// Environment-adaptive motion settings, rebuilt on every (re)initialisation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RuntimeProfile {
    /// The mobile breakpoint query matched.
    pub is_mobile_viewport: bool,
    /// The reduced-motion query matched.
    pub prefers_reduced_motion: bool,
    /// Nav jumps skip smooth scrolling.
    pub use_instant_nav_scroll: bool,
    /// Playhead lag behind the scroll position, in seconds.
    pub scrub: f64,
    /// Multiplier applied to parallax travel.
    pub depth_scale: f64,
    /// Per-scene phase budget.
    pub phase_duration: PhaseDurations,
    /// Scaled parallax travel.
    pub depth_motion: DepthMotion,
}

impl RuntimeProfile {
    /// Fixed settings for the tier these flags select.
    pub fn from_flags(is_mobile_viewport: bool, prefers_reduced_motion: bool) -> Self {
        let tier = MotionTier::classify(is_mobile_viewport, prefers_reduced_motion);
        let (depth_scale, scrub, phase_duration) = match tier {
            MotionTier::ReducedMotion => (
                0.45,
                0.35,
                PhaseDurations {
                    enter: 0.12,
                    active: 0.28,
                    exit: 0.12,
                },
            ),
            MotionTier::Mobile => (
                0.72,
                0.9,
                PhaseDurations {
                    enter: 0.18,
                    active: 0.52,
                    exit: 0.18,
                },
            ),
            MotionTier::Desktop => (
                1.0,
                1.2,
                PhaseDurations {
                    enter: 0.2,
                    active: 0.6,
                    exit: 0.2,
                },
            ),
        };
        Self {
            is_mobile_viewport,
            prefers_reduced_motion,
            use_instant_nav_scroll: tier != MotionTier::Desktop,
            scrub,
            depth_scale,
            phase_duration,
            depth_motion: DepthMotion::with_scale(depth_scale),
        }
    }

    /// Resolve from the host's media-query state. Unsupported queries read as
    /// "no match", which lands on the desktop tier.
    #[tracing::instrument(skip(host, config))]
    pub fn resolve(host: &impl Host, config: &StageConfig) -> Self {
        let is_mobile_viewport = host.media_matches(&config.mobile_query()).unwrap_or(false);
        let prefers_reduced_motion = host.media_matches(REDUCED_MOTION_QUERY).unwrap_or(false);
        let profile = Self::from_flags(is_mobile_viewport, prefers_reduced_motion);
        tracing::debug!(tier = ?profile.tier(), scrub = profile.scrub, "runtime profile resolved");
        profile
    }

    /// Tier these settings were derived from.
    pub fn tier(&self) -> MotionTier {
        MotionTier::classify(self.is_mobile_viewport, self.prefers_reduced_motion)
    }
}
