//! Cinescroll turns a page of full-viewport panels into a scroll-scrubbed,
//! pinned presentation.
//!
//! # Pipeline overview
//!
//! 1. **Profile**: media-query state -> [`RuntimeProfile`] (durations, scrub, parallax scale)
//! 2. **Scenes**: panels -> [`Scene`] descriptors with layer targets and reveal choreography
//! 3. **Assemble**: scenes -> one labelled master [`Timeline`]
//! 4. **Play**: scroll offsets drive the playhead through [`Stage`], which fires phase
//!    changes, renders properties through the [`Host`] and keeps the active section in sync
//!
//! The DOM and the browser environment are traits ([`Dom`], [`Host`]), so everything runs
//! headless and deterministic. [`MemoryDom`] and [`InMemoryHost`] back the tests and the CLI.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod config;
mod debounce;
mod dom;
mod foundation;
mod host;
mod master;
mod navigation;
mod page;
mod profile;
mod reveal;
mod scene;
mod stage;
mod tracker;

pub use animation::ease::Ease;
pub use animation::props::{Lerp, Pose, Prop, PropSet, TweenVars};
pub use animation::scrub::ScrubFollower;
pub use animation::timeline::{PhaseCall, Position, Timeline, TimelineBuilder, Tween, TweenKind};
pub use config::{REDUCED_MOTION_QUERY, StageConfig};
pub use debounce::Debouncer;
pub use dom::{Dom, HEADING_TAGS, MemoryDom, PARAGRAPH_TAGS, Selector};
pub use foundation::core::{
    Affine, NodeId, ScrollBehavior, ScrollRange, Size, Vec2, Viewport, round3,
};
pub use foundation::error::{CinescrollError, CinescrollResult};
pub use host::{Host, InMemoryHost, ScrollConfig, ScrollTriggerSpec};
pub use master::{LabelTime, TimelineSummary, TweenCounts, add_scene_slot, assemble, prepare_baseline};
pub use navigation::{ClickOutcome, clicked_panel, jump_target, scene_progress};
pub use page::{NavItem, PageSpec, SectionSpec};
pub use profile::{DepthMotion, LayerTravel, MotionTier, PhaseDurations, RuntimeProfile};
pub use reveal::{
    HERO_CTA_MARKER, IntakeFlow, OPERATIONAL_PRESETS, OperationalPreset, PlanningFlow, Reveal,
    RevealItem, RevealKind, RevealPlan, ToneTrack, ensure_hero_cta, ensure_intake_flow,
    ensure_planning_flow,
};
pub use scene::{Layers, Motion, Scene, SceneLabels, ScenePhase, assign_scene_ids, build_scenes};
pub use stage::Stage;
pub use tracker::{ActiveSection, resolve_active_index};
