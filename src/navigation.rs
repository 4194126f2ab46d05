use crate::animation::timeline::Timeline;
use crate::dom::{Dom, Selector};
use crate::foundation::core::{NodeId, ScrollBehavior, ScrollRange};
use crate::profile::RuntimeProfile;
use crate::scene::Scene;

/// What the stage did with a click.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ClickOutcome {
    /// Not ours; default navigation proceeds.
    Ignored,
    /// Default prevented and the window scrolled.
    Jumped {
        /// Document offset scrolled to.
        top: f64,
        /// Smooth unless the profile asks for instant jumps.
        behavior: ScrollBehavior,
    },
}

impl ClickOutcome {
    /// Whether the host should cancel the browser's own anchor navigation.
    pub fn prevents_default(self) -> bool {
        matches!(self, Self::Jumped { .. })
    }
}

/// Enter-label time of `scene` as a fraction of the timeline duration.
///
/// `0` when the timeline is empty or the label is unknown.
pub fn scene_progress(timeline: &Timeline, scene: &Scene) -> f64 {
    let duration = timeline.duration();
    if duration == 0.0 {
        return 0.0;
    }
    timeline
        .label_time(&scene.labels.enter)
        .map_or(0.0, |t| t / duration)
}

/// Panel index targeted by an in-page anchor at or above `clicked`.
///
/// Only anchors inside `nav_list` count. `#` and ids that do not name one of
/// `panels` resolve to `None`.
pub fn clicked_panel(
    dom: &impl Dom,
    nav_list: NodeId,
    panels: &[NodeId],
    clicked: NodeId,
) -> Option<usize> {
    let link = dom.closest(clicked, &Selector::fragment_links())?;
    let inside_nav = std::iter::successors(Some(link), |&n| dom.parent(n)).any(|n| n == nav_list);
    if !inside_nav {
        return None;
    }
    let href = dom.attribute(link, "href")?;
    let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
    panels
        .iter()
        .position(|&panel| dom.element_id(panel).as_deref() == Some(id))
}

/// Absolute scroll offset and behaviour for jumping to `scene`.
pub fn jump_target(
    timeline: &Timeline,
    range: ScrollRange,
    scene: &Scene,
    profile: &RuntimeProfile,
) -> (f64, ScrollBehavior) {
    let top = range.offset_at(scene_progress(timeline, scene));
    let behavior = if profile.use_instant_nav_scroll {
        ScrollBehavior::Auto
    } else {
        ScrollBehavior::Smooth
    };
    (top, behavior)
}
