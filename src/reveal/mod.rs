//! Panel-specific reveal choreography.
//!
//! Each factory turns a panel's content container into a [`RevealPlan`]: a
//! tone track of CSS custom properties driven on the panel element and a list
//! of per-element items with their from-state and per-phase destinations.
//! Factories that need extra structure (hero CTA, intake flow, planning board)
//! create it on first use and find it again by marker attribute afterwards.

mod hero;
mod intake;
mod lists;
mod operational;
mod planning;

pub use hero::{HERO_CTA_MARKER, ensure_hero_cta};
pub use intake::{IntakeFlow, ensure_intake_flow};
pub use operational::{OPERATIONAL_PRESETS, OperationalPreset};
pub use planning::{PlanningFlow, ensure_planning_flow};

use crate::animation::ease::Ease;
use crate::animation::props::{Prop, PropSet, TweenVars};
use crate::dom::{Dom, HEADING_TAGS, PARAGRAPH_TAGS, Selector};
use crate::foundation::core::NodeId;
use crate::profile::PhaseDurations;

/// Which choreography a panel gets. Chosen once from the scene id.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", content = "preset", rename_all = "kebab-case")]
pub enum RevealKind {
    /// Title, copy and call to action rise in.
    Hero,
    /// Problem list items stagger in.
    Problems,
    /// Activation list items stagger in.
    Activation,
    /// Request, processing and card steps play in order.
    Intake,
    /// Pieces fly from the source card into timeline slots.
    Planning,
    /// Shared operational layout with a named preset.
    Operational(&'static str),
}

impl RevealKind {
    /// Kind for a known scene id; `None` leaves the scene on plain motion.
    pub fn for_scene_id(id: &str) -> Option<Self> {
        match id {
            "hero" => Some(Self::Hero),
            "problems" => Some(Self::Problems),
            "ai-activation" => Some(Self::Activation),
            "intake" => Some(Self::Intake),
            "planning" => Some(Self::Planning),
            "parts" | "communication" | "command-center" | "transformation" | "cta" => {
                Some(Self::Operational(OperationalPreset::for_scene(id).name))
            }
            _ => None,
        }
    }
}

/// Custom-property track driven on the panel element.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneTrack {
    /// Values set when the scene starts entering.
    pub from: PropSet,
    /// Enter destination.
    pub enter: TweenVars,
    /// Dwell destination.
    pub active: TweenVars,
    /// Exit destination.
    pub exit: TweenVars,
}

impl ToneTrack {
    /// Build from `(name, [from, enter, active, exit])` rows.
    pub fn new(rows: &[(&str, [f64; 4])], phases: PhaseDurations) -> Self {
        let column = |c: usize| -> PropSet {
            rows.iter()
                .map(|(name, v)| (Prop::Var((*name).to_owned()), v[c]))
                .collect()
        };
        Self {
            from: column(0),
            enter: TweenVars::new(column(1), phases.enter, Ease::InOutSine),
            active: TweenVars::new(column(2), phases.active, Ease::Linear),
            exit: TweenVars::new(column(3), phases.exit, Ease::InOutSine),
        }
    }
}

/// One revealed element.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealItem {
    /// Element being revealed.
    pub target: NodeId,
    /// Hidden starting state.
    pub from: PropSet,
    /// Enter destination.
    pub enter: TweenVars,
    /// Delay after the previously inserted tween's start.
    pub enter_offset: f64,
    /// Dwell destination, if the item moves while active.
    pub active: Option<TweenVars>,
    /// Exit destination, if the item leaves on its own.
    pub exit: Option<TweenVars>,
}

/// Tone track plus items for one panel.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealPlan {
    /// Custom properties on the panel element.
    pub tone: ToneTrack,
    /// Elements in insertion order.
    pub items: Vec<RevealItem>,
}

/// A panel's chosen choreography and its plan.
#[derive(Clone, Debug, PartialEq)]
pub struct Reveal {
    /// Which factory produced the plan.
    pub kind: RevealKind,
    /// Tweens to insert for the scene.
    pub plan: RevealPlan,
}

impl Reveal {
    /// Run the factory for `kind` against `content`, creating missing markup.
    pub fn build(
        kind: RevealKind,
        dom: &mut impl Dom,
        content: NodeId,
        phases: PhaseDurations,
    ) -> Self {
        let plan = match kind {
            RevealKind::Hero => hero::plan(dom, content, phases),
            RevealKind::Problems => lists::problems(dom, content, phases),
            RevealKind::Activation => lists::activation(dom, content, phases),
            RevealKind::Intake => intake::plan(dom, content, phases),
            RevealKind::Planning => planning::plan(dom, content, phases),
            RevealKind::Operational(name) => {
                operational::plan(dom, content, phases, OperationalPreset::for_scene(name))
            }
        };
        Self { kind, plan }
    }
}

pub(crate) fn heading_and_paragraph(dom: &impl Dom, content: NodeId) -> (Option<NodeId>, Option<NodeId>) {
    (
        dom.query_first(content, &Selector::Tags(HEADING_TAGS)),
        dom.query_first(content, &Selector::Tags(PARAGRAPH_TAGS)),
    )
}

/// Stagger offset: the first item waits `first`, the rest `step` after their predecessor.
pub(crate) fn stagger(first: f64, step: f64, index: usize) -> f64 {
    if index == 0 { first } else { step }
}

pub(crate) fn settle(props: PropSet, phases: PhaseDurations) -> TweenVars {
    TweenVars::new(props, phases.active, Ease::Linear)
}

pub(crate) fn recede(props: PropSet, phases: PhaseDurations) -> TweenVars {
    TweenVars::new(props, phases.exit, Ease::InOutSine)
}

/// Find a marked child of `parent` or create, mark, label and append it.
pub(crate) fn ensure_child(
    dom: &mut impl Dom,
    parent: NodeId,
    tag: &str,
    class: &str,
    marker: (&str, &str),
    text: Option<&str>,
) -> NodeId {
    if let Some(existing) = dom.query_first(parent, &Selector::attr(marker.0, marker.1)) {
        return existing;
    }
    let node = dom.create_element(tag);
    dom.set_attribute(node, "class", class);
    dom.set_attribute(node, marker.0, marker.1);
    if let Some(text) = text {
        dom.set_text(node, text);
    }
    dom.append_child(parent, node);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_lookup_covers_branded_ids() {
        assert_eq!(RevealKind::for_scene_id("hero"), Some(RevealKind::Hero));
        assert_eq!(RevealKind::for_scene_id("ai-activation"), Some(RevealKind::Activation));
        assert_eq!(
            RevealKind::for_scene_id("command-center"),
            Some(RevealKind::Operational("command-center"))
        );
        assert_eq!(RevealKind::for_scene_id("scene-4"), None);
    }

    #[test]
    fn tone_rows_become_columns() {
        let phases = PhaseDurations {
            enter: 0.2,
            active: 0.6,
            exit: 0.2,
        };
        let t = ToneTrack::new(&[("--a", [0.0, 1.0, 2.0, 3.0]), ("--b", [4.0, 5.0, 6.0, 7.0])], phases);
        assert_eq!(t.from, PropSet::new().var("--a", 0.0).var("--b", 4.0));
        assert_eq!(t.active.props, PropSet::new().var("--a", 2.0).var("--b", 6.0));
        assert_eq!(t.exit.duration, 0.2);
        assert_eq!(t.active.ease, Ease::Linear);
    }

    #[test]
    fn stagger_uses_first_then_step() {
        assert_eq!(stagger(0.06, 0.08, 0), 0.06);
        assert_eq!(stagger(0.06, 0.08, 3), 0.08);
    }
}
