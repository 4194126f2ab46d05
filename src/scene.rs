use std::collections::BTreeSet;

use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::dom::{Dom, HEADING_TAGS, PARAGRAPH_TAGS, Selector};
use crate::foundation::core::NodeId;
use crate::profile::{LayerTravel, RuntimeProfile};
use crate::reveal::{Reveal, RevealKind};

/// Position of a scene within its enter/active/exit lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenePhase {
    /// Not reached yet.
    #[default]
    Idle,
    /// Coming into view.
    Enter,
    /// Dwelling in view.
    Active,
    /// Leaving, while the next panel shifts in.
    Exit,
}

impl ScenePhase {
    /// Value written to `data-scene-phase`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Enter => "enter",
            Self::Active => "active",
            Self::Exit => "exit",
        }
    }
}

/// Timeline label names of a scene: `<id>-enter`, `<id>-active`, `<id>-exit`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SceneLabels {
    /// Start of the enter phase.
    pub enter: String,
    /// Start of the dwell.
    pub active: String,
    /// Start of the exit.
    pub exit: String,
}

impl SceneLabels {
    fn for_id(id: &str) -> Self {
        Self {
            enter: format!("{id}-enter"),
            active: format!("{id}-active"),
            exit: format!("{id}-exit"),
        }
    }

    /// Label for `phase`; idle has none.
    pub fn get(&self, phase: ScenePhase) -> Option<&str> {
        match phase {
            ScenePhase::Idle => None,
            ScenePhase::Enter => Some(&self.enter),
            ScenePhase::Active => Some(&self.active),
            ScenePhase::Exit => Some(&self.exit),
        }
    }
}

/// Parallax targets. A target is never shared between two layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Layers {
    /// Content container.
    pub background: Option<NodeId>,
    /// First heading.
    pub midground: Option<NodeId>,
    /// First paragraph.
    pub foreground: Option<NodeId>,
}

impl Layers {
    /// Background takes the container, midground the heading, foreground the
    /// paragraph; each falls back to the container when it is still unclaimed.
    pub fn resolve(dom: &impl Dom, content: NodeId) -> Self {
        let heading = dom.query_first(content, &Selector::Tags(HEADING_TAGS));
        let paragraph = dom.query_first(content, &Selector::Tags(PARAGRAPH_TAGS));
        let mut claimed = BTreeSet::new();
        let mut pick = |primary: Option<NodeId>, fallback: Option<NodeId>| {
            [primary, fallback]
                .into_iter()
                .flatten()
                .find(|node| claimed.insert(*node))
        };
        Self {
            background: pick(Some(content), None),
            midground: pick(heading, Some(content)),
            foreground: pick(paragraph, Some(content)),
        }
    }

    /// Each layer's target (possibly absent) paired with its parallax travel.
    pub fn with_travel(&self, profile: &RuntimeProfile) -> [(Option<NodeId>, LayerTravel); 3] {
        let depth = profile.depth_motion;
        [
            (self.background, depth.background),
            (self.midground, depth.midground),
            (self.foreground, depth.foreground),
        ]
    }
}

/// Primary transform/opacity tween set of a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    /// Content container for revealed scenes, else the foreground layer.
    pub target: NodeId,
    /// Starting state for the enter tween.
    pub enter_from: PropSet,
    /// Enter destination.
    pub enter: TweenVars,
    /// Dwell destination.
    pub active: TweenVars,
    /// Exit destination.
    pub exit: TweenVars,
}

impl Motion {
    fn new(target: NodeId, branded: bool, profile: &RuntimeProfile) -> Self {
        let phases = profile.phase_duration;
        let settled = PropSet::new().alpha(1.0).y_percent(0.0).scale(1.0);
        let enter_from = if branded {
            settled.clone()
        } else {
            PropSet::new().alpha(0.35).y_percent(0.0).scale(0.992)
        };
        Self {
            target,
            enter_from,
            enter: TweenVars::new(settled.clone(), phases.enter, Ease::OutCubic),
            active: TweenVars::new(settled, phases.active, Ease::Linear),
            exit: TweenVars::new(
                PropSet::new().alpha(0.7).y_percent(0.0).scale(0.996),
                phases.exit,
                Ease::InOutQuad,
            ),
        }
    }

    /// Pose applied before the timeline runs: the first scene starts settled.
    pub fn baseline(&self, index: usize) -> PropSet {
        if index == 0 {
            PropSet::new().alpha(1.0).y_percent(0.0).scale(1.0)
        } else {
            self.enter_from.clone()
        }
    }
}

/// Animation descriptor for one panel, rebuilt on every timeline build.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Unique scene id.
    pub id: String,
    /// Position among the panels.
    pub index: usize,
    /// The panel element.
    pub element: NodeId,
    /// Content container, or the panel itself when there is none.
    pub content: NodeId,
    /// Timeline labels.
    pub labels: SceneLabels,
    /// Parallax targets.
    pub layers: Layers,
    /// Primary motion.
    pub motion: Motion,
    /// Bespoke choreography for known scene ids.
    pub reveal: Option<Reveal>,
}

impl Scene {
    /// Build the descriptor and stamp the panel's observational attributes.
    pub fn build(
        dom: &mut impl Dom,
        element: NodeId,
        index: usize,
        id: String,
        content_class: &str,
        profile: &RuntimeProfile,
    ) -> Self {
        let content = dom
            .query_first(element, &Selector::class(content_class))
            .unwrap_or(element);
        let layers = Layers::resolve(dom, content);
        let reveal = match RevealKind::for_scene_id(&id) {
            Some(kind) => Some(Reveal::build(kind, dom, content, profile.phase_duration)),
            None => None,
        };
        let motion_target = if reveal.is_some() {
            content
        } else {
            layers.foreground.unwrap_or(content)
        };
        let motion = Motion::new(motion_target, reveal.is_some(), profile);

        dom.set_attribute(element, "data-scene-id", &id);
        dom.set_attribute(element, "data-scene-index", &index.to_string());
        dom.set_attribute(element, "data-scene-phase", ScenePhase::Idle.as_str());

        Self {
            labels: SceneLabels::for_id(&id),
            id,
            index,
            element,
            content,
            layers,
            motion,
            reveal,
        }
    }

    /// Kind of the attached reveal, if any.
    pub fn reveal_kind(&self) -> Option<RevealKind> {
        self.reveal.as_ref().map(|r| r.kind)
    }
}

/// Scene ids for `panels`: the element id, else `scene-<n>`, suffixed until unique.
pub fn assign_scene_ids(dom: &impl Dom, panels: &[NodeId]) -> Vec<String> {
    let explicit: BTreeSet<String> = panels.iter().filter_map(|&p| dom.element_id(p)).collect();
    let mut taken = BTreeSet::new();
    panels
        .iter()
        .enumerate()
        .map(|(index, &panel)| {
            let (base, reserved) = match dom.element_id(panel) {
                Some(id) => (id, false),
                None => (format!("scene-{}", index + 1), true),
            };
            let clashes = |candidate: &String, taken: &BTreeSet<String>| {
                taken.contains(candidate) || (reserved && explicit.contains(candidate))
            };
            let mut id = base.clone();
            let mut n = 2;
            while clashes(&id, &taken) {
                id = format!("{base}-{n}");
                n += 1;
            }
            taken.insert(id.clone());
            id
        })
        .collect()
}

/// Build every scene in panel order.
#[tracing::instrument(skip(dom, panels, profile))]
pub fn build_scenes(
    dom: &mut impl Dom,
    panels: &[NodeId],
    content_class: &str,
    profile: &RuntimeProfile,
) -> Vec<Scene> {
    let ids = assign_scene_ids(dom, panels);
    let scenes: Vec<Scene> = panels
        .iter()
        .zip(ids)
        .enumerate()
        .map(|(index, (&panel, id))| Scene::build(dom, panel, index, id, content_class, profile))
        .collect();
    tracing::debug!(
        scenes = scenes.len(),
        revealed = scenes.iter().filter(|s| s.reveal.is_some()).count(),
        "scene modules built"
    );
    scenes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    fn panel(dom: &mut MemoryDom, parent: NodeId, id: Option<&str>, heading: bool, paragraph: bool) -> NodeId {
        let attrs: Vec<(&str, &str)> = match id {
            Some(id) => vec![("id", id), ("class", "panel")],
            None => vec![("class", "panel")],
        };
        let section = dom.element(parent, "section", &attrs);
        let content = dom.element(section, "div", &[("class", "panel-content")]);
        if heading {
            dom.element(content, "h2", &[]);
        }
        if paragraph {
            dom.element(content, "p", &[]);
        }
        section
    }

    #[test]
    fn layers_never_share_a_target() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let s = panel(&mut dom, doc, Some("a"), true, true);
        let content = dom.children(s)[0];
        let layers = Layers::resolve(&dom, content);
        let targets: Vec<NodeId> = [layers.background, layers.midground, layers.foreground]
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets.iter().collect::<BTreeSet<_>>().len(), 3);
        assert_eq!(layers.background, Some(content));
    }

    #[test]
    fn exhausted_layers_carry_no_target() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let s = panel(&mut dom, doc, None, false, false);
        let content = dom.children(s)[0];
        let layers = Layers::resolve(&dom, content);
        assert_eq!(layers.background, Some(content));
        assert_eq!(layers.midground, None);
        assert_eq!(layers.foreground, None);

        let s = panel(&mut dom, doc, None, true, false);
        let content = dom.children(s)[0];
        let layers = Layers::resolve(&dom, content);
        assert!(layers.midground.is_some());
        assert_eq!(layers.foreground, None);
    }

    #[test]
    fn fallback_ids_never_collide() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let panels = vec![
            panel(&mut dom, doc, Some("scene-2"), true, true),
            panel(&mut dom, doc, None, true, true),
            panel(&mut dom, doc, Some("intro"), true, true),
            panel(&mut dom, doc, Some("intro"), true, true),
        ];
        let ids = assign_scene_ids(&dom, &panels);
        assert_eq!(ids, vec!["scene-2", "scene-2-2", "intro", "intro-2"]);
    }

    #[test]
    fn plain_scene_moves_the_foreground() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let s = panel(&mut dom, doc, Some("pricing"), true, true);
        let profile = RuntimeProfile::from_flags(false, false);
        let scene = Scene::build(&mut dom, s, 3, "pricing".into(), "panel-content", &profile);
        assert!(scene.reveal.is_none());
        assert_eq!(Some(scene.motion.target), scene.layers.foreground);
        assert_eq!(scene.labels.active, "pricing-active");
        assert_eq!(dom.attribute(s, "data-scene-index").as_deref(), Some("3"));
        assert_eq!(dom.attribute(s, "data-scene-phase").as_deref(), Some("idle"));
        assert_eq!(scene.motion.baseline(3), scene.motion.enter_from);
    }

    #[test]
    fn branded_scene_moves_the_container() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let s = panel(&mut dom, doc, Some("problems"), true, true);
        let profile = RuntimeProfile::from_flags(true, false);
        let scene = Scene::build(&mut dom, s, 1, "problems".into(), "panel-content", &profile);
        assert_eq!(scene.reveal_kind(), Some(RevealKind::Problems));
        assert_eq!(scene.motion.target, scene.content);
        assert_eq!(
            scene.motion.enter_from,
            PropSet::new().alpha(1.0).y_percent(0.0).scale(1.0)
        );
    }

    #[test]
    fn missing_content_wrapper_uses_the_panel() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let s = dom.element(doc, "section", &[("class", "panel")]);
        dom.element(s, "h1", &[]);
        let profile = RuntimeProfile::from_flags(false, false);
        let scene = Scene::build(&mut dom, s, 0, "scene-1".into(), "panel-content", &profile);
        assert_eq!(scene.content, s);
    }
}
