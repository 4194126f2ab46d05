//! Master timeline assembly.
//!
//! Every scene contributes three labelled phases in index order. Within a
//! phase the primary tween (panel tone for revealed scenes, the motion target
//! otherwise) is appended at the cursor and everything else starts with it.
//! Non-last scenes end with a shift moving every panel up one viewport; the
//! last scene ends with a hold instead.

use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::animation::timeline::{PhaseCall, Position, Timeline, TimelineBuilder, TweenKind};
use crate::foundation::core::NodeId;
use crate::foundation::error::CinescrollResult;
use crate::host::Host;
use crate::profile::RuntimeProfile;
use crate::scene::{Scene, ScenePhase};

/// Apply every scene's pre-timeline pose through the host and record it as
/// the builder's baseline.
pub fn prepare_baseline(
    host: &mut impl Host,
    builder: &mut TimelineBuilder,
    scenes: &[Scene],
    panels: &[NodeId],
) {
    let mut set = |node: NodeId, props: &PropSet| {
        host.apply_props(node, props);
        builder.set(&[node], props);
    };
    for scene in scenes {
        if let Some(reveal) = &scene.reveal {
            set(scene.element, &reveal.plan.tone.from);
            for item in &reveal.plan.items {
                set(item.target, &item.from);
            }
        }
        set(scene.motion.target, &scene.motion.baseline(scene.index));
    }
    let rest = PropSet::new().y_percent(0.0);
    for &panel in panels {
        set(panel, &rest);
    }
}

/// Append one scene's enter/active/exit slot plus its shift or hold.
pub fn add_scene_slot(
    builder: &mut TimelineBuilder,
    scene: &Scene,
    panels: &[NodeId],
    profile: &RuntimeProfile,
    is_last: bool,
) -> CinescrollResult<()> {
    let phases = profile.phase_duration;
    let travel = scene.layers.with_travel(profile);
    let items = scene
        .reveal
        .as_ref()
        .map(|r| r.plan.items.as_slice())
        .unwrap_or_default();

    for phase in [ScenePhase::Enter, ScenePhase::Active, ScenePhase::Exit] {
        if let Some(label) = scene.labels.get(phase) {
            builder.add_label(label)?;
        }
        builder.call(PhaseCall {
            scene: scene.index,
            phase,
        });

        match &scene.reveal {
            Some(reveal) => {
                let tone = &reveal.plan.tone;
                let (from, vars) = match phase {
                    ScenePhase::Enter => (Some(tone.from.clone()), &tone.enter),
                    ScenePhase::Active => (None, &tone.active),
                    _ => (None, &tone.exit),
                };
                builder.tween(vec![scene.element], TweenKind::Tone, from, vars, Position::Cursor)?;
            }
            None => {
                let motion = &scene.motion;
                let (from, vars) = match phase {
                    ScenePhase::Enter => (Some(motion.enter_from.clone()), &motion.enter),
                    ScenePhase::Active => (None, &motion.active),
                    _ => (None, &motion.exit),
                };
                builder.tween(vec![motion.target], TweenKind::Motion, from, vars, Position::Cursor)?;
            }
        }

        for (target, layer) in travel {
            let (from, vars) = match phase {
                ScenePhase::Enter => (
                    Some(PropSet::new().y_percent(layer.enter_from_y)),
                    TweenVars::new(PropSet::new().y_percent(0.0), phases.enter, Ease::OutQuad),
                ),
                ScenePhase::Active => (
                    None,
                    TweenVars::new(PropSet::new().y_percent(layer.active_to_y), phases.active, Ease::Linear),
                ),
                _ => (
                    None,
                    TweenVars::new(PropSet::new().y_percent(layer.exit_to_y), phases.exit, Ease::Linear),
                ),
            };
            builder.add_conditional(
                target,
                TweenKind::Depth,
                from.as_ref(),
                Some(&vars),
                Position::WithPrevious(0.0),
            )?;
        }

        for item in items {
            let (from, vars, position) = match phase {
                ScenePhase::Enter => (
                    Some(&item.from),
                    Some(&item.enter),
                    Position::WithPrevious(item.enter_offset),
                ),
                ScenePhase::Active => (None, item.active.as_ref(), Position::WithPrevious(0.0)),
                _ => (None, item.exit.as_ref(), Position::WithPrevious(0.0)),
            };
            builder.add_conditional(Some(item.target), TweenKind::Item, from, vars, position)?;
        }
    }

    if is_last {
        builder.hold(phases.exit)
    } else {
        let shift = TweenVars::new(
            PropSet::new().y_percent(-100.0 * (scene.index + 1) as f64),
            phases.exit,
            Ease::Linear,
        );
        builder.tween(
            panels.to_vec(),
            TweenKind::Shift,
            None,
            &shift,
            Position::WithPrevious(0.0),
        )
    }
}

/// Build the master timeline for `scenes`, applying baseline poses on the way.
#[tracing::instrument(skip_all, fields(scenes = scenes.len()))]
pub fn assemble(
    host: &mut impl Host,
    scenes: &[Scene],
    panels: &[NodeId],
    profile: &RuntimeProfile,
) -> CinescrollResult<Timeline> {
    let mut builder = TimelineBuilder::new();
    prepare_baseline(host, &mut builder, scenes, panels);
    for scene in scenes {
        add_scene_slot(&mut builder, scene, panels, profile, scene.index + 1 == scenes.len())?;
    }
    let timeline = builder.build();
    tracing::debug!(
        duration = timeline.duration(),
        labels = timeline.labels().len(),
        "master timeline assembled"
    );
    Ok(timeline)
}

/// Reporting view of a built master timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimelineSummary {
    /// Number of scenes.
    pub scenes: usize,
    /// Timeline length in seconds.
    pub duration: f64,
    /// Every label in insertion order.
    pub labels: Vec<LabelTime>,
    /// Tween counts per kind.
    pub tweens: TweenCounts,
}

/// A label and where it sits.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LabelTime {
    /// Label name.
    pub name: String,
    /// Seconds.
    pub time: f64,
}

/// Tweens per [`TweenKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct TweenCounts {
    /// [`TweenKind::Motion`].
    pub motion: usize,
    /// [`TweenKind::Tone`].
    pub tone: usize,
    /// [`TweenKind::Depth`].
    pub depth: usize,
    /// [`TweenKind::Item`].
    pub item: usize,
    /// [`TweenKind::Shift`].
    pub shift: usize,
    /// [`TweenKind::Hold`].
    pub hold: usize,
}

impl TimelineSummary {
    /// Summarize `timeline` built from `scenes` scenes.
    pub fn new(timeline: &Timeline, scenes: usize) -> Self {
        Self {
            scenes,
            duration: timeline.duration(),
            labels: timeline
                .labels()
                .iter()
                .map(|(name, time)| LabelTime {
                    name: name.clone(),
                    time: *time,
                })
                .collect(),
            tweens: TweenCounts {
                motion: timeline.count(TweenKind::Motion),
                tone: timeline.count(TweenKind::Tone),
                depth: timeline.count(TweenKind::Depth),
                item: timeline.count(TweenKind::Item),
                shift: timeline.count(TweenKind::Shift),
                hold: timeline.count(TweenKind::Hold),
            },
        }
    }
}
