use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::animation::props::{Lerp, Prop, PropSet, TweenVars};
use crate::foundation::core::NodeId;
use crate::foundation::error::{CinescrollError, CinescrollResult};
use crate::scene::ScenePhase;

/// What a tween drives. Only used for reporting and assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TweenKind {
    /// Plain scene motion on the primary target.
    Motion,
    /// Container custom-property tone/atmosphere.
    Tone,
    /// Parallax layer travel.
    Depth,
    /// Reveal item (heading, step, piece, slot...).
    Item,
    /// Cross-fade moving every panel up by one viewport.
    Shift,
    /// Empty spacer on the last scene.
    Hold,
}

/// Insertion point for a new tween.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum Position {
    /// At the cursor; the cursor then moves to the tween's end.
    Cursor,
    /// At the start of the most recently inserted tween plus an offset.
    WithPrevious(f64),
    /// Absolute time. Does not move the cursor.
    At(f64),
}

/// One scheduled property animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Tween {
    /// Elements written by this tween.
    pub targets: Vec<NodeId>,
    /// Reporting category.
    pub kind: TweenKind,
    /// Explicit start values; `None` starts from whatever precedes it.
    pub from: Option<PropSet>,
    /// End values.
    pub to: PropSet,
    /// Timeline seconds.
    pub start: f64,
    /// Seconds.
    pub duration: f64,
    /// Easing over `duration`.
    pub ease: Ease,
}

impl Tween {
    /// Timeline time at which the tween is complete.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    fn progress(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        self.ease.apply((t - self.start) / self.duration)
    }
}

/// Phase transition scheduled on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PhaseCall {
    /// Scene index.
    pub scene: usize,
    /// Phase the scene switches to when the playhead crosses forward.
    pub phase: ScenePhase,
}

/// Assembles a [`Timeline`] with a moving insertion cursor.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    tweens: Vec<Tween>,
    labels: Vec<(String, f64)>,
    calls: Vec<(f64, PhaseCall)>,
    baseline: BTreeMap<(NodeId, Prop), f64>,
    cursor: f64,
    last_start: f64,
}

impl TimelineBuilder {
    /// Empty builder with the cursor at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current insertion time.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Record immediately-applied values so "to" tweens know where they start.
    pub fn set(&mut self, targets: &[NodeId], props: &PropSet) {
        for &node in targets {
            for (prop, v) in props.iter() {
                self.baseline.insert((node, prop.clone()), v);
            }
        }
    }

    /// Place a label at the cursor.
    pub fn add_label(&mut self, name: impl Into<String>) -> CinescrollResult<f64> {
        let name = name.into();
        if self.labels.iter().any(|(n, _)| *n == name) {
            return Err(CinescrollError::timeline(format!(
                "duplicate label '{name}'"
            )));
        }
        self.labels.push((name, self.cursor));
        Ok(self.cursor)
    }

    /// Schedule a phase call at the cursor.
    pub fn call(&mut self, call: PhaseCall) {
        self.calls.push((self.cursor, call));
    }

    /// Insert a tween at `position`.
    ///
    /// `from` pins explicit start values; otherwise the tween starts from
    /// whatever the track holds at its start time.
    pub fn tween(
        &mut self,
        targets: Vec<NodeId>,
        kind: TweenKind,
        from: Option<PropSet>,
        vars: &TweenVars,
        position: Position,
    ) -> CinescrollResult<()> {
        if targets.is_empty() {
            return Err(CinescrollError::timeline("tween needs at least one target"));
        }
        self.push(targets, kind, from, vars, position)
    }

    /// Insert a tween only when both a target and a destination state exist.
    ///
    /// Returns whether anything was inserted.
    pub fn add_conditional(
        &mut self,
        target: Option<NodeId>,
        kind: TweenKind,
        from: Option<&PropSet>,
        to: Option<&TweenVars>,
        position: Position,
    ) -> CinescrollResult<bool> {
        let (Some(target), Some(to)) = (target, to) else {
            return Ok(false);
        };
        self.push(vec![target], kind, from.cloned(), to, position)?;
        Ok(true)
    }

    /// Append an empty spacer at the cursor.
    pub fn hold(&mut self, duration: f64) -> CinescrollResult<()> {
        let vars = TweenVars::new(PropSet::new(), duration, Ease::Linear);
        self.push(Vec::new(), TweenKind::Hold, None, &vars, Position::Cursor)
    }

    fn push(
        &mut self,
        targets: Vec<NodeId>,
        kind: TweenKind,
        from: Option<PropSet>,
        vars: &TweenVars,
        position: Position,
    ) -> CinescrollResult<()> {
        if !vars.duration.is_finite() || vars.duration < 0.0 {
            return Err(CinescrollError::timeline(format!(
                "tween duration must be finite and >= 0 (got {})",
                vars.duration
            )));
        }
        let start = match position {
            Position::Cursor => self.cursor,
            Position::WithPrevious(offset) => self.last_start + offset,
            Position::At(t) => t,
        };
        if !start.is_finite() || start < 0.0 {
            return Err(CinescrollError::timeline(format!(
                "tween start must be finite and >= 0 (got {start})"
            )));
        }
        if position == Position::Cursor {
            self.cursor = start + vars.duration;
        }
        self.last_start = start;
        self.tweens.push(Tween {
            targets,
            kind,
            from,
            to: vars.props.clone(),
            start,
            duration: vars.duration,
            ease: vars.ease,
        });
        Ok(())
    }

    /// Freeze into a playable timeline with the playhead at zero.
    pub fn build(self) -> Timeline {
        let duration = self
            .tweens
            .iter()
            .map(Tween::end)
            .chain(self.labels.iter().map(|(_, t)| *t))
            .fold(self.cursor, f64::max);

        let mut calls = self.calls;
        calls.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut tl = Timeline {
            tweens: self.tweens,
            tracks: BTreeMap::new(),
            start_values: Vec::new(),
            baseline: self.baseline,
            labels: self.labels,
            calls,
            duration,
            time: 0.0,
        };
        tl.index_tracks();
        tl
    }
}

/// A built, scrubbable timeline.
#[derive(Debug)]
pub struct Timeline {
    tweens: Vec<Tween>,
    /// Tween indices per animated (node, property), sorted by start time.
    tracks: BTreeMap<(NodeId, Prop), Vec<usize>>,
    /// Resolved starting value per (tween, node, property).
    start_values: Vec<BTreeMap<(NodeId, Prop), f64>>,
    baseline: BTreeMap<(NodeId, Prop), f64>,
    labels: Vec<(String, f64)>,
    calls: Vec<(f64, PhaseCall)>,
    duration: f64,
    time: f64,
}

impl Timeline {
    fn index_tracks(&mut self) {
        let mut tracks: BTreeMap<(NodeId, Prop), Vec<usize>> = BTreeMap::new();
        for (i, tween) in self.tweens.iter().enumerate() {
            for &node in &tween.targets {
                for prop in tween.to.keys() {
                    tracks.entry((node, prop.clone())).or_default().push(i);
                }
            }
        }
        for track in tracks.values_mut() {
            // Stable: equal starts keep insertion order.
            track.sort_by(|a, b| self.tweens[*a].start.total_cmp(&self.tweens[*b].start));
        }

        self.start_values = vec![BTreeMap::new(); self.tweens.len()];
        for (key, track) in &tracks {
            for (pos, &i) in track.iter().enumerate() {
                let explicit = self.tweens[i].from.as_ref().and_then(|f| f.get(&key.1));
                let value = match (explicit, pos.checked_sub(1)) {
                    (Some(v), _) => v,
                    (None, Some(prev)) => {
                        self.track_value(key, &track[..=prev], self.tweens[i].start)
                    }
                    (None, None) => self.base_value(key),
                };
                self.start_values[i].insert(key.clone(), value);
            }
        }
        self.tracks = tracks;
    }

    fn base_value(&self, key: &(NodeId, Prop)) -> f64 {
        self.baseline
            .get(key)
            .copied()
            .unwrap_or_else(|| key.1.neutral())
    }

    fn tween_value(&self, i: usize, key: &(NodeId, Prop), t: f64) -> f64 {
        let tween = &self.tweens[i];
        let to = tween.to.get(&key.1).unwrap_or_else(|| key.1.neutral());
        let from = self.start_values[i]
            .get(key)
            .copied()
            .unwrap_or_else(|| self.base_value(key));
        f64::lerp(&from, &to, tween.progress(t))
    }

    /// Value of `key` at `t` considering only `track` (sorted by start).
    fn track_value(&self, key: &(NodeId, Prop), track: &[usize], t: f64) -> f64 {
        let idx = track.partition_point(|&i| self.tweens[i].start <= t);
        if idx == 0 {
            return match track.first() {
                Some(&first) if self.tweens[first].from.is_some() => {
                    self.tween_value(first, key, t)
                }
                _ => self.base_value(key),
            };
        }
        self.tween_value(track[idx - 1], key, t)
    }

    /// End of the last tween or label, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Playhead position.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Every tween in insertion order.
    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    /// Number of tweens of `kind`.
    pub fn count(&self, kind: TweenKind) -> usize {
        self.tweens.iter().filter(|t| t.kind == kind).count()
    }

    /// Labels with their times, in insertion order.
    pub fn labels(&self) -> &[(String, f64)] {
        &self.labels
    }

    /// Time of the label called `name`.
    pub fn label_time(&self, name: &str) -> Option<f64> {
        self.labels
            .iter()
            .find_map(|(n, t)| (n == name).then_some(*t))
    }

    /// Move the playhead, returning the phase calls crossed on the way.
    ///
    /// Forward moves report calls in `(old, new]` in ascending order, backward
    /// moves report calls in `(new, old]` in descending order.
    pub fn seek(&mut self, time: f64) -> Vec<PhaseCall> {
        let new = time.clamp(0.0, self.duration);
        let old = self.time;
        self.time = new;

        if new > old {
            self.calls
                .iter()
                .filter(|(t, _)| old < *t && *t <= new)
                .map(|(_, c)| *c)
                .collect()
        } else if new < old {
            self.calls
                .iter()
                .rev()
                .filter(|(t, _)| new < *t && *t <= old)
                .map(|(_, c)| *c)
                .collect()
        } else {
            Vec::new()
        }
    }

    /// Property values at `now` for every tween overlapping `[prev, now]`.
    pub fn render(&self, prev: f64, now: f64) -> BTreeMap<NodeId, PropSet> {
        let (lo, hi) = if prev <= now { (prev, now) } else { (now, prev) };
        let mut out: BTreeMap<NodeId, PropSet> = BTreeMap::new();
        for (key, track) in &self.tracks {
            let touched = track.iter().any(|&i| {
                let tw = &self.tweens[i];
                tw.start <= hi && tw.end() >= lo
            });
            if touched {
                let v = self.track_value(key, track, now);
                out.entry(key.0).or_default().insert(key.1.clone(), v);
            }
        }
        out
    }

    /// Every animated property of `node` evaluated at `t`.
    pub fn sample(&self, node: NodeId, t: f64) -> PropSet {
        let mut out = PropSet::new();
        for ((n, prop), v) in &self.baseline {
            if *n == node {
                out.insert(prop.clone(), *v);
            }
        }
        for (key, track) in self.tracks.range((node, Prop::AutoAlpha)..) {
            if key.0 != node {
                break;
            }
            out.insert(key.1.clone(), self.track_value(key, track, t));
        }
        out
    }
}
