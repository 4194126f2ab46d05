use std::collections::BTreeMap;
use std::time::Duration;

use crate::animation::scrub::ScrubFollower;
use crate::animation::timeline::{PhaseCall, Timeline};
use crate::config::StageConfig;
use crate::debounce::Debouncer;
use crate::dom::{Dom, Selector};
use crate::foundation::core::{NodeId, ScrollRange};
use crate::foundation::error::CinescrollResult;
use crate::host::{Host, ScrollTriggerSpec};
use crate::master::{TimelineSummary, assemble};
use crate::navigation::{ClickOutcome, clicked_panel, jump_target};
use crate::profile::RuntimeProfile;
use crate::scene::{Scene, ScenePhase, build_scenes};
use crate::tracker::{ActiveSection, resolve_active_index};

/// Everything one timeline build produced. Dropped wholesale on rebuild.
#[derive(Debug)]
struct Built {
    panels: Vec<NodeId>,
    scenes: Vec<Scene>,
    timeline: Timeline,
    range: ScrollRange,
}

/// Owns the master timeline, its scroll binding and all derived state.
///
/// Time is supplied by the caller on every event so playback is
/// deterministic. Construct with [`Stage::init`], feed it scroll, resize,
/// click and tick events, and finish with [`Stage::teardown`].
#[derive(Debug)]
pub struct Stage<D: Dom, H: Host> {
    dom: D,
    host: H,
    config: StageConfig,
    enabled: bool,
    profile: Option<RuntimeProfile>,
    nav_list: Option<NodeId>,
    built: Option<Built>,
    active: ActiveSection,
    scrub: ScrubFollower,
    resize: Debouncer,
    scroll_top: f64,
}

impl<D: Dom, H: Host> Stage<D, H> {
    /// Start the experience.
    ///
    /// Without a motion engine the stage comes back disabled and every event
    /// is ignored. A page without a scroll root or panels yields an enabled
    /// stage with no timeline. Errors only surface from timeline assembly.
    #[tracing::instrument(skip_all)]
    pub fn init(dom: D, host: H, config: StageConfig) -> CinescrollResult<Self> {
        let mut stage = Self {
            dom,
            resize: Debouncer::new(config.resize_debounce()),
            config,
            host,
            enabled: false,
            profile: None,
            nav_list: None,
            built: None,
            active: ActiveSection::default(),
            scrub: ScrubFollower::new(0.0),
            scroll_top: 0.0,
        };
        if !stage.host.motion_available() {
            tracing::debug!("motion engine unavailable, leaving native scrolling");
            return Ok(stage);
        }
        stage.enabled = true;
        stage.host.configure_scroll(&stage.config.scroll_config());
        stage.build()?;
        stage.nav_list = stage
            .dom
            .query_first(stage.dom.document(), &Selector::class(stage.config.nav_list_class.as_str()));
        stage.restore();
        Ok(stage)
    }

    /// Release the current binding and rebuild profile, scenes and timeline.
    #[tracing::instrument(skip_all)]
    fn build(&mut self) -> CinescrollResult<()> {
        self.release();
        let profile = RuntimeProfile::resolve(&self.host, &self.config);
        self.profile = Some(profile);

        let doc = self.dom.document();
        let Some(root) = self.dom.query_first(doc, &Selector::id(self.config.root_id.as_str())) else {
            tracing::debug!(root = %self.config.root_id, "scroll root missing, no timeline built");
            return Ok(());
        };
        let panels = self
            .dom
            .query_all(root, &Selector::class(self.config.section_class.as_str()));
        if panels.is_empty() {
            tracing::debug!("no panels under scroll root, no timeline built");
            return Ok(());
        }

        let scenes = build_scenes(&mut self.dom, &panels, &self.config.content_class, &profile);
        let timeline = assemble(&mut self.host, &scenes, &panels, &profile)?;

        for scene in &scenes {
            self.dom
                .set_attribute(scene.element, "data-slot", &(scene.index + 1).to_string());
        }

        let length = self.host.viewport().height * scenes.len() as f64;
        let range = self.host.bind_scroll(&ScrollTriggerSpec {
            id: self.config.trigger_id.clone(),
            trigger: root,
            length,
            pin: true,
            scrub: profile.scrub,
            markers: self.config.debug_markers,
        });
        self.scrub = ScrubFollower::new(profile.scrub);
        self.built = Some(Built {
            panels,
            scenes,
            timeline,
            range,
        });
        Ok(())
    }

    fn release(&mut self) {
        if self.built.take().is_some() {
            self.host.release_scroll(&self.config.trigger_id);
        }
    }

    /// `false` when the host had no motion engine at init.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The managed document.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, e.g. to change the viewport before a resize.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Config the stage was started with.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Profile of the latest build.
    pub fn profile(&self) -> Option<&RuntimeProfile> {
        self.profile.as_ref()
    }

    /// Scenes of the current timeline; empty when nothing was built.
    pub fn scenes(&self) -> &[Scene] {
        self.built.as_ref().map_or(&[], |b| b.scenes.as_slice())
    }

    /// Panels in document order; empty when nothing was built.
    pub fn panels(&self) -> &[NodeId] {
        self.built.as_ref().map_or(&[], |b| b.panels.as_slice())
    }

    /// The master timeline, if one was built.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.built.as_ref().map(|b| &b.timeline)
    }

    /// Document offsets the master trigger covers.
    pub fn scroll_range(&self) -> Option<ScrollRange> {
        self.built.as_ref().map(|b| b.range)
    }

    /// Index of the active section.
    pub fn active_index(&self) -> Option<usize> {
        self.active.index()
    }

    /// Reporting view of the current timeline.
    pub fn summary(&self) -> Option<TimelineSummary> {
        self.built
            .as_ref()
            .map(|b| TimelineSummary::new(&b.timeline, b.scenes.len()))
    }

    /// Whether the playhead has caught up with the last scroll position.
    pub fn is_settled(&self) -> bool {
        self.scrub.is_settled()
    }

    /// Window scrolled to `top` (document offset).
    pub fn on_scroll(&mut self, top: f64, now: Duration) {
        self.scroll_top = top;
        if let Some(built) = &self.built {
            let target = built.range.progress_at(top) * built.timeline.duration();
            self.scrub.retarget(target, now);
        }
    }

    /// Window resized. The rebuild runs from [`Stage::tick`] once the debounce
    /// window passes without another resize.
    pub fn on_resize(&mut self, now: Duration) {
        if self.enabled {
            self.resize.trigger(now);
        }
    }

    /// Run a due rebuild, then advance playback.
    pub fn tick(&mut self, now: Duration) -> CinescrollResult<()> {
        if self.resize.poll(now) {
            self.build()?;
            self.host.refresh_scroll();
            self.restore();
        }
        self.advance(now);
        Ok(())
    }

    /// Put a freshly built timeline where the last scroll offset left the old
    /// one, without replaying the phases in between.
    ///
    /// Scene phases start from the first scene settled; each scene then gets
    /// its final phase written once and the active section is resolved once
    /// from the restored playhead.
    fn restore(&mut self) {
        let Some(built) = self.built.as_mut() else {
            return;
        };
        let target = built.range.progress_at(self.scroll_top) * built.timeline.duration();
        self.scrub.reset(target);
        let mut phases = BTreeMap::from([(0, ScenePhase::Active)]);
        for PhaseCall { scene, phase } in built.timeline.seek(target) {
            phases.insert(scene, phase);
        }
        for (scene, phase) in phases {
            if let Some(scene) = built.scenes.get(scene) {
                self.dom
                    .set_attribute(scene.element, "data-scene-phase", phase.as_str());
            }
        }
        for (node, props) in built.timeline.render(0.0, target) {
            self.host.apply_props(node, &props);
        }
        let index = resolve_active_index(&built.timeline, &built.scenes);
        self.active.set(&mut self.dom, &built.panels, self.nav_list, index);
        tracing::debug!(time = target, active = index, "playhead restored");
    }

    /// Step the scrub toward the scroll target, fire crossed phase calls,
    /// render touched properties and update the active section.
    pub fn advance(&mut self, now: Duration) {
        let Some(built) = self.built.as_mut() else {
            return;
        };
        let prev = built.timeline.time();
        if self.scrub.is_settled() && self.scrub.current() == prev {
            return;
        }
        let time = self.scrub.step(now);
        let calls = built.timeline.seek(time);
        for PhaseCall { scene, phase } in calls {
            if let Some(scene) = built.scenes.get(scene) {
                self.dom
                    .set_attribute(scene.element, "data-scene-phase", phase.as_str());
                if phase == ScenePhase::Active {
                    self.active
                        .set(&mut self.dom, &built.panels, self.nav_list, scene.index);
                }
            }
        }
        for (node, props) in built.timeline.render(prev, built.timeline.time()) {
            self.host.apply_props(node, &props);
        }
        let index = resolve_active_index(&built.timeline, &built.scenes);
        self.active.set(&mut self.dom, &built.panels, self.nav_list, index);
    }

    /// Handle a click on `target`. Nav anchors to known panels jump the window.
    pub fn on_click(&mut self, target: NodeId) -> ClickOutcome {
        let (Some(built), Some(nav_list), Some(profile)) = (&self.built, self.nav_list, &self.profile)
        else {
            return ClickOutcome::Ignored;
        };
        let Some(index) = clicked_panel(&self.dom, nav_list, &built.panels, target) else {
            tracing::debug!(?target, "click ignored");
            return ClickOutcome::Ignored;
        };
        let Some(scene) = built.scenes.get(index) else {
            return ClickOutcome::Ignored;
        };
        let (top, behavior) = jump_target(&built.timeline, built.range, scene, profile);
        self.host.scroll_to(top, behavior);
        ClickOutcome::Jumped { top, behavior }
    }

    /// Drop the binding and pending rebuild, release engine scroll memory and
    /// hand back the DOM and host.
    #[tracing::instrument(skip_all)]
    pub fn teardown(mut self) -> (D, H) {
        self.resize.cancel();
        self.release();
        if self.enabled {
            self.host.clear_scroll_memory();
        }
        (self.dom, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use crate::foundation::core::{ScrollBehavior, Viewport};
    use crate::host::InMemoryHost;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn page(ids: &[&str]) -> MemoryDom {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let header = dom.element(doc, "header", &[]);
        let nav = dom.element(header, "nav", &[]);
        let ul = dom.element(nav, "ul", &[("class", "nav-list")]);
        let root = dom.element(doc, "main", &[("id", "scroll-root")]);
        for id in ids {
            let li = dom.element(ul, "li", &[]);
            let href = format!("#{id}");
            dom.element(li, "a", &[("href", href.as_str())]);
            let s = dom.element(root, "section", &[("id", id), ("class", "panel")]);
            let c = dom.element(s, "div", &[("class", "panel-content")]);
            dom.element(c, "h2", &[]);
            dom.element(c, "p", &[]);
        }
        dom
    }

    fn stage(ids: &[&str]) -> Stage<MemoryDom, InMemoryHost> {
        Stage::init(page(ids), InMemoryHost::default(), StageConfig::default()).unwrap()
    }

    #[test]
    fn missing_engine_disables_everything() {
        let mut host = InMemoryHost::default();
        host.available = false;
        let mut s = Stage::init(page(&["a"]), host, StageConfig::default()).unwrap();
        assert!(!s.is_enabled());
        assert!(s.timeline().is_none());
        s.on_resize(ms(0));
        s.tick(ms(500)).unwrap();
        let (_, host) = s.teardown();
        assert!(host.config.is_none());
        assert!(host.bindings.is_empty());
        assert!(!host.memory_cleared);
    }

    #[test]
    fn init_binds_one_pinned_trigger() {
        let s = stage(&["a", "b", "c"]);
        let host = s.host();
        assert_eq!(host.bindings.len(), 1);
        let spec = &host.bindings[0];
        assert_eq!(spec.id, "master-scroll-timeline");
        assert!(spec.pin);
        assert_eq!(spec.length, 900.0 * 3.0);
        assert_eq!(spec.scrub, 1.2);
        assert_eq!(s.active_index(), Some(0));
        assert_eq!(
            s.dom().attribute(s.panels()[0], "data-scene-phase").as_deref(),
            Some("active")
        );
        assert_eq!(s.dom().attribute(s.panels()[2], "data-slot").as_deref(), Some("3"));
    }

    #[test]
    fn empty_page_builds_nothing() {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        dom.element(doc, "main", &[("id", "scroll-root")]);
        let mut s = Stage::init(dom, InMemoryHost::default(), StageConfig::default()).unwrap();
        assert!(s.is_enabled());
        assert!(s.timeline().is_none());
        assert_eq!(s.active_index(), None);
        s.on_scroll(100.0, ms(0));
        s.advance(ms(10));
        assert_eq!(s.on_click(NodeId(1)), ClickOutcome::Ignored);
    }

    #[test]
    fn resize_rebuilds_once_after_debounce() {
        let mut s = stage(&["a", "b"]);
        s.on_resize(ms(0));
        s.on_resize(ms(150));
        s.tick(ms(300)).unwrap();
        assert_eq!(s.host().bindings.len(), 1);
        s.tick(ms(350)).unwrap();
        assert_eq!(s.host().bindings.len(), 2);
        assert_eq!(s.host().released.len(), 1);
        assert_eq!(s.host().live_bindings(), 1);
        assert_eq!(s.host().refreshes, 1);
        s.tick(ms(900)).unwrap();
        assert_eq!(s.host().bindings.len(), 2);
    }

    #[test]
    fn scrolling_forward_walks_phases_in_order() {
        let mut s = stage(&["a", "b", "c"]);
        let range = s.scroll_range().unwrap();
        let duration = s.timeline().unwrap().duration();
        let b_active = s.timeline().unwrap().label_time("b-active").unwrap();

        let top = range.offset_at((b_active + 0.05) / duration);
        s.on_scroll(top, ms(0));
        s.advance(ms(5_000));
        assert_eq!(s.active_index(), Some(1));
        let phase = |s: &Stage<MemoryDom, InMemoryHost>, i: usize| {
            s.dom().attribute(s.panels()[i], "data-scene-phase")
        };
        assert_eq!(phase(&s, 0).as_deref(), Some("exit"));
        assert_eq!(phase(&s, 1).as_deref(), Some("active"));
        assert_eq!(phase(&s, 2).as_deref(), Some("idle"));
    }

    #[test]
    fn rebuild_keeps_the_playhead_where_scrolling_left_it() {
        let mut s = stage(&["a", "b", "c"]);
        let range = s.scroll_range().unwrap();
        let duration = s.timeline().unwrap().duration();
        let b_active = s.timeline().unwrap().label_time("b-active").unwrap();
        s.on_scroll(range.offset_at((b_active + 0.05) / duration), ms(0));
        s.advance(ms(5_000));
        let before = s.timeline().unwrap().time();

        s.on_resize(ms(6_000));
        s.tick(ms(6_250)).unwrap();
        assert!(s.is_settled());
        assert!((s.timeline().unwrap().time() - before).abs() < 1e-9);
        assert_eq!(s.active_index(), Some(1));
        let phases: Vec<Option<String>> = s
            .panels()
            .iter()
            .map(|&p| s.dom().attribute(p, "data-scene-phase"))
            .collect();
        assert_eq!(
            phases,
            vec![Some("exit".to_owned()), Some("active".to_owned()), Some("idle".to_owned())]
        );
    }

    #[test]
    fn settled_advance_renders_nothing() {
        let mut s = stage(&["a", "b", "c"]);
        let range = s.scroll_range().unwrap();
        s.on_scroll(range.offset_at(0.4), ms(0));
        s.advance(ms(5_000));
        let applied = s.host().applied.len();
        s.advance(ms(6_000));
        s.advance(ms(7_000));
        assert_eq!(s.host().applied.len(), applied);
    }

    #[test]
    fn nav_click_jumps_to_enter_label() {
        let mut s = stage(&["a", "b", "c"]);
        let range = s.scroll_range().unwrap();
        let tl = s.timeline().unwrap();
        let expected = range.offset_at(tl.label_time("c-enter").unwrap() / tl.duration());
        let link = s
            .dom()
            .query_all(s.dom().document(), &Selector::fragment_links())[2];
        let outcome = s.on_click(link);
        assert_eq!(
            outcome,
            ClickOutcome::Jumped {
                top: expected,
                behavior: ScrollBehavior::Smooth
            }
        );
        assert!(outcome.prevents_default());
        assert_eq!(s.host().scrolls, vec![(expected, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn teardown_releases_binding_and_memory() {
        let mut s = stage(&["a"]);
        s.on_resize(ms(0));
        let (_, host) = s.teardown();
        assert_eq!(host.live_bindings(), 0);
        assert!(host.memory_cleared);
    }

    #[test]
    fn mobile_viewport_uses_instant_jumps() {
        let host = InMemoryHost::new(Viewport::new(390.0, 844.0));
        let mut s = Stage::init(page(&["a", "b"]), host, StageConfig::default()).unwrap();
        let link = s
            .dom()
            .query_all(s.dom().document(), &Selector::fragment_links())[1];
        match s.on_click(link) {
            ClickOutcome::Jumped { behavior, .. } => assert_eq!(behavior, ScrollBehavior::Auto),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.host().bindings[0].length, 844.0 * 2.0);
    }
}
