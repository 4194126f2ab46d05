use std::time::Duration;

use cinescroll::{
    ClickOutcome, Dom, InMemoryHost, MemoryDom, MotionTier, NodeId, PageSpec, Pose, Prop,
    RuntimeProfile, ScrollBehavior, Selector, Stage, StageConfig, Viewport, assemble,
    build_scenes, resolve_active_index,
};

const PAGE: &str = include_str!("data/page.json");

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn dom() -> MemoryDom {
    PageSpec::from_json_str(PAGE)
        .unwrap()
        .build_dom(&StageConfig::default())
}

fn stage_with(host: InMemoryHost) -> Stage<MemoryDom, InMemoryHost> {
    Stage::init(dom(), host, StageConfig::default()).unwrap()
}

fn active_flags<D: Dom>(s: &Stage<D, InMemoryHost>) -> Vec<bool> {
    s.panels()
        .iter()
        .map(|&p| s.dom().attribute(p, "data-active").as_deref() == Some("true"))
        .collect()
}

/// Scroll so the playhead lands at timeline time `t` and let the scrub settle.
fn scroll_to_time<D: Dom>(s: &mut Stage<D, InMemoryHost>, t: f64, at: Duration) {
    let range = s.scroll_range().unwrap();
    let duration = s.timeline().unwrap().duration();
    s.on_scroll(range.offset_at(t / duration), at);
    s.advance(at + Duration::from_secs(5));
}

fn current_links<D: Dom>(s: &Stage<D, InMemoryHost>) -> Vec<usize> {
    let list = s
        .dom()
        .query_first(s.dom().document(), &Selector::class("nav-list"))
        .unwrap();
    s.dom()
        .query_all(list, &Selector::fragment_links())
        .iter()
        .enumerate()
        .filter(|&(_, &l)| s.dom().attribute(l, "aria-current").is_some())
        .map(|(i, _)| i)
        .collect()
}

fn phases<D: Dom>(s: &Stage<D, InMemoryHost>) -> Vec<Option<String>> {
    s.panels()
        .iter()
        .map(|&p| s.dom().attribute(p, "data-scene-phase"))
        .collect()
}

/// [`MemoryDom`] that keeps every `data-scene-phase` write in order.
#[derive(Debug)]
struct PhaseLog {
    inner: MemoryDom,
    writes: Vec<(NodeId, String)>,
}

impl Dom for PhaseLog {
    fn document(&self) -> NodeId {
        self.inner.document()
    }
    fn tag(&self, node: NodeId) -> Option<&str> {
        self.inner.tag(node)
    }
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.children(node)
    }
    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.attribute(node, name)
    }
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "data-scene-phase" {
            self.writes.push((node, value.to_owned()));
        }
        self.inner.set_attribute(node, name, value);
    }
    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        self.inner.remove_attribute(node, name);
    }
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.inner.create_element(tag)
    }
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.inner.append_child(parent, child);
    }
    fn set_text(&mut self, node: NodeId, text: &str) {
        self.inner.set_text(node, text);
    }
    fn text(&self, node: NodeId) -> Option<String> {
        self.inner.text(node)
    }
}

#[test]
fn desktop_page_assembles_three_labels_per_scene() {
    let s = stage_with(InMemoryHost::default());
    let summary = s.summary().unwrap();
    assert_eq!(summary.scenes, 10);
    assert_eq!(summary.labels.len(), 30);
    assert_eq!(summary.tweens.shift, 9);
    assert_eq!(summary.tweens.hold, 1);
    assert_eq!(summary.tweens.tone, 30);
    assert_eq!(summary.tweens.motion, 0);
    assert!((summary.duration - 10.2).abs() < 1e-9);

    let tl = s.timeline().unwrap();
    let enters: Vec<f64> = s
        .scenes()
        .iter()
        .map(|scene| tl.label_time(&scene.labels.enter).unwrap())
        .collect();
    assert!(enters.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(s.host().bindings[0].length, 900.0 * 10.0);
}

#[test]
fn exact_enter_label_resolves_that_scene() {
    let mut dom = dom();
    let doc = dom.document();
    let root = dom.query_first(doc, &Selector::id("scroll-root")).unwrap();
    let panels = dom.query_all(root, &Selector::class("panel"));
    let profile = RuntimeProfile::from_flags(false, false);
    let scenes = build_scenes(&mut dom, &panels, "panel-content", &profile);
    let mut host = InMemoryHost::default();
    let mut tl = assemble(&mut host, &scenes, &panels, &profile).unwrap();

    let planning = tl.label_time("planning-enter").unwrap();
    tl.seek(planning);
    assert_eq!(resolve_active_index(&tl, &scenes), 4);

    tl.seek(planning - 1e-6);
    assert_eq!(resolve_active_index(&tl, &scenes), 3);

    tl.seek(tl.duration());
    assert_eq!(resolve_active_index(&tl, &scenes), 9);
}

#[test]
fn scrolling_into_fifth_scene_marks_only_that_panel() {
    let mut s = stage_with(InMemoryHost::default());
    let enter = s.timeline().unwrap().label_time("planning-enter").unwrap();
    scroll_to_time(&mut s, enter + 0.001, ms(0));

    assert_eq!(s.active_index(), Some(4));
    let flags = active_flags(&s);
    assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    assert!(flags[4]);
    assert_eq!(
        s.dom().attribute(s.panels()[4], "data-scene-phase").as_deref(),
        Some("enter")
    );
    assert_eq!(
        s.dom().attribute(s.panels()[3], "data-scene-phase").as_deref(),
        Some("exit")
    );

    assert_eq!(current_links(&s), vec![4]);
}

#[test]
fn panels_shift_one_viewport_per_finished_scene() {
    let mut s = stage_with(InMemoryHost::default());
    let enter = s.timeline().unwrap().label_time("planning-enter").unwrap();
    scroll_to_time(&mut s, enter + 0.001, ms(0));

    let panel: NodeId = s.panels()[0];
    let y = s.host().last_value(panel, &Prop::YPercent).unwrap();
    assert!((y + 400.0).abs() < 1e-6, "{y}");

    let tl = s.timeline().unwrap();
    let pose = Pose::from_props(&tl.sample(panel, tl.time()));
    let offset = pose.to_affine(Viewport::default().size()).translation();
    assert!((offset.y + 3600.0).abs() < 1e-6, "{offset:?}");
    assert!(offset.x.abs() < 1e-9);
}

#[test]
fn settled_playhead_writes_nothing_more() {
    let mut s = stage_with(InMemoryHost::default());
    scroll_to_time(&mut s, 2.5, ms(0));
    let writes = s.dom().attribute_writes();
    let applied = s.host().applied.len();
    s.advance(ms(20_000));
    s.advance(ms(30_000));
    assert_eq!(s.dom().attribute_writes(), writes);
    assert_eq!(s.host().applied.len(), applied);
    assert!(s.is_settled());
}

#[test]
fn past_the_end_clamps_to_last_scene() {
    let mut s = stage_with(InMemoryHost::default());
    let range = s.scroll_range().unwrap();
    s.on_scroll(range.end + 5_000.0, ms(0));
    s.advance(ms(10_000));
    assert_eq!(s.active_index(), Some(9));
    assert_eq!(
        s.dom().attribute(s.panels()[9], "data-scene-phase").as_deref(),
        Some("exit")
    );
}

#[test]
fn scrolling_back_replays_phases_in_reverse() {
    let mut s = stage_with(InMemoryHost::default());
    let tl = s.timeline().unwrap();
    let far = tl.label_time("parts-active").unwrap() + 0.1;
    let back = tl.label_time("problems-active").unwrap() + 0.1;
    scroll_to_time(&mut s, far, ms(0));
    assert_eq!(s.active_index(), Some(5));

    scroll_to_time(&mut s, back, ms(10_000));
    assert_eq!(s.active_index(), Some(1));
    // Reverse crossings replay the calls, so the last one seen wins.
    assert_eq!(
        s.dom().attribute(s.panels()[1], "data-scene-phase").as_deref(),
        Some("exit")
    );
    assert_eq!(
        s.dom().attribute(s.panels()[2], "data-scene-phase").as_deref(),
        Some("enter")
    );
}

#[test]
fn nav_click_scrolls_to_the_enter_label_fraction() {
    let mut s = stage_with(InMemoryHost::default());
    let range = s.scroll_range().unwrap();
    let tl = s.timeline().unwrap();
    let t = tl.label_time("intake-enter").unwrap();
    let expected = range.start + (range.end - range.start) * (t / tl.duration());

    let list = s
        .dom()
        .query_first(s.dom().document(), &Selector::class("nav-list"))
        .unwrap();
    let link = s.dom().query_all(list, &Selector::fragment_links())[3];
    match s.on_click(link) {
        ClickOutcome::Jumped { top, behavior } => {
            assert!((top - expected).abs() < 1e-9);
            assert_eq!(behavior, ScrollBehavior::Smooth);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(s.host().scrolls.len(), 1);
}

#[test]
fn in_content_cta_link_is_left_alone() {
    let mut s = stage_with(InMemoryHost::default());
    let hero = s.panels()[0];
    let cta = s
        .dom()
        .query_first(hero, &Selector::attr("data-hero-cta", "true"))
        .unwrap();
    assert_eq!(s.on_click(cta), ClickOutcome::Ignored);
    assert!(s.host().scrolls.is_empty());
}

#[test]
fn reduced_motion_shortens_everything() {
    let mut host = InMemoryHost::default();
    host.reduced_motion = true;
    let mut s = stage_with(host);
    let profile = *s.profile().unwrap();
    assert_eq!(profile.tier(), MotionTier::ReducedMotion);
    assert_eq!(s.host().bindings[0].scrub, 0.35);
    let duration = s.timeline().unwrap().duration();
    assert!((duration - (10.0 * 0.52 + 0.12)).abs() < 1e-9);

    let link = s
        .dom()
        .query_all(s.dom().document(), &Selector::fragment_links())[1];
    match s.on_click(link) {
        ClickOutcome::Jumped { behavior, .. } => assert_eq!(behavior, ScrollBehavior::Auto),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn resize_round_trip_restores_the_desktop_build() {
    let mut s = stage_with(InMemoryHost::default());
    let desktop = *s.profile().unwrap();
    let summary = s.summary().unwrap();
    let nodes = s.dom().len();

    s.host_mut().viewport = Viewport::new(390.0, 844.0);
    s.on_resize(ms(0));
    s.tick(ms(250)).unwrap();
    assert_eq!(s.profile().unwrap().tier(), MotionTier::Mobile);
    assert_eq!(s.host().live_bindings(), 1);

    s.host_mut().viewport = Viewport::default();
    s.on_resize(ms(1_000));
    s.tick(ms(1_250)).unwrap();
    assert_eq!(*s.profile().unwrap(), desktop);
    assert_eq!(s.summary().unwrap(), summary);
    assert_eq!(s.dom().len(), nodes, "rebuilds must not duplicate injected markup");
    assert_eq!(s.host().bindings.len(), 3);
    assert_eq!(s.host().live_bindings(), 1);
    assert_eq!(s.host().refreshes, 2);
}

#[test]
fn active_section_survives_a_rebuild() {
    let log = PhaseLog {
        inner: dom(),
        writes: Vec::new(),
    };
    let mut s = Stage::init(log, InMemoryHost::default(), StageConfig::default()).unwrap();
    scroll_to_time(&mut s, 6.5, ms(0));
    assert_eq!(s.active_index(), Some(6));
    let settled = phases(&s);
    let time = s.timeline().unwrap().time();
    let mark = s.dom().writes.len();

    s.on_resize(ms(6_000));
    s.tick(ms(6_300)).unwrap();

    assert!(s.is_settled());
    assert!((s.timeline().unwrap().time() - time).abs() < 1e-9);
    assert_eq!(s.active_index(), Some(6));
    let flags = active_flags(&s);
    assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    assert!(flags[6]);
    assert_eq!(current_links(&s), vec![6]);
    assert_eq!(phases(&s), settled);
    let y = s.host().last_value(s.panels()[0], &Prop::YPercent).unwrap();
    assert!((y + 600.0).abs() < 1e-6, "{y}");

    // Scene setup resets every panel to idle; after that each panel gets at
    // most its final phase, never the ones crossed on the way there.
    for (i, &panel) in s.panels().iter().enumerate() {
        let seen: Vec<&str> = s.dom().writes[mark..]
            .iter()
            .filter(|(node, value)| *node == panel && value != "idle")
            .map(|(_, value)| value.as_str())
            .collect();
        match settled[i].as_deref() {
            Some("idle") => assert!(seen.is_empty(), "panel {i}: {seen:?}"),
            last => assert_eq!(seen.last().copied(), last, "panel {i}"),
        }
        assert!(seen.len() <= 1, "panel {i}: {seen:?}");
    }

    let writes = s.dom().writes.len();
    s.advance(ms(20_000));
    assert_eq!(s.dom().writes.len(), writes);
}

#[test]
fn teardown_hands_back_clean_host() {
    let mut s = stage_with(InMemoryHost::default());
    s.on_resize(ms(0));
    let (dom, host) = s.teardown();
    assert_eq!(host.live_bindings(), 0);
    assert!(host.memory_cleared);
    assert!(!dom.is_empty());
}
