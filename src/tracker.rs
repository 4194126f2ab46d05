use crate::animation::timeline::Timeline;
use crate::dom::{Dom, Selector};
use crate::foundation::core::NodeId;
use crate::scene::Scene;

/// Index of the scene whose enter label was most recently passed.
///
/// Scenes whose enter label is missing are skipped. The result is clamped to
/// `[0, scenes.len() - 1]` and is `0` for an empty scene list.
pub fn resolve_active_index(timeline: &Timeline, scenes: &[Scene]) -> usize {
    let now = timeline.time();
    let enter_time = |s: &Scene| timeline.label_time(&s.labels.enter);
    let mut resolved = 0;
    for (index, scene) in scenes.iter().enumerate() {
        let Some(enter) = enter_time(scene) else {
            continue;
        };
        if now < enter {
            break;
        }
        match scenes.get(index + 1).map(enter_time) {
            None => {
                resolved = index;
                break;
            }
            Some(next) if next.is_none_or(|next| now < next) => {
                resolved = index;
                break;
            }
            Some(_) => resolved = index + 1,
        }
    }
    resolved.min(scenes.len().saturating_sub(1))
}

/// Tracks the active section and mirrors it onto panel and nav attributes.
#[derive(Clone, Debug, Default)]
pub struct ActiveSection {
    index: Option<usize>,
}

impl ActiveSection {
    /// Currently active section, `None` before the first build.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Make `index` active. Re-setting the current index writes nothing.
    ///
    /// Returns whether anything changed.
    pub fn set(
        &mut self,
        dom: &mut impl Dom,
        panels: &[NodeId],
        nav_list: Option<NodeId>,
        index: usize,
    ) -> bool {
        if self.index == Some(index) {
            return false;
        }
        for (i, &panel) in panels.iter().enumerate() {
            dom.set_attribute(panel, "data-active", if i == index { "true" } else { "false" });
        }
        tracing::trace!(from = ?self.index, to = index, "active section changed");
        self.index = Some(index);
        self.sync_nav(dom, panels, nav_list);
        true
    }

    /// Put `aria-current` on the nav link pointing at the active panel only.
    pub fn sync_nav(&self, dom: &mut impl Dom, panels: &[NodeId], nav_list: Option<NodeId>) {
        let Some(nav_list) = nav_list else {
            return;
        };
        let active_href = self
            .index
            .and_then(|i| panels.get(i))
            .and_then(|&panel| dom.element_id(panel))
            .map(|id| format!("#{id}"));
        for link in dom.query_all(nav_list, &Selector::fragment_links()) {
            let href = dom.attribute(link, "href");
            if active_href.is_some() && href == active_href {
                dom.set_attribute(link, "aria-current", "true");
            } else {
                dom.remove_attribute(link, "aria-current");
            }
        }
    }
}
