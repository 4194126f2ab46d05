use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::dom::Dom;
use crate::foundation::core::NodeId;
use crate::profile::PhaseDurations;

use super::{RevealItem, RevealPlan, ToneTrack, ensure_child, heading_and_paragraph, recede, settle};

/// Marker attribute identifying the synthetic hero call-to-action.
pub const HERO_CTA_MARKER: &str = "data-hero-cta";

/// Hero call-to-action link, created once per content container.
pub fn ensure_hero_cta(dom: &mut impl Dom, content: NodeId) -> NodeId {
    let cta = ensure_child(
        dom,
        content,
        "a",
        "hero-cta",
        (HERO_CTA_MARKER, "true"),
        Some("Book 30-min AI Blueprint"),
    );
    if dom.attribute(cta, "href").is_none() {
        dom.set_attribute(cta, "href", "#cta");
    }
    cta
}

pub(super) fn plan(dom: &mut impl Dom, content: NodeId, phases: PhaseDurations) -> RevealPlan {
    let (heading, subtitle) = heading_and_paragraph(dom, content);
    let cta = ensure_hero_cta(dom, content);

    let tone = ToneTrack::new(
        &[
            ("--hero-light", [0.0, 1.0, 1.08, 1.0]),
            ("--hero-darkness", [1.0, 0.25, 0.15, 0.32]),
        ],
        phases,
    );

    let shown = PropSet::new().alpha(1.0).y_percent(0.0).scale(1.0);
    let mut items = Vec::with_capacity(3);
    if let Some(heading) = heading {
        items.push(RevealItem {
            target: heading,
            from: PropSet::new().alpha(0.0).y_percent(12.0).scale(0.94),
            enter: TweenVars::new(shown.clone(), phases.enter * 0.78, Ease::OutQuart),
            enter_offset: 0.04,
            active: Some(settle(shown.clone().y_percent(-1.0), phases)),
            exit: None,
        });
    }
    if let Some(subtitle) = subtitle {
        items.push(RevealItem {
            target: subtitle,
            from: PropSet::new().alpha(0.0).y_percent(16.0).scale(0.98),
            enter: TweenVars::new(shown.clone(), phases.enter * 0.62, Ease::OutCubic),
            enter_offset: 0.08,
            active: Some(settle(shown.clone().y_percent(-0.4), phases)),
            exit: None,
        });
    }
    items.push(RevealItem {
        target: cta,
        from: PropSet::new().alpha(0.0).y_percent(18.0).scale(0.975),
        enter: TweenVars::new(shown.clone(), phases.enter * 0.56, Ease::OutCubic),
        enter_offset: 0.1,
        active: Some(settle(shown, phases)),
        exit: Some(recede(
            PropSet::new().alpha(0.85).y_percent(-2.0).scale(0.995),
            phases,
        )),
    });

    RevealPlan { tone, items }
}
