//! Heading + paragraph lists revealed with a fixed stagger.

use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::dom::Dom;
use crate::foundation::core::NodeId;
use crate::profile::PhaseDurations;

use super::{RevealItem, RevealPlan, ToneTrack, heading_and_paragraph, recede, settle, stagger};

fn list_items(dom: &impl Dom, content: NodeId) -> Vec<NodeId> {
    let (heading, paragraph) = heading_and_paragraph(dom, content);
    heading.into_iter().chain(paragraph).collect()
}

pub(super) fn problems(dom: &mut impl Dom, content: NodeId, phases: PhaseDurations) -> RevealPlan {
    let tone = ToneTrack::new(
        &[
            ("--problems-darkness", [1.0, 0.88, 0.8, 0.9]),
            ("--problems-accent", [0.65, 0.85, 1.0, 0.75]),
        ],
        phases,
    );
    let items = list_items(dom, content)
        .into_iter()
        .enumerate()
        .map(|(i, target)| {
            let k = i as f64;
            RevealItem {
                target,
                from: PropSet::new().alpha(0.0).y(24.0 + k * 12.0),
                enter: TweenVars::new(
                    PropSet::new().alpha(1.0).y(0.0),
                    phases.enter * 0.7,
                    Ease::OutCubic,
                ),
                enter_offset: stagger(0.06, 0.08, i),
                active: Some(settle(PropSet::new().alpha(1.0).y(-4.0), phases)),
                exit: Some(recede(
                    PropSet::new().alpha(if i == 0 { 0.78 } else { 0.72 }).y(-8.0),
                    phases,
                )),
            }
        })
        .collect();
    RevealPlan { tone, items }
}

pub(super) fn activation(dom: &mut impl Dom, content: NodeId, phases: PhaseDurations) -> RevealPlan {
    let tone = ToneTrack::new(
        &[
            ("--activation-glow", [0.2, 0.88, 1.0, 0.72]),
            ("--activation-darkness", [0.98, 0.62, 0.5, 0.58]),
            ("--activation-scan", [0.05, 0.72, 1.0, 0.85]),
        ],
        phases,
    );
    let items = list_items(dom, content)
        .into_iter()
        .enumerate()
        .map(|(i, target)| {
            let k = i as f64;
            RevealItem {
                target,
                from: PropSet::new().alpha(0.0).y(16.0 + k * 10.0).scale(0.985),
                enter: TweenVars::new(
                    PropSet::new().alpha(1.0).y(0.0).scale(1.0),
                    phases.enter * 0.72,
                    Ease::OutCubic,
                ),
                enter_offset: stagger(0.06, 0.09, i),
                active: Some(settle(
                    PropSet::new()
                        .alpha(1.0)
                        .y(if i == 0 { -1.5 } else { -1.0 })
                        .scale(1.0),
                    phases,
                )),
                exit: Some(recede(PropSet::new().alpha(0.9).y(-3.0).scale(1.0), phases)),
            }
        })
        .collect();
    RevealPlan { tone, items }
}
