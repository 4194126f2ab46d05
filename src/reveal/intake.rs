use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::dom::{Dom, Selector};
use crate::foundation::core::NodeId;
use crate::profile::PhaseDurations;

use super::{RevealItem, RevealPlan, ToneTrack, ensure_child, heading_and_paragraph, recede, settle, stagger};

const STEPS: [(&str, &str); 3] = [
    ("request", "Incoming request captured in under 15 seconds"),
    ("processing", "AI checks urgency, vehicle data, and customer history"),
    ("card", "Service card generated automatically with 60% less admin time"),
];

/// Three-step intake diagram appended to the intake panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntakeFlow {
    /// Wrapper carrying `data-intake-flow`.
    pub flow: NodeId,
    /// Captured request step.
    pub request: Option<NodeId>,
    /// Processing step.
    pub processing: Option<NodeId>,
    /// Generated service card step.
    pub card: Option<NodeId>,
}

impl IntakeFlow {
    /// Present steps in diagram order.
    pub fn steps(&self) -> Vec<NodeId> {
        [self.request, self.processing, self.card]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Find the intake flow under `content` or build it.
///
/// An existing flow is reused as-is, even if some of its steps were removed.
pub fn ensure_intake_flow(dom: &mut impl Dom, content: NodeId) -> IntakeFlow {
    let existing = dom.query_first(content, &Selector::attr("data-intake-flow", "true"));
    let flow = match existing {
        Some(flow) => flow,
        None => {
            let flow = ensure_child(dom, content, "div", "intake-flow", ("data-intake-flow", "true"), None);
            for (step, text) in STEPS {
                ensure_child(
                    dom,
                    flow,
                    "div",
                    &format!("intake-step intake-step--{step}"),
                    ("data-intake-step", step),
                    Some(text),
                );
            }
            flow
        }
    };
    let step = |name: &str| dom.query_first(flow, &Selector::attr("data-intake-step", name));
    IntakeFlow {
        flow,
        request: step("request"),
        processing: step("processing"),
        card: step("card"),
    }
}

pub(super) fn plan(dom: &mut impl Dom, content: NodeId, phases: PhaseDurations) -> RevealPlan {
    let (heading, subtitle) = heading_and_paragraph(dom, content);
    let flow = ensure_intake_flow(dom, content);

    let tone = ToneTrack::new(
        &[
            ("--intake-glow", [0.24, 0.8, 0.95, 0.72]),
            ("--intake-darkness", [0.96, 0.66, 0.56, 0.62]),
            ("--intake-focus", [0.15, 0.72, 1.0, 0.86]),
        ],
        phases,
    );

    let mut items = Vec::new();
    let copy = [(heading, 18.0, 0.56, 0.04, -2.0), (subtitle, 16.0, 0.48, 0.07, -1.5)];
    for (target, rise, share, offset, drift) in copy {
        let Some(target) = target else { continue };
        items.push(RevealItem {
            target,
            from: PropSet::new().alpha(0.0).y(rise),
            enter: TweenVars::new(
                PropSet::new().alpha(1.0).y(0.0),
                phases.enter * share,
                Ease::OutCubic,
            ),
            enter_offset: offset,
            active: Some(settle(PropSet::new().alpha(1.0).y(drift), phases)),
            exit: None,
        });
    }

    for (i, target) in flow.steps().into_iter().enumerate() {
        let k = i as f64;
        items.push(RevealItem {
            target,
            from: PropSet::new().alpha(0.0).y(14.0 + k * 8.0).scale(0.99),
            enter: TweenVars::new(
                PropSet::new().alpha(1.0).y(0.0).scale(1.0),
                phases.enter * 0.45,
                Ease::OutCubic,
            ),
            enter_offset: stagger(0.08, 0.09, i),
            active: Some(settle(PropSet::new().alpha(1.0).y(-2.0).scale(1.0), phases)),
            exit: Some(recede(
                PropSet::new()
                    .alpha(if i < 2 { 0.84 } else { 0.9 })
                    .y(-4.0)
                    .scale(1.0),
                phases,
            )),
        });
    }

    RevealPlan { tone, items }
}
