use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::dom::{Dom, Selector};
use crate::foundation::core::NodeId;
use crate::profile::PhaseDurations;

use super::{RevealItem, RevealPlan, ToneTrack, ensure_child, heading_and_paragraph, recede, settle, stagger};

const PART: &str = "data-planning-part";

const PIECES: [&str; 3] = [
    "Job block A - same day diagnostics",
    "Job block B - high-margin maintenance",
    "Job block C - pickup-ready repairs",
];

const SLOTS: [&str; 3] = [
    "Slot 1 - Priority intake (0-2h)",
    "Slot 2 - Parts preparation (-40% waiting)",
    "Slot 3 - Delivery window with customer ETA",
];

/// Scatter offsets `(x, y, rotation)` the pieces fly in from.
const PIECE_OFFSETS: [(f64, f64, f64); 3] = [(-32.0, 20.0, -4.0), (26.0, 18.0, 3.0), (18.0, -22.0, 5.0)];

/// Source card, job pieces and timeline slots of the planning board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanningFlow {
    /// Wrapper carrying `data-planning-flow`.
    pub flow: NodeId,
    /// Card the pieces start from.
    pub source_card: Option<NodeId>,
    /// Job pieces in slot order.
    pub pieces: Vec<NodeId>,
    /// Slot strip.
    pub timeline: Option<NodeId>,
    /// Timeline slots the pieces land in.
    pub slots: Vec<NodeId>,
}

/// Find the planning board under `content` or build it.
pub fn ensure_planning_flow(dom: &mut impl Dom, content: NodeId) -> PlanningFlow {
    let flow = match dom.query_first(content, &Selector::attr("data-planning-flow", "true")) {
        Some(flow) => flow,
        None => build_flow(dom, content),
    };
    PlanningFlow {
        flow,
        source_card: dom.query_first(flow, &Selector::attr(PART, "source-card")),
        pieces: dom.query_all(flow, &Selector::attr(PART, "piece")),
        timeline: dom.query_first(flow, &Selector::attr(PART, "timeline")),
        slots: dom.query_all(flow, &Selector::attr(PART, "timeline-slot")),
    }
}

fn build_flow(dom: &mut impl Dom, content: NodeId) -> NodeId {
    let flow = ensure_child(dom, content, "div", "planning-flow", ("data-planning-flow", "true"), None);
    ensure_child(
        dom,
        flow,
        "div",
        "planning-source-card",
        (PART, "source-card"),
        Some("Ready card moved from intake to planning board"),
    );

    let board = dom.create_element("div");
    dom.set_attribute(board, "class", "planning-board");
    for label in PIECES {
        append_part(dom, board, "planning-piece", "piece", label);
    }
    dom.append_child(flow, board);

    let timeline = ensure_child(dom, flow, "div", "planning-timeline", (PART, "timeline"), None);
    for label in SLOTS {
        append_part(dom, timeline, "planning-slot", "timeline-slot", label);
    }
    flow
}

fn append_part(dom: &mut impl Dom, parent: NodeId, class: &str, part: &str, text: &str) {
    let node = dom.create_element("div");
    dom.set_attribute(node, "class", class);
    dom.set_attribute(node, PART, part);
    dom.set_text(node, text);
    dom.append_child(parent, node);
}

pub(super) fn plan(dom: &mut impl Dom, content: NodeId, phases: PhaseDurations) -> RevealPlan {
    let (heading, subtitle) = heading_and_paragraph(dom, content);
    let flow = ensure_planning_flow(dom, content);

    let tone = ToneTrack::new(
        &[
            ("--planning-grid", [0.12, 0.72, 1.0, 0.82]),
            ("--planning-focus", [0.14, 0.7, 1.0, 0.84]),
            ("--planning-darkness", [0.96, 0.68, 0.58, 0.64]),
        ],
        phases,
    );
    let entered = |share: f64, props: PropSet| TweenVars::new(props, phases.enter * share, Ease::OutCubic);

    let mut items = Vec::new();
    for (target, rise, share, offset) in [(heading, 16.0, 0.54, 0.04), (subtitle, 14.0, 0.48, 0.07)] {
        let Some(target) = target else { continue };
        items.push(RevealItem {
            target,
            from: PropSet::new().alpha(0.0).y(rise),
            enter: entered(share, PropSet::new().alpha(1.0).y(0.0)),
            enter_offset: offset,
            active: None,
            exit: None,
        });
    }

    if let Some(card) = flow.source_card {
        items.push(RevealItem {
            target: card,
            from: PropSet::new().alpha(0.0).y(20.0).scale(0.97),
            enter: entered(0.5, PropSet::new().alpha(1.0).y(0.0).scale(1.0)),
            enter_offset: 0.08,
            active: Some(settle(PropSet::new().alpha(0.92).y(-7.0).scale(0.985), phases)),
            exit: Some(recede(PropSet::new().alpha(0.86).y(-10.0).scale(0.98), phases)),
        });
    }

    for (i, &piece) in flow.pieces.iter().enumerate() {
        let (x, y, rotation) = PIECE_OFFSETS[i % PIECE_OFFSETS.len()];
        items.push(RevealItem {
            target: piece,
            from: PropSet::new()
                .alpha(0.0)
                .x(x)
                .y(y)
                .rotation(rotation)
                .scale(0.98),
            enter: entered(
                0.44,
                PropSet::new().alpha(1.0).x(0.0).y(0.0).rotation(0.0).scale(1.0),
            ),
            enter_offset: stagger(0.09, 0.07, i),
            active: Some(settle(
                PropSet::new()
                    .alpha(1.0)
                    .x(i as f64 - 1.0)
                    .y(-2.0)
                    .rotation(0.0)
                    .scale(1.0),
                phases,
            )),
            exit: Some(recede(
                PropSet::new().alpha(0.9).y(-4.0).rotation(0.0).scale(1.0),
                phases,
            )),
        });
    }

    let last_slot = flow.slots.len().saturating_sub(1);
    for (i, &slot) in flow.slots.iter().enumerate() {
        items.push(RevealItem {
            target: slot,
            from: PropSet::new().alpha(0.0).x(20.0 + i as f64 * 4.0).y(8.0),
            enter: entered(0.42, PropSet::new().alpha(1.0).x(0.0).y(0.0)),
            enter_offset: stagger(0.08, 0.06, i),
            active: Some(settle(PropSet::new().alpha(1.0).x(0.0).y(-1.0), phases)),
            exit: Some(recede(
                PropSet::new()
                    .alpha(if i == last_slot { 0.94 } else { 0.86 })
                    .x(0.0)
                    .y(-3.0),
                phases,
            )),
        });
    }

    RevealPlan { tone, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::props::Prop;
    use crate::dom::MemoryDom;

    fn content() -> (MemoryDom, NodeId) {
        let mut dom = MemoryDom::new();
        let doc = dom.document();
        let c = dom.element(doc, "div", &[]);
        dom.element(c, "h2", &[]);
        dom.element(c, "p", &[]);
        (dom, c)
    }

    #[test]
    fn board_is_built_once() {
        let (mut dom, c) = content();
        let first = ensure_planning_flow(&mut dom, c);
        let nodes = dom.len();
        let second = ensure_planning_flow(&mut dom, c);
        assert_eq!(first, second);
        assert_eq!(dom.len(), nodes);
        assert_eq!(first.pieces.len(), 3);
        assert_eq!(first.slots.len(), 3);
        assert!(first.source_card.is_some());

        let board = dom.parent(first.pieces[0]).unwrap();
        assert_eq!(dom.attribute(board, "class").as_deref(), Some("planning-board"));
        assert_eq!(dom.parent(first.slots[2]), first.timeline);
    }

    #[test]
    fn plan_orders_copy_card_pieces_slots() {
        let (mut dom, c) = content();
        let phases = PhaseDurations {
            enter: 0.2,
            active: 0.6,
            exit: 0.2,
        };
        let plan = plan(&mut dom, c, phases);
        assert_eq!(plan.items.len(), 9);
        let offsets: Vec<f64> = plan.items.iter().map(|i| i.enter_offset).collect();
        assert_eq!(offsets, vec![0.04, 0.07, 0.08, 0.09, 0.07, 0.07, 0.08, 0.06, 0.06]);

        let third_piece = &plan.items[5];
        assert_eq!(third_piece.from.get(&Prop::Rotation), Some(5.0));
        assert_eq!(
            third_piece.active.as_ref().and_then(|a| a.props.get(&Prop::X)),
            Some(1.0)
        );

        let last_slot = &plan.items[8];
        assert_eq!(
            last_slot.exit.as_ref().and_then(|e| e.props.get(&Prop::AutoAlpha)),
            Some(0.94)
        );
    }
}
