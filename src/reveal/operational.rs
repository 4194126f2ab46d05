use crate::animation::ease::Ease;
use crate::animation::props::{PropSet, TweenVars};
use crate::dom::Dom;
use crate::foundation::core::NodeId;
use crate::profile::PhaseDurations;

use super::{RevealItem, RevealPlan, ToneTrack, heading_and_paragraph, recede, settle, stagger};

/// Tone levels and horizontal drift of one operational panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperationalPreset {
    /// Scene id the preset belongs to.
    pub name: &'static str,
    /// `--ops-glow` as `[from, enter, active, exit]`.
    pub glow: [f64; 4],
    /// `--ops-darkness`, same layout as `glow`.
    pub darkness: [f64; 4],
    /// `--ops-scan`, same layout as `glow`.
    pub scan: [f64; 4],
    /// Horizontal drift factor; the sign sets the direction.
    pub drift_x: f64,
}

/// Table order matters: the first entry is the fallback.
pub const OPERATIONAL_PRESETS: [OperationalPreset; 5] = [
    OperationalPreset {
        name: "parts",
        glow: [0.22, 0.74, 0.9, 0.68],
        darkness: [0.96, 0.74, 0.62, 0.7],
        scan: [0.08, 0.62, 0.92, 0.76],
        drift_x: 1.4,
    },
    OperationalPreset {
        name: "communication",
        glow: [0.16, 0.68, 0.82, 0.62],
        darkness: [0.98, 0.72, 0.6, 0.68],
        scan: [0.06, 0.66, 1.0, 0.84],
        drift_x: -1.5,
    },
    OperationalPreset {
        name: "command-center",
        glow: [0.24, 0.82, 1.0, 0.78],
        darkness: [0.96, 0.66, 0.52, 0.62],
        scan: [0.08, 0.78, 1.0, 0.86],
        drift_x: 1.8,
    },
    OperationalPreset {
        name: "transformation",
        glow: [0.24, 0.9, 1.05, 0.86],
        darkness: [0.95, 0.6, 0.46, 0.58],
        scan: [0.08, 0.72, 0.96, 0.8],
        drift_x: 1.2,
    },
    OperationalPreset {
        name: "cta",
        glow: [0.2, 0.82, 0.96, 0.9],
        darkness: [0.92, 0.56, 0.42, 0.5],
        scan: [0.06, 0.66, 0.82, 0.72],
        drift_x: -1.1,
    },
];

impl OperationalPreset {
    /// Preset for scene `id`, falling back to the first one.
    pub fn for_scene(id: &str) -> Self {
        OPERATIONAL_PRESETS
            .iter()
            .find(|p| p.name == id)
            .copied()
            .unwrap_or(OPERATIONAL_PRESETS[0])
    }
}

pub(super) fn plan(
    dom: &mut impl Dom,
    content: NodeId,
    phases: PhaseDurations,
    preset: OperationalPreset,
) -> RevealPlan {
    let tone = ToneTrack::new(
        &[
            ("--ops-glow", preset.glow),
            ("--ops-darkness", preset.darkness),
            ("--ops-scan", preset.scan),
        ],
        phases,
    );
    let drift = preset.drift_x;

    let (heading, paragraph) = heading_and_paragraph(dom, content);
    let items = heading
        .into_iter()
        .chain(paragraph)
        .enumerate()
        .map(|(i, target)| {
            let k = i as f64;
            RevealItem {
                target,
                from: PropSet::new()
                    .alpha(0.0)
                    .y(20.0 + k * 8.0)
                    .x(drift * (k + 1.0) * 1.6)
                    .scale(0.986),
                enter: TweenVars::new(
                    PropSet::new().alpha(1.0).y(0.0).x(0.0).scale(1.0),
                    phases.enter * 0.65,
                    Ease::OutCubic,
                ),
                enter_offset: stagger(0.06, 0.085, i),
                active: Some(settle(
                    PropSet::new()
                        .alpha(1.0)
                        .y(if i == 0 { -2.3 } else { -1.6 })
                        .x(drift * 0.32)
                        .scale(1.0),
                    phases,
                )),
                exit: Some(recede(
                    PropSet::new()
                        .alpha(if i == 0 { 0.9 } else { 0.84 })
                        .y(-4.0)
                        .x(drift * 0.25)
                        .scale(0.996),
                    phases,
                )),
            }
        })
        .collect();

    RevealPlan { tone, items }
}
