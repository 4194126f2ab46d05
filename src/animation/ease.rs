/// Easing functions used to map normalized tween progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Linear interpolation. Used for every dwell ("active") tween.
    Linear,
    /// Decelerating quadratic. Parallax enter travel.
    OutQuad,
    /// Quadratic ease in and out.
    InOutQuad,
    /// Decelerating cubic. Default for enter and exit tweens and the scrub.
    OutCubic,
    /// Decelerating quartic, the hero entrance.
    OutQuart,
    /// Sinusoidal ease in and out, for tone drifts.
    InOutSine,
}

impl Ease {
    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutSine => {
                if t == 0.0 || t == 1.0 {
                    // cos() leaves residue at the endpoints.
                    t
                } else {
                    -((std::f64::consts::PI * t).cos() - 1.0) / 2.0
                }
            }
        }
    }
}
