use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::foundation::core::{Affine, Size, Vec2};

/// Animatable element property.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Prop {
    /// Opacity that also toggles `visibility: hidden` at zero.
    AutoAlpha,
    /// Pixels.
    X,
    /// Pixels.
    Y,
    /// Percent of the element's own width.
    XPercent,
    /// Percent of the element's own height.
    YPercent,
    /// Uniform scale factor.
    Scale,
    /// Degrees.
    Rotation,
    /// CSS custom property, name including the leading `--`.
    Var(String),
}

impl Prop {
    /// Value an element is assumed to carry before anything wrote the property.
    pub fn neutral(&self) -> f64 {
        match self {
            Self::AutoAlpha | Self::Scale => 1.0,
            Self::X | Self::Y | Self::XPercent | Self::YPercent | Self::Rotation => 0.0,
            Self::Var(_) => 0.0,
        }
    }
}

/// Ordered property -> value map.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropSet(BTreeMap<Prop, f64>);

impl PropSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `prop`, replacing any earlier value.
    pub fn with(mut self, prop: Prop, value: f64) -> Self {
        self.0.insert(prop, value);
        self
    }

    /// Shorthand for [`Prop::AutoAlpha`].
    pub fn alpha(self, v: f64) -> Self {
        self.with(Prop::AutoAlpha, v)
    }

    /// Shorthand for [`Prop::X`].
    pub fn x(self, v: f64) -> Self {
        self.with(Prop::X, v)
    }

    /// Shorthand for [`Prop::Y`].
    pub fn y(self, v: f64) -> Self {
        self.with(Prop::Y, v)
    }

    /// Shorthand for [`Prop::YPercent`].
    pub fn y_percent(self, v: f64) -> Self {
        self.with(Prop::YPercent, v)
    }

    /// Shorthand for [`Prop::Scale`].
    pub fn scale(self, v: f64) -> Self {
        self.with(Prop::Scale, v)
    }

    /// Shorthand for [`Prop::Rotation`].
    pub fn rotation(self, v: f64) -> Self {
        self.with(Prop::Rotation, v)
    }

    /// Shorthand for a CSS custom property.
    pub fn var(self, name: &str, v: f64) -> Self {
        self.with(Prop::Var(name.to_owned()), v)
    }

    /// In-place [`PropSet::with`].
    pub fn insert(&mut self, prop: Prop, value: f64) {
        self.0.insert(prop, value);
    }

    /// Value for `prop`, if set.
    pub fn get(&self, prop: &Prop) -> Option<f64> {
        self.0.get(prop).copied()
    }

    /// Properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Prop, f64)> {
        self.0.iter().map(|(p, v)| (p, *v))
    }

    /// Property names in key order.
    pub fn keys(&self) -> impl Iterator<Item = &Prop> {
        self.0.keys()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Prop, f64)> for PropSet {
    fn from_iter<I: IntoIterator<Item = (Prop, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Target state plus timing for a single tween.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenVars {
    /// End values.
    pub props: PropSet,
    /// Seconds.
    pub duration: f64,
    /// Easing applied over `duration`.
    pub ease: Ease,
}

impl TweenVars {
    /// Bundle `props` with timing.
    pub fn new(props: PropSet, duration: f64, ease: Ease) -> Self {
        Self {
            props,
            duration,
            ease,
        }
    }
}

/// Linear interpolation between two values of the same kind.
pub trait Lerp: Sized {
    /// Value at `t` between `a` (0) and `b` (1).
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Resolved 2D transform state of one element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    /// Pixels.
    pub x: f64,
    /// Pixels.
    pub y: f64,
    /// Percent of the box width.
    pub x_percent: f64,
    /// Percent of the box height.
    pub y_percent: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Opacity, clamped to `[0, 1]`.
    pub alpha: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            x_percent: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            rotation_deg: 0.0,
            alpha: 1.0,
        }
    }
}

impl Pose {
    /// Read a pose out of `props`, defaulting anything missing.
    pub fn from_props(props: &PropSet) -> Self {
        let d = Self::default();
        Self {
            x: props.get(&Prop::X).unwrap_or(d.x),
            y: props.get(&Prop::Y).unwrap_or(d.y),
            x_percent: props.get(&Prop::XPercent).unwrap_or(d.x_percent),
            y_percent: props.get(&Prop::YPercent).unwrap_or(d.y_percent),
            scale: props.get(&Prop::Scale).unwrap_or(d.scale),
            rotation_deg: props.get(&Prop::Rotation).unwrap_or(d.rotation_deg),
            alpha: props.get(&Prop::AutoAlpha).unwrap_or(d.alpha).clamp(0.0, 1.0),
        }
    }

    /// Element-space affine for a box of size `size`, rotating and scaling
    /// about the box center.
    pub fn to_affine(self, size: Size) -> Affine {
        let offset = Vec2::new(
            self.x + self.x_percent / 100.0 * size.width,
            self.y + self.y_percent / 100.0 * size.height,
        );
        let center = Vec2::new(size.width / 2.0, size.height / 2.0);
        Affine::translate(offset)
            * Affine::translate(center)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate(-center)
    }
}
