//! Hue bookkeeping for merged bodies.
//!
//! Hues live on a circle of circumference [`HUE_RANGE`]. Two hues more than
//! half a turn apart are closer going the other way round, so the smaller one
//! is lifted by a full turn before averaging and the result is wrapped back.

pub const HUE_RANGE: f64 = 256.0;

/// A hue together with the mass that carries it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedHue {
    pub hue: f64,
    pub mass: f64,
}

impl WeightedHue {
    pub fn new(hue: f64, mass: f64) -> Self {
        Self { hue, mass }
    }
}

/// Mass-weighted average of two hues along the shorter arc of the circle.
///
/// Symmetric in its arguments. Hues within half a turn of each other are
/// averaged directly, without any modulo.
pub fn mix_hues(a: WeightedHue, b: WeightedHue) -> f64 {
    if (a.hue - b.hue).abs() > HUE_RANGE / 2.0 {
        let (a, b) = if a.hue < b.hue {
            (WeightedHue::new(a.hue + HUE_RANGE, a.mass), b)
        } else {
            (a, WeightedHue::new(b.hue + HUE_RANGE, b.mass))
        };
        return weighted_average(a, b).rem_euclid(HUE_RANGE);
    }
    weighted_average(a, b)
}

fn weighted_average(a: WeightedHue, b: WeightedHue) -> f64 {
    (a.hue * a.mass + b.hue * b.mass) / (a.mass + b.mass)
}
