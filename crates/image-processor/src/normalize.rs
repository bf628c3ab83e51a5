//! Contrast stretching of an intensity field.

use tracing::debug;

use crate::field::IntensityField;

/// Full-scale intensity after stretching.
const MAX_INTENSITY: f32 = 255.0;

/// Stretch samples linearly so the darkest maps to 0 and the lightest to 255.
///
/// A uniform field has no contrast to stretch and is left untouched. Returns
/// the observed `(min, max)` range, or `None` for an empty field.
pub fn normalize(field: &mut IntensityField) -> Option<(f32, f32)> {
    let (min, max) = field.min_max()?;
    let range = max - min;

    if range > 0.0 {
        debug!(min, max, "Stretching contrast to full range");
        for sample in field.samples_mut() {
            *sample = (*sample - min) / range * MAX_INTENSITY;
        }
    } else {
        debug!(value = min, "Uniform image, skipping contrast stretch");
    }

    Some((min, max))
}
