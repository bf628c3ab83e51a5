//! Floating-point intensity field shared by the grayscale stages.

/// A `width` x `height` grid of luminance samples, stored row-major
/// (`index = y * width + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityField {
    width: usize,
    height: usize,
    samples: Vec<f32>,
}

impl IntensityField {
    /// Create a field filled with zeros.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Wrap an existing sample buffer. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_samples(width: usize, height: usize, samples: Vec<f32>) -> Option<Self> {
        (samples.len() == width * height).then_some(Self {
            width,
            height,
            samples,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Flat buffer index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.samples[self.index(x, y)]
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Smallest and largest sample, or `None` for an empty field.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let first = *self.samples.first()?;
        Some(
            self.samples
                .iter()
                .fold((first, first), |(lo, hi), &s| (lo.min(s), hi.max(s))),
        )
    }

    /// Whether every sample is exactly 0 or 255.
    pub fn is_binary(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0 || s == 255.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_checks_length() {
        assert!(IntensityField::from_samples(2, 2, vec![0.0; 4]).is_some());
        assert!(IntensityField::from_samples(2, 2, vec![0.0; 3]).is_none());
    }

    #[test]
    fn test_row_major_indexing() {
        let field = IntensityField::from_samples(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(field.index(2, 1), 5);
        assert_eq!(field.get(0, 1), 3.0);
        assert_eq!(field.get(2, 0), 2.0);
    }

    #[test]
    fn test_min_max() {
        let field = IntensityField::from_samples(2, 2, vec![40.0, -3.5, 200.0, 17.0]).unwrap();
        assert_eq!(field.min_max(), Some((-3.5, 200.0)));
        assert_eq!(IntensityField::new(0, 0).min_max(), None);
    }

    #[test]
    fn test_is_binary() {
        let binary = IntensityField::from_samples(3, 1, vec![0.0, 255.0, 0.0]).unwrap();
        let gray = IntensityField::from_samples(3, 1, vec![0.0, 254.9, 255.0]).unwrap();
        assert!(binary.is_binary());
        assert!(!gray.is_binary());
    }
}
