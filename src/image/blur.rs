//! Separable Gaussian blur restricted to a sub-region of an [`Image`].

use std::fmt;

use anyhow::ensure;

use super::{Image, Rect};

/// Size of a square blur kernel, in pixels.
///
/// Kernel sizes are always odd and positive, so that the kernel has a well-defined center pixel.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlurKernel(u32);

impl BlurKernel {
    /// The default kernel size of 51 pixels.
    pub const DEFAULT: Self = Self(51);

    /// Creates a blur kernel of `size x size` pixels.
    ///
    /// Returns an error if `size` is zero or even.
    pub fn new(size: u32) -> anyhow::Result<Self> {
        ensure!(size > 0, "blur kernel size must be positive");
        ensure!(
            size % 2 == 1,
            "blur kernel size must be an odd number (got {size})"
        );
        Ok(Self(size))
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.0
    }

    /// Returns the standard deviation of the Gaussian for this kernel size.
    ///
    /// This uses the same heuristic as OpenCV's `getGaussianKernel` when no explicit sigma is
    /// given, so a size of 51 results in a sigma of 8.
    pub fn sigma(&self) -> f32 {
        0.3 * ((self.0 as f32 - 1.0) * 0.5 - 1.0) + 0.8
    }

    /// Computes the normalized 1D kernel weights.
    fn weights(&self) -> Vec<f32> {
        let sigma = self.sigma();
        let center = (self.0 / 2) as f32;
        let mut weights = (0..self.0)
            .map(|i| {
                let d = i as f32 - center;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .collect::<Vec<_>>();
        let sum: f32 = weights.iter().sum();
        weights.iter_mut().for_each(|w| *w /= sum);
        weights
    }
}

impl Default for BlurKernel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Debug for BlurKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0} BlurKernel", self.0)
    }
}

/// Blurs the part of `image` covered by `rect`, in place.
///
/// Only pixels inside `rect` are read or written; the region is treated as if it were a standalone
/// image, with borders reflected around the edge pixel (`gfedcb|abcdefgh|gfedcba`).
///
/// `rect` is clamped to the image bounds first. If nothing remains, the image is left untouched and
/// `None` is returned, otherwise the blurred area is returned.
pub fn gaussian_blur(image: &mut Image, rect: Rect, kernel: BlurKernel) -> Option<Rect> {
    let rect = rect.intersection(&image.rect())?;
    // `intersection` with the image rect yields non-negative coordinates.
    let (x0, y0) = (rect.x() as u32, rect.y() as u32);
    let (w, h) = (rect.width() as usize, rect.height() as usize);

    let weights = kernel.weights();
    let radius = (weights.len() / 2) as i64;

    let mut region = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let px = image.buf[(x0 + x as u32, y0 + y as u32)].0;
            region.push(px.map(f32::from));
        }
    }

    // Horizontal pass.
    let mut tmp = vec![[0.0f32; 4]; w * h];
    for y in 0..h {
        let row = &region[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = [0.0; 4];
            for (k, weight) in weights.iter().enumerate() {
                let src = &row[reflect_101(x as i64 + k as i64 - radius, w)];
                for c in 0..4 {
                    acc[c] += src[c] * weight;
                }
            }
            tmp[y * w + x] = acc;
        }
    }

    // Vertical pass, written straight back into the image.
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0.0; 4];
            for (k, weight) in weights.iter().enumerate() {
                let src = &tmp[reflect_101(y as i64 + k as i64 - radius, h) * w + x];
                for c in 0..4 {
                    acc[c] += src[c] * weight;
                }
            }
            image.buf[(x0 + x as u32, y0 + y as u32)].0 =
                acc.map(|v| v.round().clamp(0.0, 255.0) as u8);
        }
    }

    Some(rect)
}

/// Maps an out-of-range index back into `0..len` by reflecting around the outermost element.
fn reflect_101(index: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as i64;
    let period = 2 * len - 2;
    let i = index.rem_euclid(period);
    (if i < len { i } else { period - i }) as usize
}
