//! Bilinear resampling onto a common grid.
//!
//! Border handling clamps to the last row/column. There is no wrap or
//! mirror, so texels at one edge never bleed into the opposite edge of a
//! packed texture.

use std::borrow::Cow;

use crate::bitmap::{Bitmap, MISSING_CHANNEL_VALUE};

/// Precomputed horizontal or vertical sampling positions.
struct Taps {
    lo: Vec<u32>,
    hi: Vec<u32>,
    frac: Vec<f32>,
}

impl Taps {
    fn new(target: u32, source: u32) -> Self {
        let mut lo = Vec::with_capacity(target as usize);
        let mut hi = Vec::with_capacity(target as usize);
        let mut frac = Vec::with_capacity(target as usize);
        let last = source - 1;

        for i in 0..target {
            let s = i as f64 / target as f64 * source as f64;
            let i0 = (s.floor() as u32).min(last);
            lo.push(i0);
            hi.push((i0 + 1).min(last));
            frac.push((s - i0 as f64) as f32);
        }

        Self { lo, hi, frac }
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Resample `bitmap` to `width` x `height`.
///
/// Returns the input unchanged when the size already matches. Otherwise a
/// color source comes back with 4 channels: a 3-channel source gains an
/// opaque alpha. Grayscale sources (1 or 2 channels) keep their channel
/// count so that readers can still tell gray from color.
pub fn resample(bitmap: &Bitmap, width: u32, height: u32) -> Cow<'_, Bitmap> {
    if bitmap.dimensions() == (width, height) {
        return Cow::Borrowed(bitmap);
    }

    // A source with no pixels samples like one with no channels.
    if bitmap.is_empty() {
        return Cow::Owned(Bitmap::filled(width, height, [MISSING_CHANNEL_VALUE; 4]));
    }

    let channels = if bitmap.channels() < 3 {
        bitmap.channels()
    } else {
        4
    };
    let mut out = Bitmap::zeroed(width, height, channels);
    if width == 0 || height == 0 {
        return Cow::Owned(out);
    }

    let xs = Taps::new(width, bitmap.width());
    let ys = Taps::new(height, bitmap.height());

    for y in 0..height as usize {
        let (y0, y1, fy) = (ys.lo[y], ys.hi[y], ys.frac[y]);
        for x in 0..width as usize {
            let (x0, x1, fx) = (xs.lo[x], xs.hi[x], xs.frac[x]);

            let p00 = bitmap.pixel(x0, y0);
            let p10 = bitmap.pixel(x1, y0);
            let p01 = bitmap.pixel(x0, y1);
            let p11 = bitmap.pixel(x1, y1);

            let mut rgba = [0.0; 4];
            for c in 0..4 {
                let top = lerp(p00[c], p10[c], fx);
                let bottom = lerp(p01[c], p11[c], fx);
                rgba[c] = lerp(top, bottom, fy);
            }
            out.set_pixel(x as u32, y as u32, rgba);
        }
    }

    Cow::Owned(out)
}
