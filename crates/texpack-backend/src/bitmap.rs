//! Floating-point bitmaps.

use thiserror::Error;

/// Value reported for channels a bitmap does not have.
pub const MISSING_CHANNEL_VALUE: f32 = 1.0;

/// Errors from constructing a bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    #[error("bitmap dimensions must be at least 1x1, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("bitmaps have 1 to 4 channels, got {0}")]
    InvalidChannelCount(u8),

    #[error("expected {expected} samples for the declared size, got {actual}")]
    BufferLength { expected: usize, actual: usize },
}

/// A 2D grid of 1 to 4 channel float pixels.
///
/// Samples are stored row-major, channel-interleaved. Values are nominally
/// in [0, 1] but may exceed 1 for emission data. The buffer is exclusively
/// owned; source bitmaps are shared by reference, never aliased mutably.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<f32>,
}

impl Bitmap {
    /// Create a 4-channel bitmap filled with one RGBA value.
    pub fn filled(width: u32, height: u32, fill: [f32; 4]) -> Self {
        let size = width as usize * height as usize;
        let mut data = Vec::with_capacity(size * 4);
        for _ in 0..size {
            data.extend_from_slice(&fill);
        }
        Self {
            width,
            height,
            channels: 4,
            data,
        }
    }

    /// A bitmap of zeros. `channels` is clamped to 1..=4.
    pub fn zeroed(width: u32, height: u32, channels: u8) -> Self {
        let channels = channels.clamp(1, 4);
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width as usize * height as usize * channels as usize],
        }
    }

    /// Wrap a raw sample buffer.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<f32>,
    ) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::EmptyDimensions { width, height });
        }
        if !(1..=4).contains(&channels) {
            return Err(BitmapError::InvalidChannelCount(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(BitmapError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Whether the bitmap has no pixels. [`Bitmap::from_raw`] never builds one.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw samples, row-major and channel-interleaved.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }

    /// Read one channel of a pixel.
    ///
    /// Channels at or beyond the bitmap's channel count read as
    /// [`MISSING_CHANNEL_VALUE`].
    #[inline]
    pub fn channel(&self, x: u32, y: u32, channel: usize) -> f32 {
        if channel >= self.channels as usize {
            return MISSING_CHANNEL_VALUE;
        }
        self.data[self.index(x, y) + channel]
    }

    /// Read a pixel as RGBA, filling missing channels.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let base = self.index(x, y);
        let mut rgba = [MISSING_CHANNEL_VALUE; 4];
        let n = self.channels as usize;
        rgba[..n].copy_from_slice(&self.data[base..base + n]);
        rgba
    }

    /// Write a pixel. Only the bitmap's own channels are stored.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        let base = self.index(x, y);
        let n = self.channels as usize;
        self.data[base..base + n].copy_from_slice(&rgba[..n]);
    }

    /// Convert to 8-bit RGBA bytes, clamping to [0, 1].
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                for value in self.pixel(x, y) {
                    bytes.push((value.clamp(0.0, 1.0) * 255.0).round() as u8);
                }
            }
        }
        bytes
    }
}
