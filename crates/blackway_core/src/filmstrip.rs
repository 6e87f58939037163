//! Filmstrip frame mapping
//!
//! A filmstrip is one image holding `frame_count` equally sized frames laid
//! out along a single axis. A widget shows the frame matching its value by
//! shifting the image `frame * frame_size` pixels along that axis.
//!
//! ```
//! use blackway_core::filmstrip::{frame_index, Filmstrip, StripAxis};
//!
//! assert_eq!(frame_index(0.0, 0.0, 100.0, 128), Ok(0));
//! assert_eq!(frame_index(100.0, 0.0, 100.0, 128), Ok(127));
//!
//! let strip = Filmstrip::new("knob.png", 80.0, StripAxis::Horizontal);
//! assert_eq!(strip.offset(2), (-160.0, 0.0));
//! ```

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Number of frames in every stock filmstrip asset
pub const DEFAULT_FRAME_COUNT: u32 = 128;

/// Map a value to a filmstrip frame.
///
/// The value is clamped into `[min, max]`, normalized, and scaled to
/// `[0, frame_count - 1]` with truncation toward zero.
pub fn frame_index(value: f64, min: f64, max: f64, frame_count: u32) -> Result<u32> {
    if frame_count == 0 {
        return Err(CoreError::EmptyFilmstrip);
    }
    Ok(ValueRange::new(min, max)?.frame(value, frame_count))
}

/// A validated inclusive range with finite bounds and `min < max`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Create a range, rejecting empty, inverted or non-finite bounds and
    /// spans too wide to represent
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min || !(max - min).is_finite() {
            return Err(CoreError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Distance between the bounds (always positive)
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Position of a value inside the range, in `[0, 1]`
    pub fn normalize(&self, value: f64) -> f64 {
        (self.clamp(value) - self.min) / self.span()
    }

    /// Frame index for a value; `frame_count` of zero yields frame 0
    pub fn frame(&self, value: f64, frame_count: u32) -> u32 {
        let last = frame_count.saturating_sub(1);
        let scaled = (self.normalize(value) * f64::from(last)).floor();
        // `as` saturates, and NaN maps to 0
        (scaled as u32).min(last)
    }
}

/// Axis along which the frames of a strip are tiled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// Description of a filmstrip image and its frame geometry
#[derive(Clone, Debug, PartialEq)]
pub struct Filmstrip {
    image: String,
    frame_count: u32,
    frame_size: f32,
    axis: StripAxis,
}

impl Filmstrip {
    /// Create a strip with the stock frame count
    pub fn new(image: impl Into<String>, frame_size: f32, axis: StripAxis) -> Self {
        Self {
            image: image.into(),
            frame_count: DEFAULT_FRAME_COUNT,
            frame_size,
            axis,
        }
    }

    /// Override the number of frames in the strip
    pub fn with_frame_count(mut self, frame_count: u32) -> Result<Self> {
        if frame_count == 0 {
            return Err(CoreError::EmptyFilmstrip);
        }
        self.frame_count = frame_count;
        Ok(self)
    }

    /// Image path of the strip
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Number of frames in the strip
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Edge length of one frame in pixels
    pub fn frame_size(&self) -> f32 {
        self.frame_size
    }

    /// Tiling axis
    pub fn axis(&self) -> StripAxis {
        self.axis
    }

    /// Frame for a value within `range`
    pub fn frame_for(&self, range: &ValueRange, value: f64) -> u32 {
        range.frame(value, self.frame_count)
    }

    /// Background offset `(x, y)` that brings `frame` into view
    pub fn offset(&self, frame: u32) -> (f32, f32) {
        let frame = frame.min(self.frame_count.saturating_sub(1));
        let shift = if frame == 0 {
            0.0
        } else {
            -(frame as f32 * self.frame_size)
        };
        match self.axis {
            StripAxis::Horizontal => (shift, 0.0),
            StripAxis::Vertical => (0.0, shift),
        }
    }

    /// Rendered size `(width, height)` of the whole strip
    pub fn strip_size(&self) -> (f32, f32) {
        let length = self.frame_size * self.frame_count as f32;
        match self.axis {
            StripAxis::Horizontal => (length, self.frame_size),
            StripAxis::Vertical => (self.frame_size, length),
        }
    }
}
