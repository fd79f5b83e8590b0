//! Depth image inspection
//!
//! Reports the pixel layout and sample range of a depth image, which is the
//! quickest way to tell millimetre `u16` depth from normalized or 8-bit
//! previews before handing images to a tracker.

use image::DynamicImage;
use posekit_core::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Pixel statistics of a decoded image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthStats {
    pub width: u32,
    pub height: u32,
    /// Decoded pixel layout, e.g. `L16` or `Rgb8`
    pub color_type: String,
    /// Per-channel numeric type: `u8`, `u16` or `f32`
    pub sample_type: &'static str,
    /// Smallest sample over all channels
    pub min: f64,
    /// Largest sample over all channels
    pub max: f64,
    /// Samples equal to zero, i.e. missing depth
    pub zero_samples: usize,
}

struct SampleRange {
    min: f64,
    max: f64,
    zeros: usize,
}

fn sample_range<T: Copy + Into<f64>>(samples: &[T]) -> SampleRange {
    if samples.is_empty() {
        return SampleRange {
            min: 0.0,
            max: 0.0,
            zeros: 0,
        };
    }
    samples.iter().fold(
        SampleRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            zeros: 0,
        },
        |mut range, &sample| {
            let value: f64 = sample.into();
            range.min = range.min.min(value);
            range.max = range.max.max(value);
            if value == 0.0 {
                range.zeros += 1;
            }
            range
        },
    )
}

/// Compute statistics for an already decoded image
pub fn depth_stats(image: &DynamicImage) -> DepthStats {
    let (sample_type, range) = match image {
        DynamicImage::ImageLuma8(img) => ("u8", sample_range(img.as_raw())),
        DynamicImage::ImageLumaA8(img) => ("u8", sample_range(img.as_raw())),
        DynamicImage::ImageRgb8(img) => ("u8", sample_range(img.as_raw())),
        DynamicImage::ImageRgba8(img) => ("u8", sample_range(img.as_raw())),
        DynamicImage::ImageLuma16(img) => ("u16", sample_range(img.as_raw())),
        DynamicImage::ImageLumaA16(img) => ("u16", sample_range(img.as_raw())),
        DynamicImage::ImageRgb16(img) => ("u16", sample_range(img.as_raw())),
        DynamicImage::ImageRgba16(img) => ("u16", sample_range(img.as_raw())),
        DynamicImage::ImageRgb32F(img) => ("f32", sample_range(img.as_raw())),
        DynamicImage::ImageRgba32F(img) => ("f32", sample_range(img.as_raw())),
        other => ("f32", sample_range(other.to_rgba32f().as_raw())),
    };

    DepthStats {
        width: image.width(),
        height: image.height(),
        color_type: format!("{:?}", image.color()),
        sample_type,
        min: range.min,
        max: range.max,
        zero_samples: range.zeros,
    }
}

/// Open an image file and compute its statistics
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn inspect_depth_image<P: AsRef<Path>>(path: P) -> Result<DepthStats> {
    let image = image::open(path.as_ref()).map_err(|e| Error::Image(e.to_string()))?;
    let stats = depth_stats(&image);
    debug!(
        color_type = %stats.color_type,
        min = stats.min,
        max = stats.max,
        "Depth image inspected"
    );
    Ok(stats)
}
