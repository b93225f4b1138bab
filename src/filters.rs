//! Named filters the editor offers, with the parameters each is set up with.
//! Running them is the renderer's job; this only describes them.

use crate::config::StageConfig;
use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Horizontal line-blur kernel used by the convolution filter.
const CONVOLUTION_KERNEL: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
const TWIST_RADIUS: f32 = 100.0;
const TWIST_ANGLE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FilterKind {
    Blur,
    Noise,
    ColorMatrix,
    Bloom,
    Convolution,
    CrossHatch,
    Dot,
    Emboss,
    RgbSplit,
    Twist,
}

impl FilterKind {
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Blur,
        FilterKind::Noise,
        FilterKind::ColorMatrix,
        FilterKind::Bloom,
        FilterKind::Convolution,
        FilterKind::CrossHatch,
        FilterKind::Dot,
        FilterKind::Emboss,
        FilterKind::RgbSplit,
        FilterKind::Twist,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Blur => "Blur",
            FilterKind::Noise => "Noise",
            FilterKind::ColorMatrix => "ColorMatrix",
            FilterKind::Bloom => "Bloom",
            FilterKind::Convolution => "Convolution",
            FilterKind::CrossHatch => "CrossHatch",
            FilterKind::Dot => "Dot",
            FilterKind::Emboss => "Emboss",
            FilterKind::RgbSplit => "RGBSplit",
            FilterKind::Twist => "Twist",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

/// A filter with its configured parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Filter {
    Blur,
    Noise,
    ColorMatrix { black_and_white: bool },
    Bloom,
    Convolution { kernel: [f32; 9], width: u32, height: u32 },
    CrossHatch,
    Dot,
    Emboss,
    RgbSplit,
    Twist { radius: f32, angle: f32, offset: (f64, f64) },
}

impl Filter {
    /// Build a filter sized for the given stage.
    pub fn configure(kind: FilterKind, config: &StageConfig) -> Self {
        match kind {
            FilterKind::Blur => Filter::Blur,
            FilterKind::Noise => Filter::Noise,
            FilterKind::ColorMatrix => Filter::ColorMatrix {
                black_and_white: true,
            },
            FilterKind::Bloom => Filter::Bloom,
            FilterKind::Convolution => Filter::Convolution {
                kernel: CONVOLUTION_KERNEL,
                width: config.width,
                height: config.height,
            },
            FilterKind::CrossHatch => Filter::CrossHatch,
            FilterKind::Dot => Filter::Dot,
            FilterKind::Emboss => Filter::Emboss,
            FilterKind::RgbSplit => Filter::RgbSplit,
            FilterKind::Twist => Filter::Twist {
                radius: TWIST_RADIUS,
                angle: TWIST_ANGLE,
                offset: (config.width as f64 / 2.0, config.height as f64 / 2.0),
            },
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Blur => FilterKind::Blur,
            Filter::Noise => FilterKind::Noise,
            Filter::ColorMatrix { .. } => FilterKind::ColorMatrix,
            Filter::Bloom => FilterKind::Bloom,
            Filter::Convolution { .. } => FilterKind::Convolution,
            Filter::CrossHatch => FilterKind::CrossHatch,
            Filter::Dot => FilterKind::Dot,
            Filter::Emboss => FilterKind::Emboss,
            Filter::RgbSplit => FilterKind::RgbSplit,
            Filter::Twist { .. } => FilterKind::Twist,
        }
    }
}
