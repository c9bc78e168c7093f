//! Options of [`crate::pre_process`] and [`crate::post_process`].
//!
//! Both structures read from one flat JSON object. Missing keys take their defaults, unknown
//! keys are ignored and a value outside the recognized names is rejected:
//!
//! ```
//! use saliency::{PostProcessOptions, ScaleMode, SmoothingMode};
//!
//! let options = PostProcessOptions::from_json_str(
//!     r#"{"do_smoothing": "proportional", "smooth_prop": 0.1, "model": "AIM"}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(options.do_smoothing, SmoothingMode::Proportional);
//! assert_eq!(options.smooth_prop, 0.1);
//! assert_eq!(options.scale_output, ScaleMode::MinMax);
//!
//! assert!(PostProcessOptions::from_json_str(r#"{"scale_output": "z-score"}"#).is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer};

use saliency_imgproc::color::ColorSpace;

use crate::error::SaliencyError;

/// Options of the input normalization stage.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PreProcessOptions {
    /// The color space the image is re-encoded to.
    #[serde(deserialize_with = "deserialize_color_space")]
    pub color_space: ColorSpace,
}

impl PreProcessOptions {
    /// Read the options from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, SaliencyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the options from a JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SaliencyError> {
        Ok(serde_json::from_value(value)?)
    }
}

fn deserialize_color_space<'de, D>(deserializer: D) -> Result<ColorSpace, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(de::Error::custom)
}

/// Smoothing applied to the raw saliency map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SmoothingMode {
    /// No smoothing.
    #[default]
    Default,
    /// A `smooth_size` square kernel with sigma `smooth_std`.
    Custom,
    /// Sigma `smooth_prop * max(rows, cols)` and a `3 * sigma` square kernel.
    Proportional,
}

/// Center bias blended into the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum CenterPriorMode {
    /// No center bias.
    #[default]
    Default,
    /// `(1 - w) * x + w * prior`
    ProportionalAdd,
    /// `(1 - w) * x + w * (x * prior)`
    ProportionalMult,
}

/// Scaling law of the final map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ScaleMode {
    /// Map `[min, max]` onto `[scale_min, scale_max]`.
    #[default]
    MinMax,
    /// Z-score with the population standard deviation.
    Normalized,
    /// Natural log of the map as a probability density.
    LogDensity,
}

impl SmoothingMode {
    /// The option value naming the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothingMode::Default => "default",
            SmoothingMode::Custom => "custom",
            SmoothingMode::Proportional => "proportional",
        }
    }
}

impl CenterPriorMode {
    /// The option value naming the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            CenterPriorMode::Default => "default",
            CenterPriorMode::ProportionalAdd => "proportional_add",
            CenterPriorMode::ProportionalMult => "proportional_mult",
        }
    }
}

impl ScaleMode {
    /// The option value naming the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleMode::MinMax => "min-max",
            ScaleMode::Normalized => "normalized",
            ScaleMode::LogDensity => "log-density",
        }
    }
}

impl FromStr for SmoothingMode {
    type Err = SaliencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SmoothingMode::Default),
            "custom" => Ok(SmoothingMode::Custom),
            "proportional" => Ok(SmoothingMode::Proportional),
            other => Err(unsupported("do_smoothing", other)),
        }
    }
}

impl FromStr for CenterPriorMode {
    type Err = SaliencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(CenterPriorMode::Default),
            "proportional_add" => Ok(CenterPriorMode::ProportionalAdd),
            "proportional_mult" => Ok(CenterPriorMode::ProportionalMult),
            other => Err(unsupported("center_prior", other)),
        }
    }
}

impl FromStr for ScaleMode {
    type Err = SaliencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min-max" => Ok(ScaleMode::MinMax),
            "normalized" => Ok(ScaleMode::Normalized),
            "log-density" => Ok(ScaleMode::LogDensity),
            other => Err(unsupported("scale_output", other)),
        }
    }
}

fn unsupported(option: &'static str, value: &str) -> SaliencyError {
    SaliencyError::UnsupportedOption {
        option,
        value: value.to_string(),
    }
}

macro_rules! impl_option_value {
    ($($mode:ty),*) => {
        $(
            impl TryFrom<String> for $mode {
                type Error = SaliencyError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl fmt::Display for $mode {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_option_value!(SmoothingMode, CenterPriorMode, ScaleMode);

/// Options of the saliency map post-processing stage.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostProcessOptions {
    /// The smoothing mode.
    pub do_smoothing: SmoothingMode,
    /// Kernel size of [`SmoothingMode::Custom`].
    pub smooth_size: f64,
    /// Kernel sigma of [`SmoothingMode::Custom`].
    pub smooth_std: f64,
    /// Sigma of [`SmoothingMode::Proportional`] relative to the longest image axis.
    pub smooth_prop: f64,

    /// The center bias mode.
    pub center_prior: CenterPriorMode,
    /// Standard deviation of the prior relative to each axis length.
    pub center_prior_prop: f64,
    /// Map the image to `[0, 1]` before blending the prior.
    pub center_prior_scale_first: bool,
    /// Blending weight of the prior, not clamped.
    pub center_prior_weight: f64,

    /// The output scaling law.
    pub scale_output: ScaleMode,
    /// Target of the image minimum in [`ScaleMode::MinMax`].
    pub scale_min: f64,
    /// Target of the image maximum in [`ScaleMode::MinMax`].
    pub scale_max: f64,
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            do_smoothing: SmoothingMode::Default,
            smooth_size: 9.0,
            smooth_std: 3.0,
            smooth_prop: 0.05,
            center_prior: CenterPriorMode::Default,
            center_prior_prop: 0.2,
            center_prior_scale_first: true,
            center_prior_weight: 0.5,
            scale_output: ScaleMode::MinMax,
            scale_min: 0.0,
            scale_max: 1.0,
        }
    }
}

impl PostProcessOptions {
    /// Read the options from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, SaliencyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the options from a JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, SaliencyError> {
        Ok(serde_json::from_value(value)?)
    }
}
