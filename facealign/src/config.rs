//! Aligner configuration
//!
//! The canonical template and the warp settings are plain data loaded from
//! JSON. Every field is optional; an empty object `{}` yields the ArcFace
//! 112x112 template with a similarity fit, black border and bilinear
//! sampling.
//!
//! ```json
//! {
//!   "template": { "points": [[38.2946, 51.6963], ...], "width": 112, "height": 112 },
//!   "model": "similarity",
//!   "border": "black",
//!   "interpolation": "bilinear"
//! }
//! ```

use crate::Result;
use facealign_core::{Point2D, Template};
use facealign_transform::{BorderFill, Interpolation, TransformModel, WarpOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical points and output resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    /// Target `[x, y]` for each landmark, in landmark order
    pub points: Vec<[f64; 2]>,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self::from(&Template::arcface_112())
    }
}

impl From<&Template> for TemplateConfig {
    fn from(t: &Template) -> Self {
        Self {
            points: t.points().iter().map(|p| [p.x, p.y]).collect(),
            width: t.width(),
            height: t.height(),
        }
    }
}

impl TemplateConfig {
    /// Build and validate the template.
    pub fn to_template(&self) -> Result<Template> {
        let points = self.points.iter().map(|&p| Point2D::from(p)).collect();
        Ok(Template::new(points, self.width, self.height)?)
    }
}

/// Transform model names accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelConfig {
    #[default]
    Similarity,
    Affine,
    Projective,
}

impl From<ModelConfig> for TransformModel {
    fn from(m: ModelConfig) -> Self {
        match m {
            ModelConfig::Similarity => TransformModel::Similarity,
            ModelConfig::Affine => TransformModel::Affine,
            ModelConfig::Projective => TransformModel::Projective,
        }
    }
}

/// Border fill: `"black"`, `"white"` or `{ "value": [r, g, b, a] }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderConfig {
    #[default]
    Black,
    White,
    Value([u8; 4]),
}

impl From<BorderConfig> for BorderFill {
    fn from(b: BorderConfig) -> Self {
        match b {
            BorderConfig::Black => BorderFill::Black,
            BorderConfig::White => BorderFill::White,
            BorderConfig::Value(v) => BorderFill::Value(v),
        }
    }
}

/// Interpolation names accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationConfig {
    #[default]
    Bilinear,
    Nearest,
}

impl From<InterpolationConfig> for Interpolation {
    fn from(i: InterpolationConfig) -> Self {
        match i {
            InterpolationConfig::Bilinear => Interpolation::Bilinear,
            InterpolationConfig::Nearest => Interpolation::Nearest,
        }
    }
}

/// Complete aligner configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignerConfig {
    pub template: TemplateConfig,
    pub model: ModelConfig,
    pub border: BorderConfig,
    pub interpolation: InterpolationConfig,
}

impl AlignerConfig {
    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] on malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be read, otherwise as
    /// [`AlignerConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Warp options described by this configuration.
    pub fn warp_options(&self) -> WarpOptions {
        WarpOptions::default()
            .with_border(self.border.into())
            .with_interpolation(self.interpolation.into())
    }
}
