//! Aligner - Estimate, then warp, against one fixed template
//!
//! An [`Aligner`] is built once from an [`AlignerConfig`] and then shared;
//! it holds only immutable data, so it is `Send + Sync` and can be placed
//! in an `Arc` and used from many threads. Nothing is initialized lazily.

use crate::config::AlignerConfig;
use crate::{Error, Result};
use facealign_bridge::{
    LockPixels, NativeBitmap, PixelFormat, bitmap_to_buffer, premultiply_pixel, write_buffer_into,
};
use facealign_core::{LandmarkSet, PixelBuffer, Point2D, Template};
use facealign_transform::{
    BorderFill, Transform, TransformError, TransformModel, WarpOptions, estimate_with, warp_with,
};

/// Result of aligning one face
#[derive(Debug, Clone)]
pub struct AlignedFace {
    /// Normalized image at the template's output size
    pub image: PixelBuffer,
    /// Transform from source image to aligned image coordinates
    pub transform: Transform,
    /// Input landmarks mapped into the aligned image
    pub landmarks: LandmarkSet,
    /// RMS distance between mapped landmarks and template points, in
    /// output pixels
    pub residual: f64,
}

/// Face aligner bound to a canonical template
#[derive(Debug, Clone)]
pub struct Aligner {
    template: Template,
    model: TransformModel,
    options: WarpOptions,
}

impl Default for Aligner {
    fn default() -> Self {
        Self::arcface()
    }
}

impl Aligner {
    /// Create an aligner from configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::Core`] if the template has fewer than two points,
    ///   non-finite coordinates or a zero output size
    /// - [`Error::InvalidConfig`] if the template has fewer points than the
    ///   model needs, or its points cannot fix the model (collinear)
    #[tracing::instrument(name = "Initialize aligner", skip(config), err)]
    pub fn new(config: &AlignerConfig) -> Result<Self> {
        let template = config.template.to_template()?;
        let model = TransformModel::from(config.model);
        if template.len() < model.min_points() {
            return Err(Error::InvalidConfig(format!(
                "{model:?} model needs at least {} template points, got {}",
                model.min_points(),
                template.len()
            )));
        }
        // the template must at least fit onto itself
        let anchors = LandmarkSet::new(template.points().to_vec())?;
        estimate_with(&anchors, template.points(), model).map_err(|e| {
            Error::InvalidConfig(format!("template cannot anchor a {model:?} fit: {e}"))
        })?;
        tracing::info!(
            points = template.len(),
            width = template.width(),
            height = template.height(),
            ?model,
            "aligner ready"
        );
        Ok(Self {
            template,
            model,
            options: config.warp_options(),
        })
    }

    /// ArcFace 112x112 aligner with a similarity fit.
    pub fn arcface() -> Self {
        Self {
            template: Template::arcface_112(),
            model: TransformModel::Similarity,
            options: WarpOptions::default(),
        }
    }

    /// Get the template
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Get the transform model
    pub fn model(&self) -> TransformModel {
        self.model
    }

    /// Get the warp options
    pub fn options(&self) -> &WarpOptions {
        &self.options
    }

    /// Estimate the transform from `landmarks` to the template.
    pub fn estimate(&self, landmarks: &LandmarkSet) -> Result<Transform> {
        Ok(estimate_with(landmarks, self.template.points(), self.model)?)
    }

    /// Align a face.
    ///
    /// # Arguments
    ///
    /// * `image` - Source image; any channel layout
    /// * `landmarks` - Landmarks in source pixel coordinates, template order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transform`] for mismatched or degenerate landmarks.
    #[tracing::instrument(
        skip_all,
        fields(width = image.width(), height = image.height(), points = landmarks.len()),
        err
    )]
    pub fn align(&self, image: &PixelBuffer, landmarks: &LandmarkSet) -> Result<AlignedFace> {
        self.align_with(image, landmarks, &self.options)
    }

    fn align_with(
        &self,
        image: &PixelBuffer,
        landmarks: &LandmarkSet,
        options: &WarpOptions,
    ) -> Result<AlignedFace> {
        let transform = self.estimate(landmarks)?;
        let aligned = warp_with(image, &transform, self.template.output_size(), options)?;

        let mapped: Option<Vec<Point2D>> = landmarks.iter().map(|&p| transform.apply(p)).collect();
        let mapped = mapped.ok_or_else(|| {
            TransformError::InvalidTransform("landmark maps to infinity".to_string())
        })?;
        let residual = transform.rms_error(landmarks.points(), self.template.points());
        tracing::debug!(residual, "face aligned");

        Ok(AlignedFace {
            image: aligned,
            transform,
            landmarks: LandmarkSet::new(mapped)?,
            residual,
        })
    }

    /// Align a face held in a native bitmap.
    ///
    /// Pixels are copied out without unpremultiplying and written back
    /// untouched, so the result keeps the source format. An RGBA-8888
    /// result keeps the source's premultiplied flag; RGB-565 has no alpha
    /// and is never marked premultiplied.
    ///
    /// A [`BorderFill::Value`] border is taken as straight alpha and
    /// premultiplied before it is written into a premultiplied bitmap.
    #[tracing::instrument(skip_all, fields(points = landmarks.len()), err)]
    pub fn align_bitmap<B: LockPixels>(
        &self,
        bitmap: &B,
        landmarks: &LandmarkSet,
    ) -> Result<NativeBitmap> {
        let info = bitmap.info();
        let premultiplied = info.premultiplied && info.format == PixelFormat::Rgba8888;
        let options = match self.options.border {
            BorderFill::Value(v) if premultiplied => {
                self.options.with_border(BorderFill::Value(premultiply_pixel(v)))
            }
            _ => self.options,
        };

        let buffer = bitmap_to_buffer(bitmap, false)?;
        let face = self.align_with(&buffer, landmarks, &options)?;
        let (width, height) = face.image.dimensions();
        let mut out = NativeBitmap::new(width, height, info.format, premultiplied)?;
        write_buffer_into(&face.image, &mut out, false)?;
        Ok(out)
    }
}

impl Drop for Aligner {
    fn drop(&mut self) {
        tracing::trace!(points = self.template.len(), "aligner released");
    }
}
