//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use facealign_core::{ChannelLayout, PixelBuffer, Point2D};
use std::fs;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare values and buffers only (default)
    #[default]
    Compare,
    /// Also write intermediate images for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, a running comparison index and every failure, so
/// one test can check many values and report them together.
pub struct RegParams {
    /// Name of the test (e.g., "estimate")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// # Arguments
    ///
    /// * `test_name` - Name of the test (e.g., "warp")
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        // NaN never compares within delta
        if diff <= delta {
            return true;
        }
        let msg = format!(
            "Failure in {}_reg: value comparison for index {}\n\
             difference = {} but allowed delta = {}\n\
             expected = {}, actual = {}",
            self.test_name, self.index, diff, delta, expected, actual
        );
        self.fail(msg)
    }

    /// Compare two point lists coordinate by coordinate
    pub fn compare_points(&mut self, expected: &[Point2D], actual: &[Point2D], delta: f64) -> bool {
        self.index += 1;
        if expected.len() != actual.len() {
            let msg = format!(
                "Failure in {}_reg: point comparison for index {} - {} vs {} points",
                self.test_name,
                self.index,
                expected.len(),
                actual.len()
            );
            return self.fail(msg);
        }
        for (i, (e, a)) in expected.iter().zip(actual).enumerate() {
            let diff = e.distance(a);
            if diff.is_nan() || diff > delta {
                let msg = format!(
                    "Failure in {}_reg: point comparison for index {} - point {} off by {} \
                     (expected ({}, {}), actual ({}, {}))",
                    self.test_name, self.index, i, diff, e.x, e.y, a.x, a.y
                );
                return self.fail(msg);
            }
        }
        true
    }

    /// Compare two buffers for exact equality
    pub fn compare_buffers(&mut self, buf1: &PixelBuffer, buf2: &PixelBuffer) -> bool {
        self.index += 1;

        if !buf1.sizes_equal(buf2) {
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {} - geometry mismatch",
                self.test_name, self.index
            );
            return self.fail(msg);
        }

        if let Some(pos) = buf1
            .data()
            .iter()
            .zip(buf2.data())
            .position(|(a, b)| a != b)
        {
            let px = pos / buf1.channels();
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {} - pixel mismatch at ({}, {})",
                self.test_name,
                self.index,
                px % buf1.width() as usize,
                px / buf1.width() as usize
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two buffers by mean absolute sample difference
    ///
    /// # Arguments
    ///
    /// * `buf1`, `buf2` - Buffers with identical geometry
    /// * `max_mean_diff` - Largest accepted mean difference per sample
    pub fn compare_buffers_mean(
        &mut self,
        buf1: &PixelBuffer,
        buf2: &PixelBuffer,
        max_mean_diff: f64,
    ) -> bool {
        self.index += 1;

        if !buf1.sizes_equal(buf2) {
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {} - geometry mismatch",
                self.test_name, self.index
            );
            return self.fail(msg);
        }

        let total: u64 = buf1
            .data()
            .iter()
            .zip(buf2.data())
            .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs() as u64)
            .sum();
        let mean = total as f64 / buf1.data().len() as f64;
        if mean > max_mean_diff {
            let msg = format!(
                "Failure in {}_reg: buffer comparison for index {} - mean difference {} > {}",
                self.test_name, self.index, mean, max_mean_diff
            );
            return self.fail(msg);
        }
        true
    }

    /// Write a buffer as PNG to the regout directory in display mode
    ///
    /// Does nothing in compare mode.
    pub fn write_buffer(&mut self, buf: &PixelBuffer) -> TestResult<()> {
        self.index += 1;
        if !self.display() {
            return Ok(());
        }

        fs::create_dir_all(regout_dir())?;
        let path = format!("{}/{}.{:02}.png", regout_dir(), self.test_name, self.index);
        let (w, h) = buf.dimensions();
        let data = buf.data().to_vec();
        let result = match buf.layout() {
            ChannelLayout::Gray => {
                image::GrayImage::from_raw(w, h, data).map(|img| img.save(&path))
            }
            ChannelLayout::Rgb => image::RgbImage::from_raw(w, h, data).map(|img| img.save(&path)),
            ChannelLayout::Rgba => {
                image::RgbaImage::from_raw(w, h, data).map(|img| img.save(&path))
            }
        };
        match result {
            None => Err(TestError::Encode(format!("{w}x{h} {:?}", buf.layout()))),
            Some(Err(e)) => Err(TestError::ImageWrite {
                path,
                message: e.to_string(),
            }),
            Some(Ok(())) => {
                eprintln!("Wrote: {}", path);
                Ok(())
            }
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
