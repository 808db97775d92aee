//! End-to-end image-to-program conversion.
//!
//! Wires the stages together in pipeline order: binarize, trace,
//! classify, hatch, extract strokes, map to the sheet, join, sequence,
//! emit. Joining runs after the page transform because the join
//! tolerance and minimum length are configured in millimetres.

use std::path::Path;

use image::GrayImage;
use plotkit_core::{Error, Polyline, Result};
use plotkit_raster::{binarize_otsu, trace_contours};
use plotkit_settings::PlotConfig;
use tracing::{debug, info};

use crate::classifier::{ClassifierThresholds, RegionClassifier};
use crate::emitter::{GcodeEmitter, ProgramStats};
use crate::hatch::{HatchFiller, HatchParameters};
use crate::joiner::PolylineJoiner;
use crate::page::PageMapper;
use crate::sequencer::sequence_polylines;
use crate::strokes::StrokeExtractor;

/// Converts raster images into plotter G-code programs.
pub struct ImageConverter {
    config: PlotConfig,
}

impl ImageConverter {
    /// Validates the configuration up front; geometry work only starts
    /// from a config known to be coherent.
    pub fn new(config: PlotConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        Ok(Self { config })
    }

    /// Loads an image file, converts it, writes the program to `output`.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<ProgramStats> {
        let img = image::open(input)
            .map_err(|e| Error::ImageLoad(format!("{}: {}", input.display(), e)))?;
        let gray = img.to_luma8();
        info!(
            input = %input.display(),
            width = gray.width(),
            height = gray.height(),
            "loaded image"
        );

        let source_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        let (gcode, stats) = self.convert_image(&gray, &source_name)?;

        std::fs::write(output, gcode)?;
        info!(output = %output.display(), "wrote G-code");
        Ok(stats)
    }

    /// The full pipeline on an in-memory grayscale image.
    pub fn convert_image(&self, gray: &GrayImage, source_name: &str) -> Result<(String, ProgramStats)> {
        let cfg = &self.config;
        let mask = binarize_otsu(gray, cfg.invert_colors);
        if mask.is_blank() {
            return Err(Error::EmptyDrawing(
                "no foreground pixels after thresholding; source may be blank \
                 or need --invert-colors"
                    .into(),
            ));
        }

        let forest = trace_contours(&mask);
        debug!(contours = forest.nodes.len(), "traced contours");

        let regions = if cfg.fill_solid_areas {
            let thresholds = ClassifierThresholds {
                min_solid_area: cfg.min_solid_area_px,
                ..Default::default()
            };
            RegionClassifier::new(thresholds).classify(&forest)
        } else {
            Vec::new()
        };
        debug!(regions = regions.len(), "classified solid regions");

        let mut polylines: Vec<Polyline> = Vec::new();
        if cfg.fill_solid_areas {
            let filler = HatchFiller::new(HatchParameters {
                spacing_px: cfg.hatch_spacing_px,
                angle_deg: cfg.hatch_angle_deg,
                cross_hatch: cfg.cross_hatch,
                outline: cfg.outline_solid_areas,
            });
            for region in &regions {
                polylines.extend(filler.fill(&forest, region));
            }
        }

        let extractor = StrokeExtractor::new(cfg.simplify_epsilon);
        polylines.extend(extractor.extract(&mask, &forest, &regions));
        info!(polylines = polylines.len(), "extracted geometry");

        if polylines.is_empty() {
            return Err(Error::EmptyDrawing(
                "no drawable geometry extracted from the image".into(),
            ));
        }

        let mapper = PageMapper::new(cfg.paper_size, cfg.orientation, cfg.margin_mm);
        let transform = mapper.compute(gray.width(), gray.height());
        let mapped: Vec<Polyline> = polylines.iter().map(|l| transform.apply_polyline(l)).collect();

        let joiner = PolylineJoiner::new(cfg.join_tolerance_mm, cfg.min_line_length_mm);
        let joined = joiner.join(mapped);
        if joined.is_empty() {
            return Err(Error::EmptyDrawing(
                "all geometry fell below the minimum line length".into(),
            ));
        }

        let toolpath = sequence_polylines(joined, mapper.start_position());

        let emitter = GcodeEmitter::new(cfg.pen_up_z, cfg.pen_down_z, cfg.feed_rate, cfg.travel_rate);
        Ok(emitter.emit(&toolpath, source_name))
    }
}
