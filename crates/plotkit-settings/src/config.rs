//! Plot configuration.
//!
//! One `PlotConfig` describes a full conversion run: sheet geometry, pen
//! control, feed rates, line processing tolerances and solid-area fill
//! parameters. Created once per run and read-only thereafter.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SettingsError;

/// Standard ISO paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A3,
    A4,
    A5,
    A6,
}

impl PaperSize {
    /// Portrait dimensions in millimetres as `(width, height)`.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            Self::A3 => (297.0, 420.0),
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::A6 => (105.0, 148.0),
        }
    }
}

impl std::fmt::Display for PaperSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A3 => write!(f, "A3"),
            Self::A4 => write!(f, "A4"),
            Self::A5 => write!(f, "A5"),
            Self::A6 => write!(f, "A6"),
        }
    }
}

impl std::str::FromStr for PaperSize {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "a6" => Ok(Self::A6),
            other => Err(SettingsError::InvalidSetting {
                key: "paper_size".to_string(),
                reason: format!("unknown paper size '{}'", other),
            }),
        }
    }
}

/// Sheet orientation selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Pick whichever orientation better matches the image aspect.
    Auto,
    Portrait,
    Landscape,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Portrait => write!(f, "portrait"),
            Self::Landscape => write!(f, "landscape"),
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            other => Err(SettingsError::InvalidSetting {
                key: "orientation".to_string(),
                reason: format!("unknown orientation '{}'", other),
            }),
        }
    }
}

/// Full configuration for one conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Output sheet size.
    pub paper_size: PaperSize,
    /// Sheet orientation.
    pub orientation: Orientation,
    /// Margin around the sheet (mm).
    pub margin_mm: f64,
    /// Z position for pen up (mm).
    pub pen_up_z: f64,
    /// Z position for pen down (mm).
    pub pen_down_z: f64,
    /// Drawing feed rate (mm/min).
    pub feed_rate: f64,
    /// Travel feed rate when the pen is up (mm/min).
    pub travel_rate: f64,
    /// Maximum endpoint distance for joining stroke polylines (mm).
    pub join_tolerance_mm: f64,
    /// Minimum polyline length kept in the output (mm).
    pub min_line_length_mm: f64,
    /// Base simplification factor; scaled adaptively per contour.
    pub simplify_epsilon: f64,
    /// Generate hatch fills for solid regions.
    pub fill_solid_areas: bool,
    /// Hatch line spacing (px in source image space).
    pub hatch_spacing_px: f64,
    /// Hatch angle (degrees).
    pub hatch_angle_deg: f64,
    /// Add a second hatch pass rotated 90 degrees.
    pub cross_hatch: bool,
    /// Also draw the simplified boundary of each filled region.
    pub outline_solid_areas: bool,
    /// Minimum contour area considered for solid fill (px²).
    pub min_solid_area_px: f64,
    /// Treat the source as light-on-dark.
    pub invert_colors: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Auto,
            margin_mm: 10.0,
            pen_up_z: 3.0,
            pen_down_z: 0.0,
            feed_rate: 1000.0,
            travel_rate: 3000.0,
            join_tolerance_mm: 0.15,
            min_line_length_mm: 0.3,
            simplify_epsilon: 0.0001,
            fill_solid_areas: false,
            hatch_spacing_px: 2.0,
            hatch_angle_deg: 45.0,
            cross_hatch: false,
            outline_solid_areas: true,
            min_solid_area_px: 50.0,
            invert_colors: false,
        }
    }
}

impl PlotConfig {
    /// Validates ranges and cross-field consistency.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |key: &str, value: f64| -> Result<(), SettingsError> {
            if value <= 0.0 {
                Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("must be positive, got {}", value),
                })
            } else {
                Ok(())
            }
        };

        positive("feed_rate", self.feed_rate)?;
        positive("travel_rate", self.travel_rate)?;
        positive("hatch_spacing_px", self.hatch_spacing_px)?;

        if self.margin_mm < 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "margin_mm".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        let (w, h) = self.paper_size.dimensions_mm();
        if 2.0 * self.margin_mm >= w.min(h) {
            return Err(SettingsError::InvalidSetting {
                key: "margin_mm".to_string(),
                reason: format!("margin {}mm leaves no usable {} area", self.margin_mm, self.paper_size),
            });
        }
        if self.join_tolerance_mm < 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "join_tolerance_mm".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        if self.min_line_length_mm < 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "min_line_length_mm".to_string(),
                reason: "must be non-negative".to_string(),
            });
        }
        if self.pen_up_z <= self.pen_down_z {
            return Err(SettingsError::InvalidSetting {
                key: "pen_up_z".to_string(),
                reason: format!(
                    "pen up Z ({}) must be above pen down Z ({})",
                    self.pen_up_z, self.pen_down_z
                ),
            });
        }
        Ok(())
    }

    /// Loads a configuration profile from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.as_ref().display(), e)))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration profile as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), text)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.as_ref().display(), e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PlotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_paper_dimensions() {
        assert_eq!(PaperSize::A4.dimensions_mm(), (210.0, 297.0));
        assert_eq!(PaperSize::A6.dimensions_mm(), (105.0, 148.0));
    }

    #[test]
    fn test_paper_size_from_str() {
        assert_eq!("a3".parse::<PaperSize>().unwrap(), PaperSize::A3);
        assert_eq!("A5".parse::<PaperSize>().unwrap(), PaperSize::A5);
        assert!("letter".parse::<PaperSize>().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_margin() {
        let config = PlotConfig {
            paper_size: PaperSize::A6,
            margin_mm: 60.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_pen_up_below_pen_down() {
        let config = PlotConfig {
            pen_up_z: 0.0,
            pen_down_z: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let config = PlotConfig {
            paper_size: PaperSize::A3,
            fill_solid_areas: true,
            hatch_angle_deg: 30.0,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = PlotConfig::load(&path).unwrap();
        assert_eq!(loaded.paper_size, PaperSize::A3);
        assert!(loaded.fill_solid_areas);
        assert_eq!(loaded.hatch_angle_deg, 30.0);
    }
}
