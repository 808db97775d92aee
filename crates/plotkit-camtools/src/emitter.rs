//! G-code serialization.
//!
//! Turns an ordered toolpath into a line-oriented G-code program for a
//! 2-axis-plus-lift plotter: `G0` moves with the pen up, `G1` moves with
//! the pen down, `Z` moves for the lift. Comments use the `;` prefix.

use chrono::Utc;
use plotkit_core::{Point, Toolpath};
use tracing::info;

/// Totals accumulated while emitting a program.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgramStats {
    /// Pen-down distance, mm.
    pub draw_distance_mm: f64,
    /// Pen-up travel distance, mm.
    pub travel_distance_mm: f64,
    /// Number of polylines drawn.
    pub polyline_count: usize,
    /// Estimated run time from the configured feed rates, seconds.
    pub estimated_seconds: f64,
}

/// Serializes toolpaths as plotter G-code.
pub struct GcodeEmitter {
    pen_up_z: f64,
    pen_down_z: f64,
    feed_rate: f64,
    travel_rate: f64,
}

impl GcodeEmitter {
    pub fn new(pen_up_z: f64, pen_down_z: f64, feed_rate: f64, travel_rate: f64) -> Self {
        Self {
            pen_up_z,
            pen_down_z,
            feed_rate,
            travel_rate,
        }
    }

    /// Emits the full program and its totals. The pen position is an
    /// explicit accumulator so repeated emissions in one process stay
    /// independent.
    pub fn emit(&self, toolpath: &Toolpath, source_name: &str) -> (String, ProgramStats) {
        let mut gcode = String::new();
        let mut stats = ProgramStats {
            polyline_count: toolpath.len(),
            ..Default::default()
        };

        gcode.push_str("; plotkit pen plotter program\n");
        gcode.push_str(&format!("; Source: {}\n", source_name));
        gcode.push_str(&format!(
            "; Generated: {}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        gcode.push('\n');
        gcode.push_str("G21 ; Set units to millimeters\n");
        gcode.push_str("G90 ; Absolute positioning\n");
        gcode.push_str(&format!("G0 Z{} ; Pen up\n", self.pen_up_z));
        gcode.push_str("G0 X0 Y0 ; Move to origin\n");
        gcode.push('\n');

        let mut position = Point::new(0.0, 0.0);
        for (i, line) in toolpath.polylines.iter().enumerate() {
            let start = line.start();
            stats.travel_distance_mm += position.distance_to(start);
            gcode.push_str(&format!(
                "G0 X{:.3} Y{:.3} F{:.0} ; Travel to line {}\n",
                start.x,
                start.y,
                self.travel_rate,
                i + 1
            ));
            gcode.push_str(&format!("G0 Z{} ; Pen down\n", self.pen_down_z));

            position = start;
            for point in &line.points[1..] {
                stats.draw_distance_mm += position.distance_to(*point);
                gcode.push_str(&format!(
                    "G1 X{:.3} Y{:.3} F{:.0}\n",
                    point.x, point.y, self.feed_rate
                ));
                position = *point;
            }

            gcode.push_str(&format!("G0 Z{} ; Pen up\n", self.pen_up_z));
            gcode.push('\n');
        }

        gcode.push_str("; Return to origin\n");
        gcode.push_str("G0 X0 Y0\n");
        gcode.push_str(&format!("G0 Z{}\n", self.pen_up_z));
        gcode.push('\n');

        stats.estimated_seconds = (stats.draw_distance_mm / self.feed_rate
            + stats.travel_distance_mm / self.travel_rate)
            * 60.0;
        gcode.push_str(&format!(
            "; Total drawing distance: {:.2} mm\n",
            stats.draw_distance_mm
        ));
        gcode.push_str(&format!(
            "; Total travel distance: {:.2} mm\n",
            stats.travel_distance_mm
        ));
        gcode.push_str(&format!("; Total lines: {}\n", stats.polyline_count));
        gcode.push_str(&format!(
            "; Estimated time: {:.1} seconds ({:.1} minutes)\n",
            stats.estimated_seconds,
            stats.estimated_seconds / 60.0
        ));
        gcode.push_str("M2 ; End program\n");

        info!(
            lines = stats.polyline_count,
            draw_mm = format!("{:.2}", stats.draw_distance_mm),
            travel_mm = format!("{:.2}", stats.travel_distance_mm),
            "emitted G-code program"
        );
        (gcode, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotkit_core::{PathKind, Polyline};

    fn sample_toolpath() -> Toolpath {
        Toolpath::new(vec![
            Polyline::new(
                vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0)],
                PathKind::Stroke,
            ),
            Polyline::new(
                vec![Point::new(20.0, 15.0), Point::new(20.0, 25.0)],
                PathKind::HatchOrOutline,
            ),
        ])
    }

    #[test]
    fn test_program_framing() {
        let emitter = GcodeEmitter::new(3.0, 0.0, 1000.0, 3000.0);
        let (gcode, _) = emitter.emit(&sample_toolpath(), "test.png");
        assert!(gcode.contains("G21 ; Set units to millimeters"));
        assert!(gcode.contains("G90 ; Absolute positioning"));
        assert!(gcode.contains("G0 X0 Y0 ; Move to origin"));
        assert!(gcode.trim_end().ends_with("M2 ; End program"));
    }

    #[test]
    fn test_pen_cycle_per_polyline() {
        let emitter = GcodeEmitter::new(3.0, 0.0, 1000.0, 3000.0);
        let (gcode, _) = emitter.emit(&sample_toolpath(), "test.png");
        assert_eq!(gcode.matches("; Pen down").count(), 2);
        // Header pen-up plus one per polyline, plus the footer lift.
        assert_eq!(gcode.matches("G0 Z3 ").count() + gcode.matches("G0 Z3\n").count(), 4);
    }

    #[test]
    fn test_coordinates_and_feeds() {
        let emitter = GcodeEmitter::new(3.0, 0.0, 1000.0, 3000.0);
        let (gcode, _) = emitter.emit(&sample_toolpath(), "test.png");
        assert!(gcode.contains("G0 X10.000 Y10.000 F3000 ; Travel to line 1"));
        assert!(gcode.contains("G1 X20.000 Y10.000 F1000"));
    }

    #[test]
    fn test_stats_totals() {
        let emitter = GcodeEmitter::new(3.0, 0.0, 1000.0, 3000.0);
        let (gcode, stats) = emitter.emit(&sample_toolpath(), "test.png");
        assert_eq!(stats.polyline_count, 2);
        assert!((stats.draw_distance_mm - 20.0).abs() < 1e-9);
        // Origin to (10,10), then (20,10) to (20,15).
        let expected_travel = (200.0f64).sqrt() + 5.0;
        assert!((stats.travel_distance_mm - expected_travel).abs() < 1e-9);
        let expected_time = (20.0 / 1000.0 + expected_travel / 3000.0) * 60.0;
        assert!((stats.estimated_seconds - expected_time).abs() < 1e-9);
        assert!(gcode.contains("; Total lines: 2"));
    }

    #[test]
    fn test_empty_toolpath_still_frames_program() {
        let emitter = GcodeEmitter::new(3.0, 0.0, 1000.0, 3000.0);
        let (gcode, stats) = emitter.emit(&Toolpath::default(), "blank.png");
        assert!(gcode.contains("G21"));
        assert!(gcode.contains("M2"));
        assert_eq!(stats.polyline_count, 0);
        assert_eq!(stats.draw_distance_mm, 0.0);
    }

    #[test]
    fn test_repeated_emission_is_independent() {
        let emitter = GcodeEmitter::new(3.0, 0.0, 1000.0, 3000.0);
        let toolpath = sample_toolpath();
        let (_, first) = emitter.emit(&toolpath, "test.png");
        let (_, second) = emitter.emit(&toolpath, "test.png");
        assert_eq!(first, second);
    }
}
