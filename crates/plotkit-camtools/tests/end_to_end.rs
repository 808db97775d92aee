//! Whole-pipeline conversions on synthetic images.

use image::{GrayImage, Luma};
use plotkit_camtools::ImageConverter;
use plotkit_settings::{Orientation, PaperSize, PlotConfig};

fn canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([255u8]))
}

fn black_rect(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            img.put_pixel(x, y, Luma([0u8]));
        }
    }
}

#[test]
fn filled_square_hatch_distance_matches_area() {
    // 300x300 black square on an 800x600 canvas, A4 portrait. The wide
    // image is rotated 90°, so the fit scale is 190mm / 600px. With the
    // hatch spacing chosen to land on 1mm and a 45° angle, the total
    // pen-down distance approximates (area / spacing) * sqrt(2).
    let mut img = canvas(800, 600);
    black_rect(&mut img, 250, 150, 300, 300);

    let scale = 190.0 / 600.0;
    let config = PlotConfig {
        paper_size: PaperSize::A4,
        orientation: Orientation::Portrait,
        margin_mm: 10.0,
        fill_solid_areas: true,
        outline_solid_areas: false,
        hatch_spacing_px: 1.0 / scale,
        hatch_angle_deg: 45.0,
        cross_hatch: false,
        ..Default::default()
    };

    let converter = ImageConverter::new(config).unwrap();
    let (gcode, stats) = converter.convert_image(&img, "square.png").unwrap();

    let side_mm = 300.0 * scale;
    let expected = side_mm * side_mm * std::f64::consts::SQRT_2;
    let error = (stats.draw_distance_mm - expected).abs() / expected;
    assert!(
        error < 0.05,
        "draw distance {:.1}mm, expected about {:.1}mm",
        stats.draw_distance_mm,
        expected
    );

    let g21 = gcode.find("G21").unwrap();
    let g90 = gcode.find("G90").unwrap();
    let m2 = gcode.rfind("M2").unwrap();
    assert!(g21 < g90 && g90 < m2);
    assert!(gcode.trim_end().ends_with("M2 ; End program"));
}

#[test]
fn mixed_drawing_fills_block_and_sliver() {
    // A solid block plus a 3px bar: the block gets angled hatching, the
    // bar takes the degenerate sliver path, and both land in one program
    // with a pen cycle per polyline.
    let mut img = canvas(400, 400);
    black_rect(&mut img, 40, 40, 120, 120);
    black_rect(&mut img, 40, 300, 320, 3);

    let config = PlotConfig {
        orientation: Orientation::Portrait,
        fill_solid_areas: true,
        hatch_spacing_px: 6.0,
        ..Default::default()
    };
    let converter = ImageConverter::new(config).unwrap();
    let (gcode, stats) = converter.convert_image(&img, "mixed.png").unwrap();

    assert!(stats.polyline_count > 120 / 6);
    assert!(stats.draw_distance_mm > 0.0);
    assert_eq!(gcode.matches("; Pen down").count(), stats.polyline_count);
}

#[test]
fn inverted_source_needs_the_invert_toggle() {
    // White line on black: without inversion nearly the whole canvas is
    // foreground; with it, only the line is.
    let mut img = GrayImage::from_pixel(300, 300, Luma([0u8]));
    for x in 50..250 {
        for y in 148..151 {
            img.put_pixel(x, y, Luma([255u8]));
        }
    }

    let inverted = PlotConfig {
        invert_colors: true,
        orientation: Orientation::Portrait,
        ..Default::default()
    };
    let (_, stats) = ImageConverter::new(inverted)
        .unwrap()
        .convert_image(&img, "inverted.png")
        .unwrap();
    assert!(stats.polyline_count < 10);
    // 200px on a 300px canvas fit to 190mm usable width.
    assert!(stats.draw_distance_mm > 100.0);
}

#[test]
fn crosshatch_roughly_doubles_draw_distance() {
    let mut img = canvas(400, 400);
    black_rect(&mut img, 100, 100, 200, 200);

    let base = PlotConfig {
        orientation: Orientation::Portrait,
        fill_solid_areas: true,
        outline_solid_areas: false,
        hatch_spacing_px: 5.0,
        ..Default::default()
    };
    let single = ImageConverter::new(base.clone())
        .unwrap()
        .convert_image(&img, "square.png")
        .unwrap()
        .1;
    let double = ImageConverter::new(PlotConfig {
        cross_hatch: true,
        ..base
    })
    .unwrap()
    .convert_image(&img, "square.png")
    .unwrap()
    .1;

    let ratio = double.draw_distance_mm / single.draw_distance_mm;
    assert!(ratio > 1.8 && ratio < 2.2, "ratio {}", ratio);
}
