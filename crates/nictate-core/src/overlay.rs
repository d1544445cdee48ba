//! Diagnostic overlay: detection box, landmark dots, blink counter.
//!
//! Raster feedback for the operator. Every write is clamped to the frame
//! bounds, so nothing here can fail; rendering and capture logic are
//! independent consumers of the same detection tick.

use crate::frame::Frame;
use crate::types::{BoundingBox, Detection, Point2D};

const BOX_COLOR: [u8; 3] = [0, 255, 0];
const DOT_COLOR: [u8; 3] = [0, 255, 0];
const TEXT_COLOR: [u8; 3] = [255, 255, 255];
const LINE_WIDTH: i32 = 2;
const DOT_RADIUS: i32 = 3;
const TEXT_ORIGIN: (i32, i32) = (10, 10);
const GLYPH_SCALE: i32 = 3;

/// 3×5 glyphs for the counter, one row per byte, low three bits used.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];
const SLASH: [u8; 5] = [0b001, 0b001, 0b010, 0b100, 0b100];

/// Draw the detection box, all landmark points, and a `count/required`
/// counter into the frame.
pub fn render_overlay(
    frame: &mut Frame,
    detection: &Detection,
    blink_count: u32,
    required_blinks: u32,
) {
    draw_box(frame, &detection.bbox);
    for p in &detection.landmarks.all_positions {
        draw_dot(frame, *p);
    }
    draw_text(
        frame,
        &format!("{blink_count}/{required_blinks}"),
        TEXT_ORIGIN.0,
        TEXT_ORIGIN.1,
    );
}

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width as i32 || y >= frame.height as i32 {
        return;
    }
    let idx = (y as usize * frame.width as usize + x as usize) * 3;
    if idx + 3 <= frame.data.len() {
        frame.data[idx..idx + 3].copy_from_slice(&color);
    }
}

fn draw_box(frame: &mut Frame, bbox: &BoundingBox) {
    let x0 = bbox.x as i32;
    let y0 = bbox.y as i32;
    let x1 = (bbox.x + bbox.width) as i32;
    let y1 = (bbox.y + bbox.height) as i32;

    for t in 0..LINE_WIDTH {
        for x in x0..=x1 {
            put_pixel(frame, x, y0 + t, BOX_COLOR);
            put_pixel(frame, x, y1 - t, BOX_COLOR);
        }
        for y in y0..=y1 {
            put_pixel(frame, x0 + t, y, BOX_COLOR);
            put_pixel(frame, x1 - t, y, BOX_COLOR);
        }
    }
}

fn draw_dot(frame: &mut Frame, p: Point2D) {
    let cx = p.x as i32;
    let cy = p.y as i32;
    for dy in -DOT_RADIUS..=DOT_RADIUS {
        for dx in -DOT_RADIUS..=DOT_RADIUS {
            if dx * dx + dy * dy <= DOT_RADIUS * DOT_RADIUS {
                put_pixel(frame, cx + dx, cy + dy, DOT_COLOR);
            }
        }
    }
}

fn draw_text(frame: &mut Frame, text: &str, mut x: i32, y: i32) {
    for c in text.chars() {
        let glyph = match c {
            '/' => SLASH,
            d @ '0'..='9' => DIGITS[d as usize - '0' as usize],
            _ => continue,
        };
        draw_glyph(frame, &glyph, x, y);
        x += 4 * GLYPH_SCALE;
    }
}

fn draw_glyph(frame: &mut Frame, glyph: &[u8; 5], x: i32, y: i32) {
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..3 {
            if bits & (0b100 >> col) == 0 {
                continue;
            }
            for sy in 0..GLYPH_SCALE {
                for sx in 0..GLYPH_SCALE {
                    put_pixel(
                        frame,
                        x + col as i32 * GLYPH_SCALE + sx,
                        y + row as i32 * GLYPH_SCALE + sy,
                        TEXT_COLOR,
                    );
                }
            }
        }
    }
}
