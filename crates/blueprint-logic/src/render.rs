//! Thin renderers over the exported layout.
//!
//! Both read only the [`LayoutResult`] contract: the annotated SVG for
//! people, and the black-on-white wall mask that conditions the image model.

use std::fmt::Write;

use crate::constants::cells;
use crate::export::LayoutResult;

/// Pixels per grid cell in the SVG.
pub const SVG_CELL_PX: usize = 30;

const DOOR_SCALE: f64 = 0.8;
const BACKGROUND: &str = "#F5F5F5";

/// Annotated SVG: colored rooms with bold centered names, doorway squares
/// and a faint dashed cell grid.
pub fn to_svg(layout: &LayoutResult) -> String {
    let (width, height) = layout.grid_size;
    let px = SVG_CELL_PX;
    let svg_w = width * px;
    let svg_h = height * px;

    let mut out = String::new();
    writeln!(
        out,
        r#"<svg width="{svg_w}" height="{svg_h}" viewBox="0 0 {svg_w} {svg_h}" xmlns="http://www.w3.org/2000/svg">"#
    )
    .unwrap();
    writeln!(out, r#"<rect width="{svg_w}" height="{svg_h}" fill="{BACKGROUND}" />"#).unwrap();

    for room in layout.room_positions.values() {
        let x = room.x * px;
        let y = room.y * px;
        let w = room.width * px;
        let h = room.height * px;
        writeln!(
            out,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{}" stroke="black" stroke-width="2" />"#,
            room.color
        )
        .unwrap();
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-family="Arial" font-size="12" font-weight="bold" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            x as f64 + w as f64 / 2.0,
            y as f64 + h as f64 / 2.0,
            escape_xml(&room.name)
        )
        .unwrap();
    }

    let door = px as f64 * DOOR_SCALE;
    let inset = (px as f64 - door) / 2.0;
    for (row_idx, row) in layout.grid.iter().enumerate() {
        for (col_idx, &value) in row.iter().enumerate() {
            if value != cells::DOORWAY {
                continue;
            }
            writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{door}" height="{door}" fill="white" stroke="black" stroke-width="1.5" />"#,
                (col_idx * px) as f64 + inset,
                (row_idx * px) as f64 + inset
            )
            .unwrap();
        }
    }

    for i in 0..=width {
        let x = i * px;
        writeln!(
            out,
            r#"<line x1="{x}" y1="0" x2="{x}" y2="{svg_h}" stroke="gray" stroke-width="0.5" stroke-dasharray="3,3" opacity="0.3" />"#
        )
        .unwrap();
    }
    for i in 0..=height {
        let y = i * px;
        writeln!(
            out,
            r#"<line x1="0" y1="{y}" x2="{svg_w}" y2="{y}" stroke="gray" stroke-width="0.5" stroke-dasharray="3,3" opacity="0.3" />"#
        )
        .unwrap();
    }

    out.push_str("</svg>");
    out
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Binary raster of room outlines. `true` is a black (wall) pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallMask {
    pub width: usize,
    pub height: usize,
    pixels: Vec<bool>,
}

impl WallMask {
    fn blank(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn wall_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    fn mark(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = true;
        }
    }

    /// Plain-text PBM (`P1`), 1 = black.
    pub fn to_pbm(&self) -> String {
        let mut out = format!("P1\n{} {}\n", self.width, self.height);
        if self.width == 0 {
            return out;
        }
        for row in self.pixels.chunks(self.width) {
            let line: Vec<&str> = row.iter().map(|&p| if p { "1" } else { "0" }).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

/// Rasterize room outlines at `px_per_cell` with a one-cell white margin.
/// Rooms are white with black walls; doors and labels are left out.
pub fn wall_mask(layout: &LayoutResult, px_per_cell: usize) -> WallMask {
    let p = px_per_cell.max(1);
    let (width, height) = layout.grid_size;
    let mut mask = WallMask::blank((width + 2) * p, (height + 2) * p);
    let thickness = (p / 8).max(1);

    for room in layout.room_positions.values() {
        let x0 = (room.x + 1) * p;
        let y0 = (room.y + 1) * p;
        let x1 = x0 + room.width * p;
        let y1 = y0 + room.height * p;
        for y in y0..y1 {
            for x in x0..x1 {
                let near_edge = x < x0 + thickness
                    || x + thickness >= x1
                    || y < y0 + thickness
                    || y + thickness >= y1;
                if near_edge {
                    mask.mark(x, y);
                }
            }
        }
    }
    mask
}
