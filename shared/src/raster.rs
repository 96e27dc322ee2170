//! Software surface backed by an RGBA pixel buffer.
//!
//! Strokes through `tiny-skia` with the browser canvas settings the renderer
//! uses (round caps and joins, dashes, source-over) but without anti-aliasing,
//! so pixel checks stay exact.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};
use tracing::debug;

use crate::render::{Pen, Surface};
use crate::Point;

pub struct RasterSurface {
    pixmap: Pixmap,
}

impl RasterSurface {
    /// `None` when the size is zero or too large to allocate.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight (non-premultiplied) RGBA, as `getImageData` reports it.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|pixel| pixel.alpha() == 0)
    }

    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (out, pixel) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let color = pixel.demultiply();
            *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        image
    }

    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Cursor::new(Vec::new());
        self.to_image().write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// Encodes the buffer the way `canvas.toDataURL("image/png")` does.
    pub fn to_data_uri(&self) -> Result<String, image::ImageError> {
        let png = self.to_png()?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

#[cfg(test)]
impl RasterSurface {
    /// Alpha of the center grid line at row `y`. The 1px line lies on a pixel
    /// edge, so either neighbouring column may carry it.
    pub(crate) fn grid_alpha(&self, y: u32) -> u8 {
        let center = self.pixmap.width() / 2;
        [center - 1, center]
            .into_iter()
            .filter_map(|x| self.pixel(x, y))
            .map(|pixel| pixel[3])
            .max()
            .unwrap_or(0)
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> f64 {
        self.pixmap.width() as f64
    }

    fn height(&self) -> f64 {
        self.pixmap.height() as f64
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn stroke_line(&mut self, from: Point, to: Point, pen: &Pen) {
        let Some(Rgba([r, g, b, a])) = parse_css_color(&pen.color) else {
            debug!(color = %pen.color, "unsupported stroke color");
            return;
        };
        if pen.width.is_nan() || pen.width <= 0.0 {
            return;
        }
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;

        // a zero-length round-capped line is a dot
        if from == to {
            let radius = (pen.width / 2.0) as f32;
            if let Some(dot) = PathBuilder::from_circle(from.x as f32, from.y as f32, radius) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width: pen.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: pen
                .dash
                .and_then(|[on, off]| StrokeDash::new(vec![on as f32, off as f32], 0.0)),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)` and `rgba(..)`.
pub fn parse_css_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let args = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let mut rgba = [0u8, 0, 0, 255];
    for (slot, part) in rgba.iter_mut().zip(&parts[..3]) {
        let channel: f64 = part.parse().ok()?;
        *slot = channel.clamp(0.0, 255.0).round() as u8;
    }
    if let Some(alpha) = parts.get(3) {
        let alpha: f64 = alpha.parse().ok()?;
        rgba[3] = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    Some(Rgba(rgba))
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgba = [0u8, 0, 0, 255];
            for (slot, index) in rgba.iter_mut().zip(0..3) {
                let digit = channel(&hex[index..index + 1])?;
                *slot = digit * 17;
            }
            Some(Rgba(rgba))
        }
        6 | 8 => {
            let mut rgba = [0u8, 0, 0, 255];
            for (slot, index) in rgba.iter_mut().zip((0..hex.len()).step_by(2)) {
                *slot = channel(&hex[index..index + 2])?;
            }
            Some(Rgba(rgba))
        }
        _ => None,
    }
}
