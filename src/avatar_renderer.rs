use ab_glyph::{point, Font, FontVec, GlyphId, OutlinedGlyph, PxScale, Rect, ScaleFont};
use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

use crate::people_loader::AvatarSpec;
use crate::role_colors::Rgb;

/// Width and height of every avatar, in pixels
pub const AVATAR_SIZE: u32 = 200;
/// Point size used with scalable fonts
pub const FONT_SIZE: f32 = 60.0;

// Cell each built-in glyph is stretched to. Also what the text is measured as.
const BUILTIN_CHAR_WIDTH: u32 = 20;
const BUILTIN_CHAR_HEIGHT: u32 = 30;

/// Font used to draw initials
pub enum AvatarFont {
    Scalable(FontVec),
    /// 8x8 bitmap glyphs, used when no font file could be loaded
    Builtin,
}

fn read_font(path: &str) -> Result<FontVec> {
    let data = fs::read(path).with_context(|| format!("Failed to read font file {}", path))?;
    FontVec::try_from_vec(data).with_context(|| format!("Failed to parse font file {}", path))
}

/// Use the first font in `paths` that loads, or the built-in font if none do.
pub fn load_font(paths: &[String]) -> AvatarFont {
    paths
        .iter()
        .find_map(|path| match read_font(path) {
            Ok(font) => {
                tracing::debug!(font = %path, "Using font");
                Some(AvatarFont::Scalable(font))
            }
            Err(e) => {
                tracing::debug!("Font unavailable: {:#}", e);
                None
            }
        })
        .unwrap_or_else(|| {
            tracing::debug!("No font file loaded, using built-in font");
            AvatarFont::Builtin
        })
}

/// Fill the circle inscribed in the canvas. Pixels are in when their center is.
fn fill_circle(canvas: &mut RgbaImage, color: Rgb) {
    let radius = canvas.width() as f32 / 2.0;
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy <= radius * radius {
            *pixel = Rgba([color.0, color.1, color.2, 255]);
        }
    }
}

/// Source-over composite of `color` at `coverage` onto one pixel. Off-canvas writes are dropped.
fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgb, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage == 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = coverage + dst_alpha * (1.0 - coverage);
    let mix = |src: u8, dst: u8| {
        let value = (src as f32 * coverage + dst as f32 * dst_alpha * (1.0 - coverage)) / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(color.0, dst[0]),
        mix(color.1, dst[1]),
        mix(color.2, dst[2]),
        (out_alpha * 255.0).round() as u8,
    ]);
}

/// Lay out `text` on one line with the baseline at the font's ascent.
fn layout_glyphs(font: &FontVec, text: &str) -> Vec<OutlinedGlyph> {
    let scale = font
        .pt_to_px_scale(FONT_SIZE)
        .unwrap_or(PxScale::from(FONT_SIZE));
    let scaled = font.as_scaled(scale);

    let mut caret = point(0.0, scaled.ascent());
    let mut previous: Option<GlyphId> = None;
    let mut glyphs = Vec::new();
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(previous) = previous {
            caret.x += scaled.kern(previous, id);
        }
        let glyph = id.with_scale_and_position(scale, caret);
        caret.x += scaled.h_advance(id);
        previous = Some(id);
        // Whitespace has no outline
        if let Some(outlined) = font.outline_glyph(glyph) {
            glyphs.push(outlined);
        }
    }
    glyphs
}

/// Union of the glyphs' pixel bounds, or `None` when nothing has ink.
fn ink_bounds(glyphs: &[OutlinedGlyph]) -> Option<Rect> {
    glyphs
        .iter()
        .map(OutlinedGlyph::px_bounds)
        .reduce(|a, b| Rect {
            min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        })
}

/// Top-left position that centers a `width` x `height` box on the canvas.
pub fn centered_origin(canvas_size: u32, width: i32, height: i32) -> (i32, i32) {
    let size = canvas_size as i32;
    ((size - width).div_euclid(2), (size - height).div_euclid(2))
}

/// Approximate box for the built-in font: fixed cell per character.
pub fn builtin_text_size(text: &str) -> (i32, i32) {
    let width = text.chars().count() as u32 * BUILTIN_CHAR_WIDTH;
    (width as i32, BUILTIN_CHAR_HEIGHT as i32)
}

/// Centers the measured ink box itself rather than the text origin, so the
/// space above the glyphs does not push the initials down.
fn draw_scalable_text(canvas: &mut RgbaImage, font: &FontVec, text: &str, color: Rgb) {
    let glyphs = layout_glyphs(font, text);
    let Some(bounds) = ink_bounds(&glyphs) else {
        return;
    };

    let width = (bounds.max.x - bounds.min.x) as i32;
    let height = (bounds.max.y - bounds.min.y) as i32;
    let (x, y) = centered_origin(canvas.width(), width, height);

    for glyph in &glyphs {
        let glyph_bounds = glyph.px_bounds();
        let left = x + (glyph_bounds.min.x - bounds.min.x) as i32;
        let top = y + (glyph_bounds.min.y - bounds.min.y) as i32;
        glyph.draw(|gx, gy, coverage| {
            blend_pixel(canvas, left + gx as i32, top + gy as i32, color, coverage);
        });
    }
}

fn draw_builtin_text(canvas: &mut RgbaImage, text: &str, color: Rgb) {
    let (width, height) = builtin_text_size(text);
    let (x, y) = centered_origin(canvas.width(), width, height);

    for (index, c) in text.chars().enumerate() {
        let rows = font8x8::legacy::BASIC_LEGACY
            .get(c as usize)
            .unwrap_or(&font8x8::legacy::BASIC_LEGACY['?' as usize]);
        let left = x + (index as u32 * BUILTIN_CHAR_WIDTH) as i32;

        // Nearest-neighbor stretch of the 8x8 bitmap; bit 0 is the leftmost column
        for cy in 0..BUILTIN_CHAR_HEIGHT {
            let row = rows[(cy * 8 / BUILTIN_CHAR_HEIGHT) as usize];
            for cx in 0..BUILTIN_CHAR_WIDTH {
                if (row >> (cx * 8 / BUILTIN_CHAR_WIDTH)) & 1 == 1 {
                    blend_pixel(canvas, left + cx as i32, y + cy as i32, color, 1.0);
                }
            }
        }
    }
}

/// Draw one avatar in memory: transparent canvas, filled circle, centered initials.
pub fn render_avatar(spec: &AvatarSpec, font: &AvatarFont) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, Rgba([0, 0, 0, 0]));
    fill_circle(&mut canvas, spec.background_color);

    match font {
        AvatarFont::Scalable(font) => draw_scalable_text(&mut canvas, font, &spec.initials, spec.text_color),
        AvatarFont::Builtin => draw_builtin_text(&mut canvas, &spec.initials, spec.text_color),
    }

    canvas
}

/// Render `spec` and write it as a PNG into `output_dir`. Returns the written path.
pub fn create_avatar(spec: &AvatarSpec, output_dir: &Path, font_paths: &[String]) -> Result<PathBuf> {
    let font = load_font(font_paths);
    let canvas = render_avatar(spec, &font);

    let output_path = output_dir.join(&spec.output_filename);
    canvas
        .save_with_format(&output_path, ImageFormat::Png)
        .with_context(|| format!("Failed to write avatar {}", output_path.display()))?;

    println!("Created: {}", output_path.display());

    Ok(output_path)
}
