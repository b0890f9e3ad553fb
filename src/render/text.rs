use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::Font;
use vello::peniko::{Blob, Image, ImageFormat};

/// Rasterized glyph cache key: glyph index, pixel size bits, RGB.
type GlyphKey = (u16, u32, [u8; 3]);

/// CPU text rasterizer. Glyphs come out of fontdue as coverage masks and are
/// turned into tinted RGBA images that vello draws like any other image.
pub struct TextRenderer {
    fonts: HashMap<String, Font>,
    layout: Layout,
    glyph_cache: HashMap<GlyphKey, Image>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            glyph_cache: HashMap::new(),
        }
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn load_font_from_path(&mut self, name: &str, path: &Path) -> Result<()> {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let font = Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("Failed to parse font {}: {}", path.display(), e))?;
        self.fonts.insert(name.to_string(), font);
        self.glyph_cache.clear();
        tracing::info!("Loaded text font from {}", path.display());
        Ok(())
    }

    /// Try the usual sans-serif fonts of each desktop platform.
    pub fn load_system_font(&mut self, name: &str) -> Result<()> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        if let Ok(windir) = std::env::var("WINDIR") {
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\segoeui.ttf")));
            candidates.push(PathBuf::from(format!("{windir}\\Fonts\\arial.ttf")));
        }
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\segoeui.ttf"));
        candidates.push(PathBuf::from("C:\\Windows\\Fonts\\arial.ttf"));

        candidates.push(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"));
        candidates.push(PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans.ttf"));
        candidates.push(PathBuf::from(
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ));
        candidates.push(PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"));
        candidates.push(PathBuf::from("/Library/Fonts/Arial.ttf"));

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match self.load_font_from_path(name, &path) {
                Ok(()) => return Ok(()),
                Err(e) => tracing::debug!("Skipping font: {:#}", e),
            }
        }

        Err(anyhow!("unable to load a system font from known locations"))
    }

    /// Lay out and rasterize a single line of text in `color`.
    pub fn render_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: f32,
        max_width: Option<f32>,
        color: [u8; 3],
    ) -> Option<TextRenderResult> {
        let font = self.fonts.get(font_name)?;

        self.layout.reset(&LayoutSettings {
            max_width,
            ..Default::default()
        });
        self.layout.append(&[font], &TextStyle::new(text, font_size, 0));

        let mut glyphs = Vec::new();
        let mut width: f32 = 0.0;
        for glyph in self.layout.glyphs() {
            width = width.max(glyph.x + glyph.width as f32);
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }

            let key = (glyph.key.glyph_index, glyph.key.px.to_bits(), color);
            let image = self
                .glyph_cache
                .entry(key)
                .or_insert_with(|| {
                    let (metrics, coverage) = font.rasterize_config(glyph.key);
                    tinted_image(&coverage, metrics.width, metrics.height, color)
                })
                .clone();

            glyphs.push(TextGlyph {
                x: glyph.x,
                y: glyph.y,
                image,
            });
        }

        if glyphs.is_empty() {
            return None;
        }

        Some(TextRenderResult {
            glyphs,
            width,
            height: self.layout.height(),
        })
    }
}

/// Coverage mask to RGBA with the color in every pixel and coverage as alpha.
fn tinted_image(coverage: &[u8], width: usize, height: usize, color: [u8; 3]) -> Image {
    let mut rgba = Vec::with_capacity(coverage.len() * 4);
    for &alpha in coverage {
        rgba.extend_from_slice(&[color[0], color[1], color[2], alpha]);
    }
    let data: Arc<dyn AsRef<[u8]> + Send + Sync> = Arc::new(rgba);
    Image::new(Blob::new(data), ImageFormat::Rgba8, width as u32, height as u32)
}

pub struct TextRenderResult {
    pub glyphs: Vec<TextGlyph>,
    /// Advance width of the laid-out line (px)
    pub width: f32,
    /// Line height (px)
    pub height: f32,
}

pub struct TextGlyph {
    pub x: f32,
    pub y: f32,
    pub image: Image,
}
