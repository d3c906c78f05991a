//! Panel documents
//!
//! A panel document is the 2D content shown on the stereo billboards: a
//! background plus a stack of colored blocks, authored in RON or built in.
//! Raster images can stand in for a document. Either way the content is
//! rasterized on the CPU into RGBA pixels before it reaches the GPU.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rectangular block inside a panel document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelBlock {
    /// Left offset in document pixels
    pub x: u32,
    /// Top offset in document pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Fill color, RGBA 0-255
    pub color: [u8; 4],
}

/// Authored content for the stereo billboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDocument {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Background fill, RGBA 0-255
    pub background: [u8; 4],
    /// Blocks drawn in order, later blocks over earlier ones
    #[serde(default)]
    pub blocks: Vec<PanelBlock>,
}

impl PanelDocument {
    pub fn new(name: impl Into<String>, width: u32, height: u32, background: [u8; 4]) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            background,
            blocks: Vec::new(),
        }
    }

    /// Append one block
    pub fn add_block(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 4]) {
        self.blocks.push(PanelBlock {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// The built-in document shown when no panel source is given: a light
    /// page with a header bar, text lines and an accent panel.
    pub fn builtin() -> Self {
        let ink = [52, 58, 64, 255];
        let faded = [173, 181, 189, 255];
        let mut doc = Self::new("builtin", 512, 640, [245, 245, 240, 255]);
        doc.add_block(0, 0, 512, 72, [38, 70, 83, 255]);
        doc.add_block(24, 24, 220, 24, [233, 196, 106, 255]);
        doc.add_block(24, 104, 300, 20, ink);
        doc.add_block(24, 144, 464, 12, faded);
        doc.add_block(24, 164, 464, 12, faded);
        doc.add_block(24, 184, 380, 12, faded);
        doc.add_block(24, 228, 464, 180, [231, 111, 81, 255]);
        doc.add_block(48, 252, 416, 132, [244, 162, 97, 255]);
        doc.add_block(24, 440, 464, 12, faded);
        doc.add_block(24, 460, 440, 12, faded);
        doc.add_block(24, 480, 300, 12, faded);
        doc.add_block(0, 596, 512, 44, [38, 70, 83, 255]);
        doc
    }

    /// Rasterize the document into RGBA pixels. Blocks are clipped to the
    /// document bounds.
    pub fn rasterize(&self) -> PanelImage {
        let mut image = PanelImage::solid(self.width, self.height, self.background);
        for block in &self.blocks {
            image.fill_rect(block.x, block.y, block.width, block.height, block.color);
        }
        image
    }

    /// Load a document from a RON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let doc: Self = ron::from_str(&contents)?;
        log::info!("Loaded panel document from {:?}", path);
        Ok(doc)
    }

    /// Save the document as RON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, ron)?;
        log::info!("Saved panel document to {:?}", path);
        Ok(())
    }
}

/// Rasterized panel content, RGBA8 row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PanelImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PanelImage {
    /// Create an image filled with one color
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            pixels.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Load a raster image file (PNG, JPEG, ...)
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("Loaded panel image {:?} ({}x{})", path, width, height);
        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Fill a rectangle, clipped to the image bounds
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 4]) {
        let x1 = x.saturating_add(width).min(self.width);
        let y1 = y.saturating_add(height).min(self.height);
        for py in y.min(self.height)..y1 {
            for px in x.min(self.width)..x1 {
                let idx = ((py * self.width + px) * 4) as usize;
                self.pixels[idx..idx + 4].copy_from_slice(&color);
            }
        }
    }

    /// Read one pixel; pixels outside the image are transparent black
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Content source for the billboards: an authored document or a raster image
#[derive(Debug, Clone)]
pub enum PanelSource {
    Document(PanelDocument),
    Image { name: String, image: PanelImage },
}

impl PanelSource {
    pub fn name(&self) -> &str {
        match self {
            PanelSource::Document(doc) => &doc.name,
            PanelSource::Image { name, .. } => name,
        }
    }

    /// Content size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        match self {
            PanelSource::Document(doc) => (doc.width, doc.height),
            PanelSource::Image { image, .. } => (image.width, image.height),
        }
    }

    /// Produce an owned rasterization of the content
    pub fn rasterize(&self) -> PanelImage {
        match self {
            PanelSource::Document(doc) => doc.rasterize(),
            PanelSource::Image { image, .. } => image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_image() {
        let image = PanelImage::solid(4, 4, [10, 20, 30, 255]);
        assert_eq!(image.pixels.len(), 4 * 4 * 4);
        assert_eq!(image.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(image.pixel(3, 3), [10, 20, 30, 255]);
    }

    #[test]
    fn test_block_fills_its_rect_only() {
        let mut doc = PanelDocument::new("test", 8, 8, [0, 0, 0, 255]);
        doc.add_block(2, 2, 3, 3, [255, 0, 0, 255]);
        let image = doc.rasterize();
        assert_eq!(image.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(image.pixel(4, 4), [255, 0, 0, 255]);
        assert_eq!(image.pixel(1, 1), [0, 0, 0, 255]);
        assert_eq!(image.pixel(5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_block_clipped_to_bounds() {
        let mut doc = PanelDocument::new("test", 4, 4, [0, 0, 0, 255]);
        doc.add_block(2, 2, 100, 100, [255, 255, 255, 255]);
        let image = doc.rasterize();
        assert_eq!(image.pixel(3, 3), [255, 255, 255, 255]);
        assert_eq!(image.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn test_builtin_document_rasterizes() {
        let doc = PanelDocument::builtin();
        let image = doc.rasterize();
        assert_eq!(image.width, doc.width);
        assert_eq!(image.height, doc.height);
        // Header bar color at the top, background further down
        assert_eq!(image.pixel(256, 10), [38, 70, 83, 255]);
        assert_eq!(image.pixel(500, 550), [245, 245, 240, 255]);
    }

    #[test]
    fn test_ron_roundtrip() {
        let doc = PanelDocument::builtin();
        let path =
            std::env::temp_dir().join(format!("stereopane-panel-{}.ron", uuid::Uuid::new_v4()));
        doc.save(&path).unwrap();
        let loaded = PanelDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_source_rasterizations_are_independent() {
        let source = PanelSource::Document(PanelDocument::builtin());
        let mut a = source.rasterize();
        let b = source.rasterize();
        a.fill_rect(0, 0, 16, 16, [1, 2, 3, 4]);
        assert_ne!(a.pixel(0, 0), b.pixel(0, 0));
    }
}
