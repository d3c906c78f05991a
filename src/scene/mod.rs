//! Scene model
//!
//! Each eye renders its own scene. The two scenes are built with identical
//! content but never share objects, so mutating one eye's copy leaves the
//! other untouched.

#![allow(dead_code)]

pub mod panel;
pub mod scatter;

pub use panel::{PanelBlock, PanelDocument, PanelImage, PanelSource};

use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Handle to a billboard within one scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillboardId(pub Uuid);

impl BillboardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BillboardId {
    fn default() -> Self {
        Self::new()
    }
}

/// A textured rectangle placed in the scene
#[derive(Debug, Clone)]
pub struct Billboard {
    pub id: BillboardId,
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    /// World-space width and height
    pub size: Vec2,
    pub image: PanelImage,
}

impl Billboard {
    /// Create a billboard at the origin with identity rotation
    pub fn new(name: impl Into<String>, image: PanelImage, size: Vec2) -> Self {
        Self {
            id: BillboardId::new(),
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size,
            image,
        }
    }

    /// Model matrix scaling a unit quad to this billboard's placement
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.size.extend(1.0), self.rotation, self.position)
    }
}

/// Everything one eye draws
#[derive(Debug, Clone)]
pub struct Scene {
    /// Clear color, RGBA 0-1
    pub background: [f32; 4],
    pub billboards: Vec<Billboard>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: [0.0, 0.0, 0.0, 1.0],
            billboards: Vec::new(),
        }
    }

    pub fn add(&mut self, billboard: Billboard) -> BillboardId {
        let id = billboard.id;
        self.billboards.push(billboard);
        id
    }

    pub fn get(&self, id: BillboardId) -> Option<&Billboard> {
        self.billboards.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BillboardId) -> Option<&mut Billboard> {
        self.billboards.iter_mut().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.billboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.billboards.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Left and right eye scenes
#[derive(Debug, Clone, Default)]
pub struct ScenePair {
    pub left: Scene,
    pub right: Scene,
}

/// Rasterize the panel source once per scene and place one billboard in
/// each, returning the (left, right) handles. The rasterizations are
/// independent copies.
pub fn instance_panel(source: &PanelSource, pair: &mut ScenePair) -> (BillboardId, BillboardId) {
    let (width, height) = source.pixel_size();
    let size = Vec2::new(width as f32, height as f32);
    let left = pair
        .left
        .add(Billboard::new(source.name(), source.rasterize(), size));
    let right = pair
        .right
        .add(Billboard::new(source.name(), source.rasterize(), size));
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_panel_returns_distinct_handles() {
        let source = PanelSource::Document(PanelDocument::builtin());
        let mut pair = ScenePair::default();
        let (left, right) = instance_panel(&source, &mut pair);
        assert_ne!(left, right);
        assert_eq!(pair.left.len(), 1);
        assert_eq!(pair.right.len(), 1);
    }

    #[test]
    fn test_scene_copies_are_independent() {
        let source = PanelSource::Document(PanelDocument::builtin());
        let mut pair = ScenePair::default();
        let (left, right) = instance_panel(&source, &mut pair);
        pair.left.get_mut(left).unwrap().position = Vec3::new(50.0, 0.0, 0.0);
        assert_eq!(pair.right.get(right).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_model_matrix_places_billboard() {
        let mut billboard = Billboard::new(
            "test",
            PanelImage::solid(2, 2, [255, 255, 255, 255]),
            Vec2::new(10.0, 20.0),
        );
        billboard.position = Vec3::new(1.0, 2.0, 3.0);
        let transformed = billboard.model_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(transformed.truncate(), Vec3::new(1.0, 2.0, 3.0));
        // Unit quad corner scales by the size
        let corner = billboard.model_matrix() * glam::Vec4::new(0.5, 0.5, 0.0, 1.0);
        assert_eq!(corner.truncate(), Vec3::new(6.0, 12.0, 3.0));
    }
}
