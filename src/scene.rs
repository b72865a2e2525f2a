use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::types::Vertex;
use crate::variants::VariantMapping;

/// Transform channel animated by the scroll timelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Scale,
    Position,
    Rotation,
}

/// Position, Euler rotation (XYZ order, radians) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    pub fn get(&self, property: Property) -> Vec3 {
        match property {
            Property::Scale => self.scale,
            Property::Position => self.position,
            Property::Rotation => self.rotation,
        }
    }

    pub fn get_mut(&mut self, property: Property) -> &mut Vec3 {
        match property {
            Property::Scale => &mut self.scale,
            Property::Position => &mut self.position,
            Property::Rotation => &mut self.rotation,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Index into the material library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Material parameters extracted from the asset
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub base_color: [f32; 4],
    /// Index into the texture list
    pub base_color_texture: Option<usize>,
    pub metallic: f32,
    pub roughness: f32,
}

impl MaterialData {
    pub fn new_color(name: impl Into<String>, base_color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            base_color,
            base_color_texture: None,
            metallic: 0.0,
            roughness: 1.0,
        }
    }
}

/// All materials of the loaded asset, plus a trailing default material
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: Vec<MaterialData>,
}

impl MaterialLibrary {
    /// Build a library; a neutral default material is appended after the asset's own
    pub fn new(mut materials: Vec<MaterialData>) -> Self {
        materials.push(MaterialData::new_color("default", [0.7, 0.7, 0.7, 1.0]));
        Self { materials }
    }

    pub fn default_material(&self) -> MaterialId {
        MaterialId(self.materials.len().saturating_sub(1))
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialData> {
        self.materials.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialData> {
        self.materials.iter()
    }
}

/// Triangle geometry of one mesh, in model space
#[derive(Debug, Clone, Default)]
pub struct MeshGeometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// One drawable primitive of the model
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: String,
    /// Index into `Model::geometry`
    pub geometry: usize,
    pub material: MaterialId,
    /// Material seen by the first variant switch; never overwritten once set
    original_material: Option<MaterialId>,
    /// `None` when the primitive carries no variant extension
    pub variant_mappings: Option<Vec<VariantMapping>>,
}

impl MeshNode {
    pub fn new(
        name: impl Into<String>,
        geometry: usize,
        material: MaterialId,
        variant_mappings: Option<Vec<VariantMapping>>,
    ) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            original_material: None,
            variant_mappings,
        }
    }

    pub fn has_variants(&self) -> bool {
        self.variant_mappings.is_some()
    }

    pub fn original_material(&self) -> Option<MaterialId> {
        self.original_material
    }

    /// Cache the current material as original on first call, return the cached value
    pub fn remember_original(&mut self) -> MaterialId {
        *self.original_material.get_or_insert(self.material)
    }
}

/// The loaded product model
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub transform: Transform,
    pub meshes: Vec<MeshNode>,
    pub geometry: Vec<MeshGeometry>,
}

impl Model {
    pub fn triangle_count(&self) -> usize {
        self.meshes
            .iter()
            .filter_map(|mesh| self.geometry.get(mesh.geometry))
            .map(|geometry| geometry.indices.len() / 3)
            .sum()
    }
}

/// Convert an sRGB hex color to linear RGB
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the target towards the light
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

/// Root container: lights and, once loaded, the model
#[derive(Debug, Clone)]
pub struct Scene {
    pub lights: Lights,
    model: Option<Model>,
}

impl Scene {
    pub fn new(lights: Lights) -> Self {
        Self { lights, model: None }
    }

    pub fn add_model(&mut self, model: Model) {
        self.model = Some(model);
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    /// Every mesh in the scene, empty before the model is installed
    pub fn meshes(&self) -> impl Iterator<Item = &MeshNode> {
        self.model.iter().flat_map(|model| model.meshes.iter())
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut MeshNode> {
        self.model.iter_mut().flat_map(|model| model.meshes.iter_mut())
    }
}
