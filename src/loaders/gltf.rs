use anyhow::{bail, Context, Result};
use glam::{Mat3, Mat4, Vec3};
use std::path::Path;

use crate::scene::{MaterialData, MaterialId, MaterialLibrary, MeshGeometry, MeshNode, Model};
use crate::types::Vertex;
use crate::variants::{VariantMapping, VariantTable};

/// Everything extracted from one glTF asset
#[derive(Debug, Clone)]
pub struct ModelAssets {
    pub model: Model,
    pub materials: MaterialLibrary,
    pub textures: Vec<TextureData>,
    pub variants: VariantTable,
}

/// Texture data loaded from glTF
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA8
}

/// Loads a glTF or GLB file from disk
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelAssets> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let (document, buffers, images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    extract(&document, &buffers, &images).with_context(|| format!("Failed to read glTF contents: {:?}", path))
}

/// Loads a self-contained glTF (embedded buffers) or GLB from memory
pub fn load_model_from_slice(bytes: &[u8]) -> Result<ModelAssets> {
    let (document, buffers, images) = gltf::import_slice(bytes).context("Failed to parse glTF data")?;
    extract(&document, &buffers, &images)
}

fn extract(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<ModelAssets> {
    log::debug!(
        "glTF: {} scenes, {} nodes, {} meshes, {} materials, {} images",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count(),
        document.materials().count(),
        images.len()
    );

    let variants = VariantTable::new(
        document
            .variants()
            .map(|variants| variants.map(|variant| variant.name().to_string()).collect())
            .unwrap_or_default(),
    );

    let materials = load_materials(document);
    let textures = images.iter().enumerate().map(|(index, image)| convert_image(index, image)).collect();

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file has no scene")?;

    let mut model = Model::default();
    for node in scene.nodes() {
        process_node(&node, buffers, &Mat4::IDENTITY, materials.default_material(), &mut model)?;
    }

    if model.meshes.is_empty() {
        bail!("glTF scene contains no triangle meshes");
    }

    log::info!(
        "Loaded {} meshes ({} triangles), {} materials, {} textures, {} variants",
        model.meshes.len(),
        model.triangle_count(),
        materials.len(),
        images.len(),
        variants.len()
    );

    Ok(ModelAssets {
        model,
        materials,
        textures,
        variants,
    })
}

fn load_materials(document: &gltf::Document) -> MaterialLibrary {
    let materials = document
        .materials()
        .enumerate()
        .map(|(index, material)| {
            let pbr = material.pbr_metallic_roughness();
            let base_color_texture = pbr.base_color_texture().map(|info| info.texture().source().index());
            if let Some(image) = base_color_texture {
                log::debug!("  Material {} uses image {}", index, image);
            }

            MaterialData {
                name: material
                    .name()
                    .map_or_else(|| format!("material_{}", index), str::to_string),
                base_color: pbr.base_color_factor(),
                base_color_texture,
                metallic: pbr.metallic_factor(),
                roughness: pbr.roughness_factor(),
            }
        })
        .collect();

    MaterialLibrary::new(materials)
}

fn convert_image(index: usize, image: &gltf::image::Data) -> TextureData {
    use gltf::image::Format;

    let pixel_count = (image.width * image.height) as usize;
    let data = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect(),
        Format::R8G8 => image
            .pixels
            .chunks_exact(2)
            .flat_map(|rg| [rg[0], rg[1], 0, 255])
            .collect(),
        Format::R8 => image.pixels.iter().flat_map(|&r| [r, r, r, 255]).collect(),
        // Keep the high byte of each little-endian channel
        Format::R16G16B16A16 => image.pixels.chunks_exact(2).map(|channel| channel[1]).collect(),
        other => {
            log::warn!("Texture {}: unsupported format {:?}, using white", index, other);
            vec![255; pixel_count * 4]
        }
    };

    log::debug!("  Texture {}: {}x{} ({:?})", index, image.width, image.height, image.format);

    TextureData {
        width: image.width,
        height: image.height,
        data,
    }
}

/// Recursively processes glTF nodes, baking their transforms into the vertices
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    default_material: MaterialId,
    model: &mut Model,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        let name = node.name().or(mesh.name()).map_or_else(|| format!("mesh_{}", mesh.index()), str::to_string);
        process_mesh(&mesh, &name, buffers, &global_transform, default_material, model)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, default_material, model)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    name: &str,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    default_material: MaterialId,
    model: &mut Model,
) -> Result<()> {
    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("Mesh {:?}: skipping primitive with mode {:?}", name, primitive.mode());
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            bail!("Mesh {:?}: index {} out of range ({} vertices)", name, bad, positions.len());
        }

        let normals: Vec<Vec3> = match reader.read_normals() {
            Some(normals) => normals
                .map(|n| (normal_matrix * Vec3::from_array(n)).normalize_or(Vec3::Y))
                .collect(),
            None => compute_normals(&positions, &indices),
        };

        let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
            Some(uv_reader) => uv_reader.into_f32().collect(),
            None => vec![[0.0, 0.0]; positions.len()],
        };

        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position: position.to_array(),
                normal: normals.get(i).copied().unwrap_or(Vec3::Y).to_array(),
                uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        let material = primitive.material().index().map_or(default_material, MaterialId);

        let mappings: Vec<VariantMapping> = primitive
            .mappings()
            .map(|mapping| {
                VariantMapping::new(
                    mapping.material().index().map_or(default_material, MaterialId),
                    mapping.variants().iter().map(|&variant| variant as usize).collect(),
                )
            })
            .collect();
        let variant_mappings = if mappings.is_empty() { None } else { Some(mappings) };

        log::debug!(
            "  Primitive of {:?}: {} vertices, {} triangles, material {}, {} variant mappings",
            name,
            positions.len(),
            indices.len() / 3,
            material.0,
            variant_mappings.as_ref().map_or(0, Vec::len)
        );

        let geometry = model.geometry.len();
        model.geometry.push(MeshGeometry { vertices, indices });
        model.meshes.push(MeshNode::new(name, geometry, material, variant_mappings));
    }

    Ok(())
}

/// Area-weighted vertex normals from triangle faces
fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.into_iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}
