// variants.rs - Material variant selection (KHR_materials_variants)

use anyhow::{anyhow, Result};
use futures::future::{self, LocalBoxFuture};

use crate::core::WindowContext;
use crate::scene::{MaterialId, MaterialLibrary, Scene};

/// Variant selected when nothing else is requested
pub const DEFAULT_VARIANT: &str = "street";

/// Ordered variant names from the asset's root extension
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantTable {
    names: Vec<String>,
}

impl VariantTable {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Index of the first variant whose name contains `query`
    pub fn resolve(&self, query: &str) -> Option<usize> {
        self.names.iter().position(|name| name.contains(query))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One `{ material, variants }` entry of a primitive's variant extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantMapping {
    pub material: MaterialId,
    pub variants: Vec<usize>,
}

impl VariantMapping {
    pub fn new(material: MaterialId, variants: Vec<usize>) -> Self {
        Self { material, variants }
    }

    pub fn applies_to(&self, variant: usize) -> bool {
        self.variants.contains(&variant)
    }
}

/// Turns a material reference into a material ready for drawing
pub trait MaterialResolver {
    fn resolve(&self, material: MaterialId) -> LocalBoxFuture<'_, Result<MaterialId>>;
}

impl MaterialResolver for MaterialLibrary {
    fn resolve(&self, material: MaterialId) -> LocalBoxFuture<'_, Result<MaterialId>> {
        let resolved = match self.get(material) {
            Some(_) => Ok(material),
            None => Err(anyhow!("material {} is not in the library ({} entries)", material.0, self.len())),
        };
        Box::pin(future::ready(resolved))
    }
}

/// What one selection did to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionReport {
    pub variant_index: Option<usize>,
    /// Meshes now showing a mapped material
    pub mapped: usize,
    /// Meshes reset to their original material
    pub restored: usize,
    /// Meshes without variant metadata
    pub untouched: usize,
}

enum Target {
    Mapped(MaterialId),
    Original,
}

/// Apply the variant named `variant_name` to every mesh in `scene`.
///
/// Material resolutions are awaited as one batch; the redraw is requested
/// exactly once, after every mesh has its final material.
pub async fn select_variant<R>(
    scene: &mut Scene,
    table: &VariantTable,
    variant_name: &str,
    resolver: &R,
    window: &dyn WindowContext,
) -> SelectionReport
where
    R: MaterialResolver + ?Sized,
{
    let variant_index = table.resolve(variant_name);
    let mut report = SelectionReport {
        variant_index,
        ..SelectionReport::default()
    };

    let mut plan = Vec::new();
    for (mesh_index, mesh) in scene.meshes_mut().enumerate() {
        let Some(mappings) = mesh.variant_mappings.as_ref() else {
            report.untouched += 1;
            continue;
        };

        let mapped = variant_index.and_then(|index| {
            mappings
                .iter()
                .find(|mapping| mapping.applies_to(index))
                .map(|mapping| mapping.material)
        });

        mesh.remember_original();

        let target = match mapped {
            Some(material) => Target::Mapped(material),
            None => Target::Original,
        };
        plan.push((mesh_index, target));
    }

    let resolved = future::join_all(plan.iter().map(|(_, target)| async move {
        match target {
            Target::Mapped(material) => Some(resolver.resolve(*material).await),
            Target::Original => None,
        }
    }))
    .await;

    let mut meshes: Vec<_> = scene.meshes_mut().collect();
    for ((mesh_index, _), resolution) in plan.iter().zip(resolved) {
        let mesh = &mut meshes[*mesh_index];
        let original = mesh.remember_original();

        match resolution {
            Some(Ok(material)) => {
                mesh.material = material;
                report.mapped += 1;
            }
            Some(Err(e)) => {
                log::warn!("Mesh {:?}: {:#}; keeping original material", mesh.name, e);
                mesh.material = original;
                report.restored += 1;
            }
            None => {
                mesh.material = original;
                report.restored += 1;
            }
        }
    }

    log::debug!(
        "Variant {:?} -> index {:?}: {} mapped, {} restored, {} untouched",
        variant_name,
        report.variant_index,
        report.mapped,
        report.restored,
        report.untouched
    );

    window.request_redraw();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WindowDimensions;
    use crate::scene::{AmbientLight, DirectionalLight, Lights, MaterialData, MeshNode, Model};
    use glam::Vec3;
    use std::cell::Cell;

    struct CountingWindow {
        redraws: Cell<usize>,
    }

    impl WindowContext for CountingWindow {
        fn dimensions(&self) -> WindowDimensions {
            WindowDimensions::new(800, 600)
        }

        fn request_redraw(&self) {
            self.redraws.set(self.redraws.get() + 1);
        }
    }

    fn lights() -> Lights {
        Lights {
            ambient: AmbientLight { color: Vec3::ONE, intensity: 1.0 },
            directional: DirectionalLight {
                color: Vec3::ONE,
                intensity: 1.0,
                position: Vec3::Y,
                target: Vec3::ZERO,
            },
        }
    }

    fn library(count: usize) -> MaterialLibrary {
        MaterialLibrary::new(
            (0..count)
                .map(|i| MaterialData::new_color(format!("m{}", i), [1.0; 4]))
                .collect(),
        )
    }

    fn scene_with(meshes: Vec<MeshNode>) -> Scene {
        let mut scene = Scene::new(lights());
        scene.add_model(Model {
            meshes,
            ..Model::default()
        });
        scene
    }

    fn materials(scene: &Scene) -> Vec<MaterialId> {
        scene.meshes().map(|mesh| mesh.material).collect()
    }

    #[test]
    fn test_resolve_uses_substring_first_match() {
        let table = VariantTable::new(vec!["midnight".into(), "beach".into(), "street".into(), "street-2".into()]);
        assert_eq!(table.resolve("street"), Some(2));
        assert_eq!(table.resolve("night"), Some(0));
        assert_eq!(table.resolve(""), Some(0));
        assert_eq!(table.resolve("desert"), None);
    }

    #[test]
    fn test_select_applies_mapping_and_redraws_once() {
        let table = VariantTable::new(vec!["street".into(), "beach".into()]);
        let mut scene = scene_with(vec![
            MeshNode::new("sole", 0, MaterialId(0), Some(vec![VariantMapping::new(MaterialId(1), vec![0])])),
            MeshNode::new("logo", 0, MaterialId(2), None),
        ]);
        let window = CountingWindow { redraws: Cell::new(0) };

        let report = pollster::block_on(select_variant(&mut scene, &table, "street", &library(3), &window));

        assert_eq!(materials(&scene), vec![MaterialId(1), MaterialId(2)]);
        assert_eq!(report.variant_index, Some(0));
        assert_eq!((report.mapped, report.restored, report.untouched), (1, 0, 1));
        assert_eq!(window.redraws.get(), 1);
    }

    #[test]
    fn test_unresolvable_material_falls_back_to_original() {
        let table = VariantTable::new(vec!["street".into()]);
        let mut scene = scene_with(vec![MeshNode::new(
            "sole",
            0,
            MaterialId(0),
            Some(vec![VariantMapping::new(MaterialId(42), vec![0])]),
        )]);
        let window = CountingWindow { redraws: Cell::new(0) };

        let report = pollster::block_on(select_variant(&mut scene, &table, "street", &library(1), &window));

        assert_eq!(materials(&scene), vec![MaterialId(0)]);
        assert_eq!(report.restored, 1);
        assert_eq!(window.redraws.get(), 1);
    }

    #[test]
    fn test_empty_scene_still_redraws() {
        let mut scene = Scene::new(lights());
        let window = CountingWindow { redraws: Cell::new(0) };

        let report = pollster::block_on(select_variant(
            &mut scene,
            &VariantTable::default(),
            "street",
            &library(0),
            &window,
        ));

        assert_eq!(report, SelectionReport::default());
        assert_eq!(window.redraws.get(), 1);
    }
}
