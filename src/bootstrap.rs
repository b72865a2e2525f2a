// bootstrap.rs - Camera, lights and renderer settings plus the resize handler

use glam::Vec3;

use crate::camera::{Camera, OrbitControls};
use crate::core::{WindowContext, WindowDimensions};
use crate::scene::{color_from_hex, AmbientLight, DirectionalLight, Lights, Scene};
use crate::types::LightUniform;

pub const AMBIENT_COLOR: u32 = 0x444444;
pub const AMBIENT_INTENSITY: f32 = 50.0;
pub const DIRECTIONAL_COLOR: u32 = 0xffffff;
pub const DIRECTIONAL_INTENSITY: f32 = 1.0;
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(0.0, 10.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneMapping {
    None,
    AcesFilmic,
}

impl ToneMapping {
    fn shader_flag(self) -> u32 {
        match self {
            ToneMapping::None => 0,
            ToneMapping::AcesFilmic => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    pub pixel_ratio: f32,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub msaa_samples: u32,
}

impl RendererSettings {
    pub fn new(pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.0,
            msaa_samples: 4,
        }
    }
}

pub fn default_lights() -> Lights {
    Lights {
        ambient: AmbientLight {
            color: color_from_hex(AMBIENT_COLOR),
            intensity: AMBIENT_INTENSITY,
        },
        directional: DirectionalLight {
            color: color_from_hex(DIRECTIONAL_COLOR),
            intensity: DIRECTIONAL_INTENSITY,
            position: DIRECTIONAL_POSITION,
            target: Vec3::ZERO,
        },
    }
}

/// Everything the render loop draws from, minus the GPU resources
#[derive(Debug, Clone)]
pub struct SceneContext {
    pub camera: Camera,
    pub controls: OrbitControls,
    pub scene: Scene,
    pub settings: RendererSettings,
    pub viewport: WindowDimensions,
}

impl SceneContext {
    pub fn bootstrap(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let viewport = WindowDimensions::new(width, height);
        let mut camera = Camera::new(viewport.aspect());
        let controls = OrbitControls::default();
        controls.attach(&mut camera);

        log::info!("Scene ready: {}x{} @ {:.2}x", width, height, pixel_ratio);

        Self {
            camera,
            controls,
            scene: Scene::new(default_lights()),
            settings: RendererSettings::new(pixel_ratio),
            viewport,
        }
    }

    /// Update aspect and viewport, then request one redraw. Zero sizes are ignored.
    pub fn on_resize(&mut self, width: u32, height: u32, window: &dyn WindowContext) -> bool {
        let viewport = WindowDimensions::new(width, height);
        if viewport.is_empty() {
            return false;
        }

        self.viewport = viewport;
        self.camera.set_aspect(width as f32 / height as f32);
        window.request_redraw();
        true
    }

    pub fn light_uniform(&self) -> LightUniform {
        let lights = &self.scene.lights;
        LightUniform {
            ambient: (lights.ambient.color * lights.ambient.intensity).to_array(),
            exposure: self.settings.exposure,
            direction: lights.directional.direction().to_array(),
            tone_mapping: self.settings.tone_mapping.shader_flag(),
            directional: (lights.directional.color * lights.directional.intensity).to_array(),
            _pad: 0.0,
        }
    }
}
