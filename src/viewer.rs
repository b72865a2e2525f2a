// viewer.rs - Viewer context: scene, selection, page and animation state

use anyhow::Result;
use glam::Vec3;

use crate::bootstrap::SceneContext;
use crate::choreography::Choreography;
use crate::core::WindowContext;
use crate::device::DeviceClass;
use crate::loaders::ModelAssets;
use crate::overlay::{LoadState, OverlayAction, OverlayState};
use crate::scene::MaterialLibrary;
use crate::scroll::{PageLayout, ScrollAnimator};
use crate::timeline::Ease;
use crate::variants::{self, SelectionReport, VariantTable, DEFAULT_VARIANT};

/// Uniform scale applied to the model when it is installed
pub const MODEL_SCALE: f32 = 10.0;
/// Arrow-key scroll step in logical pixels
pub const KEY_SCROLL_STEP: f32 = 40.0;
/// Page keys scroll this fraction of the viewport
pub const PAGE_SCROLL_FRACTION: f32 = 0.9;

/// Events delivered to the event loop from worker threads
#[derive(Debug)]
pub enum ViewerEvent {
    ModelLoaded(Result<ModelAssets>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKey {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub default_variant: String,
    pub user_agent: Option<String>,
    pub device: Option<DeviceClass>,
    pub sections: usize,
    /// Section height in viewport heights
    pub section_height: f32,
    pub choreography: Choreography,
    /// Variant buttons; every variant of the asset when `None`
    pub buttons: Option<Vec<String>>,
    pub ease: Ease,
    pub show_ui: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_variant: DEFAULT_VARIANT.to_string(),
            user_agent: None,
            device: None,
            sections: 6,
            section_height: 1.0,
            choreography: Choreography::builtin(),
            buttons: None,
            ease: Ease::default(),
            show_ui: true,
        }
    }
}

pub struct Viewer {
    pub context: SceneContext,
    device: DeviceClass,
    animator: ScrollAnimator,
    layout: PageLayout,
    default_variant: String,
    selected: String,
    configured_buttons: Option<Vec<String>>,
    buttons: Vec<String>,
    variants: VariantTable,
    materials: MaterialLibrary,
    load_state: LoadState,
    show_ui: bool,
}

impl Viewer {
    /// `width`/`height` in physical pixels
    pub fn new(config: ViewerConfig, width: u32, height: u32, pixel_ratio: f32) -> Self {
        let context = SceneContext::bootstrap(width, height, pixel_ratio);
        let logical_width = width as f32 / pixel_ratio;
        let logical_height = height as f32 / pixel_ratio;

        let device = config
            .device
            .unwrap_or_else(|| DeviceClass::detect(config.user_agent.as_deref(), logical_width));
        log::info!("Device class: {}", device.name());

        Self {
            context,
            device,
            animator: ScrollAnimator::new(config.choreography, device, config.ease),
            layout: PageLayout::uniform(config.sections, config.section_height, logical_height),
            selected: config.default_variant.clone(),
            default_variant: config.default_variant,
            configured_buttons: config.buttons,
            buttons: Vec::new(),
            variants: VariantTable::default(),
            materials: MaterialLibrary::default(),
            load_state: LoadState::Loading,
            show_ui: config.show_ui,
        }
    }

    /// Put a freshly loaded model on stage
    pub fn install_model(&mut self, assets: ModelAssets, window: &dyn WindowContext) -> SelectionReport {
        let ModelAssets {
            mut model,
            materials,
            variants,
            ..
        } = assets;

        model.transform.scale = Vec3::splat(MODEL_SCALE);
        self.context.scene.add_model(model);
        self.variants = variants;
        self.materials = materials;

        let default_variant = self.default_variant.clone();
        let report = self.select_variant(&default_variant, window);

        self.buttons = self
            .configured_buttons
            .clone()
            .unwrap_or_else(|| self.variants.names().to_vec());

        self.animator.arm(&self.layout);
        if let Some(model) = self.context.scene.model_mut() {
            self.animator.update(self.layout.scroll(), &mut model.transform);
        }

        window.request_redraw();
        self.load_state = LoadState::Ready;
        log::info!(
            "Model ready: {} variants, {} buttons, {} sections",
            self.variants.len(),
            self.buttons.len(),
            self.animator.sections().len()
        );
        report
    }

    pub fn fail_loading(&mut self, error: &anyhow::Error) {
        log::error!("Failed to load model: {:#}", error);
        self.load_state = LoadState::Failed(format!("{:#}", error));
    }

    pub fn select_variant(&mut self, name: &str, window: &dyn WindowContext) -> SelectionReport {
        self.selected = name.to_string();
        pollster::block_on(variants::select_variant(
            &mut self.context.scene,
            &self.variants,
            name,
            &self.materials,
            window,
        ))
    }

    pub fn handle_action(&mut self, action: OverlayAction, window: &dyn WindowContext) {
        match action {
            OverlayAction::SelectVariant(name) => {
                self.select_variant(&name, window);
            }
        }
    }

    /// `width`/`height` in physical pixels
    pub fn on_resize(&mut self, width: u32, height: u32, window: &dyn WindowContext) -> bool {
        if !self.context.on_resize(width, height, window) {
            return false;
        }

        self.layout.resize(height as f32 / self.context.settings.pixel_ratio);
        self.animator.refresh(&self.layout);
        if let Some(model) = self.context.scene.model_mut() {
            self.animator.update(self.layout.scroll(), &mut model.transform);
        }
        true
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.context.settings.pixel_ratio = pixel_ratio;
    }

    /// Scroll the page by `delta` logical pixels
    pub fn on_scroll(&mut self, delta: f32, window: &dyn WindowContext) -> bool {
        if !self.layout.scroll_by(delta) {
            return false;
        }
        self.apply_scroll(window);
        true
    }

    pub fn on_scroll_key(&mut self, key: ScrollKey, window: &dyn WindowContext) -> bool {
        let page = self.layout.viewport_height() * PAGE_SCROLL_FRACTION;
        let moved = match key {
            ScrollKey::LineUp => self.layout.scroll_by(-KEY_SCROLL_STEP),
            ScrollKey::LineDown => self.layout.scroll_by(KEY_SCROLL_STEP),
            ScrollKey::PageUp => self.layout.scroll_by(-page),
            ScrollKey::PageDown => self.layout.scroll_by(page),
            ScrollKey::Home => self.layout.scroll_to(0.0),
            ScrollKey::End => self.layout.scroll_to(self.layout.max_scroll()),
        };
        if moved {
            self.apply_scroll(window);
        }
        moved
    }

    fn apply_scroll(&mut self, window: &dyn WindowContext) {
        if let Some(model) = self.context.scene.model_mut() {
            if self.animator.update(self.layout.scroll(), &mut model.transform) {
                window.request_redraw();
            }
        }
    }

    pub fn on_orbit(&mut self, dx: f32, dy: f32, window: &dyn WindowContext) -> bool {
        let moved = self.context.controls.rotate(&mut self.context.camera, dx, dy);
        if moved {
            window.request_redraw();
        }
        moved
    }

    pub fn on_zoom(&mut self, delta: f32, window: &dyn WindowContext) -> bool {
        let moved = self.context.controls.zoom(&mut self.context.camera, delta);
        if moved {
            window.request_redraw();
        }
        moved
    }

    pub fn overlay_state(&self, fps: f32) -> OverlayState<'_> {
        OverlayState {
            load_state: &self.load_state,
            buttons: &self.buttons,
            selected: &self.selected,
            device: self.device,
            section: self.layout.current_section(),
            fps,
            show_ui: self.show_ui,
        }
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn animator(&self) -> &ScrollAnimator {
        &self.animator
    }

    pub fn selected_variant(&self) -> &str {
        &self.selected
    }

    pub fn buttons(&self) -> &[String] {
        &self.buttons
    }

    pub fn variants(&self) -> &VariantTable {
        &self.variants
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }
}
