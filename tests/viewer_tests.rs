use std::cell::Cell;
use variant_viewer::core::{WindowContext, WindowDimensions};
use variant_viewer::device::DeviceClass;
use variant_viewer::loaders::{load_model, ModelAssets};
use variant_viewer::overlay::{LoadState, OverlayAction};
use variant_viewer::scene::MaterialId;
use variant_viewer::viewer::{ScrollKey, Viewer, ViewerConfig, MODEL_SCALE};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/variant_shoe.gltf");

struct CountingWindow {
    redraws: Cell<usize>,
}

impl CountingWindow {
    fn new() -> Self {
        Self { redraws: Cell::new(0) }
    }
}

impl WindowContext for CountingWindow {
    fn dimensions(&self) -> WindowDimensions {
        WindowDimensions::new(1280, 800)
    }

    fn request_redraw(&self) {
        self.redraws.set(self.redraws.get() + 1);
    }
}

fn assets() -> ModelAssets {
    load_model(FIXTURE).expect("fixture loads")
}

fn sole_material(viewer: &Viewer) -> MaterialId {
    viewer
        .context
        .scene
        .meshes()
        .find(|mesh| mesh.name == "sole")
        .map(|mesh| mesh.material)
        .expect("sole mesh")
}

fn installed_viewer(config: ViewerConfig) -> (Viewer, CountingWindow) {
    let mut viewer = Viewer::new(config, 1280, 800, 1.0);
    let window = CountingWindow::new();
    viewer.install_model(assets(), &window);
    (viewer, window)
}

#[cfg(test)]
mod install_tests {
    use super::*;

    #[test]
    fn test_viewer_starts_loading() {
        let viewer = Viewer::new(ViewerConfig::default(), 1280, 800, 1.0);
        assert_eq!(viewer.load_state(), &LoadState::Loading);
        assert_eq!(viewer.device(), DeviceClass::Desktop);
        assert!(viewer.context.scene.model().is_none());
        assert!(!viewer.animator().is_armed());
        assert!(viewer.buttons().is_empty());
    }

    #[test]
    fn test_install_selects_default_and_arms_animation() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 1280, 800, 1.0);
        let window = CountingWindow::new();

        let report = viewer.install_model(assets(), &window);

        assert_eq!(report.variant_index, Some(0));
        assert_eq!(sole_material(&viewer), MaterialId(1));
        assert_eq!(viewer.selected_variant(), "street");
        assert_eq!(viewer.buttons(), ["street", "midnight", "beach"]);
        assert!(viewer.load_state().is_ready());
        assert_eq!(viewer.animator().sections().len(), 6);
        assert_eq!(viewer.animator().sections()[0].timeline.progress(), 0.5);
        // one from the variant switch, one for the first frame
        assert_eq!(window.redraws.get(), 2);

        let model = viewer.context.scene.model().unwrap();
        assert_eq!(model.transform.scale.x, MODEL_SCALE);
    }

    #[test]
    fn test_unknown_default_variant_keeps_original_materials() {
        let config = ViewerConfig {
            default_variant: "gold".to_string(),
            ..ViewerConfig::default()
        };
        let (viewer, window) = installed_viewer(config);

        assert_eq!(sole_material(&viewer), MaterialId(0));
        assert!(viewer.load_state().is_ready());
        assert_eq!(window.redraws.get(), 2);
    }

    #[test]
    fn test_configured_buttons_and_device() {
        let config = ViewerConfig {
            buttons: Some(vec!["beach".to_string(), "street".to_string()]),
            device: Some(DeviceClass::Mobile),
            ..ViewerConfig::default()
        };
        let (viewer, _) = installed_viewer(config);

        assert_eq!(viewer.buttons(), ["beach", "street"]);
        assert_eq!(viewer.device(), DeviceClass::Mobile);
        assert_eq!(viewer.overlay_state(0.0).device, DeviceClass::Mobile);
    }

    #[test]
    fn test_user_agent_picks_device() {
        let config = ViewerConfig {
            user_agent: Some("Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)".to_string()),
            ..ViewerConfig::default()
        };
        let viewer = Viewer::new(config, 1280, 800, 1.0);
        assert_eq!(viewer.device(), DeviceClass::Tablet);
    }

    #[test]
    fn test_failed_load_is_reported() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 1280, 800, 1.0);
        let error = load_model("/nonexistent/shoe.gltf").unwrap_err();

        viewer.fail_loading(&error);

        match viewer.load_state() {
            LoadState::Failed(message) => assert!(message.contains("shoe.gltf")),
            other => panic!("unexpected load state {:?}", other),
        }
    }
}

#[cfg(test)]
mod interaction_tests {
    use super::*;

    #[test]
    fn test_overlay_action_switches_variant() {
        let (mut viewer, window) = installed_viewer(ViewerConfig::default());

        viewer.handle_action(OverlayAction::SelectVariant("midnight".to_string()), &window);

        assert_eq!(viewer.selected_variant(), "midnight");
        assert_eq!(viewer.overlay_state(0.0).selected, "midnight");
        assert_eq!(sole_material(&viewer), MaterialId(2));
        assert_eq!(window.redraws.get(), 3);
    }

    #[test]
    fn test_resize_redraws_once_and_updates_aspect() {
        let (mut viewer, window) = installed_viewer(ViewerConfig::default());
        let before = window.redraws.get();

        assert!(viewer.on_resize(1024, 768, &window));
        assert_eq!(viewer.context.camera.aspect, 1024.0 / 768.0);
        assert_eq!(viewer.layout().viewport_height(), 768.0);
        assert_eq!(window.redraws.get(), before + 1);

        assert!(!viewer.on_resize(0, 0, &window));
        assert_eq!(window.redraws.get(), before + 1);
    }

    #[test]
    fn test_scroll_moves_model() {
        let (mut viewer, window) = installed_viewer(ViewerConfig::default());
        let start = viewer.context.scene.model().unwrap().transform;
        let before = window.redraws.get();

        assert!(viewer.on_scroll(200.0, &window));
        assert_eq!(viewer.layout().scroll(), 200.0);
        assert_ne!(viewer.context.scene.model().unwrap().transform, start);
        assert_eq!(window.redraws.get(), before + 1);

        // already at the top
        assert!(viewer.on_scroll(-200.0, &window));
        assert!(!viewer.on_scroll(-200.0, &window));
    }

    #[test]
    fn test_scroll_keys() {
        let (mut viewer, window) = installed_viewer(ViewerConfig::default());

        assert!(viewer.on_scroll_key(ScrollKey::End, &window));
        assert_eq!(viewer.layout().scroll(), viewer.layout().max_scroll());
        assert_eq!(viewer.overlay_state(0.0).section, Some(5));

        assert!(viewer.on_scroll_key(ScrollKey::PageUp, &window));
        assert_eq!(viewer.layout().scroll(), viewer.layout().max_scroll() - 800.0 * 0.9);

        assert!(viewer.on_scroll_key(ScrollKey::Home, &window));
        assert_eq!(viewer.layout().scroll(), 0.0);
        assert!(!viewer.on_scroll_key(ScrollKey::LineUp, &window));
        assert!(viewer.on_scroll_key(ScrollKey::LineDown, &window));
        assert_eq!(viewer.layout().scroll(), 40.0);
    }

    #[test]
    fn test_home_after_end_restores_the_opening_pose() {
        let (mut viewer, window) = installed_viewer(ViewerConfig::default());
        let opening = viewer.context.scene.model().unwrap().transform;

        assert!(viewer.on_scroll_key(ScrollKey::End, &window));
        assert_ne!(viewer.context.scene.model().unwrap().transform, opening);

        assert!(viewer.on_scroll_key(ScrollKey::Home, &window));
        let transform = viewer.context.scene.model().unwrap().transform;
        assert!((transform.scale - opening.scale).length() < 1e-4);
        assert!((transform.position - opening.position).length() < 1e-4);
        assert!((transform.rotation - opening.rotation).length() < 1e-4);
    }

    #[test]
    fn test_scroll_before_model_only_moves_page() {
        let mut viewer = Viewer::new(ViewerConfig::default(), 1280, 800, 1.0);
        let window = CountingWindow::new();

        assert!(viewer.on_scroll(100.0, &window));
        assert_eq!(window.redraws.get(), 0);
    }

    #[test]
    fn test_orbit_and_zoom_request_redraws() {
        let (mut viewer, window) = installed_viewer(ViewerConfig::default());
        let before = window.redraws.get();

        assert!(viewer.on_orbit(30.0, 0.0, &window));
        assert!(viewer.on_zoom(-40.0, &window));
        assert_eq!(window.redraws.get(), before + 2);
    }
}
