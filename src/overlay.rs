// overlay.rs - egui loading indicator, variant buttons and status line

use egui::{Align2, Color32, RichText};

use crate::device::DeviceClass;

/// Progress of the one model load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}

/// What the overlay shows this frame
#[derive(Debug, Clone, Copy)]
pub struct OverlayState<'a> {
    pub load_state: &'a LoadState,
    pub buttons: &'a [String],
    pub selected: &'a str,
    pub device: DeviceClass,
    pub section: Option<usize>,
    /// Frame rate from the render loop, 0 until measured
    pub fps: f32,
    pub show_ui: bool,
}

/// User requests raised by overlay widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayAction {
    SelectVariant(String),
}

const ACCENT: Color32 = Color32::from_rgb(74, 158, 255);

fn panel() -> egui::Frame {
    egui::Frame::NONE
        .fill(Color32::from_black_alpha(160))
        .inner_margin(egui::Margin::same(10))
        .corner_radius(6.0)
}

pub fn draw(ctx: &egui::Context, state: &OverlayState<'_>) -> Vec<OverlayAction> {
    let mut actions = Vec::new();

    match state.load_state {
        LoadState::Loading => {
            egui::Area::new(egui::Id::new("loading"))
                .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    panel().show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("Loading model...").color(Color32::WHITE));
                        });
                    });
                });
        }
        LoadState::Failed(message) => {
            egui::Area::new(egui::Id::new("load-failed"))
                .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    panel().show(ui, |ui| {
                        ui.label(RichText::new("Failed to load model").size(18.0).color(Color32::LIGHT_RED));
                        ui.label(RichText::new(message).color(Color32::GRAY));
                    });
                });
        }
        LoadState::Ready if state.show_ui => {
            egui::Area::new(egui::Id::new("variants"))
                .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
                .show(ctx, |ui| {
                    panel().show(ui, |ui| {
                        ui.horizontal(|ui| {
                            for name in state.buttons {
                                let selected = name == state.selected;
                                if ui.add(egui::Button::new(name.as_str()).selected(selected)).clicked() && !selected {
                                    actions.push(OverlayAction::SelectVariant(name.clone()));
                                }
                            }
                        });
                    });
                });

            egui::Area::new(egui::Id::new("status"))
                .anchor(Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
                .show(ctx, |ui| {
                    ui.label(
                        RichText::new(status_line(state))
                            .size(12.0)
                            .color(ACCENT),
                    );
                });
        }
        LoadState::Ready => {}
    }

    actions
}

fn status_line(state: &OverlayState<'_>) -> String {
    let section = state.section.map_or_else(|| "-".to_string(), |s| (s + 1).to_string());
    format!("{} | section {} | {:.0} FPS", state.device.name(), section, state.fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &OverlayState<'_>) -> Vec<OverlayAction> {
        let ctx = egui::Context::default();
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = draw(ctx, state);
        });
        actions
    }

    #[test]
    fn test_load_state_default_is_loading() {
        assert_eq!(LoadState::default(), LoadState::Loading);
        assert!(!LoadState::Failed("x".into()).is_ready());
        assert!(LoadState::Ready.is_ready());
    }

    #[test]
    fn test_draw_without_input_raises_nothing() {
        let buttons = vec!["street".to_string(), "beach".to_string()];
        for load_state in [LoadState::Loading, LoadState::Ready, LoadState::Failed("missing file".into())] {
            let state = OverlayState {
                load_state: &load_state,
                buttons: &buttons,
                selected: "street",
                device: DeviceClass::Desktop,
                section: Some(0),
                fps: 60.0,
                show_ui: true,
            };
            assert!(run(&state).is_empty());
        }
    }

    #[test]
    fn test_status_line_shows_fps() {
        let load_state = LoadState::Ready;
        let state = OverlayState {
            load_state: &load_state,
            buttons: &[],
            selected: "street",
            device: DeviceClass::Tablet,
            section: Some(2),
            fps: 59.6,
            show_ui: true,
        };
        assert_eq!(status_line(&state), "tablet | section 3 | 60 FPS");

        let state = OverlayState { section: None, fps: 0.0, ..state };
        assert_eq!(status_line(&state), "tablet | section - | 0 FPS");
    }
}
