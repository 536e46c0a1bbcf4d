use crate::editor::{EditorCommand, InteractionContext, Measurement};
use crate::scene::{Axis, PrimitiveKind, MIN_SCALE};

const MAX_SCALE: f32 = 20.0;
const MAX_LIGHT_INTENSITY: f32 = 5.0;

/// What the panel asked for this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Command(EditorCommand),
    /// Open a file dialog and texture the selection with the chosen image.
    ChooseTextureFile,
}

pub struct UiState {
    show_panel: bool,
    status: String,
    actions: Vec<UiAction>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            show_panel: true,
            status: String::new(),
            actions: Vec::new(),
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    #[cfg(test)]
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn toggle_panel(&mut self) {
        self.show_panel = !self.show_panel;
    }

    pub fn take_actions(&mut self) -> Vec<UiAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn show(&mut self, ctx: &egui::Context, editor: &InteractionContext) {
        if self.show_panel {
            egui::SidePanel::right("blockout_panel")
                .default_width(260.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.primitives_section(ui);
                        ui.separator();
                        self.selection_section(ui, editor);
                        ui.separator();
                        self.light_section(ui, editor);
                        ui.separator();
                        ui.label(molding_status(editor.molding_armed()));
                        if !self.status.is_empty() {
                            ui.colored_label(egui::Color32::LIGHT_RED, &self.status);
                        }
                    });
                });
        }
        if let Some(measurement) = editor.measurement() {
            measurement_label(ctx, &measurement);
        }
    }

    fn primitives_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add");
        ui.horizontal(|ui| {
            for kind in PrimitiveKind::ALL {
                if ui.button(kind.label()).clicked() {
                    self.actions
                        .push(UiAction::Command(EditorCommand::AddPrimitive(kind)));
                }
            }
        });
    }

    fn selection_section(&mut self, ui: &mut egui::Ui, editor: &InteractionContext) {
        ui.heading("Selection");
        let Some(entity) = editor.selected_entity() else {
            ui.weak("Nothing selected");
            return;
        };
        ui.label(format!("{} ({})", entity.name, entity.id));

        let mut color = entity.appearance.color;
        ui.horizontal(|ui| {
            ui.label("Color");
            if ui.color_edit_button_rgb(&mut color).changed() {
                self.actions
                    .push(UiAction::Command(EditorCommand::SetColor(color)));
            }
        });

        ui.label("Rotation (deg)");
        for axis in Axis::ALL {
            let mut degrees = entity.transform.rotation[axis.index()].to_degrees();
            let slider = egui::Slider::new(&mut degrees, -180.0..=180.0).text(axis.label());
            if ui.add(slider).changed() {
                self.actions
                    .push(UiAction::Command(EditorCommand::SetAxisRotation { axis, degrees }));
            }
        }

        ui.label("Scale");
        for axis in Axis::ALL {
            let mut value = entity.transform.scale[axis.index()];
            let slider = egui::Slider::new(&mut value, MIN_SCALE..=MAX_SCALE)
                .logarithmic(true)
                .text(axis.label());
            if ui.add(slider).changed() {
                self.actions
                    .push(UiAction::Command(EditorCommand::SetAxisScale { axis, value }));
            }
        }

        ui.horizontal(|ui| {
            if ui.button("Apply Texture...").clicked() {
                self.actions.push(UiAction::ChooseTextureFile);
            }
            if ui.button("Delete").clicked() {
                self.actions
                    .push(UiAction::Command(EditorCommand::DeleteSelected));
            }
        });
    }

    fn light_section(&mut self, ui: &mut egui::Ui, editor: &InteractionContext) {
        ui.heading("Light");
        let Some(light) = editor.light() else {
            ui.weak("No light");
            return;
        };

        ui.horizontal(|ui| {
            for axis in Axis::ALL {
                let mut value = light.position[axis.index()];
                let drag = egui::DragValue::new(&mut value)
                    .speed(0.1)
                    .prefix(format!("{} ", axis.label()));
                if ui.add(drag).changed() {
                    self.actions.push(UiAction::Command(
                        EditorCommand::SetLightPosition { axis, value },
                    ));
                }
            }
        });

        let mut intensity = light.intensity;
        let slider =
            egui::Slider::new(&mut intensity, 0.0..=MAX_LIGHT_INTENSITY).text("Intensity");
        if ui.add(slider).changed() {
            self.actions
                .push(UiAction::Command(EditorCommand::SetLightIntensity(intensity)));
        }

        let mut color = light.color;
        ui.horizontal(|ui| {
            ui.label("Color");
            if ui.color_edit_button_rgb(&mut color).changed() {
                self.actions
                    .push(UiAction::Command(EditorCommand::SetLightColor(color)));
            }
        });
    }
}

pub fn molding_status(armed: bool) -> &'static str {
    if armed {
        "Molding mode: ON"
    } else {
        "Molding mode: OFF"
    }
}

/// Floating dimensions label anchored at the selection's projected center.
fn measurement_label(ctx: &egui::Context, measurement: &Measurement) {
    let Some(screen) = measurement.screen_position else {
        return;
    };
    let pixels_per_point = ctx.pixels_per_point();
    let anchor = egui::pos2(screen.x / pixels_per_point, screen.y / pixels_per_point);
    egui::Area::new(egui::Id::new("measurement_label"))
        .order(egui::Order::Foreground)
        .fixed_pos(anchor + egui::vec2(12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(measurement.text());
                ui.weak(format!(
                    "Center: {:.2}, {:.2}, {:.2}",
                    measurement.center.x, measurement.center.y, measurement.center.z
                ));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::render::Viewport;

    fn run_frame(ui: &mut UiState, editor: &InteractionContext) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| ui.show(ctx, editor));
    }

    #[test]
    fn idle_frame_emits_no_actions() {
        let mut editor =
            InteractionContext::new(EditorConfig::default(), Viewport::new(800.0, 600.0));
        let mut ui = UiState::new();
        run_frame(&mut ui, &editor);
        assert!(ui.take_actions().is_empty());

        let cube = editor.add(PrimitiveKind::Cube);
        editor.select(Some(cube));
        run_frame(&mut ui, &editor);
        assert!(ui.take_actions().is_empty());
    }

    #[test]
    fn molding_status_text() {
        assert_eq!(molding_status(true), "Molding mode: ON");
        assert_eq!(molding_status(false), "Molding mode: OFF");
    }

    #[test]
    fn status_persists_until_replaced() {
        let mut ui = UiState::new();
        ui.set_status("No entity selected");
        assert_eq!(ui.status(), "No entity selected");
        ui.set_status("");
        assert!(ui.status().is_empty());
    }
}
