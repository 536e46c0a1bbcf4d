use egui_winit::winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated panel output for one frame.
pub struct UiFrame {
    pub clipped_primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// egui context bound to the editor window. Window events go here first so
/// the panel can claim clicks and keys before they reach the viewport.
pub struct EguiHost {
    context: egui::Context,
    winit_state: egui_winit::State,
    wants_pointer_input: bool,
    wants_keyboard_input: bool,
}

impl EguiHost {
    pub fn new(window: &Window) -> Self {
        let context = egui::Context::default();
        let winit_state = egui_winit::State::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self {
            context,
            winit_state,
            wants_pointer_input: false,
            wants_keyboard_input: false,
        }
    }

    /// True when the panel consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// Pointer is over or dragging a panel widget.
    pub fn wants_pointer_input(&self) -> bool {
        self.wants_pointer_input
    }

    /// A text field or other widget has keyboard focus.
    pub fn wants_keyboard_input(&self) -> bool {
        self.wants_keyboard_input
    }

    pub fn run_ui<F>(&mut self, window: &Window, build: F) -> UiFrame
    where
        F: FnMut(&egui::Context),
    {
        let raw_input = self.winit_state.take_egui_input(window);
        let full_output = self.context.run(raw_input, build);
        self.winit_state
            .handle_platform_output(window, full_output.platform_output.clone());
        let pixels_per_point = self.context.pixels_per_point();
        let clipped_primitives = self
            .context
            .tessellate(full_output.shapes, pixels_per_point);

        self.wants_pointer_input = self.context.wants_pointer_input();
        self.wants_keyboard_input = self.context.wants_keyboard_input();
        UiFrame {
            clipped_primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point,
        }
    }
}
