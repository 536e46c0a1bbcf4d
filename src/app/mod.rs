mod egui_host;
mod input;
mod timing;

use crate::config::EditorConfig;
use crate::editor::{
    CommandOutcome, EditorCommand, EditorKey, InputEvent, InteractionContext, PointerButton,
};
use crate::render::{LogRenderer, Renderer, Viewport};
use crate::ui::{UiAction, UiState};
use egui_host::EguiHost;
use input::{map_button, map_key, wheel_notches, DoubleClickDetector, ShiftKeys};
use timing::FrameTiming;

use glam::Vec2;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

const WINDOW_TITLE: &str = "Blockout";
const INITIAL_SIZE: PhysicalSize<u32> = PhysicalSize::new(1280, 720);

pub struct App {
    window: Option<Arc<Window>>,
    egui: Option<EguiHost>,
    editor: InteractionContext,
    ui: UiState,
    renderer: Box<dyn Renderer>,
    clicks: DoubleClickDetector,
    shift: ShiftKeys,
    pointer: Option<Vec2>,
    timing: FrameTiming,
    target_frame_duration: Duration,
    next_frame_time: Instant,
}

impl App {
    fn new(config: EditorConfig, renderer: Box<dyn Renderer>) -> Self {
        let clicks = DoubleClickDetector::new(
            Duration::from_millis(config.double_click_ms),
            config.double_click_slop_px,
        );
        let viewport = Viewport::new(INITIAL_SIZE.width as f32, INITIAL_SIZE.height as f32);
        Self {
            window: None,
            egui: None,
            editor: InteractionContext::new(config, viewport),
            ui: UiState::new(),
            renderer,
            clicks,
            shift: ShiftKeys::default(),
            pointer: None,
            timing: FrameTiming::new(WINDOW_TITLE),
            target_frame_duration: Duration::from_millis(16),
            next_frame_time: Instant::now(),
        }
    }

    fn update_target_frame_duration(&mut self, window: &Window) {
        let mut target = Duration::from_millis(16);
        if let Some(monitor) = window.current_monitor() {
            if let Some(millihz) = monitor.refresh_rate_millihertz() {
                let hz = millihz as f32 / 1000.0;
                if hz > 1.0 {
                    target = Duration::from_secs_f32(1.0 / hz);
                }
            }
        }
        self.target_frame_duration = target;
        self.next_frame_time = Instant::now() + self.target_frame_duration;
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        self.editor.handle(InputEvent::Resize {
            width: size.width as f32,
            height: size.height as f32,
        });
    }

    fn ui_wants_pointer(&self) -> bool {
        self.egui
            .as_ref()
            .map_or(false, |host| host.wants_pointer_input())
    }

    fn ui_wants_keyboard(&self) -> bool {
        self.egui
            .as_ref()
            .map_or(false, |host| host.wants_keyboard_input())
    }

    fn frame(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let frame_start = Instant::now();
        self.timing
            .update(Some(&window), frame_start, self.editor.mode().label());
        self.editor.handle(InputEvent::Tick { now: frame_start });

        let ui_frame = self.egui.as_mut().map(|host| {
            host.run_ui(&window, |ctx| self.ui.show(ctx, &self.editor))
        });
        for action in self.ui.take_actions() {
            self.dispatch(action);
        }

        let frame = self.editor.render_frame();
        self.renderer.render(&frame);
        if let Some(ui_frame) = ui_frame {
            self.renderer.paint_overlay(
                &ui_frame.clipped_primitives,
                &ui_frame.textures_delta,
                ui_frame.pixels_per_point,
            );
        }
        self.timing
            .set_render_ms(frame_start.elapsed().as_secs_f32() * 1000.0);
    }

    fn dispatch(&mut self, action: UiAction) {
        match action {
            UiAction::Command(command) => self.run_command(command),
            UiAction::ChooseTextureFile => self.handle_texture_action(),
        }
    }

    fn run_command(&mut self, command: EditorCommand) {
        match self.editor.apply_command(command) {
            Ok(CommandOutcome::Added(id)) => {
                log::debug!("Spawned {}", id);
                self.ui.set_status("");
            }
            Ok(CommandOutcome::Deleted(id)) => {
                log::info!("Deleted {}", id);
                self.ui.set_status("");
            }
            Ok(CommandOutcome::None) => {}
            Err(err) => {
                log::warn!("Command failed: {}", err);
                self.ui.set_status(err.to_string());
            }
        }
    }

    fn handle_texture_action(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp", "gif", "webp"])
            .pick_file()
        else {
            return;
        };
        log::info!("Loading texture: {}", path.display());
        match std::fs::read(&path) {
            Ok(bytes) => self.run_command(EditorCommand::ApplyTexture(bytes)),
            Err(err) => {
                log::warn!("Failed to read {}: {}", path.display(), err);
                self.ui
                    .set_status(format!("Failed to read texture:\n{}", err));
            }
        }
    }

    fn handle_key(&mut self, key: PhysicalKey, state: ElementState, repeat: bool) {
        let pressed = state == ElementState::Pressed;
        if pressed && key == PhysicalKey::Code(KeyCode::F1) {
            self.ui.toggle_panel();
            return;
        }
        let Some(editor_key) = map_key(key) else {
            return;
        };
        if editor_key == EditorKey::Modifier {
            match self.shift.set(key, pressed) {
                Some(true) => self.editor.handle(InputEvent::KeyDown(editor_key)),
                Some(false) => self.editor.handle(InputEvent::KeyUp(editor_key)),
                None => {}
            }
            return;
        }
        if pressed {
            if !repeat {
                self.editor.handle(InputEvent::KeyDown(editor_key));
            }
        } else {
            self.editor.handle(InputEvent::KeyUp(editor_key));
        }
    }

    fn handle_mouse_button(&mut self, button: PointerButton, state: ElementState) {
        let Some(position) = self.pointer else {
            return;
        };
        match state {
            ElementState::Pressed => {
                // The second press of a pair is delivered only as the double-click.
                if button == PointerButton::Primary
                    && self.clicks.press(Instant::now(), position)
                {
                    self.editor.handle(InputEvent::DoubleClick { position });
                } else {
                    self.editor.handle(InputEvent::PointerDown { position, button });
                }
            }
            ElementState::Released => {
                self.editor.handle(InputEvent::PointerUp { position, button });
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(INITIAL_SIZE)
            .with_resizable(true);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        self.egui = Some(EguiHost::new(&window));
        self.handle_resize(window.inner_size());
        self.update_target_frame_duration(&window);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (self.egui.as_mut(), self.window.as_ref()) {
            (Some(host), Some(window)) => host.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }
            WindowEvent::Focused(focused) => {
                if !focused {
                    self.pointer = None;
                    self.clicks.reset();
                    self.shift.reset();
                    self.editor.handle(InputEvent::FocusLost);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                // Releases always pass so held keys cannot stick.
                let released = event.state == ElementState::Released;
                if released || !(consumed || self.ui_wants_keyboard()) {
                    self.handle_key(event.physical_key, event.state, event.repeat);
                }
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size);
                if let Some(window) = self.window.clone() {
                    self.update_target_frame_duration(&window);
                }
            }
            WindowEvent::Moved(_) => {
                if let Some(window) = self.window.clone() {
                    self.update_target_frame_duration(&window);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                self.pointer = Some(position);
                self.editor.handle(InputEvent::PointerMove { position });
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = map_button(button) else {
                    return;
                };
                let blocked = consumed || self.ui_wants_pointer();
                if state == ElementState::Released || !blocked {
                    self.handle_mouse_button(button, state);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !(consumed || self.ui_wants_pointer()) {
                    self.editor.handle(InputEvent::Wheel {
                        notches: wheel_notches(delta),
                    });
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame_time {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
            self.next_frame_time = now + self.target_frame_duration;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame_time));
    }
}

pub fn run(config: EditorConfig) {
    log::info!("Blockout editor");
    log::info!("   WASD/QE fly, hold Shift and drag a face to mold, double-click to fly to a surface");
    log::info!("   Press ESC or close window to exit");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, Box::new(LogRenderer::new()));
    event_loop.run_app(&mut app).expect("Event loop error");

    log::info!("Goodbye!");
}
