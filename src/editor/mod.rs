//! Interaction engine: one explicit context value fed serialized input
//! events and UI commands.
//!
//! Modes:
//! - `Idle`: clicks select, empty-space drags orbit/pan, wheel zooms.
//! - `Translating`: primary drag on an entity moves it on a camera-facing plane.
//! - `Molding`: modifier + click captures a face; vertical pointer motion
//!   grows or shrinks the entity along that face until the modifier is released.
//! - `CameraTransition`: timed fly-to after a double-click on a surface.

mod gesture;
mod measure;
mod navigator;
mod selection;
mod transition;

pub use gesture::{DragGesture, MoldGesture};
pub use measure::Measurement;
pub use navigator::CameraNavigator;
pub use selection::Selection;
pub use transition::{fly_to_destination, CameraTransition};

use glam::{Vec2, Vec3};
use std::time::{Duration, Instant};

use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::render::pick::{pick, FaceHit, Ray};
use crate::render::{CameraController, LightItem, RenderFrame, RenderItem, Viewport};
use crate::scene::{
    Axis, Color, DirectionalLight, Entity, EntityId, LightId, PrimitiveKind, SceneRegistry,
    TextureRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    /// Arms molding while held.
    Modifier,
}

/// Pointer positions are window pixels with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Vec2, button: PointerButton },
    PointerMove { position: Vec2 },
    PointerUp { position: Vec2, button: PointerButton },
    DoubleClick { position: Vec2 },
    /// Positive values zoom in.
    Wheel { notches: f32 },
    KeyDown(EditorKey),
    KeyUp(EditorKey),
    FocusLost,
    Resize { width: f32, height: f32 },
    Tick { now: Instant },
}

/// Operations invoked by UI widgets. Entity-targeted commands act on the
/// current selection; light commands act on the scene light.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    AddPrimitive(PrimitiveKind),
    DeleteSelected,
    SetColor(Color),
    SetAxisRotation { axis: Axis, degrees: f32 },
    SetAxisScale { axis: Axis, value: f32 },
    ApplyTexture(Vec<u8>),
    SetLightPosition { axis: Axis, value: f32 },
    SetLightIntensity(f32),
    SetLightColor(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    None,
    Added(EntityId),
    Deleted(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionMode {
    Idle,
    Translating(DragGesture),
    Molding(MoldGesture),
    CameraTransition(CameraTransition),
}

impl InteractionMode {
    pub fn label(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "Idle",
            InteractionMode::Translating(_) => "Translating",
            InteractionMode::Molding(_) => "Molding",
            InteractionMode::CameraTransition(_) => "CameraTransition",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// Entity under an active drag or mold gesture.
    pub fn gesture_entity(&self) -> Option<EntityId> {
        match self {
            InteractionMode::Translating(gesture) => Some(gesture.entity),
            InteractionMode::Molding(gesture) => Some(gesture.entity),
            _ => None,
        }
    }
}

pub struct InteractionContext {
    scene: SceneRegistry,
    selection: Selection,
    mode: InteractionMode,
    navigator: CameraNavigator,
    viewport: Viewport,
    modifier_held: bool,
    light: LightId,
    config: EditorConfig,
}

impl InteractionContext {
    /// Empty scene with the light and its marker.
    pub fn new(config: EditorConfig, viewport: Viewport) -> Self {
        let mut scene = SceneRegistry::new();
        let (_, light) = scene.add_light_marker(DirectionalLight::default());
        let mut camera = CameraController::default();
        camera.aspect = viewport.aspect();
        Self {
            scene,
            selection: Selection::new(),
            mode: InteractionMode::Idle,
            navigator: CameraNavigator::new(camera),
            viewport,
            modifier_held: false,
            light,
            config,
        }
    }

    pub fn scene(&self) -> &SceneRegistry {
        &self.scene
    }

    #[cfg(test)]
    pub(crate) fn scene_mut(&mut self) -> &mut SceneRegistry {
        &mut self.scene
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selection.selected()
    }

    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selection.selected().and_then(|id| self.scene.get(id))
    }

    #[cfg(test)]
    pub fn is_highlighted(&self, id: EntityId) -> bool {
        self.selection.is_highlighted(id)
    }

    pub fn camera(&self) -> &CameraController {
        &self.navigator.camera
    }

    #[cfg(test)]
    pub fn set_camera_pose(&mut self, position: Vec3, target: Vec3) {
        self.navigator.camera.set_pose(position, target);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn light(&self) -> Option<&DirectionalLight> {
        self.scene.lights().get(self.light)
    }

    /// True while the molding modifier is held.
    pub fn molding_armed(&self) -> bool {
        self.modifier_held
    }

    pub fn add(&mut self, kind: PrimitiveKind) -> EntityId {
        let id = self.scene.add(kind);
        log::info!("Added {} {}", kind.label(), id);
        id
    }

    pub fn select(&mut self, id: Option<EntityId>) {
        let id = id.filter(|id| self.scene.contains(*id));
        self.selection.select(id);
    }

    pub fn delete_selected(&mut self) -> Result<EntityId> {
        let id = self.selection.delete_selected(&mut self.scene)?;
        if self.mode.gesture_entity() == Some(id) {
            log::debug!("Gesture target {} deleted; aborting", id);
            self.set_mode(InteractionMode::Idle);
        }
        Ok(id)
    }

    pub fn apply_command(&mut self, command: EditorCommand) -> Result<CommandOutcome> {
        match command {
            EditorCommand::AddPrimitive(kind) => return Ok(CommandOutcome::Added(self.add(kind))),
            EditorCommand::DeleteSelected => {
                return self.delete_selected().map(CommandOutcome::Deleted)
            }
            EditorCommand::SetColor(color) => {
                let id = self.target()?;
                self.scene.set_color(id, color)?;
            }
            EditorCommand::SetAxisRotation { axis, degrees } => {
                let id = self.target()?;
                self.scene.set_axis_rotation(id, axis, degrees)?;
            }
            EditorCommand::SetAxisScale { axis, value } => {
                let id = self.target()?;
                self.scene.set_axis_scale(id, axis, value)?;
            }
            EditorCommand::ApplyTexture(bytes) => {
                let id = self.target()?;
                let texture = TextureRef::decode(&bytes)?;
                log::info!(
                    "Applied {}x{} texture to {}",
                    texture.width,
                    texture.height,
                    id
                );
                self.scene.apply_texture(id, texture)?;
            }
            EditorCommand::SetLightPosition { axis, value } => {
                self.scene
                    .lights_mut()
                    .set_axis_position(self.light, axis, value)?;
            }
            EditorCommand::SetLightIntensity(intensity) => {
                self.scene.lights_mut().set_intensity(self.light, intensity)?;
            }
            EditorCommand::SetLightColor(color) => {
                self.scene.lights_mut().set_color(self.light, color)?;
            }
        }
        Ok(CommandOutcome::None)
    }

    fn target(&self) -> Result<EntityId> {
        self.selection.selected().ok_or(EditorError::NoTarget)
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { position, button } => self.on_pointer_down(position, button),
            InputEvent::PointerMove { position } => self.on_pointer_move(position),
            InputEvent::PointerUp { button, .. } => self.on_pointer_up(button),
            InputEvent::DoubleClick { position } => self.on_double_click(position),
            InputEvent::Wheel { notches } => {
                if self.mode.is_idle() {
                    self.navigator.zoom(notches, &self.config);
                }
            }
            InputEvent::KeyDown(EditorKey::Modifier) => {
                if !self.modifier_held {
                    log::debug!("Molding mode: ON");
                }
                self.modifier_held = true;
            }
            InputEvent::KeyUp(EditorKey::Modifier) => self.release_modifier(),
            InputEvent::KeyDown(key) => {
                self.navigator.set_key(key, true);
            }
            InputEvent::KeyUp(key) => {
                self.navigator.set_key(key, false);
            }
            InputEvent::FocusLost => {
                self.navigator.release_keys();
                self.navigator.cancel_drag();
                self.release_modifier();
                if matches!(self.mode, InteractionMode::Translating(_)) {
                    self.set_mode(InteractionMode::Idle);
                }
            }
            InputEvent::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                self.navigator.camera.aspect = self.viewport.aspect();
            }
            InputEvent::Tick { now } => self.on_tick(now),
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode.label() != mode.label() {
            log::debug!("Mode {} -> {}", self.mode.label(), mode.label());
        }
        self.mode = mode;
    }

    fn release_modifier(&mut self) {
        if self.modifier_held {
            log::debug!("Molding mode: OFF");
        }
        self.modifier_held = false;
        if matches!(self.mode, InteractionMode::Molding(_)) {
            self.set_mode(InteractionMode::Idle);
        }
    }

    pub fn ray_at(&self, position: Vec2) -> Ray {
        self.navigator.camera.ray(self.viewport.to_ndc(position))
    }

    pub fn pick_at(&self, position: Vec2, recursive: bool) -> Option<FaceHit> {
        pick(
            self.viewport.to_ndc(position),
            &self.navigator.camera,
            self.scene.iter(),
            recursive,
        )
    }

    fn on_pointer_down(&mut self, position: Vec2, button: PointerButton) {
        if matches!(self.mode, InteractionMode::CameraTransition(_)) {
            log::trace!("Pointer input suppressed during camera transition");
            return;
        }
        if button != PointerButton::Primary {
            if self.mode.is_idle() {
                self.navigator.begin_drag(button, position);
            }
            return;
        }

        let Some(hit) = self.pick_at(position, false) else {
            self.selection.clear();
            self.set_mode(InteractionMode::Idle);
            self.navigator.begin_drag(button, position);
            return;
        };
        self.selection.select(Some(hit.entity));
        let Some(transform) = self.scene.get(hit.entity).map(|entity| entity.transform) else {
            return;
        };

        if self.modifier_held {
            match MoldGesture::begin(hit.entity, &transform, hit.normal, position.y) {
                Some(gesture) => {
                    log::debug!("Molding {} along {:?}", hit.entity, gesture.axis);
                    self.set_mode(InteractionMode::Molding(gesture));
                }
                None => {
                    log::debug!("No face axis for normal {:?}; molding ignored", hit.normal);
                    self.set_mode(InteractionMode::Idle);
                }
            }
        } else {
            let gesture =
                DragGesture::begin(&hit, transform.position, self.navigator.camera.forward());
            self.set_mode(InteractionMode::Translating(gesture));
        }
    }

    fn on_pointer_move(&mut self, position: Vec2) {
        match self.mode {
            InteractionMode::Translating(gesture) => {
                let Some(target) = gesture.target(&self.ray_at(position)) else {
                    return;
                };
                if let Err(err) = self.scene.move_entity(gesture.entity, target) {
                    log::debug!("Drag aborted: {}", err);
                    self.set_mode(InteractionMode::Idle);
                }
            }
            InteractionMode::Molding(mut gesture) => {
                if !self.modifier_held {
                    self.set_mode(InteractionMode::Idle);
                    return;
                }
                let Some(entity) = self.scene.get_mut(gesture.entity) else {
                    log::debug!("Molding aborted: {} is gone", gesture.entity);
                    self.set_mode(InteractionMode::Idle);
                    return;
                };
                gesture.update(
                    &mut entity.transform,
                    position.y,
                    self.config.mold_sensitivity,
                );
                self.mode = InteractionMode::Molding(gesture);
            }
            InteractionMode::Idle => {
                self.navigator.drag_to(position, &self.config);
            }
            InteractionMode::CameraTransition(_) => {}
        }
    }

    fn on_pointer_up(&mut self, button: PointerButton) {
        self.navigator.end_drag(button);
        if button == PointerButton::Primary
            && matches!(self.mode, InteractionMode::Translating(_))
        {
            self.set_mode(InteractionMode::Idle);
        }
    }

    fn on_double_click(&mut self, position: Vec2) {
        if !matches!(
            self.mode,
            InteractionMode::Idle | InteractionMode::CameraTransition(_)
        ) {
            return;
        }
        let Some(hit) = self.pick_at(position, true) else {
            log::debug!("Double-click hit nothing");
            return;
        };
        let Some(look_at) = self
            .scene
            .get(hit.entity)
            .map(|entity| entity.transform.position)
        else {
            return;
        };
        let camera = &self.navigator.camera;
        let destination =
            fly_to_destination(camera.position, hit.point, self.config.fly_to_standoff);
        let transition = CameraTransition::new(
            camera.position,
            camera.target,
            destination,
            look_at,
            Duration::from_millis(self.config.fly_to_duration_ms),
        );
        log::debug!("Flying to {:?} looking at {}", destination, hit.entity);
        self.navigator.cancel_drag();
        self.set_mode(InteractionMode::CameraTransition(transition));
    }

    fn on_tick(&mut self, now: Instant) {
        if let InteractionMode::CameraTransition(mut transition) = self.mode {
            let sample = transition.sample(now);
            self.navigator.camera.set_pose(sample.position, sample.target);
            if sample.finished() {
                self.set_mode(InteractionMode::Idle);
            } else {
                self.mode = InteractionMode::CameraTransition(transition);
            }
            return;
        }
        self.navigator.fly(&self.config);
    }

    pub fn measurement(&self) -> Option<Measurement> {
        let entity = self.selected_entity()?;
        Some(Measurement::of(entity, &self.navigator.camera, self.viewport))
    }

    pub fn render_frame(&self) -> RenderFrame {
        let camera = &self.navigator.camera;
        RenderFrame {
            view: camera.view(),
            projection: camera.projection(),
            camera_position: camera.position,
            items: self
                .scene
                .iter()
                .map(|entity| RenderItem {
                    entity: entity.id,
                    geometry: entity.geometry,
                    model: entity.transform.matrix(),
                    color: entity.appearance.color,
                    emissive: self.selection.emissive_for(entity.id),
                    texture: entity.appearance.texture.clone(),
                })
                .collect(),
            lights: self
                .scene
                .lights()
                .iter()
                .map(|(_, light)| LightItem {
                    position: light.position,
                    color: light.color,
                    intensity: light.intensity,
                })
                .collect(),
            measurement: self.measurement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::measure::world_bounds;
    use super::selection::NEUTRAL_EMISSIVE;
    use super::*;
    use crate::scene::MIN_SCALE;

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn context() -> InteractionContext {
        InteractionContext::new(EditorConfig::default(), VIEWPORT)
    }

    fn screen_of(ctx: &InteractionContext, point: Vec3) -> Vec2 {
        ctx.camera().project_to_screen(point, ctx.viewport()).unwrap()
    }

    fn press(ctx: &mut InteractionContext, position: Vec2) {
        ctx.handle(InputEvent::PointerDown {
            position,
            button: PointerButton::Primary,
        });
    }

    fn release(ctx: &mut InteractionContext, position: Vec2) {
        ctx.handle(InputEvent::PointerUp {
            position,
            button: PointerButton::Primary,
        });
    }

    fn move_to(ctx: &mut InteractionContext, position: Vec2) {
        ctx.handle(InputEvent::PointerMove { position });
    }

    fn highlighted_count(ctx: &InteractionContext) -> usize {
        ctx.render_frame()
            .items
            .iter()
            .filter(|item| item.emissive != NEUTRAL_EMISSIVE)
            .count()
    }

    fn transform(ctx: &InteractionContext, id: EntityId) -> crate::scene::Transform {
        ctx.scene().get(id).unwrap().transform
    }

    #[test]
    fn click_selects_and_highlights() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        assert_eq!(transform(&ctx, cube).position, Vec3::new(0.0, 0.5, 0.0));

        let at = screen_of(&ctx, Vec3::new(0.0, 0.5, 0.0));
        press(&mut ctx, at);
        assert_eq!(ctx.selected(), Some(cube));
        assert!(ctx.is_highlighted(cube));
        assert_eq!(highlighted_count(&ctx), 1);
        assert!(matches!(ctx.mode(), InteractionMode::Translating(_)));
        release(&mut ctx, at);
        assert!(ctx.mode().is_idle());
        assert_eq!(ctx.selected(), Some(cube));
    }

    #[test]
    fn click_on_empty_space_deselects() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        ctx.select(Some(cube));
        press(&mut ctx, Vec2::new(5.0, 5.0));
        assert_eq!(ctx.selected(), None);
        assert_eq!(highlighted_count(&ctx), 0);
        assert!(ctx.mode().is_idle());
    }

    #[test]
    fn dragging_moves_entity_on_camera_plane() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let start = transform(&ctx, cube).position;
        let grab = Vec3::new(0.0, 1.0, 0.0);
        let at = screen_of(&ctx, grab);
        press(&mut ctx, at);

        let (_, right, _) = ctx.camera().basis();
        let to = screen_of(&ctx, grab + right);
        move_to(&mut ctx, to);
        let moved = transform(&ctx, cube).position;
        assert!((moved - (start + right)).length() < 1e-3);
        release(&mut ctx, to);

        let at = screen_of(&ctx, Vec3::ZERO);
        move_to(&mut ctx, at);
        assert_eq!(transform(&ctx, cube).position, moved);
    }

    #[test]
    fn dragging_light_marker_moves_light() {
        let mut ctx = context();
        let marker = ctx.scene().iter().next().unwrap().id;
        let marker_position = transform(&ctx, marker).position;
        ctx.set_camera_pose(marker_position + Vec3::new(0.0, 0.0, 8.0), marker_position);

        let at = screen_of(&ctx, marker_position);
        press(&mut ctx, at);
        assert_eq!(ctx.selected(), Some(marker));
        let (_, right, up) = ctx.camera().basis();
        let at = screen_of(&ctx, marker_position + right * 2.0 - up);
        move_to(&mut ctx, at);
        release(&mut ctx, Vec2::ZERO);

        let moved = transform(&ctx, marker).position;
        assert!((moved - marker_position).length() > 1.0);
        assert!((ctx.light().unwrap().position - moved).length() < 1e-5);
    }

    #[test]
    fn mold_scenario_grows_top_face_and_stops_on_release() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let top = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        press(&mut ctx, top);
        release(&mut ctx, top);
        assert_eq!(ctx.selected(), Some(cube));

        ctx.handle(InputEvent::DoubleClick {
            position: Vec2::new(5.0, 5.0),
        });
        assert!(ctx.mode().is_idle());

        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        assert!(ctx.molding_armed());
        press(&mut ctx, top);
        let InteractionMode::Molding(gesture) = *ctx.mode() else {
            panic!("expected molding, got {}", ctx.mode().label());
        };
        assert_eq!(gesture.axis, Axis::Y);

        move_to(&mut ctx, top - Vec2::new(0.0, 100.0));
        let grown = transform(&ctx, cube);
        assert!((grown.scale.y - 2.0).abs() < 1e-4);
        assert!((grown.position.y - 1.0).abs() < 1e-4);
        assert_eq!(grown.scale.x, 1.0);
        assert_eq!(grown.scale.z, 1.0);

        ctx.handle(InputEvent::KeyUp(EditorKey::Modifier));
        assert!(ctx.mode().is_idle());
        move_to(&mut ctx, top - Vec2::new(0.0, 250.0));
        assert_eq!(transform(&ctx, cube), grown);
    }

    #[test]
    fn molding_survives_pointer_up_until_modifier_release() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let top = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        press(&mut ctx, top);
        release(&mut ctx, top);
        assert!(matches!(ctx.mode(), InteractionMode::Molding(_)));
        move_to(&mut ctx, top + Vec2::new(0.0, 50.0));
        assert!((transform(&ctx, cube).scale.y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn molding_keeps_scale_above_minimum() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let top = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        press(&mut ctx, top);
        for step in 1..40 {
            move_to(&mut ctx, top + Vec2::new(0.0, step as f32 * 20.0));
            let scale = transform(&ctx, cube).scale;
            assert!(scale.min_element() >= MIN_SCALE);
        }
        assert_eq!(transform(&ctx, cube).scale.y, MIN_SCALE);
    }

    #[test]
    fn rotated_cube_molds_the_face_under_the_pointer() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        ctx.scene_mut().set_axis_rotation(cube, Axis::Z, 90.0).unwrap();
        let top = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        press(&mut ctx, top);
        let InteractionMode::Molding(gesture) = *ctx.mode() else {
            panic!("expected molding, got {}", ctx.mode().label());
        };
        assert_eq!(gesture.axis, Axis::X);

        move_to(&mut ctx, top - Vec2::new(0.0, 100.0));
        let (min, max) = world_bounds(ctx.scene().get(cube).unwrap());
        assert!((min - Vec3::new(-0.5, 0.0, -0.5)).length() < 1e-4);
        assert!((max - Vec3::new(0.5, 2.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn diagonal_world_face_molds_its_local_axis() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        ctx.scene_mut().set_axis_rotation(cube, Axis::Y, 45.0).unwrap();
        ctx.set_camera_pose(Vec3::new(5.0, 0.5, 5.0), Vec3::new(0.0, 0.5, 0.0));
        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        let at = screen_of(&ctx, Vec3::new(0.0, 0.5, 0.0));
        press(&mut ctx, at);
        assert_eq!(ctx.selected(), Some(cube));
        let InteractionMode::Molding(gesture) = *ctx.mode() else {
            panic!("expected molding, got {}", ctx.mode().label());
        };
        assert_eq!(gesture.axis, Axis::Z);

        move_to(&mut ctx, at - Vec2::new(0.0, 100.0));
        let grown = transform(&ctx, cube);
        assert!((grown.scale - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-4);
        let offset = Vec3::new(1.0, 0.0, 1.0).normalize() * 0.5;
        assert!((grown.position - (Vec3::new(0.0, 0.5, 0.0) + offset)).length() < 1e-4);
    }

    #[test]
    fn deleting_mid_drag_aborts_gesture() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let at = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        press(&mut ctx, at);
        assert!(matches!(ctx.mode(), InteractionMode::Translating(_)));
        assert_eq!(
            ctx.apply_command(EditorCommand::DeleteSelected).unwrap(),
            CommandOutcome::Deleted(cube)
        );
        assert!(ctx.mode().is_idle());
        move_to(&mut ctx, Vec2::new(10.0, 10.0));
        assert!(ctx.mode().is_idle());
    }

    #[test]
    fn entity_vanishing_mid_mold_returns_to_idle() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let top = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        press(&mut ctx, top);
        ctx.scene_mut().remove(cube);
        move_to(&mut ctx, top - Vec2::new(0.0, 10.0));
        assert!(ctx.mode().is_idle());
    }

    #[test]
    fn delete_without_selection_changes_nothing() {
        let mut ctx = context();
        ctx.add(PrimitiveKind::Cube);
        let before = ctx.scene().len();
        let err = ctx.apply_command(EditorCommand::DeleteSelected).unwrap_err();
        assert!(matches!(err, EditorError::NoTarget));
        assert_eq!(ctx.scene().len(), before);
    }

    #[test]
    fn targeted_commands_need_a_selection() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let err = ctx
            .apply_command(EditorCommand::SetColor([1.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, EditorError::NoTarget));

        ctx.select(Some(cube));
        ctx.apply_command(EditorCommand::SetColor([1.0, 0.0, 0.0]))
            .unwrap();
        ctx.apply_command(EditorCommand::SetAxisScale {
            axis: Axis::X,
            value: 0.0,
        })
        .unwrap();
        ctx.apply_command(EditorCommand::SetAxisRotation {
            axis: Axis::Z,
            degrees: 180.0,
        })
        .unwrap();
        let entity = ctx.scene().get(cube).unwrap();
        assert_eq!(entity.appearance.color, [1.0, 0.0, 0.0]);
        assert_eq!(entity.transform.scale.x, MIN_SCALE);
        assert!((entity.transform.rotation.z - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn texture_command_decodes_image() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        ctx.select(Some(cube));
        let png = crate::scene::texture::encode_png(2, 2, [10, 20, 30, 255]);
        ctx.apply_command(EditorCommand::ApplyTexture(png)).unwrap();
        let texture = ctx.scene().get(cube).unwrap().appearance.texture.clone();
        assert_eq!(texture.map(|t| (t.width, t.height)), Some((2, 2)));

        let err = ctx
            .apply_command(EditorCommand::ApplyTexture(vec![1, 2, 3]))
            .unwrap_err();
        assert!(matches!(err, EditorError::Texture(_)));
    }

    #[test]
    fn light_commands_do_not_move_marker() {
        let mut ctx = context();
        let marker = ctx.scene().iter().next().unwrap().id;
        let marker_position = transform(&ctx, marker).position;
        ctx.apply_command(EditorCommand::SetLightPosition {
            axis: Axis::X,
            value: -3.0,
        })
        .unwrap();
        ctx.apply_command(EditorCommand::SetLightIntensity(2.5))
            .unwrap();
        ctx.apply_command(EditorCommand::SetLightColor([0.0, 1.0, 0.0]))
            .unwrap();
        let light = ctx.light().unwrap();
        assert_eq!(light.position.x, -3.0);
        assert_eq!(light.intensity, 2.5);
        assert_eq!(light.color, [0.0, 1.0, 0.0]);
        assert_eq!(transform(&ctx, marker).position, marker_position);
    }

    #[test]
    fn double_click_flies_to_surface_and_finishes() {
        let mut ctx = context();
        let cube = ctx.add(PrimitiveKind::Cube);
        let start_position = ctx.camera().position;
        let click = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        let hit = ctx.pick_at(click, true).unwrap();
        assert_eq!(hit.entity, cube);
        let destination = fly_to_destination(start_position, hit.point, 3.0);

        ctx.handle(InputEvent::DoubleClick { position: click });
        assert!(matches!(ctx.mode(), InteractionMode::CameraTransition(_)));

        let now = Instant::now();
        let mut ticks = 0u64;
        while !ctx.mode().is_idle() {
            ctx.handle(InputEvent::Tick {
                now: now + Duration::from_millis(16 * ticks),
            });
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(ctx.camera().position, destination);
        assert_eq!(ctx.camera().target, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn double_click_restarts_from_current_pose() {
        let mut ctx = context();
        ctx.add(PrimitiveKind::Cube);
        let click = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        ctx.handle(InputEvent::DoubleClick { position: click });
        let now = Instant::now();
        ctx.handle(InputEvent::Tick { now });
        ctx.handle(InputEvent::Tick {
            now: now + Duration::from_millis(300),
        });
        let midway = ctx.camera().position;

        let click = screen_of(&ctx, Vec3::new(0.0, 0.5, 0.0));
        ctx.handle(InputEvent::DoubleClick { position: click });
        let InteractionMode::CameraTransition(mut transition) = *ctx.mode() else {
            panic!("expected a restarted transition");
        };
        let first = transition.sample(now);
        assert_eq!(first.position, midway);
    }

    #[test]
    fn transition_suppresses_orbit_and_free_fly() {
        let mut ctx = context();
        ctx.add(PrimitiveKind::Cube);
        let click = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        ctx.handle(InputEvent::DoubleClick { position: click });
        ctx.handle(InputEvent::KeyDown(EditorKey::Forward));

        let now = Instant::now();
        ctx.handle(InputEvent::Tick { now });
        let pose = (ctx.camera().position, ctx.camera().target);
        press(&mut ctx, Vec2::new(5.0, 5.0));
        move_to(&mut ctx, Vec2::new(300.0, 200.0));
        ctx.handle(InputEvent::Tick { now });
        assert_eq!((ctx.camera().position, ctx.camera().target), pose);
    }

    #[test]
    fn free_fly_runs_while_idle() {
        let mut ctx = context();
        let start = ctx.camera().position;
        ctx.handle(InputEvent::KeyDown(EditorKey::Up));
        ctx.handle(InputEvent::Tick {
            now: Instant::now(),
        });
        ctx.handle(InputEvent::KeyUp(EditorKey::Up));
        ctx.handle(InputEvent::Tick {
            now: Instant::now(),
        });
        assert!((ctx.camera().position - (start + Vec3::new(0.0, 0.05, 0.0))).length() < 1e-5);
        assert!(ctx.mode().is_idle());
    }

    #[test]
    fn free_fly_runs_during_gestures() {
        let mut ctx = context();
        ctx.add(PrimitiveKind::Cube);
        let top = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));

        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        press(&mut ctx, top);
        assert_eq!(ctx.mode().label(), "Molding");
        let start = ctx.camera().position;
        ctx.handle(InputEvent::KeyDown(EditorKey::Up));
        ctx.handle(InputEvent::Tick {
            now: Instant::now(),
        });
        ctx.handle(InputEvent::KeyUp(EditorKey::Up));
        assert!((ctx.camera().position - (start + Vec3::new(0.0, 0.05, 0.0))).length() < 1e-5);
        assert_eq!(ctx.mode().label(), "Molding");
        ctx.handle(InputEvent::KeyUp(EditorKey::Modifier));
        release(&mut ctx, top);

        press(&mut ctx, top);
        assert_eq!(ctx.mode().label(), "Translating");
        let start = ctx.camera().position;
        ctx.handle(InputEvent::KeyDown(EditorKey::Up));
        ctx.handle(InputEvent::Tick {
            now: Instant::now(),
        });
        assert!((ctx.camera().position - (start + Vec3::new(0.0, 0.05, 0.0))).length() < 1e-5);
        assert_eq!(ctx.mode().label(), "Translating");
    }

    #[test]
    fn empty_space_drag_orbits_camera() {
        let mut ctx = context();
        let start = ctx.camera().position;
        press(&mut ctx, Vec2::new(5.0, 5.0));
        move_to(&mut ctx, Vec2::new(105.0, 5.0));
        release(&mut ctx, Vec2::new(105.0, 5.0));
        assert_ne!(ctx.camera().position, start);
        assert_eq!(ctx.camera().target, Vec3::ZERO);
    }

    #[test]
    fn focus_loss_exits_molding() {
        let mut ctx = context();
        ctx.add(PrimitiveKind::Cube);
        ctx.handle(InputEvent::KeyDown(EditorKey::Modifier));
        let at = screen_of(&ctx, Vec3::new(0.0, 1.0, 0.0));
        press(&mut ctx, at);
        ctx.handle(InputEvent::FocusLost);
        assert!(ctx.mode().is_idle());
        assert!(!ctx.molding_armed());
    }

    #[test]
    fn measurement_follows_selection() {
        let mut ctx = context();
        assert!(ctx.measurement().is_none());
        let cube = ctx.add(PrimitiveKind::Cube);
        ctx.select(Some(cube));
        let measurement = ctx.measurement().unwrap();
        assert!((measurement.width - 1.0).abs() < 1e-5);
        assert!(measurement.screen_position.is_some());
        assert!(ctx.render_frame().measurement.is_some());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut ctx = context();
        ctx.handle(InputEvent::Resize {
            width: 1000.0,
            height: 500.0,
        });
        assert_eq!(ctx.camera().aspect, 2.0);
        assert_eq!(ctx.viewport(), Viewport::new(1000.0, 500.0));
    }
}
