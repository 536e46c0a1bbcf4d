//! Blockout - interactive primitive blocking editor.
//!
//! Spawn cubes, spheres and cylinders, drag them around on a camera-facing
//! plane, hold Shift and drag a face to mold an entity along that face's
//! axis, and double-click any surface to fly the camera to it. A directional
//! light is bound to a draggable marker in the scene.

mod app;
mod config;
mod editor;
mod error;
mod render;
mod scene;
mod ui;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = config::EditorConfig::from_env();
    app::run(config);
}
