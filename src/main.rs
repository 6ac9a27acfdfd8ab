mod app;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window};
use tracing_subscriber::EnvFilter;
use vertex_tree::{load_session_config_or_default, session_config_path};

use app::{RuntimeConfig, VertexTreePlugin};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let session = load_session_config_or_default(session_config_path());

    App::new()
        .insert_resource(RuntimeConfig { session })
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.03)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Vertex Tree".to_string(),
                        resolution: (960.0, 540.0).into(),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .disable::<LogPlugin>(),
        )
        .add_plugins(VertexTreePlugin)
        .run();
}
