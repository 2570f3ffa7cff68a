pub mod camera_match;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod manager;
pub mod monitor;
pub mod orbit;
pub mod panels;
pub mod preview_scene;
pub mod scheduler;
pub mod screenshot;
pub mod sim;

pub use error::PreviewError;
pub use host::{HostContext, ObjectId, PrefabRef, SceneId};
pub use manager::{PreviewManager, TickReport};
pub use preview_scene::PreviewScene;
