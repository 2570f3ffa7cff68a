use anyhow::Result;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque identity of a scene owned by the host editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SceneId(pub u64);

/// Opaque identity of an object living in one of the host's scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Reference to an importable asset (character prefab, environment rig).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefabRef {
    key: String,
}

impl PrefabRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY }
    }
}

/// Snapshot of the last active viewport camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCamera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov_degrees: f32,
    pub pivot: Vec3,
    pub distance: f32,
}

/// Scene management surface of the host editor.
pub trait SceneHost {
    /// Scene currently active in the editor.
    fn active_scene(&self) -> SceneId;

    /// Prompt the user to save modified scenes. Returns `false` when the user cancels.
    fn save_modified_scenes_if_user_wants(&mut self) -> bool;

    /// Create an empty scene and make it the active one.
    fn new_empty_scene(&mut self) -> Result<SceneId>;

    /// Instantiate a prefab into `scene` and return the spawned root object.
    fn instantiate(&mut self, scene: SceneId, prefab: &PrefabRef, at: ObjectTransform) -> Result<ObjectId>;

    /// Look up an object in `scene` by name.
    fn find_object(&self, scene: SceneId, name: &str) -> Option<ObjectId>;

    /// World transform of an object, `None` once the object no longer exists.
    fn transform(&self, object: ObjectId) -> Option<ObjectTransform>;

    /// Returns `false` when the object no longer exists.
    fn set_transform(&mut self, object: ObjectId, transform: ObjectTransform) -> bool;

    /// Returns `false` when the object has no camera component.
    fn set_camera_fov(&mut self, object: ObjectId, fov_degrees: f32) -> bool;

    /// Apply the preview stage's post-processing and lighting setup.
    fn apply_preview_lighting(&mut self, _scene: SceneId) -> Result<()> {
        Ok(())
    }
}

/// 3D viewport surface of the host editor.
pub trait ViewportHost {
    /// Last active viewport camera, if any viewport is open.
    fn camera(&self) -> Option<ViewportCamera>;

    /// Reframe the viewport around `pivot` with the given orientation and apparent size.
    fn look_at_direct(&mut self, pivot: Vec3, rotation: Quat, size: f32);

    fn repaint_all(&mut self);

    /// Object currently selected in the editor.
    fn active_selection(&self) -> Option<ObjectId>;

    /// Capture the game view to `path`.
    fn capture_screenshot(&mut self, path: &Path) -> Result<()>;
}

/// Animation player and retargeter panels.
pub trait PanelHost {
    fn is_player_open(&self) -> bool;

    /// Open the player on `subject`; `None` is a valid "nothing selected" subject.
    fn open_player(&mut self, subject: Option<ObjectId>);

    fn close_player(&mut self);

    /// Return the player's subject to its default pose.
    fn reset_face(&mut self);

    fn is_retargeter_open(&self) -> bool;

    fn open_retargeter(&mut self);

    fn close_retargeter(&mut self);
}

/// Borrowed view of every host collaborator, handed to controllers each tick.
pub struct HostContext<'a> {
    pub scenes: &'a mut dyn SceneHost,
    pub viewport: &'a mut dyn ViewportHost,
    pub panels: &'a mut dyn PanelHost,
}

impl<'a> HostContext<'a> {
    pub fn new(
        scenes: &'a mut dyn SceneHost,
        viewport: &'a mut dyn ViewportHost,
        panels: &'a mut dyn PanelHost,
    ) -> Self {
        Self { scenes, viewport, panels }
    }
}
