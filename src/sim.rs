//! In-memory editor host used by the `preview_sim` binary and the test suite.
//!
//! Scenes, objects and panels are plain maps; the viewport follows the usual
//! pivot/rotation/size framing where the camera sits `size / sin(fov / 2)` behind the pivot.

use crate::config::StageConfig;
use crate::host::{
    HostContext, ObjectId, ObjectTransform, PanelHost, PrefabRef, SceneHost, SceneId, ViewportCamera,
    ViewportHost,
};
use anyhow::{anyhow, Result};
use glam::{Quat, Vec3};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

const DEFAULT_STAGE_CAMERA_FOV: f32 = 30.0;

#[derive(Debug, Clone)]
pub struct PrefabPart {
    pub name: String,
    pub transform: ObjectTransform,
    pub camera_fov: Option<f32>,
}

impl PrefabPart {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            transform: ObjectTransform { position, rotation: Quat::IDENTITY },
            camera_fov: None,
        }
    }

    pub fn with_camera(mut self, fov_degrees: f32) -> Self {
        self.camera_fov = Some(fov_degrees);
        self
    }
}

#[derive(Debug, Clone)]
struct SimObject {
    scene: SceneId,
    name: String,
    transform: ObjectTransform,
    camera_fov: Option<f32>,
}

#[derive(Debug)]
pub struct SimScenes {
    next_id: u64,
    active: SceneId,
    scenes: BTreeSet<SceneId>,
    objects: BTreeMap<ObjectId, SimObject>,
    prefabs: HashMap<String, Vec<PrefabPart>>,
    save_answer: bool,
    save_prompts: u32,
    lighting_applied: u32,
    transform_writes: u32,
    fail_new_scene: bool,
    fail_lighting: bool,
}

impl SimScenes {
    pub fn new() -> Self {
        let mut scenes = Self {
            next_id: 1,
            active: SceneId(0),
            scenes: BTreeSet::new(),
            objects: BTreeMap::new(),
            prefabs: HashMap::new(),
            save_answer: true,
            save_prompts: 0,
            lighting_applied: 0,
            transform_writes: 0,
            fail_new_scene: false,
            fail_lighting: false,
        };
        let first = scenes.add_scene();
        scenes.active = first;
        scenes
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register the stage prefab layout matching `stage`.
    pub fn register_stage_prefab(&mut self, stage: &StageConfig) {
        self.register_prefab(
            stage.environment_prefab.as_str(),
            vec![
                PrefabPart::new(stage.stage_object.as_str(), Vec3::ZERO),
                PrefabPart::new(stage.camera_object.as_str(), Vec3::new(0.0, 1.4, 3.0))
                    .with_camera(DEFAULT_STAGE_CAMERA_FOV),
                PrefabPart::new(stage.character_slot.as_str(), Vec3::new(0.0, 0.0, 0.25)),
            ],
        );
    }

    pub fn register_prefab(&mut self, key: impl Into<String>, parts: Vec<PrefabPart>) {
        self.prefabs.insert(key.into(), parts);
    }

    pub fn add_scene(&mut self) -> SceneId {
        let scene = SceneId(self.allocate());
        self.scenes.insert(scene);
        scene
    }

    pub fn set_active_scene(&mut self, scene: SceneId) {
        self.active = scene;
    }

    pub fn spawn_named(&mut self, scene: SceneId, name: &str, transform: ObjectTransform) -> ObjectId {
        let id = ObjectId(self.allocate());
        self.objects.insert(id, SimObject { scene, name: name.to_string(), transform, camera_fov: None });
        id
    }

    pub fn despawn(&mut self, object: ObjectId) -> bool {
        self.objects.remove(&object).is_some()
    }

    pub fn move_object(&mut self, object: ObjectId, position: Vec3) -> bool {
        match self.objects.get_mut(&object) {
            Some(entry) => {
                entry.transform.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove_camera_component(&mut self, object: ObjectId) {
        if let Some(entry) = self.objects.get_mut(&object) {
            entry.camera_fov = None;
        }
    }

    pub fn camera_fov(&self, object: ObjectId) -> Option<f32> {
        self.objects.get(&object).and_then(|entry| entry.camera_fov)
    }

    pub fn object_scene(&self, object: ObjectId) -> Option<SceneId> {
        self.objects.get(&object).map(|entry| entry.scene)
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn set_save_answer(&mut self, answer: bool) {
        self.save_answer = answer;
    }

    pub fn set_fail_new_scene(&mut self, fail: bool) {
        self.fail_new_scene = fail;
    }

    pub fn set_fail_lighting(&mut self, fail: bool) {
        self.fail_lighting = fail;
    }

    pub fn save_prompts(&self) -> u32 {
        self.save_prompts
    }

    pub fn lighting_applied(&self) -> u32 {
        self.lighting_applied
    }

    pub fn transform_writes(&self) -> u32 {
        self.transform_writes
    }
}

impl Default for SimScenes {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost for SimScenes {
    fn active_scene(&self) -> SceneId {
        self.active
    }

    fn save_modified_scenes_if_user_wants(&mut self) -> bool {
        self.save_prompts += 1;
        self.save_answer
    }

    fn new_empty_scene(&mut self) -> Result<SceneId> {
        if self.fail_new_scene {
            return Err(anyhow!("scene creation disabled"));
        }
        let scene = self.add_scene();
        self.active = scene;
        Ok(scene)
    }

    fn instantiate(&mut self, scene: SceneId, prefab: &PrefabRef, at: ObjectTransform) -> Result<ObjectId> {
        if !self.scenes.contains(&scene) {
            return Err(anyhow!("cannot instantiate '{}' into unknown {scene}", prefab.key()));
        }
        let Some(parts) = self.prefabs.get(prefab.key()).cloned() else {
            return Ok(self.spawn_named(scene, prefab.key(), at));
        };
        let mut root = None;
        for part in parts {
            let transform = ObjectTransform {
                position: at.position + at.rotation * part.transform.position,
                rotation: at.rotation * part.transform.rotation,
            };
            let id = self.spawn_named(scene, &part.name, transform);
            if let Some(entry) = self.objects.get_mut(&id) {
                entry.camera_fov = part.camera_fov;
            }
            root.get_or_insert(id);
        }
        root.ok_or_else(|| anyhow!("prefab '{}' has no parts", prefab.key()))
    }

    fn find_object(&self, scene: SceneId, name: &str) -> Option<ObjectId> {
        self.objects.iter().find(|(_, entry)| entry.scene == scene && entry.name == name).map(|(id, _)| *id)
    }

    fn transform(&self, object: ObjectId) -> Option<ObjectTransform> {
        self.objects.get(&object).map(|entry| entry.transform)
    }

    fn set_transform(&mut self, object: ObjectId, transform: ObjectTransform) -> bool {
        match self.objects.get_mut(&object) {
            Some(entry) => {
                entry.transform = transform;
                self.transform_writes += 1;
                true
            }
            None => false,
        }
    }

    fn set_camera_fov(&mut self, object: ObjectId, fov_degrees: f32) -> bool {
        match self.objects.get_mut(&object).and_then(|entry| entry.camera_fov.as_mut()) {
            Some(fov) => {
                *fov = fov_degrees;
                true
            }
            None => false,
        }
    }

    fn apply_preview_lighting(&mut self, scene: SceneId) -> Result<()> {
        if !self.scenes.contains(&scene) {
            return Err(anyhow!("cannot light unknown {scene}"));
        }
        if self.fail_lighting {
            return Err(anyhow!("preview lighting unavailable for {scene}"));
        }
        self.lighting_applied += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimViewport {
    open: bool,
    pivot: Vec3,
    rotation: Quat,
    size: f32,
    fov_degrees: f32,
    selection: Option<ObjectId>,
    repaints: u32,
    reframes: u32,
    screenshots: Vec<PathBuf>,
}

impl SimViewport {
    pub fn new() -> Self {
        let mut viewport = Self {
            open: true,
            pivot: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size: 1.0,
            fov_degrees: 60.0,
            selection: None,
            repaints: 0,
            reframes: 0,
            screenshots: Vec::new(),
        };
        viewport.set_framing(Vec3::ZERO, Vec3::new(0.0, 1.0, 5.0));
        viewport
    }

    /// Frame the viewport so the camera sits at `eye` looking at `pivot`.
    pub fn set_framing(&mut self, pivot: Vec3, eye: Vec3) {
        let boom = eye - pivot;
        let distance = boom.length().max(1e-4);
        self.pivot = pivot;
        self.rotation = crate::orbit::look_rotation(-boom, Vec3::Y).unwrap_or(Quat::IDENTITY);
        self.size = distance * half_fov_sin(self.fov_degrees);
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn set_selection(&mut self, selection: Option<ObjectId>) {
        self.selection = selection;
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn distance(&self) -> f32 {
        self.size / half_fov_sin(self.fov_degrees)
    }

    pub fn position(&self) -> Vec3 {
        self.pivot + self.rotation * Vec3::Z * self.distance()
    }

    pub fn repaints(&self) -> u32 {
        self.repaints
    }

    pub fn reframes(&self) -> u32 {
        self.reframes
    }

    pub fn screenshots(&self) -> &[PathBuf] {
        &self.screenshots
    }
}

impl Default for SimViewport {
    fn default() -> Self {
        Self::new()
    }
}

fn half_fov_sin(fov_degrees: f32) -> f32 {
    (fov_degrees.to_radians() * 0.5).sin().max(1e-4)
}

impl ViewportHost for SimViewport {
    fn camera(&self) -> Option<ViewportCamera> {
        if !self.open {
            return None;
        }
        Some(ViewportCamera {
            position: self.position(),
            rotation: self.rotation,
            fov_degrees: self.fov_degrees,
            pivot: self.pivot,
            distance: self.distance(),
        })
    }

    fn look_at_direct(&mut self, pivot: Vec3, rotation: Quat, size: f32) {
        self.pivot = pivot;
        self.rotation = rotation;
        self.size = size;
        self.reframes += 1;
    }

    fn repaint_all(&mut self) {
        self.repaints += 1;
    }

    fn active_selection(&self) -> Option<ObjectId> {
        self.selection
    }

    fn capture_screenshot(&mut self, path: &Path) -> Result<()> {
        if !self.open {
            return Err(anyhow!("no viewport open to capture {}", path.display()));
        }
        self.screenshots.push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SimPanels {
    player_open: bool,
    player_subject: Option<ObjectId>,
    retargeter_open: bool,
    player_opens: u32,
    face_resets: u32,
}

impl SimPanels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_subject(&self) -> Option<ObjectId> {
        self.player_subject
    }

    pub fn player_opens(&self) -> u32 {
        self.player_opens
    }

    pub fn face_resets(&self) -> u32 {
        self.face_resets
    }
}

impl PanelHost for SimPanels {
    fn is_player_open(&self) -> bool {
        self.player_open
    }

    fn open_player(&mut self, subject: Option<ObjectId>) {
        self.player_open = true;
        self.player_subject = subject;
        self.player_opens += 1;
    }

    fn close_player(&mut self) {
        self.player_open = false;
        self.player_subject = None;
    }

    fn reset_face(&mut self) {
        self.face_resets += 1;
    }

    fn is_retargeter_open(&self) -> bool {
        self.retargeter_open
    }

    fn open_retargeter(&mut self) {
        self.retargeter_open = true;
    }

    fn close_retargeter(&mut self) {
        self.retargeter_open = false;
    }
}

/// Complete simulated editor: scenes, viewport and panels.
#[derive(Debug)]
pub struct SimulatedEditor {
    pub scenes: SimScenes,
    pub viewport: SimViewport,
    pub panels: SimPanels,
}

impl SimulatedEditor {
    /// Editor with one empty working scene and the default stage prefab registered.
    pub fn new() -> Self {
        Self::with_stage(&StageConfig::default())
    }

    pub fn with_stage(stage: &StageConfig) -> Self {
        let mut scenes = SimScenes::new();
        scenes.register_stage_prefab(stage);
        Self { scenes, viewport: SimViewport::new(), panels: SimPanels::new() }
    }

    pub fn context(&mut self) -> HostContext<'_> {
        HostContext::new(&mut self.scenes, &mut self.viewport, &mut self.panels)
    }
}

impl Default for SimulatedEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_framing_places_camera_at_eye() {
        let mut viewport = SimViewport::new();
        viewport.set_framing(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 4.0));
        let camera = viewport.camera().expect("viewport open");
        assert!(camera.position.distance(Vec3::new(1.0, 2.0, 4.0)) < 1e-3);
        assert!((camera.distance - Vec3::new(0.0, 2.0, 4.0).length()).abs() < 1e-3);
    }

    #[test]
    fn stage_prefab_spawns_named_parts() {
        let stage = StageConfig::default();
        let mut editor = SimulatedEditor::with_stage(&stage);
        let scene = editor.scenes.new_empty_scene().expect("new scene");
        let root = editor
            .scenes
            .instantiate(scene, &PrefabRef::new(stage.environment_prefab.as_str()), ObjectTransform::default())
            .expect("instantiate stage");
        assert_eq!(editor.scenes.find_object(scene, &stage.stage_object), Some(root));
        let camera = editor.scenes.find_object(scene, &stage.camera_object).expect("camera part");
        assert_eq!(editor.scenes.camera_fov(camera), Some(DEFAULT_STAGE_CAMERA_FOV));
    }

    #[test]
    fn closed_viewport_refuses_capture() {
        let mut viewport = SimViewport::new();
        viewport.set_open(false);
        assert!(viewport.camera().is_none());
        assert!(viewport.capture_screenshot(Path::new("shot.png")).is_err());
    }
}
