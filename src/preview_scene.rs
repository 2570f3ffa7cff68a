use crate::config::StageConfig;
use crate::error::{PreviewError, Result};
use crate::host::{ObjectId, ObjectTransform, PrefabRef, SceneHost, SceneId};

/// Handle to an isolated scene hosting one preview subject plus its stage rig.
///
/// The default value is the invalid handle; callers check [`PreviewScene::is_valid`] before use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewScene {
    scene: Option<SceneId>,
    stage: Option<ObjectId>,
    camera: Option<ObjectId>,
    character_slot: Option<ObjectId>,
    character: Option<ObjectId>,
}

impl PreviewScene {
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Recognise `scene` as a preview scene by locating its stage objects.
    pub fn fetch(scenes: &dyn SceneHost, scene: SceneId, stage: &StageConfig) -> Self {
        let Some(stage_root) = scenes.find_object(scene, &stage.stage_object) else {
            return Self::invalid();
        };
        Self {
            scene: Some(scene),
            stage: Some(stage_root),
            camera: scenes.find_object(scene, &stage.camera_object),
            character_slot: scenes.find_object(scene, &stage.character_slot),
            character: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.scene.is_some() && self.stage.is_some()
    }

    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    pub fn camera(&self) -> Option<ObjectId> {
        self.camera
    }

    pub fn character(&self) -> Option<ObjectId> {
        self.character
    }

    fn show_character(
        &mut self,
        scenes: &mut dyn SceneHost,
        scene: SceneId,
        subject: &PrefabRef,
    ) -> Result<ObjectId> {
        let at = self.character_slot.and_then(|slot| scenes.transform(slot)).unwrap_or_default();
        let character = scenes.instantiate(scene, subject, at)?;
        self.character = Some(character);
        Ok(character)
    }
}

/// Tracks the active scene and the one preview scene that is current, if any.
#[derive(Debug, Clone)]
pub struct PreviewSceneTracker {
    current_scene: SceneId,
    handle: Option<SceneId>,
    preview: PreviewScene,
}

impl PreviewSceneTracker {
    /// Snapshot the active scene, adopting it when it already is a preview scene.
    pub fn adopt(scenes: &dyn SceneHost, stage: &StageConfig) -> Self {
        let current_scene = scenes.active_scene();
        let preview = PreviewScene::fetch(scenes, current_scene, stage);
        if preview.is_valid() {
            log::info!("[preview] adopted open preview scene {current_scene}");
            Self { current_scene, handle: Some(current_scene), preview }
        } else {
            Self { current_scene, handle: None, preview: PreviewScene::invalid() }
        }
    }

    pub fn current_scene(&self) -> SceneId {
        self.current_scene
    }

    pub fn is_preview_scene(&self, scenes: &dyn SceneHost) -> bool {
        self.handle == Some(scenes.active_scene()) && self.preview.is_valid()
    }

    pub fn preview_scene(&self, scenes: &dyn SceneHost) -> PreviewScene {
        if self.is_preview_scene(scenes) {
            self.preview
        } else {
            PreviewScene::invalid()
        }
    }

    /// Re-read the active scene. Returns `true` when it changed since the last call.
    pub fn refresh(&mut self, scenes: &dyn SceneHost) -> bool {
        let active = scenes.active_scene();
        if active == self.current_scene {
            return false;
        }
        log::debug!("[preview] active scene changed {} -> {active}", self.current_scene);
        self.current_scene = active;
        self.preview = self.preview_scene(scenes);
        true
    }

    pub fn open(
        &mut self,
        scenes: &mut dyn SceneHost,
        subject: Option<&PrefabRef>,
        stage: &StageConfig,
    ) -> Result<PreviewScene> {
        let subject = subject.ok_or(PreviewError::MissingSubject)?;
        if !self.is_preview_scene(&*scenes) && !scenes.save_modified_scenes_if_user_wants() {
            return Err(PreviewError::SaveDeclined);
        }

        let scene = scenes.new_empty_scene()?;
        let environment = PrefabRef::new(stage.environment_prefab.as_str());
        scenes.instantiate(scene, &environment, ObjectTransform::default())?;

        let mut preview = PreviewScene::fetch(&*scenes, scene, stage);
        self.current_scene = scenes.active_scene();
        self.handle = Some(scene);
        // Stays invalid until lighting and the character spawn both succeed.
        self.preview = PreviewScene::invalid();
        if !preview.is_valid() {
            return Err(PreviewError::MissingStage { scene, stage: stage.stage_object.clone() });
        }

        scenes.apply_preview_lighting(scene)?;
        let character = preview.show_character(scenes, scene, subject)?;
        self.preview = preview;
        log::info!("[preview] opened {scene} with '{}' as {character}", subject.key());
        Ok(preview)
    }
}
