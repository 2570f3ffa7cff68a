use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "PanelConfig::default_player_on")]
    pub anim_player_on_by_default: bool,
    #[serde(default)]
    pub anim_retargeter_on_by_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrbitConfig {
    /// Rotation applied per tick, not scaled by frame time.
    #[serde(default = "OrbitConfig::default_degrees_per_tick")]
    pub degrees_per_tick: f32,
}

/// Names of the objects that make up the preview stage prefab.
#[derive(Debug, Clone, Deserialize)]
pub struct StageConfig {
    #[serde(default = "StageConfig::default_environment_prefab")]
    pub environment_prefab: String,
    #[serde(default = "StageConfig::default_stage_object")]
    pub stage_object: String,
    #[serde(default = "StageConfig::default_camera_object")]
    pub camera_object: String,
    #[serde(default = "StageConfig::default_character_slot")]
    pub character_slot: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotConfig {
    #[serde(default = "ScreenshotConfig::default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PreviewConfig {
    #[serde(default)]
    pub panels: PanelConfig,
    #[serde(default)]
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub stage: StageConfig,
    #[serde(default)]
    pub screenshot: ScreenshotConfig,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewConfigOverrides {
    pub degrees_per_tick: Option<f32>,
    pub anim_player_on_by_default: Option<bool>,
}

impl PanelConfig {
    const fn default_player_on() -> bool {
        true
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { anim_player_on_by_default: Self::default_player_on(), anim_retargeter_on_by_default: false }
    }
}

impl OrbitConfig {
    const fn default_degrees_per_tick() -> f32 {
        0.1
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self { degrees_per_tick: Self::default_degrees_per_tick() }
    }
}

impl StageConfig {
    fn default_environment_prefab() -> String {
        "prefabs/preview_stage.json".to_string()
    }

    fn default_stage_object() -> String {
        "PreviewStage".to_string()
    }

    fn default_camera_object() -> String {
        "PreviewCamera".to_string()
    }

    fn default_character_slot() -> String {
        "PreviewCharacterSlot".to_string()
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            environment_prefab: Self::default_environment_prefab(),
            stage_object: Self::default_stage_object(),
            camera_object: Self::default_camera_object(),
            character_slot: Self::default_character_slot(),
        }
    }
}

impl ScreenshotConfig {
    fn default_output_dir() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self { output_dir: Self::default_output_dir() }
    }
}

impl PreviewConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("[config] load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &PreviewConfigOverrides) {
        if let Some(degrees) = overrides.degrees_per_tick {
            self.orbit.degrees_per_tick = degrees;
        }
        if let Some(player_on) = overrides.anim_player_on_by_default {
            self.panels.anim_player_on_by_default = player_on;
        }
    }
}

impl PreviewConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.degrees_per_tick.is_none() && self.anim_player_on_by_default.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.degrees_per_tick.is_some() {
            fields.push("degrees_per_tick");
        }
        if self.anim_player_on_by_default.is_some() {
            fields.push("anim_player_on_by_default");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg: PreviewConfig = serde_json::from_str("{}").expect("parse empty config");
        assert!(cfg.panels.anim_player_on_by_default);
        assert!(!cfg.panels.anim_retargeter_on_by_default);
        assert!((cfg.orbit.degrees_per_tick - 0.1).abs() < f32::EPSILON);
        assert_eq!(cfg.stage.camera_object, "PreviewCamera");
        assert_eq!(cfg.screenshot.output_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{ "orbit": { "degrees_per_tick": 0.5 }, "stage": { "stage_object": "Stage" } }"#;
        let cfg: PreviewConfig = serde_json::from_str(json).expect("parse config");
        assert!((cfg.orbit.degrees_per_tick - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.stage.stage_object, "Stage");
        assert_eq!(cfg.stage.character_slot, "PreviewCharacterSlot");
    }

    #[test]
    fn load_reports_parse_failures_with_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{ not json").expect("write config");
        let err = PreviewConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn load_or_default_falls_back_when_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = PreviewConfig::load_or_default(dir.path().join("missing.json"));
        assert!(cfg.panels.anim_player_on_by_default);
    }

    #[test]
    fn overrides_apply_only_set_fields() {
        let mut cfg = PreviewConfig::default();
        let overrides = PreviewConfigOverrides { degrees_per_tick: Some(1.5), anim_player_on_by_default: None };
        cfg.apply_overrides(&overrides);
        assert!((cfg.orbit.degrees_per_tick - 1.5).abs() < f32::EPSILON);
        assert!(cfg.panels.anim_player_on_by_default);
        assert_eq!(overrides.applied_fields(), vec!["degrees_per_tick"]);
        assert!(!overrides.is_empty());
    }
}
