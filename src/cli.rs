use crate::config::PreviewConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_TICKS: u32 = 120;
const SUPPORTED_FLAGS: &str = "--config, --ticks, --orbit, --degrees-per-tick, --player, --screenshot";

/// Which orbit the simulation drives while ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitMode {
    Plain,
    #[default]
    Tracking,
    Off,
}

impl OrbitMode {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "tracking" => Ok(Self::Tracking),
            "off" | "none" => Ok(Self::Off),
            other => bail!("Invalid orbit mode '{other}'. Use plain, tracking or off."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    config_path: Option<PathBuf>,
    ticks: Option<u32>,
    orbit: Option<OrbitMode>,
    degrees_per_tick: Option<f32>,
    player: Option<bool>,
    screenshot: bool,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Supported flags: {SUPPORTED_FLAGS}.");
            }
            let key = &flag[2..];
            if key == "screenshot" {
                overrides.screenshot = true;
                continue;
            }
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config_path = Some(PathBuf::from(value)),
                "ticks" => {
                    overrides.ticks =
                        Some(value.parse::<u32>().with_context(|| format!("Invalid tick count '{value}'"))?);
                }
                "degrees-per-tick" => {
                    let degrees = value
                        .parse::<f32>()
                        .with_context(|| format!("Invalid degrees per tick '{value}'"))?;
                    if !degrees.is_finite() {
                        bail!("Degrees per tick must be finite, got '{value}'");
                    }
                    overrides.degrees_per_tick = Some(degrees);
                }
                "player" => {
                    overrides.player = Some(parse_bool_flag("player", &value)?);
                }
                "orbit" => overrides.orbit = Some(OrbitMode::parse(&value)?),
                _ => bail!("Unknown flag '{flag}'. Supported flags: {SUPPORTED_FLAGS}."),
            }
        }
        Ok(overrides)
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks.unwrap_or(DEFAULT_TICKS)
    }

    pub fn orbit(&self) -> OrbitMode {
        self.orbit.unwrap_or_default()
    }

    pub fn screenshot(&self) -> bool {
        self.screenshot
    }

    pub fn config_overrides(&self) -> PreviewConfigOverrides {
        PreviewConfigOverrides { degrees_per_tick: self.degrees_per_tick, anim_player_on_by_default: self.player }
    }
}

fn parse_bool_flag(flag: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("Invalid {flag} value '{other}'. Use on/off or true/false."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = [
            "preview_sim",
            "--config",
            "preview.json",
            "--ticks",
            "30",
            "--orbit",
            "plain",
            "--degrees-per-tick",
            "0.5",
            "--player",
            "off",
            "--screenshot",
        ];
        let cli = CliOverrides::parse(args).expect("parse flags");
        assert_eq!(cli.config_path(), Some(&PathBuf::from("preview.json")));
        assert_eq!(cli.ticks(), 30);
        assert_eq!(cli.orbit(), OrbitMode::Plain);
        assert!(cli.screenshot());
        let overrides = cli.config_overrides();
        assert_eq!(overrides.degrees_per_tick, Some(0.5));
        assert_eq!(overrides.anim_player_on_by_default, Some(false));
    }

    #[test]
    fn defaults_when_no_flags() {
        let cli = CliOverrides::parse(["preview_sim"]).expect("parse");
        assert_eq!(cli.ticks(), DEFAULT_TICKS);
        assert_eq!(cli.orbit(), OrbitMode::Tracking);
        assert!(!cli.screenshot());
        assert!(cli.config_overrides().is_empty());
    }

    #[test]
    fn missing_value_errors() {
        let err = CliOverrides::parse(["preview_sim", "--ticks"]).unwrap_err();
        assert!(err.to_string().contains("Expected a value"), "error should mention missing value");
    }

    #[test]
    fn orbit_mode_accepts_off_and_rejects_garbage() {
        let cli = CliOverrides::parse(["preview_sim", "--orbit", "OFF"]).expect("parse");
        assert_eq!(cli.orbit(), OrbitMode::Off);
        let err = CliOverrides::parse(["preview_sim", "--orbit", "spiral"]).unwrap_err();
        assert!(err.to_string().contains("Invalid orbit mode"));
    }

    #[test]
    fn positional_argument_lists_every_flag() {
        let err = CliOverrides::parse(["preview_sim", "stray"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unexpected argument 'stray'"));
        assert!(message.contains("--orbit") && message.contains("--screenshot"));
    }

    #[test]
    fn rejects_unknown_flags() {
        let err = CliOverrides::parse(["preview_sim", "--foo", "bar"]).unwrap_err();
        assert!(err.to_string().contains("Unknown flag"), "unknown flags should error");
    }

    #[test]
    fn rejects_bad_bool() {
        let err = CliOverrides::parse(["preview_sim", "--player", "maybe"]).unwrap_err();
        assert!(err.to_string().contains("Invalid player value"));
    }
}
