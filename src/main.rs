use anyhow::Result;
use glam::Vec3;
use kestrel_preview::cli::{CliOverrides, OrbitMode};
use kestrel_preview::config::PreviewConfig;
use kestrel_preview::host::{ObjectTransform, PrefabRef, SceneHost};
use kestrel_preview::sim::SimulatedEditor;
use kestrel_preview::PreviewManager;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            log::error!("[cli] {err}");
            std::process::exit(2);
        }
    };
    if let Err(err) = run(&cli) {
        log::error!("Simulation error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: &CliOverrides) -> Result<()> {
    let mut config = match cli.config_path() {
        Some(path) => PreviewConfig::load(path)?,
        None => PreviewConfig::default(),
    };
    let overrides = cli.config_overrides();
    if !overrides.is_empty() {
        log::info!("[cli] overriding {}", overrides.applied_fields().join(", "));
        config.apply_overrides(&overrides);
    }

    let mut editor = SimulatedEditor::with_stage(&config.stage);
    let mut manager = PreviewManager::new(config, &editor.context());

    let subject = PrefabRef::new("characters/preview_subject.fbx");
    let preview = manager.open_preview_scene(Some(&subject), &mut editor.context());
    if !preview.is_valid() {
        log::warn!("Preview scene did not open; nothing to simulate");
        return Ok(());
    }

    let scene = editor.scenes.active_scene();
    let marker = editor.scenes.spawn_named(scene, "OrbitMarker", ObjectTransform::default());
    editor.viewport.set_selection(Some(marker));
    match cli.orbit() {
        OrbitMode::Plain => manager.start_orbit(),
        OrbitMode::Tracking => {
            if !manager.toggle_orbit_tracking(&editor.context()) {
                log::warn!("Tracking orbit did not start; continuing without orbit");
            }
        }
        OrbitMode::Off => log::info!("[cli] orbit disabled"),
    }
    manager.start_camera_match();

    let ticks = cli.ticks();
    for tick in 0..ticks {
        let drift = tick as f32 * 0.01;
        editor.scenes.move_object(marker, Vec3::new(drift, 0.0, 0.0));
        let report = manager.tick(&mut editor.context());
        log::trace!("tick {tick}: {report:?}");
    }

    if cli.screenshot() {
        manager.take_screenshot(&mut editor.context());
    }

    log::info!(
        "Simulated {ticks} ticks: {} reframes, {} preview camera writes, player wanted: {}",
        editor.viewport.reframes(),
        editor.scenes.transform_writes(),
        manager.intent().show_player,
    );
    manager.shutdown();
    Ok(())
}
