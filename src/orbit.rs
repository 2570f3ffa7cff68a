use crate::host::{HostContext, ObjectId, ViewportCamera};
use crate::scheduler::{TickScheduler, TickTask};
use glam::{Mat3, Quat, Vec3};

const WORLD_UP: Vec3 = Vec3::Y;

/// Orientation whose -Z axis points along `forward`, with +Y as close to `up` as possible.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let back = (-forward).try_normalize()?;
    let right = up.cross(back).try_normalize()?;
    let true_up = back.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, true_up, back)).normalize())
}

/// Viewport framing produced by one orbit step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitFrame {
    pub pivot: Vec3,
    pub rotation: Quat,
    pub size: f32,
}

/// Rotate the camera boom about world up by `degrees` and reframe it around `pivot`.
///
/// The boom is measured from the viewport's own pivot so a re-centred pivot keeps the
/// current distance and angle. Size keeps the apparent framing for the camera's fov.
pub fn orbit_step(camera: &ViewportCamera, pivot: Vec3, degrees: f32) -> OrbitFrame {
    let boom = camera.position - camera.pivot;
    let boom = Quat::from_axis_angle(WORLD_UP, degrees.to_radians()) * boom;
    let size = (camera.fov_degrees.to_radians() * 0.5).sin() * camera.distance;
    let rotation = look_rotation(-boom, WORLD_UP).unwrap_or(camera.rotation);
    OrbitFrame { pivot, rotation, size }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitState {
    pub enabled: bool,
    pub track_target: Option<ObjectId>,
    /// Offset from the tracked target to the orbit pivot, captured when tracking starts.
    pub pivot_displacement: Vec3,
}

/// Spins the viewport camera around its pivot, optionally following a moving target.
#[derive(Debug, Clone)]
pub struct OrbitController {
    state: OrbitState,
    degrees_per_tick: f32,
}

impl OrbitController {
    pub fn new(degrees_per_tick: f32) -> Self {
        Self { state: OrbitState::default(), degrees_per_tick }
    }

    pub fn state(&self) -> &OrbitState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn degrees_per_tick(&self) -> f32 {
        self.degrees_per_tick
    }

    /// Start a plain orbit around the viewport pivot.
    pub fn start(&mut self, scheduler: &mut TickScheduler) {
        self.state.track_target = None;
        self.state.enabled = true;
        scheduler.subscribe(TickTask::Orbit);
    }

    pub fn stop(&mut self, scheduler: &mut TickScheduler) {
        scheduler.unsubscribe(TickTask::Orbit);
        self.state.enabled = false;
        self.state.track_target = None;
    }

    pub fn toggle(&mut self, scheduler: &mut TickScheduler) {
        if self.state.enabled {
            self.stop(scheduler);
        } else {
            self.start(scheduler);
        }
    }

    /// Start orbiting the current selection, or stop if an orbit is already running.
    ///
    /// Returns whether the orbit is running afterwards.
    pub fn toggle_tracking(&mut self, scheduler: &mut TickScheduler, host: &HostContext<'_>) -> bool {
        if self.state.enabled {
            self.stop(scheduler);
            return false;
        }
        let Some(target) = host.viewport.active_selection() else {
            log::debug!("[orbit] tracking requested with nothing selected");
            return false;
        };
        let Some(transform) = host.scenes.transform(target) else {
            log::debug!("[orbit] selection {target} has no transform");
            return false;
        };
        let Some(camera) = host.viewport.camera() else {
            log::debug!("[orbit] tracking requested without an open viewport");
            return false;
        };
        self.state.pivot_displacement = camera.pivot - transform.position;
        self.state.track_target = Some(target);
        self.state.enabled = true;
        scheduler.subscribe(TickTask::Orbit);
        log::debug!("[orbit] tracking {target} with displacement {:?}", self.state.pivot_displacement);
        true
    }

    /// Per-tick step. Returns the applied framing, `None` when nothing was changed.
    pub fn update(&mut self, host: &mut HostContext<'_>) -> Option<OrbitFrame> {
        if !self.state.enabled {
            return None;
        }
        let camera = host.viewport.camera()?;
        let mut pivot = camera.pivot;
        if let Some(target) = self.state.track_target {
            match host.scenes.transform(target) {
                Some(transform) => pivot = transform.position + self.state.pivot_displacement,
                None => {
                    log::debug!("[orbit] tracked {target} is gone; orbiting the viewport pivot");
                    self.state.track_target = None;
                }
            }
        }
        let frame = orbit_step(&camera, pivot, self.degrees_per_tick);
        host.viewport.look_at_direct(frame.pivot, frame.rotation, frame.size);
        host.viewport.repaint_all();
        Some(frame)
    }
}
