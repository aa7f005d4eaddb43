//! Render loop
//!
//! The engine owns all per-frame state: the particle field, the active mode,
//! the pointer and obstacle snapshots and the RNG. Hosts feed it events and
//! call `frame` once per display refresh; it never schedules itself.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::platform::{ObstacleTracker, PointerTracker};
use crate::renderer::draw::TEMPORAL_FADE;
use crate::renderer::{Composite, Surface, draw_particles};
use crate::settings::Settings;
use crate::sim::{Mode, ModeInfo, ParticleField, Rect, mode_catalog, update_field};

/// Lifecycle of the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built but not yet started
    Idle,
    /// Simulating and drawing every frame
    Running,
    /// Torn down; terminal
    Stopped,
}

/// What a single frame did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub mesh_segments: usize,
    pub scanning: usize,
}

pub struct Engine {
    field: ParticleField,
    mode: Mode,
    pointer: PointerTracker,
    obstacles: ObstacleTracker,
    rng: Pcg32,
    particle_count: usize,
    state: LoopState,
    frames: u64,
}

impl Engine {
    /// Build an idle engine with a freshly seeded field
    ///
    /// Fails on invalid settings, whether parsed or built by hand.
    pub fn new(settings: &Settings, width: f32, height: f32, seed: u64) -> Result<Self> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(settings.seed.unwrap_or(seed));
        let particle_count = settings.particle_count();
        let field = ParticleField::new(&mut rng, width, height, particle_count);
        log::info!(
            "Engine created: {} particles on {}x{}, mode {}",
            particle_count,
            width,
            height,
            settings.initial_mode.id()
        );

        Ok(Self {
            field,
            mode: settings.initial_mode,
            pointer: PointerTracker::new(),
            obstacles: ObstacleTracker::new(),
            rng,
            particle_count,
            state: LoopState::Idle,
            frames: 0,
        })
    }

    pub fn start(&mut self) {
        match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                log::info!("Render loop started");
            }
            LoopState::Running => {}
            LoopState::Stopped => log::warn!("Render loop already stopped; not restarting"),
        }
    }

    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            log::info!("Render loop stopped after {} frames", self.frames);
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Run one simulate-then-draw step
    ///
    /// Returns None (and touches nothing) unless the loop is running.
    pub fn frame(&mut self, surface: &mut impl Surface) -> Option<FrameStats> {
        if !self.is_running() {
            return None;
        }
        let mode = self.mode;

        if mode.fades() {
            surface.fill_overlay(TEMPORAL_FADE);
        } else {
            surface.clear();
        }
        surface.set_composite(mode.composite());

        update_field(
            &mut self.field,
            mode,
            self.pointer.position(),
            self.obstacles.rects(),
        );
        let mesh_segments = draw_particles(surface, mode, self.field.particles(), &mut self.rng);

        surface.set_composite(Composite::SourceOver);
        self.frames += 1;

        Some(FrameStats {
            particles: self.field.len(),
            mesh_segments,
            scanning: self.field.scanning_count(),
        })
    }

    /// Reseed the field at the current size
    pub fn reinitialize(&mut self) {
        let bounds = self.field.bounds();
        self.field
            .initialize(&mut self.rng, bounds.x, bounds.y, self.particle_count);
    }

    /// Canvas resized: discard and reseed every particle
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field.on_resize(&mut self.rng, width, height);
        log::debug!("Field reseeded at {}x{}", width, height);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    pub fn refresh_obstacles(&mut self, rects: impl IntoIterator<Item = Rect>) {
        self.obstacles.refresh(rects);
    }

    /// Switch modes by id; takes effect on the next frame
    ///
    /// An unknown id leaves the current mode in place.
    pub fn set_active_mode(&mut self, id: &str) -> Result<Mode> {
        let mode = Mode::from_id(id)?;
        self.set_mode(mode);
        Ok(mode)
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            log::info!("Mode: {} -> {}", self.mode.id(), mode.id());
            self.mode = mode;
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_catalog(&self) -> Vec<ModeInfo> {
        mode_catalog()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn obstacles(&self) -> &[Rect] {
        self.obstacles.rects()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
