//! Confetti burst simulation
//!
//! Spawned on a winning spin. Screen coordinates: origin top-left, +y down.
//! The burst ends when every particle has expired or the duration budget runs
//! out, whichever comes first.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Festive palette (0xRRGGBB)
pub const PALETTE: [u32; 8] = [
    0xFF3B30, // Red
    0xFF9500, // Orange
    0xFFCC00, // Yellow
    0x34C759, // Green
    0x5AC8FA, // Sky
    0x007AFF, // Blue
    0xAF52DE, // Purple
    0xFF2D55, // Pink
];

/// Particle silhouette for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleShape {
    Square,
    Circle,
    Strip,
}

const SHAPES: [ParticleShape; 3] = [ParticleShape::Square, ParticleShape::Circle, ParticleShape::Strip];

/// Burst tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    pub particle_count: usize,
    /// Hard stop for the whole burst
    pub duration_ms: u32,
    /// Launch speed range (pixels/s)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Extra upward launch velocity (pixels/s)
    pub upward_bias: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity retained per 1/60 s
    pub drag: f32,
    /// Particle life range (seconds)
    pub min_life: f32,
    pub max_life: f32,
    /// Size range (pixels)
    pub min_size: f32,
    pub max_size: f32,
    /// Distance below the viewport before a particle is culled
    pub bottom_margin: f32,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            duration_ms: 3000,
            min_speed: 250.0,
            max_speed: 650.0,
            upward_bias: 250.0,
            gravity: 900.0,
            drag: 0.98,
            min_life: 1.0,
            max_life: 3.0,
            min_size: 6.0,
            max_size: 12.0,
            bottom_margin: 50.0,
        }
    }
}

/// A single confetti piece
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians
    pub rotation: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub size: f32,
    pub color: u32,
    /// 0-1, tracks remaining life
    pub opacity: f32,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub shape: ParticleShape,
}

impl Particle {
    /// Integrate one step. Returns false once the particle should be removed.
    fn update(&mut self, dt: f32, gravity: f32, drag: f32, floor: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += gravity * dt;
        self.vel *= drag;
        self.rotation += self.rotation_speed * dt;
        self.life -= dt;
        self.opacity = (self.life / self.max_life).clamp(0.0, 1.0);
        self.life > 0.0 && self.pos.y <= floor
    }
}

/// Lifecycle of a burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfettiPhase {
    Running,
    /// Finished on its own (empty or out of time)
    Finished,
    /// Torn down mid-flight
    Cancelled,
}

/// Viewport the burst is clipped against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// One running confetti burst
#[derive(Debug, Clone)]
pub struct ConfettiSim {
    config: ConfettiConfig,
    particles: Vec<Particle>,
    bounds: Bounds,
    elapsed: f32,
    phase: ConfettiPhase,
}

impl ConfettiSim {
    /// Spawn a burst from `origin`
    pub fn burst(config: ConfettiConfig, origin: Vec2, bounds: Bounds, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..config.particle_count)
            .map(|_| spawn_particle(&config, origin, &mut rng))
            .collect::<Vec<_>>();
        log::debug!("Confetti burst: {} particles", particles.len());

        let phase = if particles.is_empty() {
            ConfettiPhase::Finished
        } else {
            ConfettiPhase::Running
        };

        Self {
            config,
            particles,
            bounds,
            elapsed: 0.0,
            phase,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn phase(&self) -> ConfettiPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ConfettiPhase::Running
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Budget in seconds
    pub fn budget(&self) -> f32 {
        self.config.duration_ms as f32 / 1000.0
    }

    /// Viewport changed: new bounds apply to in-flight particles as they are
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Advance one step. Returns true on the step the burst finishes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.phase != ConfettiPhase::Running {
            return false;
        }

        self.elapsed += dt;
        if self.elapsed >= self.budget() {
            self.particles.clear();
            self.phase = ConfettiPhase::Finished;
            log::debug!("Confetti finished (budget spent)");
            return true;
        }

        // Drag is tuned per 60 Hz frame; rescale so any dt decays the same
        let drag = self.config.drag.powf(dt * 60.0);
        let gravity = self.config.gravity;
        let floor = self.bounds.height + self.config.bottom_margin;
        self.particles.retain_mut(|p| p.update(dt, gravity, drag, floor));

        if self.particles.is_empty() {
            self.phase = ConfettiPhase::Finished;
            log::debug!("Confetti finished (all particles gone)");
            return true;
        }
        false
    }

    /// Stop immediately; later ticks do nothing
    pub fn cancel(&mut self) {
        if self.phase == ConfettiPhase::Running {
            log::debug!("Confetti cancelled with {} particles", self.particles.len());
        }
        self.particles.clear();
        self.phase = ConfettiPhase::Cancelled;
    }
}

fn spawn_particle(config: &ConfettiConfig, origin: Vec2, rng: &mut Pcg32) -> Particle {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = sample(rng, config.min_speed, config.max_speed);
    let vel = Vec2::new(angle.cos(), angle.sin()) * speed - Vec2::new(0.0, config.upward_bias);
    let max_life = sample(rng, config.min_life, config.max_life);

    Particle {
        pos: origin,
        vel,
        rotation: rng.random_range(0.0..std::f32::consts::TAU),
        rotation_speed: rng.random_range(-10.0..=10.0),
        size: sample(rng, config.min_size, config.max_size),
        color: PALETTE[rng.random_range(0..PALETTE.len())],
        opacity: 1.0,
        life: max_life,
        max_life,
        shape: SHAPES[rng.random_range(0..SHAPES.len())],
    }
}

/// Uniform draw from a configured range, accepting the bounds in either order
fn sample(rng: &mut Pcg32, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo.is_finite() && hi.is_finite() {
        rng.random_range(lo..=hi)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn burst(seed: u64) -> ConfettiSim {
        let bounds = Bounds::new(800.0, 600.0);
        ConfettiSim::burst(ConfettiConfig::default(), bounds.center(), bounds, seed)
    }

    #[test]
    fn test_reversed_ranges_do_not_panic() {
        let config = ConfettiConfig {
            min_life: 3.0,
            max_life: 1.0,
            min_speed: 650.0,
            max_speed: 250.0,
            ..Default::default()
        };
        let bounds = Bounds::new(800.0, 600.0);
        let sim = ConfettiSim::burst(config, bounds.center(), bounds, 4);
        for p in sim.particles() {
            assert!((1.0..=3.0).contains(&p.max_life));
        }
    }

    #[test]
    fn test_burst_spawns_configured_count() {
        let sim = burst(1);
        assert_eq!(sim.particles().len(), 150);
        assert!(sim.is_running());
        for p in sim.particles() {
            assert!(p.max_life >= 1.0 && p.max_life <= 3.0);
            assert!(PALETTE.contains(&p.color));
            assert_eq!(p.opacity, 1.0);
        }
    }

    #[test]
    fn test_upward_bias() {
        let sim = burst(9);
        let mean_vy: f32 =
            sim.particles().iter().map(|p| p.vel.y).sum::<f32>() / sim.particles().len() as f32;
        assert!(mean_vy < 0.0);
    }

    #[test]
    fn test_physics_step() {
        let mut sim = burst(3);
        let before = sim.particles()[0].clone();
        sim.tick(SIM_DT);
        let after = &sim.particles()[0];
        assert!((after.pos - (before.pos + before.vel * SIM_DT)).length() < 1e-3);
        assert!(after.vel.y > before.vel.y * 0.98 - 1.0);
        assert!(after.life < before.life);
        assert!((after.opacity - after.life / after.max_life).abs() < 1e-6);
    }

    #[test]
    fn test_particles_fall_out_of_view() {
        let bounds = Bounds::new(400.0, 100.0);
        let mut sim = ConfettiSim::burst(
            ConfettiConfig {
                particle_count: 1,
                min_speed: 0.0,
                max_speed: 0.0,
                upward_bias: 0.0,
                min_life: 3.0,
                max_life: 3.0,
                duration_ms: 10_000,
                ..Default::default()
            },
            Vec2::new(200.0, 160.0),
            bounds,
            5,
        );
        assert!(sim.tick(SIM_DT), "spawned below bottom + margin");
        assert_eq!(sim.phase(), ConfettiPhase::Finished);
    }

    #[test]
    fn test_empty_burst_finishes_immediately() {
        let bounds = Bounds::new(100.0, 100.0);
        let sim = ConfettiSim::burst(
            ConfettiConfig {
                particle_count: 0,
                ..Default::default()
            },
            bounds.center(),
            bounds,
            0,
        );
        assert_eq!(sim.phase(), ConfettiPhase::Finished);
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut sim = burst(4);
        sim.tick(SIM_DT);
        let count = sim.particles().len();
        let first = sim.particles()[0].pos;
        sim.resize(Bounds::new(1920.0, 1080.0));
        assert_eq!(sim.particles().len(), count);
        assert_eq!(sim.particles()[0].pos, first);
        assert_eq!(sim.bounds(), Bounds::new(1920.0, 1080.0));
    }

    #[test]
    fn test_cancel_stops_ticking() {
        let mut sim = burst(2);
        sim.tick(SIM_DT);
        sim.cancel();
        assert_eq!(sim.phase(), ConfettiPhase::Cancelled);
        assert!(sim.particles().is_empty());
        assert!(!sim.tick(SIM_DT));
        assert_eq!(sim.phase(), ConfettiPhase::Cancelled);
    }

    proptest! {
        #[test]
        fn burst_ends_within_budget(seed in any::<u64>(), duration_ms in 100u32..4000) {
            let bounds = Bounds::new(1024.0, 768.0);
            let config = ConfettiConfig { duration_ms, ..Default::default() };
            let mut sim = ConfettiSim::burst(config, bounds.center(), bounds, seed);
            let budget = sim.budget();

            let mut finished_at = None;
            for step in 1..=((budget / SIM_DT) as usize + 3) {
                if sim.tick(SIM_DT) {
                    finished_at = Some(step as f32 * SIM_DT);
                    break;
                }
                for p in sim.particles() {
                    prop_assert!(p.life > 0.0);
                    prop_assert!(sim.elapsed() <= p.max_life.min(budget) + 1e-3);
                }
            }

            let finished_at = finished_at.expect("burst must finish");
            prop_assert!(finished_at <= budget + SIM_DT + 1e-3);
            prop_assert!(sim.particles().is_empty());
            prop_assert!(!sim.tick(SIM_DT));
        }
    }
}
