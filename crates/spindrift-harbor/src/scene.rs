//! Harbour scene: every shape the demo draws, plus the closed-form motion that
//! moves them.

use std::f32::consts::{PI, TAU};

use spindrift_engine::coords::{Transform, Vec2, Viewport};
use spindrift_engine::paint::PackedColor;
use spindrift_engine::render::{BatchError, BatchPass, DrawBackend};
use spindrift_engine::sdf::{
    Boat, GenericShape, SdfContainer, Shape, ShapeId, ShapeKind, ShapeParams,
};

pub const SEA: ShapeKind = ShapeKind(4);
pub const LINE: ShapeKind = ShapeKind(5);
pub const POINTER: ShapeKind = ShapeKind(6);
pub const SAIL: ShapeKind = ShapeKind(7);

const HULL: PackedColor = PackedColor(0xF5E9_9DFF);
const SEA_BLUE: PackedColor = PackedColor(0x2E7F_B2FF);
const FOAM: PackedColor = PackedColor(0xEAEA_EAFF);
const WAYPOINT_RADIUS: f32 = 32.0;
const WAKE_INTERVAL: f32 = 0.04;
const POINTER_HIDE_DISTANCE: f32 = 200.0;
const POINTER_FADE_RATE: f32 = 4.0;
const GUST_INTERVAL: f32 = 0.05;
// Seconds of wind travel a gust streak spans.
const GUST_STREAK: f32 = 0.12;

struct WakeParticle {
    id: ShapeId,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    life: f32,
    age: f32,
}

struct GustParticle {
    id: ShapeId,
    pos: Vec2,
    radius: f32,
    life: f32,
    age: f32,
}

pub struct Harbor {
    sea: SdfContainer,
    sea_id: ShapeId,

    wake: SdfContainer,
    particles: Vec<WakeParticle>,
    wake_timer: f32,
    spawned: u32,

    gusts: SdfContainer,
    gust_particles: Vec<GustParticle>,
    gust_timer: f32,
    gusts_spawned: u32,

    boat: SdfContainer,
    sail: SdfContainer,
    sail_id: ShapeId,

    waypoint: SdfContainer,
    waypoint_id: ShapeId,
    waypoint_index: usize,

    pointer: SdfContainer,
    pointer_id: ShapeId,
    pointer_alpha: f32,

    boat_pos: Vec2,
    heading: f32,
}

impl Harbor {
    pub fn new() -> Self {
        let mut sea = SdfContainer::new(0.0, 0.0);
        let sea_id = sea.add_shape(GenericShape::new(SEA, 400.0, 300.0, 800.0, 600.0, SEA_BLUE));

        let mut boat = SdfContainer::new(0.0, 0.0);
        boat.add_shape(Boat::new(0.0, 0.0, 64.0, 32.0, HULL));

        // Mast sits 16px forward of the hull center; the boom swings about it.
        let mut sail =
            SdfContainer::with_transform(Transform::at(16.0, 0.0).with_pivot(24.0, 0.0));
        sail.add_shape(
            GenericShape::new(LINE, 0.0, 0.0, 52.0, 16.0, PackedColor::BLACK)
                .with_params(ShapeParams::ab([-20.0, 0.0, 20.0, 0.0], [1.5, 0.0, 0.0, 0.0])),
        );
        let sail_id = sail.add_shape(GenericShape::new(SAIL, 0.0, 0.0, 52.0, 16.0, PackedColor::WHITE));

        let mut waypoint = SdfContainer::new(0.0, 0.0);
        let waypoint_id =
            waypoint.add_circle(0.0, 0.0, WAYPOINT_RADIUS, PackedColor::rgba(0xF2, 0x8C, 0x5A, 0xFF));

        let mut pointer = SdfContainer::new(0.0, 0.0);
        let pointer_id = pointer.add_shape(
            GenericShape::new(POINTER, 0.0, 0.0, 34.0, 34.0, PackedColor::WHITE)
                .with_params(ShapeParams::a([8.0, 0.0, -8.0, 0.0])),
        );

        let mut harbor = Self {
            sea,
            sea_id,
            wake: SdfContainer::new(0.0, 0.0),
            particles: Vec::new(),
            wake_timer: 0.0,
            spawned: 0,
            gusts: SdfContainer::new(0.0, 0.0),
            gust_particles: Vec::new(),
            gust_timer: 0.0,
            gusts_spawned: 0,
            boat,
            sail,
            sail_id,
            waypoint,
            waypoint_id,
            waypoint_index: 0,
            pointer,
            pointer_id,
            pointer_alpha: 1.0,
            boat_pos: Vec2::zero(),
            heading: 0.0,
        };
        harbor.set_sail_shape(0.0);
        harbor
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn gust_count(&self) -> usize {
        self.gust_particles.len()
    }

    /// Advances the scene by `dt` seconds; `t` is total elapsed time.
    pub fn update(&mut self, dt: f32, t: f32, viewport: Viewport) {
        let center = Vec2::new(viewport.width * 0.5, viewport.height * 0.5);
        let wind = Vec2::new((t * 0.05).cos(), (t * 0.05).sin()) * 60.0;

        self.update_sea(viewport, center, wind);
        self.update_boat(t, center, viewport, wind);
        self.update_wake(dt);
        self.update_gusts(dt, viewport, wind);
        self.update_waypoint(t, center, viewport);
        self.update_pointer(dt, viewport);
    }

    /// Submits every container in paint order.
    pub fn draw<'c, B: DrawBackend>(
        &'c mut self,
        pass: &mut BatchPass<'_, 'c, B>,
    ) -> Result<(), BatchError> {
        pass.render_container(&mut self.sea)?;
        pass.render_container(&mut self.wake)?;
        pass.render_container(&mut self.waypoint)?;
        pass.render_container(&mut self.boat)?;
        pass.render_container(&mut self.sail)?;
        pass.render_container(&mut self.gusts)?;
        pass.render_container(&mut self.pointer)?;
        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn update_sea(&mut self, viewport: Viewport, center: Vec2, wind: Vec2) {
        if let Some(Shape::Generic(sea)) = self.sea.shape_mut(self.sea_id) {
            sea.center = center;
            sea.size = Vec2::new(viewport.width, viewport.height);
            sea.params = ShapeParams::a([wind.x, wind.y, 0.0, 0.0]);
        }
    }

    fn update_boat(&mut self, t: f32, center: Vec2, viewport: Viewport, wind: Vec2) {
        let radii = Vec2::new(viewport.width * 0.35, viewport.height * 0.3);
        let theta = t * 0.25;
        self.boat_pos = center + Vec2::new(radii.x * theta.cos(), radii.y * theta.sin());
        self.heading = (radii.y * theta.cos()).atan2(-radii.x * theta.sin());

        self.boat.set_position(self.boat_pos.x, self.boat_pos.y);
        self.boat.set_rotation(self.heading);

        // Boom angle relative to the hull, trimmed to the apparent wind.
        let wind_angle = wind.y.atan2(wind.x);
        let sail_to_wind = wrap_angle(wind_angle - self.heading);
        self.sail.set_rotation(0.5 * sail_to_wind.clamp(-1.2, 1.2));
        self.sail.set_parent(self.boat.world_transform());
        self.set_sail_shape(sail_to_wind);
    }

    fn set_sail_shape(&mut self, sail_to_wind: f32) {
        let sign = if sail_to_wind == 0.0 { 1.0 } else { sail_to_wind.signum() };
        let mid = PI * (1.0 - sign * 0.5);
        let radius = 96.0 + 10.0 / sail_to_wind.abs().max(1e-4);
        let chord = 48.0_f32;
        let centre_y = sign * 0.5 * (4.0 * radius * radius - chord * chord).sqrt();
        let theta = (chord * 0.5 / radius).asin();

        if let Some(Shape::Generic(sail)) = self.sail.shape_mut(self.sail_id) {
            sail.params = ShapeParams::ab(
                [0.0, -centre_y, mid - theta, mid + theta],
                [radius, 3.0, 0.0, 0.0],
            );
        }
    }

    fn update_wake(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.age += dt;
            p.pos = p.pos + p.vel * dt;
        }

        let wake = &mut self.wake;
        self.particles.retain(|p| {
            if p.age >= p.life {
                wake.remove_shape(p.id);
                return false;
            }
            if let Some(Shape::Circle(c)) = wake.shape_mut(p.id) {
                c.center = p.pos;
                c.radius = p.radius * (1.0 - p.age / p.life).sqrt();
            }
            true
        });

        self.wake_timer += dt;
        while self.wake_timer >= WAKE_INTERVAL {
            self.wake_timer -= WAKE_INTERVAL;
            self.spawn_wake();
        }
    }

    fn spawn_wake(&mut self) {
        let n = self.spawned;
        self.spawned = self.spawned.wrapping_add(1);

        let stern = self.boat.world_transform().apply(Vec2::new(-30.0, 0.0));
        let back = Vec2::new(-self.heading.cos(), -self.heading.sin());
        let side = Vec2::new(-back.y, back.x) * if n % 2 == 0 { 1.0 } else { -1.0 };
        let jitter = 0.9 + 0.2 * hash01(n);

        let radius = 3.0 + 3.0 * hash01(n.wrapping_mul(7));
        let id = self.wake.add_circle(stern.x, stern.y, radius, FOAM);
        self.particles.push(WakeParticle {
            id,
            pos: stern,
            vel: (back * 12.0 + side * 10.0) * jitter,
            radius,
            life: 1.0 + 1.5 * hash01(n.wrapping_mul(13)),
            age: 0.0,
        });
    }

    fn update_gusts(&mut self, dt: f32, viewport: Viewport, wind: Vec2) {
        let streak = wind * GUST_STREAK;
        let gusts = &mut self.gusts;
        self.gust_particles.retain_mut(|p| {
            p.age += dt;
            if p.age >= p.life {
                gusts.remove_shape(p.id);
                return false;
            }
            p.pos = p.pos + wind * dt;
            if let Some(Shape::Generic(g)) = gusts.shape_mut(p.id) {
                *g = gust_shape(p.pos, p.radius, p.age / p.life, streak);
            }
            true
        });

        self.gust_timer += dt;
        while self.gust_timer >= GUST_INTERVAL {
            self.gust_timer -= GUST_INTERVAL;
            self.spawn_gust(viewport, streak);
        }
    }

    fn spawn_gust(&mut self, viewport: Viewport, streak: Vec2) {
        let n = self.gusts_spawned;
        self.gusts_spawned = self.gusts_spawned.wrapping_add(1);

        let pos = Vec2::new(
            viewport.width * hash01(n.wrapping_mul(31)),
            viewport.height * hash01(n.wrapping_mul(37)),
        );
        let radius = (0.25 + hash01(n.wrapping_mul(41))).sqrt();
        let id = self.gusts.add_shape(gust_shape(pos, radius, 0.0, streak));
        self.gust_particles.push(GustParticle {
            id,
            pos,
            radius,
            life: 1.0 + hash01(n.wrapping_mul(43)),
            age: 0.0,
        });
    }

    fn update_waypoint(&mut self, t: f32, center: Vec2, viewport: Viewport) {
        let spots = [
            Vec2::new(0.35, 0.0),
            Vec2::new(0.0, 0.3),
            Vec2::new(-0.35, 0.0),
            Vec2::new(0.0, -0.3),
        ];
        let spot = |i: usize| {
            let s = spots[i % spots.len()];
            center + Vec2::new(s.x * viewport.width, s.y * viewport.height)
        };

        if (spot(self.waypoint_index) - self.boat_pos).length() < WAYPOINT_RADIUS + 16.0 {
            self.waypoint_index = (self.waypoint_index + 1) % spots.len();
            log::debug!("waypoint reached, next #{}", self.waypoint_index);
        }

        let at = spot(self.waypoint_index);
        self.waypoint.set_position(at.x, at.y);
        if let Some(Shape::Circle(c)) = self.waypoint.shape_mut(self.waypoint_id) {
            c.radius = WAYPOINT_RADIUS + 4.0 * (t * TAU).sin();
        }
    }

    fn update_pointer(&mut self, dt: f32, viewport: Viewport) {
        let target = self.waypoint.transform().position;
        let to_target = target - self.boat_pos;
        let dist = to_target.length();

        let goal = if dist < POINTER_HIDE_DISTANCE { 0.0 } else { 1.0 };
        let step = POINTER_FADE_RATE * dt;
        self.pointer_alpha = if self.pointer_alpha < goal {
            (self.pointer_alpha + step).min(goal)
        } else {
            (self.pointer_alpha - step).max(goal)
        };

        let mid = self.boat_pos + to_target * 0.5;
        let x = mid.x.clamp(50.0, (viewport.width - 50.0).max(50.0));
        let y = mid.y.clamp(50.0, (viewport.height - 50.0).max(50.0));
        self.pointer.set_position(x, y);
        self.pointer.set_rotation(to_target.y.atan2(to_target.x));

        if let Some(shape) = self.pointer.shape_mut(self.pointer_id) {
            shape.set_color(PackedColor::WHITE.with_alpha(self.pointer_alpha));
        }
    }
}

impl Default for Harbor {
    fn default() -> Self {
        Self::new()
    }
}

/// A white streak along the wind centred on `pos`. `progress` is the gust's
/// age over its life; alpha rises and falls as `sin(π·progress)`.
fn gust_shape(pos: Vec2, radius: f32, progress: f32, streak: Vec2) -> GenericShape {
    let half = streak * 0.5;
    let alpha = (PI * progress).sin().max(0.0);
    let width = 2.0 * (half.x.abs() + radius) + 2.0;
    let height = 2.0 * (half.y.abs() + radius) + 2.0;
    let (from, to) = (pos - half, pos + half);
    GenericShape::new(LINE, pos.x, pos.y, width, height, PackedColor::WHITE.with_alpha(alpha))
        .with_params(ShapeParams::ab([from.x, from.y, to.x, to.y], [radius, 1.0, 0.0, 0.0]))
}

fn wrap_angle(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

/// Cheap deterministic value in `[0, 1)` for particle variation.
fn hash01(n: u32) -> f32 {
    let mut x = n.wrapping_mul(0x9E37_79B9) ^ 0x85EB_CA6B;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindrift_engine::render::{BatchConfig, BatchRenderer};

    #[derive(Default)]
    struct CountingBackend {
        uploads: Vec<(usize, usize)>,
        draws: Vec<u32>,
    }

    impl DrawBackend for CountingBackend {
        fn upload(&mut self, _slot: usize, attributes: &[u8], indices: &[u16]) {
            self.uploads.push((attributes.len(), indices.len()));
        }

        fn draw(&mut self, _slot: usize, index_count: u32) {
            self.draws.push(index_count);
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn run(harbor: &mut Harbor, frames: u32) {
        let dt = 1.0 / 60.0;
        for i in 0..frames {
            harbor.update(dt, i as f32 * dt, viewport());
        }
    }

    // ── scene ──

    #[test]
    fn whole_scene_draws_in_one_call() {
        let mut harbor = Harbor::new();
        run(&mut harbor, 120);

        let mut renderer = BatchRenderer::new(BatchConfig::default()).unwrap();
        let mut backend = CountingBackend::default();
        let stats = {
            let mut pass = renderer.begin(&mut backend);
            harbor.draw(&mut pass).unwrap();
            pass.finish()
        };

        // sea + wake + waypoint + boat + 2 sail shapes + gusts + pointer
        let quads = 6 + harbor.particle_count() + harbor.gust_count();
        assert_eq!(stats.flushes, 1);
        assert_eq!(stats.vertices, quads * 4);
        assert_eq!(backend.draws, vec![(quads * 6) as u32]);
        assert_eq!(backend.uploads, vec![(quads * 4 * 56, quads * 6)]);
    }

    #[test]
    fn wake_particles_expire() {
        let mut harbor = Harbor::new();
        run(&mut harbor, 600);
        // 25 spawns per second, at most 2.5s each.
        assert!(harbor.particle_count() <= 63);
        assert_eq!(harbor.wake.len(), harbor.particle_count());
    }

    #[test]
    fn gusts_fade_in_and_expire() {
        let mut harbor = Harbor::new();
        run(&mut harbor, 600);
        // 20 spawns per second, at most 2s each.
        assert!(harbor.gust_count() > 0);
        assert!(harbor.gust_count() <= 41);
        assert_eq!(harbor.gusts.len(), harbor.gust_count());

        let p = &harbor.gust_particles[harbor.gust_count() - 1];
        let fresh = harbor.gusts.shape(p.id).map(Shape::color).map(PackedColor::alpha);
        assert!(fresh.is_some_and(|a| a < 0x40), "{fresh:?}");
    }

    #[test]
    fn gust_streak_follows_wind() {
        let g = gust_shape(Vec2::new(100.0, 50.0), 1.0, 0.5, Vec2::new(20.0, 0.0));
        assert_eq!(g.kind, LINE);
        assert_eq!(g.params.params_a, [90.0, 50.0, 110.0, 50.0]);
        assert_eq!(g.params.params_b[0], 1.0);
        assert!(g.color.alpha() >= 0xFE);
    }

    #[test]
    fn sail_follows_boat() {
        let mut harbor = Harbor::new();
        run(&mut harbor, 30);
        let mast = harbor.sail.world_transform().apply(Vec2::new(24.0, 0.0));
        let expected = harbor.boat.world_transform().apply(Vec2::new(16.0, 0.0));
        assert!((mast - expected).length() < 1e-3);
    }

    #[test]
    fn pointer_fades_near_waypoint() {
        let mut harbor = Harbor::new();
        harbor.boat_pos = Vec2::new(400.0, 300.0);
        harbor.waypoint.set_position(420.0, 300.0);
        for _ in 0..30 {
            harbor.update_pointer(1.0 / 60.0, viewport());
        }
        assert_eq!(harbor.pointer_alpha, 0.0);
        let color = harbor.pointer.shape(harbor.pointer_id).map(Shape::color);
        assert_eq!(color.map(PackedColor::alpha), Some(0));
    }

    #[test]
    fn wrap_angle_stays_in_range() {
        for a in [-10.0, -PI, 0.0, 3.0, 7.0, 20.0] {
            let w = wrap_angle(a);
            assert!((-PI..PI).contains(&w), "{a} -> {w}");
        }
    }

    #[test]
    fn hash_is_unit_interval() {
        for n in 0..1000 {
            let h = hash01(n);
            assert!((0.0..1.0).contains(&h));
        }
    }
}
