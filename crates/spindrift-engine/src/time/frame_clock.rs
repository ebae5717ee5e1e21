use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Sum of all clamped deltas, in seconds. Stalls advance it by at most
    /// `dt_max`, so animations resume where they left off.
    pub elapsed: f64,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Elapsed seconds as uploaded to shaders.
    #[inline]
    pub fn elapsed_f32(&self) -> f32 {
        self.elapsed as f32
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// produce one huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f64,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline without touching `elapsed`.
    ///
    /// Call after resuming from suspension.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.elapsed += dt.as_secs_f64();

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> (FrameClock, Instant) {
        let c = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let start = c.last;
        (c, start)
    }

    #[test]
    fn elapsed_accumulates_deltas() {
        let (mut c, t0) = clock();
        let a = c.tick_at(t0 + Duration::from_millis(16));
        let b = c.tick_at(t0 + Duration::from_millis(32));
        assert!((a.elapsed - 0.016).abs() < 1e-9);
        assert!((b.elapsed - 0.032).abs() < 1e-9);
        assert_eq!((a.frame_index, b.frame_index), (0, 1));
    }

    #[test]
    fn stall_is_clamped() {
        let (mut c, t0) = clock();
        let ft = c.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
        assert!((c.elapsed() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn zero_delta_uses_minimum() {
        let (mut c, t0) = clock();
        let ft = c.tick_at(t0);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn reset_keeps_elapsed() {
        let (mut c, t0) = clock();
        c.tick_at(t0 + Duration::from_millis(50));
        c.reset();
        assert!((c.elapsed() - 0.05).abs() < 1e-9);
    }
}
