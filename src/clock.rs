//! Monotonic scene clock.

use std::time::Instant;

/// Elapsed-time source for the render loop.
///
/// Started when the scene is composed and sampled once per frame. There is
/// deliberately no reset surface: elapsed time never rewinds, so every
/// time-derived quantity (wave phase, orbit angle) stays monotonic for the
/// process lifetime.
#[derive(Debug, Clone)]
pub struct SceneClock {
    started: Instant,
    frame_index: u64,
}

impl SceneClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            frame_index: 0,
        }
    }

    /// Seconds since the clock started.
    pub fn elapsed_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advance the frame counter, returning the index of the frame about to
    /// be rendered.
    pub fn advance_frame(&mut self) -> u64 {
        let index = self.frame_index;
        self.frame_index = self.frame_index.wrapping_add(1);
        index
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_never_decreases() {
        let clock = SceneClock::new();
        let mut last = clock.elapsed_secs();
        for _ in 0..100 {
            let now = clock.elapsed_secs();
            assert!(now >= last);
            last = now;
        }
        assert!(last >= 0.0);
    }

    #[test]
    fn frame_counter_advances_by_one() {
        let mut clock = SceneClock::new();
        assert_eq!(clock.advance_frame(), 0);
        assert_eq!(clock.advance_frame(), 1);
        assert_eq!(clock.frame_index(), 2);
    }
}
