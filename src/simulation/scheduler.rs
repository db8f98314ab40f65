//! Real-time pacing
//!
//! The scheduler turns wall-clock time into a whole number of ticks. It
//! owns no world state; a frame just calls `SimulationWorld::tick` the
//! number of times the accumulator allows.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{Result, SimError};
use crate::simulation::world::SimulationWorld;

/// Wall-clock length of one tick at normal speed
pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameSpeed {
    Stopped,
    #[default]
    Normal,
    Fast,
    Fastest,
}

impl GameSpeed {
    pub fn multiplier(&self) -> u32 {
        match self {
            GameSpeed::Stopped => 0,
            GameSpeed::Normal => 1,
            GameSpeed::Fast => 2,
            GameSpeed::Fastest => 3,
        }
    }

    pub fn from_multiplier(value: u32) -> Option<Self> {
        match value {
            0 => Some(GameSpeed::Stopped),
            1 => Some(GameSpeed::Normal),
            2 => Some(GameSpeed::Fast),
            3 => Some(GameSpeed::Fastest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub ticks_run: u32,
    pub ended: bool,
}

#[derive(Debug, Clone)]
pub struct TickScheduler {
    base_tick: Duration,
    speed: GameSpeed,
    paused: bool,
    accumulator: Duration,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICK)
    }
}

impl TickScheduler {
    pub fn new(base_tick: Duration) -> Self {
        Self {
            base_tick: base_tick.max(Duration::from_millis(1)),
            speed: GameSpeed::Normal,
            paused: false,
            accumulator: Duration::ZERO,
        }
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.speed = speed;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Time not yet converted into a tick
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Wall-clock time per tick at the current speed
    pub fn quantum(&self) -> Option<Duration> {
        match self.speed.multiplier() {
            0 => None,
            m => Some(self.base_tick / m),
        }
    }

    /// Feed elapsed time and return how many whole ticks are due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.paused {
            return 0;
        }
        let Some(quantum) = self.quantum() else {
            return 0;
        };
        self.accumulator += elapsed;
        let mut due = 0;
        while self.accumulator >= quantum {
            self.accumulator -= quantum;
            due += 1;
        }
        due
    }

    /// Run the ticks due for this frame. Stops early when the session ends.
    pub fn run_frame<R: Rng + ?Sized>(
        &mut self,
        world: &mut SimulationWorld,
        rng: &mut R,
        elapsed: Duration,
    ) -> Result<FrameReport> {
        let due = self.advance(elapsed);
        let mut frame = FrameReport::default();
        for _ in 0..due {
            match world.tick(rng) {
                Ok(_) => frame.ticks_run += 1,
                Err(SimError::SessionEnded) => {
                    frame.ended = true;
                    break;
                }
                Err(err) => return Err(err),
            }
            if world.is_game_over() {
                frame.ended = true;
                break;
            }
        }
        if frame.ended {
            self.accumulator = Duration::ZERO;
        }
        debug!(due, ran = frame.ticks_run, ended = frame.ended, "frame");
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_ticks() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        assert_eq!(scheduler.advance(Duration::from_millis(50)), 0);
        assert_eq!(scheduler.advance(Duration::from_millis(60)), 1);
        assert_eq!(scheduler.advance(Duration::from_millis(290)), 3);
        assert_eq!(scheduler.accumulated(), Duration::ZERO);
    }

    #[test]
    fn test_speed_divides_quantum() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(300));
        scheduler.set_speed(GameSpeed::Fastest);
        assert_eq!(scheduler.quantum(), Some(Duration::from_millis(100)));
        assert_eq!(scheduler.advance(Duration::from_millis(300)), 3);
    }

    #[test]
    fn test_paused_holds_accumulator() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        scheduler.advance(Duration::from_millis(90));
        scheduler.set_paused(true);
        assert_eq!(scheduler.advance(Duration::from_secs(10)), 0);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(90));
        scheduler.set_paused(false);
        assert_eq!(scheduler.advance(Duration::from_millis(20)), 1);
    }

    #[test]
    fn test_speed_zero_runs_nothing() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(100));
        scheduler.set_speed(GameSpeed::Stopped);
        assert_eq!(scheduler.quantum(), None);
        assert_eq!(scheduler.advance(Duration::from_secs(10)), 0);
        assert_eq!(scheduler.accumulated(), Duration::ZERO);
    }

    #[test]
    fn test_long_stall_catches_up() {
        let mut scheduler = TickScheduler::new(Duration::from_millis(10));
        assert_eq!(scheduler.advance(Duration::from_secs(60)), 6000);
    }

    #[test]
    fn test_speed_round_trips_through_multiplier() {
        for value in 0..4 {
            let speed = GameSpeed::from_multiplier(value).unwrap();
            assert_eq!(speed.multiplier(), value);
        }
        assert_eq!(GameSpeed::from_multiplier(4), None);
    }
}
