//! The torus garden round: staggered reveal, click collection and replay.
//!
//! All timing is driven by the elapsed seconds handed to [`Garden::tick`] from
//! the render loop. The completion deadline lives in [`RoundState`], so there
//! is no timer to cancel: dropping the garden drops the deadline with it.

use crate::animator;
use crate::constants::*;
use crate::music::ChordRequest;
use crate::shapes::{Shape, ShapeId, ShapeKind, ShapePool, ShapeState};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tunables for a garden instance.
///
/// - `pool_size`: number of shapes in the round
/// - `spawn_interval_sec`: elapsed time between reveals
/// - `completion_hold_sec`: how long the completion message stays up before replay
/// - `scale_blend`: per-frame exponential smoothing factor for scale
/// - `seed`: layout seed for the randomized ring parameters
#[derive(Clone, Debug)]
pub struct GardenParams {
    pub pool_size: usize,
    pub spawn_interval_sec: f32,
    pub completion_hold_sec: f32,
    pub scale_blend: f32,
    pub kind: ShapeKind,
    pub seed: u64,
}

impl Default for GardenParams {
    fn default() -> Self {
        Self {
            pool_size: POOL_SIZE,
            spawn_interval_sec: SPAWN_INTERVAL_SEC,
            completion_hold_sec: COMPLETION_HOLD_SEC,
            scale_blend: SCALE_BLEND,
            kind: ShapeKind::Torus,
            seed: 42,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RoundState {
    Collecting,
    /// Every shape collected at `since` (elapsed seconds).
    Complete { since: f32 },
}

/// Things the frame loop should react to after a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum GardenEvent {
    Revealed(ShapeId),
    RoundReset,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// The shape was collected; the caller should play `chord`.
    Collected {
        chord: ChordRequest,
        collected: usize,
        round_complete: bool,
    },
    /// The shape had already been clicked this round.
    AlreadyCollected,
    /// Unknown id or a shape that is not on screen.
    Ignored,
}

pub struct Garden {
    params: GardenParams,
    pool: ShapePool,
    collected: usize,
    round: RoundState,
    last_spawn: f32,
    clock: f32,
    transitioning: bool,
}

impl Garden {
    pub fn new(params: GardenParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let pool = ShapePool::generate(params.pool_size, params.kind, &mut rng);
        Self {
            params,
            pool,
            collected: 0,
            round: RoundState::Collecting,
            last_spawn: 0.0,
            clock: 0.0,
            transitioning: false,
        }
    }

    pub fn params(&self) -> &GardenParams {
        &self.params
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.pool.iter()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.pool.get(id)
    }

    #[inline]
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    #[inline]
    pub fn collected(&self) -> usize {
        self.collected
    }

    #[inline]
    pub fn round(&self) -> RoundState {
        self.round
    }

    #[inline]
    pub fn show_completion_message(&self) -> bool {
        matches!(self.round, RoundState::Complete { .. })
    }

    pub fn visible_count(&self) -> usize {
        self.pool.visible_count()
    }

    /// While the hero section is transitioning, reveal and animation pause.
    pub fn set_transitioning(&mut self, transitioning: bool) {
        self.transitioning = transitioning;
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Advance the garden to `elapsed` seconds since the scene mounted.
    pub fn tick(&mut self, elapsed: f32, events: &mut Vec<GardenEvent>) {
        if !elapsed.is_finite() {
            return;
        }
        self.clock = elapsed;

        if let RoundState::Complete { since } = self.round {
            if elapsed - since >= self.params.completion_hold_sec {
                self.reset_round(elapsed);
                events.push(GardenEvent::RoundReset);
            }
        }

        if self.transitioning {
            return;
        }

        if self.pool.revealed() < self.pool.len()
            && elapsed - self.last_spawn > self.params.spawn_interval_sec
        {
            if let Some(id) = self.pool.reveal_next() {
                log::debug!("[garden] revealed shape {}", id.0);
                events.push(GardenEvent::Revealed(id));
            }
            self.last_spawn = elapsed;
        }

        animator::step_pool(&mut self.pool, elapsed, self.params.scale_blend);
    }

    /// Handle a click on `id`. The returned chord is for the caller to play;
    /// the state change here never depends on whether that playback succeeds.
    pub fn click(&mut self, id: ShapeId) -> ClickOutcome {
        let Some(shape) = self.pool.get_mut(id) else {
            return ClickOutcome::Ignored;
        };
        match shape.state {
            ShapeState::Hidden => return ClickOutcome::Ignored,
            ShapeState::Clicked => return ClickOutcome::AlreadyCollected,
            ShapeState::Visible => {}
        }

        let chord = ChordRequest::triad(shape.scale_index);
        shape.state = ShapeState::Clicked;
        shape.target_scale = shape.base_scale * CLICKED_SCALE_FACTOR;
        self.collected += 1;

        let round_complete = self.collected >= self.pool.len();
        if round_complete && self.round == RoundState::Collecting {
            self.round = RoundState::Complete { since: self.clock };
            log::info!("[garden] round complete ({} shapes)", self.collected);
        }

        ClickOutcome::Collected {
            chord,
            collected: self.collected,
            round_complete,
        }
    }

    fn reset_round(&mut self, elapsed: f32) {
        self.pool.reset_all();
        self.collected = 0;
        self.round = RoundState::Collecting;
        self.last_spawn = elapsed;
        log::info!("[garden] round reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_spawns_before_first_interval() {
        let mut g = Garden::new(GardenParams::default());
        let mut ev = Vec::new();
        g.tick(1.0, &mut ev);
        assert_eq!(g.visible_count(), 0);
        g.tick(1.7, &mut ev);
        assert_eq!(g.visible_count(), 1);
        assert_eq!(ev, vec![GardenEvent::Revealed(ShapeId(0))]);
    }

    #[test]
    fn transitioning_pauses_reveal() {
        let mut g = Garden::new(GardenParams::default());
        let mut ev = Vec::new();
        g.set_transitioning(true);
        g.tick(10.0, &mut ev);
        assert_eq!(g.visible_count(), 0);
        g.set_transitioning(false);
        g.tick(10.1, &mut ev);
        assert_eq!(g.visible_count(), 1);
    }
}
