use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Randomness consumed by the simulation. Every draw the engine makes goes
/// through one of these methods, so a scripted source replays a tick exactly.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Six-sided die, `1..=6`.
    fn dice_roll(&mut self) -> u8;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "pick_index requires a non-empty range");
        let scaled = (self.uniform() * len as f64) as usize;
        scaled.min(len - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn dice_roll(&mut self) -> u8 {
        (**self).dice_roll()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

#[derive(Debug, Clone)]
pub struct SeededSource {
    inner: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededSource {
    fn uniform(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    fn dice_roll(&mut self) -> u8 {
        self.inner.random_range(1..=6)
    }

    fn pick_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "pick_index requires a non-empty range");
        self.inner.random_range(0..len)
    }
}

/// Replays queued draws, then falls back to fixed values once a queue runs dry.
///
/// The fallback uniform defaults to `0.99`: no special event fires at the
/// default chances and every roll goes up.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    uniforms: VecDeque<f64>,
    dice: VecDeque<u8>,
    fallback_uniform: f64,
    fallback_die: u8,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            uniforms: VecDeque::new(),
            dice: VecDeque::new(),
            fallback_uniform: 0.99,
            fallback_die: 1,
        }
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(uniform: f64, die: u8) -> Self {
        Self::new().with_fallback_uniform(uniform).with_fallback_die(die)
    }

    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    pub fn with_dice(mut self, values: impl IntoIterator<Item = u8>) -> Self {
        self.dice.extend(values);
        self
    }

    pub fn with_fallback_uniform(mut self, value: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&value),
            "fallback uniform must be within [0, 1)"
        );
        self.fallback_uniform = value;
        self
    }

    pub fn with_fallback_die(mut self, value: u8) -> Self {
        assert!((1..=6).contains(&value), "fallback die must be within 1..=6");
        self.fallback_die = value;
        self
    }

    pub fn remaining_uniforms(&self) -> usize {
        self.uniforms.len()
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        self.uniforms.pop_front().unwrap_or(self.fallback_uniform)
    }

    fn dice_roll(&mut self) -> u8 {
        self.dice.pop_front().unwrap_or(self.fallback_die)
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomSource, ScriptedSource, SeededSource};

    #[test]
    fn seeded_sources_are_deterministic() {
        let mut left = SeededSource::new(42);
        let mut right = SeededSource::new(42);

        let draws_left: Vec<(f64, u8, usize)> = (0..10)
            .map(|_| (left.uniform(), left.dice_roll(), left.pick_index(6)))
            .collect();
        let draws_right: Vec<(f64, u8, usize)> = (0..10)
            .map(|_| (right.uniform(), right.dice_roll(), right.pick_index(6)))
            .collect();

        assert_eq!(draws_left, draws_right);
    }

    #[test]
    fn seeded_draws_stay_within_bounds() {
        let mut source = SeededSource::new(7);

        for _ in 0..1_000 {
            let uniform = source.uniform();
            assert!((0.0..1.0).contains(&uniform));
            assert!((1..=6).contains(&source.dice_roll()));
            assert!(source.pick_index(3) < 3);
        }
    }

    #[test]
    fn scripted_source_replays_queue_then_falls_back() {
        let mut source = ScriptedSource::constant(0.25, 4)
            .with_uniforms([0.1, 0.9])
            .with_dice([6]);

        assert_eq!(source.uniform(), 0.1);
        assert_eq!(source.uniform(), 0.9);
        assert_eq!(source.uniform(), 0.25);
        assert_eq!(source.dice_roll(), 6);
        assert_eq!(source.dice_roll(), 4);
    }

    #[test]
    fn default_pick_index_maps_uniform_onto_range() {
        let mut source = ScriptedSource::new().with_uniforms([0.0, 0.5, 0.999_999]);

        assert_eq!(source.pick_index(6), 0);
        assert_eq!(source.pick_index(6), 3);
        assert_eq!(source.pick_index(6), 5);
    }

    #[test]
    #[should_panic(expected = "fallback die must be within 1..=6")]
    fn scripted_source_rejects_impossible_die() {
        let _ = ScriptedSource::new().with_fallback_die(7);
    }
}
