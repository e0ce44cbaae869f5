//! Injectable randomness for the simulation pipeline.
//!
//! Every stochastic decision made during a tick goes through a single
//! `&mut dyn SimRng`, so a seed (or a scripted sequence of rolls) fully
//! determines the outcome. `SimRng` is a `rand::RngCore`, so callers use
//! `SliceRandom::shuffle`/`choose` and `Rng::gen_range` on it directly.

use rand::rngs::mock::StepRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Weyl increment for the integer stream of the test generators. Odd, so
/// the low 32 bits walk every value before repeating.
const INTEGER_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

pub trait SimRng: RngCore {
    /// Uniform sample in `[0, 1)`.
    fn roll(&mut self) -> f64 {
        self.gen()
    }

    /// `roll() < probability`. Probabilities outside `[0, 1]` are allowed:
    /// at or below 0 never happens, above 1 always does.
    fn chance(&mut self, probability: f64) -> bool {
        self.roll() < probability
    }
}

/// ChaCha-backed generator used by the engine by default.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl SimRng for SeededRng {}

/// Always rolls the same value. `FixedRng::new(0.0)` makes every positive
/// probability succeed, `FixedRng::new(0.999)` makes nearly all of them
/// fail. Integer draws (shuffles, picks, ranges) step through a fixed
/// sequence starting from the roll's bit pattern.
#[derive(Clone, Debug)]
pub struct FixedRng {
    value: f64,
    bits: StepRng,
}

impl FixedRng {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            bits: StepRng::new(value.to_bits(), INTEGER_STEP),
        }
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.bits.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bits.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bits.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.bits.try_fill_bytes(dest)
    }
}

impl SimRng for FixedRng {
    fn roll(&mut self) -> f64 {
        self.value
    }
}

/// Replays a fixed list of rolls, wrapping around at the end. Integer
/// draws step from the first roll's bit pattern.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    rolls: Vec<f64>,
    cursor: usize,
    bits: StepRng,
}

impl ScriptedRng {
    pub fn new(rolls: Vec<f64>) -> Self {
        let start = rolls.first().map_or(0, |roll| roll.to_bits());
        Self {
            rolls,
            cursor: 0,
            bits: StepRng::new(start, INTEGER_STEP),
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        self.bits.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bits.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bits.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.bits.try_fill_bytes(dest)
    }
}

impl SimRng for ScriptedRng {
    fn roll(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value
    }
}
