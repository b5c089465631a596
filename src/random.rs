//! Random source for critical-hit rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws in `[0, 1)`. Injected into the reducer so tests can script
/// critical hits.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

#[derive(Debug)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of critical outcomes, then repeats the last one.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    crits: Vec<bool>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedRolls {
    pub fn new(crits: Vec<bool>) -> Self {
        Self { crits, pos: 0 }
    }

    pub fn always(crit: bool) -> Self {
        Self::new(vec![crit])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRolls {
    fn next_unit(&mut self) -> f64 {
        let crit = match self.crits.get(self.pos) {
            Some(c) => *c,
            None => self.crits.last().copied().unwrap_or(false),
        };
        self.pos += 1;
        // 0.0 is under any positive chance, 0.999.. is over any chance below 1
        if crit { 0.0 } else { 0.999_999 }
    }
}
