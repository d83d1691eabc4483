//! RNG module - uniform random piece generation
//!
//! Pieces are drawn independently and uniformly from the active catalog
//! (7 base kinds, or 9 with the extended triominoes). There is no bag and no
//! fairness guarantee; two identical pieces in a row are normal.
//!
//! A seeded LCG keeps sessions reproducible for tests and benches.

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Multiply-shift keeps the high bits; the low bits of an LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

/// Uniform piece generator over the base or extended catalog
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    extended: bool,
}

impl PieceGenerator {
    pub fn new(seed: u32, extended: bool) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            extended,
        }
    }

    /// Kinds the generator can currently produce
    pub fn catalog(&self) -> &'static [PieceKind] {
        if self.extended {
            &PieceKind::ALL
        } else {
            &PieceKind::BASE
        }
    }

    pub fn extended(&self) -> bool {
        self.extended
    }

    pub fn set_extended(&mut self, extended: bool) {
        self.extended = extended;
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        let catalog = self.catalog();
        let idx = self.rng.next_range(catalog.len() as u32) as usize;
        catalog[idx]
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1, false)
    }
}
