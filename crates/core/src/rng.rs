//! RNG module - piece randomizer
//!
//! Two draw policies:
//! - **Bag**: the "7-bag" algorithm. Each bag holds one of each piece kind,
//!   shuffled, and is drawn until empty before being refilled. No kind can be
//!   absent for more than 12 draws in a row.
//! - **Uniform**: every draw is an independent uniform pick.
//!
//! Also provides a simple LCG so a seed reproduces a whole game.

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
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 16) % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// How the randomizer picks the next kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomizerPolicy {
    /// Shuffled permutation of all seven kinds, refilled when empty
    #[default]
    Bag,
    /// Independent uniform choice
    Uniform,
}

/// Piece kind generator
#[derive(Debug, Clone)]
pub struct Randomizer {
    policy: RandomizerPolicy,
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    rng: SimpleRng,
}

impl Randomizer {
    pub fn new(policy: RandomizerPolicy, seed: u32) -> Self {
        Self {
            policy,
            bag: PieceKind::ALL,
            // Empty, so the first draw shuffles a fresh bag.
            bag_index: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
        }
    }

    pub fn policy(&self) -> RandomizerPolicy {
        self.policy
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece kind
    pub fn draw(&mut self) -> PieceKind {
        match self.policy {
            RandomizerPolicy::Uniform => {
                let idx = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[idx]
            }
            RandomizerPolicy::Bag => {
                if self.bag_index >= self.bag.len() {
                    self.refill_bag();
                }
                let piece = self.bag[self.bag_index];
                self.bag_index += 1;
                piece
            }
        }
    }

    /// Pieces left in the current bag (always empty in uniform mode)
    pub fn remaining(&self) -> &[PieceKind] {
        match self.policy {
            RandomizerPolicy::Bag => &self.bag[self.bag_index.min(self.bag.len())..],
            RandomizerPolicy::Uniform => &[],
        }
    }
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new(RandomizerPolicy::Bag, 1)
    }
}
