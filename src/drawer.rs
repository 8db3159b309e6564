// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;
use rand::prelude::*;

pub const VOWELS: &str = "AEIOUY";
pub const CONSONANTS: &str = "BCDFGHJKLMNPQRSTVWXZ";

// The letters of one round, in the order they are shown.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Draw(pub Box<[char]>);

impl Draw {
    #[inline(always)]
    pub fn letters(&self) -> &[char] {
        &self.0
    }
}

impl std::fmt::Display for Draw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl From<&str> for Draw {
    fn from(s: &str) -> Draw {
        Draw(s.chars().collect())
    }
}

pub trait Drawer {
    fn pick_letters(&mut self, n: usize) -> Draw;
}

// ceil(n/3) vowels, the rest consonants, each picked with replacement, then
// shuffled together. Both sets must be non-empty, LetterDrawer::new checks.
fn pick_letters(
    mut rng: &mut dyn RngCore,
    vowels: &[char],
    consonants: &[char],
    n: usize,
) -> Draw {
    debug_assert!(!vowels.is_empty() && !consonants.is_empty());
    let num_vowels = n.div_ceil(3);
    let mut letters = Vec::with_capacity(n);
    for (set, count) in [(vowels, num_vowels), (consonants, n - num_vowels)] {
        for _ in 0..count {
            letters.push(set[rng.random_range(0..set.len())]);
        }
    }
    letters.shuffle(&mut rng);
    Draw(letters.into_boxed_slice())
}

pub struct LetterDrawer<R> {
    rng: R,
    vowels: Box<[char]>,
    consonants: Box<[char]>,
}

impl<R: RngCore> LetterDrawer<R> {
    pub fn new(rng: R, vowels: &str, consonants: &str) -> Result<Self, error::MyError> {
        if vowels.is_empty() || consonants.is_empty() {
            return Err(error::new(format!(
                "vowels {vowels:?} and consonants {consonants:?} must both be non-empty"
            )));
        }
        Ok(Self {
            rng,
            vowels: vowels.chars().collect(),
            consonants: consonants.chars().collect(),
        })
    }

    pub fn with_default_letters(rng: R) -> Self {
        Self {
            rng,
            vowels: VOWELS.chars().collect(),
            consonants: CONSONANTS.chars().collect(),
        }
    }
}

impl<R: RngCore> Drawer for LetterDrawer<R> {
    fn pick_letters(&mut self, n: usize) -> Draw {
        pick_letters(&mut self.rng, &self.vowels, &self.consonants, n)
    }
}
