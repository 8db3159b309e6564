// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;
use rustc_hash::FxHashMap;

// Tile numbering follows char order. 0 is reserved and never a letter, so
// an alphabet holds at most 255 letters.
pub struct Alphabet {
    labels: Box<[char]>,
    tiles: FxHashMap<char, u8>,
}

impl Alphabet {
    pub fn from_words<'a, I: IntoIterator<Item = &'a str>>(
        words: I,
    ) -> Result<Alphabet, error::MyError> {
        let mut seen = std::collections::BTreeSet::new();
        for word in words {
            seen.extend(word.chars());
        }
        if seen.len() > 0xff {
            return_error!(format!(
                "too many distinct letters ({}), at most 255 are supported",
                seen.len()
            ));
        }
        let labels = std::iter::once('\0')
            .chain(seen)
            .collect::<Box<[char]>>();
        let tiles = labels
            .iter()
            .enumerate()
            .skip(1)
            .map(|(tile, &c)| (c, tile as u8))
            .collect();
        Ok(Alphabet { labels, tiles })
    }

    // includes the reserved tile 0.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.labels.len() <= 1
    }

    #[inline(always)]
    pub fn tile(&self, c: char) -> Option<u8> {
        self.tiles.get(&c).copied()
    }

    #[inline(always)]
    pub fn label(&self, tile: u8) -> Option<char> {
        if tile == 0 {
            None
        } else {
            self.labels.get(tile as usize).copied()
        }
    }

    // false if the word uses a letter outside the alphabet. v is clobbered.
    pub fn set_word(&self, word: &str, v: &mut Vec<u8>) -> bool {
        v.clear();
        v.reserve(word.len());
        for c in word.chars() {
            match self.tile(c) {
                Some(tile) => v.push(tile),
                None => return false,
            }
        }
        true
    }

    pub fn word_of(&self, tiles: &[u8]) -> String {
        tiles.iter().filter_map(|&tile| self.label(tile)).collect()
    }

    // Letters outside the alphabet cannot be used by any word, so they are
    // dropped instead of counted.
    pub fn tally<I: IntoIterator<Item = char>>(&self, letters: I) -> Box<[u32]> {
        let mut tally = vec![0u32; self.len()];
        for c in letters {
            if let Some(tile) = self.tile(c) {
                tally[tile as usize] += 1;
            }
        }
        tally.into_boxed_slice()
    }
}
