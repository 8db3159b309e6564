// Copyright (C) 2020-2024 Andy Kurnia.

// bits 0-21 = arc index (first child), bit 22 = last sibling,
// bit 23 = accepts (a word ends here), bits 24-31 = tile.
#[derive(Clone, Copy)]
pub struct Node(u32);

pub const MAX_NODES: usize = 0x400000;

impl Node {
    #[inline(always)]
    pub fn new(arc_index: u32, is_end: bool, accepts: bool, tile: u8) -> Node {
        Node(
            (arc_index & 0x3fffff)
                | if is_end { 0x400000 } else { 0 }
                | if accepts { 0x800000 } else { 0 }
                | (tile as u32) << 24,
        )
    }

    #[inline(always)]
    pub fn tile(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline(always)]
    pub fn accepts(&self) -> bool {
        self.0 & 0x800000 != 0
    }

    #[inline(always)]
    pub fn is_end(&self) -> bool {
        self.0 & 0x400000 != 0
    }

    #[inline(always)]
    pub fn arc_index(&self) -> i32 {
        (self.0 & 0x3fffff) as i32
    }
}

// [0] is the root; its arc index is the first top-level sibling list.
// Siblings are contiguous and sorted by tile, the last one has is_end.
pub struct Kwg(pub Box<[Node]>);

impl std::ops::Index<i32> for Kwg {
    type Output = Node;

    #[inline(always)]
    fn index(&self, i: i32) -> &Node {
        &self.0[i as usize]
    }
}

impl Kwg {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self[0].arc_index() == 0
    }

    // child of p labelled tile, or -1.
    #[inline(always)]
    pub fn seek(&self, p: i32, tile: u8) -> i32 {
        if p < 0 {
            return -1;
        }
        let mut p = self[p].arc_index();
        if p == 0 {
            return -1;
        }
        loop {
            let node = self[p];
            if node.tile() == tile {
                return p;
            }
            if node.tile() > tile || node.is_end() {
                return -1;
            }
            p += 1;
        }
    }

    pub fn accepts(&self, word: &[u8]) -> bool {
        if word.is_empty() {
            return false;
        }
        let mut p = 0;
        for &tile in word {
            p = self.seek(p, tile);
            if p <= 0 {
                return false;
            }
        }
        self[p].accepts()
    }

    // Every word whose tiles fit within tally. tally is indexed by tile and
    // is consumed by the iterator.
    pub fn sub_anagrams(&self, tally: Box<[u32]>) -> SubAnagrams<'_> {
        let first = self[0].arc_index();
        SubAnagrams {
            kwg: self,
            tally,
            cursors: vec![if first == 0 { -1 } else { first }],
            word: Vec::new(),
        }
    }
}

// Depth-first, one sibling cursor per depth. A cursor of -1 means that
// sibling list is exhausted. word holds the tiles of the nodes entered so
// far, so word.len() + 1 == cursors.len() between calls.
pub struct SubAnagrams<'a> {
    kwg: &'a Kwg,
    tally: Box<[u32]>,
    cursors: Vec<i32>,
    word: Vec<u8>,
}

impl SubAnagrams<'_> {
    #[inline(always)]
    fn next_sibling(&mut self) {
        if let Some(p) = self.cursors.last_mut() {
            *p = if self.kwg[*p].is_end() { -1 } else { *p + 1 };
        }
    }
}

impl Iterator for SubAnagrams<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        while let Some(&p) = self.cursors.last() {
            if p < 0 {
                // backtrack: give the letter back and move past it.
                self.cursors.pop();
                if let Some(tile) = self.word.pop() {
                    self.tally[tile as usize] += 1;
                    self.next_sibling();
                }
                continue;
            }
            let node = self.kwg[p];
            let tile = node.tile();
            match self.tally.get_mut(tile as usize) {
                Some(remaining) if *remaining > 0 => {
                    *remaining -= 1;
                }
                _ => {
                    self.next_sibling();
                    continue;
                }
            }
            self.word.push(tile);
            let child = node.arc_index();
            self.cursors.push(if child == 0 { -1 } else { child });
            if node.accepts() {
                return Some(self.word.clone());
            }
        }
        None
    }
}
