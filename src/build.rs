// Copyright (C) 2020-2024 Andy Kurnia.

use super::{error, kwg};
use rustc_hash::FxHashMap;

// An arc whose target list is still open.
struct OpenArc {
    tile: u8,
    accepts: bool,
    target: u32, // into states, set when the list below it closes.
}

struct OpenPath<'a> {
    arcs: &'a mut Vec<OpenArc>,
    list_starts: &'a mut Vec<usize>,
}

impl OpenPath<'_> {
    fn push(&mut self, tile: u8) {
        self.arcs.push(OpenArc {
            tile,
            accepts: false,
            target: 0,
        });
        self.list_starts.push(self.arcs.len());
    }

    // closes the deepest list and points its parent arc at the interned copy.
    fn pop(&mut self, interner: &mut StateInterner) {
        let Some(start) = self.list_starts.pop() else {
            return;
        };
        let target = interner.intern(&self.arcs[start..]);
        self.arcs[start - 1].target = target;
        self.arcs.truncate(start);
    }

    #[inline(always)]
    fn depth(&self) -> usize {
        self.list_starts.len()
    }
}

// One sibling-list cell, deduplicated by value. Equal suffixes of sibling
// lists share cells, which is what makes the graph minimal.
#[derive(Clone, Eq, Hash, PartialEq)]
struct State {
    tile: u8,
    accepts: bool,
    arc_index: u32,  // first state of the child list, 0 if none.
    next_index: u32, // next sibling, 0 if last.
}

struct StateInterner<'a> {
    states: &'a mut Vec<State>,
    known: &'a mut FxHashMap<State, u32>,
}

impl StateInterner<'_> {
    fn intern(&mut self, arcs: &[OpenArc]) -> u32 {
        let mut ret = 0;
        for arc in arcs.iter().rev() {
            let state = State {
                tile: arc.tile,
                accepts: arc.accepts,
                arc_index: arc.target,
                next_index: ret,
            };
            ret = match self.known.get(&state) {
                Some(&idx) => idx,
                None => {
                    let idx = self.states.len() as u32;
                    self.states.push(state.clone());
                    self.known.insert(state, idx);
                    idx
                }
            };
        }
        ret
    }

    // words must be sorted, deduplicated, and non-empty.
    fn make_dawg(&mut self, sorted_words: &[Box<[u8]>]) -> u32 {
        let mut open_path = OpenPath {
            arcs: &mut Vec::new(),
            list_starts: &mut Vec::new(),
        };
        let mut prev_word: &[u8] = &[];
        for this_word in sorted_words {
            let common = prev_word
                .iter()
                .zip(this_word.iter())
                .take_while(|(a, b)| a == b)
                .count();
            while open_path.depth() > common {
                open_path.pop(self);
            }
            for &tile in &this_word[common..] {
                open_path.push(tile);
            }
            if let Some(last) = open_path.arcs.last_mut() {
                last.accepts = true;
            }
            prev_word = &this_word[..];
        }
        while open_path.depth() > 0 {
            open_path.pop(self);
        }
        self.intern(&open_path.arcs[..])
    }
}

// Lays linked sibling lists out contiguously. A list that is the tail of
// another list is written as part of that longer list.
struct StatesDefragger<'a> {
    states: &'a [State],
    prev_indexes: &'a [u32],
    destination: &'a mut Vec<u32>,
    num_written: u32,
}

impl StatesDefragger<'_> {
    fn defrag(&mut self, mut p: u32) {
        while self.prev_indexes[p as usize] != 0 {
            p = self.prev_indexes[p as usize];
        }
        if self.destination[p as usize] != 0 {
            return;
        }
        // placeholder so a list reachable from itself is not entered twice.
        self.destination[p as usize] = !0;
        let head = p;
        let mut num = 0u32;
        loop {
            num += 1;
            let a = self.states[p as usize].arc_index;
            if a != 0 {
                self.defrag(a);
            }
            p = self.states[p as usize].next_index;
            if p == 0 {
                break;
            }
        }
        let mut write_p = head;
        for ofs in 0..num {
            self.destination[write_p as usize] = self.num_written + ofs;
            write_p = self.states[write_p as usize].next_index;
        }
        self.num_written += num;
    }

    fn to_nodes(&self, dawg_start_state: u32) -> Box<[kwg::Node]> {
        let mut ret = vec![kwg::Node::new(0, true, false, 0); self.num_written as usize];
        ret[0] = kwg::Node::new(self.destination[dawg_start_state as usize], true, false, 0);
        for head in 1..self.states.len() {
            if self.prev_indexes[head] != 0 {
                continue;
            }
            let mut dp = self.destination[head] as usize;
            if dp == 0 {
                continue;
            }
            let mut p = head;
            loop {
                let state = &self.states[p];
                ret[dp] = kwg::Node::new(
                    self.destination[state.arc_index as usize],
                    state.next_index == 0,
                    state.accepts,
                    state.tile,
                );
                if state.next_index == 0 {
                    break;
                }
                p = state.next_index as usize;
                dp += 1;
            }
        }
        ret.into_boxed_slice()
    }
}

fn gen_prev_indexes(states: &[State]) -> Vec<u32> {
    let mut prev_indexes = vec![0u32; states.len()];
    for p in (1..states.len()).rev() {
        prev_indexes[states[p].next_index as usize] = p as u32;
    }
    // [0] is written by every last sibling and means nothing.
    prev_indexes
}

// Builds the minimal word graph. Input must be sorted and deduplicated.
pub fn build_dawg(sorted_words: &[Box<[u8]>]) -> Result<kwg::Kwg, error::MyError> {
    // state 0 is the sink: no tile, no children, no sibling.
    let mut states = vec![State {
        tile: 0,
        accepts: false,
        arc_index: 0,
        next_index: 0,
    }];
    let mut known = FxHashMap::default();
    known.insert(states[0].clone(), 0);

    let dawg_start_state = StateInterner {
        states: &mut states,
        known: &mut known,
    }
    .make_dawg(sorted_words);
    drop(known);

    let mut defragger = StatesDefragger {
        states: &states,
        prev_indexes: &gen_prev_indexes(&states),
        destination: &mut vec![0u32; states.len()],
        num_written: 1, // [0] is the root.
    };
    defragger.destination[0] = !0; // keeps defrag(0) a no-op for an empty lexicon.
    defragger.defrag(dawg_start_state);
    defragger.destination[0] = 0;

    if defragger.num_written as usize > kwg::MAX_NODES {
        return Err(error::new(format!(
            "this format cannot have {} nodes",
            defragger.num_written
        )));
    }

    Ok(kwg::Kwg(defragger.to_nodes(dawg_start_state)))
}
