// Copyright (C) 2020-2024 Andy Kurnia.

use super::{alphabet, build, error, kwg, normalize};

// Read-only after construction. Words are stored folded (see
// normalize::fold_word), so lookups fold their input the same way.
pub struct Lexicon {
    alphabet: alphabet::Alphabet,
    kwg: kwg::Kwg,
    num_words: usize,
}

impl Lexicon {
    // Blank lines are skipped. Duplicates, including words that only differ
    // by case or accents, collapse into one entry.
    pub fn build<I, S>(lines: I) -> Result<Lexicon, error::MyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folded_words = lines
            .into_iter()
            .map(|line| normalize::fold_word(line.as_ref()))
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>();
        let alphabet = alphabet::Alphabet::from_words(folded_words.iter().map(String::as_str))?;
        let mut machine_words = Vec::<Box<[u8]>>::with_capacity(folded_words.len());
        let mut v = Vec::new();
        for word in &folded_words {
            if !alphabet.set_word(word, &mut v) {
                return Err(error::new(format!("invalid letter in {word:?}")));
            }
            machine_words.push(v[..].into());
        }
        drop(folded_words);
        machine_words.sort_unstable();
        machine_words.dedup();
        let kwg = build::build_dawg(&machine_words)?;
        Ok(Lexicon {
            alphabet,
            kwg,
            num_words: machine_words.len(),
        })
    }

    // A line that is not valid UTF-8 is decoded lossily and the rest of the
    // list still loads. Only I/O errors fail the whole read.
    pub fn from_reader<R: std::io::BufRead>(mut reader: R) -> Result<Lexicon, error::MyError> {
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let num_read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| error::new(format!("cannot read word list: {e}")))?;
            if num_read == 0 {
                break;
            }
            let mut line = &buf[..];
            if let Some(rest) = line.strip_suffix(b"\n") {
                line = rest.strip_suffix(b"\r").unwrap_or(rest);
            }
            match String::from_utf8_lossy(line) {
                std::borrow::Cow::Borrowed(s) => lines.push(s.to_string()),
                std::borrow::Cow::Owned(s) => {
                    tracing::warn!(
                        line = lines.len() + 1,
                        word = %s,
                        "word list line is not valid UTF-8"
                    );
                    lines.push(s);
                }
            }
        }
        Lexicon::build(lines)
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Lexicon, error::LoadError> {
        let path = path.as_ref();
        let t0 = std::time::Instant::now();
        let f = std::fs::File::open(path)
            .map_err(|e| error::LoadError::new(path, format!("cannot open: {e}")))?;
        let lexicon = Lexicon::from_reader(std::io::BufReader::new(f))
            .map_err(|e| error::LoadError::new(path, e.to_string()))?;
        tracing::info!(
            path = %path.display(),
            words = lexicon.len(),
            nodes = lexicon.kwg.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "dictionary loaded"
        );
        Ok(lexicon)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.num_words
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }

    pub fn has_word(&self, query: &str) -> bool {
        let mut v = Vec::new();
        self.alphabet.set_word(&normalize::fold_word(query), &mut v) && self.kwg.accepts(&v)
    }

    // Every word that can be spelled with the given letters, each letter
    // usable as many times as it occurs. Not every letter has to be used.
    // Order follows the index, not length.
    pub fn sub_anagrams_of<I: IntoIterator<Item = char>>(
        &self,
        letters: I,
    ) -> impl Iterator<Item = String> + '_ {
        let tally = self.alphabet.tally(fold_letters(letters).chars());
        self.kwg
            .sub_anagrams(tally)
            .map(|tiles| self.alphabet.word_of(&tiles))
    }

    // Longest first. Equal lengths are in ascending order of the word so
    // the result does not depend on the index layout.
    pub fn longest_words_for(&self, letters: &[char], n: usize) -> Vec<String> {
        let mut found = self
            .sub_anagrams_of(letters.iter().copied())
            .map(|word| (normalize::letter_count(&word), word))
            .collect::<Vec<_>>();
        found.sort_unstable_by(|(len1, w1), (len2, w2)| len2.cmp(len1).then_with(|| w1.cmp(w2)));
        found.truncate(n);
        found.into_iter().map(|(_, word)| word).collect()
    }
}

fn fold_letters<I: IntoIterator<Item = char>>(letters: I) -> String {
    normalize::fold_word(&letters.into_iter().collect::<String>())
}

// Whether the word can be spelled with the given letters, compared after
// folding both sides.
pub fn fits_within(word: &str, letters: &[char]) -> bool {
    let mut remaining = rustc_hash::FxHashMap::<char, u32>::default();
    for c in fold_letters(letters.iter().copied()).chars() {
        *remaining.entry(c).or_insert(0) += 1;
    }
    normalize::fold_word(word)
        .chars()
        .all(|c| match remaining.get_mut(&c) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        })
}
