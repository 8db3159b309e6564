// Copyright (C) 2020-2024 Andy Kurnia.

use super::{drawer, error, round};

fn default_root_dir() -> std::path::PathBuf {
    ".".into()
}

fn default_draw_size() -> usize {
    10
}

fn default_duration_ms() -> u64 {
    30_000
}

fn default_num_solutions() -> usize {
    5
}

fn default_vowels() -> String {
    drawer::VOWELS.into()
}

fn default_consonants() -> String {
    drawer::CONSONANTS.into()
}

// {"dictFile": "words.txt"} is enough, everything else has a default.
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RoundConfig {
    pub dict_file: std::path::PathBuf,
    #[serde(default = "default_root_dir")]
    pub root_dir: std::path::PathBuf,
    #[serde(default = "default_draw_size")]
    pub draw_size: usize,
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_num_solutions")]
    pub num_solutions: usize,
    #[serde(default = "default_vowels")]
    pub vowels: String,
    #[serde(default = "default_consonants")]
    pub consonants: String,
}

impl RoundConfig {
    pub fn new<P: Into<std::path::PathBuf>>(dict_file: P) -> Self {
        Self {
            dict_file: dict_file.into(),
            root_dir: default_root_dir(),
            draw_size: default_draw_size(),
            duration_ms: default_duration_ms(),
            num_solutions: default_num_solutions(),
            vowels: default_vowels(),
            consonants: default_consonants(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, error::MyError> {
        let config = serde_json::from_str::<Self>(s)
            .map_err(|e| error::new(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, error::MyError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| error::new(format!("cannot read config {}: {e}", path.display())))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<(), error::MyError> {
        if self.draw_size == 0 {
            return_error!("drawSize must be at least 1".into());
        }
        if self.vowels.is_empty() || self.consonants.is_empty() {
            return_error!("vowels and consonants must not be empty".into());
        }
        Ok(())
    }

    // dictFile is relative to rootDir, unless it is absolute.
    pub fn dict_path(&self) -> std::path::PathBuf {
        self.root_dir.join(&self.dict_file)
    }

    pub fn settings(&self) -> round::RoundSettings {
        round::RoundSettings {
            draw_size: self.draw_size,
            duration: std::time::Duration::from_millis(self.duration_ms),
            num_solutions: self.num_solutions,
        }
    }
}
