// Copyright (C) 2020-2024 Andy Kurnia.

use super::round;

pub struct MyError {
    s: String,
}

impl std::fmt::Display for MyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.s)
    }
}

impl std::fmt::Debug for MyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self as &dyn std::fmt::Display).fmt(f)
    }
}

impl std::error::Error for MyError {}

pub fn new(s: String) -> MyError {
    MyError { s }
}

pub type BoxAnyError = Box<dyn std::error::Error>;
pub type Returns<T> = Result<T, BoxAnyError>;

#[macro_export]
macro_rules! return_error {
    ($error:expr) => {
        return Err($crate::error::new($error).into());
    };
}

// The dictionary could not be turned into an index. Cloneable so that every
// task waiting on readiness gets its own copy.
#[derive(Clone)]
pub struct LoadError {
    path: std::path::PathBuf,
    reason: String,
}

impl LoadError {
    pub fn new<P: Into<std::path::PathBuf>>(path: P, reason: String) -> LoadError {
        LoadError {
            path: path.into(),
            reason,
        }
    }

    #[inline(always)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    #[inline(always)]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot load dictionary {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::fmt::Debug for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self as &dyn std::fmt::Display).fmt(f)
    }
}

impl std::error::Error for LoadError {}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
    NotIdle(round::Phase),
    // the task hosting the round has ended.
    Closed,
}

impl std::fmt::Display for RoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundError::NotIdle(phase) => {
                write!(f, "cannot start a round while {phase:?}")
            }
            RoundError::Closed => f.write_str("the contest is not running"),
        }
    }
}

impl std::fmt::Debug for RoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self as &dyn std::fmt::Display).fmt(f)
    }
}

impl std::error::Error for RoundError {}
