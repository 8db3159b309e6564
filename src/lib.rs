// Copyright (C) 2020-2024 Andy Kurnia.

#[macro_use]
pub mod error;

pub mod alphabet;
pub mod build;
pub mod config;
pub mod contest;
pub mod drawer;
pub mod game;
pub mod kwg;
pub mod lexicon;
pub mod normalize;
pub mod round;
pub mod timers;
