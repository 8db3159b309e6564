// Copyright (C) 2020-2024 Andy Kurnia.

use super::error;

// Receives every line the game wants shown, in order.
pub type Output = Box<dyn FnMut(&str) + Send>;

// Called once when a round resolves, with the winner if there is one.
pub type OnComplete<U> = Box<dyn FnOnce(Option<U>) + Send>;

// What a host needs to run a game: start a round, feed it chat messages,
// and abort it. U identifies whoever sent a message.
pub trait Game<U> {
    fn title(&self) -> &'static str;

    fn rules(&self) -> &'static str;

    fn start(&mut self, output: Output, on_complete: OnComplete<U>) -> Result<(), error::RoundError>;

    // Ignored unless a round is in progress.
    fn handle_message(&mut self, word: &str, user: U);

    // Safe to call at any time, any number of times.
    fn stop(&mut self);
}
