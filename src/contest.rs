// Copyright (C) 2020-2024 Andy Kurnia.

use super::{config, drawer, error, game, lexicon, round, timers};
use game::Game;
use rand::prelude::*;
use tokio::sync::{mpsc, oneshot, watch};

enum Command<U> {
    Start {
        output: game::Output,
        on_complete: game::OnComplete<U>,
        started: Option<oneshot::Sender<Result<(), error::RoundError>>>,
    },
    Message {
        word: String,
        user: U,
    },
    Stop,
}

type Readiness = Option<Result<usize, error::LoadError>>;

// Runs a RoundEngine on its own tokio task. The dictionary starts loading as
// soon as the contest is created; commands sent before it is done wait in
// the queue, so a round never starts without its dictionary. Timer expiry
// and commands go through the same loop, one at a time.
pub struct Contest<U> {
    commands: mpsc::UnboundedSender<Command<U>>,
    ready: watch::Receiver<Readiness>,
}

impl<U> Contest<U>
where
    U: Clone + std::fmt::Display + Send + 'static,
{
    // Must be called from within a tokio runtime.
    pub fn new(config: config::RoundConfig) -> Result<Self, error::MyError> {
        Self::with_rng(config, rand_chacha::ChaCha20Rng::from_os_rng())
    }

    pub fn with_rng<R: RngCore + Send + 'static>(
        config: config::RoundConfig,
        rng: R,
    ) -> Result<Self, error::MyError> {
        config.validate()?;
        let drawer = drawer::LetterDrawer::new(rng, &config.vowels, &config.consonants)?;
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (ready_tx, ready) = watch::channel(None);
        tokio::spawn(run(config, drawer, commands_rx, ready_tx));
        Ok(Self { commands, ready })
    }

    // Resolves once the dictionary is loaded, with its number of words.
    pub async fn ready(&self) -> Result<usize, error::LoadError> {
        let mut ready = self.ready.clone();
        let state = ready.wait_for(Option::is_some).await.ok().and_then(|state| state.clone());
        state.unwrap_or_else(|| {
            Err(error::LoadError::new(
                "",
                "dictionary loader stopped".into(),
            ))
        })
    }

    pub fn title(&self) -> &'static str {
        round::TITLE
    }

    pub fn rules(&self) -> &'static str {
        round::RULES
    }

    // These only queue the command. A failed send means the contest task
    // ended, which it only does after a load error.
    pub fn start(&self, output: game::Output, on_complete: game::OnComplete<U>) {
        let _ = self.commands.send(Command::Start {
            output,
            on_complete,
            started: None,
        });
    }

    // Like start, but waits for the round to begin or be refused. Waits for
    // the dictionary too if it is still loading.
    pub async fn try_start(
        &self,
        output: game::Output,
        on_complete: game::OnComplete<U>,
    ) -> Result<(), error::RoundError> {
        let (started, started_rx) = oneshot::channel();
        self.commands
            .send(Command::Start {
                output,
                on_complete,
                started: Some(started),
            })
            .map_err(|_| error::RoundError::Closed)?;
        started_rx.await.unwrap_or(Err(error::RoundError::Closed))
    }

    pub fn handle_message<S: Into<String>>(&self, word: S, user: U) {
        let _ = self.commands.send(Command::Message {
            word: word.into(),
            user,
        });
    }

    pub fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
    }
}

async fn run<U, R>(
    config: config::RoundConfig,
    drawer: drawer::LetterDrawer<R>,
    mut commands: mpsc::UnboundedReceiver<Command<U>>,
    ready: watch::Sender<Readiness>,
) where
    U: Clone + std::fmt::Display + Send + 'static,
    R: RngCore + Send + 'static,
{
    let path = config.dict_path();
    let loaded = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || lexicon::Lexicon::from_file(&path)).await
    };
    let lexicon = match loaded {
        Ok(Ok(lexicon)) => std::sync::Arc::new(lexicon),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "contest cannot start");
            let _ = ready.send(Some(Err(e)));
            return;
        }
        Err(e) => {
            let e = error::LoadError::new(path, format!("loader task failed: {e}"));
            tracing::error!(error = %e, "contest cannot start");
            let _ = ready.send(Some(Err(e)));
            return;
        }
    };
    let _ = ready.send(Some(Ok(lexicon.len())));

    let (fired, mut fired_rx) = mpsc::unbounded_channel();
    let mut engine = round::RoundEngine::new(
        lexicon,
        drawer,
        timers::TokioScheduler::new(fired),
        config.settings(),
    );
    loop {
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(Command::Start { output, on_complete, started }) => {
                    let result = engine.start(output, on_complete);
                    if let Some(started) = started {
                        let _ = started.send(result);
                    }
                }
                Some(Command::Message { word, user }) => engine.handle_message(&word, user),
                Some(Command::Stop) => engine.stop(),
                None => break,
            },
            Some(id) = fired_rx.recv() => {
                if engine.scheduler_mut().claim(id) {
                    engine.on_timer(id);
                }
            }
        }
    }
    engine.stop();
}
