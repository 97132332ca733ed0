//! Runs engine work off the caller's thread.
//!
//! Every request carries a token from a strictly increasing counter. Issuing
//! a new request makes all older ones stale: their replies are discarded as
//! [`Outcome::Superseded`]. A watchdog deadline bounds how long a caller
//! waits; past it the precomputed fallback (a random legal move, or no hints)
//! is returned instead. The search itself is not interrupted, only ignored.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cozy_chess::Color;
use log::{error, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{ChessMove, ChessRules, Position};
use crate::config::EngineConfig;
use crate::difficulty::Difficulty;
use crate::engine::{random_legal_move, Engine};
use crate::error::Result;
use crate::hints::Suggestion;
use crate::openings::OpeningBook;

/// Message sent back by a worker.
struct Reply<T> {
    token: u64,
    payload: T,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    /// The watchdog fired (or the worker died) and the fallback was used.
    TimedOut(T),
    /// A newer request was issued; this result must not be applied.
    Superseded,
}

impl<T> Outcome<T> {
    /// The usable value, if the request is still current.
    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Completed(v) | Outcome::TimedOut(v) => Some(v),
            Outcome::Superseded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostPoll<T> {
    Pending,
    Ready(Outcome<T>),
}

/// Handle to an in-flight request.
pub struct Pending<T> {
    token: u64,
    rx: Receiver<Reply<T>>,
    deadline: Instant,
    fallback: Option<T>,
    latest: Arc<AtomicU64>,
}

impl<T> Pending<T> {
    pub fn token(&self) -> u64 { self.token }

    fn is_current(&self) -> bool { self.latest.load(Ordering::SeqCst) == self.token }

    fn superseded(&self) -> Outcome<T> {
        info!("request {} superseded by {}", self.token, self.latest.load(Ordering::SeqCst));
        Outcome::Superseded
    }

    fn fallback(&mut self, why: &str) -> Outcome<T> {
        match self.fallback.take() {
            Some(v) => {
                info!("request {} {why}; using fallback", self.token);
                Outcome::TimedOut(v)
            }
            None => Outcome::Superseded,
        }
    }

    fn accept(&mut self, reply: Reply<T>) -> Outcome<T> {
        if reply.token != self.token || !self.is_current() { return self.superseded(); }
        self.fallback = None;
        Outcome::Completed(reply.payload)
    }

    /// Non-blocking check, suitable for a UI or IO loop. Once `Ready` has
    /// been returned the handle is spent and later polls report `Superseded`.
    pub fn poll(&mut self) -> HostPoll<T> {
        if self.fallback.is_none() { return HostPoll::Ready(Outcome::Superseded); }
        if !self.is_current() {
            self.fallback = None;
            return HostPoll::Ready(self.superseded());
        }
        match self.rx.try_recv() {
            Ok(reply) => HostPoll::Ready(self.accept(reply)),
            Err(TryRecvError::Empty) if Instant::now() < self.deadline => HostPoll::Pending,
            Err(TryRecvError::Empty) => HostPoll::Ready(self.fallback("timed out")),
            Err(TryRecvError::Disconnected) => HostPoll::Ready(self.fallback("lost its worker")),
        }
    }

    /// Blocks until the reply arrives or the watchdog deadline passes.
    pub fn wait(mut self) -> Outcome<T> {
        if self.fallback.is_none() { return Outcome::Superseded; }
        if !self.is_current() { return self.superseded(); }
        let remaining = self.deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(remaining) {
            Ok(reply) => self.accept(reply),
            Err(RecvTimeoutError::Timeout) if self.is_current() => self.fallback("timed out"),
            Err(RecvTimeoutError::Timeout) => self.superseded(),
            Err(RecvTimeoutError::Disconnected) => self.fallback("lost its worker"),
        }
    }
}

/// Dispatches engine requests to the rayon pool, one fresh [`Engine`] per
/// request seeded from the host's generator.
pub struct EngineHost {
    config: EngineConfig,
    book: Arc<OpeningBook>,
    latest: Arc<AtomicU64>,
    rng: SmallRng,
    budget: Duration,
}

impl EngineHost {
    pub fn new(config: EngineConfig) -> Self { Self::with_rng(config, SmallRng::from_entropy()) }

    pub fn seeded(config: EngineConfig, seed: u64) -> Self { Self::with_rng(config, SmallRng::seed_from_u64(seed)) }

    fn with_rng(config: EngineConfig, rng: SmallRng) -> Self {
        let budget = config.watchdog();
        Self {
            config,
            book: Arc::new(OpeningBook::standard::<Position>()),
            latest: Arc::new(AtomicU64::new(0)),
            rng,
            budget,
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> Duration { self.budget }

    pub fn latest_token(&self) -> u64 { self.latest.load(Ordering::SeqCst) }

    /// Makes every in-flight request stale without issuing a new one.
    pub fn cancel_all(&self) -> u64 { self.latest.fetch_add(1, Ordering::SeqCst) + 1 }

    pub fn submit_move(&mut self, fen: &str, difficulty: Difficulty) -> Result<Pending<Option<ChessMove>>> {
        let pos = Position::from_fen(fen)?;
        let fallback = random_legal_move(&pos, &mut self.rng);
        Ok(self.submit_job(fallback, move |engine| engine.select_move_in(&pos, difficulty)))
    }

    pub fn submit_suggestions(&mut self, fen: &str, side: Color, count: usize) -> Result<Pending<Vec<Suggestion>>> {
        let pos = Position::from_fen(fen)?;
        Ok(self.submit_job(Vec::new(), move |engine| engine.analyze_suggestions_in(&pos, side, count)))
    }

    /// Runs `job` on a background worker with its own engine. `fallback` is
    /// what the caller gets if the job is late or panics.
    pub fn submit_job<T, F>(&mut self, fallback: T, job: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Engine) -> T + Send + 'static,
    {
        let token = self.cancel_all();
        let seed: u64 = self.rng.gen();
        let config = self.config.clone();
        let book = Arc::clone(&self.book);
        let (tx, rx) = mpsc::channel();
        rayon::spawn(move || {
            let run = catch_unwind(AssertUnwindSafe(|| {
                let mut engine = Engine::with_book(config, book, SmallRng::seed_from_u64(seed));
                job(&mut engine)
            }));
            match run {
                // the receiver may already be gone; that is fine
                Ok(payload) => { let _ = tx.send(Reply { token, payload }); }
                Err(_) => error!("engine worker for request {token} panicked"),
            }
        });
        Pending { token, rx, deadline: Instant::now() + self.budget, fallback: Some(fallback), latest: Arc::clone(&self.latest) }
    }
}
