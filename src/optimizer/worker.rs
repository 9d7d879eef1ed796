use crate::config::{FitSettings, VolumeSettings};
use crate::error::{TabFoldError, TfResult};
use crate::optimizer::{BatchReport, DriverState, Optimizer};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// What a worker should optimize.
#[derive(Debug, Clone)]
pub enum Job {
    Volume(VolumeSettings),
    Fit {
        settings: FitSettings,
        given: Vec<f64>,
    },
}

impl Job {
    pub fn validate(&self) -> TfResult<()> {
        match self {
            Job::Volume(settings) => settings.validate(),
            Job::Fit { settings, given } => settings.validate(given),
        }
    }

    pub fn build(&self) -> TfResult<Optimizer> {
        match self {
            Job::Volume(settings) => Optimizer::volume(settings),
            Job::Fit { settings, given } => Optimizer::fit(settings, given.clone()),
        }
    }
}

#[derive(Debug)]
pub enum Command {
    Start {
        seq: u64,
        job: Job,
        seed: Option<u64>,
    },
    Continue {
        seq: u64,
    },
    Extend {
        seq: u64,
        increment: usize,
    },
    Shutdown,
}

/// Per-batch result as it crosses the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub seq: u64,
    pub score: f64,
    pub profile: Vec<f64>,
    pub generations: usize,
    pub paused: bool,
}

impl From<BatchReport> for Envelope {
    fn from(report: BatchReport) -> Self {
        Self {
            seq: report.seq,
            score: report.score,
            profile: report.profile,
            generations: report.generations,
            paused: report.paused,
        }
    }
}

#[derive(Debug)]
pub enum Reply {
    Batch(Envelope),
    Rejected { seq: u64, reason: String },
}

/// Tracks the token of the search the consumer currently cares about.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqGate {
    current: u64,
}

impl SeqGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Allocates the next token; everything tagged earlier becomes stale.
    pub fn advance(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    #[inline(always)]
    pub fn admits(&self, seq: u64) -> bool {
        seq == self.current
    }

    /// Passes `envelope` through only if it belongs to the current search.
    pub fn filter(&self, envelope: Envelope) -> Option<Envelope> {
        if self.admits(envelope.seq) {
            Some(envelope)
        } else {
            debug!(
                "Dropping stale result #{} (current #{})",
                envelope.seq, self.current
            );
            None
        }
    }
}

/// Client side of a background optimizer thread.
///
/// Batches for one token are strictly sequential: the next one is requested only
/// after the previous result has been received here.
pub struct SearchWorker {
    commands: Sender<Command>,
    replies: Receiver<Reply>,
    gate: SeqGate,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    pub fn spawn(name: &str) -> TfResult<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(cmd_rx, reply_tx))?;

        Ok(Self {
            commands: cmd_tx,
            replies: reply_rx,
            gate: SeqGate::new(),
            handle: Some(handle),
        })
    }

    pub fn current_seq(&self) -> u64 {
        self.gate.current()
    }

    fn send(&self, command: Command) -> TfResult<()> {
        self.commands
            .send(command)
            .map_err(|_| TabFoldError::Search("search worker has stopped".to_string()))
    }

    /// Validates `job`, then abandons whatever was running and starts it under a new token.
    pub fn start(&mut self, job: Job, seed: Option<u64>) -> TfResult<u64> {
        job.validate()?;
        let seq = self.gate.advance();
        self.send(Command::Start { seq, job, seed })?;
        Ok(seq)
    }

    /// Grants more batches to the current search.
    ///
    /// A paused search resumes with one more result; a running one simply pauses later.
    pub fn extend(&mut self, increment: usize) -> TfResult<()> {
        self.send(Command::Extend {
            seq: self.gate.current(),
            increment,
        })
    }

    /// Blocks for the next current-token result, dropping stale ones.
    ///
    /// While the era budget lasts the following batch is requested before returning.
    pub fn next_event(&mut self) -> TfResult<Envelope> {
        loop {
            let reply = self
                .replies
                .recv()
                .map_err(|_| TabFoldError::Search("search worker disconnected".to_string()))?;

            match reply {
                Reply::Batch(envelope) => {
                    let Some(envelope) = self.gate.filter(envelope) else {
                        continue;
                    };
                    if !envelope.paused {
                        self.send(Command::Continue { seq: envelope.seq })?;
                    }
                    return Ok(envelope);
                }
                Reply::Rejected { seq, reason } => {
                    if self.gate.admits(seq) {
                        return Err(TabFoldError::Search(reason));
                    }
                    debug!("Ignoring rejection of stale search #{}: {}", seq, reason);
                }
            }
        }
    }

    /// Consumes results until the current search pauses; returns the paused one.
    pub fn run_to_pause(&mut self) -> TfResult<Envelope> {
        loop {
            let envelope = self.next_event()?;
            if envelope.paused {
                return Ok(envelope);
            }
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Search worker panicked during shutdown");
            }
        }
    }
}

fn rejection(seq: u64, error: TabFoldError) -> Reply {
    let reason = match error {
        TabFoldError::Search(msg) => msg,
        other => other.to_string(),
    };
    Reply::Rejected { seq, reason }
}

fn run_and_reply(optimizer: &mut Optimizer, replies: &Sender<Reply>) -> bool {
    let reply = match optimizer.run_batch() {
        Ok(report) => Reply::Batch(report.into()),
        Err(e) => rejection(optimizer.seq(), e),
    };
    replies.send(reply).is_ok()
}

fn worker_loop(commands: Receiver<Command>, replies: Sender<Reply>) {
    let mut optimizer: Option<Optimizer> = None;

    while let Ok(command) = commands.recv() {
        let delivered = match command {
            Command::Start { seq, job, seed } => match job.build() {
                Ok(mut opt) => {
                    opt.restart(seq, seed);
                    let ok = run_and_reply(&mut opt, &replies);
                    optimizer = Some(opt);
                    ok
                }
                Err(e) => {
                    optimizer = None;
                    replies.send(rejection(seq, e)).is_ok()
                }
            },
            Command::Continue { seq } => match optimizer.as_mut() {
                Some(opt) if opt.seq() == seq => run_and_reply(opt, &replies),
                _ => {
                    debug!("Ignoring continue for superseded search #{}", seq);
                    true
                }
            },
            Command::Extend { seq, increment } => match optimizer.as_mut() {
                Some(opt) if opt.seq() == seq => {
                    // A running search is still driven by the client's Continue requests.
                    let was_paused = opt.state() == DriverState::Paused;
                    match opt.extend(increment) {
                        Ok(()) if was_paused => run_and_reply(opt, &replies),
                        Ok(()) => true,
                        Err(e) => replies.send(rejection(seq, e)).is_ok(),
                    }
                }
                _ => {
                    debug!("Ignoring extend for superseded search #{}", seq);
                    true
                }
            },
            Command::Shutdown => break,
        };

        if !delivered {
            break;
        }
    }
}
