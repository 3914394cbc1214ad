//! Conversion-session state machine.
//!
//! Models the UI-facing lifecycle of a single conversion: a file is selected,
//! a complexity level chosen, the pipeline runs through its stages, and the
//! session ends holding an audio artifact (or a failure message). A failed
//! step returns the session to `Ready` with the file retained, so the user
//! can retry without re-selecting; choosing a new file from `Done` discards
//! the previous audio buffer so repeated conversions in one long-lived
//! session never accumulate stale artifacts.
//!
//! Steps are not cancellable once started: the only exits from `Converting`
//! are `advance`, `complete`, and `fail`.

use crate::config::Complexity;
use crate::progress::PipelineStage;
use thiserror::Error;

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No file selected yet.
    Idle,
    /// A file is selected; a conversion can be started (or restarted).
    Ready,
    /// The pipeline is running the given stage.
    Converting(PipelineStage),
    /// A conversion finished; the session holds the audio artifact.
    Done,
}

/// A transition that the state machine does not allow.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid session transition: {event} while {from}")]
pub struct InvalidTransition {
    pub from: String,
    pub event: &'static str,
}

/// One conversion session: selected file, chosen complexity, pipeline
/// position, and the produced audio artifact.
#[derive(Debug)]
pub struct ConversionSession {
    state: SessionState,
    file: Option<String>,
    complexity: Complexity,
    last_error: Option<String>,
    audio: Option<Vec<u8>>,
}

impl ConversionSession {
    /// A fresh session with nothing selected.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            file: None,
            complexity: Complexity::default(),
            last_error: None,
            audio: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn complexity(&self) -> Complexity {
        self.complexity
    }

    /// The message from the most recent failure, if any. Cleared when a new
    /// conversion starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The audio artifact of the last completed conversion.
    pub fn audio(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }

    /// Select (or replace) the input file. Allowed from `Idle`, `Ready`, and
    /// `Done` — not while a conversion is running. Replacing the file
    /// discards any previously produced audio buffer.
    pub fn select_file(&mut self, file: impl Into<String>) -> Result<(), InvalidTransition> {
        if matches!(self.state, SessionState::Converting(_)) {
            return Err(self.rejected("select_file"));
        }
        self.file = Some(file.into());
        self.audio = None;
        self.state = SessionState::Ready;
        Ok(())
    }

    pub fn set_complexity(&mut self, level: Complexity) {
        self.complexity = level;
    }

    /// Start converting. Only allowed from `Ready`; enters the first stage.
    pub fn start(&mut self) -> Result<(), InvalidTransition> {
        if self.state != SessionState::Ready {
            return Err(self.rejected("start"));
        }
        self.last_error = None;
        self.state = SessionState::Converting(PipelineStage::Extracting);
        Ok(())
    }

    /// Move to the given stage. Stages may be skipped forward (the pipeline
    /// reports coarse progress) but never revisited.
    pub fn advance(&mut self, stage: PipelineStage) -> Result<(), InvalidTransition> {
        match self.state {
            SessionState::Converting(current) if stage >= current => {
                self.state = SessionState::Converting(stage);
                Ok(())
            }
            _ => Err(self.rejected("advance")),
        }
    }

    /// Finish successfully, taking ownership of the audio artifact.
    pub fn complete(&mut self, audio: Vec<u8>) -> Result<(), InvalidTransition> {
        if !matches!(self.state, SessionState::Converting(_)) {
            return Err(self.rejected("complete"));
        }
        self.audio = Some(audio);
        self.state = SessionState::Done;
        Ok(())
    }

    /// Record a step failure. The session returns to `Ready` with the file
    /// retained so the conversion can be retried as-is; the message stays
    /// available via [`last_error`](Self::last_error).
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), InvalidTransition> {
        if !matches!(self.state, SessionState::Converting(_)) {
            return Err(self.rejected("fail"));
        }
        self.last_error = Some(message.into());
        self.state = SessionState::Ready;
        Ok(())
    }

    fn rejected(&self, event: &'static str) -> InvalidTransition {
        InvalidTransition {
            from: format!("{:?}", self.state),
            event,
        }
    }
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}
