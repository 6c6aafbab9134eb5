//! Stages a single request passes through, in order.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Init,
    EnvironmentLoaded,
    Templated,
    PreCommandsRun,
    Sent,
    ResponseStored,
    PostCommandsRun,
    AssertsEvaluated,
    Done,
}

impl RunState {
    /// The state that follows this one; `Done` is terminal.
    pub fn next(self) -> Option<RunState> {
        use RunState::*;
        match self {
            Init => Some(EnvironmentLoaded),
            EnvironmentLoaded => Some(Templated),
            Templated => Some(PreCommandsRun),
            PreCommandsRun => Some(Sent),
            Sent => Some(ResponseStored),
            ResponseStored => Some(PostCommandsRun),
            PostCommandsRun => Some(AssertsEvaluated),
            AssertsEvaluated => Some(Done),
            Done => None,
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
