use crate::round::RoundPhase;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("malformed persisted state: {0}")]
    MalformedPersistedState(String),

    #[error("cannot {action} while the round is {phase}")]
    InvalidTransition {
        phase: RoundPhase,
        action: &'static str,
    },
}
