use thiserror::Error;

/// Errors emitted while configuring or running the automaton.
#[derive(Debug, Error)]
pub enum Error {
    /// Settings that cannot describe a valid run. Raised before any grid state exists.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A cell access outside the padded buffer.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} buffer")]
    Index {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// Every channel towards a peer has closed.
    #[error("worker {rank} lost contact with worker {peer}")]
    Disconnected { rank: usize, peer: usize },
    #[error("worker {rank} could not code a halo frame: {source}")]
    Codec {
        rank: usize,
        #[source]
        source: bincode::Error,
    },
    /// The tag matched but the body did not.
    #[error("worker {rank} expected {expected} from worker {peer}")]
    UnexpectedPayload {
        rank: usize,
        peer: usize,
        expected: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}
