use thiserror::Error;

/// Errors surfaced by the reconnaissance engine and its registries.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("wifi.recon is already running")]
    AlreadyRunning,
    #[error("wifi.recon is not running")]
    NotRunning,
    #[error("could not configure capture device: {0}")]
    Configuration(#[from] pcap::Error),
    #[error("no base station or client set")]
    NoTarget,
    #[error("could not serialize snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hardware address '{0}'")]
    InvalidAddress(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;

/// Failure to build a single forged frame.
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("sequence number {0} does not fit in 12 bits")]
    SequenceOutOfRange(u16),
    #[error("frame construction failed: {0}")]
    Other(String),
}
