use std::time::Duration;

use thiserror::Error;

/// Rejected window geometry. Only construction can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("total cannot be 0")]
    ZeroTotal,
    #[error("interval cannot be 0")]
    ZeroInterval,
    #[error("total ({total:?}) must be longer than interval ({interval:?})")]
    TotalNotAfterInterval { total: Duration, interval: Duration },
    #[error("total ({total:?}) has to be a multiple of interval ({interval:?})")]
    NotAMultiple { total: Duration, interval: Duration },
}
