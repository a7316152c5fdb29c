//! Payload transmission outcome
//!
//! Response bodies are written by hyper once the handler returns. When the
//! connection finishes, its result is folded into a [`Transmission`] so that a
//! client walking away mid-transfer is not reported as a server fault.

use std::error::Error as StdError;
use std::io;

/// Best-effort result of writing responses on a connection
#[derive(Debug)]
pub enum Transmission {
    /// Every response was written
    Completed,
    /// Peer disconnected or the write was cancelled; absorbed silently
    ClientAborted,
    /// Anything else; the only variant that propagates
    Fault(hyper::Error),
}

impl Transmission {
    /// Only [`Transmission::Fault`] becomes an error
    pub fn into_result(self) -> Result<(), hyper::Error> {
        match self {
            Self::Completed | Self::ClientAborted => Ok(()),
            Self::Fault(err) => Err(err),
        }
    }
}

impl From<Result<(), hyper::Error>> for Transmission {
    fn from(result: Result<(), hyper::Error>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(err) if is_client_abort(&err) => Self::ClientAborted,
            Err(err) => Self::Fault(err),
        }
    }
}

/// Whether a connection error means the client went away
pub fn is_client_abort(err: &hyper::Error) -> bool {
    if err.is_canceled() || err.is_incomplete_message() || err.is_body_write_aborted() {
        return true;
    }

    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return is_disconnect(io_err);
        }
        source = cause.source();
    }
    false
}

/// I/O error kinds produced by a peer closing its end
pub fn is_disconnect(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
    )
}
