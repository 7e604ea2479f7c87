pub mod bank;

use crate::error::EconomyResult;
use coal_traits::ForwardRefToTracing;
use color_eyre::eyre::{Result, WrapErr};
use std::fmt;

/// What a command says back to whoever ran it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Done(String),
    /// The command was refused, nothing changed.
    Rejected(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Done(text) | Reply::Rejected(text) => text,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Reply::Rejected(_))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Rejections become a reply, anything that actually broke is passed up.
fn respond<T>(result: EconomyResult<T>, done: impl FnOnce(T) -> String) -> Result<Reply> {
    match result {
        Ok(value) => Ok(Reply::Done(done(value))),
        Err(err) if err.is_rejection() => {
            tracing::debug!("Rejected: {err}");
            Ok(Reply::Rejected(err.to_string()))
        }
        Err(err) => Err::<Reply, _>(err).trace_err().wrap_err("Economy failure"),
    }
}
