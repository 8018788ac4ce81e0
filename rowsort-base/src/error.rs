// We want a few things here:
// 1. A way to create a new error with a backtrace
// 2. A way to centralize setting a breakpoint to trap any error in the system fairly soon
//    after it's created (or at least when it's propagated from a library we use back to us)
// 3. Same but for logging / emitting error messages into the tracing/logging system

use backtrace_error::DynBacktraceError;
use std::borrow::Cow;
use tracing::error;

#[cfg(test)]
use test_log::test;

#[derive(Debug)]
#[allow(dead_code)]
pub struct Error(DynBacktraceError);
pub type Result<T> = std::result::Result<T, Error>;

struct SimpleErr(Cow<'static, str>);
impl std::fmt::Debug for SimpleErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for SimpleErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for SimpleErr {
    fn description(&self) -> &str {
        &self.0
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<E> for Error {
    fn from(err: E) -> Error {
        Error::new(err)
    }
}

impl Error {
    pub fn new<E: std::error::Error + Send + Sync + 'static>(err: E) -> Error {
        error!(target: "rowsort", "{:?}", err);
        let dbe = DynBacktraceError::from(err);
        Error(dbe)
    }
}

pub fn err(msg: impl Into<Cow<'static, str>>) -> Error {
    let err = SimpleErr(msg.into());
    Error::new(err)
}

// The four error kinds named by the data-model contract (schema, encoding, corruption, I/O)
// are not a typed hierarchy here -- they're call sites that tag the same opaque `Error` with
// a kind prefix so log lines and `Debug` output say which contract was violated. Nothing in
// this crate's policy (no retries, errors always surface) depends on matching a kind back out.

/// Unknown cell type, or a sort key referencing a column whose type has no defined ordering.
pub fn schema_error(msg: impl Into<Cow<'static, str>>) -> Error {
    err(format!("schema error: {}", msg.into()))
}

/// A value could not be encoded under its declared cell type.
pub fn encoding_error(msg: impl Into<Cow<'static, str>>) -> Error {
    err(format!("encoding error: {}", msg.into()))
}

/// A framing violation found in a buffer known to be complete (e.g. truncated row at EOF).
pub fn corruption_error(msg: impl Into<Cow<'static, str>>) -> Error {
    err(format!("corruption error: {}", msg.into()))
}

#[test]
fn test_error() {
    let _err = err("test error");
}

#[test]
fn test_error_kinds_are_distinguishable_by_message() {
    let s = format!("{:?}", schema_error("bad column"));
    let e = format!("{:?}", encoding_error("bad value"));
    let c = format!("{:?}", corruption_error("truncated row"));
    assert!(s.contains("schema error"));
    assert!(e.contains("encoding error"));
    assert!(c.contains("corruption error"));
}
