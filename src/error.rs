//! Error handling.

use std::{io, result};

use thiserror::Error;

/// Result type of all handshake library calls.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Possible handshake errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Input-output error. Only the async adapters produce it; the parser and
    /// serializer never touch a stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The peer sent something that is not a valid legacy handshake.
    #[error("Handshake protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The caller asked for something the request cannot provide yet.
    ///
    /// This signals a bug in the calling code, not a misbehaving peer.
    #[error("Precondition violated: {0}")]
    Precondition(#[from] PreconditionError),
    /// The `Host` of an outgoing request is not a usable connect target.
    #[error("URL error: {0}")]
    Url(#[from] UrlError),
    /// A cookie collaborator could not make sense of the `Cookie` header.
    #[error("Cookie error: {0}")]
    Cookie(String),
}

/// Indicates the specific type/cause of a protocol error.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ProtocolError {
    /// The stream ended before the handshake request was complete.
    #[error("Handshake not finished")]
    HandshakeIncomplete,
    /// Garbage data encountered after the end of the request.
    #[error("Junk after request")]
    JunkAfterRequest,
    /// The request was rejected by the parser.
    #[error("Handshake rejected: {0}")]
    HandshakeRejected(&'static str),
    /// A `Sec-WebSocket-Key` value does not fit in 32 bits.
    #[error("Key value out of range")]
    KeyOutOfRange,
}

/// Caller misuse of a [`Request`](crate::handshake::request::Request).
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum PreconditionError {
    /// An outgoing request cannot be rendered without a `Host`.
    #[error("No Host set on the request")]
    MissingHost,
    /// The checksum needs both numbers and the challenge.
    #[error("Checksum input missing: {0}")]
    MissingChecksumInput(&'static str),
}

/// Indicates the specific type/cause of URL error.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum UrlError {
    /// The `Host` field does not parse as an authority.
    #[error("Invalid Host field")]
    InvalidHost,
    /// The `Host` field names no host.
    #[error("No host name in the Host field")]
    NoHostName,
    /// The port in the `Host` field is not a valid port number.
    #[error("Invalid port in the Host field")]
    InvalidPort,
}
