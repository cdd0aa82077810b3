//! The legacy handshake request.

use bytes::BytesMut;

use super::{
    compute_checksum,
    config::HandshakeConfig,
    cookie::Cookie,
    fields::{Fields, names},
    key::decode_key,
};
use crate::error::{PreconditionError, Result};

/// Resource requested when none was set.
const DEFAULT_RESOURCE: &str = "/";

/// Progress of an incoming request through the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    /// Waiting for `GET <resource> HTTP/1.1`.
    #[default]
    AwaitingRequestLine,
    /// Reading `Name: value` lines until the blank line.
    AwaitingFields,
    /// Headers done; waiting for the 8-byte challenge if one is expected.
    AwaitingBody,
    /// The request was accepted.
    Done,
    /// The request was rejected; the message says why.
    Failed(&'static str),
}

impl State {
    /// Returns `true` for [`State::Done`] and [`State::Failed`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Done | State::Failed(_))
    }
}

/// The outcome of feeding bytes to the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// More bytes are needed.
    Continue,
    /// The request is complete and valid.
    Done,
    /// The request was rejected; see [`Request::failure`].
    Failed,
}

/// Handshake draft spoken by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// draft-75: no keys, no challenge.
    DraftLegacy75,
    /// draft-76 and later: two keys plus an 8-byte challenge.
    DraftLegacy76Plus,
}

/// A legacy WebSocket handshake request, either received from a client or
/// composed for sending.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub(crate) state: State,
    pub(crate) fields: Fields,
    pub(crate) resource_name: Option<String>,
    pub(crate) buffer: BytesMut,
    /// Bytes appended over the lifetime of the request.
    pub(crate) received: usize,
    pub(crate) number1: Option<u32>,
    pub(crate) number2: Option<u32>,
    pub(crate) challenge: Option<[u8; 8]>,
    checksum: Option<[u8; 16]>,
    pub(crate) cookies: Vec<Cookie>,
    pub(crate) version: Option<Version>,
    pub(crate) config: HandshakeConfig,
}

impl Request {
    /// Creates an empty request with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty request with the given configuration.
    pub fn with_config(config: HandshakeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    /// Returns the parser state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the rejection message if the request failed.
    pub fn failure(&self) -> Option<&'static str> {
        match self.state {
            State::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns `true` once the request was fully received and accepted.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Returns all header fields.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns all header fields for modification.
    pub fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    /// Returns a single header field.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// Returns the requested resource, `/` if none was set.
    pub fn resource_name(&self) -> &str {
        self.resource_name.as_deref().unwrap_or(DEFAULT_RESOURCE)
    }

    /// Sets the requested resource.
    pub fn set_resource_name(&mut self, resource_name: impl Into<String>) {
        self.resource_name = Some(resource_name.into());
    }

    /// Returns the `Host` field.
    pub fn host(&self) -> Option<&str> {
        self.fields.get(names::HOST)
    }

    /// Sets the `Host` field.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.fields.insert(names::HOST, host);
    }

    /// Returns the `Origin` field.
    pub fn origin(&self) -> Option<&str> {
        self.fields.get(names::ORIGIN)
    }

    /// Sets the `Origin` field.
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.fields.insert(names::ORIGIN, origin);
    }

    /// Returns the raw `Sec-WebSocket-Key1` value.
    pub fn key1(&self) -> Option<&str> {
        self.fields.get(names::KEY1)
    }

    /// Returns the raw `Sec-WebSocket-Key2` value.
    pub fn key2(&self) -> Option<&str> {
        self.fields.get(names::KEY2)
    }

    /// Sets `Sec-WebSocket-Key1` and the number it encodes.
    pub fn set_key1(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.number1 = decode_key(&key)?;
        self.fields.insert(names::KEY1, key);
        Ok(())
    }

    /// Sets `Sec-WebSocket-Key2` and the number it encodes.
    pub fn set_key2(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.number2 = decode_key(&key)?;
        self.fields.insert(names::KEY2, key);
        Ok(())
    }

    /// Returns the number encoded by key 1.
    pub fn number1(&self) -> Option<u32> {
        self.number1
    }

    /// Returns the number encoded by key 2.
    pub fn number2(&self) -> Option<u32> {
        self.number2
    }

    /// Sets the number for key 1. A key encoding it is generated on render
    /// unless one is set explicitly.
    pub fn set_number1(&mut self, number: u32) {
        self.number1 = Some(number);
    }

    /// Sets the number for key 2.
    pub fn set_number2(&mut self, number: u32) {
        self.number2 = Some(number);
    }

    /// Returns the 8-byte challenge.
    pub fn challenge(&self) -> Option<&[u8; 8]> {
        self.challenge.as_ref()
    }

    /// Sets the 8-byte challenge.
    pub fn set_challenge(&mut self, challenge: [u8; 8]) {
        self.challenge = Some(challenge);
    }

    /// Returns the cookies found in the `Cookie` field.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Returns the handshake draft, if already determined.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    /// Sets the handshake draft to speak when rendering.
    pub fn set_version(&mut self, version: Version) {
        self.version = Some(version);
    }

    /// Returns the 16-byte checksum of both numbers and the challenge.
    ///
    /// Computed once; later calls return the cached value even if the inputs
    /// have been changed since.
    pub fn checksum(&mut self) -> Result<[u8; 16]> {
        if let Some(checksum) = self.checksum {
            return Ok(checksum);
        }

        let number1 = self
            .number1
            .ok_or(PreconditionError::MissingChecksumInput("number1"))?;
        let number2 = self
            .number2
            .ok_or(PreconditionError::MissingChecksumInput("number2"))?;
        let challenge = self
            .challenge
            .as_ref()
            .ok_or(PreconditionError::MissingChecksumInput("challenge"))?;

        let checksum = compute_checksum(number1, number2, challenge);
        self.checksum = Some(checksum);
        Ok(checksum)
    }
}
