//! Server handshake: incremental request parsing.

use bytes::BytesMut;
use monoio::io::{AsyncReadRent, stream::Stream};
use monoio_codec::{Decoded, Decoder, FramedRead};

use super::{
    config::HandshakeConfig,
    cookie::{CookieParser, NoCookies},
    fields::names,
    key::decode_key,
    request::{Feed, Request, State, Version},
};
use crate::error::{Error, ProtocolError, Result};

/// Length of the challenge a draft-76 client sends after its headers.
const CHALLENGE_LEN: usize = 8;

/// Reads a legacy handshake request from `stream`.
///
/// Returns the accepted request together with the stream. No response is
/// written; that is left to the caller.
pub async fn server_handshake<S, C>(
    cookie_parser: C,
    stream: S,
    config: Option<HandshakeConfig>,
) -> Result<(Request, S)>
where
    S: AsyncReadRent,
    C: CookieParser,
{
    let config = config.unwrap_or_default();
    let parser = RequestParser::with_cookie_parser(config, cookie_parser);
    let mut framed = FramedRead::with_capacity(stream, parser, config.initial_read_capacity);

    match framed.next().await {
        Some(Ok(req)) => Ok((req, framed.into_inner())),

        Some(Err(e)) => Err(e),

        None => Err(Error::Protocol(ProtocolError::HandshakeIncomplete)),
    }
}

/// Incremental parser for an incoming legacy handshake request.
///
/// Bytes may arrive in chunks of any size; the outcome does not depend on how
/// the request was split.
#[derive(Debug)]
pub struct RequestParser<C = NoCookies> {
    request: Request,
    cookie_parser: C,
}

impl RequestParser {
    /// Creates a parser that ignores cookies.
    pub fn new(config: HandshakeConfig) -> Self {
        Self::with_cookie_parser(config, NoCookies)
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new(HandshakeConfig::default())
    }
}

impl<C: CookieParser> RequestParser<C> {
    /// Creates a parser that hands the `Cookie` field to `cookie_parser`.
    pub fn with_cookie_parser(config: HandshakeConfig, cookie_parser: C) -> Self {
        Self {
            request: Request::with_config(config),
            cookie_parser,
        }
    }

    /// Returns the request parsed so far.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Consumes the parser, returning the request.
    pub fn into_request(self) -> Request {
        self.request
    }

    /// Takes the request out, leaving a fresh one with the same configuration.
    fn take_request(&mut self) -> Request {
        let fresh = Request::with_config(self.request.config);
        std::mem::replace(&mut self.request, fresh)
    }

    /// Feeds the next chunk of bytes received from the peer.
    pub fn feed(&mut self, chunk: &[u8]) -> Feed {
        let state = self.request.state;
        if state.is_terminal() {
            return if state == State::Done {
                Feed::Done
            } else {
                Feed::Failed
            };
        }
        if chunk.is_empty() {
            return Feed::Continue;
        }

        self.request.received += chunk.len();
        if self.request.received > self.request.config.max_request_size {
            return self.fail("request too large");
        }
        self.request.buffer.extend_from_slice(chunk);

        loop {
            match self.request.state {
                State::AwaitingRequestLine | State::AwaitingFields => {
                    let Some(line) = take_line(&mut self.request.buffer) else {
                        return Feed::Continue;
                    };
                    if let Err(msg) = self.parse_line(&line) {
                        return self.fail(msg);
                    }
                }
                State::AwaitingBody => return self.read_body(),
                State::Done => return Feed::Done,
                State::Failed(_) => return Feed::Failed,
            }
        }
    }

    fn parse_line(&mut self, line: &[u8]) -> Result<(), &'static str> {
        let req = &mut self.request;

        if req.state == State::AwaitingRequestLine {
            let line = std::str::from_utf8(line).map_err(|_| "malformed request line")?;
            let mut tokens = line.split_ascii_whitespace();
            let (Some(method), Some(resource), Some(version), None) =
                (tokens.next(), tokens.next(), tokens.next(), tokens.next())
            else {
                return Err("malformed request line");
            };

            if method != "GET" || version != "HTTP/1.1" {
                return Err("unsupported method or version");
            }

            log::trace!("Request line: GET {resource}");
            req.resource_name = Some(resource.to_owned());
            req.state = State::AwaitingFields;
        } else if line.is_empty() {
            log::trace!("End of fields, {} field(s)", req.fields.len());
            req.state = State::AwaitingBody;
        } else {
            // A line without a separator is kept whole as a name with no value.
            let line = String::from_utf8_lossy(line);
            let (name, value) = line.split_once(": ").unwrap_or((&*line, ""));
            log::trace!("Field: {name}");
            req.fields.insert(name, value);
        }

        Ok(())
    }

    fn read_body(&mut self) -> Feed {
        let req = &mut self.request;

        match (req.fields.get(names::KEY1), req.fields.get(names::KEY2)) {
            (Some(key1), Some(key2)) => {
                let (Ok(number1), Ok(number2)) = (decode_key(key1), decode_key(key2)) else {
                    return self.fail("invalid key");
                };

                match req.buffer.len() {
                    n if n < CHALLENGE_LEN => return Feed::Continue,
                    n if n > CHALLENGE_LEN => return self.fail("body too long"),
                    _ => {}
                }

                let mut challenge = [0; CHALLENGE_LEN];
                challenge.copy_from_slice(&req.buffer.split_to(CHALLENGE_LEN));
                req.challenge = Some(challenge);
                req.number1 = number1;
                req.number2 = number2;
                req.version = Some(Version::DraftLegacy76Plus);
            }
            _ => req.version = Some(Version::DraftLegacy75),
        }

        match self.finalize() {
            Ok(()) => {
                log::trace!(
                    "Accepted {:?} request for {}",
                    self.request.version,
                    self.request.resource_name()
                );
                self.request.state = State::Done;
                Feed::Done
            }
            Err(reason) => {
                log::debug!("Invalid handshake request: {reason}");
                self.fail("invalid request")
            }
        }
    }

    /// Validates the required fields and collects cookies.
    fn finalize(&mut self) -> Result<(), &'static str> {
        let fields = &self.request.fields;

        if fields.get(names::UPGRADE) != Some("WebSocket") {
            return Err("missing or wrong Upgrade field");
        }
        if fields.get(names::CONNECTION) != Some("Upgrade") {
            return Err("missing or wrong Connection field");
        }
        if fields.get(names::ORIGIN).is_none_or(str::is_empty) {
            return Err("missing Origin field");
        }
        if !fields.contains(names::HOST) {
            return Err("missing Host field");
        }

        let raw = fields.get(names::COOKIE).unwrap_or_default();
        self.request.cookies = self.cookie_parser.parse_cookies(raw).unwrap_or_else(|e| {
            log::debug!("Ignoring unparsable Cookie field: {e}");
            Vec::new()
        });

        Ok(())
    }

    fn fail(&mut self, msg: &'static str) -> Feed {
        log::debug!("Rejecting handshake request: {msg}");
        self.request.state = State::Failed(msg);
        Feed::Failed
    }
}

/// Splits the next CRLF-terminated line off the front of `buf`, without the
/// terminator.
fn take_line(buf: &mut BytesMut) -> Option<BytesMut> {
    let pos = buf.windows(2).position(|w| w == b"\r\n")?;
    let mut line = buf.split_to(pos + 2);
    line.truncate(pos);
    Some(line)
}

impl<C: CookieParser> Decoder for RequestParser<C> {
    type Item = Request;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Decoded<Self::Item>, Self::Error> {
        let chunk = src.split();
        match self.feed(&chunk) {
            Feed::Continue => Ok(Decoded::Insufficient),
            Feed::Done if !self.request.buffer.is_empty() => {
                log::debug!(
                    "Rejecting {} byte(s) after the handshake request",
                    self.request.buffer.len()
                );
                Err(Error::Protocol(ProtocolError::JunkAfterRequest))
            }
            Feed::Done => Ok(Decoded::Some(self.take_request())),
            Feed::Failed => {
                let msg = self.request.failure().unwrap_or("invalid request");
                Err(Error::Protocol(ProtocolError::HandshakeRejected(msg)))
            }
        }
    }
}
