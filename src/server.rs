//! Methods to accept an incoming legacy handshake on a server.

use monoio::io::AsyncReadRent;

use crate::{
    error::Result,
    handshake::{
        config::HandshakeConfig,
        cookie::{CookieParser, NoCookies},
        request::Request,
        server::server_handshake,
    },
};

/// Reads a legacy handshake request from the provided stream.
///
/// This is typically used after a socket has been accepted from a
/// `TcpListener`. The accepted request is returned together with the stream;
/// writing the server's answer is up to the caller.
pub async fn accept<S>(stream: S) -> Result<(Request, S)>
where
    S: AsyncReadRent,
{
    accept_with_config(stream, None).await
}

/// The same as [`accept`] but the one can specify a handshake configuration.
pub async fn accept_with_config<S>(
    stream: S,
    config: Option<HandshakeConfig>,
) -> Result<(Request, S)>
where
    S: AsyncReadRent,
{
    accept_hdr_with_config(stream, NoCookies, config).await
}

/// The same as [`accept`] but the `Cookie` field of an accepted request is
/// handed to `cookie_parser`.
pub async fn accept_hdr<S, C>(stream: S, cookie_parser: C) -> Result<(Request, S)>
where
    S: AsyncReadRent,
    C: CookieParser,
{
    accept_hdr_with_config(stream, cookie_parser, None).await
}

/// The same as [`accept_hdr`] but the one can specify a handshake configuration.
pub async fn accept_hdr_with_config<S, C>(
    stream: S,
    cookie_parser: C,
    config: Option<HandshakeConfig>,
) -> Result<(Request, S)>
where
    S: AsyncReadRent,
    C: CookieParser,
{
    server_handshake(cookie_parser, stream, config).await
}
