//! Legacy (draft-75 / draft-76) WebSocket opening handshake for the
//! [`monoio`](https://github.com/bytedance/monoio) runtime.
//!
//! The core is sans-IO: [`RequestParser`] consumes bytes as they arrive and
//! [`Request::render`] produces the bytes to send. [`accept`] and [`connect`]
//! drive them over monoio streams.

#![deny(
    missing_docs,
    unused_must_use,
    unused_mut,
    unused_imports,
    unused_import_braces
)]

pub mod error;
pub use error::{Error, Result};

pub mod client;
pub mod handshake;
pub mod server;

pub use crate::{
    client::{client, client_with_rng, connect, connect_with_config},
    handshake::{
        compute_checksum,
        config::HandshakeConfig,
        cookie::{Cookie, CookieParser, NoCookies},
        request::{Feed, Request, State, Version},
        server::RequestParser,
    },
    server::{accept, accept_hdr, accept_hdr_with_config, accept_with_config},
};
