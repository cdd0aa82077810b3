//! Client handshake: rendering an outgoing request.

use bytes::{BufMut, BytesMut};
use monoio::io::{AsyncWriteRent, AsyncWriteRentExt};
use monoio_codec::Encoder;
use rand::Rng;

use super::{
    fields::names,
    key::{generate_key, key_for_number},
    request::{Request, Version},
};
use crate::error::{Error, PreconditionError, Result};

/// Fields written in a fixed position ahead of the rest.
const LEADING_FIELDS: [&str; 6] = [
    names::UPGRADE,
    names::CONNECTION,
    names::HOST,
    names::ORIGIN,
    names::KEY1,
    names::KEY2,
];

/// Renders `request` and writes it to `stream`.
///
/// Keys and challenge generated along the way are kept in `request`, so the
/// checksum expected from the server can be computed afterwards.
pub async fn client_handshake<S, R>(
    request: &mut Request,
    stream: &mut S,
    rng: &mut R,
) -> Result<()>
where
    S: AsyncWriteRent,
    R: Rng + ?Sized,
{
    let mut buf = BytesMut::with_capacity(256);
    request.render_into(rng, &mut buf)?;

    let (res, _) = stream.write_all(buf).await;
    res?;
    stream.flush().await?;
    Ok(())
}

/// Generates a random 8-byte challenge.
pub fn generate_challenge<R: Rng + ?Sized>(rng: &mut R) -> [u8; 8] {
    rng.random()
}

impl Request {
    /// Renders the request for sending, using the thread-local generator for
    /// any key or challenge that still has to be generated.
    pub fn render(&mut self) -> Result<Vec<u8>> {
        self.render_with(&mut rand::rng())
    }

    /// Renders the request for sending, drawing keys and challenge from `rng`.
    pub fn render_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<u8>> {
        let mut buf = BytesMut::with_capacity(256);
        self.render_into(rng, &mut buf)?;
        Ok(buf.to_vec())
    }

    /// Renders the request into `dst`.
    ///
    /// Fails without writing anything if no `Host` is set. Unless the request
    /// is explicitly draft-75, missing keys and challenge are generated and
    /// stored in the request.
    pub fn render_into<R: Rng + ?Sized>(&mut self, rng: &mut R, dst: &mut BytesMut) -> Result<()> {
        let host = self
            .host()
            .ok_or(PreconditionError::MissingHost)?
            .to_owned();
        if self.origin().is_none() {
            self.set_origin(format!("http://{host}"));
        }

        let draft76 = self.version != Some(Version::DraftLegacy75);
        if draft76 {
            self.version = Some(Version::DraftLegacy76Plus);
            self.ensure_keys(rng)?;
        }

        put_line(dst, &format!("GET {} HTTP/1.1", self.resource_name()));
        put_field(dst, names::UPGRADE, "WebSocket");
        put_field(dst, names::CONNECTION, "Upgrade");

        let leading = if draft76 {
            &LEADING_FIELDS[2..]
        } else {
            &LEADING_FIELDS[2..4]
        };
        for &name in leading {
            if let Some(value) = self.fields.get(name) {
                put_field(dst, name, value);
            }
        }

        for (name, value) in self.fields.iter() {
            if !LEADING_FIELDS.contains(&name) {
                put_field(dst, name, value);
            }
        }
        dst.put_slice(b"\r\n");

        if let (true, Some(challenge)) = (draft76, self.challenge) {
            dst.put_slice(&challenge);
        }
        Ok(())
    }

    /// Fills in whatever part of the key exchange is still missing.
    fn ensure_keys<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.key1().is_none() {
            let key = match self.number1 {
                Some(number) => key_for_number(number, rng),
                None => generate_key(rng).1,
            };
            self.set_key1(key)?;
        }
        if self.key2().is_none() {
            let key = match self.number2 {
                Some(number) => key_for_number(number, rng),
                None => generate_key(rng).1,
            };
            self.set_key2(key)?;
        }
        if self.challenge.is_none() {
            self.challenge = Some(generate_challenge(rng));
        }
        Ok(())
    }
}

fn put_line(dst: &mut BytesMut, line: &str) {
    dst.put_slice(line.as_bytes());
    dst.put_slice(b"\r\n");
}

fn put_field(dst: &mut BytesMut, name: &str, value: &str) {
    dst.put_slice(name.as_bytes());
    dst.put_slice(b": ");
    dst.put_slice(value.as_bytes());
    dst.put_slice(b"\r\n");
}

/// Encoder for client request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestEncoder;

impl<'a> Encoder<&'a mut Request> for RequestEncoder {
    type Error = Error;

    fn encode(&mut self, req: &'a mut Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        req.render_into(&mut rand::rng(), dst)
    }
}
