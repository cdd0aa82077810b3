//! Methods to send a legacy handshake request as a client.

use http::uri::Authority;
use monoio::{io::AsyncWriteRent, net::TcpStream};
use rand::Rng;

use crate::{
    error::{PreconditionError, Result, UrlError},
    handshake::{client::client_handshake, request::Request},
};

/// Connects to the `Host` of the given request and sends it.
///
/// The port defaults to 80 when `Host` carries none. On return `request`
/// holds the keys and challenge that were sent, so the server's answer can be
/// checked against [`Request::checksum`].
pub async fn connect(request: &mut Request) -> Result<TcpStream> {
    connect_with_config(request, false).await
}

/// The same as [`connect`] but `disable_nagle` specifies if the Nagle's
/// algorithm must be disabled, i.e. `set_nodelay(true)`.
pub async fn connect_with_config(request: &mut Request, disable_nagle: bool) -> Result<TcpStream> {
    let (host, port) = host_and_port(request.host().ok_or(PreconditionError::MissingHost)?)?;

    let mut stream = TcpStream::connect((host, port)).await?;
    if disable_nagle {
        stream.set_nodelay(true)?;
    }

    client(request, &mut stream).await?;
    Ok(stream)
}

/// Sends the request over an already established stream.
pub async fn client<S>(request: &mut Request, stream: &mut S) -> Result<()>
where
    S: AsyncWriteRent,
{
    client_with_rng(request, stream, &mut rand::rng()).await
}

/// The same as [`client`] but keys and challenge still missing from
/// `request` are drawn from `rng`.
pub async fn client_with_rng<S, R>(request: &mut Request, stream: &mut S, rng: &mut R) -> Result<()>
where
    S: AsyncWriteRent,
    R: Rng + ?Sized,
{
    client_handshake(request, stream, rng).await
}

/// Splits a `Host` field into the name to connect to and the port.
fn host_and_port(host: &str) -> Result<(String, u16)> {
    let authority: Authority = host.parse().map_err(|_| UrlError::InvalidHost)?;

    let name = authority.host();
    if name.is_empty() {
        return Err(UrlError::NoHostName.into());
    }

    let after_userinfo = authority
        .as_str()
        .rsplit_once('@')
        .map_or(authority.as_str(), |(_, rest)| rest);
    let port = match after_userinfo.strip_prefix(name) {
        Some("") => 80,
        Some(rest) => rest
            .strip_prefix(':')
            .and_then(|port| port.parse().ok())
            .ok_or(UrlError::InvalidPort)?,
        None => return Err(UrlError::InvalidHost.into()),
    };

    let name = match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
        Some(ipv6) => ipv6,
        None => name,
    };
    Ok((name.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::host_and_port;
    use crate::error::{Error, UrlError};

    #[test]
    fn host_port_split() {
        assert_eq!(host_and_port("x.test").unwrap(), ("x.test".into(), 80));
        assert_eq!(host_and_port("x.test:8080").unwrap(), ("x.test".into(), 8080));
        assert_eq!(host_and_port("[::1]:9001").unwrap(), ("::1".into(), 9001));
        assert_eq!(host_and_port("[::1]").unwrap(), ("::1".into(), 80));
        assert_eq!(host_and_port("user@x.test:81").unwrap(), ("x.test".into(), 81));
    }

    #[test]
    fn bad_hosts_are_errors() {
        for host in [
            "",
            ":80",
            "x.test:",
            "x.test:99999",
            "[::1]:http",
            "1:2:3:4:5:6:7:8",
            "x.test/path",
        ] {
            assert!(
                matches!(host_and_port(host), Err(Error::Url(_))),
                "{host:?} accepted"
            );
        }
        assert!(matches!(
            host_and_port("x.test:99999"),
            Err(Error::Url(UrlError::InvalidPort | UrlError::InvalidHost))
        ));
    }
}
