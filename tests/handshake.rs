//! Loopback round trips through the async adapters.

use monoio::{
    io::AsyncWriteRentExt,
    net::{TcpListener, TcpStream},
};
use monoio_hixie::{
    Cookie, Error, HandshakeConfig, Request, Version, accept, accept_hdr, accept_with_config,
    client_with_rng, connect, error::ProtocolError,
};
use rand::{SeedableRng, rngs::StdRng};

fn listen() -> (TcpListener, String) {
    let server = TcpListener::bind("127.0.0.1:0").expect("Can't listen on loopback");
    let addr = server.local_addr().unwrap();
    (server, addr.to_string())
}

fn cookie_pairs(raw: &str) -> monoio_hixie::Result<Vec<Cookie>> {
    Ok(raw
        .split("; ")
        .filter_map(|c| c.split_once('='))
        .map(|(name, value)| Cookie::new(name, value))
        .collect())
}

#[monoio::test]
async fn draft76_round_trip() {
    let (server, addr) = listen();

    let client = monoio::spawn(async move {
        let mut req = Request::new();
        req.set_resource_name("/chat");
        req.set_host(addr);
        req.fields_mut().insert("Cookie", "session=abc; theme=dark");

        let _stream = connect(&mut req).await.unwrap();
        req.checksum().unwrap()
    });

    let (stream, _) = server.accept().await.unwrap();
    let (mut req, _stream) = accept_hdr(stream, cookie_pairs).await.unwrap();

    assert!(req.is_done());
    assert_eq!(req.resource_name(), "/chat");
    assert_eq!(req.version(), Some(Version::DraftLegacy76Plus));
    assert_eq!(
        req.origin().map(str::to_owned),
        req.host().map(|h| format!("http://{h}"))
    );
    assert_eq!(
        req.cookies(),
        [Cookie::new("session", "abc"), Cookie::new("theme", "dark")]
    );

    let expected = client.await;
    assert_eq!(req.checksum().unwrap(), expected);
}

#[monoio::test]
async fn seeded_client_is_reproducible() {
    let (server, addr) = listen();

    let mut twin = Request::new();
    twin.set_host(addr.clone());
    let expected = twin.render_with(&mut StdRng::seed_from_u64(7)).unwrap();

    let client = monoio::spawn(async move {
        let mut stream = TcpStream::connect(addr.as_str()).await.unwrap();
        let mut req = Request::new();
        req.set_host(addr);
        client_with_rng(&mut req, &mut stream, &mut StdRng::seed_from_u64(7))
            .await
            .unwrap();
        stream
    });

    let (stream, _) = server.accept().await.unwrap();
    let (mut req, _stream) = accept(stream).await.unwrap();
    let _client_stream = client.await;

    assert_eq!(req.key1(), twin.key1());
    assert_eq!(req.key2(), twin.key2());
    assert_eq!(req.challenge(), twin.challenge());
    assert_eq!(req.checksum().unwrap(), twin.checksum().unwrap());
    assert!(expected.ends_with(twin.challenge().unwrap()));
}

#[monoio::test]
async fn draft75_round_trip() {
    let (server, addr) = listen();

    let client = monoio::spawn(async move {
        let mut req = Request::new();
        req.set_host(addr);
        req.set_version(Version::DraftLegacy75);
        connect(&mut req).await.unwrap()
    });

    let (stream, _) = server.accept().await.unwrap();
    let (req, _stream) = accept(stream).await.unwrap();
    let _client_stream = client.await;

    assert_eq!(req.resource_name(), "/");
    assert_eq!(req.version(), Some(Version::DraftLegacy75));
    assert_eq!(req.challenge(), None);
    assert!(req.cookies().is_empty());
}

#[monoio::test]
async fn rejected_request() {
    let (server, addr) = listen();

    let client = monoio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let (res, _) = stream.write_all(b"POST / HTTP/1.1\r\n\r\n".to_vec()).await;
        res.unwrap();
        stream
    });

    let (stream, _) = server.accept().await.unwrap();
    let err = accept(stream).await.unwrap_err();
    let _client_stream = client.await;

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::HandshakeRejected("unsupported method or version"))
    ));
}

#[monoio::test]
async fn oversized_request() {
    let (server, addr) = listen();

    let client = monoio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut data = b"GET / HTTP/1.1\r\n".to_vec();
        data.resize(600, b'a');
        let (res, _) = stream.write_all(data).await;
        res.unwrap();
        stream
    });

    let (stream, _) = server.accept().await.unwrap();
    let config = HandshakeConfig::default().max_request_size(512);
    let err = accept_with_config(stream, Some(config)).await.unwrap_err();
    let _client_stream = client.await;

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::HandshakeRejected("request too large"))
    ));
}

#[monoio::test]
async fn connection_closed_early() {
    let (server, addr) = listen();

    let client = monoio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let (res, _) = stream.write_all(b"GET / HTTP/1.1\r\nHost: x".to_vec()).await;
        res.unwrap();
    });

    let (stream, _) = server.accept().await.unwrap();
    client.await;
    let err = accept(stream).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::HandshakeIncomplete)
    ));
}
