use monoio::{
    io::{AsyncWriteRent, AsyncWriteRentExt},
    net::{TcpListener, TcpStream},
};
use monoio_hixie::{Cookie, Version, accept_hdr};

#[monoio::main]
async fn main() {
    env_logger::init();
    let server = TcpListener::bind("localhost:3012").expect("Failed to bind");

    while let Ok((stream, addr)) = server.accept().await {
        println!("New connection from: {addr}");
        monoio::spawn(handle_connection(stream));
    }
}

async fn handle_connection(stream: TcpStream) {
    let cookies = |raw: &str| -> monoio_hixie::Result<Vec<Cookie>> {
        Ok(raw
            .split("; ")
            .filter_map(|c| c.split_once('='))
            .map(|(name, value)| Cookie::new(name, value))
            .collect())
    };

    let (mut req, mut stream) = match accept_hdr(stream, cookies).await {
        Ok(accepted) => accepted,
        Err(e) => {
            eprintln!("Handshake failed: {e}");
            return;
        }
    };

    println!("Received a {:?} handshake for {}", req.version(), req.resource_name());
    for (name, value) in req.fields().iter() {
        println!("* {name}: {value}");
    }
    for cookie in req.cookies() {
        println!("cookie {} = {}", cookie.name, cookie.value);
    }

    // The response belongs to the framing layer; write a minimal one by hand.
    let host = req.host().unwrap_or_default().to_owned();
    let origin = req.origin().unwrap_or_default().to_owned();
    let mut resp = format!(
        "HTTP/1.1 101 WebSocket Protocol Handshake\r\n\
         Upgrade: WebSocket\r\n\
         Connection: Upgrade\r\n\
         Sec-WebSocket-Origin: {origin}\r\n\
         Sec-WebSocket-Location: ws://{host}{}\r\n\
         \r\n",
        req.resource_name()
    )
    .into_bytes();

    if req.version() == Some(Version::DraftLegacy76Plus) {
        match req.checksum() {
            Ok(checksum) => resp.extend_from_slice(&checksum),
            Err(e) => {
                eprintln!("Cannot answer the challenge: {e}");
                return;
            }
        }
    }

    let (res, _) = stream.write_all(resp).await;
    if let Err(e) = res {
        eprintln!("Error writing response: {e}");
        return;
    }
    let _ = stream.flush().await;
    println!("Handshake answered");
}
