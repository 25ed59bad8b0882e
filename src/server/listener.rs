//! Listener — accepts TCP clients and spawns a worker thread per connection.
//!
//! Also holds the blocking client used by the CLI and the tests.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

use super::protocol::Request;
use super::worker::handle_client;
use crate::config::ServerConfig;
use crate::error::{IndexError, Result};
use crate::index::{IndexGuard, ResultCode};

/// Bind the listening socket. Failure here is fatal for the server.
pub fn bind(address: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(address).map_err(|source| IndexError::Bind {
        address: address.to_string(),
        source,
    })?;
    info!(address = %address, "listening for tcp connections");
    Ok(listener)
}

/// Start the index server with a fresh, empty index. Runs until the
/// listener stops yielding connections.
pub fn start_server(config: &ServerConfig) -> Result<()> {
    let listener = bind(&config.address)?;
    serve(listener, Arc::new(IndexGuard::new()));
    Ok(())
}

/// Accept connections forever, one thread per client, all sharing `guard`.
pub fn serve(listener: TcpListener, guard: Arc<IndexGuard>) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let guard = Arc::clone(&guard);
                let peer = stream
                    .peer_addr()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!(peer = %peer, "client connected");

                thread::spawn(move || match handle_client(stream, &guard) {
                    Ok(served) => {
                        debug!(peer = %peer, served, packages = guard.len(), "client disconnected")
                    }
                    Err(e) => debug!(peer = %peer, error = %e, "client handler error"),
                });
            }
            Err(e) => {
                error!(error = %e, "accept error");
            }
        }
    }

    info!("listener shutting down");
}

/// Blocking client holding one connection open for many requests.
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    pub fn connect<A: ToSocketAddrs>(address: A) -> Result<Self> {
        let writer = TcpStream::connect(address)?;
        let reader = BufReader::new(writer.try_clone()?);
        Ok(Self { reader, writer })
    }

    /// Send a raw line (terminator added if missing) and read the result code.
    pub fn send_line(&mut self, line: impl AsRef<[u8]>) -> Result<ResultCode> {
        let line = line.as_ref();
        self.writer.write_all(line)?;
        if !line.ends_with(b"\n") {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;

        let mut response = String::new();
        if self.reader.read_line(&mut response)? == 0 {
            return Err(IndexError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            )));
        }
        ResultCode::parse(&response).ok_or(IndexError::UnexpectedResponse(response))
    }

    pub fn send(&mut self, request: &Request) -> Result<ResultCode> {
        self.send_line(&request.encode())
    }
}

/// Send a single request line on a fresh connection.
pub fn send_request<A: ToSocketAddrs>(address: A, line: impl AsRef<[u8]>) -> Result<ResultCode> {
    Client::connect(address)?.send_line(line)
}
