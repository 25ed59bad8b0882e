//! Connection worker — serves requests on one client connection.
//!
//! Reads a line, decodes it, runs it against the shared index and writes
//! the result code back, strictly one request at a time. Malformed lines
//! get `ERROR` and the connection stays open; EOF or an I/O error ends it.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use tracing::{debug, warn};

use super::protocol::{decode, encode, trim_end, Command, Request};
use crate::error::Result;
use crate::index::{IndexGuard, ResultCode};

/// Serve a TCP client until it disconnects.
///
/// Returns the number of requests served. The stream is closed when both
/// halves drop, on every exit path.
pub fn handle_client(stream: TcpStream, guard: &IndexGuard) -> Result<usize> {
    let reader = BufReader::new(stream.try_clone()?);
    serve_connection(reader, stream, guard)
}

/// Request loop over any line reader and writer.
pub fn serve_connection<R, W>(mut reader: R, mut writer: W, guard: &IndexGuard) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let mut served = 0;
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(served);
        }

        let code = process_line(&line, guard);
        writer.write_all(encode(code).as_bytes())?;
        writer.flush()?;
        served += 1;
    }
}

/// Decode one line and run it against the index.
pub fn process_line(line: &[u8], guard: &IndexGuard) -> ResultCode {
    match decode(line) {
        Ok(request) => {
            let code = dispatch(&request, guard);
            debug!(
                command = %request.command,
                package = %String::from_utf8_lossy(&request.package),
                deps = request.dependencies.len(),
                write = request.command.is_write(),
                result = %code,
                "request"
            );
            code
        }
        Err(e) => {
            warn!(
                error = %e,
                line = %String::from_utf8_lossy(trim_end(line)),
                "rejecting malformed request"
            );
            ResultCode::Error
        }
    }
}

/// Run a decoded request against the index under the matching lock mode.
pub fn dispatch(request: &Request, guard: &IndexGuard) -> ResultCode {
    match request.command {
        Command::Index => guard.register(&request.package, &request.dependencies),
        Command::Remove => guard.remove(&request.package),
        Command::Query => guard.query(&request.package),
    }
}
