use crate::model::{IssuerConfig, Target};
use std::io;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Upper bound on the single drain read.
pub const DRAIN_BYTES: usize = 1024;

/// The request written on every connection.
pub fn request_bytes(host: &str, path: &str) -> Vec<u8> {
    format!("GET {path} HTTP/1.1\r\nHost: {host}\r\nConnection: close\r\n\r\n").into_bytes()
}

/// Runs one connect / send / drain cycle against `target`.
///
/// Only the connect and the write decide the outcome. The drain read is a
/// courtesy so the server can finish its reply cleanly: a read error, an early
/// close or a read timeout are all still reported as success. Failed responses
/// are therefore counted as successes whenever the request itself went out.
///
/// The stream is dropped, and the socket closed, on every return path.
pub async fn issue(config: &IssuerConfig, target: &Target) -> io::Result<()> {
    let mut stream = timeout(
        config.connect_timeout,
        TcpStream::connect((target.host.as_str(), target.port)),
    )
    .await
    .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;

    stream
        .write_all(&request_bytes(&target.host, &config.path))
        .await?;

    let mut buf = [0u8; DRAIN_BYTES];
    match timeout(config.read_timeout, stream.read(&mut buf)).await {
        Ok(Ok(n)) => tracing::trace!(bytes = n, "drained response"),
        Ok(Err(e)) => tracing::trace!(error = %e, "drain failed, ignored"),
        Err(_) => tracing::trace!("drain timed out, ignored"),
    }
    Ok(())
}
