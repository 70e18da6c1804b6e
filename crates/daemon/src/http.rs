// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 client over TCP.
//!
//! Sends one request per connection and reads the response using
//! Content-Length framing (does not depend on connection close for EOF).
//! Used by the daemon to call node agents and by the CLI to call the
//! control API. Returns the status code with the body so callers can treat
//! non-2xx responses as data; probe classification needs the distinction
//! between "answered unhealthily" and "did not answer".

use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Errors from the transport layer. An HTTP error status is not an error
/// here; it comes back as part of [`HttpResponse`].
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request timed out")]
    TimedOut,
    #[error("connect failed: {0}")]
    Connect(std::io::Error),
    #[error("io error: {0}")]
    Io(std::io::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Status code and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub async fn get(addr: &str, path: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    timed_request(addr, &request, timeout).await
}

pub async fn post(
    addr: &str,
    path: &str,
    body: &str,
    timeout: Duration,
) -> Result<HttpResponse, HttpError> {
    let request = format!(
        "POST {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len(),
    );
    timed_request(addr, &request, timeout).await
}

pub async fn delete(addr: &str, path: &str, timeout: Duration) -> Result<HttpResponse, HttpError> {
    let request = format!("DELETE {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    timed_request(addr, &request, timeout).await
}

/// Connect, send, and read with one timeout covering the entire operation.
/// Prevents hangs when the peer accepts the connection but never responds.
async fn timed_request(
    addr: &str,
    request: &str,
    timeout: Duration,
) -> Result<HttpResponse, HttpError> {
    tokio::time::timeout(timeout, send_request(addr, request))
        .await
        .map_err(|_| HttpError::TimedOut)?
}

async fn send_request(addr: &str, request: &str) -> Result<HttpResponse, HttpError> {
    let mut stream = TcpStream::connect(addr).await.map_err(HttpError::Connect)?;
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(HttpError::Io)?;

    let mut reader = BufReader::new(&mut stream);
    read_response(&mut reader).await
}

/// Read and parse an HTTP/1.1 response from a buffered stream.
async fn read_response<R: tokio::io::AsyncRead + Unpin>(
    reader: &mut BufReader<R>,
) -> Result<HttpResponse, HttpError> {
    let mut status_line = String::new();
    reader
        .read_line(&mut status_line)
        .await
        .map_err(HttpError::Io)?;

    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| HttpError::Malformed(format!("bad status line: {:?}", status_line.trim())))?;

    // Read headers, extract Content-Length (case-insensitive)
    let mut content_length: usize = 0;
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await.map_err(HttpError::Io)?;
        if n == 0 || line == "\r\n" || line == "\n" {
            break;
        }
        let line_lower = line.to_ascii_lowercase();
        if let Some(val) = line_lower.strip_prefix("content-length:") {
            content_length = val.trim().parse().unwrap_or(0);
        }
    }

    let body = if content_length > 0 {
        let mut buf = vec![0u8; content_length];
        reader.read_exact(&mut buf).await.map_err(HttpError::Io)?;
        String::from_utf8_lossy(&buf).into_owned()
    } else {
        String::new()
    };

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
