//! Ownership wrapper around an accepted client socket.

use std::fmt;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::os::unix::io::AsRawFd;

use crate::server::config::ServerConfig;

/// An accepted client connection.
///
/// Owned by exactly one pool task; the socket is closed exactly once,
/// when the wrapper drops, on every exit path — served, parse failure,
/// I/O failure, or panic.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    /// Apply the configured socket timeouts.
    ///
    /// A stalled peer then surfaces as a per-connection I/O error
    /// instead of pinning a worker forever.
    pub fn apply_timeouts(&self, config: &ServerConfig) -> io::Result<()> {
        self.stream.set_read_timeout(config.read_timeout)?;
        self.stream.set_write_timeout(config.write_timeout)
    }

    /// One read into the caller's buffer.
    ///
    /// A request that does not arrive whole in the first read is
    /// treated as absent; there is no re-read loop.
    pub fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    /// Write the whole buffer to the peer.
    pub fn send_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)
    }

    /// The underlying socket, for zero-copy file transfer.
    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{peer} (fd {fd})", peer = self.peer, fd = self.stream.as_raw_fd())
    }
}
