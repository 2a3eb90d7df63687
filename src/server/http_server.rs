//! The acceptor loop and the per-connection processing pipeline.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use nix::sys::resource::{getrlimit, setrlimit, Resource};

use crate::parser::{parse_request, Method, Request};
use crate::pool::WorkerPool;
use crate::server::config::ServerConfig;
use crate::server::connection::Connection;
use crate::server::error::Error;
use crate::server::file::ServedFile;
use crate::server::response::{file_headers, status_line, StatusCode};

/// Attempts at pushing the file down the socket before giving up.
const MAX_SEND_ATTEMPTS: usize = 3;

/// An HTTP/1.0 static file server.
///
/// `bind` sets up the listener and the worker pool; `serve` runs the
/// accept loop on the calling thread until the [`ShutdownHandle`]
/// fires, then joins the pool before returning.
pub struct HttpServer {
    config: Arc<ServerConfig>,
    listener: TcpListener,
    local_addr: SocketAddr,
    pool: WorkerPool,
    running: Arc<AtomicBool>,
}

/// Requests that the accept loop stop.
///
/// Cloneable and callable from any thread (typically the signal
/// thread). Stopping twice is harmless.
#[derive(Clone)]
pub struct ShutdownHandle {
    running: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Flip the running flag and poke the listener so a blocked
    /// `accept` returns.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut poke = self.addr;
        if poke.ip().is_unspecified() {
            poke.set_ip("127.0.0.1".parse().expect("loopback literal"));
        }
        let _ = TcpStream::connect(poke);
    }
}

impl HttpServer {
    /// Raise the descriptor limit, bind the listener, and spin up the
    /// worker pool.
    ///
    /// Bind or listen failure is fatal; the server cannot run without
    /// its master socket.
    pub fn bind(config: ServerConfig) -> Result<Self, Error> {
        raise_fd_limit();

        let addr = config
            .addr()
            .to_socket_addrs()
            .map_err(|_| Error::InvalidAddr(config.addr()))?
            .next()
            .ok_or_else(|| Error::InvalidAddr(config.addr()))?;
        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;
        info!("listening on http://{local_addr}");

        let pool = WorkerPool::new(config.workers.max(1));
        info!("worker pool of {workers} threads ready", workers = pool.workers());

        Ok(Self {
            config: Arc::new(config),
            listener,
            local_addr,
            pool,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// The address the listener actually bound (relevant with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            running: Arc::clone(&self.running),
            addr: self.local_addr,
        }
    }

    /// Accept connections until shutdown, handing each to the pool.
    ///
    /// A failed accept (transient resource exhaustion, aborted
    /// handshake) is logged and retried, never fatal.
    pub fn serve(mut self) -> Result<(), Error> {
        while self.running.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    if !self.running.load(Ordering::SeqCst) {
                        break;
                    }
                    let connection = Connection::new(stream, peer);
                    let config = Arc::clone(&self.config);
                    self.pool
                        .execute(move || process_connection(&config, connection));
                }
                Err(e) => {
                    debug!("accept failed: {e}; retrying");
                }
            }
        }

        info!("acceptor stopped; shutting down the worker pool");
        self.pool.shutdown();
        Ok(())
    }
}

/// Raise the soft file-descriptor limit to the hard limit.
///
/// Best-effort: on failure the previous, possibly lower, limit stays in
/// place and the server carries on.
fn raise_fd_limit() {
    match getrlimit(Resource::RLIMIT_NOFILE) {
        Ok((soft, hard)) => match setrlimit(Resource::RLIMIT_NOFILE, hard, hard) {
            Ok(()) => info!("file descriptor limit raised to {hard}"),
            Err(e) => warn!("failed to raise fd limit: {e}; staying at {soft}"),
        },
        Err(e) => warn!("failed to query fd limit: {e}"),
    }
}

/// The task body: one read, one parsed request, one response.
///
/// Nothing here escapes to the pool or to other connections; the socket
/// closes when `connection` drops, on every path out.
pub(crate) fn process_connection(config: &ServerConfig, mut connection: Connection) {
    if let Err(e) = connection.apply_timeouts(config) {
        debug!("connection {connection}: failed to set timeouts: {e}");
    }

    let mut buf = vec![0u8; config.read_buffer_size];
    let received = match connection.recv(&mut buf) {
        Ok(0) => {
            info!("connection {connection}: peer sent nothing; left unprocessed");
            return;
        }
        Ok(n) => n,
        Err(e) => {
            warn!("connection {connection}: receive failed: {e}; left unprocessed");
            return;
        }
    };

    match parse_request(&buf[..received]) {
        Ok(request) => {
            if let Err(e) = respond(config, &mut connection, &request) {
                debug!("connection {connection}: response aborted: {e}");
            }
        }
        Err(parse_err) => {
            let code = parse_err.status_code();
            info!("connection {connection}: {parse_err}; answering {code}");
            if let Err(e) = connection.send_all(status_line(code).as_bytes()) {
                debug!("connection {connection}: failed to send status: {e}");
            }
        }
    }
}

/// Answer one well-formed request.
///
/// Send failures abort the remaining steps; everything else is mapped
/// to a status code and the connection still closes normally.
fn respond(
    config: &ServerConfig,
    connection: &mut Connection,
    request: &Request,
) -> io::Result<()> {
    if request.method != Method::GET {
        info!(
            "connection {connection}: {method} {target} -> 405",
            method = request.method,
            target = request.target
        );
        if request.needs_status_line() {
            connection.send_all(status_line(StatusCode::MethodNotAllowed).as_bytes())?;
        }
        return Ok(());
    }

    match ServedFile::open(&config.directory, &request.target) {
        Ok(file) => {
            debug!(
                "connection {connection}: GET {target} -> 200 ({len} bytes, {mime})",
                target = request.target,
                len = file.len(),
                mime = file.mime()
            );
            if request.needs_status_line() {
                connection.send_all(status_line(StatusCode::Ok).as_bytes())?;
                connection.send_all(file_headers(&file).as_bytes())?;
            }
            stream_file(connection, &file);
        }
        Err(e) => {
            info!(
                "connection {connection}: GET {target} -> 404 ({e})",
                target = request.target
            );
            if request.needs_status_line() {
                connection.send_all(status_line(StatusCode::NotFound).as_bytes())?;
            }
        }
    }

    Ok(())
}

/// Stream the file's bytes with sendfile, retrying short transfers.
///
/// Gives up silently after [`MAX_SEND_ATTEMPTS`] or on the first hard
/// error: once headers are out, HTTP/1.0 has no way to report a
/// truncated body.
#[cfg(target_os = "linux")]
fn stream_file(connection: &mut Connection, file: &ServedFile) {
    use nix::libc::off_t;
    use nix::sys::sendfile::sendfile;

    let mut offset: off_t = 0;
    for _ in 0..MAX_SEND_ATTEMPTS {
        let remaining = file.len().saturating_sub(offset as u64);
        if remaining == 0 {
            return;
        }
        match sendfile(connection.stream(), file.file(), Some(&mut offset), remaining as usize) {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
    }
}

/// Portable fallback: a buffered copy with the same give-up contract.
#[cfg(not(target_os = "linux"))]
fn stream_file(connection: &mut Connection, file: &ServedFile) {
    use std::io::Read;

    let mut reader = file.file();
    let mut buf = [0u8; 8192];
    let mut sent: u64 = 0;
    while sent < file.len() {
        match reader.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                if connection.send_all(&buf[..n]).is_err() {
                    return;
                }
                sent += n as u64;
            }
        }
    }
}
