//! The `staticserve` binary: argument parsing, optional daemonization,
//! signal wiring, and process-level error reporting around the library.

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::process;
use std::thread;

use clap::{CommandFactory, Parser};
use log::{error, info};
use signal_hook::consts::{SIGABRT, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;

use staticserve_rs::{HttpServer, ServerConfig};

/// Where diagnostics go once detached from the terminal.
const DAEMON_STDOUT_LOG: &str = "/tmp/staticserve.out.log";
const DAEMON_STDERR_LOG: &str = "/tmp/staticserve.err.log";

#[derive(Parser, Debug)]
#[command(
    name = "staticserve",
    version,
    about = "Concurrent HTTP/1.0 static file server"
)]
struct Args {
    /// IP of server (e.g. 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port (use in range 1024..65535)
    #[arg(long)]
    port: Option<u16>,

    /// Directory to serve
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Detach from the controlling terminal and log to fixed files
    #[arg(long)]
    daemon: bool,

    /// Worker threads (defaults to the number of logical cores)
    #[arg(long)]
    workers: Option<usize>,
}

fn main() {
    let args = Args::parse();

    // All three of host/port/directory are obligatory; without them the
    // program prints its usage and exits successfully.
    let (host, port, directory) = match (args.host, args.port, args.directory) {
        (Some(host), Some(port), Some(directory)) => (host, port, directory),
        _ => {
            let _ = Args::command().print_help();
            process::exit(0);
        }
    };

    if host.is_empty() {
        eprintln!("--host must not be empty");
        process::exit(1);
    }
    let directory = match std::fs::canonicalize(&directory) {
        Ok(dir) if dir.is_dir() => dir,
        Ok(_) => {
            eprintln!("{path} is not a directory", path = directory.display());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("invalid --directory {path}: {e}", path = directory.display());
            process::exit(1);
        }
    };

    if args.daemon {
        if let Err(e) = daemonize() {
            eprintln!("failed to daemonize: {e}");
            process::exit(1);
        }
    }

    // After daemonizing, so the logger writes to the redirected stderr.
    env_logger::init();

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        error!("panic: {info}");
        default_hook(info);
    }));

    let config = ServerConfig {
        host,
        port,
        directory,
        workers: args.workers.unwrap_or_else(num_cpus::get),
        ..Default::default()
    };
    info!(
        "serving {dir} on {host}:{port} with {workers} workers (pid {pid})",
        dir = config.directory.display(),
        host = config.host,
        port = config.port,
        workers = config.workers,
        pid = process::id()
    );

    let server = match HttpServer::bind(config) {
        Ok(server) => server,
        Err(e) => {
            error!("cannot start: {e}");
            process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    thread::spawn(move || match Signals::new([SIGINT, SIGTERM, SIGQUIT, SIGABRT]) {
        Ok(mut signals) => {
            if let Some(signal) = signals.forever().next() {
                info!("interrupted by signal {signal}; finishing up");
                shutdown.stop();
            }
        }
        Err(e) => error!("failed to install signal handlers: {e}"),
    });

    if let Err(e) = server.serve() {
        error!("server error: {e}");
        process::exit(1);
    }
    info!("server stopped");
}

/// Detach from the controlling terminal.
///
/// Fork (the parent exits), start a new session, drop the umask, move
/// to the filesystem root, and point stdin at /dev/null and
/// stdout/stderr at the fixed log files.
fn daemonize() -> std::io::Result<()> {
    use nix::sys::stat::{umask, Mode};
    use nix::unistd::{chdir, dup2, fork, setsid, ForkResult};

    // Safety: called before any threads are spawned.
    match unsafe { fork() }? {
        ForkResult::Parent { .. } => process::exit(0),
        ForkResult::Child => {}
    }

    umask(Mode::empty());
    setsid()?;
    chdir("/")?;

    let devnull = File::open("/dev/null")?;
    let stdout_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(DAEMON_STDOUT_LOG)?;
    let stderr_log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(DAEMON_STDERR_LOG)?;

    dup2(devnull.as_raw_fd(), 0)?;
    dup2(stdout_log.as_raw_fd(), 1)?;
    dup2(stderr_log.as_raw_fd(), 2)?;

    Ok(())
}
