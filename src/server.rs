// TCP accept loop and per-connection request lifecycle
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::config::Srv;
use crate::error::{Result, ServeError};
use crate::http::{LineReader, Request};
use crate::routes;
use crate::store::FileStore;

pub struct Server {
    cfg: Srv,
    store: Arc<FileStore>,
}

impl Server {
    pub fn new(cfg: Srv) -> Self {
        let store = Arc::new(FileStore::new(cfg.directory.clone()));
        Server { cfg, store }
    }

    pub fn run(&self) -> std::io::Result<()> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        crate::log::info(&format!("Listening on {} (http) [HTTP/1.1]", self.cfg.listen_addr));
        crate::log::info(&format!("Serving files from directory: {}", self.cfg.directory));
        crate::log::separator();

        let cfg = self.cfg.clone();
        let store = Arc::clone(&self.store);

        rt.block_on(async move {
            let listener = TcpListener::bind(&cfg.listen_addr).await?;
            accept_loop(listener, cfg, store).await;
            Ok::<(), std::io::Error>(())
        })?;

        crate::log::info("Server stopped.");
        crate::log::info(&crate::metrics::summary());
        Ok(())
    }
}

/// Accept until Ctrl-C, spawning one task per connection. Accept errors are
/// logged and the loop keeps going; nothing a single connection does can
/// take the listener down.
pub async fn accept_loop(listener: TcpListener, cfg: Srv, store: Arc<FileStore>) {
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        let cfg = cfg.clone();
                        let store = Arc::clone(&store);
                        tokio::spawn(async move {
                            handle_connection(stream, addr, &cfg, &store).await;
                        });
                    }
                    Err(e) => {
                        crate::log::error(&format!("Accept error: {e}"));
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                crate::log::info("Shutting down...");
                break;
            }
        }
    }
}

/// One request per connection: read, parse, dispatch, write, close.
///
/// Transport and parse failures are terminal for this connection only and
/// nothing is written back — malformed requests are discarded, not answered
/// with a best-effort 400. A response is either fully assembled and then
/// written, or not written at all.
async fn handle_connection(mut stream: TcpStream, addr: SocketAddr, cfg: &Srv, store: &FileStore) {
    crate::metrics::inc_connections();
    let started = Instant::now();
    let ip = addr.ip().to_string();

    let raw = match read_message(&mut stream, cfg).await {
        Ok(d) => d,
        Err(e) => {
            crate::log::error(&format!("Error reading from connection, closing: {e}"));
            crate::metrics::inc_requests_err();
            return;
        }
    };
    crate::metrics::add_bytes_in(raw.len() as u64);

    let mut reader = LineReader::with_capacity(raw.as_slice(), cfg.buffer_size);
    let req = match Request::parse(&mut reader) {
        Ok(r) => r,
        Err(e) => {
            crate::log::error(&format!("Error parsing request, discarding: {e}"));
            crate::metrics::inc_requests_err();
            return;
        }
    };
    crate::metrics::inc_requests();
    crate::log::request(&req.method, &req.target, &ip);

    let mut resp = routes::dispatch(&req, store);
    let out = match resp.to_bytes(true) {
        Ok(b) => b,
        Err(e) => {
            crate::log::error(&format!("Failed to serialize response: {e}"));
            crate::metrics::inc_requests_err();
            return;
        }
    };

    if resp.status_code < 400 {
        crate::metrics::inc_requests_ok();
    } else {
        crate::metrics::inc_requests_err();
    }
    crate::log::response(resp.status_code, started.elapsed().as_millis());

    crate::metrics::add_bytes_out(out.len() as u64);
    if stream.write_all(&out).await.is_err() {
        crate::log::warn("Failed to write response to client");
    }
    let _ = stream.shutdown().await;
    crate::log::separator();
}

/// Read one inbound message: fixed-size reads appended until a short read
/// ends the message, the whole exchange bounded by the read deadline and the
/// message size cap. Exceeding the cap is its own failure, distinct from
/// parse errors; peer close before a short read is a transport failure.
pub async fn read_message(stream: &mut TcpStream, cfg: &Srv) -> Result<Vec<u8>> {
    let deadline = Duration::from_secs(cfg.read_timeout);
    match tokio::time::timeout(deadline, read_message_inner(stream, cfg)).await {
        Ok(result) => result,
        Err(_) => Err(ServeError::Timeout),
    }
}

async fn read_message_inner(stream: &mut TcpStream, cfg: &Srv) -> Result<Vec<u8>> {
    let mut message = Vec::new();
    let mut buf = vec![0u8; cfg.buffer_size];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(ServeError::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        message.extend_from_slice(&buf[..n]);
        if message.len() as u64 > cfg.max_message_size {
            return Err(ServeError::MessageTooLarge(cfg.max_message_size));
        }
        if n < buf.len() {
            break;
        }
    }
    Ok(message)
}
