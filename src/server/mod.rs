//! HTTP front door.
//!
//! | Route | Result |
//! |-------|--------|
//! | `POST /generate` `{"prompt": ...}` | spec, filled template and download URL |
//! | `GET /download/<file>` | a previously written netlist |
//!
//! Routing lives in [`Service::handle`]; [`serve`] binds it to a socket
//! with a fixed pool of worker threads.

mod service;

pub use service::{Reply, Service, DOWNLOAD_PREFIX};

use std::sync::Arc;
use std::thread;

use log::{error, info, warn};
use tiny_http::{Header, Request, Response, Server};

use crate::config::ServerConfig;
use crate::error::{CircuitGenError, Result};

/// Serve until the listener fails.
pub fn serve(config: &ServerConfig, service: Arc<Service>) -> Result<()> {
    let server = Server::http(config.addr.as_str()).map_err(|e| CircuitGenError::Server {
        message: format!("failed to bind {}: {}", config.addr, e),
    })?;
    let server = Arc::new(server);
    info!("listening on http://{} with {} workers", config.addr, config.workers);

    let workers = (0..config.workers.max(1))
        .map(|i| {
            let server = Arc::clone(&server);
            let service = Arc::clone(&service);
            thread::Builder::new()
                .name(format!("http-worker-{}", i))
                .spawn(move || worker(&server, &service))
        })
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| CircuitGenError::Server {
            message: format!("failed to start worker: {}", e),
        })?;

    for handle in workers {
        handle.join().map_err(|_| CircuitGenError::Server {
            message: "worker thread panicked".to_string(),
        })?;
    }
    Ok(())
}

fn worker(server: &Server, service: &Service) {
    loop {
        match server.recv() {
            Ok(request) => respond(service, request),
            Err(e) => {
                error!("accept failed: {}", e);
                break;
            }
        }
    }
}

fn respond(service: &Service, mut request: Request) {
    let method = request.method().as_str().to_string();
    let url = request.url().to_string();

    let mut body = Vec::new();
    let reply = match request.as_reader().read_to_end(&mut body) {
        Ok(_) => service.handle(&method, &url, &body),
        Err(e) => Reply::error(400, format!("failed to read request body: {}", e)),
    };
    info!("{} {} -> {}", method, url, reply.status);

    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    let headers = std::iter::once(("Content-Type".to_string(), reply.content_type.to_string()))
        .chain(reply.headers);
    for (name, value) in headers {
        match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => response.add_header(header),
            Err(()) => warn!("dropping invalid header {}", name),
        }
    }

    if let Err(e) = request.respond(response) {
        warn!("failed to send response for {} {}: {}", method, url, e);
    }
}
