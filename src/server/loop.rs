//! Accept loop
//!
//! Serves one connection at a time to completion before accepting the next.
//! Keep-alive is disabled so an idle client cannot hold the loop hostage.

use crate::config::ServerContext;
use crate::handler;
use crate::http::nocache;
use crate::logger;
use crate::server::signal::SignalHandler;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Run the accept loop until an interrupt is requested.
pub async fn run_accept_loop(
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        serve_connection(stream, peer_addr, &ctx, &signals).await;
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
                // An interrupt that arrived mid-connection is only
                // observable through the flag.
                if signals.is_shutdown_requested() {
                    break;
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }
}

/// Serve a single connection to completion on the current task.
///
/// The service wraps the request handler so the no-cache headers land on
/// every response kind, error responses included.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: std::net::SocketAddr,
    ctx: &Arc<ServerContext>,
    signals: &Arc<SignalHandler>,
) {
    let io = TokioIo::new(stream);

    let service_ctx = Arc::clone(ctx);
    let conn = http1::Builder::new().keep_alive(false).serve_connection(
        io,
        service_fn(move |req| {
            let ctx = Arc::clone(&service_ctx);
            async move {
                let mut response = handler::handle_request(req, &ctx, peer_addr).await?;
                nocache::apply(response.headers_mut());
                Ok::<_, Infallible>(response)
            }
        }),
    );

    tokio::select! {
        result = conn => {
            if let Err(err) = result {
                logger::log_connection_error(&err);
            }
        }
        // Dropping the connection future closes the stream; there is no
        // drain period.
        () = signals.shutdown.notified() => {}
    }
}
