//! Binding and serving the webhook router.

use std::{future::Future, io, net::SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Errors raised by the HTTP server itself.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The listen address could not be bound. Fatal at startup.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address as configured, `host:port`.
        address: String,
        /// Underlying OS error, e.g. address in use or permission denied.
        #[source]
        source: io::Error,
    },

    /// The accept loop stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

/// Binds a TCP listener on `address` (`host:port`).
///
/// # Errors
///
/// Returns [`ListenerError::Bind`] if the address cannot be resolved or is
/// already in use.
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind {
            address: address.to_string(),
            source,
        })
}

/// Serves `app` on `listener` until `shutdown` resolves.
///
/// In-flight requests are allowed to complete. Playbook runs already
/// dispatched are detached tasks and are not awaited here.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ListenerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local: Option<SocketAddr> = listener.local_addr().ok();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!(address = ?local, "server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{http::StatusCode, routing::post};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpStream,
        sync::oneshot,
    };

    #[tokio::test]
    async fn test_bind_reports_address_in_use() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let err = bind(&taken).await.unwrap_err();

        assert!(matches!(err, ListenerError::Bind { ref address, .. } if *address == taken));
        assert!(err.to_string().starts_with(&format!("failed to bind {taken}: ")), "{err}");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let app = Router::new().route("/webhooks", post(|| async { StatusCode::OK }));
        let (stop, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(serve(listener, app, async move {
            let _ = stopped.await;
        }));

        let mut stream = TcpStream::connect(address).await.unwrap();
        stream
            .write_all(
                b"POST /webhooks HTTP/1.1\r\nhost: localhost\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}",
            )
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "got {response}");

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
