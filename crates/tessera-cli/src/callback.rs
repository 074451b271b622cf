//! Local HTTP callback server for the browser login flow
//!
//! Command-line hosts have no custom URL scheme, so the redirect URL points
//! at a temporary loopback server instead. The server hands the full
//! redirect URL (query included) back to the caller, which feeds it to the
//! identity service; deciding whether the URL is valid stays the SDK's job.

use crate::error::{CliError, Result};
use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::{SocketAddr, TcpListener};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tessera_common::TOKEN_QUERY_PARAM;
use tokio::net::TcpListener as TokioTcpListener;
use url::Url;

/// Shared state for callback handling
struct CallbackState {
    sender: mpsc::Sender<Url>,
    base: Url,
}

/// Local HTTP server receiving the login redirect
pub struct CallbackServer {
    port: u16,
    timeout: Duration,
}

impl CallbackServer {
    /// Create a new callback server
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Find an available port for the callback server
    pub fn find_available_port() -> Result<u16> {
        // Try port 8080 first, then fall back to any available port
        let preferred_port = 8080;

        match TcpListener::bind(("127.0.0.1", preferred_port)) {
            Ok(listener) => {
                let port = listener.local_addr()?.port();
                drop(listener);
                Ok(port)
            }
            Err(_) => {
                let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|e| {
                    CliError::CallbackServer(format!("Failed to bind to any port: {e}"))
                })?;
                let port = listener.local_addr()?.port();
                drop(listener);
                Ok(port)
            }
        }
    }

    /// The redirect URL a login attempt should be configured with
    pub fn redirect_url(&self) -> Result<Url> {
        Url::parse(&format!("http://127.0.0.1:{}/callback", self.port))
            .map_err(|e| CliError::CallbackServer(format!("Invalid redirect URL: {e}")))
    }

    /// Start the server and wait for the login redirect
    pub async fn start_and_wait(&self) -> Result<Url> {
        let (tx, rx) = mpsc::channel();

        let callback_state = Arc::new(Mutex::new(CallbackState {
            sender: tx,
            base: self.redirect_url()?,
        }));

        let app = Router::new()
            .route("/callback", get(handle_callback))
            .with_state(callback_state);

        let addr = SocketAddr::from(([127, 0, 0, 1], self.port));
        let listener = TokioTcpListener::bind(&addr)
            .await
            .map_err(|e| CliError::CallbackServer(format!("Failed to bind to {addr}: {e}")))?;

        tracing::info!("Login callback server listening on http://{}", addr);

        let server_handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .map_err(|e| CliError::CallbackServer(format!("Server error: {e}")))
        });

        // Wait for the redirect with timeout
        let result = tokio::select! {
            callback_result = tokio::task::spawn_blocking(move || rx.recv()) => {
                match callback_result {
                    Ok(Ok(url)) => Ok(url),
                    Ok(Err(_)) => Err(CliError::CallbackServer(
                        "Channel closed unexpectedly".to_string(),
                    )),
                    Err(e) => Err(CliError::CallbackServer(format!("Task join error: {e}"))),
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                Err(CliError::CallbackTimeout)
            }
        };

        server_handle.abort();

        result
    }

    /// Page shown in the browser when the redirect carried a token
    fn success_page() -> String {
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Login Successful - Tessera</title>
    <style>
        body { font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
               display: flex; justify-content: center; align-items: center;
               min-height: 100vh; margin: 0; background: #111827; }
        .card { background: #ffffff; padding: 48px; border-radius: 8px;
                max-width: 420px; text-align: center; }
        h1 { font-size: 24px; color: #111827; margin: 0 0 16px 0; }
        p { color: #6B7280; margin: 0 0 8px 0; }
    </style>
</head>
<body>
    <div class="card">
        <h1>Login successful</h1>
        <p>You are signed in.</p>
        <p>You can now close this window and return to the terminal.</p>
    </div>
</body>
</html>
"#
        .to_string()
    }

    /// Page shown in the browser when the redirect was malformed
    fn error_page(error: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Login Failed - Tessera</title>
    <style>
        body {{ font-family: -apple-system, 'Segoe UI', Roboto, sans-serif;
                display: flex; justify-content: center; align-items: center;
                min-height: 100vh; margin: 0; background: #111827; }}
        .card {{ background: #ffffff; padding: 48px; border-radius: 8px;
                 max-width: 420px; text-align: center; }}
        h1 {{ font-size: 24px; color: #111827; margin: 0 0 16px 0; }}
        p {{ color: #6B7280; margin: 0 0 8px 0; }}
        .details {{ background: #F9FAFB; border: 1px solid #E5E7EB; padding: 12px;
                    border-radius: 6px; color: #EF4444; font-family: monospace; }}
    </style>
</head>
<body>
    <div class="card">
        <h1>Login failed</h1>
        <div class="details">{}</div>
        <p>Please close this window and try again in the terminal.</p>
    </div>
</body>
</html>
"#,
            error
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;")
                .replace('\"', "&quot;")
        )
    }
}

/// Axum handler for the login redirect
async fn handle_callback(
    State(state): State<Arc<Mutex<CallbackState>>>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let (url, carried_token) = match state.lock() {
        Ok(guard) => {
            let mut url = guard.base.clone();
            url.set_query(query.as_deref());
            let carried_token = url.query_pairs().any(|(name, _)| name == TOKEN_QUERY_PARAM);
            let _ = guard.sender.send(url.clone());
            (Some(url), carried_token)
        }
        Err(_) => (None, false),
    };

    let html = match (url, carried_token) {
        (Some(_), true) => CallbackServer::success_page(),
        (Some(_), false) => {
            CallbackServer::error_page("The login response did not include a session token")
        }
        (None, _) => CallbackServer::error_page("Internal error"),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Html(html),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_the_full_redirect_url() {
        let port = CallbackServer::find_available_port().unwrap();
        let server = CallbackServer::new(port, Duration::from_secs(10));
        let redirect = server.redirect_url().unwrap();

        let request = tokio::spawn(async move {
            // Give the server a moment to bind
            tokio::time::sleep(Duration::from_millis(200)).await;
            let url = format!("http://127.0.0.1:{port}/callback?token=XYZ&x=1");
            http_get(&url).await
        });

        let callback_url = server.start_and_wait().await.unwrap();
        request.await.unwrap();

        assert_eq!(callback_url.path(), "/callback");
        assert_eq!(
            callback_url.query_pairs().find(|(k, _)| k == "token"),
            Some(("token".into(), "XYZ".into()))
        );
        assert!(tessera_sdk::auth::redirect::matches(&callback_url, &redirect));
    }

    #[tokio::test]
    async fn times_out_when_no_redirect_arrives() {
        // Ephemeral port so the sibling test cannot race us for 8080
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let server = CallbackServer::new(port, Duration::from_millis(100));

        let result = server.start_and_wait().await;
        assert!(matches!(result, Err(CliError::CallbackTimeout)));
    }

    // Minimal raw GET so the test does not need an HTTP client dependency
    async fn http_get(url: &str) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let url = Url::parse(url).unwrap();
        let addr = format!(
            "{}:{}",
            url.host_str().unwrap(),
            url.port_or_known_default().unwrap()
        );
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };
        let request = format!("GET {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n", url.host_str().unwrap());
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        let _ = stream.read_to_end(&mut response).await;
    }
}
