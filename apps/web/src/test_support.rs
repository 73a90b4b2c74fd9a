//! Throwaway HTTP endpoints for client tests.

use axum::Router;
use tokio::net::TcpListener;

/// Serves `app` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_mock(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
