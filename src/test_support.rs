use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

pub fn spawn(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

/// Serves `app` on an ephemeral local port for the rest of the test.
pub async fn serve(app: Router) -> SocketAddr {
    let (listener, addr) = bind().await;
    spawn(listener, app);
    addr
}
