use axum::Router;
use tokio::net::TcpListener;

use crate::{
    gateway::Gateway,
    session::{MemorySessionStorage, SessionStore},
};

/// Serve `router` on an ephemeral local port and return its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener");
    let address = listener.local_addr().expect("Could not get local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    format!("http://{address}")
}

/// The base URL of a local port that nothing is listening on.
pub(crate) async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener");
    let address = listener.local_addr().expect("Could not get local address");
    drop(listener);

    format!("http://{address}")
}

/// A gateway for `base_url` with `principal` logged in, along with the
/// session's storage so tests can inspect what was persisted.
#[track_caller]
pub(crate) fn logged_in_gateway(
    base_url: &str,
    principal: &str,
    secret: &str,
) -> (Gateway, MemorySessionStorage) {
    let storage = MemorySessionStorage::new();
    let session = SessionStore::restore(storage.clone()).expect("Could not restore session");
    session
        .log_in(principal, secret)
        .expect("Could not log in");

    let gateway = Gateway::with_client(reqwest::Client::new(), base_url, session)
        .expect("Could not create gateway");

    (gateway, storage)
}
