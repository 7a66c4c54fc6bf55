//! Throwaway APT site tree plus a running gatekeeper host.

use aptgate_core::gate::Gatekeeper;
use aptgate_core::server;
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const INDEX: &str = "<html>apt repository</html>";
pub const RELEASE: &str = "Origin: test\nSuite: stable\n";

/// Writes a small repository tree, including files that must stay private.
pub fn build_site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("index.html"), INDEX).unwrap();
    fs::write(root.join("PUBLIC.KEY"), "-----BEGIN PGP PUBLIC KEY BLOCK-----\n").unwrap();
    fs::write(root.join("Makefile"), "publish:\n").unwrap();
    fs::create_dir_all(root.join("dists/stable")).unwrap();
    fs::write(root.join("dists/stable/Release"), RELEASE).unwrap();
    fs::create_dir_all(root.join("scripts")).unwrap();
    fs::write(root.join("scripts/publish.sh"), "#!/bin/sh\n").unwrap();
    fs::create_dir_all(root.join("pool/main/o/other")).unwrap();
    fs::write(root.join("pool/main/o/other/other_1.0.0_amd64.deb"), b"!<arch>\n").unwrap();
    dir
}

/// Starts the host on an ephemeral port and returns its address.
pub async fn start(gate: Gatekeeper, site: &TempDir) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let root = site.path().to_path_buf();
    let gate = Arc::new(gate);
    tokio::spawn(async move {
        let _ = server::serve_listener(listener, gate, &root).await;
    });
    addr
}
