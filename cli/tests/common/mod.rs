use mock_supervisor::Supervisor;

/// Start a mock supervisor on a random port and return its base URL.
///
/// The listener is bound before this returns, so requests queue until the
/// background runtime starts accepting.
pub fn spawn(supervisor: Supervisor) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_supervisor::run(listener, supervisor).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// A local address with nothing listening on it.
pub fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
