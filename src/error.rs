//! Infrastructure error type.

/// The error type returned by [`Server::serve`](crate::Server::serve).
///
/// Application-level failures (404, 400, etc.) are expressed as HTTP
/// responses through [`Rejection`](crate::Rejection), not as `Error`s. This
/// type surfaces infrastructure failures only: binding the listening socket
/// or reading its local address.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
