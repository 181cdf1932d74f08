use std::fmt;

/// TCP endpoint the server binds and producers connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEndpoint {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl SocketEndpoint {
    /// Builds a TCP socket endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::hostname("localhost", 5000, "tcp://localhost:5000")]
    #[case::address("127.0.0.1", 9000, "tcp://127.0.0.1:9000")]
    fn displays_as_tcp_url(#[case] host: &str, #[case] port: u16, #[case] expected: &str) {
        assert_eq!(SocketEndpoint::tcp(host, port).to_string(), expected);
    }
}
