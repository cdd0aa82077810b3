//! Handshake configuration.

/// The configuration for reading a legacy handshake request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandshakeConfig {
    /// The maximum number of bytes a peer may send before the request is
    /// complete, counting the request line, all fields and the body.
    ///
    /// The default value is 2048 bytes.
    pub max_request_size: usize,
    /// The initial capacity of the read buffer used by the async adapters.
    ///
    /// The default value is 1 KiB.
    pub initial_read_capacity: usize,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            max_request_size: 2048,
            initial_read_capacity: 1024,
        }
    }
}

impl HandshakeConfig {
    /// Sets [`Self::max_request_size`].
    pub fn max_request_size(mut self, max_request_size: usize) -> Self {
        self.max_request_size = max_request_size;
        self
    }

    /// Sets [`Self::initial_read_capacity`].
    pub fn initial_read_capacity(mut self, initial_read_capacity: usize) -> Self {
        self.initial_read_capacity = initial_read_capacity;
        self
    }
}
