//! External service integrations.

pub mod transport {
    pub use crate::transport::*;
}

pub mod namsor_client {
    pub use crate::namsor_client::*;
}
