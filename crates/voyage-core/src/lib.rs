pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod transport;
pub mod usage;

pub use classify::classify;
pub use config::*;
pub use dispatch::Dispatcher;
pub use error::{ApiError, DecodeError, VoyageError};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use usage::Usage;
