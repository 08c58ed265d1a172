//! Production implementations of the crate's trait abstractions.
//!
//! These adapt [`crate::traits`] to a real wallet connection through Alloy,
//! to the explorer backend and the Snowtrace stats API over HTTP, and to the
//! system clock. Test code
//! uses the fakes in [`crate::testing`] instead.

mod alloy;
mod backend;
mod snowtrace;
mod tokio_clock;

pub use self::alloy::AlloyChainProvider;
pub use self::backend::{BackendApiClient, DEFAULT_API_URL, REQUEST_TIMEOUT};
pub use self::snowtrace::{SnowtraceClient, DEFAULT_SNOWTRACE_URL};
pub use self::tokio_clock::TokioClock;
