/// Middleware module
///
/// Custom middleware for request logging and hit counting.

mod logging;
mod metrics;

pub use logging::RequestLogger;
pub use metrics::HitCounter;
pub use metrics::RequestMetrics;
