pub mod metrics;
pub mod routes;
pub mod server;

pub use metrics::ServiceMetrics;
pub use routes::{app, serve, AppState};
pub use server::StegoCore;
