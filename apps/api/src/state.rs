use crate::config::Config;
use crate::portfolio::PortfolioGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Orchestrates provider dispatch with the offline template fallback.
    pub generator: PortfolioGenerator,
}
