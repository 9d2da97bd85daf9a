use metrics_exporter_prometheus::PrometheusHandle;
use recovery_estimator::estimation::{
    RecoveryEstimationService, RegistryLoadError, RuleRegistry, SharedRegistry,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the ruleset from `path`, or fall back to the built-in seed table.
pub(crate) fn load_registry(path: Option<&Path>) -> Result<RuleRegistry, RegistryLoadError> {
    let registry = match path {
        Some(path) => RuleRegistry::from_path(path)?,
        None => RuleRegistry::seed(),
    };

    info!(
        version = %registry.version(),
        published_on = %registry.published_on(),
        rules = registry.len(),
        "scoring ruleset loaded"
    );

    Ok(registry)
}

pub(crate) fn estimation_service(registry: RuleRegistry) -> Arc<RecoveryEstimationService> {
    Arc::new(RecoveryEstimationService::new(Arc::new(
        SharedRegistry::new(registry),
    )))
}
