use metrics_exporter_prometheus::PrometheusHandle;
use reoffending_risk::config::ReferenceDataConfig;
use reoffending_risk::error::AppError;
use reoffending_risk::instruments::ModelParameters;
use reoffending_risk::offences::{FileOffenceSource, OffenceRegistry, OffenceSource};
use reoffending_risk::RiskEngine;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine plus the source the reload endpoint refreshes the offence table
/// from.
#[derive(Clone)]
pub(crate) struct RiskServices {
    pub(crate) engine: RiskEngine,
    pub(crate) offence_source: Arc<dyn OffenceSource>,
}

impl RiskServices {
    pub(crate) fn new(engine: RiskEngine, offence_source: Arc<dyn OffenceSource>) -> Self {
        Self {
            engine,
            offence_source,
        }
    }
}

/// Loads the parameter document and the first offence table generation.
/// Either failing is fatal at startup.
pub(crate) fn load_risk_services(config: &ReferenceDataConfig) -> Result<RiskServices, AppError> {
    let parameters = ModelParameters::from_path(&config.model_parameters)?;
    info!(
        path = %config.model_parameters.display(),
        "model parameters loaded"
    );

    let source: Arc<dyn OffenceSource> =
        Arc::new(FileOffenceSource::new(&config.offence_table));
    let registry = Arc::new(OffenceRegistry::default());
    registry.reload(source.as_ref())?;

    Ok(RiskServices::new(
        RiskEngine::new(Arc::new(parameters), registry),
        source,
    ))
}
