use cfa_admin::analytics::AnalyticsService;
use cfa_admin::config::BillingConfig;
use cfa_admin::contracts::ContractService;
use cfa_admin::finance::FinanceService;
use cfa_admin::planning::PlanningService;
use cfa_admin::registry::RegistryService;
use cfa_admin::store::Store;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Every domain service, sharing one store.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) registry: Arc<RegistryService>,
    pub(crate) planning: Arc<PlanningService>,
    pub(crate) contracts: Arc<ContractService>,
    pub(crate) finance: Arc<FinanceService>,
    pub(crate) analytics: Arc<AnalyticsService>,
}

impl Services {
    pub(crate) fn new(store: Store, billing: &BillingConfig) -> Self {
        Self {
            registry: Arc::new(RegistryService::new(store.clone())),
            planning: Arc::new(PlanningService::new(store.clone())),
            contracts: Arc::new(ContractService::new(store.clone())),
            finance: Arc::new(FinanceService::new(store.clone(), billing)),
            analytics: Arc::new(AnalyticsService::new(store)),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
