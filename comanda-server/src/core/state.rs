//! Server state: the wired component graph
//!
//! `ServerState` holds shared references to every component. The
//! Repository Gateway is injected once here; no component reaches for
//! storage on its own.

use std::sync::Arc;

use crate::catalog::Preprocessor;
use crate::core::Config;
use crate::db::{Gateway, MemoryGateway};
use crate::fidelity::FidelityDiscountCalculator;
use crate::orders::{
    OrderLocks, OrderStateMachine, PartialOrderAggregator, PreparationTimeScheduler,
};

/// Shared handles to the wired components
///
/// | Field | Role |
/// |-------|------|
/// | config | immutable settings |
/// | gateway | Repository Gateway (record storage contract) |
/// | state_machine | order lifecycle transitions |
/// | aggregator | per-diner selection aggregation |
/// | scheduler | preparation/service timing |
/// | fidelity | loyalty accrual and discounts |
/// | preprocessor | composition rules, resolved at startup |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub gateway: Arc<dyn Gateway>,
    pub state_machine: Arc<OrderStateMachine>,
    pub aggregator: Arc<PartialOrderAggregator>,
    pub scheduler: Arc<PreparationTimeScheduler>,
    pub fidelity: Arc<FidelityDiscountCalculator>,
    pub preprocessor: Arc<Preprocessor>,
}

impl ServerState {
    /// Wire the component graph on top of a gateway backend
    pub fn with_gateway(config: Config, gateway: Arc<dyn Gateway>) -> Self {
        let locks = Arc::new(OrderLocks::new());
        let scheduler = Arc::new(PreparationTimeScheduler::new(gateway.clone()));
        let state_machine = Arc::new(OrderStateMachine::new(
            gateway.clone(),
            scheduler.clone(),
            locks.clone(),
        ));
        let aggregator = Arc::new(PartialOrderAggregator::new(
            gateway.clone(),
            state_machine.clone(),
            locks,
        ));
        let fidelity = Arc::new(FidelityDiscountCalculator::new(gateway.clone()));
        let preprocessor = Arc::new(Preprocessor::new());

        Self {
            config,
            gateway,
            state_machine,
            aggregator,
            scheduler,
            fidelity,
            preprocessor,
        }
    }

    /// Initialize with the in-memory gateway backend
    pub fn initialize(config: &Config) -> Self {
        let gateway: Arc<dyn Gateway> = Arc::new(MemoryGateway::new());
        tracing::info!("Repository gateway initialized (in-memory backend)");
        Self::with_gateway(config.clone(), gateway)
    }
}
