//! Connectivity back-ends - every adapter implements the same two-method
//! capability set and is selected once at engine construction.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{AdapterKind, BridgeConfig};
use crate::error::Result;
use crate::types::OrderRequest;

pub mod sim;
pub mod stub;
pub mod wire;
pub mod worker;

pub use sim::SimAdapter;
pub use stub::StubAdapter;
pub use worker::WorkerAdapter;

/// Capability set shared by all connectivity back-ends.
#[async_trait]
pub trait BrokerAdapter: Send + Sync {
    /// Execute a validated request against the back-end.
    async fn execute(&self, req: &OrderRequest) -> Result<()>;

    /// Current connectivity as last observed; no I/O.
    fn is_connected(&self) -> bool;
}

/// Build the adapter named by the configuration.
pub fn make_adapter(cfg: &BridgeConfig) -> Arc<dyn BrokerAdapter> {
    match cfg.adapter {
        AdapterKind::Simulator => Arc::new(SimAdapter::new()),
        AdapterKind::Stub => Arc::new(StubAdapter),
        AdapterKind::Worker => Arc::new(WorkerAdapter::new(cfg)),
    }
}
