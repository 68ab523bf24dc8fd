//! Dispatch façade - one adapter, selected once, owned for the process lifetime.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::adapter::{BrokerAdapter, make_adapter};
use crate::config::BridgeConfig;
use crate::error::ReturnCode;
use crate::types::OrderRequest;

/// Routes validated requests into the configured back-end.
pub struct Engine {
    adapter: Arc<dyn BrokerAdapter>,
}

impl Engine {
    /// Build the engine with the adapter named by the configuration.
    pub fn from_config(cfg: &BridgeConfig) -> Self {
        info!(adapter = ?cfg.adapter, "engine initialising");
        Self {
            adapter: make_adapter(cfg),
        }
    }

    /// Build the engine over an explicit adapter; used by hosts and tests
    /// that keep their own handle on the back-end.
    pub fn with_adapter(adapter: Arc<dyn BrokerAdapter>) -> Self {
        Self { adapter }
    }

    /// Execute a request against the owned adapter.
    ///
    /// This is the fault boundary: a panic raised anywhere inside the
    /// adapter call is caught here and reported as InternalError instead of
    /// propagating into the host.
    pub async fn execute(&self, req: &OrderRequest) -> ReturnCode {
        let call = AssertUnwindSafe(self.adapter.execute(req));
        match call.catch_unwind().await {
            Ok(Ok(())) => {
                info!(command = ?req.command, "execute succeeded");
                ReturnCode::Success
            }
            Ok(Err(e)) => {
                let code = e.code();
                warn!(command = ?req.command, %code, error = %e, "execute failed");
                code
            }
            Err(_) => {
                error!(command = ?req.command, "panic during execute");
                ReturnCode::InternalError
            }
        }
    }

    /// Mirrors the adapter's own connectivity state.
    pub fn is_connected(&self) -> bool {
        self.adapter.is_connected()
    }
}
