//! Stub back-end for a connectivity path that is declared but not built.

use async_trait::async_trait;

use crate::adapter::BrokerAdapter;
use crate::error::{BridgeError, Result};
use crate::types::OrderRequest;

/// Never connects, performs no I/O, refuses every request.
pub struct StubAdapter;

#[async_trait]
impl BrokerAdapter for StubAdapter {
    async fn execute(&self, _req: &OrderRequest) -> Result<()> {
        Err(BridgeError::NotConnected)
    }

    fn is_connected(&self) -> bool {
        false
    }
}
