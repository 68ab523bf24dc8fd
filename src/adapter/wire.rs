//! Worker wire protocol - newline-terminated UTF-8 text lines.

use crate::types::OrderRequest;

/// Liveness probe and its only accepted reply.
pub const PING: &str = "PING";
pub const PONG: &str = "PONG";

/// Graceful-termination request understood by the worker.
pub const SHUTDOWN: &str = "SHUTDOWN";

/// Serialize a PLACE request into one whitespace-delimited command line.
pub fn encode_place(req: &OrderRequest) -> String {
    format!(
        "PLACE symbol={} account={} qty={} price={} side={} type={}",
        req.instrument,
        req.account,
        req.quantity,
        req.limit_price,
        req.action.as_str(),
        req.order_type.as_str(),
    )
}

/// A reply line signals success iff its text starts with `OK`.
pub fn is_ok(reply: &str) -> bool {
    reply.starts_with("OK")
}
