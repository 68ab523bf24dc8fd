//! Payload parsing - turns delimited text or positional fields into an OrderRequest.

use crate::error::{BridgeError, Result};
use crate::types::{Action, Command, OrderRequest, OrderType, TimeInForce};
use crate::validate::validate_request;

/// Parse a pipe-delimited `KEY=VALUE` payload into a validated request.
///
/// Unrecognized keys are ignored; the last occurrence of a repeated key wins.
/// A non-numeric QUANTITY, LIMITPRICE or STOPPRICE fails the whole parse with
/// InvalidParam. The request is always run through the validator before being
/// returned.
pub fn parse_payload(payload: &str) -> Result<OrderRequest> {
    let mut req = OrderRequest::default();

    for token in payload.split('|') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();

        match key.as_str() {
            "COMMAND" => req.command = Command::parse(value),
            "ACCOUNT" => req.account = value.to_string(),
            "INSTRUMENT" => req.instrument = value.to_string(),
            "ACTION" => req.action = Action::parse(value),
            "QUANTITY" => {
                req.quantity = value.parse().map_err(|_| {
                    BridgeError::InvalidParam(format!("quantity is not an integer: {value}"))
                })?;
            }
            "ORDERTYPE" => req.order_type = OrderType::parse(value),
            "LIMITPRICE" => {
                req.limit_price = value.parse().map_err(|_| {
                    BridgeError::InvalidParam(format!("limit price is not numeric: {value}"))
                })?;
            }
            "STOPPRICE" => {
                req.stop_price = value.parse().map_err(|_| {
                    BridgeError::InvalidParam(format!("stop price is not numeric: {value}"))
                })?;
            }
            "TIMEINFORCE" => req.time_in_force = TimeInForce::parse(value),
            _ => {}
        }
    }

    validate_request(&req)?;
    Ok(req)
}

/// Build a request from already-split fields.
///
/// The platform shim converts native strings and passes empty strings for
/// absent arguments; an absent command therefore parses to `Unknown`, which
/// validation rejects as InvalidCommand rather than a parameter error.
#[allow(clippy::too_many_arguments)]
pub fn build_request(
    command: &str,
    account: &str,
    instrument: &str,
    action: &str,
    quantity: i32,
    order_type: &str,
    limit_price: f64,
    stop_price: f64,
    time_in_force: &str,
) -> Result<OrderRequest> {
    let req = OrderRequest {
        command: Command::parse(command),
        account: account.to_string(),
        instrument: instrument.to_string(),
        action: Action::parse(action),
        quantity,
        order_type: OrderType::parse(order_type),
        limit_price,
        stop_price,
        time_in_force: TimeInForce::parse(time_in_force),
    };
    validate_request(&req)?;
    Ok(req)
}
