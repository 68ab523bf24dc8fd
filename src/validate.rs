//! Per-command acceptance rules for order requests.

use crate::error::{BridgeError, Result};
use crate::types::{Action, Command, OrderRequest, OrderType, TimeInForce};

/// Validate a fully populated request against the per-command field rules.
///
/// Pure function: no side effects, never panics. Every rejection resolves to
/// InvalidCommand or InvalidParam.
pub fn validate_request(req: &OrderRequest) -> Result<()> {
    if req.command == Command::Unknown {
        return Err(BridgeError::InvalidCommand);
    }

    let needs_scope = matches!(
        req.command,
        Command::Place
            | Command::Cancel
            | Command::Change
            | Command::ClosePosition
            | Command::CloseStrategy
            | Command::ReversePosition
    );
    if needs_scope {
        if req.account.is_empty() {
            return Err(BridgeError::InvalidParam("account is empty".into()));
        }
        if req.instrument.is_empty() {
            return Err(BridgeError::InvalidParam("instrument is empty".into()));
        }
    }

    // CANCELALLORDERS and FLATTENEVERYTHING need none of the order fields.
    if matches!(req.command, Command::Place | Command::Change) {
        if req.action == Action::Unknown {
            return Err(BridgeError::InvalidParam("action is unknown".into()));
        }
        if req.quantity <= 0 {
            return Err(BridgeError::InvalidParam(format!(
                "quantity must be positive, got {}",
                req.quantity
            )));
        }
        if req.order_type == OrderType::Unknown {
            return Err(BridgeError::InvalidParam("order type is unknown".into()));
        }
        if req.time_in_force == TimeInForce::Unknown {
            return Err(BridgeError::InvalidParam("time in force is unknown".into()));
        }
        if matches!(req.order_type, OrderType::Limit | OrderType::StopLimit)
            && req.limit_price <= 0.0
        {
            return Err(BridgeError::InvalidParam(format!(
                "limit price must be positive for {}",
                req.order_type.as_str()
            )));
        }
        if matches!(req.order_type, OrderType::StopMarket | OrderType::StopLimit)
            && req.stop_price <= 0.0
        {
            return Err(BridgeError::InvalidParam(format!(
                "stop price must be positive for {}",
                req.order_type.as_str()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReturnCode;

    fn place_req() -> OrderRequest {
        OrderRequest {
            command: Command::Place,
            account: "ACC1".into(),
            instrument: "ES".into(),
            action: Action::Buy,
            quantity: 1,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Day,
            ..OrderRequest::default()
        }
    }

    fn code_of(req: &OrderRequest) -> ReturnCode {
        ReturnCode::from_result(&validate_request(req))
    }

    #[test]
    fn valid_place() {
        assert_eq!(code_of(&place_req()), ReturnCode::Success);
    }

    #[test]
    fn unknown_command_rejected() {
        let req = OrderRequest::default();
        assert_eq!(code_of(&req), ReturnCode::InvalidCommand);
    }

    #[test]
    fn place_missing_account() {
        let mut req = place_req();
        req.account.clear();
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn place_missing_instrument() {
        let mut req = place_req();
        req.instrument.clear();
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn place_zero_or_negative_quantity() {
        let mut req = place_req();
        req.quantity = 0;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
        req.quantity = -5;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn place_unknown_action() {
        let mut req = place_req();
        req.action = Action::Unknown;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn place_unknown_time_in_force() {
        let mut req = place_req();
        req.time_in_force = TimeInForce::Unknown;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn limit_requires_limit_price() {
        let mut req = place_req();
        req.order_type = OrderType::Limit;
        req.limit_price = 0.0;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
        req.limit_price = 4200.25;
        assert_eq!(code_of(&req), ReturnCode::Success);
    }

    #[test]
    fn stop_limit_requires_both_prices() {
        let mut req = place_req();
        req.order_type = OrderType::StopLimit;
        req.limit_price = 100.0;
        req.stop_price = 0.0;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
        req.stop_price = 99.5;
        assert_eq!(code_of(&req), ReturnCode::Success);
        req.limit_price = 0.0;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn stop_market_requires_stop_price() {
        let mut req = place_req();
        req.order_type = OrderType::StopMarket;
        req.stop_price = -1.0;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
        req.stop_price = 99.5;
        assert_eq!(code_of(&req), ReturnCode::Success);
    }

    #[test]
    fn change_uses_place_rules() {
        let mut req = place_req();
        req.command = Command::Change;
        assert_eq!(code_of(&req), ReturnCode::Success);
        req.quantity = 0;
        assert_eq!(code_of(&req), ReturnCode::InvalidParam);
    }

    #[test]
    fn cancel_needs_account_and_instrument_only() {
        let req = OrderRequest {
            command: Command::Cancel,
            account: "ACC1".into(),
            instrument: "ES".into(),
            ..OrderRequest::default()
        };
        assert_eq!(code_of(&req), ReturnCode::Success);

        let mut missing = req.clone();
        missing.instrument.clear();
        assert_eq!(code_of(&missing), ReturnCode::InvalidParam);
    }

    #[test]
    fn flatten_everything_needs_nothing() {
        let req = OrderRequest {
            command: Command::FlattenEverything,
            ..OrderRequest::default()
        };
        assert_eq!(code_of(&req), ReturnCode::Success);
    }

    #[test]
    fn cancel_all_orders_needs_nothing_extra() {
        let req = OrderRequest {
            command: Command::CancelAllOrders,
            ..OrderRequest::default()
        };
        assert_eq!(code_of(&req), ReturnCode::Success);
    }
}
