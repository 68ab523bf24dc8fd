//! Request model - command vocabularies and the OrderRequest value

use serde::{Deserialize, Serialize};

/// Trading command carried by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    Place,
    Cancel,
    CancelAllOrders,
    Change,
    ClosePosition,
    CloseStrategy,
    FlattenEverything,
    ReversePosition,
    Unknown,
}

impl Command {
    /// Case-insensitive exact match; anything else is `Unknown`. Total, never fails.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "PLACE" => Command::Place,
            "CANCEL" => Command::Cancel,
            "CANCELALLORDERS" => Command::CancelAllOrders,
            "CHANGE" => Command::Change,
            "CLOSEPOSITION" => Command::ClosePosition,
            "CLOSESTRATEGY" => Command::CloseStrategy,
            "FLATTENEVERYTHING" => Command::FlattenEverything,
            "REVERSEPOSITION" => Command::ReversePosition,
            _ => Command::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Unknown,
}

impl Action {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Action::Buy,
            "SELL" => Action::Sell,
            _ => Action::Unknown,
        }
    }

    /// BUY↔SELL; `Unknown` stays `Unknown`.
    pub fn flipped(self) -> Self {
        match self {
            Action::Buy => Action::Sell,
            Action::Sell => Action::Buy,
            Action::Unknown => Action::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
    StopMarket,
    StopLimit,
    Unknown,
}

impl OrderType {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" => OrderType::Market,
            "LIMIT" => OrderType::Limit,
            "STOPMARKET" => OrderType::StopMarket,
            "STOPLIMIT" => OrderType::StopLimit,
            _ => OrderType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::StopMarket => "STOPMARKET",
            OrderType::StopLimit => "STOPLIMIT",
            OrderType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    Day,
    Gtc,
    Unknown,
}

impl TimeInForce {
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "DAY" => TimeInForce::Day,
            "GTC" => TimeInForce::Gtc,
            _ => TimeInForce::Unknown,
        }
    }
}

/// One trading request as handed to an adapter.
///
/// A freshly built request may carry any values including the `Unknown`
/// sentinels; only requests that passed `validate::validate_request` satisfy
/// the per-command field rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub command: Command,
    pub account: String,
    pub instrument: String,
    pub action: Action,
    pub quantity: i32,
    pub order_type: OrderType,
    pub limit_price: f64,
    pub stop_price: f64,
    pub time_in_force: TimeInForce,
}

impl Default for OrderRequest {
    fn default() -> Self {
        Self {
            command: Command::Unknown,
            account: String::new(),
            instrument: String::new(),
            action: Action::Unknown,
            quantity: 0,
            order_type: OrderType::Unknown,
            limit_price: 0.0,
            stop_price: 0.0,
            time_in_force: TimeInForce::Unknown,
        }
    }
}
