//! In-memory simulator back-end with an append-only order book.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::adapter::BrokerAdapter;
use crate::error::{BridgeError, Result};
use crate::types::{Action, Command, OrderRequest, OrderType, TimeInForce};

/// One simulated order. Never removed from the log; `working` goes
/// true→false on a cancel sub-step and never back.
#[derive(Debug, Clone)]
pub struct SimOrder {
    pub order_id: String,
    pub account: String,
    pub instrument: String,
    pub action: Action,
    pub quantity: i32,
    pub order_type: OrderType,
    pub limit_price: f64,
    pub stop_price: f64,
    pub time_in_force: TimeInForce,
    pub working: bool,
}

#[derive(Default)]
struct Book {
    orders: Vec<SimOrder>,
    next_id: u64,
}

impl Book {
    fn place(&mut self, req: &OrderRequest) {
        self.next_id += 1;
        let order = SimOrder {
            order_id: format!("MOCK-{}", self.next_id),
            account: req.account.clone(),
            instrument: req.instrument.clone(),
            action: req.action,
            quantity: req.quantity,
            order_type: req.order_type,
            limit_price: req.limit_price,
            stop_price: req.stop_price,
            time_in_force: req.time_in_force,
            working: true,
        };
        debug!(id = %order.order_id, account = %order.account, instrument = %order.instrument, "sim place");
        self.orders.push(order);
    }

    fn cancel_matching(&mut self, account: &str, instrument: Option<&str>) {
        for order in &mut self.orders {
            if order.account == account
                && instrument.is_none_or(|i| order.instrument == i)
            {
                order.working = false;
            }
        }
    }

    fn flatten(&mut self) {
        for order in &mut self.orders {
            order.working = false;
        }
    }
}

/// Order-book state machine; all eight commands, one lock per command.
pub struct SimAdapter {
    book: Mutex<Book>,
}

impl SimAdapter {
    pub fn new() -> Self {
        Self {
            book: Mutex::new(Book {
                orders: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Snapshot of the order log in insertion order.
    pub fn orders(&self) -> Vec<SimOrder> {
        self.book.lock().orders.clone()
    }

    /// Clear the log and restart ids at 1; for test isolation between scenarios.
    pub fn reset(&self) {
        let mut book = self.book.lock();
        book.orders.clear();
        book.next_id = 0;
    }

    fn apply(&self, req: &OrderRequest) -> Result<()> {
        let mut book = self.book.lock();
        match req.command {
            Command::Place => book.place(req),
            Command::Cancel => book.cancel_matching(&req.account, Some(&req.instrument)),
            Command::CancelAllOrders => book.cancel_matching(&req.account, None),
            Command::Change => {
                book.cancel_matching(&req.account, Some(&req.instrument));
                book.place(req);
            }
            Command::ClosePosition => book.cancel_matching(&req.account, Some(&req.instrument)),
            // Global close, not scoped to the request; preserved observed behavior.
            Command::CloseStrategy | Command::FlattenEverything => book.flatten(),
            Command::ReversePosition => {
                book.cancel_matching(&req.account, Some(&req.instrument));
                let mut reversed = req.clone();
                reversed.action = req.action.flipped();
                book.place(&reversed);
            }
            // Upstream validation already rejects this; defensive.
            Command::Unknown => return Err(BridgeError::InvalidCommand),
        }
        Ok(())
    }
}

impl Default for SimAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrokerAdapter for SimAdapter {
    async fn execute(&self, req: &OrderRequest) -> Result<()> {
        self.apply(req)
    }

    fn is_connected(&self) -> bool {
        true
    }
}
