//! In-memory stand-ins for the database-backed seams, for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::database::manager::DatabaseError;
use crate::database::models::{MenuPrice, NewOrder, OrderLine, OrderTotals, Tenant};
use crate::services::order_service::{OrderStore, OrderTransaction};
use crate::tenant::{domain_matches, TenantDirectory};

/// Tenant directory backed by a fixed list
pub struct StaticTenantDirectory {
    tenants: Vec<Tenant>,
    fail: bool,
}

impl StaticTenantDirectory {
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self { tenants, fail: false }
    }

    /// Every lookup fails as if the main database were unreachable
    pub fn failing() -> Self {
        Self { tenants: Vec::new(), fail: true }
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.fail {
            return Err(DatabaseError::ConnectionError("main database unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TenantDirectory for StaticTenantDirectory {
    async fn find_active(&self, subdomain: &str) -> Result<Vec<Tenant>, DatabaseError> {
        self.check()?;
        let mut found: Vec<Tenant> = self
            .tenants
            .iter()
            .filter(|t| t.is_active() && domain_matches(&t.domain, subdomain))
            .cloned()
            .collect();
        found.sort_by_key(|t| t.id);
        Ok(found)
    }

    async fn list_active(&self) -> Result<Vec<Tenant>, DatabaseError> {
        self.check()?;
        Ok(self.tenants.iter().filter(|t| t.is_active()).cloned().collect())
    }
}

#[derive(Default)]
struct Book {
    next_id: i64,
    orders: Vec<(i64, NewOrder)>,
    lines: Vec<(i64, OrderLine)>,
    totals: Vec<(i64, OrderTotals)>,
}

/// Order store that keeps committed orders in memory and prices items from
/// a fixed menu. Can be told to fail on the n-th line insert (1-based) of
/// every order.
#[derive(Clone, Default)]
pub struct MemoryOrderBook {
    book: Arc<Mutex<Book>>,
    menu: Arc<HashMap<i64, MenuPrice>>,
    fail_on_line: Option<usize>,
}

impl MemoryOrderBook {
    pub fn with_menu(mut self, items: impl IntoIterator<Item = MenuPrice>) -> Self {
        self.menu = Arc::new(items.into_iter().map(|m| (m.menu_id, m)).collect());
        self
    }

    pub fn failing_on_line(mut self, n: usize) -> Self {
        self.fail_on_line = Some(n);
        self
    }

    pub fn order_count(&self) -> usize {
        self.book.lock().unwrap().orders.len()
    }

    pub fn line_count(&self) -> usize {
        self.book.lock().unwrap().lines.len()
    }

    /// Rows in the totals table: two per committed order
    pub fn totals_count(&self) -> usize {
        self.book.lock().unwrap().totals.len() * 2
    }

    pub fn lines_for(&self, order_id: i64) -> Vec<OrderLine> {
        self.book
            .lock()
            .unwrap()
            .lines
            .iter()
            .filter(|(id, _)| *id == order_id)
            .map(|(_, line)| line.clone())
            .collect()
    }
}

pub struct MemoryOrderTx {
    book: Arc<Mutex<Book>>,
    menu: Arc<HashMap<i64, MenuPrice>>,
    fail_on_line: Option<usize>,
    order: Option<(i64, NewOrder)>,
    lines: Vec<(i64, OrderLine)>,
    totals: Option<(i64, OrderTotals)>,
}

#[async_trait]
impl OrderStore for MemoryOrderBook {
    type Tx = MemoryOrderTx;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError> {
        Ok(MemoryOrderTx {
            book: Arc::clone(&self.book),
            menu: Arc::clone(&self.menu),
            fail_on_line: self.fail_on_line,
            order: None,
            lines: Vec::new(),
            totals: None,
        })
    }
}

#[async_trait]
impl OrderTransaction for MemoryOrderTx {
    async fn menu_item(&mut self, menu_id: i64) -> Result<Option<MenuPrice>, DatabaseError> {
        Ok(self.menu.get(&menu_id).cloned())
    }

    async fn insert_order(&mut self, order: &NewOrder, _totals: &OrderTotals) -> Result<i64, DatabaseError> {
        // ids are consumed even when the transaction is rolled back, like a sequence
        let id = {
            let mut book = self.book.lock().unwrap();
            book.next_id += 1;
            book.next_id
        };
        self.order = Some((id, order.clone()));
        Ok(id)
    }

    async fn insert_line(&mut self, order_id: i64, line: &OrderLine) -> Result<(), DatabaseError> {
        if self.fail_on_line == Some(self.lines.len() + 1) {
            return Err(DatabaseError::QueryError(format!(
                "forced failure inserting menu {}",
                line.menu_id
            )));
        }
        self.lines.push((order_id, line.clone()));
        Ok(())
    }

    async fn insert_totals(&mut self, order_id: i64, totals: &OrderTotals) -> Result<(), DatabaseError> {
        self.totals = Some((order_id, *totals));
        Ok(())
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        let mut book = self.book.lock().unwrap();
        book.orders.extend(self.order);
        book.lines.extend(self.lines);
        book.totals.extend(self.totals);
        Ok(())
    }
}
