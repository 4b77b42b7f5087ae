//! Services against a real Postgres schema loaded from `sql/*.sql`.
//! Skipped unless `DATABASE_URL` is set.

mod common;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::Executor;

use common::database::TestDatabase;
use paymydine_api::config::MediaConfig;
use paymydine_api::database::models::{
    MenuFilter, MenuPrice, NewOrder, NewWaiterCall, OrderItem, OrderLine, OrderTotals,
};
use paymydine_api::database::DatabaseError;
use paymydine_api::services::order_service::{
    place_order, OrderStore, OrderTransaction, PgOrderStore, PgOrderTransaction, STATUS_PREPARING,
};
use paymydine_api::services::{
    MediaLibrary, MenuService, OrderError, OrderService, PublicTheme, TableRef, TableService, ThemeService,
    ThemeSettings,
};
use paymydine_api::tenant::{PgTenantDirectory, TenantDirectory};

macro_rules! test_db {
    ($name:expr) => {
        match TestDatabase::create($name).await? {
            Some(db) => db,
            None => return Ok(()),
        }
    };
}

fn decimal(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Soup 4.50, Steak 21.00, and a disabled Special
async fn seed_menu(db: &TestDatabase) -> Result<()> {
    db.pool
        .execute(
            r#"
        INSERT INTO ti_categories (category_id, name, priority) VALUES (1, 'Starters', 1), (2, 'Mains', 2);
        INSERT INTO ti_menus (menu_id, menu_name, menu_description, menu_price, menu_status, sort_order) VALUES
            (1, 'Soup', 'Tomato soup of the day', 4.50, true, 1),
            (2, 'Steak', 'Grilled sirloin', 21.00, true, 2),
            (3, 'Special', 'Chef special', 30.00, false, 3);
        INSERT INTO ti_menu_categories (menu_id, category_id) VALUES (1, 1), (2, 2), (3, 2);
        "#,
        )
        .await?;
    Ok(())
}

fn table_order(items: Vec<OrderItem>) -> NewOrder {
    NewOrder {
        customer_name: "Table 7 Customer".to_string(),
        table_name: "Table 7".to_string(),
        payment_method: "cash".to_string(),
        items,
    }
}

fn item(menu_id: i64, quantity: i32) -> OrderItem {
    OrderItem { menu_id, quantity }
}

#[tokio::test]
async fn order_commit_writes_order_lines_and_totals() -> Result<()> {
    let db = test_db!("order_commit_writes_order_lines_and_totals");
    seed_menu(&db).await?;

    let placed = OrderService::new(db.pool.clone())
        .place(&table_order(vec![item(1, 2), item(2, 1)]))
        .await?;

    assert_eq!(placed.total, decimal("30.00"));
    assert_eq!(placed.total_items, 3);
    assert_eq!(db.count("ti_orders").await?, 1);
    assert_eq!(db.count("ti_order_menus").await?, 2);
    assert_eq!(db.count("ti_order_totals").await?, 2);

    let lines: Vec<(String, Decimal, Decimal)> =
        sqlx::query_as("SELECT name, price, subtotal FROM ti_order_menus WHERE order_id = $1 ORDER BY menu_id")
            .bind(placed.order_id)
            .fetch_all(&db.pool)
            .await?;
    assert_eq!(lines[0], ("Soup".to_string(), decimal("4.50"), decimal("9.00")));
    assert_eq!(lines[1], ("Steak".to_string(), decimal("21.00"), decimal("21.00")));

    let totals: Vec<(String, String, Decimal, i32)> =
        sqlx::query_as("SELECT code, title, value, priority FROM ti_order_totals WHERE order_id = $1 ORDER BY priority")
            .bind(placed.order_id)
            .fetch_all(&db.pool)
            .await?;
    assert_eq!(
        totals,
        vec![
            ("subtotal".to_string(), "Subtotal".to_string(), decimal("30.00"), 1),
            ("total".to_string(), "Total".to_string(), decimal("30.00"), 999),
        ]
    );

    db.cleanup().await
}

#[tokio::test]
async fn unknown_and_disabled_items_are_rejected_without_rows() -> Result<()> {
    let db = test_db!("unknown_and_disabled_items_are_rejected_without_rows");
    seed_menu(&db).await?;
    let orders = OrderService::new(db.pool.clone());

    for items in [vec![item(1, 1), item(99, 1)], vec![item(3, 1)]] {
        let err = orders.place(&table_order(items)).await.unwrap_err();
        assert!(matches!(err, OrderError::Invalid(_)), "{:?}", err);
    }

    assert_eq!(db.count("ti_orders").await?, 0);
    assert_eq!(db.count("ti_order_menus").await?, 0);
    assert_eq!(db.count("ti_order_totals").await?, 0);

    db.cleanup().await
}

/// Postgres store whose transactions fail on the n-th line insert
struct FailingLineStore {
    inner: PgOrderStore,
    fail_on: usize,
}

struct FailingLineTx {
    inner: PgOrderTransaction,
    fail_on: usize,
    lines: usize,
}

#[async_trait]
impl OrderStore for FailingLineStore {
    type Tx = FailingLineTx;

    async fn begin(&self) -> Result<Self::Tx, DatabaseError> {
        Ok(FailingLineTx {
            inner: self.inner.begin().await?,
            fail_on: self.fail_on,
            lines: 0,
        })
    }
}

#[async_trait]
impl OrderTransaction for FailingLineTx {
    async fn menu_item(&mut self, menu_id: i64) -> Result<Option<MenuPrice>, DatabaseError> {
        self.inner.menu_item(menu_id).await
    }

    async fn insert_order(&mut self, order: &NewOrder, totals: &OrderTotals) -> Result<i64, DatabaseError> {
        self.inner.insert_order(order, totals).await
    }

    async fn insert_line(&mut self, order_id: i64, line: &OrderLine) -> Result<(), DatabaseError> {
        self.lines += 1;
        if self.lines == self.fail_on {
            return Err(DatabaseError::QueryError("forced line failure".to_string()));
        }
        self.inner.insert_line(order_id, line).await
    }

    async fn insert_totals(&mut self, order_id: i64, totals: &OrderTotals) -> Result<(), DatabaseError> {
        self.inner.insert_totals(order_id, totals).await
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        self.inner.commit().await
    }
}

#[tokio::test]
async fn failed_line_rolls_back_the_whole_order() -> Result<()> {
    let db = test_db!("failed_line_rolls_back_the_whole_order");
    seed_menu(&db).await?;

    let store = FailingLineStore {
        inner: PgOrderStore::new(db.pool.clone()),
        fail_on: 2,
    };
    let err = place_order(&store, &table_order(vec![item(1, 1), item(2, 1), item(1, 3)]))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Database(_)));

    assert_eq!(db.count("ti_orders").await?, 0);
    assert_eq!(db.count("ti_order_menus").await?, 0);
    assert_eq!(db.count("ti_order_totals").await?, 0);

    db.cleanup().await
}

#[tokio::test]
async fn order_status_and_table_history() -> Result<()> {
    let db = test_db!("order_status_and_table_history");
    seed_menu(&db).await?;
    let orders = OrderService::new(db.pool.clone());

    let placed = orders.place(&table_order(vec![item(2, 2)])).await?;
    let status = orders.status(placed.order_id).await?;
    assert_eq!(status.status_name, "Received");
    assert_eq!(status.customer_status, 0);

    orders.update_status(placed.order_id, STATUS_PREPARING).await?;
    let status = orders.status(placed.order_id).await?;
    assert_eq!(status.customer_status, 1);
    assert_eq!(status.status_message, "Chef is Preparing Your Meal");

    assert!(matches!(orders.update_status(424242, 3).await, Err(OrderError::NotFound(424242))));
    assert!(matches!(orders.status(424242).await, Err(OrderError::NotFound(_))));

    let history = orders.for_table(&TableRef::Id(7)).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].order_total, decimal("42.00"));
    assert_eq!(history[0].customer_status, 1);
    assert!(orders.for_table(&TableRef::Id(8)).await?.is_empty());

    let stats = orders.stats().await?;
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.preparing_orders, 1);
    assert_eq!(stats.total_revenue, decimal("42.00"));

    let recent = orders.recent(50).await?;
    assert_eq!(recent[0].item_count, 1);

    db.cleanup().await
}

fn media() -> MediaLibrary {
    let root = std::env::temp_dir().join("pmd-db-tests-missing-media");
    MediaLibrary::new(&MediaConfig {
        placeholder: root.join("pasta.png"),
        root,
        placeholder_url: "/images/pasta.png".to_string(),
    })
}

#[tokio::test]
async fn menu_lists_active_items_with_options_and_filters() -> Result<()> {
    let db = test_db!("menu_lists_active_items_with_options_and_filters");
    seed_menu(&db).await?;
    db.pool
        .execute(
            r#"
        INSERT INTO ti_menu_options (option_id, option_name, display_type) VALUES (1, 'Doneness', 'radio');
        INSERT INTO ti_menu_item_options (menu_option_id, menu_id, option_id, required, priority)
            VALUES (1, 2, 1, true, 1);
        INSERT INTO ti_menu_option_values (option_value_id, option_id, value, new_price, is_default) VALUES
            (1, 1, 'Rare', 0, false),
            (2, 1, 'Medium', 0, true),
            (3, 1, 'Well done', 1.50, false);
        INSERT INTO ti_menu_item_option_values (menu_option_id, option_value_id, priority) VALUES
            (1, 1, 1), (1, 2, 2), (1, 3, 3);
        "#,
        )
        .await?;

    let menus = MenuService::new(db.pool.clone());
    let media = media();

    let items = menus.menu(&media, &MenuFilter::default()).await?;
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Soup", "Steak"]);
    assert_eq!(items[0].image, "/images/pasta.png");
    assert!(items[0].options.is_empty());

    let steak = &items[1];
    assert_eq!(steak.options.len(), 1);
    assert_eq!(steak.options[0].name, "Doneness");
    assert!(steak.options[0].required);
    let values: Vec<&str> = steak.options[0].values.iter().map(|v| v.value.as_str()).collect();
    assert_eq!(values, vec!["Rare", "Medium", "Well done"]);
    assert!(steak.options[0].values[1].is_default);
    assert_eq!(steak.options[0].values[2].price, decimal("1.50"));

    let mains = MenuFilter {
        category_id: Some(2),
        ..MenuFilter::default()
    };
    let items = menus.menu(&media, &mains).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Steak");

    let search = MenuFilter {
        search: Some("TOMATO".to_string()),
        ..MenuFilter::default()
    };
    let items = menus.menu(&media, &search).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Soup");

    let wildcard = MenuFilter {
        search: Some("%".to_string()),
        ..MenuFilter::default()
    };
    assert!(menus.menu(&media, &wildcard).await?.is_empty());

    let categories = menus.categories().await?;
    assert_eq!(categories.len(), 2);

    db.cleanup().await
}

#[tokio::test]
async fn waiter_calls_are_recorded_pending() -> Result<()> {
    let db = test_db!("waiter_calls_are_recorded_pending");
    let tables = TableService::new(db.pool.clone());

    let id = tables
        .call_waiter(&NewWaiterCall {
            table_id: 5,
            table_name: None,
            message: Some("Water please".to_string()),
        })
        .await?;

    let calls = tables.recent_waiter_calls(20).await?;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, id);
    assert_eq!(calls[0].table_name.as_deref(), Some("Table 5"));
    assert_eq!(calls[0].status, "pending");

    db.cleanup().await
}

#[tokio::test]
async fn theme_save_is_what_load_reads() -> Result<()> {
    let db = test_db!("theme_save_is_what_load_reads");
    let themes = ThemeService::new(db.pool.clone());

    assert_eq!(themes.load().await?, ThemeSettings::default());
    assert!(matches!(
        themes.save(&ThemeSettings::default()).await,
        Err(DatabaseError::NotFound(_))
    ));

    // a disabled row without settings next to the legacy row that has them
    sqlx::query(
        r#"
        INSERT INTO ti_themes (code, name, data, status) VALUES
            ('frontend-theme', 'Frontend', NULL, false),
            ('paymydine-nextjs', 'Legacy', $1, true)
        "#,
    )
    .bind(json!({ "theme_configuration": "light", "logo": "logo.png" }))
    .execute(&db.pool)
    .await?;

    let settings = ThemeSettings {
        theme_id: PublicTheme::GoldLuxury,
        primary_color: "#C9A227".to_string(),
        ..ThemeSettings::default()
    };
    themes.save(&settings).await?;
    assert_eq!(themes.load().await?, settings);

    let logo: Option<String> =
        sqlx::query_scalar("SELECT data->>'logo' FROM ti_themes WHERE code = 'paymydine-nextjs'")
            .fetch_one(&db.pool)
            .await?;
    assert_eq!(logo.as_deref(), Some("logo.png"));

    db.cleanup().await
}

#[tokio::test]
async fn tenant_directory_matches_active_subdomains() -> Result<()> {
    let db = test_db!("tenant_directory_matches_active_subdomains");
    sqlx::query(
        r#"
        INSERT INTO ti_tenants (name, domain, database, status) VALUES
            ('Paris Bistro', 'paris.paymydine.com', 'tenant_paris', 'active'),
            ('Rome', 'rome.paymydine.com', 'tenant_rome', 'suspended')
        "#,
    )
    .execute(&db.pool)
    .await?;

    let directory = PgTenantDirectory::new(db.pool.clone());
    let found = directory.find_active("Paris").await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].database, "tenant_paris");
    assert!(directory.find_active("rome").await?.is_empty());
    assert_eq!(directory.list_active().await?.len(), 1);

    db.cleanup().await
}
