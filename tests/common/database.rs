//! Throwaway Postgres schema for tests that need a real database.
//!
//! Set `DATABASE_URL` to run them; without it they pass without doing
//! anything. Each test gets its own schema with `sql/*.sql` loaded.
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};

const TENANT_SCHEMA: &str = include_str!("../../sql/tenant_schema.sql");
const MAIN_SCHEMA: &str = include_str!("../../sql/main_schema.sql");

static NEXT_SCHEMA: AtomicU32 = AtomicU32::new(0);

pub struct TestDatabase {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestDatabase {
    /// `None` when `DATABASE_URL` is unset
    pub async fn create(test: &str) -> Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping {}", test);
            return Ok(None);
        };

        let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.subsec_nanos();
        let schema = format!(
            "pmd_test_{}_{}_{}",
            std::process::id(),
            NEXT_SCHEMA.fetch_add(1, Ordering::SeqCst),
            nanos
        );

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .context("failed to connect to DATABASE_URL")?;
        admin.execute(format!("CREATE SCHEMA {}", schema).as_str()).await?;

        let options = PgConnectOptions::from_str(&url)?.options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new().max_connections(4).connect_with(options).await?;

        pool.execute(MAIN_SCHEMA).await.context("failed to load main_schema.sql")?;
        pool.execute(TENANT_SCHEMA).await.context("failed to load tenant_schema.sql")?;

        Ok(Some(Self { pool, admin, schema }))
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn cleanup(self) -> Result<()> {
        self.pool.close().await;
        self.admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await?;
        self.admin.close().await;
        Ok(())
    }
}
