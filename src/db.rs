// src/db.rs - Database migrations and setup

use sqlx::SqlitePool;
use anyhow::Result;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Dhaan collection events
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dhaan_records (
            id TEXT PRIMARY KEY,
            quantity REAL NOT NULL CHECK(quantity >= 0),
            farmer TEXT NOT NULL CHECK(length(farmer) > 0 AND length(farmer) <= 255),
            location TEXT NOT NULL CHECK(length(location) > 0 AND length(location) <= 255),
            date DATETIME NOT NULL,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    // Chuira production batches
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chuira_records (
            id TEXT PRIMARY KEY,
            batch_id TEXT NOT NULL UNIQUE CHECK(length(batch_id) > 0 AND length(batch_id) <= 100),
            produced REAL NOT NULL CHECK(produced >= 0),
            bhuss REAL NOT NULL CHECK(bhuss >= 0),
            operator_name TEXT NOT NULL CHECK(length(operator_name) > 0 AND length(operator_name) <= 255),
            status TEXT NOT NULL DEFAULT 'In Progress' CHECK(
                status IN ('In Progress', 'Completed', 'Failed')
            ),
            date DATETIME NOT NULL,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    // Payroll
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS salary_records (
            id TEXT PRIMARY KEY,
            employee_name TEXT NOT NULL CHECK(length(employee_name) > 0 AND length(employee_name) <= 255),
            salary_amount REAL NOT NULL CHECK(salary_amount >= 0),
            paid_date DATETIME NOT NULL,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    // Extra expenses
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expense_records (
            id TEXT PRIMARY KEY,
            date DATETIME NOT NULL,
            category TEXT NOT NULL CHECK(length(category) > 0 AND length(category) <= 255),
            description TEXT NOT NULL DEFAULT '' CHECK(length(description) <= 1000),
            amount REAL NOT NULL CHECK(amount >= 0),
            status TEXT NOT NULL DEFAULT 'Pending' CHECK(
                status IN ('Pending', 'Approved', 'Rejected')
            ),
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    // Sales; total_price is stored as supplied by the client
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sales_records (
            id TEXT PRIMARY KEY,
            order_id INTEGER NOT NULL UNIQUE CHECK(order_id > 0),
            date DATETIME NOT NULL,
            quantity REAL NOT NULL CHECK(quantity >= 0),
            price_per_kg REAL NOT NULL CHECK(price_per_kg >= 0),
            total_price REAL NOT NULL CHECK(total_price >= 0),
            customer_name TEXT NOT NULL CHECK(length(customer_name) > 0 AND length(customer_name) <= 255),
            status TEXT NOT NULL DEFAULT 'Pending' CHECK(
                status IN ('Pending', 'Completed', 'Canceled')
            ),
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
        .execute(pool)
        .await?;

    create_indexes(pool).await?;

    log::info!("Database migrations completed");
    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_dhaan_created_at ON dhaan_records(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_dhaan_date ON dhaan_records(date)",
        "CREATE INDEX IF NOT EXISTS idx_chuira_created_at ON chuira_records(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_chuira_status ON chuira_records(status)",
        "CREATE INDEX IF NOT EXISTS idx_salary_created_at ON salary_records(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_salary_paid_date ON salary_records(paid_date)",
        "CREATE INDEX IF NOT EXISTS idx_expense_created_at ON expense_records(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_expense_status ON expense_records(status)",
        "CREATE INDEX IF NOT EXISTS idx_sales_created_at ON sales_records(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_sales_status ON sales_records(status)",
    ];

    for sql in indexes {
        sqlx::query(sql).execute(pool).await?;
    }

    Ok(())
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}
