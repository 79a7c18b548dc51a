// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "DeCoFi", "decofi"));

pub fn sandbox_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("sandbox.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    let conn =
        Connection::open(path).with_context(|| format!("Open sandbox DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- amounts as decimal text, timestamps as nanosecond text (u64)
    CREATE TABLE IF NOT EXISTS loans(
        id TEXT PRIMARY KEY,
        principal TEXT NOT NULL,
        amount TEXT NOT NULL,
        term_months INTEGER NOT NULL,
        interest_rate TEXT NOT NULL,
        purpose TEXT NOT NULL,
        application_date TEXT NOT NULL,
        status TEXT NOT NULL,
        approval_date TEXT,
        collateral_amount TEXT,
        credit_score INTEGER,
        monthly_payment TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_loans_principal ON loans(principal);

    CREATE TABLE IF NOT EXISTS payments(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        loan_id TEXT NOT NULL,
        principal TEXT NOT NULL,
        amount TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        status TEXT NOT NULL,
        FOREIGN KEY(loan_id) REFERENCES loans(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_payments_loan ON payments(loan_id);

    CREATE TABLE IF NOT EXISTS balances(
        principal TEXT PRIMARY KEY,
        tokens TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}
