use sqlx::{Connection, PgConnection};
use tracing::info;

use crate::error::{EtlError, Result};
use crate::queries::{create_table_queries, drop_table_queries};

/// Opens the single connection the ETL runs on.
pub async fn connect(database_url: &str) -> Result<PgConnection> {
    PgConnection::connect(database_url)
        .await
        .map_err(EtlError::Connect)
}

pub async fn close(conn: PgConnection) -> Result<()> {
    conn.close().await?;
    Ok(())
}

pub async fn drop_tables(conn: &mut PgConnection) -> Result<()> {
    for statement in drop_table_queries() {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

pub async fn create_tables(conn: &mut PgConnection) -> Result<()> {
    for statement in create_table_queries() {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

/// Drops and recreates every table in one transaction.
pub async fn reset_tables(conn: &mut PgConnection) -> Result<()> {
    let mut tx = conn.begin().await?;
    drop_tables(&mut *tx).await?;
    create_tables(&mut *tx).await?;
    tx.commit().await?;
    info!("Sparkify tables recreated");
    Ok(())
}
