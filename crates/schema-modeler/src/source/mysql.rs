//! MySQL/MariaDB schema source.
//!
//! Reads metadata from `INFORMATION_SCHEMA` through an SQLx connection pool.
//! Column types are taken from `COLUMN_TYPE` so that length, `unsigned` and
//! enum entries reach the type decoder intact.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow, MySqlSslMode};
use sqlx::Row;
use tracing::{debug, info};

use crate::config::SourceConfig;
use super::{group_index_rows, single_column_fks};
use crate::core::schema::{ForeignKeyFact, IndexFact, IndexField, RawColumn};
use crate::core::traits::SchemaSource;
use crate::error::{ModelerError, Result};

/// Connection pool timeout.
const POOL_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// MySQL/MariaDB schema source.
pub struct MysqlSource {
    pool: MySqlPool,
    database: String,
}

impl MysqlSource {
    /// Connect using the `source` section of the configuration.
    pub async fn new(config: &SourceConfig, max_conns: usize) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(MySqlSslMode::Preferred);

        let pool = MySqlPoolOptions::new()
            .max_connections(max_conns.max(1) as u32)
            .acquire_timeout(POOL_CONNECTION_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| ModelerError::Source(format!("creating MySQL pool: {}", e)))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| ModelerError::Source(format!("testing MySQL connection: {}", e)))?;

        info!(
            "Connected to MySQL source: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self {
            pool,
            database: config.database.clone(),
        })
    }

    async fn fetch(&self, table: &str, query: &str) -> Result<Vec<MySqlRow>> {
        sqlx::query(query)
            .bind(&self.database)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ModelerError::table_metadata(table, e))
    }
}

fn get<'r, T>(row: &'r MySqlRow, table: &str, column: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::MySql> + sqlx::Type<sqlx::MySql>,
{
    row.try_get(column)
        .map_err(|e| ModelerError::table_metadata(table, e))
}

#[async_trait]
impl SchemaSource for MysqlSource {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let query = r#"
            SELECT CAST(TABLE_NAME AS CHAR(255)) AS TABLE_NAME
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
        "#;

        let rows: Vec<MySqlRow> = sqlx::query(query)
            .bind(&self.database)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ModelerError::Source(format!("listing MySQL tables: {}", e)))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("TABLE_NAME")
                    .map_err(|e| ModelerError::Source(format!("listing MySQL tables: {}", e)))
            })
            .collect()
    }

    async fn load_columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        let query = r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(COLUMN_TYPE AS CHAR(4096)) AS COLUMN_TYPE,
                CAST(IF(IS_NULLABLE = 'YES', 1, 0) AS SIGNED) AS is_nullable,
                CAST(IF(COLUMN_KEY = 'PRI', 1, 0) AS SIGNED) AS is_primary,
                CAST(IF(EXTRA LIKE '%auto_increment%', 1, 0) AS SIGNED) AS is_identity,
                CAST(COLUMN_DEFAULT AS CHAR(4096)) AS COLUMN_DEFAULT,
                CAST(COLUMN_COMMENT AS CHAR(2048)) AS COLUMN_COMMENT
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;

        let rows = self.fetch(table, query).await?;
        if rows.is_empty() {
            return Err(ModelerError::table_metadata(table, "table has no columns or does not exist"));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            let default: Option<String> = get(row, table, "COLUMN_DEFAULT")?;
            let comment: Option<String> = get(row, table, "COLUMN_COMMENT")?;
            columns.push(RawColumn {
                name: get(row, table, "COLUMN_NAME")?,
                data_type: get(row, table, "COLUMN_TYPE")?,
                nullable: get::<i64>(row, table, "is_nullable")? == 1,
                primary_key: get::<i64>(row, table, "is_primary")? == 1,
                default_value: default.map(serde_json::Value::String),
                auto_increment: get::<i64>(row, table, "is_identity")? == 1,
                comment: comment.filter(|c| !c.is_empty()),
            });
        }

        debug!("{}: loaded {} columns", table, columns.len());
        Ok(columns)
    }

    async fn load_indexes(&self, table: &str) -> Result<Vec<IndexFact>> {
        let query = r#"
            SELECT
                CAST(INDEX_NAME AS CHAR(255)) AS INDEX_NAME,
                CAST(NON_UNIQUE AS SIGNED) AS NON_UNIQUE,
                CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(SUB_PART AS SIGNED) AS SUB_PART,
                CAST(COLLATION AS CHAR(1)) AS COLLATION
            FROM INFORMATION_SCHEMA.STATISTICS
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            ORDER BY INDEX_NAME, SEQ_IN_INDEX
        "#;

        let rows = self.fetch(table, query).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = get(row, table, "INDEX_NAME")?;
            // Expression indexes have no column name.
            let Some(column) = get::<Option<String>>(row, table, "COLUMN_NAME")? else {
                continue;
            };
            let sub_part: Option<i64> = get(row, table, "SUB_PART")?;
            let collation: Option<String> = get(row, table, "COLLATION")?;

            let field = IndexField {
                attribute: column,
                length: sub_part.and_then(|n| u32::try_from(n).ok()),
                order: collation.map(|c| if c == "D" { "DESC" } else { "ASC" }.to_string()),
            };

            let unique = get::<i64>(row, table, "NON_UNIQUE")? == 0;
            entries.push((name, unique, field));
        }

        let indexes = group_index_rows(entries);

        debug!("{}: loaded {} indexes", table, indexes.len());
        Ok(indexes)
    }

    async fn load_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyFact>> {
        let query = r#"
            SELECT
                CAST(k.CONSTRAINT_NAME AS CHAR(255)) AS CONSTRAINT_NAME,
                CAST(k.COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
                CAST(k.REFERENCED_TABLE_NAME AS CHAR(255)) AS REFERENCED_TABLE_NAME,
                CAST(k.REFERENCED_COLUMN_NAME AS CHAR(255)) AS REFERENCED_COLUMN_NAME,
                CAST(r.DELETE_RULE AS CHAR(64)) AS DELETE_RULE,
                CAST(r.UPDATE_RULE AS CHAR(64)) AS UPDATE_RULE
            FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE k
            JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS r
                ON r.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
                AND r.CONSTRAINT_NAME = k.CONSTRAINT_NAME
                AND r.TABLE_NAME = k.TABLE_NAME
            WHERE k.TABLE_SCHEMA = ? AND k.TABLE_NAME = ?
                AND k.REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY k.CONSTRAINT_NAME, k.ORDINAL_POSITION
        "#;

        let rows = self.fetch(table, query).await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            let constraint: String = get(row, table, "CONSTRAINT_NAME")?;
            let fk = ForeignKeyFact {
                column_name: get(row, table, "COLUMN_NAME")?,
                referenced_table_name: get(row, table, "REFERENCED_TABLE_NAME")?,
                referenced_column_name: get(row, table, "REFERENCED_COLUMN_NAME")?,
                constraint_name: Some(constraint.clone()),
                on_delete: get(row, table, "DELETE_RULE")?,
                on_update: get(row, table, "UPDATE_RULE")?,
            };
            entries.push((constraint, fk));
        }

        let foreign_keys = single_column_fks(table, entries);

        debug!("{}: loaded {} foreign keys", table, foreign_keys.len());
        Ok(foreign_keys)
    }

    fn db_type(&self) -> &str {
        "mysql"
    }
}
