//! ClickHouse database backend over the HTTP interface

use crate::error::{DbError, DbResult};
use crate::settings::DbSettings;
use crate::traits::{Database, Row};
use async_trait::async_trait;
use reqwest::Client;

const USER_HEADER: &str = "X-ClickHouse-User";
const KEY_HEADER: &str = "X-ClickHouse-Key";

/// ClickHouse database backend
pub struct ClickHouseBackend {
    client: Client,
    settings: DbSettings,
}

impl ClickHouseBackend {
    /// Create a backend for the given settings.
    ///
    /// No request is made until the first statement runs.
    pub fn new(settings: DbSettings) -> DbResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DbError::ConnectionError(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    /// Settings this backend was created with
    pub fn settings(&self) -> &DbSettings {
        &self.settings
    }

    /// POST `body` and return the response text
    async fn post(&self, body: String, context: &str) -> DbResult<String> {
        let mut request = self
            .client
            .post(self.settings.endpoint())
            .header(USER_HEADER, &self.settings.user)
            .header(KEY_HEADER, &self.settings.password);
        if let Some(database) = &self.settings.database {
            request = request.query(&[("database", database)]);
        }

        let response = request.body(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(DbError::ExecutionError(format!(
                "{} (HTTP {}): {}",
                text.trim(),
                status.as_u16(),
                context
            )));
        }
        Ok(text)
    }
}

/// Drop the trailing `;` so a `FORMAT` clause can follow the query
fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// Decode a `JSONEachRow` response body
fn parse_json_each_row(body: &str) -> DbResult<Vec<Row>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match serde_json::from_str::<serde_json::Value>(line) {
            Ok(serde_json::Value::Object(row)) => Ok(row),
            Ok(other) => Err(DbError::MalformedResult(format!(
                "expected a JSON object per row, got {other}"
            ))),
            Err(e) => Err(DbError::MalformedResult(format!("{e}: {line}"))),
        })
        .collect()
}

/// Encode rows as a `JSONEachRow` body, one object per line
fn encode_json_each_row(rows: &[Row]) -> String {
    rows.iter()
        .map(|row| serde_json::Value::Object(row.clone()).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Database for ClickHouseBackend {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        log::debug!("Executing: {sql}");
        self.post(sql.to_string(), sql).await?;
        Ok(())
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        let query = format!("{} FORMAT JSONEachRow", strip_terminator(sql));
        log::debug!("Querying: {query}");
        let body = self.post(query, sql).await?;
        parse_json_each_row(&body)
    }

    async fn insert_rows(&self, table: &str, rows: &[Row]) -> DbResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let statement = format!("INSERT INTO {table} FORMAT JSONEachRow");
        let body = format!("{statement}\n{}\n", encode_json_each_row(rows));
        log::debug!("Inserting {} row(s) into {table}", rows.len());
        self.post(body, &statement).await?;
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "clickhouse"
    }
}

#[cfg(test)]
#[path = "clickhouse_test.rs"]
mod tests;
