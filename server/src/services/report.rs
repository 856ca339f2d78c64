//! CSV transaction exports.
//!
//! DESIGN
//! ======
//! The export is built as a plain string with RFC-4180 quoting and CRLF line
//! endings. An empty result still produces the header row so spreadsheet
//! imports never see a zero-byte file. Amounts are rendered in dollars at
//! this boundary only; everything upstream stays in cents.

use sqlx::{PgPool, Row};

use crate::dates;
use crate::money;

pub const CSV_HEADER: &str = "Transaction ID, Timestamp, Account Number, Transaction Type, Amount, Description, Related Account Number";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("account not found: {0}")]
    AccountNotFound(i64),
    #[error("account belongs to another customer")]
    NotOwned,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("start date after end date")]
    InvertedRange,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Quote one CSV field per RFC 4180: wrap when it contains a comma, quote or
/// line break, doubling embedded quotes.
pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn validate_period(start: &str, end: &str) -> Result<(), ReportError> {
    let start_date =
        dates::parse_iso_date(start).ok_or_else(|| ReportError::InvalidDate(start.to_string()))?;
    let end_date =
        dates::parse_iso_date(end).ok_or_else(|| ReportError::InvalidDate(end.to_string()))?;
    if start_date > end_date {
        return Err(ReportError::InvertedRange);
    }
    Ok(())
}

/// Export one customer-owned account's transactions for an inclusive
/// `YYYY-MM-DD` period.
pub async fn customer_transactions_csv(
    pool: &PgPool,
    customer_id: i64,
    account_id: i64,
    period_start: &str,
    period_end: &str,
) -> Result<String, ReportError> {
    validate_period(period_start, period_end)?;

    let owner_id: Option<i64> =
        sqlx::query_scalar("SELECT customer_id FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(pool)
            .await?;
    match owner_id {
        None => return Err(ReportError::AccountNotFound(account_id)),
        Some(owner) if owner != customer_id => return Err(ReportError::NotOwned),
        Some(_) => {}
    }

    let rows = sqlx::query(
        r#"SELECT t.transaction_id,
                  to_char(t.transaction_timestamp AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"')
                      AS transaction_timestamp,
                  a.account_number,
                  tt.type_name,
                  t.amount_cents,
                  t.description,
                  ra.account_number AS related_account_number
           FROM transactions t
           JOIN accounts a ON a.account_id = t.account_id
           JOIN transaction_types tt ON tt.transaction_type_id = t.transaction_type_id
           LEFT JOIN accounts ra ON ra.account_id = t.related_account_id
           WHERE t.account_id = $1
             AND t.transaction_timestamp >= $2::date
             AND t.transaction_timestamp < ($3::date + INTERVAL '1 day')
           ORDER BY t.transaction_timestamp ASC, t.transaction_id ASC"#,
    )
    .bind(account_id)
    .bind(period_start)
    .bind(period_end)
    .fetch_all(pool)
    .await?;

    let mut csv = String::from(CSV_HEADER);
    csv.push_str("\r\n");
    for row in rows {
        let transaction_id: i64 = row.get("transaction_id");
        let timestamp: String = row.get("transaction_timestamp");
        let account_number: String = row.get("account_number");
        let type_name: String = row.get("type_name");
        let amount_cents: i64 = row.get("amount_cents");
        let description: Option<String> = row.get("description");
        let related: Option<String> = row.get("related_account_number");

        let fields = [
            transaction_id.to_string(),
            timestamp,
            account_number,
            type_name,
            money::format_cents(amount_cents),
            description.unwrap_or_default(),
            related.unwrap_or_default(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        csv.push_str(&line.join(","));
        csv.push_str("\r\n");
    }

    Ok(csv)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
