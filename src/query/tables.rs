//! Monthly shard table enumeration
//!
//! The start is floored to the first of its month. The end is exclusive:
//! the last instant covered is `end - 1s`, and its month is the last shard.
//! A range ending exactly on a month boundary therefore stops at the
//! previous month.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

use super::errors::{QueryError, QueryResult};

/// Dataset holding the monthly shard tables
pub const DATABASE_NAME: &str = "measurement-lab";

/// Fully qualified name of the shard covering `month`
pub fn shard_table_name(month: NaiveDate) -> String {
    format!("[{}:m_lab.{}]", DATABASE_NAME, shard_id(month))
}

/// `YYYY_MM` identifier of the shard covering `month`
pub fn shard_id(month: NaiveDate) -> String {
    month.format("%Y_%m").to_string()
}

fn month_start(instant: DateTime<Utc>) -> QueryResult<NaiveDate> {
    let date = instant.date_naive();
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).ok_or_else(|| {
        QueryError::wrong_conditional_value_type(format!("No month start for {}", instant))
    })
}

/// First day of every month intersecting `[start, end)`, earliest first.
///
/// # Errors
///
/// `WrongConditionalValueType` if `end <= start`.
pub fn month_shards(start: DateTime<Utc>, end: DateTime<Utc>) -> QueryResult<Vec<NaiveDate>> {
    if end <= start {
        return Err(QueryError::wrong_conditional_value_type(format!(
            "End time {} is not after start time {}",
            end, start
        )));
    }

    let first = month_start(start)?;
    let last = month_start(end - Duration::seconds(1))?;

    let mut months = Vec::new();
    let mut current = Some(first);
    while let Some(month) = current.filter(|m| *m <= last) {
        months.push(month);
        current = month.checked_add_months(Months::new(1));
    }
    Ok(months)
}

/// Shard table names for `[start, end)`, earliest first
pub fn build_table_list(start: DateTime<Utc>, end: DateTime<Utc>) -> QueryResult<Vec<String>> {
    Ok(month_shards(start, end)?
        .into_iter()
        .map(shard_table_name)
        .collect())
}
