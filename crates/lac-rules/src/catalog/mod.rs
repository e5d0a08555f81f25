//! The rule catalog, grouped by the table a rule reads.
//!
//! Every rule reads the shared table set through a [`ColumnReader`] and
//! never writes back. A rule whose table is absent returns empty locations;
//! a present table missing a column the rule needs is an unhandled fault.

mod codes;
mod cross_table;
mod episodes;
mod header;
mod reviews;
mod social_worker;

use lac_common::{ColumnReader, parse_f64};
use lac_model::{Locations, RuleError, RuleResult, TableSet};
use lac_validate::RuleEntry;

use crate::RuleSetVersion;

/// Entries for one reporting year, in report order.
pub(crate) fn entries(version: RuleSetVersion) -> Vec<RuleEntry> {
    let mut entries = vec![
        header::sex_code(),
        header::date_of_birth(),
        header::ethnicity(),
        header::uasc_status(),
        episodes::episode_start_date(),
        episodes::reason_new_episode(),
        episodes::legal_status(),
        episodes::category_of_need(),
        episodes::placement_type(),
        episodes::reason_episode_ceased(),
        reviews::participation_code(),
        header::pupil_number(),
        header::mother_child_birth_date(),
        episodes::placement_provider(),
        episodes::provider_not_required(),
        cross_table::youth_custody_age(),
        episodes::postcodes(),
        cross_table::mother_completed(),
        header::mother_older_than_child(),
        cross_table::episode_child_in_header(),
        cross_table::review_birth_date_matches(),
    ];

    match version {
        RuleSetVersion::Lac2022_23 => {}
        RuleSetVersion::Lac2024_25 => {
            entries.push(social_worker::episode_complete());
        }
    }
    entries
}

/// Reader over a table, or `None` when the table was not supplied.
fn reader<'a>(tables: &'a TableSet, name: &str) -> Option<ColumnReader<'a>> {
    tables.table(name).map(ColumnReader::new)
}

/// Trimmed values of a column the rule cannot do without.
fn require(
    reader: &ColumnReader<'_>,
    table: &str,
    column: &str,
) -> Result<Vec<String>, RuleError> {
    reader
        .strings(column)
        .ok_or_else(|| RuleError::missing_column(table, column))
}

/// Flag every row of `table` whose `column` value fails `is_valid`.
///
/// Blank cells reach `is_valid` as `""`.
fn flag_invalid<F>(tables: &TableSet, table: &str, column: &str, is_valid: F) -> RuleResult
where
    F: Fn(&str) -> bool,
{
    let Some(reader) = reader(tables, table) else {
        return Ok(Locations::new());
    };
    let rows = reader
        .rows_where(column, |value| !is_valid(value))
        .ok_or_else(|| RuleError::missing_column(table, column))?;
    Ok(Locations::single(table, rows))
}

/// Blank, or one of `codes`.
fn blank_or_code(codes: &'static [&'static str]) -> impl Fn(&str) -> bool {
    move |value| value.is_empty() || codes.contains(&value)
}

/// Numeric value equal to one of `allowed`. `"1"`, `"1.0"` and `1` all match 1.
fn is_number_in(value: &str, allowed: &[i32]) -> bool {
    parse_f64(value).is_some_and(|number| allowed.iter().any(|&a| number == f64::from(a)))
}

/// Row indices where `flag` holds.
fn rows_matching<T>(items: &[T], flag: impl Fn(&T) -> bool) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| flag(item))
        .map(|(idx, _)| idx)
        .collect()
}
