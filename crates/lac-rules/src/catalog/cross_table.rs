//! Rules joining two tables on the CHILD identifier.
//!
//! Joins are built as lookups keyed by the trimmed CHILD value of the
//! reference table. Blank identifiers never join.

use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use lac_common::{ColumnReader, parse_uk_date};
use lac_model::tables::{EPISODES, HEADER, REVIEWS};
use lac_model::{ErrorDefinition, Locations, RuleError, RuleResult, TableSet};
use lac_validate::RuleEntry;

use super::{codes, reader, require};

const CHILD: &str = "CHILD";

/// Minimum age for a youth custody placement.
const CUSTODY_MIN_AGE_MONTHS: u32 = 10 * 12;

/// Group the parsed dates of `column` by child.
fn dates_by_child(
    reader: &ColumnReader<'_>,
    table: &str,
    column: &str,
) -> Result<HashMap<String, Vec<NaiveDate>>, RuleError> {
    let children = require(reader, table, CHILD)?;
    let values = require(reader, table, column)?;

    let mut by_child: HashMap<String, Vec<NaiveDate>> = HashMap::new();
    for (child, value) in children.into_iter().zip(values) {
        if child.is_empty() {
            continue;
        }
        if let Some(date) = parse_uk_date(&value) {
            by_child.entry(child).or_default().push(date);
        }
    }
    Ok(by_child)
}

// =============================================================================
// 372: youth custody age
// =============================================================================

pub(super) fn youth_custody_age() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "372",
            "Child in youth custody or prison should be at least 10.",
            ["DECOM", "PLACE"],
        )
        .with_tables([EPISODES, HEADER]),
        check_youth_custody_age,
    )
}

/// Flags custody episodes that begin before the child's tenth birthday.
///
/// Only finished episodes with a parseable start date and a known date of
/// birth are compared.
fn check_youth_custody_age(tables: &TableSet) -> RuleResult {
    let (Some(episodes), Some(header)) = (reader(tables, EPISODES), reader(tables, HEADER)) else {
        return Ok(Locations::new());
    };
    let births = dates_by_child(&header, HEADER, "DOB")?;

    let children = require(&episodes, EPISODES, CHILD)?;
    let place = require(&episodes, EPISODES, "PLACE")?;
    let decom = require(&episodes, EPISODES, "DECOM")?;
    let dec = require(&episodes, EPISODES, "DEC")?;

    let mut rows = Vec::new();
    for (idx, child) in children.iter().enumerate() {
        if place[idx] != codes::YOUTH_CUSTODY || dec[idx].is_empty() {
            continue;
        }
        let (Some(start), Some(dobs)) = (parse_uk_date(&decom[idx]), births.get(child)) else {
            continue;
        };
        let too_young = dobs.iter().any(|dob| {
            dob.checked_add_months(Months::new(CUSTODY_MIN_AGE_MONTHS))
                .is_some_and(|tenth_birthday| start < tenth_birthday)
        });
        if too_young {
            rows.push(idx);
        }
    }
    Ok(Locations::single(EPISODES, rows))
}

// =============================================================================
// 393: mother field for looked-after girls
// =============================================================================

pub(super) fn mother_completed() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "393",
            "Child is looked after but mother field is not completed.",
            ["MOTHER"],
        )
        .with_tables([HEADER, EPISODES]),
        check_mother_completed,
    )
}

/// A girl with any episode outside short breaks must have MOTHER completed.
fn check_mother_completed(tables: &TableSet) -> RuleResult {
    let (Some(header), Some(episodes)) = (reader(tables, HEADER), reader(tables, EPISODES)) else {
        return Ok(Locations::new());
    };

    let episode_children = require(&episodes, EPISODES, CHILD)?;
    let legal_status = require(&episodes, EPISODES, "LS")?;
    let looked_after: HashSet<&str> = episode_children
        .iter()
        .zip(&legal_status)
        .filter(|(child, status)| {
            !child.is_empty()
                && !codes::SHORT_BREAK_LEGAL_STATUS.contains(&status.to_ascii_uppercase().as_str())
        })
        .map(|(child, _)| child.as_str())
        .collect();

    let children = require(&header, HEADER, CHILD)?;
    let sex = require(&header, HEADER, "SEX")?;
    let mother = require(&header, HEADER, "MOTHER")?;

    let rows = (0..header.height()).filter(|&idx| {
        sex[idx] == "2" && mother[idx].is_empty() && looked_after.contains(children[idx].as_str())
    });
    Ok(Locations::single(HEADER, rows))
}

// =============================================================================
// INT03 / INT17: internal consistency with Header
// =============================================================================

pub(super) fn episode_child_in_header() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "INT03",
            "Internal Check: Child in Episodes does not exist in Header.",
            [CHILD],
        )
        .with_tables([HEADER, EPISODES]),
        check_episode_child_in_header,
    )
}

fn check_episode_child_in_header(tables: &TableSet) -> RuleResult {
    let (Some(header), Some(episodes)) = (reader(tables, HEADER), reader(tables, EPISODES)) else {
        return Ok(Locations::new());
    };
    let known: HashSet<String> = require(&header, HEADER, CHILD)?
        .into_iter()
        .filter(|child| !child.is_empty())
        .collect();

    let rows = episodes
        .rows_where(CHILD, |child| !known.contains(child))
        .ok_or_else(|| RuleError::missing_column(EPISODES, CHILD))?;
    Ok(Locations::single(EPISODES, rows))
}

pub(super) fn review_birth_date_matches() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "INT17",
            "Internal Check: DOB in Reviews is different to DOB in Header.",
            ["DOB"],
        )
        .with_tables([HEADER, REVIEWS]),
        check_review_birth_date,
    )
}

/// Rows whose DOB disagrees with a Header row for the same child. Either
/// side failing to parse is left to the date-format rules.
fn check_review_birth_date(tables: &TableSet) -> RuleResult {
    let (Some(header), Some(reviews)) = (reader(tables, HEADER), reader(tables, REVIEWS)) else {
        return Ok(Locations::new());
    };
    let births = dates_by_child(&header, HEADER, "DOB")?;

    let children = require(&reviews, REVIEWS, CHILD)?;
    let dob = require(&reviews, REVIEWS, "DOB")?;

    let rows = children.iter().zip(&dob).enumerate().filter_map(|(idx, (child, dob))| {
        let dob = parse_uk_date(dob)?;
        let header_dobs = births.get(child)?;
        header_dobs.iter().any(|header_dob| *header_dob != dob).then_some(idx)
    });
    Ok(Locations::single(REVIEWS, rows))
}
