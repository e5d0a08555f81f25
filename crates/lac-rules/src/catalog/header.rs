//! Rules over the Header table alone.

use std::sync::LazyLock;

use lac_common::parse_uk_date;
use lac_model::tables::HEADER;
use lac_model::{ErrorDefinition, Locations, RuleError, RuleResult, TableSet, keys};
use lac_validate::RuleEntry;
use regex::Regex;

use super::{codes, flag_invalid, is_number_in, reader, rows_matching};

/// Letter (never I, O or S) and 12 digits, letter and 11 digits and a check
/// letter, or one of the UN1-UN5 "unknown" defaults.
static UPN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-HJ-NP-RT-Z](?:\d{12}|\d{11}[A-Z])|UN[1-5])$").expect("Invalid UPN regex")
});

/// 101
pub(super) fn sex_code() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new("101", "Gender code is not valid.", ["SEX"]).with_tables([HEADER]),
        |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, HEADER, "SEX", |value| is_number_in(value, &[1, 2]))
        },
    )
}

/// 102: blank is as invalid as malformed.
pub(super) fn date_of_birth() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new("102", "Date of birth is not a valid date.", ["DOB"])
            .with_tables([HEADER]),
        |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, HEADER, "DOB", |value| parse_uk_date(value).is_some())
        },
    )
}

/// 103
pub(super) fn ethnicity() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "103",
            "The ethnicity code is either not valid or has not been entered.",
            ["ETHNIC"],
        )
        .with_tables([HEADER]),
        |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, HEADER, "ETHNIC", |value| codes::ETHNICITY.contains(&value))
        },
    )
}

/// 105
pub(super) fn uasc_status() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "105",
            "Data entry for Unaccompanied Asylum-Seeking Children (UASC) status of child is invalid or has not been completed.",
            ["UASC"],
        )
        .with_tables([HEADER]),
        check_uasc,
    )
}

/// UASC is only carried by the XML return; CSV uploads never populate it.
fn check_uasc(tables: &TableSet) -> RuleResult {
    if !tables.contains(HEADER) {
        return Ok(Locations::new());
    }
    let file_format = tables.metadata_text(keys::FILE_FORMAT)?;
    if file_format.trim().eq_ignore_ascii_case("csv") {
        return Ok(Locations::new());
    }
    flag_invalid(tables, HEADER, "UASC", |value| is_number_in(value, &[0, 1]))
}

/// 168
pub(super) fn pupil_number() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "168",
            "Unique Pupil Number (UPN) is not valid. If unknown, default codes should be UN1, UN2, UN3, UN4 or UN5.",
            ["UPN"],
        )
        .with_tables([HEADER]),
        |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, HEADER, "UPN", |value| UPN_REGEX.is_match(value))
        },
    )
}

/// 171
pub(super) fn mother_child_birth_date() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "171",
            "Date of birth of mother's child is not a valid date.",
            ["MC_DOB"],
        )
        .with_tables([HEADER]),
        |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, HEADER, "MC_DOB", |value| {
                value.is_empty() || parse_uk_date(value).is_some()
            })
        },
    )
}

/// 621
pub(super) fn mother_older_than_child() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "621",
            "Mother's field has been completed but date of birth shows that the mother is younger than her child.",
            ["DOB", "MC_DOB"],
        )
        .with_tables([HEADER]),
        check_mother_older,
    )
}

/// A valid MC_DOB must fall after DOB. A blank or malformed DOB cannot be
/// after it, so such rows are flagged as well.
fn check_mother_older(tables: &TableSet) -> RuleResult {
    let Some(header) = reader(tables, HEADER) else {
        return Ok(Locations::new());
    };
    let dob = header
        .dates("DOB")
        .ok_or_else(|| RuleError::missing_column(HEADER, "DOB"))?;
    let child_dob = header
        .dates("MC_DOB")
        .ok_or_else(|| RuleError::missing_column(HEADER, "MC_DOB"))?;

    let pairs: Vec<_> = dob.into_iter().zip(child_dob).collect();
    let rows = rows_matching(&pairs, |pair| match pair {
        (Some(dob), Some(child_dob)) => child_dob <= dob,
        (None, Some(_)) => true,
        (_, None) => false,
    });
    Ok(Locations::single(HEADER, rows))
}
