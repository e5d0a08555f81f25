//! Rules over the Episodes table alone.
//!
//! Most episode fields are optional per row, so the code-list checks accept
//! blank and only flag values that are present but unknown.

use std::collections::HashSet;

use lac_common::parse_uk_date;
use lac_model::tables::EPISODES;
use lac_model::{ErrorDefinition, Locations, RuleResult, TableSet, keys};
use lac_validate::RuleEntry;

use super::{blank_or_code, codes, flag_invalid, reader, require, rows_matching};

/// 141
pub(super) fn episode_start_date() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new("141", "Date episode began is not a valid date.", ["DECOM"])
            .with_tables([EPISODES]),
        |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, EPISODES, "DECOM", |value| {
                value.is_empty() || parse_uk_date(value).is_some()
            })
        },
    )
}

/// 143
pub(super) fn reason_new_episode() -> RuleEntry {
    code_list_entry(
        "143",
        "The reason for new episode code is not a valid code.",
        "RNE",
        codes::REASON_NEW_EPISODE,
    )
}

/// 144
pub(super) fn legal_status() -> RuleEntry {
    code_list_entry(
        "144",
        "The legal status code is not a valid code.",
        "LS",
        codes::LEGAL_STATUS,
    )
}

/// 145
pub(super) fn category_of_need() -> RuleEntry {
    code_list_entry(
        "145",
        "Category of need code is not a valid code.",
        "CIN",
        codes::CATEGORY_OF_NEED,
    )
}

/// 146
pub(super) fn placement_type() -> RuleEntry {
    code_list_entry(
        "146",
        "Placement type code is not a valid code.",
        "PLACE",
        codes::PLACEMENT_TYPE,
    )
}

/// 149
pub(super) fn reason_episode_ceased() -> RuleEntry {
    code_list_entry(
        "149",
        "Reason episode ceased code is not valid.",
        "REC",
        codes::REASON_EPISODE_CEASED,
    )
}

fn code_list_entry(
    code: &str,
    message: &str,
    column: &'static str,
    allowed: &'static [&'static str],
) -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(code, message, [column]).with_tables([EPISODES]),
        move |tables: &TableSet| -> RuleResult {
            flag_invalid(tables, EPISODES, column, blank_or_code(allowed))
        },
    )
}

/// 178
pub(super) fn placement_provider() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "178",
            "Placement provider code is not a valid code.",
            ["PLACE_PROVIDER"],
        )
        .with_tables([EPISODES]),
        check_placement_provider,
    )
}

/// A provided provider code must be a known one, on a placement that takes
/// a provider.
fn check_placement_provider(tables: &TableSet) -> RuleResult {
    let Some(episodes) = reader(tables, EPISODES) else {
        return Ok(Locations::new());
    };
    let provider = require(&episodes, EPISODES, "PLACE_PROVIDER")?;
    let place = require(&episodes, EPISODES, "PLACE")?;

    let pairs: Vec<_> = provider.iter().zip(&place).collect();
    let rows = rows_matching(&pairs, |(provider, place)| {
        !provider.is_empty()
            && (!codes::PLACEMENT_PROVIDER.contains(&provider.as_str())
                || codes::PLACEMENT_WITHOUT_PROVIDER.contains(&place.as_str()))
    });
    Ok(Locations::single(EPISODES, rows))
}

/// 213
pub(super) fn provider_not_required() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "213",
            "Placement provider information not required.",
            ["PLACE_PROVIDER"],
        )
        .with_tables([EPISODES]),
        check_provider_not_required,
    )
}

fn check_provider_not_required(tables: &TableSet) -> RuleResult {
    let Some(episodes) = reader(tables, EPISODES) else {
        return Ok(Locations::new());
    };
    let place = require(&episodes, EPISODES, "PLACE")?;
    let provider = require(&episodes, EPISODES, "PLACE_PROVIDER")?;

    let pairs: Vec<_> = place.iter().zip(&provider).collect();
    let rows = rows_matching(&pairs, |(place, provider)| {
        codes::PLACEMENT_WITHOUT_PROVIDER.contains(&place.as_str()) && !provider.is_empty()
    });
    Ok(Locations::single(EPISODES, rows))
}

/// 392c
pub(super) fn postcodes() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "392c",
            "Postcode(s) provided are invalid.",
            ["HOME_POST", "PL_POST"],
        )
        .with_tables([EPISODES]),
        check_postcodes,
    )
}

/// Compares against the `postcodes` reference list, ignoring spaces and case.
fn check_postcodes(tables: &TableSet) -> RuleResult {
    let Some(episodes) = reader(tables, EPISODES) else {
        return Ok(Locations::new());
    };
    let known: HashSet<String> = tables
        .metadata_list(keys::POSTCODES)?
        .iter()
        .map(String::as_str)
        .map(normalize_postcode)
        .collect();
    let home = require(&episodes, EPISODES, "HOME_POST")?;
    let placed = require(&episodes, EPISODES, "PL_POST")?;

    let is_unknown = |postcode: &str| {
        !postcode.is_empty() && !known.contains(&normalize_postcode(postcode))
    };
    let pairs: Vec<_> = home.iter().zip(&placed).collect();
    let rows = rows_matching(&pairs, |(home, placed)| {
        is_unknown(home.as_str()) || is_unknown(placed.as_str())
    });
    Ok(Locations::single(EPISODES, rows))
}

fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
