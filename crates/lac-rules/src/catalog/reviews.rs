//! Rules over the Reviews table alone.

use lac_model::tables::REVIEWS;
use lac_model::{ErrorDefinition, Locations, RuleResult, TableSet};
use lac_validate::RuleEntry;

use super::{codes, reader, require, rows_matching};

/// 167
pub(super) fn participation_code() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "167",
            "Data entry for participation is invalid or blank.",
            ["REVIEW_CODE"],
        )
        .with_tables([REVIEWS]),
        check_participation,
    )
}

/// A review carries a participation code; a row with no review carries none.
fn check_participation(tables: &TableSet) -> RuleResult {
    let Some(reviews) = reader(tables, REVIEWS) else {
        return Ok(Locations::new());
    };
    let review = require(&reviews, REVIEWS, "REVIEW")?;
    let participation = require(&reviews, REVIEWS, "REVIEW_CODE")?;

    let pairs: Vec<_> = review.iter().zip(&participation).collect();
    let rows = rows_matching(&pairs, |(review, participation)| {
        if review.is_empty() {
            !participation.is_empty()
        } else {
            !codes::PARTICIPATION.contains(&participation.as_str())
        }
    });
    Ok(Locations::single(REVIEWS, rows))
}
