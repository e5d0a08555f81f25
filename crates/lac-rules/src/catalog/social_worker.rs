//! Rules over the SWEpisodes table (from 2024/25).

use chrono::Datelike;
use lac_model::tables::SW_EPISODES;
use lac_model::{ErrorDefinition, Locations, RuleError, RuleResult, TableSet};
use lac_validate::RuleEntry;

use super::{reader, require};

/// Social worker episodes starting in this month or later must be complete.
const COMPLETE_FROM: (i32, u32) = (2023, 4);

/// SW01bSTG1
pub(super) fn episode_complete() -> RuleEntry {
    RuleEntry::new(
        ErrorDefinition::new(
            "SW01bSTG1",
            "For each social worker episode, information should be complete",
            ["SW_DECOM", "SW_ID", "SW_REASON"],
        )
        .with_tables([SW_EPISODES]),
        check_episode_complete,
    )
}

fn check_episode_complete(tables: &TableSet) -> RuleResult {
    let Some(episodes) = reader(tables, SW_EPISODES) else {
        return Ok(Locations::new());
    };
    let start = episodes
        .dates("SW_DECOM")
        .ok_or_else(|| RuleError::missing_column(SW_EPISODES, "SW_DECOM"))?;
    let worker = require(&episodes, SW_EPISODES, "SW_ID")?;
    let reason = require(&episodes, SW_EPISODES, "SW_REASON")?;

    let rows = start
        .iter()
        .zip(worker.iter().zip(&reason))
        .enumerate()
        .filter(|(_, (start, (worker, reason)))| match start {
            None => true,
            Some(date) => {
                (date.year(), date.month()) >= COMPLETE_FROM
                    && (worker.is_empty() || reason.is_empty())
            }
        })
        .map(|(idx, _)| idx);
    Ok(Locations::single(SW_EPISODES, rows))
}
