// Chooses the (last, reference, median) triple feeding comparisons.

use serde::{Deserialize, Serialize};

use crate::median::median_lap;
use crate::model::Lap;

/// Explicit reference selection made by the driver, replacing the magic
/// "no selection" index the UI used to pass around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceChoice {
    #[default]
    Unset,
    Explicit {
        lap_number: i32,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LapTriple {
    pub last: Option<Lap>,
    pub reference: Option<Lap>,
    pub median: Option<Lap>,
}

/// Resolves the comparison set from a most-recent-first lap list.
///
/// Last is always the newest lap. The reference is the explicit choice when
/// it is still in the list, otherwise the best lap time with ties broken by
/// earliest occurrence, and absent entirely below two laps. The median lap
/// is synthesized over the whole list whenever more than one lap exists.
pub fn select_comparison_laps(laps: &[Lap], choice: &ReferenceChoice) -> LapTriple {
    let last = laps.first().cloned();

    let explicit = match choice {
        ReferenceChoice::Explicit { lap_number } => {
            laps.iter().find(|lap| lap.number == *lap_number).cloned()
        }
        ReferenceChoice::Unset => None,
    };

    let reference = explicit.or_else(|| {
        if laps.len() < 2 {
            return None;
        }
        let mut best: Option<&Lap> = None;
        for lap in laps.iter().rev() {
            // Iterating newest-last keeps the earliest occurrence on ties.
            match best {
                Some(current) if lap.lap_time_ms > current.lap_time_ms => {}
                Some(current) if lap.lap_time_ms == current.lap_time_ms => {}
                _ => best = Some(lap),
            }
        }
        best.cloned()
    });

    let median = if laps.len() > 1 {
        Some(median_lap(laps))
    } else {
        None
    };

    LapTriple {
        last,
        reference,
        median,
    }
}
