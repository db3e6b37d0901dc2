use std::cmp::Ordering;

use serde::Deserialize;

use super::ScoreEntry;

/// How a leaderboard is ordered after a new entry is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// The historical ordering: `b` goes first only when `a.score < b.score`,
    /// every other pair keeps `a` first. Equal scores therefore compare as
    /// "less" in both directions, and the outcome for ties depends on the
    /// sorting algorithm, which is reproduced here.
    #[default]
    Legacy,
    /// Stable sort by score, highest first. Ties keep submission order.
    ScoreDescending,
}

impl Ranking {
    pub fn rank(self, entries: &mut [ScoreEntry]) {
        match self {
            Ranking::Legacy => legacy_sort(entries),
            Ranking::ScoreDescending => entries.sort_by(|a, b| b.score.cmp(&a.score)),
        }
    }
}

fn legacy_order(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    if a.score < b.score {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

// The comparator is not a total order, so `slice::sort_by` must not see it.
// Ties land wherever this exact comparison sequence puts them: take the
// leading run, then binary-insert the rest.
fn legacy_sort(entries: &mut [ScoreEntry]) {
    if entries.len() < 2 {
        return;
    }
    let run = leading_run(entries);
    binary_insertion(entries, run);
}

fn leading_run(entries: &mut [ScoreEntry]) -> usize {
    let descending = legacy_order(&entries[1], &entries[0]) == Ordering::Less;
    let mut run = 2;
    while run < entries.len() {
        let order = legacy_order(&entries[run], &entries[run - 1]);
        let extends = if descending {
            order == Ordering::Less
        } else {
            order != Ordering::Less
        };
        if !extends {
            break;
        }
        run += 1;
    }
    if descending {
        entries[..run].reverse();
    }
    run
}

fn binary_insertion(entries: &mut [ScoreEntry], sorted: usize) {
    for start in sorted..entries.len() {
        let mut left = 0;
        let mut right = start;
        while left < right {
            let mid = left + (right - left) / 2;
            if legacy_order(&entries[start], &entries[mid]) == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        entries[left..=start].rotate_right(1);
    }
}
