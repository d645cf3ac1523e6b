//! Group assignment: split a tournament's participants into labeled groups.

use crate::models::{TournamentError, TournamentParticipant};

/// Players per group the assigner aims for.
pub const TARGET_GROUP_SIZE: usize = 10;

const GROUP_LABELS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// Largest field the label set can hold without two groups sharing a label.
pub const MAX_PARTICIPANTS: usize = TARGET_GROUP_SIZE * GROUP_LABELS.len();

/// 1 group up to 10 players, otherwise `ceil(n / 10)`.
pub fn group_count(players: usize) -> usize {
    if players <= TARGET_GROUP_SIZE {
        1
    } else {
        (players + TARGET_GROUP_SIZE - 1) / TARGET_GROUP_SIZE
    }
}

/// Label of group `index`: a bare letter for a single group, "Group X" otherwise.
pub fn group_label(index: usize, groups: usize) -> String {
    let letter = GROUP_LABELS[index % GROUP_LABELS.len()];
    if groups > 1 {
        format!("Group {letter}")
    } else {
        letter.to_string()
    }
}

/// Label every entry in place: entry `i` goes to group `i mod groups`.
///
/// No seeding by skill; order of `entries` decides the split.
pub fn assign_groups(entries: &mut [TournamentParticipant]) -> Result<(), TournamentError> {
    let n = entries.len();
    if n < 2 {
        return Err(TournamentError::NotEnoughParticipants(n));
    }
    if n > MAX_PARTICIPANTS {
        return Err(TournamentError::TooManyParticipants {
            max: MAX_PARTICIPANTS,
            found: n,
        });
    }
    let groups = group_count(n);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.group = group_label(i % groups, groups);
    }
    Ok(())
}
