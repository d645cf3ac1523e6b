//! Single-elimination bracket: built root-first so every child can link to a saved parent.
//!
//! Qualifiers fill first-round slots in pairs, in order. When the field is not a
//! power of two the trailing slots stay empty. Those byes are settled while the
//! tree is built: a qualifier without an opponent is seated directly in the next
//! match, and a branch with nobody on one side is folded into its other side.
//! Every saved match therefore has two real players (or two feeders) and the
//! tree holds exactly `n - 1` matches.

use crate::models::{
    Match, MatchPhase, NextMatch, ParticipantId, PlayerSlot, Slot, TournamentError, TournamentId,
};
use crate::store::Records;

/// Smallest `k` with `2^k >= n`.
pub fn round_count(qualifiers: usize) -> u32 {
    qualifiers.next_power_of_two().trailing_zeros()
}

/// Qualifiers inside branch `index` of a level, where a level-`l` branch spans `2^l` slots.
fn branch_size(qualifiers: usize, level: u32, index: usize) -> usize {
    qualifiers
        .saturating_sub(index << level)
        .min(1 << level)
}

/// The seated qualifier when the branch holds exactly one.
fn walkover(qualifiers: &[ParticipantId], level: u32, index: usize, size: usize) -> PlayerSlot {
    if size == 1 {
        PlayerSlot::Player(qualifiers[index << level])
    } else {
        PlayerSlot::Unassigned
    }
}

/// Create and save the bracket for `qualifiers`; returns the matches final-first.
///
/// Round numbers start at `start_round`. Fewer than two qualifiers yield an empty tree.
pub fn build_bracket<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
    qualifiers: &[ParticipantId],
    start_round: u32,
) -> Result<Vec<Match>, TournamentError> {
    let n = qualifiers.len();
    if n < 2 {
        return Ok(Vec::new());
    }

    let mut created = Vec::with_capacity(n - 1);
    // Branches of the round being built, each with the link to its parent.
    let mut pending: Vec<(usize, Option<NextMatch>)> = vec![(0, None)];

    for round in (1..=round_count(n)).rev() {
        let level = round - 1;
        let mut below = Vec::new();
        for (index, parent) in pending {
            let left = 2 * index;
            let right = left + 1;
            let left_size = branch_size(n, level, left);
            let right_size = branch_size(n, level, right);

            if right_size == 0 {
                below.push((left, parent));
                continue;
            }

            let mut m = Match::new(
                tournament_id,
                MatchPhase::Bracket,
                round + start_round - 1,
                walkover(qualifiers, level, left, left_size),
                walkover(qualifiers, level, right, right_size),
            );
            m.next_match = parent;
            m.id = records.create_match(m.clone())?;

            for (child, size) in [(left, left_size), (right, right_size)] {
                if size >= 2 {
                    below.push((
                        child,
                        Some(NextMatch {
                            id: m.id,
                            slot: Slot::for_sibling(child),
                        }),
                    ));
                }
            }
            created.push(m);
        }
        pending = below;
    }

    Ok(created)
}
