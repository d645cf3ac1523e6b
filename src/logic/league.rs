//! League points: the cross-tournament ranking currency.
//!
//! Every award is additive. Nothing here deduplicates, so each qualifying
//! event must be awarded exactly once by the caller.

use crate::models::TournamentParticipant;

pub const PARTICIPATION_POINTS: u32 = 5;
pub const QUALIFICATION_POINTS: u32 = 8;
pub const BRACKET_WIN_POINTS: u32 = 3;

/// League points for a podium finish; `None` off the podium.
pub fn podium_points(rank: u32) -> Option<u32> {
    match rank {
        1 => Some(35),
        2 => Some(19),
        3 => Some(12),
        _ => None,
    }
}

impl TournamentParticipant {
    /// Played the group stage.
    pub fn award_participation(&mut self) {
        self.league_points += PARTICIPATION_POINTS;
    }

    /// Reached the bracket.
    pub fn award_qualification(&mut self) {
        self.league_points += QUALIFICATION_POINTS;
    }

    /// Won a bracket match. Not awarded by the phase transitions.
    pub fn award_bracket_win(&mut self) {
        self.league_points += BRACKET_WIN_POINTS;
    }

    /// Finished 1st, 2nd or 3rd; any other rank is a no-op.
    pub fn award_podium(&mut self, rank: u32) {
        if let Some(points) = podium_points(rank) {
            self.league_points += points;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn awards_accumulate() {
        let mut tp = TournamentParticipant::default();

        tp.award_participation();
        assert_eq!(tp.league_points, 5);
        tp.award_qualification();
        assert_eq!(tp.league_points, 13);
        tp.award_bracket_win();
        assert_eq!(tp.league_points, 16);
        tp.award_podium(1);
        assert_eq!(tp.league_points, 51);
    }

    #[test]
    fn podium_ranks() {
        for (rank, expected) in [(2, 19), (3, 12), (4, 0), (0, 0)] {
            let mut tp = TournamentParticipant::default();
            tp.award_podium(rank);
            assert_eq!(tp.league_points, expected, "rank {rank}");
        }
    }
}
