//! Match, player slots, match phase and finish types.

use crate::models::participant::ParticipantId;
use crate::models::tournament::{TournamentError, TournamentId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a match.
pub type MatchId = u64;

/// Phase label used by every elimination match.
pub const BRACKET_PHASE: &str = "Bracket";

/// One player position of a match. `Unassigned` is a bye or a winner not yet known.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<ParticipantId>", into = "Option<ParticipantId>")]
pub enum PlayerSlot {
    #[default]
    Unassigned,
    Player(ParticipantId),
}

impl PlayerSlot {
    pub fn player(self) -> Option<ParticipantId> {
        match self {
            PlayerSlot::Unassigned => None,
            PlayerSlot::Player(id) => Some(id),
        }
    }

    pub fn is(self, id: ParticipantId) -> bool {
        self == PlayerSlot::Player(id)
    }
}

impl From<Option<ParticipantId>> for PlayerSlot {
    fn from(id: Option<ParticipantId>) -> Self {
        id.map_or(PlayerSlot::Unassigned, PlayerSlot::Player)
    }
}

impl From<PlayerSlot> for Option<ParticipantId> {
    fn from(slot: PlayerSlot) -> Self {
        slot.player()
    }
}

/// Which of the parent's two player positions a propagated winner occupies.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    /// Slot 1 for even sibling index, 2 for odd.
    pub fn for_sibling(index: usize) -> Self {
        if index % 2 == 0 {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            other => Err(format!("match slot must be 1 or 2, got {other}")),
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }
}

/// Parent link of a bracket match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NextMatch {
    pub id: MatchId,
    pub slot: Slot,
}

/// Group label for round-robin matches, or the elimination bracket.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchPhase {
    Group(String),
    Bracket,
}

impl MatchPhase {
    /// Score a player must reach to win a match of this phase.
    pub fn win_threshold(&self) -> u32 {
        match self {
            MatchPhase::Group(_) => 7,
            MatchPhase::Bracket => 10,
        }
    }

    pub fn is_bracket(&self) -> bool {
        matches!(self, MatchPhase::Bracket)
    }
}

impl From<String> for MatchPhase {
    fn from(label: String) -> Self {
        if label == BRACKET_PHASE {
            MatchPhase::Bracket
        } else {
            MatchPhase::Group(label)
        }
    }
}

impl From<MatchPhase> for String {
    fn from(phase: MatchPhase) -> Self {
        match phase {
            MatchPhase::Group(label) => label,
            MatchPhase::Bracket => BRACKET_PHASE.to_string(),
        }
    }
}

/// How a round of a match was won.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum FinishType {
    Spin,
    Over,
    Burst,
    Out,
    Xtreme,
}

impl FinishType {
    /// Points the round winner adds to their match score.
    pub fn points(self) -> u32 {
        match self {
            FinishType::Spin => 1,
            FinishType::Over | FinishType::Burst | FinishType::Out => 2,
            FinishType::Xtreme => 3,
        }
    }
}

impl FromStr for FinishType {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Spin" => Ok(FinishType::Spin),
            "Over" => Ok(FinishType::Over),
            "Burst" => Ok(FinishType::Burst),
            "Out" => Ok(FinishType::Out),
            "Xtreme" => Ok(FinishType::Xtreme),
            other => Err(TournamentError::InvalidFinishType(other.to_string())),
        }
    }
}

impl fmt::Display for FinishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A battle between two players.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub phase: MatchPhase,
    pub round: u32,
    pub player1: PlayerSlot,
    pub player2: PlayerSlot,
    pub score_p1: u32,
    pub score_p2: u32,
    /// Once set, always one of `player1` / `player2`.
    pub winner: Option<ParticipantId>,
    pub next_match: Option<NextMatch>,
}

impl Match {
    /// Create an unsaved 0-0 match; the store assigns the id.
    pub fn new(
        tournament_id: TournamentId,
        phase: MatchPhase,
        round: u32,
        player1: PlayerSlot,
        player2: PlayerSlot,
    ) -> Self {
        Self {
            id: 0,
            tournament_id,
            phase,
            round,
            player1,
            player2,
            score_p1: 0,
            score_p2: 0,
            winner: None,
            next_match: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn slot(&self, slot: Slot) -> PlayerSlot {
        match slot {
            Slot::One => self.player1,
            Slot::Two => self.player2,
        }
    }

    pub fn set_slot(&mut self, slot: Slot, player: PlayerSlot) {
        match slot {
            Slot::One => self.player1 = player,
            Slot::Two => self.player2 = player,
        }
    }

    /// The player that did not win, once the match is decided.
    pub fn loser(&self) -> Option<ParticipantId> {
        let winner = self.winner?;
        if self.player1.is(winner) {
            self.player2.player()
        } else {
            self.player1.player()
        }
    }

    /// Set the winner from the score threshold, or clear it when no seated side reached it.
    ///
    /// An empty slot never wins, whatever its score; player 1 is checked first.
    pub fn decide_by_threshold(&mut self) {
        let limit = self.phase.win_threshold();
        let reached = |score: u32, slot: PlayerSlot| slot.player().filter(|_| score >= limit);
        self.winner = reached(self.score_p1, self.player1)
            .or_else(|| reached(self.score_p2, self.player2));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_points_follow_the_rules_table() {
        let table = [
            ("Spin", 1),
            ("Over", 2),
            ("Burst", 2),
            ("Out", 2),
            ("Xtreme", 3),
        ];
        for (name, points) in table {
            let finish: FinishType = name.parse().unwrap();
            assert_eq!(finish.points(), points, "{name}");
        }
    }

    #[test]
    fn unknown_finish_is_rejected() {
        assert_eq!(
            "Ring".parse::<FinishType>(),
            Err(TournamentError::InvalidFinishType("Ring".into()))
        );
    }

    #[test]
    fn match_serializes_nullable_players_and_numeric_slot() {
        let mut m = Match::new(
            1,
            MatchPhase::Bracket,
            2,
            PlayerSlot::Player(7),
            PlayerSlot::Unassigned,
        );
        m.next_match = Some(NextMatch {
            id: 3,
            slot: Slot::Two,
        });
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["phase"], "Bracket");
        assert_eq!(json["player1"], 7);
        assert!(json["player2"].is_null());
        assert_eq!(json["next_match"]["slot"], 2);

        let back: Match = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn slot_rejects_out_of_range_values() {
        assert!(Slot::try_from(0).is_err());
        assert!(Slot::try_from(3).is_err());
        assert_eq!(Slot::for_sibling(4), Slot::One);
        assert_eq!(Slot::for_sibling(5), Slot::Two);
    }

    #[test]
    fn loser_is_the_other_player() {
        let mut m = Match::new(
            1,
            MatchPhase::Group("A".into()),
            1,
            PlayerSlot::Player(1),
            PlayerSlot::Player(2),
        );
        assert_eq!(m.loser(), None);
        m.winner = Some(2);
        assert_eq!(m.loser(), Some(1));
    }

    #[test]
    fn empty_slot_never_wins_on_score() {
        let mut m = Match::new(
            1,
            MatchPhase::Bracket,
            2,
            PlayerSlot::Unassigned,
            PlayerSlot::Player(5),
        );
        m.score_p1 = 10;
        m.score_p2 = 12;
        m.decide_by_threshold();
        assert_eq!(m.winner, Some(5));

        m.score_p2 = 9;
        m.decide_by_threshold();
        assert_eq!(m.winner, None);
    }
}
