//! Participant and the per-tournament TournamentParticipant link.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};

/// Unique identifier for a participant (used in matches and lookups).
pub type ParticipantId = u64;

/// Unique identifier for a tournament participant link.
pub type EntryId = u64;

/// A registered player of the league.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Unique (case-insensitive) display name.
    pub nickname: String,
    pub avatar: String,
    pub is_archived: bool,
}

impl Participant {
    /// Create an unsaved participant; the store assigns the id.
    pub fn new(nickname: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: 0,
            nickname: nickname.into(),
            avatar: avatar.into(),
            is_archived: false,
        }
    }
}

/// Links one participant to one tournament and carries that tournament's stats.
///
/// `league_points` is the cross-tournament ranking currency and survives a
/// tournament reset; every other counter is per tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentParticipant {
    pub id: EntryId,
    pub tournament_id: TournamentId,
    pub participant_id: ParticipantId,
    /// Empty until groups are generated.
    pub group: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Group-stage points (3 per win).
    pub points: u32,
    pub spin_finishes: u32,
    pub burst_finishes: u32,
    /// Shared by Over and Out finishes.
    pub over_finishes: u32,
    pub xtreme_finishes: u32,
    pub league_points: u32,
}

impl TournamentParticipant {
    pub fn new(tournament_id: TournamentId, participant_id: ParticipantId) -> Self {
        Self {
            tournament_id,
            participant_id,
            ..Self::default()
        }
    }

    /// Record a win for this participant.
    pub fn add_win(&mut self) {
        self.wins += 1;
        self.points += 3;
    }

    /// Record a loss for this participant.
    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    /// Clear group and every per-tournament counter. League points are kept.
    pub fn reset_stats(&mut self) {
        *self = Self {
            id: self.id,
            tournament_id: self.tournament_id,
            participant_id: self.participant_id,
            league_points: self.league_points,
            ..Self::default()
        };
    }
}
