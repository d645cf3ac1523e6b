//! Data structures for the league: participants, tournaments, matches, errors.

mod game;
mod participant;
mod tournament;

pub use game::{
    FinishType, Match, MatchId, MatchPhase, NextMatch, PlayerSlot, Slot, BRACKET_PHASE,
};
pub use participant::{EntryId, Participant, ParticipantId, TournamentParticipant};
pub use tournament::{ErrorKind, Tournament, TournamentError, TournamentId, TournamentStatus};
