//! Persistence collaborator: typed keyed records plus an all-or-nothing transaction.
//!
//! Engine operations take a `&mut impl Records` and never reach for a global
//! handle. The engine does no locking of its own: a [`Store`] must run each
//! transaction with at least read-committed isolation per row, otherwise two
//! sibling matches finishing at once can race on their parent's player slots.

mod memory;

pub use memory::{MemoryStore, Tables};

use crate::models::{
    EntryId, Match, MatchId, Participant, ParticipantId, Tournament, TournamentError, TournamentId,
    TournamentParticipant,
};

/// Record access inside one transaction. Lists come back ordered by id.
pub trait Records {
    fn participant(&self, id: ParticipantId) -> Result<Participant, TournamentError>;
    fn participants(&self, include_archived: bool) -> Result<Vec<Participant>, TournamentError>;
    fn find_participant_by_nickname(
        &self,
        nickname: &str,
    ) -> Result<Option<Participant>, TournamentError>;
    fn create_participant(
        &mut self,
        participant: Participant,
    ) -> Result<ParticipantId, TournamentError>;
    fn update_participant(&mut self, participant: &Participant) -> Result<(), TournamentError>;

    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError>;
    fn tournaments(&self, include_archived: bool) -> Result<Vec<Tournament>, TournamentError>;
    fn create_tournament(
        &mut self,
        tournament: Tournament,
    ) -> Result<TournamentId, TournamentError>;
    fn update_tournament(&mut self, tournament: &Tournament) -> Result<(), TournamentError>;

    /// Links of one tournament, or of every tournament when `tournament` is `None`.
    fn entries(
        &self,
        tournament: Option<TournamentId>,
    ) -> Result<Vec<TournamentParticipant>, TournamentError>;
    fn find_entry(
        &self,
        tournament: TournamentId,
        participant: ParticipantId,
    ) -> Result<Option<TournamentParticipant>, TournamentError>;
    fn create_entry(&mut self, entry: TournamentParticipant) -> Result<EntryId, TournamentError>;
    fn update_entry(&mut self, entry: &TournamentParticipant) -> Result<(), TournamentError>;
    fn delete_entry(&mut self, id: EntryId) -> Result<(), TournamentError>;

    fn get_match(&self, id: MatchId) -> Result<Match, TournamentError>;
    fn matches(&self, tournament: TournamentId) -> Result<Vec<Match>, TournamentError>;
    fn create_match(&mut self, m: Match) -> Result<MatchId, TournamentError>;
    fn update_match(&mut self, m: &Match) -> Result<(), TournamentError>;
    /// Delete every match of the tournament; returns how many were removed.
    fn delete_matches(&mut self, tournament: TournamentId) -> Result<usize, TournamentError>;

    /// Like [`Records::find_entry`] but a missing link is an error.
    fn entry(
        &self,
        tournament: TournamentId,
        participant: ParticipantId,
    ) -> Result<TournamentParticipant, TournamentError> {
        self.find_entry(tournament, participant)?
            .ok_or(TournamentError::EntryNotFound {
                tournament,
                participant,
            })
    }
}

/// A record store. A failed transaction leaves no trace.
pub trait Store {
    type Records: Records;

    /// Run `f` with exclusive write access; its writes commit only when it returns `Ok`.
    fn transaction<T, F>(&self, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut Self::Records) -> Result<T, TournamentError>;

    /// Run a read-only closure against a consistent view.
    fn read<T, F>(&self, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&Self::Records) -> Result<T, TournamentError>;
}
