//! In-memory record store with an optional JSON snapshot on disk.

use super::{Records, Store};
use crate::models::{
    EntryId, Match, MatchId, Participant, ParticipantId, Tournament, TournamentError, TournamentId,
    TournamentParticipant,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// All records, one ordered table per kind. Ids are shared across tables.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tables {
    last_id: u64,
    participants: BTreeMap<ParticipantId, Participant>,
    tournaments: BTreeMap<TournamentId, Tournament>,
    entries: BTreeMap<EntryId, TournamentParticipant>,
    matches: BTreeMap<MatchId, Match>,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

impl Records for Tables {
    fn participant(&self, id: ParticipantId) -> Result<Participant, TournamentError> {
        self.participants
            .get(&id)
            .cloned()
            .ok_or(TournamentError::ParticipantNotFound(id))
    }

    fn participants(&self, include_archived: bool) -> Result<Vec<Participant>, TournamentError> {
        Ok(self
            .participants
            .values()
            .filter(|p| include_archived || !p.is_archived)
            .cloned()
            .collect())
    }

    fn find_participant_by_nickname(
        &self,
        nickname: &str,
    ) -> Result<Option<Participant>, TournamentError> {
        Ok(self
            .participants
            .values()
            .find(|p| p.nickname.eq_ignore_ascii_case(nickname))
            .cloned())
    }

    fn create_participant(
        &mut self,
        mut participant: Participant,
    ) -> Result<ParticipantId, TournamentError> {
        participant.id = self.next_id();
        let id = participant.id;
        self.participants.insert(id, participant);
        Ok(id)
    }

    fn update_participant(&mut self, participant: &Participant) -> Result<(), TournamentError> {
        let row = self
            .participants
            .get_mut(&participant.id)
            .ok_or(TournamentError::ParticipantNotFound(participant.id))?;
        *row = participant.clone();
        Ok(())
    }

    fn tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn tournaments(&self, include_archived: bool) -> Result<Vec<Tournament>, TournamentError> {
        Ok(self
            .tournaments
            .values()
            .filter(|t| include_archived || !t.is_archived)
            .cloned()
            .collect())
    }

    fn create_tournament(
        &mut self,
        mut tournament: Tournament,
    ) -> Result<TournamentId, TournamentError> {
        tournament.id = self.next_id();
        let id = tournament.id;
        self.tournaments.insert(id, tournament);
        Ok(id)
    }

    fn update_tournament(&mut self, tournament: &Tournament) -> Result<(), TournamentError> {
        let row = self
            .tournaments
            .get_mut(&tournament.id)
            .ok_or(TournamentError::TournamentNotFound(tournament.id))?;
        *row = tournament.clone();
        Ok(())
    }

    fn entries(
        &self,
        tournament: Option<TournamentId>,
    ) -> Result<Vec<TournamentParticipant>, TournamentError> {
        Ok(self
            .entries
            .values()
            .filter(|e| tournament.map_or(true, |t| e.tournament_id == t))
            .cloned()
            .collect())
    }

    fn find_entry(
        &self,
        tournament: TournamentId,
        participant: ParticipantId,
    ) -> Result<Option<TournamentParticipant>, TournamentError> {
        Ok(self
            .entries
            .values()
            .find(|e| e.tournament_id == tournament && e.participant_id == participant)
            .cloned())
    }

    fn create_entry(
        &mut self,
        mut entry: TournamentParticipant,
    ) -> Result<EntryId, TournamentError> {
        entry.id = self.next_id();
        let id = entry.id;
        self.entries.insert(id, entry);
        Ok(id)
    }

    fn update_entry(&mut self, entry: &TournamentParticipant) -> Result<(), TournamentError> {
        let row = self
            .entries
            .get_mut(&entry.id)
            .ok_or(TournamentError::EntryNotFound {
                tournament: entry.tournament_id,
                participant: entry.participant_id,
            })?;
        *row = entry.clone();
        Ok(())
    }

    fn delete_entry(&mut self, id: EntryId) -> Result<(), TournamentError> {
        self.entries.remove(&id);
        Ok(())
    }

    fn get_match(&self, id: MatchId) -> Result<Match, TournamentError> {
        self.matches
            .get(&id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(id))
    }

    fn matches(&self, tournament: TournamentId) -> Result<Vec<Match>, TournamentError> {
        Ok(self
            .matches
            .values()
            .filter(|m| m.tournament_id == tournament)
            .cloned()
            .collect())
    }

    fn create_match(&mut self, mut m: Match) -> Result<MatchId, TournamentError> {
        if let Some(next) = m.next_match {
            // Trees are built root-first; a child may only point at a saved parent.
            if !self.matches.contains_key(&next.id) {
                return Err(TournamentError::MatchNotFound(next.id));
            }
        }
        m.id = self.next_id();
        let id = m.id;
        self.matches.insert(id, m);
        Ok(id)
    }

    fn update_match(&mut self, m: &Match) -> Result<(), TournamentError> {
        let row = self
            .matches
            .get_mut(&m.id)
            .ok_or(TournamentError::MatchNotFound(m.id))?;
        *row = m.clone();
        Ok(())
    }

    fn delete_matches(&mut self, tournament: TournamentId) -> Result<usize, TournamentError> {
        let before = self.matches.len();
        self.matches.retain(|_, m| m.tournament_id != tournament);
        Ok(before - self.matches.len())
    }
}

/// Shared store: one writer at a time, readers in parallel.
///
/// A transaction works on a copy of the tables and swaps it in on success, so
/// an error anywhere in the closure leaves the previous state untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by a JSON snapshot file; starts empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TournamentError> {
        let path = path.into();
        let tables = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| storage_error(&path, e))?;
            let tables: Tables =
                serde_json::from_str(&contents).map_err(|e| storage_error(&path, e))?;
            log::info!(
                "Loaded {} tournament(s) and {} participant(s) from {}",
                tables.tournaments.len(),
                tables.participants.len(),
                path.display()
            );
            tables
        } else {
            Tables::default()
        };
        Ok(Self {
            tables: RwLock::new(tables),
            snapshot: Some(path),
        })
    }

    /// Replace the snapshot file as a whole: write a sibling temp file, then rename it over.
    fn write_snapshot(&self, tables: &Tables) -> Result<(), TournamentError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let json = serde_json::to_vec(tables).map_err(|e| storage_error(path, e))?;
        let staging = staging_path(path);
        std::fs::write(&staging, json).map_err(|e| storage_error(&staging, e))?;
        std::fs::rename(&staging, path).map_err(|e| storage_error(path, e))
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> TournamentError {
    TournamentError::Storage(format!("{}: {e}", path.display()))
}

fn lock_error() -> TournamentError {
    TournamentError::Storage("lock error".to_string())
}

impl Store for MemoryStore {
    type Records = Tables;

    fn transaction<T, F>(&self, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut Tables) -> Result<T, TournamentError>,
    {
        let mut guard = self.tables.write().map_err(|_| lock_error())?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        self.write_snapshot(&working)?;
        *guard = working;
        Ok(value)
    }

    fn read<T, F>(&self, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&Tables) -> Result<T, TournamentError>,
    {
        let guard = self.tables.read().map_err(|_| lock_error())?;
        f(&*guard)
    }
}
