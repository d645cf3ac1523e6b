//! Tournament, TournamentStatus and the engine error type.

use crate::models::game::MatchId;
use crate::models::participant::ParticipantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    ParticipantNotFound(ParticipantId),
    /// The participant is not registered in the tournament.
    EntryNotFound {
        tournament: TournamentId,
        participant: ParticipantId,
    },
    /// Finish type is not one of Spin, Over, Burst, Out, Xtreme.
    InvalidFinishType(String),
    /// A nickname or tournament name was blank.
    EmptyName,
    /// Tournament is not in a state that allows this action.
    InvalidState(TournamentStatus),
    /// Not enough participants to generate groups (need at least 2).
    NotEnoughParticipants(usize),
    /// More participants than the group labels can hold.
    TooManyParticipants { max: usize, found: usize },
    /// Not all matches of the current phase have a winner.
    OpenMatches(usize),
    /// The match already has a winner.
    MatchDecided(MatchId),
    /// The winner is not one of the match's two players.
    NotInMatch {
        match_id: MatchId,
        participant: ParticipantId,
    },
    /// Bracket phase without any bracket match.
    NoBracket,
    /// A participant with this nickname already exists (case-insensitive).
    DuplicateNickname(String),
    /// The record store failed.
    Storage(String),
}

/// Coarse classification of a [`TournamentError`] for callers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    PreconditionFailed,
    Conflict,
    Internal,
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            TournamentNotFound(_)
            | MatchNotFound(_)
            | ParticipantNotFound(_)
            | EntryNotFound { .. } => ErrorKind::NotFound,
            InvalidFinishType(_) | EmptyName => ErrorKind::InvalidInput,
            InvalidState(_)
            | NotEnoughParticipants(_)
            | TooManyParticipants { .. }
            | OpenMatches(_)
            | MatchDecided(_)
            | NotInMatch { .. }
            | NoBracket => ErrorKind::PreconditionFailed,
            DuplicateNickname(_) => ErrorKind::Conflict,
            Storage(_) => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentError::TournamentNotFound(id) => write!(f, "Tournament {id} not found"),
            TournamentError::MatchNotFound(id) => write!(f, "Match {id} not found"),
            TournamentError::ParticipantNotFound(id) => write!(f, "Participant {id} not found"),
            TournamentError::EntryNotFound { tournament, participant } => {
                write!(f, "Participant {participant} is not registered in tournament {tournament}")
            }
            TournamentError::InvalidFinishType(name) => write!(f, "Invalid finish type '{name}'"),
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::InvalidState(status) => {
                write!(f, "Not allowed while the tournament is {status}")
            }
            TournamentError::NotEnoughParticipants(found) => {
                write!(f, "Need at least 2 participants (have {found})")
            }
            TournamentError::TooManyParticipants { max, found } => {
                write!(f, "At most {max} participants are supported (have {found})")
            }
            TournamentError::OpenMatches(open) => {
                write!(f, "Current phase matches are not all finished ({open} open)")
            }
            TournamentError::MatchDecided(id) => write!(f, "Match {id} is already finished"),
            TournamentError::NotInMatch { match_id, participant } => {
                write!(f, "Participant {participant} does not play in match {match_id}")
            }
            TournamentError::NoBracket => write!(f, "Tournament has no bracket matches"),
            TournamentError::DuplicateNickname(name) => {
                write!(f, "A participant named '{name}' already exists")
            }
            TournamentError::Storage(reason) => write!(f, "Storage failure: {reason}"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = u64;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum TournamentStatus {
    /// Taking registrations; no groups yet.
    #[default]
    Created,
    /// Every participant carries a group label.
    GroupsGenerated,
    /// Round-robin matches are being played.
    InProgress,
    /// Elimination bracket is being played.
    BracketInProgress,
    /// Podium awarded (or ended early).
    Finished,
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single event. Matches and participant links live in the store, keyed by `id`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub date: DateTime<Utc>,
    pub is_archived: bool,
    pub status: TournamentStatus,
}

impl Tournament {
    /// Create an unsaved tournament in `Created` status.
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            date,
            is_archived: false,
            status: TournamentStatus::Created,
        }
    }

    /// Fail with `InvalidState` unless the tournament is in one of `allowed`.
    pub fn require_status(&self, allowed: &[TournamentStatus]) -> Result<(), TournamentError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(TournamentError::InvalidState(self.status))
        }
    }
}
