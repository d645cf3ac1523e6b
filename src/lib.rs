//! Beyblade X league organizer: library with models, engine logic, record store and HTTP API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    advance_phase, generate_groups, generate_matches, record_manual_score, record_win,
    reset_match, reset_tournament,
};
pub use models::{
    ErrorKind, FinishType, Match, MatchId, MatchPhase, NextMatch, Participant, ParticipantId,
    PlayerSlot, Slot, Tournament, TournamentError, TournamentId, TournamentParticipant,
    TournamentStatus,
};
pub use store::{MemoryStore, Records, Store};
