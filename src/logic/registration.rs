//! Registration: participants, tournaments, and who plays in which tournament.

use crate::models::{
    Match, Participant, ParticipantId, Tournament, TournamentError, TournamentId,
    TournamentParticipant, TournamentStatus,
};
use crate::store::Records;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tournament participant link together with the participant it points at.
#[derive(Clone, Debug, Serialize)]
pub struct EntryDetails {
    #[serde(flatten)]
    pub entry: TournamentParticipant,
    pub participant: Participant,
}

/// Everything a tournament page needs in one response.
#[derive(Clone, Debug, Serialize)]
pub struct TournamentDetails {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub tournament_participants: Vec<EntryDetails>,
    pub matches: Vec<Match>,
}

/// Register a new participant. Nicknames are unique (case-insensitive).
pub fn create_participant<R: Records>(
    records: &mut R,
    nickname: &str,
    avatar: &str,
) -> Result<Participant, TournamentError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    if records.find_participant_by_nickname(nickname)?.is_some() {
        return Err(TournamentError::DuplicateNickname(nickname.to_string()));
    }
    let mut participant = Participant::new(nickname, avatar.trim());
    participant.id = records.create_participant(participant.clone())?;
    Ok(participant)
}

/// Soft-delete a participant; their tournament history stays.
pub fn archive_participant<R: Records>(
    records: &mut R,
    participant_id: ParticipantId,
) -> Result<Participant, TournamentError> {
    let mut participant = records.participant(participant_id)?;
    participant.is_archived = true;
    records.update_participant(&participant)?;
    Ok(participant)
}

/// Create a tournament in `Created` status; no date means now.
pub fn create_tournament<R: Records>(
    records: &mut R,
    name: &str,
    date: Option<DateTime<Utc>>,
) -> Result<Tournament, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    let mut tournament = Tournament::new(name, date.unwrap_or_else(Utc::now));
    tournament.id = records.create_tournament(tournament.clone())?;
    Ok(tournament)
}

pub fn set_tournament_archived<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
    archived: bool,
) -> Result<Tournament, TournamentError> {
    let mut tournament = records.tournament(tournament_id)?;
    tournament.is_archived = archived;
    records.update_tournament(&tournament)?;
    Ok(tournament)
}

pub fn tournament_details<R: Records>(
    records: &R,
    tournament_id: TournamentId,
) -> Result<TournamentDetails, TournamentError> {
    let tournament = records.tournament(tournament_id)?;
    let tournament_participants = records
        .entries(Some(tournament_id))?
        .into_iter()
        .map(|entry| {
            let participant = records.participant(entry.participant_id)?;
            Ok(EntryDetails { entry, participant })
        })
        .collect::<Result<Vec<_>, TournamentError>>()?;
    let matches = records.matches(tournament_id)?;
    Ok(TournamentDetails {
        tournament,
        tournament_participants,
        matches,
    })
}

/// Add a participant to a tournament that has not been split into groups yet.
///
/// Joining twice is a no-op and returns the existing link.
pub fn join_tournament<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
    participant_id: ParticipantId,
) -> Result<TournamentParticipant, TournamentError> {
    let tournament = records.tournament(tournament_id)?;
    records.participant(participant_id)?;
    if let Some(existing) = records.find_entry(tournament_id, participant_id)? {
        return Ok(existing);
    }
    tournament.require_status(&[TournamentStatus::Created])?;

    let mut entry = TournamentParticipant::new(tournament_id, participant_id);
    entry.id = records.create_entry(entry.clone())?;
    Ok(entry)
}

/// Remove a participant from a tournament (only valid in `Created`).
pub fn leave_tournament<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
    participant_id: ParticipantId,
) -> Result<(), TournamentError> {
    let tournament = records.tournament(tournament_id)?;
    tournament.require_status(&[TournamentStatus::Created])?;
    if let Some(entry) = records.find_entry(tournament_id, participant_id)? {
        records.delete_entry(entry.id)?;
    }
    Ok(())
}
