//! Tournament phase transitions:
//! Created → GroupsGenerated → InProgress → BracketInProgress → Finished, and reset.
//!
//! Each transition reads and writes through the given records handle; run it
//! inside one store transaction so a failure leaves nothing half-written.

use crate::logic::bracket::build_bracket;
use crate::logic::groups::assign_groups;
use crate::logic::round_robin::schedule_groups;
use crate::models::{
    Match, ParticipantId, Tournament, TournamentError, TournamentId, TournamentParticipant,
    TournamentStatus,
};
use crate::store::Records;
use std::collections::BTreeMap;

/// Best finishers per group that reach the bracket.
pub const QUALIFIERS_PER_GROUP: usize = 4;

/// Created/GroupsGenerated → GroupsGenerated: label every participant with a group.
pub fn generate_groups<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = records.tournament(tournament_id)?;
    tournament.require_status(&[TournamentStatus::Created, TournamentStatus::GroupsGenerated])?;

    let mut entries = records.entries(Some(tournament_id))?;
    assign_groups(&mut entries)?;
    for entry in &entries {
        records.update_entry(entry)?;
    }

    tournament.status = TournamentStatus::GroupsGenerated;
    records.update_tournament(&tournament)?;
    log::info!(
        "Tournament {tournament_id}: {} participant(s) split into groups",
        entries.len()
    );
    Ok(tournament)
}

/// GroupsGenerated → InProgress: save the round-robin of every group and award participation.
pub fn generate_matches<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = records.tournament(tournament_id)?;
    tournament.require_status(&[TournamentStatus::GroupsGenerated])?;

    let entries = records.entries(Some(tournament_id))?;
    let schedule = schedule_groups(tournament_id, &entries);
    let scheduled = schedule.len();
    for m in schedule {
        records.create_match(m)?;
    }
    for mut entry in entries {
        entry.award_participation();
        records.update_entry(&entry)?;
    }

    tournament.status = TournamentStatus::InProgress;
    records.update_tournament(&tournament)?;
    log::info!("Tournament {tournament_id}: {scheduled} group match(es) scheduled");
    Ok(tournament)
}

/// Move the tournament past its current phase.
///
/// One handler per status: the group stage closes into the bracket, the
/// bracket closes into the podium, anything else ends the tournament as is.
pub fn advance_phase<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = records.tournament(tournament_id)?;
    let from = tournament.status;
    let result = match from {
        TournamentStatus::InProgress => close_group_stage(records, &mut tournament),
        TournamentStatus::BracketInProgress => close_bracket(records, &mut tournament),
        TournamentStatus::Created
        | TournamentStatus::GroupsGenerated
        | TournamentStatus::Finished => {
            finish_early(&mut tournament);
            Ok(())
        }
    };
    if let Err(e) = result {
        log::debug!("Tournament {tournament_id}: cannot advance from {from}: {e}");
        return Err(e);
    }

    records.update_tournament(&tournament)?;
    log::info!(
        "Tournament {tournament_id} advanced from {from} to {}",
        tournament.status
    );
    Ok(tournament)
}

/// InProgress → BracketInProgress, or straight to Finished with fewer than two qualifiers.
pub fn close_group_stage<R: Records>(
    records: &mut R,
    tournament: &mut Tournament,
) -> Result<(), TournamentError> {
    let matches = records.matches(tournament.id)?;
    require_finished(&matches)?;

    let entries = records.entries(Some(tournament.id))?;
    let qualifiers = select_qualifiers(&entries);
    if qualifiers.len() < 2 {
        tournament.status = TournamentStatus::Finished;
        return Ok(());
    }

    let bracket = build_bracket(records, tournament.id, &qualifiers, 1)?;
    for &participant in &qualifiers {
        award(records, tournament.id, participant, |e| e.award_qualification())?;
    }
    log::info!(
        "Tournament {}: {} qualifier(s), {} bracket match(es)",
        tournament.id,
        qualifiers.len(),
        bracket.len()
    );
    tournament.status = TournamentStatus::BracketInProgress;
    Ok(())
}

/// BracketInProgress → Finished once the final is decided; awards the podium.
pub fn close_bracket<R: Records>(
    records: &mut R,
    tournament: &mut Tournament,
) -> Result<(), TournamentError> {
    let bracket: Vec<Match> = records
        .matches(tournament.id)?
        .into_iter()
        .filter(|m| m.phase.is_bracket())
        .collect();
    require_finished(&bracket)?;

    let final_round = bracket
        .iter()
        .map(|m| m.round)
        .max()
        .ok_or(TournamentError::NoBracket)?;
    let final_match = bracket
        .iter()
        .find(|m| m.round == final_round)
        .ok_or(TournamentError::NoBracket)?;
    let champion = final_match.winner.ok_or(TournamentError::OpenMatches(1))?;

    award(records, tournament.id, champion, |e| e.award_podium(1))?;
    if let Some(runner_up) = final_match.loser() {
        award(records, tournament.id, runner_up, |e| e.award_podium(2))?;
    }

    let semi_losers: Vec<ParticipantId> = bracket
        .iter()
        .filter(|m| m.next_match.is_some_and(|next| next.id == final_match.id))
        .filter_map(Match::loser)
        .collect();
    if let Some(third) = best_record(records, tournament.id, &semi_losers)? {
        award(records, tournament.id, third, |e| e.award_podium(3))?;
    }

    tournament.status = TournamentStatus::Finished;
    Ok(())
}

/// Any other status: end the tournament without awards.
pub fn finish_early(tournament: &mut Tournament) {
    tournament.status = TournamentStatus::Finished;
}

/// Any status → Created: drop every match and clear per-tournament stats.
///
/// League points are a cross-tournament ledger and stay as they are.
pub fn reset_tournament<R: Records>(
    records: &mut R,
    tournament_id: TournamentId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = records.tournament(tournament_id)?;

    let removed = records.delete_matches(tournament_id)?;
    for mut entry in records.entries(Some(tournament_id))? {
        entry.reset_stats();
        records.update_entry(&entry)?;
    }

    tournament.status = TournamentStatus::Created;
    records.update_tournament(&tournament)?;
    log::info!("Tournament {tournament_id} reset ({removed} match(es) removed)");
    Ok(tournament)
}

/// Top finishers of each group by points, then wins; groups visited in label order.
pub fn select_qualifiers(entries: &[TournamentParticipant]) -> Vec<ParticipantId> {
    let mut groups: BTreeMap<&str, Vec<&TournamentParticipant>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.group.is_empty()) {
        groups.entry(entry.group.as_str()).or_default().push(entry);
    }

    let mut qualifiers = Vec::new();
    for members in groups.values_mut() {
        members.sort_by(|a, b| b.points.cmp(&a.points).then(b.wins.cmp(&a.wins)));
        qualifiers.extend(
            members
                .iter()
                .take(QUALIFIERS_PER_GROUP)
                .map(|e| e.participant_id),
        );
    }
    qualifiers
}

fn require_finished(matches: &[Match]) -> Result<(), TournamentError> {
    let open = matches.iter().filter(|m| !m.is_finished()).count();
    if open > 0 {
        return Err(TournamentError::OpenMatches(open));
    }
    Ok(())
}

fn award<R, F>(
    records: &mut R,
    tournament_id: TournamentId,
    participant: ParticipantId,
    apply: F,
) -> Result<(), TournamentError>
where
    R: Records,
    F: FnOnce(&mut TournamentParticipant),
{
    let mut entry = records.entry(tournament_id, participant)?;
    apply(&mut entry);
    records.update_entry(&entry)
}

/// Candidate with most wins, then most group points; earliest listed wins ties.
fn best_record<R: Records>(
    records: &R,
    tournament_id: TournamentId,
    candidates: &[ParticipantId],
) -> Result<Option<ParticipantId>, TournamentError> {
    let mut entries = candidates
        .iter()
        .map(|&p| records.entry(tournament_id, p))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| b.wins.cmp(&a.wins).then(b.points.cmp(&a.points)));
    Ok(entries.first().map(|e| e.participant_id))
}
