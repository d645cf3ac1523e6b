//! Match scoring: round results, manual corrections, and winner propagation.

use crate::models::{
    FinishType, Match, MatchId, ParticipantId, PlayerSlot, TournamentError, TournamentParticipant,
};
use crate::store::Records;

/// Award one round of `match_id` to `winner_id`.
///
/// The round adds the finish's points to the winner's score. Reaching the phase
/// threshold (7 in groups, 10 in the bracket) decides the match: stats are
/// credited and the winner is seated in the parent match, if any.
pub fn record_win<R: Records>(
    records: &mut R,
    match_id: MatchId,
    winner_id: ParticipantId,
    finish: FinishType,
) -> Result<Match, TournamentError> {
    let mut m = records.get_match(match_id)?;
    if m.is_finished() {
        return Err(TournamentError::MatchDecided(match_id));
    }

    if m.player1.is(winner_id) {
        m.score_p1 += finish.points();
    } else if m.player2.is(winner_id) {
        m.score_p2 += finish.points();
    } else {
        return Err(TournamentError::NotInMatch {
            match_id,
            participant: winner_id,
        });
    }

    m.decide_by_threshold();
    records.update_match(&m)?;

    if let Some(winner) = m.winner {
        log::info!("Match {match_id} won by participant {winner} ({finish} finish)");
        credit_result(records, &m, winner, finish)?;
        propagate_winner(records, &m)?;
    }
    Ok(m)
}

/// Overwrite both scores and re-decide the match from the threshold alone.
///
/// Finish counters are untouched. Dropping below the threshold clears the
/// winner; a winner already seated in the parent match stays there. A new
/// winner cannot replace the player of a parent match that is already decided.
pub fn record_manual_score<R: Records>(
    records: &mut R,
    match_id: MatchId,
    score_p1: u32,
    score_p2: u32,
) -> Result<Match, TournamentError> {
    let mut m = records.get_match(match_id)?;
    m.score_p1 = score_p1;
    m.score_p2 = score_p2;
    m.decide_by_threshold();
    records.update_match(&m)?;
    propagate_winner(records, &m)?;
    Ok(m)
}

/// Back to 0-0 with no winner. The parent match keeps any seated winner.
pub fn reset_match<R: Records>(
    records: &mut R,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    let mut m = records.get_match(match_id)?;
    m.score_p1 = 0;
    m.score_p2 = 0;
    m.winner = None;
    records.update_match(&m)?;
    Ok(m)
}

fn count_finish(entry: &mut TournamentParticipant, finish: FinishType) {
    match finish {
        FinishType::Spin => entry.spin_finishes += 1,
        FinishType::Burst => entry.burst_finishes += 1,
        FinishType::Over | FinishType::Out => entry.over_finishes += 1,
        FinishType::Xtreme => entry.xtreme_finishes += 1,
    }
}

fn credit_result<R: Records>(
    records: &mut R,
    m: &Match,
    winner: ParticipantId,
    finish: FinishType,
) -> Result<(), TournamentError> {
    let mut entry = records.entry(m.tournament_id, winner)?;
    entry.add_win();
    count_finish(&mut entry, finish);
    records.update_entry(&entry)?;

    if let Some(loser) = m.loser() {
        let mut entry = records.entry(m.tournament_id, loser)?;
        entry.add_loss();
        records.update_entry(&entry)?;
    }
    Ok(())
}

/// Seat the winner in the parent match. A decided parent only accepts the player it already holds.
fn propagate_winner<R: Records>(records: &mut R, m: &Match) -> Result<(), TournamentError> {
    let (Some(winner), Some(next)) = (m.winner, m.next_match) else {
        return Ok(());
    };
    let mut parent = records.get_match(next.id)?;
    let seat = PlayerSlot::Player(winner);
    if parent.is_finished() {
        if parent.slot(next.slot) == seat {
            return Ok(());
        }
        return Err(TournamentError::MatchDecided(parent.id));
    }
    parent.set_slot(next.slot, seat);
    records.update_match(&parent)
}
