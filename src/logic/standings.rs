//! League standings: per-participant totals over every tournament.

use crate::models::{ParticipantId, TournamentError};
use crate::store::Records;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the league table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LeagueStanding {
    pub participant_id: ParticipantId,
    pub nickname: String,
    pub total_wins: u32,
    pub total_points: u32,
    pub total_league_points: u32,
    pub total_spin: u32,
    pub total_burst: u32,
    pub total_over: u32,
    pub total_xtreme: u32,
    pub tournaments_played: u32,
}

/// Totals for every non-archived participant that joined at least one tournament,
/// ordered by league points, then wins.
pub fn league_standings<R: Records>(records: &R) -> Result<Vec<LeagueStanding>, TournamentError> {
    let participants: BTreeMap<ParticipantId, String> = records
        .participants(false)?
        .into_iter()
        .map(|p| (p.id, p.nickname))
        .collect();

    let mut table: BTreeMap<ParticipantId, LeagueStanding> = BTreeMap::new();
    for entry in records.entries(None)? {
        let Some(nickname) = participants.get(&entry.participant_id) else {
            continue;
        };
        let row = table
            .entry(entry.participant_id)
            .or_insert_with(|| LeagueStanding {
                participant_id: entry.participant_id,
                nickname: nickname.clone(),
                ..LeagueStanding::default()
            });
        row.total_wins += entry.wins;
        row.total_points += entry.points;
        row.total_league_points += entry.league_points;
        row.total_spin += entry.spin_finishes;
        row.total_burst += entry.burst_finishes;
        row.total_over += entry.over_finishes;
        row.total_xtreme += entry.xtreme_finishes;
        row.tournaments_played += 1;
    }

    let mut standings: Vec<_> = table.into_values().collect();
    standings.sort_by(|a, b| {
        b.total_league_points
            .cmp(&a.total_league_points)
            .then(b.total_wins.cmp(&a.total_wins))
    });
    Ok(standings)
}

/// CSV columns, in [`LeagueStanding`] field order.
const CSV_HEADER: [&str; 10] = [
    "participant_id",
    "nickname",
    "total_wins",
    "total_points",
    "total_league_points",
    "total_spin",
    "total_burst",
    "total_over",
    "total_xtreme",
    "tournaments_played",
];

/// The league table as CSV. The header row is written even for an empty table.
pub fn standings_csv(standings: &[LeagueStanding]) -> Result<String, TournamentError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| TournamentError::Storage(e.to_string()))?;
    for row in standings {
        writer
            .serialize(row)
            .map_err(|e| TournamentError::Storage(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| TournamentError::Storage(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TournamentError::Storage(e.to_string()))
}
