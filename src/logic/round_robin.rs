//! Round-robin schedule for the group stage (circle method).

use crate::models::{
    Match, MatchPhase, ParticipantId, PlayerSlot, TournamentId, TournamentParticipant,
};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Seat {
    Player(ParticipantId),
    Bye,
}

/// Every pairing of one group, round by round.
///
/// Seat 0 stays put while the other seats rotate one step after each round. An
/// odd group gets a bye seat; whoever faces it sits that round out.
pub fn schedule_group(
    tournament_id: TournamentId,
    label: &str,
    players: &[ParticipantId],
) -> Vec<Match> {
    if players.len() < 2 {
        return Vec::new();
    }

    let mut seats: Vec<Seat> = players.iter().copied().map(Seat::Player).collect();
    if seats.len() % 2 != 0 {
        seats.push(Seat::Bye);
    }
    let n = seats.len();

    let mut matches = Vec::with_capacity(players.len() * (players.len() - 1) / 2);
    for round in 1..n as u32 {
        for i in 0..n / 2 {
            if let (Seat::Player(p1), Seat::Player(p2)) = (seats[i], seats[n - 1 - i]) {
                matches.push(Match::new(
                    tournament_id,
                    MatchPhase::Group(label.to_string()),
                    round,
                    PlayerSlot::Player(p1),
                    PlayerSlot::Player(p2),
                ));
            }
        }
        seats[1..].rotate_right(1);
    }
    matches
}

/// Schedules for every group, in label order. Entries without a group are skipped.
pub fn schedule_groups(
    tournament_id: TournamentId,
    entries: &[TournamentParticipant],
) -> Vec<Match> {
    let mut groups: BTreeMap<&str, Vec<ParticipantId>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.group.is_empty()) {
        groups
            .entry(entry.group.as_str())
            .or_default()
            .push(entry.participant_id);
    }
    groups
        .into_iter()
        .flat_map(|(label, players)| schedule_group(tournament_id, label, &players))
        .collect()
}
