//! Integration tests for the group stage: groups, round-robin, qualification into the bracket.

use bbx_tournament::logic::{create_participant, create_tournament, join_tournament};
use bbx_tournament::{
    advance_phase, generate_groups, generate_matches, record_win, FinishType, MatchPhase,
    MemoryStore, ParticipantId, PlayerSlot, Records, Slot, Store, TournamentError, TournamentId,
    TournamentStatus,
};

fn tournament_with_players(n: usize) -> (MemoryStore, TournamentId, Vec<ParticipantId>) {
    let store = MemoryStore::new();
    let (t, players) = store
        .transaction(|db| {
            let players = (0..n)
                .map(|i| create_participant(db, &format!("Blader_{i}"), "").map(|p| p.id))
                .collect::<Result<Vec<_>, _>>()?;
            let t = create_tournament(db, "Weekly", None)?;
            for &p in &players {
                join_tournament(db, t.id, p)?;
            }
            Ok((t.id, players))
        })
        .unwrap();
    (store, t, players)
}

/// Xtreme finishes for `winner` until the match is decided.
fn play(store: &MemoryStore, match_id: u64, winner: ParticipantId) {
    loop {
        let m = store
            .transaction(|db| record_win(db, match_id, winner, FinishType::Xtreme))
            .unwrap();
        if m.winner.is_some() {
            assert_eq!(m.winner, Some(winner));
            return;
        }
    }
}

/// Decide every open group match in favour of the earlier-registered player.
fn play_group_stage(store: &MemoryStore, t: TournamentId) {
    let matches = store.read(|db| db.matches(t)).unwrap();
    for m in matches.iter().filter(|m| !m.phase.is_bracket()) {
        let (a, b) = (m.player1.player().unwrap(), m.player2.player().unwrap());
        play(store, m.id, a.min(b));
    }
}

#[test]
fn generate_groups_requires_two_participants() {
    let (store, t, _) = tournament_with_players(1);
    assert_eq!(
        store.transaction(|db| generate_groups(db, t)),
        Err(TournamentError::NotEnoughParticipants(1))
    );
    let status = store.read(|db| db.tournament(t)).unwrap().status;
    assert_eq!(status, TournamentStatus::Created);
}

#[test]
fn matches_need_groups_first() {
    let (store, t, _) = tournament_with_players(4);
    assert_eq!(
        store.transaction(|db| generate_matches(db, t)),
        Err(TournamentError::InvalidState(TournamentStatus::Created))
    );
}

#[test]
fn nine_players_play_one_group_of_thirty_six_matches() {
    let (store, t, _) = tournament_with_players(9);
    store.transaction(|db| generate_groups(db, t)).unwrap();
    let tournament = store.transaction(|db| generate_matches(db, t)).unwrap();
    assert_eq!(tournament.status, TournamentStatus::InProgress);

    let entries = store.read(|db| db.entries(Some(t))).unwrap();
    assert!(entries.iter().all(|e| e.group == "A"));
    assert!(entries.iter().all(|e| e.league_points == 5));

    let matches = store.read(|db| db.matches(t)).unwrap();
    assert_eq!(matches.len(), 36);
    assert!(matches
        .iter()
        .all(|m| m.phase == MatchPhase::Group("A".into())));
    for round in 1..=9 {
        assert_eq!(matches.iter().filter(|m| m.round == round).count(), 4);
    }
}

#[test]
fn groups_can_be_regenerated_until_matches_exist() {
    let (store, t, _) = tournament_with_players(12);
    store.transaction(|db| generate_groups(db, t)).unwrap();
    store.transaction(|db| generate_groups(db, t)).unwrap();
    store.transaction(|db| generate_matches(db, t)).unwrap();
    assert_eq!(
        store.transaction(|db| generate_groups(db, t)),
        Err(TournamentError::InvalidState(TournamentStatus::InProgress))
    );
}

#[test]
fn advance_waits_for_every_group_match() {
    let (store, t, players) = tournament_with_players(4);
    store.transaction(|db| generate_groups(db, t)).unwrap();
    store.transaction(|db| generate_matches(db, t)).unwrap();

    let first = store.read(|db| db.matches(t)).unwrap()[0].clone();
    play(&store, first.id, first.player1.player().unwrap());

    assert_eq!(
        store.transaction(|db| advance_phase(db, t)),
        Err(TournamentError::OpenMatches(5))
    );
    let status = store.read(|db| db.tournament(t)).unwrap().status;
    assert_eq!(status, TournamentStatus::InProgress);
    let entries = store.read(|db| db.entries(Some(t))).unwrap();
    assert!(entries.iter().all(|e| e.league_points == 5));
    assert_eq!(players.len(), 4);
}

#[test]
fn top_four_qualify_into_a_two_round_bracket() {
    let (store, t, players) = tournament_with_players(9);
    store.transaction(|db| generate_groups(db, t)).unwrap();
    store.transaction(|db| generate_matches(db, t)).unwrap();
    play_group_stage(&store, t);

    let tournament = store.transaction(|db| advance_phase(db, t)).unwrap();
    assert_eq!(tournament.status, TournamentStatus::BracketInProgress);

    let bracket: Vec<_> = store
        .read(|db| db.matches(t))
        .unwrap()
        .into_iter()
        .filter(|m| m.phase.is_bracket())
        .collect();
    assert_eq!(bracket.len(), 3);

    let final_match = bracket.iter().find(|m| m.round == 2).unwrap();
    let semis: Vec<_> = bracket.iter().filter(|m| m.round == 1).collect();
    assert_eq!(semis.len(), 2);
    assert_eq!(semis[0].player1, PlayerSlot::Player(players[0]));
    assert_eq!(semis[0].player2, PlayerSlot::Player(players[1]));
    assert_eq!(semis[1].player1, PlayerSlot::Player(players[2]));
    assert_eq!(semis[1].player2, PlayerSlot::Player(players[3]));
    assert_eq!(semis[0].next_match.unwrap().id, final_match.id);
    assert_eq!(semis[0].next_match.unwrap().slot, Slot::One);
    assert_eq!(semis[1].next_match.unwrap().slot, Slot::Two);

    let entries = store.read(|db| db.entries(Some(t))).unwrap();
    for e in &entries {
        let qualified = players[..4].contains(&e.participant_id);
        assert_eq!(e.league_points, if qualified { 13 } else { 5 });
    }
}

#[test]
fn two_groups_send_eight_qualifiers() {
    let (store, t, _) = tournament_with_players(12);
    store.transaction(|db| generate_groups(db, t)).unwrap();
    store.transaction(|db| generate_matches(db, t)).unwrap();

    let matches = store.read(|db| db.matches(t)).unwrap();
    assert_eq!(matches.len(), 30);
    assert_eq!(
        matches
            .iter()
            .filter(|m| m.phase == MatchPhase::Group("Group B".into()))
            .count(),
        15
    );

    play_group_stage(&store, t);
    store.transaction(|db| advance_phase(db, t)).unwrap();

    let bracket: Vec<_> = store
        .read(|db| db.matches(t))
        .unwrap()
        .into_iter()
        .filter(|m| m.phase.is_bracket())
        .collect();
    assert_eq!(bracket.len(), 7);
    let qualified = store
        .read(|db| db.entries(Some(t)))
        .unwrap()
        .iter()
        .filter(|e| e.league_points == 13)
        .count();
    assert_eq!(qualified, 8);
}
