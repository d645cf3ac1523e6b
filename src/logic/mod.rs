//! Tournament business logic: registration, groups, round-robin, bracket, scoring, league points.

mod bracket;
mod groups;
mod league;
mod phase;
mod registration;
mod round_robin;
mod scoring;
mod standings;

pub use bracket::{build_bracket, round_count};
pub use groups::{assign_groups, group_count, group_label, MAX_PARTICIPANTS, TARGET_GROUP_SIZE};
pub use league::{
    podium_points, BRACKET_WIN_POINTS, PARTICIPATION_POINTS, QUALIFICATION_POINTS,
};
pub use phase::{
    advance_phase, close_bracket, close_group_stage, finish_early, generate_groups,
    generate_matches, reset_tournament, select_qualifiers, QUALIFIERS_PER_GROUP,
};
pub use registration::{
    archive_participant, create_participant, create_tournament, join_tournament,
    leave_tournament, set_tournament_archived, tournament_details, EntryDetails,
    TournamentDetails,
};
pub use round_robin::{schedule_group, schedule_groups};
pub use scoring::{record_manual_score, record_win, reset_match};
pub use standings::{league_standings, standings_csv, LeagueStanding};
