//! REST API: one handler per engine operation, each run as a single store transaction.

use crate::logic::{
    advance_phase, archive_participant, create_participant, create_tournament, generate_groups,
    generate_matches, join_tournament, league_standings, leave_tournament, record_manual_score,
    record_win, reset_match, reset_tournament, set_tournament_archived, standings_csv,
    tournament_details,
};
use crate::models::{
    ErrorKind, FinishType, MatchId, ParticipantId, TournamentError, TournamentId,
};
use crate::store::{MemoryStore, Records, Store};
use actix_web::{
    delete, get, post,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shared record store for every request.
pub type AppState = Data<MemoryStore>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    include_archived: bool,
}

#[derive(Deserialize)]
struct CreateParticipantBody {
    nickname: String,
    #[serde(default)]
    avatar: String,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct JoinBody {
    participant_id: ParticipantId,
}

#[derive(Deserialize)]
struct ScoreBody {
    winner_id: ParticipantId,
    /// Spin, Over, Burst, Out or Xtreme.
    finish: String,
}

#[derive(Deserialize)]
struct ManualScoreBody {
    score_p1: u32,
    score_p2: u32,
}

/// Path segment: record id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct IdPath {
    id: u64,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct EntryPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::InvalidInput | ErrorKind::PreconditionFailed => {
            HttpResponse::BadRequest().json(body)
        }
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
        ErrorKind::Internal => {
            log::error!("{e}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn respond_created<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bbx-tournament",
    })
}

#[get("/api/participants")]
async fn api_list_participants(state: AppState, query: Query<ListQuery>) -> HttpResponse {
    respond(state.read(|db| db.participants(query.include_archived)))
}

#[post("/api/participants")]
async fn api_create_participant(
    state: AppState,
    body: Json<CreateParticipantBody>,
) -> HttpResponse {
    respond_created(
        state.transaction(|db| create_participant(db, &body.nickname, &body.avatar)),
    )
}

#[post("/api/participants/{id}/archive")]
async fn api_archive_participant(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| archive_participant(db, path.id)))
}

/// League table across all tournaments.
#[get("/api/stats")]
async fn api_league_stats(state: AppState) -> HttpResponse {
    respond(state.read(|db| league_standings(db)))
}

#[get("/api/stats.csv")]
async fn api_league_stats_csv(state: AppState) -> HttpResponse {
    match state.read(|db| league_standings(db)).and_then(|rows| standings_csv(&rows)) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState, query: Query<ListQuery>) -> HttpResponse {
    respond(state.read(|db| db.tournaments(query.include_archived)))
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    respond_created(state.transaction(|db| create_tournament(db, &body.name, body.date)))
}

/// Tournament with its participants and matches.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.read(|db| tournament_details(db, path.id)))
}

#[post("/api/tournaments/{id}/archive")]
async fn api_archive_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| set_tournament_archived(db, path.id, true)))
}

#[post("/api/tournaments/{id}/unarchive")]
async fn api_unarchive_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| set_tournament_archived(db, path.id, false)))
}

/// Register a participant (idempotent).
#[post("/api/tournaments/{id}/participants")]
async fn api_join_tournament(
    state: AppState,
    path: Path<IdPath>,
    body: Json<JoinBody>,
) -> HttpResponse {
    respond(state.transaction(|db| join_tournament(db, path.id, body.participant_id)))
}

/// Unregister a participant (tournament must be in Created).
#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_leave_tournament(state: AppState, path: Path<EntryPath>) -> HttpResponse {
    respond(state.transaction(|db| {
        leave_tournament(db, path.id, path.participant_id)?;
        tournament_details(db, path.id)
    }))
}

#[post("/api/tournaments/{id}/groups")]
async fn api_generate_groups(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| {
        generate_groups(db, path.id)?;
        tournament_details(db, path.id)
    }))
}

#[post("/api/tournaments/{id}/matches")]
async fn api_generate_matches(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| {
        generate_matches(db, path.id)?;
        tournament_details(db, path.id)
    }))
}

#[post("/api/tournaments/{id}/advance")]
async fn api_advance_phase(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| {
        advance_phase(db, path.id)?;
        tournament_details(db, path.id)
    }))
}

#[post("/api/tournaments/{id}/reset")]
async fn api_reset_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| {
        reset_tournament(db, path.id)?;
        tournament_details(db, path.id)
    }))
}

/// Award one round of a match.
#[post("/api/matches/{id}/score")]
async fn api_record_win(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let match_id: MatchId = path.id;
    let result = body.finish.parse::<FinishType>().and_then(|finish| {
        state.transaction(|db| record_win(db, match_id, body.winner_id, finish))
    });
    respond(result)
}

#[post("/api/matches/{id}/manual")]
async fn api_manual_score(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ManualScoreBody>,
) -> HttpResponse {
    respond(
        state.transaction(|db| record_manual_score(db, path.id, body.score_p1, body.score_p2)),
    )
}

#[post("/api/matches/{id}/reset")]
async fn api_reset_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.transaction(|db| reset_match(db, path.id)))
}

/// Register every route plus JSON error rendering for malformed bodies.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response =
            HttpResponse::BadRequest().json(serde_json::json!({ "error": err.to_string() }));
        actix_web::error::InternalError::from_response(err, response).into()
    }))
    .service(api_health)
    .service(api_list_participants)
    .service(api_create_participant)
    .service(api_archive_participant)
    .service(api_league_stats)
    .service(api_league_stats_csv)
    .service(api_list_tournaments)
    .service(api_create_tournament)
    .service(api_get_tournament)
    .service(api_archive_tournament)
    .service(api_unarchive_tournament)
    .service(api_join_tournament)
    .service(api_leave_tournament)
    .service(api_generate_groups)
    .service(api_generate_matches)
    .service(api_advance_phase)
    .service(api_reset_tournament)
    .service(api_record_win)
    .service(api_manual_score)
    .service(api_reset_match);
}
