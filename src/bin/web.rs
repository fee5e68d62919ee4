//! REST front end for the bracket engine.
//!
//! `POST /api/resolve` resolves a bracket from a player list and recorded results with
//! no server state. The `/api/tournaments` routes keep sessions in memory and drop
//! them after 12 hours without a request.
//!
//! Environment: `HOST` (default 0.0.0.0), `PORT` (default 8080), `RUST_LOG` (default info).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use placement_bracket::{
    clear_result, current_bracket, record_result, Player, PriorResults, ResultSnapshot, Resolver,
    Tournament, TournamentError, TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// A live session and when it was last used.
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// All live sessions by tournament id.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Sessions untouched for this long are dropped.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

const REAPER_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ResolveBody {
    players: Vec<Player>,
    #[serde(default)]
    results: PriorResults,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    elo: i32,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: String,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/wb-r1-m1)
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: String,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": "lock error" }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::MatchNotFound(_) | TournamentError::PlayerNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        // A structural failure means the bracket must not be shown or stored.
        TournamentError::Bracket(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

/// Run `f` on a tournament, refreshing its last activity. 404 if not found.
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.tournament)
        }
        None => not_found(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "placement-bracket",
    })
}

/// Stateless resolve: players + results in, seeds + matches + standings out.
#[post("/api/resolve")]
async fn api_resolve(body: Json<ResolveBody>) -> HttpResponse {
    match Resolver::new().view(&body.players, &body.results) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => {
            log::error!("Resolve failed: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let name = body.map(|b| b.into_inner().name).unwrap_or_default();
    let tournament = Tournament::new(name.trim());
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    log::info!("Created tournament {}", tournament.id);
    g.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| HttpResponse::Ok().json(&*t))
}

/// Add a player (only before any result is recorded).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        match t.add_player(body.name.as_str(), body.country.as_str(), body.elo) {
            Ok(player_id) => {
                log::info!("Tournament {}: added player {}", t.id, player_id);
                HttpResponse::Ok().json(&*t)
            }
            Err(e) => error_response(e),
        }
    })
}

/// Remove a player by id (only before any result is recorded).
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match t.remove_player(&path.player_id) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(e),
    })
}

/// Current bracket: seeds, every match, standings so far.
#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match current_bracket(t) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(e.into()),
    })
}

/// Record a match result; responds with the updated bracket.
#[put("/api/tournaments/{id}/matches/{match_id}")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ResultSnapshot>,
) -> HttpResponse {
    let snapshot = body.into_inner();
    with_tournament(&state, path.id, |t| {
        let updated = record_result(t, &path.match_id, snapshot)
            .and_then(|()| current_bracket(t).map_err(TournamentError::from));
        match updated {
            Ok(view) => HttpResponse::Ok().json(view),
            Err(e) => error_response(e),
        }
    })
}

/// Clear a match result; responds with the updated bracket.
#[delete("/api/tournaments/{id}/matches/{match_id}")]
async fn api_clear_result(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let updated = clear_result(t, &path.match_id)
            .and_then(|()| current_bracket(t).map_err(TournamentError::from));
        match updated {
            Ok(view) => HttpResponse::Ok().json(view),
            Err(e) => error_response(e),
        }
    })
}

/// Listen address, read from `HOST` and `PORT`.
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("PORT={} is not a port number, using 8080", raw);
                8080
            }),
            Err(_) => 8080,
        };
        Self { host, port }
    }
}

/// Drop sessions idle for longer than [`INACTIVITY_TIMEOUT`]. Returns how many went.
fn prune_idle_sessions(sessions: &mut HashMap<TournamentId, TournamentEntry>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
    before - sessions.len()
}

fn spawn_session_reaper(state: AppState) {
    actix_web::rt::spawn(async move {
        let mut ticks = actix_web::rt::time::interval(REAPER_INTERVAL);
        loop {
            ticks.tick().await;
            let Ok(mut sessions) = state.write() else {
                log::error!("Session map lock poisoned, skipping cleanup");
                continue;
            };
            let pruned = prune_idle_sessions(&mut sessions);
            if pruned > 0 {
                log::info!("Dropped {} idle tournament session(s), {} left", pruned, sessions.len());
            }
        }
    });
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Bracket server listening on http://{}:{}", config.host, config.port);

    let state: AppState = Data::new(RwLock::new(HashMap::new()));
    spawn_session_reaper(state.clone());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(actix_web::web::JsonConfig::default().limit(1 << 20))
            .service(api_health)
            .service(api_resolve)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_get_bracket)
            .service(api_record_result)
            .service(api_clear_result)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
