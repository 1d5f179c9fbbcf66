//! warp filters and handlers.
//!
//! Every simulation endpoint lives under `/api/simulation/` and answers
//! with the engine's result serialized as JSON. Errors go through
//! [`handle_rejection`].

use std::convert::Infallible;

use outbreak_logic::{validate_config, SimulationConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use warp::{Filter, Rejection, Reply};

use crate::error::{handle_rejection, reject, ApiError};
use crate::AppState;

/// Largest request body accepted.
const MAX_BODY_BYTES: u64 = 16 * 1024;

// ── Request/Response Models ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoomRequest {
    pub floor: usize,
    pub room: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AutoRunRequest {
    pub run: bool,
}

#[derive(Debug, Serialize)]
struct SetupResponse {
    success: bool,
    #[serde(flatten)]
    report: outbreak_logic::SetupReport,
}

// ── Filters ──────────────────────────────────────────────────────────────

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn with_cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Accept", "Content-Type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .max_age(3600)
}

/// All routes, with CORS, request logging and error recovery applied.
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handle_health);

    let api = warp::path("api").and(warp::path("simulation"));

    let get_state = warp::path!("state")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handle_state);

    let setup = warp::path!("setup")
        .and(warp::post())
        .and(json_body::<SimulationConfig>())
        .and(with_state(state.clone()))
        .and_then(handle_setup);

    let advance = warp::path!("advance")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handle_advance);

    let add_zombie = warp::path!("add-zombie")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handle_add_zombie);

    let add_practicante = warp::path!("add-practicante")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handle_add_practicante);

    let clean_room = warp::path!("clean-room")
        .and(warp::post())
        .and(json_body::<RoomRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_clean_room);

    let reset_sensor = warp::path!("reset-sensor")
        .and(warp::post())
        .and(json_body::<RoomRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_reset_sensor);

    let toggle_generation = warp::path!("toggle-zombie-generation")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handle_toggle_generation);

    let secret_weapon = warp::path!("use-secret-weapon")
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(handle_secret_weapon);

    let auto_run = warp::path!("auto-run")
        .and(warp::post())
        .and(json_body::<AutoRunRequest>())
        .and(with_state(state.clone()))
        .and_then(handle_auto_run);

    let reset = warp::path!("reset")
        .and(warp::post())
        .and(with_state(state))
        .and_then(handle_reset);

    let simulation = api.and(
        get_state
            .or(setup)
            .or(advance)
            .or(add_zombie)
            .or(add_practicante)
            .or(clean_room)
            .or(reset_sensor)
            .or(toggle_generation)
            .or(secret_weapon)
            .or(auto_run)
            .or(reset),
    );

    health
        .or(simulation)
        .recover(handle_rejection)
        .with(with_cors())
        .with(warp::log("outbreak_server"))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn handle_health() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "outbreak-server",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

async fn handle_state(state: AppState) -> Result<impl Reply, Rejection> {
    let sim = state.sim.lock().await;
    let snapshot = sim.get_state().map_err(reject)?;
    Ok(warp::reply::json(&snapshot))
}

async fn handle_setup(
    config: SimulationConfig,
    state: AppState,
) -> Result<impl Reply, Rejection> {
    let errors = validate_config(&config);
    if !errors.is_empty() {
        return Err(warp::reject::custom(ApiError::invalid_config(&errors)));
    }
    let mut sim = state.sim.lock().await;
    let report = sim.apply_config(&config).map_err(reject)?;
    Ok(warp::reply::json(&SetupResponse {
        success: true,
        report,
    }))
}

async fn handle_advance(state: AppState) -> Result<impl Reply, Rejection> {
    let mut sim = state.sim.lock().await;
    let report = sim.advance_turn().map_err(reject)?;
    Ok(warp::reply::json(&report))
}

async fn handle_add_zombie(state: AppState) -> Result<impl Reply, Rejection> {
    let mut sim = state.sim.lock().await;
    let result = sim.add_random_zombie().map_err(reject)?;
    Ok(warp::reply::json(&result))
}

async fn handle_add_practicante(state: AppState) -> Result<impl Reply, Rejection> {
    let mut sim = state.sim.lock().await;
    let result = sim.add_practicante().map_err(reject)?;
    Ok(warp::reply::json(&result))
}

async fn handle_clean_room(req: RoomRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let mut sim = state.sim.lock().await;
    let result = sim.clean_room(req.floor, req.room).map_err(reject)?;
    Ok(warp::reply::json(&result))
}

async fn handle_reset_sensor(req: RoomRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let mut sim = state.sim.lock().await;
    let result = sim.reset_sensor(req.floor, req.room).map_err(reject)?;
    Ok(warp::reply::json(&result))
}

async fn handle_toggle_generation(state: AppState) -> Result<impl Reply, Rejection> {
    let enabled = state.sim.lock().await.toggle_zombie_generation();
    Ok(warp::reply::json(&serde_json::json!({
        "zombie_generation_enabled": enabled,
    })))
}

async fn handle_secret_weapon(state: AppState) -> Result<impl Reply, Rejection> {
    let mut sim = state.sim.lock().await;
    let cleaned = sim.use_secret_weapon().map_err(reject)?;
    Ok(warp::reply::json(&serde_json::json!({
        "cleaned_count": cleaned,
    })))
}

async fn handle_auto_run(req: AutoRunRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let running = state.autorun.lock().await.set_running(req.run).await;
    Ok(warp::reply::json(&serde_json::json!({
        "auto_running": running,
    })))
}

async fn handle_reset(state: AppState) -> Result<impl Reply, Rejection> {
    // Stop the loop first so it cannot tick against the emptied simulation
    state.autorun.lock().await.stop().await;
    state.sim.lock().await.reset();
    Ok(warp::reply::json(&serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerArgs;
    use outbreak_logic::Simulation;
    use serde_json::{json, Value};
    use warp::http::StatusCode;

    fn app() -> AppState {
        AppState::new(Simulation::seeded(21), &ServerArgs::default())
    }

    async fn post(state: &AppState, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = warp::test::request().method("POST").path(path);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.reply(&routes(state.clone())).await;
        let json = serde_json::from_slice(res.body()).unwrap();
        (res.status(), json)
    }

    async fn get(state: &AppState, path: &str) -> (StatusCode, Value) {
        let res = warp::test::request()
            .method("GET")
            .path(path)
            .reply(&routes(state.clone()))
            .await;
        let json = serde_json::from_slice(res.body()).unwrap();
        (res.status(), json)
    }

    async fn setup(state: &AppState, floors: usize, rooms: usize, zombies: usize) {
        let (status, _) = post(
            state,
            "/api/simulation/setup",
            Some(json!({"floors": floors, "rooms_per_floor": rooms, "initial_zombies": zombies})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_ok() {
        let (status, body) = get(&app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn state_before_setup_is_not_found() {
        let (status, body) = get(&app(), "/api/simulation/state").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_CONFIGURED");
        assert_eq!(body["status_code"], 404);
    }

    #[tokio::test]
    async fn setup_returns_summary() {
        let state = app();
        let (status, body) = post(
            &state,
            "/api/simulation/setup",
            Some(json!({"floors": 2, "roomsPerFloor": 3, "initialZombies": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["building"]["total_rooms"], 8);
        assert_eq!(body["building"]["staircases"], 2);
        assert_eq!(body["zombies_added"].as_array().unwrap().len(), 1);

        let (status, body) = get(&state, "/api/simulation/state").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["turn"], 0);
        assert_eq!(body["infested_rooms"], 1);
        assert_eq!(body["game_over_reason"], Value::Null);
        assert_eq!(body["building"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_setup_is_bad_request() {
        let (status, body) = post(
            &app(),
            "/api/simulation/setup",
            Some(json!({"floors": 0, "rooms_per_floor": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_CONFIGURATION");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let state = app();
        let res = warp::test::request()
            .method("POST")
            .path("/api/simulation/clean-room")
            .header("content-type", "application/json")
            .body("{not json")
            .reply(&routes(state))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn advance_reports_turn() {
        let state = app();
        setup(&state, 2, 3, 1).await;
        let (status, body) = post(&state, "/api/simulation/advance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["turn"], 1);
        assert_eq!(body["total_infested"], 1);
        assert_eq!(body["game_over"], false);
    }

    #[tokio::test]
    async fn advance_before_setup_is_not_found() {
        let (status, _) = post(&app(), "/api/simulation/advance", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn clean_room_paths() {
        let state = app();
        setup(&state, 2, 3, 0).await;
        let (status, body) = post(
            &state,
            "/api/simulation/clean-room",
            Some(json!({"floor": 1, "room": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleaned"], false);

        let (status, body) = post(
            &state,
            "/api/simulation/clean-room",
            Some(json!({"floor": 7, "room": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "INVALID_LOCATION");
    }

    #[tokio::test]
    async fn reset_sensor_on_staircase() {
        let state = app();
        setup(&state, 2, 3, 0).await;
        let (status, body) = post(
            &state,
            "/api/simulation/reset-sensor",
            Some(json!({"floor": 0, "room": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reset"], false);
        assert!(body["message"].as_str().unwrap().contains("no sensor"));
    }

    #[tokio::test]
    async fn second_practicante_conflicts() {
        let state = app();
        setup(&state, 2, 3, 0).await;
        let (status, body) = post(&state, "/api/simulation/add-practicante", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["added"], true);
        assert!(body["room"].as_u64().unwrap() > 0);

        let (status, body) = post(&state, "/api/simulation/add-practicante", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn zombie_generation_and_weapon() {
        let state = app();
        setup(&state, 2, 3, 2).await;
        let (_, body) = post(&state, "/api/simulation/toggle-zombie-generation", None).await;
        assert_eq!(body["zombie_generation_enabled"], true);

        let (_, body) = post(&state, "/api/simulation/add-zombie", None).await;
        assert_eq!(body["added"], true);

        let (status, body) = post(&state, "/api/simulation/use-secret-weapon", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["cleaned_count"].as_u64().unwrap() <= 3);
    }

    #[tokio::test]
    async fn auto_run_toggles() {
        let state = app();
        setup(&state, 2, 3, 1).await;
        let (_, body) = post(&state, "/api/simulation/auto-run", Some(json!({"run": true}))).await;
        assert_eq!(body["auto_running"], true);
        let (_, body) = post(&state, "/api/simulation/auto-run", Some(json!({"run": false}))).await;
        assert_eq!(body["auto_running"], false);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let state = app();
        setup(&state, 2, 3, 1).await;
        post(&state, "/api/simulation/auto-run", Some(json!({"run": true}))).await;
        let (status, body) = post(&state, "/api/simulation/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(!state.autorun.lock().await.is_running());

        let (status, _) = get(&state, "/api/simulation/state").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_preflight_and_forbidden_method() {
        let filter = routes(app());
        let res = warp::test::request()
            .method("OPTIONS")
            .path("/api/simulation/advance")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()["access-control-allow-origin"], "http://localhost:5173");

        // A rejected preflight surfaces as a rejection from the outer filter
        let res = warp::test::request()
            .method("OPTIONS")
            .path("/api/simulation/advance")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "DELETE")
            .reply(&filter)
            .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let (status, body) = get(&app(), "/api/simulation/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status_code"], 404);
    }
}
