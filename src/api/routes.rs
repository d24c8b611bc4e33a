//! Axum router: scenarios, sessions, quizzes and calculators
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Liveness and live session count |
//! | GET | `/scenarios` | Scenario summaries |
//! | GET | `/scenarios/:id` | Full scenario definition |
//! | POST | `/sessions` | Start a session |
//! | GET | `/sessions/:id` | Current session view |
//! | POST | `/sessions/:id/turn` | Play one turn |
//! | POST | `/sessions/:id/end` | End a session, return its summary |
//! | GET | `/quiz` | Quiz topics |
//! | GET | `/quiz/:topic` | Questions of a topic |
//! | POST | `/quiz/:topic/:qid/check` | Grade an answer |
//! | POST | `/calc/...` | Numeric kernels |
//! | POST | `/bias/analyze`, `/bias/exponential` | Estimation analysis |

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::envelope::Envelope;
use crate::api::error::ApiError;
use crate::bias::{self, BiasAnalysis};
use crate::core::error::{LabError, Result};
use crate::core::types::{Difficulty, ResourceVector, SessionId, Turn};
use crate::engine::{SessionStore, SessionSummary, SessionView, StoreConfig, TurnOutcome};
use crate::numerics::{
    self, CascadeResult, CompoundComparison, ContributionResult, DoublingTime, ExpResult,
    NetworkGrowth, RabbitGrowth, RealReturn, VariableRateResult,
};
use crate::quiz::{CheckResult, QuizBank, QuizTopic};
use crate::scenarios::{Scenario, ScenarioCatalog, ScenarioSummary};

/// Shared, cheaply clonable handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ScenarioCatalog>,
    pub quiz: Arc<QuizBank>,
    pub store: Arc<SessionStore>,
}

impl AppState {
    pub fn new(catalog: ScenarioCatalog, quiz: QuizBank, store_config: StoreConfig) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            store: Arc::new(SessionStore::new(catalog.clone(), store_config)),
            catalog,
            quiz: Arc::new(quiz),
        }
    }

    /// State over the catalogues compiled into the binary
    pub fn builtin(store_config: StoreConfig) -> Result<Self> {
        Ok(Self::new(
            ScenarioCatalog::builtin()?,
            QuizBank::builtin()?,
            store_config,
        ))
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/scenarios", get(handle_list_scenarios))
        .route("/scenarios/:id", get(handle_get_scenario))
        .route("/sessions", post(handle_create_session))
        .route("/sessions/:id", get(handle_get_session))
        .route("/sessions/:id/turn", post(handle_play_turn))
        .route("/sessions/:id/end", post(handle_end_session))
        .route("/quiz", get(handle_quiz_topics))
        .route("/quiz/:topic", get(handle_quiz_questions))
        .route("/quiz/:topic/:qid/check", post(handle_quiz_check))
        .route("/calc/exponential", post(handle_exponential))
        .route("/calc/compound", post(handle_compound))
        .route("/calc/compound/contributions", post(handle_contributions))
        .route("/calc/compound/real", post(handle_compound_real))
        .route("/calc/compound/variable", post(handle_compound_variable))
        .route("/calc/rabbits", post(handle_rabbits))
        .route("/calc/cascade", post(handle_cascade))
        .route("/calc/social", post(handle_social))
        .route("/calc/doubling", post(handle_doubling))
        .route("/bias/analyze", post(handle_bias_analyze))
        .route("/bias/exponential", post(handle_bias_exponential))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

type ApiResult<T> = std::result::Result<Json<Envelope<T>>, ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope::ok(data)))
}

fn session_id(raw: &str) -> Result<SessionId> {
    SessionId::parse(raw).ok_or_else(|| LabError::UnknownSession(raw.to_string()))
}

// ── Request/Response types ──────────────────────────────────────────

#[derive(Serialize)]
struct Health {
    status: &'static str,
    sessions: usize,
}

#[derive(Deserialize)]
struct CreateSessionRequest {
    scenario_id: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

fn default_difficulty() -> String {
    Difficulty::Beginner.as_str().to_string()
}

#[derive(Serialize)]
struct CreatedSession {
    session_id: SessionId,
    scenario_id: String,
    difficulty: Difficulty,
    state: ResourceVector,
    turn: Turn,
    max_turns: u32,
}

#[derive(Deserialize)]
struct TurnRequest {
    action: String,
    amount: f64,
}

#[derive(Serialize)]
struct EndResponse {
    summary: SessionSummary,
}

#[derive(Deserialize)]
struct CheckRequest {
    choice_index: usize,
}

#[derive(Deserialize)]
struct ExponentialRequest {
    base: f64,
    exponent: f64,
}

#[derive(Deserialize)]
struct CompoundRequest {
    principal: f64,
    rate: f64,
    years: u32,
}

#[derive(Deserialize)]
struct ContributionsRequest {
    initial: f64,
    monthly_contribution: f64,
    rate: f64,
    years: u32,
}

#[derive(Deserialize)]
struct RealRequest {
    principal: f64,
    nominal_rate: f64,
    inflation: f64,
    years: u32,
}

#[derive(Deserialize)]
struct VariableRequest {
    principal: f64,
    rates: Vec<f64>,
    #[serde(default)]
    fees_rate: f64,
}

#[derive(Deserialize)]
struct RabbitRequest {
    start: f64,
    years: u32,
    multiplier: f64,
}

#[derive(Deserialize)]
struct CascadeRequest {
    initial: f64,
    multiplier: f64,
    periods: u32,
    recovery_rate: f64,
}

#[derive(Deserialize)]
struct SocialRequest {
    initial_users: f64,
    invite_rate: f64,
    periods: u32,
    population_cap: f64,
}

#[derive(Deserialize)]
struct DoublingRequest {
    principal: f64,
    rate: f64,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    user_estimation: f64,
    actual_value: f64,
}

#[derive(Deserialize)]
struct ExponentialEstimateRequest {
    user_estimation: f64,
    base: f64,
    power: f64,
}

// ── Scenario and session handlers ───────────────────────────────────

async fn handle_health(State(state): State<AppState>) -> ApiResult<Health> {
    ok(Health {
        status: "ok",
        sessions: state.store.len(),
    })
}

async fn handle_list_scenarios(State(state): State<AppState>) -> ApiResult<Vec<ScenarioSummary>> {
    ok(state.catalog.summaries())
}

async fn handle_get_scenario(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Scenario> {
    ok(state.catalog.get(&id)?.clone())
}

async fn handle_create_session(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateSessionRequest>, JsonRejection>,
) -> ApiResult<CreatedSession> {
    let Json(req) = payload?;
    let view = state.store.create_session(&req.scenario_id, &req.difficulty)?;
    ok(CreatedSession {
        session_id: view.session_id,
        scenario_id: view.scenario_id,
        difficulty: view.difficulty,
        state: view.state,
        turn: view.turn,
        max_turns: view.max_turns,
    })
}

async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SessionView> {
    ok(state.store.get_state(session_id(&id)?)?)
}

async fn handle_play_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<TurnRequest>, JsonRejection>,
) -> ApiResult<TurnOutcome> {
    let id = session_id(&id)?;
    let Json(req) = payload?;
    ok(state.store.play_turn(id, &req.action, req.amount)?)
}

async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<EndResponse> {
    let summary = state.store.end_session(session_id(&id)?)?;
    ok(EndResponse { summary })
}

// ── Quiz handlers ───────────────────────────────────────────────────

async fn handle_quiz_topics() -> ApiResult<Vec<QuizTopic>> {
    ok(QuizTopic::ALL.to_vec())
}

async fn handle_quiz_questions(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> ApiResult<serde_json::Value> {
    let questions = state.quiz.questions(&topic)?;
    ok(serde_json::to_value(questions).map_err(LabError::from)?)
}

async fn handle_quiz_check(
    State(state): State<AppState>,
    Path((topic, qid)): Path<(String, String)>,
    payload: std::result::Result<Json<CheckRequest>, JsonRejection>,
) -> ApiResult<CheckResult> {
    let Json(req) = payload?;
    ok(state.quiz.check_in_topic(&topic, &qid, req.choice_index)?)
}

// ── Calculator handlers ─────────────────────────────────────────────

async fn handle_exponential(
    payload: std::result::Result<Json<ExponentialRequest>, JsonRejection>,
) -> ApiResult<ExpResult> {
    let Json(req) = payload?;
    ok(numerics::exp(req.base, req.exponent)?)
}

async fn handle_compound(
    payload: std::result::Result<Json<CompoundRequest>, JsonRejection>,
) -> ApiResult<CompoundComparison> {
    let Json(req) = payload?;
    ok(numerics::compound(req.principal, req.rate, req.years)?)
}

async fn handle_contributions(
    payload: std::result::Result<Json<ContributionsRequest>, JsonRejection>,
) -> ApiResult<ContributionResult> {
    let Json(req) = payload?;
    ok(numerics::compound_with_contributions(
        req.initial,
        req.monthly_contribution,
        req.rate,
        req.years,
    )?)
}

async fn handle_compound_real(
    payload: std::result::Result<Json<RealRequest>, JsonRejection>,
) -> ApiResult<RealReturn> {
    let Json(req) = payload?;
    ok(numerics::compound_real(
        req.principal,
        req.nominal_rate,
        req.inflation,
        req.years,
    )?)
}

async fn handle_compound_variable(
    payload: std::result::Result<Json<VariableRequest>, JsonRejection>,
) -> ApiResult<VariableRateResult> {
    let Json(req) = payload?;
    ok(numerics::compound_variable_rates(
        req.principal,
        &req.rates,
        req.fees_rate,
    )?)
}

async fn handle_rabbits(
    payload: std::result::Result<Json<RabbitRequest>, JsonRejection>,
) -> ApiResult<RabbitGrowth> {
    let Json(req) = payload?;
    ok(numerics::rabbit_growth(req.start, req.years, req.multiplier)?)
}

async fn handle_cascade(
    payload: std::result::Result<Json<CascadeRequest>, JsonRejection>,
) -> ApiResult<CascadeResult> {
    let Json(req) = payload?;
    ok(numerics::cascading_failure(
        req.initial,
        req.multiplier,
        req.periods,
        req.recovery_rate,
    )?)
}

async fn handle_social(
    payload: std::result::Result<Json<SocialRequest>, JsonRejection>,
) -> ApiResult<NetworkGrowth> {
    let Json(req) = payload?;
    ok(numerics::social_network_growth(
        req.initial_users,
        req.invite_rate,
        req.periods,
        req.population_cap,
    )?)
}

async fn handle_doubling(
    payload: std::result::Result<Json<DoublingRequest>, JsonRejection>,
) -> ApiResult<DoublingTime> {
    let Json(req) = payload?;
    ok(numerics::doubling_time(req.principal, req.rate)?)
}

// ── Bias handlers ───────────────────────────────────────────────────

async fn handle_bias_analyze(
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<BiasAnalysis> {
    let Json(req) = payload?;
    ok(bias::analyze(req.user_estimation, req.actual_value)?)
}

async fn handle_bias_exponential(
    payload: std::result::Result<Json<ExponentialEstimateRequest>, JsonRejection>,
) -> ApiResult<BiasAnalysis> {
    let Json(req) = payload?;
    ok(bias::analyze_exponential(
        req.user_estimation,
        req.base,
        req.power,
    )?)
}
