//! API Routes
//!
//! HTTP endpoint definitions. Request bodies are answered in place of the
//! interactive prompts: a supplied weight or confirmation is the operator's
//! answer, an absent one is a cancelled dialog.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::config::HerdSettings;
use crate::domain::{parse_date, today, BatchIdentifier, OperationContext};
use crate::error::AppError;
use crate::handlers::{
    BatchOverview, BreedingHandler, EntryStatus, GrowthAssessment, GrowthHandler, HistoryEntry,
    ReadyBatch, RecordServiceCommand, ReduceBatchCommand, ReductionOutcome, RegisterBatchCommand,
    RegistrationHandler, ServiceOutcome, SlaughterHandler,
};
use crate::notify::{Notifier, PresetAnswers, ReminderScheduler};
use crate::records::{Batch, BreedingEntry};
use crate::store::RecordStore;

// =========================================================================
// Application state
// =========================================================================

/// Handlers shared by every request
pub struct AppState<S> {
    pub registration: Arc<RegistrationHandler<S>>,
    pub growth: Arc<GrowthHandler<S>>,
    pub breeding: Arc<BreedingHandler<S>>,
    pub slaughter: Arc<SlaughterHandler<S>>,
    pub reminders: Arc<ReminderScheduler>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registration: Arc::clone(&self.registration),
            growth: Arc::clone(&self.growth),
            breeding: Arc::clone(&self.breeding),
            slaughter: Arc::clone(&self.slaughter),
            reminders: Arc::clone(&self.reminders),
        }
    }
}

impl<S: RecordStore> AppState<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>, settings: HerdSettings) -> Self {
        let reminders = Arc::new(ReminderScheduler::new(
            Arc::clone(&notifier),
            settings.reminder_delay,
            settings.notification_timeout,
        ));

        Self {
            registration: Arc::new(RegistrationHandler::new(Arc::clone(&store))),
            growth: Arc::new(GrowthHandler::new(Arc::clone(&store), settings.growth_seed)),
            breeding: Arc::new(BreedingHandler::new(
                Arc::clone(&store),
                notifier,
                Arc::clone(&reminders),
                settings.notification_timeout,
            )),
            slaughter: Arc::new(SlaughterHandler::new(
                store,
                settings.slaughter_threshold_days,
            )),
            reminders,
        }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterBatchRequest {
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub males: u32,
    pub females: u32,
    #[serde(default)]
    pub mother_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub actual_weight: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReductionRequest {
    pub males_removed: u32,
    pub females_removed: u32,
    pub average_weight: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub pig_identifier: String,
    /// `YYYY-MM-DD`
    pub served_date: String,
    /// Answer to the farrowing confirmation when the entry is due today
    #[serde(default)]
    pub confirm_farrowed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurgeResponse {
    pub removed: usize,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router<S: RecordStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/batches", post(register_batch::<S>).get(list_batches::<S>))
        .route("/batches/:identifier/assessment", post(assess_batch::<S>))
        .route("/batches/:identifier/reductions", post(reduce_batch::<S>))
        .route("/slaughter/ready", get(ready_batches::<S>))
        .route("/slaughter/history", get(slaughter_history::<S>))
        .route("/breeding", post(record_service::<S>).get(list_breeding::<S>))
        .route("/breeding/purge", post(purge_breeding::<S>))
        .route("/breeding/:id", delete(confirm_farrowed::<S>))
}

fn batch_identifier(raw: &str) -> Result<BatchIdentifier, AppError> {
    Ok(raw.parse::<BatchIdentifier>()?)
}

// =========================================================================
// Batches
// =========================================================================

async fn register_batch<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<RegisterBatchRequest>,
) -> Result<(StatusCode, Json<Batch>), AppError> {
    let command = RegisterBatchCommand::new(
        parse_date(&request.date_of_birth)?,
        request.males,
        request.females,
        request.mother_id,
    );

    let batch = state.registration.register(command, today()).await?;

    Ok((StatusCode::CREATED, Json(batch)))
}

async fn list_batches<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<BatchOverview>>, AppError> {
    Ok(Json(state.registration.list(today()).await?))
}

async fn assess_batch<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(identifier): Path<String>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<GrowthAssessment>, AppError> {
    let identifier = batch_identifier(&identifier)?;
    let answers = PresetAnswers::new().with_number(request.actual_weight);

    let assessment = state.growth.assess(identifier, today(), &answers).await?;

    Ok(Json(assessment))
}

// =========================================================================
// Slaughter
// =========================================================================

async fn ready_batches<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<ReadyBatch>>, AppError> {
    Ok(Json(state.slaughter.ready(today()).await?))
}

async fn reduce_batch<S: RecordStore>(
    State(state): State<AppState<S>>,
    Extension(context): Extension<OperationContext>,
    Path(identifier): Path<String>,
    Json(request): Json<ReductionRequest>,
) -> Result<(StatusCode, Json<ReductionOutcome>), AppError> {
    let command = ReduceBatchCommand::new(
        batch_identifier(&identifier)?,
        request.males_removed,
        request.females_removed,
        request.average_weight,
    );

    let outcome = state.slaughter.reduce(command, &context, today()).await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn slaughter_history<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.slaughter.history().await?))
}

// =========================================================================
// Breeding
// =========================================================================

async fn record_service<S: RecordStore>(
    State(state): State<AppState<S>>,
    Json(request): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<ServiceOutcome>), AppError> {
    let command = RecordServiceCommand::new(request.pig_identifier, parse_date(&request.served_date)?);
    let answers = PresetAnswers::new().with_confirmation(request.confirm_farrowed);

    let outcome = state
        .breeding
        .record_service(command, today(), &answers)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn list_breeding<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<EntryStatus>>, AppError> {
    Ok(Json(state.breeding.list(today()).await?))
}

async fn confirm_farrowed<S: RecordStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<BreedingEntry>, AppError> {
    Ok(Json(state.breeding.confirm_farrowed(id).await?))
}

async fn purge_breeding<S: RecordStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<PurgeResponse>, AppError> {
    let removed = state.breeding.purge_farrowed(today()).await?;
    Ok(Json(PurgeResponse { removed }))
}
