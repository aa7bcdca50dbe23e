//! Axum route handlers for JD registration and evaluation runs.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analytics::{export_csv, skill_gaps, SkillGap, DEFAULT_TOP_SKILL_GAPS};
use crate::errors::AppError;
use crate::evaluation::batch::{run_batch, FileFailure, Upload};
use crate::evaluation::session::{RunSummary, PASTED_JD_NAME};
use crate::extraction::DocumentFormat;
use crate::feedback::Feedback;
use crate::models::document::JobDescriptionSummary;
use crate::models::evaluation::EvaluationRecord;
use crate::scoring::sections::{extract_sections, ResumeSection};
use crate::scoring::simulator::{project, Projection};
use crate::scoring::{ScoringWeights, SkillVocabulary};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddJdRequest {
    pub name: Option<String>,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadJdsResponse {
    pub added: Vec<JobDescriptionSummary>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationRunResponse {
    pub run: RunSummary,
    pub records: Vec<EvaluationRecord>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationListResponse {
    pub last_run: Option<RunSummary>,
    pub records: Vec<EvaluationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SkillGapQuery {
    pub top: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub file_name: String,
    pub format: DocumentFormat,
    pub characters: usize,
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// JD handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jds
pub async fn handle_add_jd(
    State(state): State<AppState>,
    Json(req): Json<AddJdRequest>,
) -> Result<(StatusCode, Json<JobDescriptionSummary>), AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("JD text must not be empty".to_string()));
    }
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| PASTED_JD_NAME.to_string());

    let mut session = state.session.write().await;
    let index = session.add_jd(name, req.text);
    let summary = session.jd(index).map(|jd| jd.summary()).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("JD {index} missing right after insert"))
    })?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// POST /api/v1/jds/upload
pub async fn handle_upload_jds(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadJdsResponse>, AppError> {
    let uploads = read_file_fields(multipart).await?;
    if uploads.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one JD file".to_string(),
        ));
    }

    let mut extracted = Vec::new();
    let mut failures = Vec::new();
    for upload in uploads {
        match state.extractor.extract(&upload.file_name, &upload.bytes) {
            Ok(text) => extracted.push((upload.file_name, text)),
            Err(e) => {
                tracing::warn!("Skipping JD {}: {e}", upload.file_name);
                failures.push(FileFailure {
                    file_name: upload.file_name,
                    error: e.to_string(),
                });
            }
        }
    }

    let mut session = state.session.write().await;
    let added = extracted
        .into_iter()
        .filter_map(|(name, text)| {
            let index = session.add_jd(name, text);
            session.jd(index).map(|jd| jd.summary())
        })
        .collect();
    Ok(Json(UploadJdsResponse { added, failures }))
}

/// GET /api/v1/jds
pub async fn handle_list_jds(State(state): State<AppState>) -> Json<Vec<JobDescriptionSummary>> {
    Json(state.session.read().await.jd_summaries())
}

/// DELETE /api/v1/jds
pub async fn handle_clear_jds(State(state): State<AppState>) -> StatusCode {
    state.session.write().await.clear_jds();
    StatusCode::NO_CONTENT
}

/// POST /api/v1/extract
/// Extracts one uploaded file and returns its text, for previewing a document.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let upload = read_file_fields(multipart)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let format = DocumentFormat::detect(&upload.file_name, &upload.bytes);
    let text = state.extractor.extract(&upload.file_name, &upload.bytes)?;
    Ok(Json(ExtractResponse {
        file_name: upload.file_name,
        format,
        characters: text.chars().count(),
        text,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/evaluations
/// Multipart fields: `resumes` (files), `hard_weight` (optional), `skills` (optional,
/// comma-separated vocabulary override).
pub async fn handle_create_evaluation(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<EvaluationRunResponse>, AppError> {
    let mut uploads = Vec::new();
    let mut hard_weight = state.config.default_hard_weight;
    let mut vocabulary: Option<SkillVocabulary> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resumes" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                uploads.push(Upload::new(file_name, bytes));
            }
            "hard_weight" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                hard_weight = parse_hard_weight(&raw)?;
            }
            "skills" => {
                let raw = field.text().await.map_err(bad_multipart)?;
                vocabulary = Some(SkillVocabulary::from_comma_list(&raw))
                    .filter(|v| !v.is_empty());
            }
            _ => {}
        }
    }

    let (jds, jd_generation) = {
        let session = state.session.read().await;
        (session.jds().to_vec(), session.jd_generation())
    };
    if jds.is_empty() {
        return Err(AppError::Validation(
            "Please provide at least one Job Description".to_string(),
        ));
    }
    if uploads.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one resume".to_string(),
        ));
    }

    let weights = ScoringWeights::from_hard_weight(hard_weight);
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(
        "Evaluation run {run_id}: {} résumé(s) × {} JD(s), weights {:?}",
        uploads.len(),
        jds.len(),
        weights
    );

    let evaluator = state.evaluator.clone();
    let extractor = state.extractor;
    let jd_count = jds.len();
    let outcome = tokio::task::spawn_blocking(move || {
        run_batch(
            &evaluator,
            &extractor,
            &uploads,
            &jds,
            weights,
            vocabulary.as_ref(),
        )
    })
    .await
    .map_err(|e| anyhow::anyhow!("Evaluation task failed: {e}"))?;

    let run = RunSummary {
        run_id,
        started_at,
        weights,
        resumes_scored: outcome.records.len(),
        resumes_failed: outcome.failures.len(),
        jd_count,
    };
    state
        .session
        .write()
        .await
        .store_run(jd_generation, run.clone(), outcome.records.clone())
        .map_err(|e| AppError::Conflict(e.to_string()))?;

    Ok(Json(EvaluationRunResponse {
        run,
        records: outcome.records,
        failures: outcome.failures,
    }))
}

/// GET /api/v1/evaluations
pub async fn handle_list_evaluations(State(state): State<AppState>) -> Json<EvaluationListResponse> {
    let session = state.session.read().await;
    Json(EvaluationListResponse {
        last_run: session.last_run().cloned(),
        records: session.results().to_vec(),
    })
}

/// GET /api/v1/evaluations/skill-gaps?top=N
pub async fn handle_skill_gaps(
    State(state): State<AppState>,
    Query(params): Query<SkillGapQuery>,
) -> Json<Vec<SkillGap>> {
    let top = params.top.unwrap_or(DEFAULT_TOP_SKILL_GAPS);
    Json(skill_gaps(state.session.read().await.results(), top))
}

/// GET /api/v1/evaluations/export
pub async fn handle_export(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = export_csv(state.session.read().await.results())?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"results.csv\"",
            ),
        ],
        csv,
    ))
}

/// GET /api/v1/evaluations/:index
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<EvaluationRecord>, AppError> {
    let session = state.session.read().await;
    let record = session.result(index).ok_or_else(|| not_found(index))?;
    Ok(Json(record.clone()))
}

/// GET /api/v1/evaluations/:index/sections
pub async fn handle_sections(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Vec<ResumeSection>>, AppError> {
    let session = state.session.read().await;
    let record = session.result(index).ok_or_else(|| not_found(index))?;
    Ok(Json(extract_sections(&record.resume_text)))
}

/// POST /api/v1/evaluations/:index/simulate
/// Projects the score with the last run's weights.
pub async fn handle_simulate(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<Projection>, AppError> {
    let session = state.session.read().await;
    let record = session.result(index).ok_or_else(|| not_found(index))?;
    let weights = session
        .last_run()
        .map(|run| run.weights)
        .unwrap_or_else(|| ScoringWeights::from_hard_weight(state.config.default_hard_weight));
    Ok(Json(project(record, &req.skills, weights)))
}

/// POST /api/v1/evaluations/:index/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Feedback>, AppError> {
    let (jd_text, record) = {
        let session = state.session.read().await;
        let record = session.result(index).ok_or_else(|| not_found(index))?.clone();
        let jd = session.jd(record.jd_index).ok_or_else(|| {
            AppError::NotFound(format!("JD {} for evaluation {index} not found", record.jd_index))
        })?;
        (jd.document.clean_text().to_string(), record)
    };

    let feedback = state
        .feedback
        .generate(&jd_text, &record.resume_text, &record.missing_skills)
        .await;
    Ok(Json(feedback))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Collects every field that carries a file name. Plain form fields are skipped.
async fn read_file_fields(mut multipart: Multipart) -> Result<Vec<Upload>, AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(bad_multipart)?;
        uploads.push(Upload::new(file_name, bytes));
    }
    Ok(uploads)
}

fn parse_hard_weight(raw: &str) -> Result<f64, AppError> {
    let weight: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("hard_weight must be a number, got {raw:?}")))?;
    if !(0.0..=1.0).contains(&weight) {
        return Err(AppError::Validation(format!(
            "hard_weight must be between 0.0 and 1.0, got {weight}"
        )));
    }
    Ok(weight)
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}

fn not_found(index: usize) -> AppError {
    AppError::NotFound(format!("Evaluation {index} not found"))
}
