//! REST API handlers and wire types for the journal.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::audio;
use crate::auth::AuthUser;
use crate::config::SETTINGS;
use crate::ml::SidecarClient;
use crate::nlp::{AnalysisResult, AnalyzeError, Analyzer};

pub struct AppState {
    pub pool: PgPool,
    pub analyzer: Analyzer,
    pub sidecar: Option<SidecarClient>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
}

type ApiRejection = (StatusCode, Json<ApiError>);

fn reject(status: StatusCode, message: impl Into<String>) -> ApiRejection {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
}

fn internal_error(e: impl std::fmt::Display) -> ApiRejection {
    tracing::error!("internal error: {e}");
    reject(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

// ============================================================================
// Journal entries
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJournalRequest {
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, FromRow)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: String,
    pub text: String,
    pub mood_score: Option<i32>,
    pub sentiment: Option<f32>,
    pub sentiment_label: Option<String>,
    pub emotion: Option<String>,
    pub emotion_scores: Option<serde_json::Value>,
    pub themes: Option<serde_json::Value>,
    pub suggestions: Option<serde_json::Value>,
    pub highlighted_phrases: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JournalEntryResponse {
    #[serde(flatten)]
    pub entry: JournalEntry,
    pub analysis: Option<AnalysisResult>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JournalListResponse {
    pub entries: Vec<JournalEntry>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user_id: Uuid,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const ENTRY_COLUMNS: &str = r#"id, user_id, text, mood_score, sentiment, sentiment_label,
    emotion, emotion_scores, themes, suggestions, highlighted_phrases, metadata,
    to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') as created_at"#;

/// Create a journal entry: analyze the text, persist entry plus analysis,
/// return both.
#[utoipa::path(
    post,
    path = "/api/journal",
    request_body = CreateJournalRequest,
    responses(
        (status = 201, description = "Entry created with analysis", body = JournalEntryResponse),
        (status = 403, description = "Entry owner does not match the token"),
        (status = 422, description = "Invalid journal text", body = ApiError)
    ),
    tag = "journal"
)]
pub async fn create_journal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateJournalRequest>,
) -> Result<(StatusCode, Json<JournalEntryResponse>), ApiRejection> {
    if req.user_id.to_string() != user.id {
        return Err(reject(StatusCode::FORBIDDEN, "Entry owner does not match token"));
    }

    let analysis = match state.analyzer.analyze(&req.text).await {
        Ok(analysis) => analysis,
        Err(AnalyzeError::InvalidInput(reason)) => {
            return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, reason));
        }
    };

    let id = Uuid::new_v4().to_string();
    let entry: JournalEntry = sqlx::query_as(&format!(
        "INSERT INTO journal_entries (
            id, user_id, text, mood_score, sentiment, sentiment_label,
            emotion, emotion_scores, themes, suggestions, highlighted_phrases, metadata
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {ENTRY_COLUMNS}"
    ))
    .bind(&id)
    .bind(&user.id)
    .bind(&req.text)
    .bind(analysis.mood_score as i32)
    .bind(analysis.sentiment.score)
    .bind(analysis.sentiment.label.as_str())
    .bind(analysis.emotion.primary_emotion.as_str())
    .bind(serde_json::to_value(&analysis.emotion.emotion_scores).unwrap_or_default())
    .bind(serde_json::to_value(&analysis.themes).unwrap_or_default())
    .bind(serde_json::to_value(&analysis.suggestions).unwrap_or_default())
    .bind(serde_json::to_value(&analysis.highlighted_phrases).unwrap_or_default())
    .bind(serde_json::to_value(&analysis.metadata).unwrap_or_default())
    .fetch_one(&state.pool)
    .await
    .map_err(internal_error)?;

    tracing::info!("journal entry {id} created for user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(JournalEntryResponse {
            entry,
            analysis: Some(analysis),
        }),
    ))
}

/// List a user's entries, newest first, with pagination.
#[utoipa::path(
    get,
    path = "/api/journal",
    params(
        ("user_id" = Uuid, Query, description = "Entry owner"),
        ("limit" = Option<i64>, Query, description = "Page size, max 100"),
        ("offset" = Option<i64>, Query, description = "Entries to skip")
    ),
    responses(
        (status = 200, description = "Entries with total count", body = JournalListResponse),
        (status = 403, description = "Requested user does not match the token")
    ),
    tag = "journal"
)]
pub async fn list_journal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<JournalListResponse>, ApiRejection> {
    if params.user_id.to_string() != user.id {
        return Err(reject(StatusCode::FORBIDDEN, "Requested user does not match token"));
    }

    let limit = params.limit.unwrap_or(50).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let entries: Vec<JournalEntry> = sqlx::query_as(&format!(
        "SELECT {ENTRY_COLUMNS} FROM journal_entries
         WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    ))
    .bind(&user.id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await
    .map_err(internal_error)?;

    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM journal_entries WHERE user_id = $1")
            .bind(&user.id)
            .fetch_one(&state.pool)
            .await
            .map_err(internal_error)?;

    Ok(Json(JournalListResponse {
        entries,
        total,
        limit,
        offset,
    }))
}

/// Fetch a single entry by id.
#[utoipa::path(
    get,
    path = "/api/journal/{entry_id}",
    params(("entry_id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry", body = JournalEntry),
        (status = 404, description = "No such entry for this user")
    ),
    tag = "journal"
)]
pub async fn get_journal(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(entry_id): Path<String>,
) -> Result<Json<JournalEntry>, ApiRejection> {
    let entry: Option<JournalEntry> = sqlx::query_as(&format!(
        "SELECT {ENTRY_COLUMNS} FROM journal_entries WHERE id = $1 AND user_id = $2"
    ))
    .bind(&entry_id)
    .bind(&user.id)
    .fetch_optional(&state.pool)
    .await
    .map_err(internal_error)?;

    entry
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Journal entry not found"))
}

// ============================================================================
// Audio entries
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AudioParams {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AudioEntryResponse {
    pub id: String,
    pub user_id: String,
    pub file_path: String,
    pub file_name: String,
    pub file_size: i64,
    pub transcript: Option<String>,
    pub transcription_status: String,
    pub analysis: Option<AnalysisResult>,
}

/// Upload an audio journal entry. The file is stored locally; when a
/// transcript can be produced it is analyzed like a text entry.
#[utoipa::path(
    post,
    path = "/api/audio",
    params(("user_id" = Uuid, Query, description = "Entry owner")),
    responses(
        (status = 201, description = "Audio entry stored", body = AudioEntryResponse),
        (status = 400, description = "Unsupported or missing audio file", body = ApiError),
        (status = 403, description = "Entry owner does not match the token")
    ),
    tag = "audio"
)]
pub async fn upload_audio(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<AudioParams>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AudioEntryResponse>), ApiRejection> {
    if params.user_id.to_string() != user.id {
        return Err(reject(StatusCode::FORBIDDEN, "Entry owner does not match token"));
    }

    let mut file_name = None;
    let mut bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| reject(StatusCode::BAD_REQUEST, "Malformed multipart body"))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            bytes = Some(field.bytes().await.map_err(|_| {
                reject(StatusCode::BAD_REQUEST, "Failed to read uploaded file")
            })?);
        }
    }

    let file_name = file_name
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Missing 'file' field"))?;
    let bytes =
        bytes.ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Missing 'file' field"))?;

    if !audio::is_supported_audio_format(&file_name) {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Unsupported audio format. Supported: MP3, WAV, M4A, OGG, FLAC",
        ));
    }

    let file_path =
        audio::save_audio_locally(&SETTINGS.upload_dir, &bytes, &file_name, &user.id)
            .map_err(internal_error)?;

    let transcript = if SETTINGS.enable_audio {
        audio::transcribe_if_available(state.sidecar.as_ref(), &file_name, &bytes).await
    } else {
        None
    };

    let (analysis, status) = match &transcript {
        Some(text) => match state.analyzer.analyze(text).await {
            Ok(analysis) => (Some(analysis), "completed"),
            Err(_) => (None, "completed"),
        },
        None => (None, "pending"),
    };

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO audio_entries (
            id, user_id, file_path, file_name, file_size,
            transcript, transcription_status, analysis
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&id)
    .bind(&user.id)
    .bind(&file_path)
    .bind(&file_name)
    .bind(bytes.len() as i64)
    .bind(&transcript)
    .bind(status)
    .bind(serde_json::to_value(&analysis).unwrap_or_default())
    .execute(&state.pool)
    .await
    .map_err(internal_error)?;

    tracing::info!("audio entry {id} stored for user {} ({status})", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AudioEntryResponse {
            id,
            user_id: user.id,
            file_path,
            file_name,
            file_size: bytes.len() as i64,
            transcript,
            transcription_status: status.to_string(),
            analysis,
        }),
    ))
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct NlpModels {
    pub sidecar: bool,
    pub builtin_fallback: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub nlp_models: NlpModels,
}

/// Liveness probe for monitoring services.
pub async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Health check reporting database connectivity and active NLP backends.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "health"
)]
pub async fn api_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        nlp_models: NlpModels {
            sidecar: state.analyzer.sidecar_enabled(),
            builtin_fallback: true,
        },
    })
}
