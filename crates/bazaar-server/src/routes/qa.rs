//! Product Q&A endpoints. Any authenticated user may ask; only the
//! answering vendor (or an admin) may answer, once per question.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_core::BazaarError;
use bazaar_core::authz::{self, ResourceRef};
use bazaar_core::models::qa::{Answer, CreateAnswer, CreateQuestion, Question, QuestionWithAnswers};
use bazaar_core::repository::{ProductRepository, QaRepository, VendorRepository};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::routes::{created, require_field};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub product_id: Uuid,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub question: Question,
}

pub async fn ask(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_field("question", &req.question)?;

    // Questions can only hang off existing products.
    state.products().get_by_id(req.product_id).await?;

    let question = state
        .qa()
        .create_question(CreateQuestion {
            product_id: req.product_id,
            user_id: auth.principal.user_id,
            question: req.question,
        })
        .await?;

    Ok(created(QuestionResponse { question }))
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: Uuid,
    /// Defaults to the caller's vendor profile; admins may answer on
    /// behalf of any vendor.
    pub vendor_id: Option<Uuid>,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: Answer,
}

pub async fn answer(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_field("answer", &req.answer)?;

    // The question must still exist before ownership is considered.
    state.qa().get_question(req.question_id).await?;

    let vendor_id = match req.vendor_id {
        Some(id) => id,
        None => {
            let vendor = state
                .vendors()
                .get_by_user(auth.principal.user_id)
                .await
                .map_err(|e| match e {
                    BazaarError::NotFound { .. } => {
                        ApiError::forbidden("caller has no vendor profile")
                    }
                    other => ApiError(other),
                })?;
            vendor.id
        }
    };

    authz::authorize_mutation(
        &state.ownership(),
        &auth.principal,
        ResourceRef::Vendor(vendor_id),
    )
    .await?;

    let answer = state
        .qa()
        .create_answer(CreateAnswer {
            question_id: req.question_id,
            vendor_id,
            answer: req.answer,
        })
        .await?;

    Ok(created(AnswerResponse { answer }))
}

pub async fn list_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<QuestionWithAnswers>>, ApiError> {
    Ok(Json(state.qa().list_by_product(product_id).await?))
}
