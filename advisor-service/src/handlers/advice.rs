use crate::dtos::{
    ExtractActionItemsRequest, ExtractActionItemsResponse, InvestmentAdviceRequest,
    InvestmentAdviceResponse,
};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

fn invalid_body(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected request body");
    AppError::BadRequest(anyhow::anyhow!("Invalid JSON body: {}", rejection.body_text()))
}

pub async fn extract_action_items(
    State(state): State<AppState>,
    payload: Result<Json<ExtractActionItemsRequest>, JsonRejection>,
) -> Result<Json<ExtractActionItemsResponse>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let items = state
        .advisor
        .extract_action_items(&request.meeting_notes())
        .await?;

    Ok(Json(items.into()))
}

pub async fn investment_advice(
    State(state): State<AppState>,
    payload: Result<Json<InvestmentAdviceRequest>, JsonRejection>,
) -> Result<Json<InvestmentAdviceResponse>, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;

    let investment_advice = state
        .advisor
        .investment_advice(&request.meeting_notes(), &request.wealth_info())
        .await?;

    Ok(Json(InvestmentAdviceResponse { investment_advice }))
}
