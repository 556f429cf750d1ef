//! HTTP handlers for class catalog endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    CreateClassCommand, GetClassQuery, ListClassesQuery, UpdateClassCommand,
};
use crate::domain::catalog::CatalogError;
use crate::domain::foundation::{ClassOccurrenceId, ValidationError};

use super::super::error::ApiError;
use super::super::state::AppState;
use super::dto::{
    parse_date, ClassResponse, CreateClassRequest, ListClassesParams, UpdateClassRequest,
};

/// GET /api/classes
pub async fn list_classes(
    State(state): State<AppState>,
    Query(params): Query<ListClassesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListClassesQuery {
        start_date: params
            .start_date
            .as_deref()
            .map(|d| parse_date("startDate", d))
            .transpose()
            .map_err(CatalogError::from)?,
        end_date: params
            .end_date
            .as_deref()
            .map(|d| parse_date("endDate", d))
            .transpose()
            .map_err(CatalogError::from)?,
        include_inactive: params.include_inactive,
    };

    let classes = state.list_classes_handler().handle(query).await?;
    let response: Vec<ClassResponse> = classes.into_iter().map(ClassResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/classes/:id_or_slug
pub async fn get_class(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let availability = state
        .get_class_handler()
        .handle(GetClassQuery { id_or_slug })
        .await?;
    Ok(Json(ClassResponse::from(availability)))
}

/// POST /api/classes
pub async fn create_class(
    State(state): State<AppState>,
    Json(request): Json<CreateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let details = request.into_details().map_err(CatalogError::from)?;
    let class = state
        .create_class_handler()
        .handle(CreateClassCommand { details })
        .await?;
    Ok((StatusCode::CREATED, Json(ClassResponse::from(class))))
}

/// PATCH /api/classes/:id
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let class_id = parse_class_id(&id)?;
    let changes = request.into_changes().map_err(CatalogError::from)?;
    let class = state
        .update_class_handler()
        .handle(UpdateClassCommand { class_id, changes })
        .await?;
    Ok(Json(ClassResponse::from(class)))
}

fn parse_class_id(raw: &str) -> Result<ClassOccurrenceId, CatalogError> {
    raw.parse()
        .map_err(|_| ValidationError::invalid_format("id", "not a class id").into())
}
