use crate::app_state::AppState;
use crate::models::*;
use crate::registry::RegistryError;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

pub const TENANT_SCOPE_HEADER: &str = "x-duplynx-tenant";

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_tenants(
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, AppError> {
    let tenants = state.query.list_tenants()?;

    Ok(Json(
        tenants
            .into_iter()
            .map(|summary| TenantResponse {
                slug: summary.tenant.slug,
                name: summary.tenant.name,
                description: summary.tenant.description,
                machine_count: summary.machine_count,
            })
            .collect(),
    ))
}

pub async fn list_machines(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(tenant_slug): Path<String>,
    params: Result<Query<ListMachinesQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params?;
    check_tenant_scope(&headers, &tenant_slug)?;

    let machines = state.query.list_machines(&tenant_slug)?;
    tracing::info!(tenant = %tenant_slug, "tenant selection");

    if let Some(selected) = params.selected_machine.as_deref() {
        if let Some(machine) = machines.iter().find(|m| m.id == selected) {
            tracing::info!(
                tenant = %tenant_slug,
                machine = %machine.id,
                machine_name = %machine.display_name,
                "machine selection"
            );
        }
    }

    let body: Vec<MachineResponse> = machines.iter().map(MachineResponse::from).collect();
    Ok(([(TENANT_SCOPE_HEADER, tenant_slug)], Json(body)).into_response())
}

pub async fn list_review_records(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((tenant_slug, machine_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    check_tenant_scope(&headers, &tenant_slug)?;

    let records = state.query.list_review_records(&tenant_slug, &machine_id)?;

    let body: Vec<ReviewRecordResponse> = records.iter().map(ReviewRecordResponse::from).collect();
    Ok(([(TENANT_SCOPE_HEADER, tenant_slug)], Json(body)).into_response())
}

pub async fn get_review_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((tenant_slug, machine_id, hash)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    check_tenant_scope(&headers, &tenant_slug)?;

    let record = state.query.review_record(&tenant_slug, &machine_id, &hash)?;

    Ok((
        [(TENANT_SCOPE_HEADER, tenant_slug)],
        Json(ReviewRecordResponse::from(&record)),
    )
        .into_response())
}

/// A request already scoped to one tenant may not address another.
pub fn check_tenant_scope(headers: &HeaderMap, path_slug: &str) -> Result<(), AppError> {
    let active = headers
        .get(TENANT_SCOPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match active {
        Some(active) if active != path_slug => {
            tracing::warn!(
                active = %active,
                requested = %path_slug,
                "tenant scope violation"
            );
            Err(AppError::NotFound)
        }
        _ => Ok(()),
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound,
    Conflict,
    InternalError,
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { .. } => AppError::NotFound,
            RegistryError::Conflict { .. } => AppError::Conflict,
            RegistryError::Validation { field, reason } => {
                AppError::BadRequest(format!("invalid {}: {}", field, reason))
            }
            RegistryError::Internal(msg) => {
                tracing::error!("registry failure: {}", msg);
                AppError::InternalError
            }
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        tracing::error!("template rendering failed: {:#}", err);
        AppError::InternalError
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = match self {
            AppError::BadRequest(msg) => {
                tracing::debug!("rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict => (StatusCode::CONFLICT, "conflict"),
            AppError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        (
            status,
            Json(ErrorResponse {
                error: kind.to_string(),
            }),
        )
            .into_response()
    }
}
