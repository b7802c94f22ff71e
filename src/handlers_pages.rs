use crate::app_state::AppState;
use crate::handlers_api::{AppError, TENANT_SCOPE_HEADER};
use crate::registry::RegistryError;
use crate::views::ScopeViolation;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};

pub async fn launch_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let overview = state.query.launch_overview()?;
    Ok(Html(state.views.render_launch(&overview)?))
}

pub async fn machine_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((tenant_slug, machine_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let active = headers
        .get(TENANT_SCOPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    if let Some(active) = active.as_deref() {
        if active != tenant_slug {
            tracing::warn!(active = %active, requested = %tenant_slug, "tenant scope violation");
            return scope_violation(
                &state,
                StatusCode::NOT_FOUND,
                ScopeViolation {
                    current_tenant: Some(active.to_string()),
                    requested: Some(tenant_slug),
                    reason: "path tenant does not match active scope".to_string(),
                },
            );
        }
    }

    let loaded = state.query.machine(&tenant_slug, &machine_id).and_then(|machine| {
        let tenant = state.query.tenant(&tenant_slug)?;
        let records = state.query.list_review_records(&tenant_slug, &machine.id)?;
        Ok((tenant, machine, records))
    });

    match loaded {
        Ok((tenant, machine, records)) => {
            tracing::info!(tenant = %tenant.slug, machine = %machine.id, "machine selection");
            let html = state.views.render_board(&tenant, &machine, &records)?;
            Ok(([(TENANT_SCOPE_HEADER, tenant.slug)], Html(html)).into_response())
        }
        Err(RegistryError::NotFound { kind, .. }) => scope_violation(
            &state,
            StatusCode::NOT_FOUND,
            ScopeViolation {
                current_tenant: active,
                requested: Some(tenant_slug),
                reason: format!("{} not registered", kind),
            },
        ),
        Err(RegistryError::Validation { field, .. }) => scope_violation(
            &state,
            StatusCode::BAD_REQUEST,
            ScopeViolation {
                current_tenant: active,
                requested: Some(tenant_slug),
                reason: format!("malformed {}", field),
            },
        ),
        Err(e) => Err(e.into()),
    }
}

fn scope_violation(
    state: &AppState,
    status: StatusCode,
    violation: ScopeViolation,
) -> Result<Response, AppError> {
    let html = state.views.render_scope_violation(&violation)?;
    Ok((status, Html(html)).into_response())
}
