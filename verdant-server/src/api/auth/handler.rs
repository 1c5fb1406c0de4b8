use std::time::Duration;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use shared::client::{LoginRequest, LoginResponse, RegisterResponse, UserInfo};

use crate::auth::{CurrentUser, Principal};
use crate::core::ServerState;
use crate::db::repository::{admin, member};
use crate::utils::{AppError, AppResult};
use crate::verification::{self, RegisterSubmission};

/// Uniform delay on failed logins so response time does not leak
/// whether the username exists.
const FAILED_LOGIN_DELAY_MS: u64 = 500;

async fn reject_login() -> AppError {
    tokio::time::sleep(Duration::from_millis(FAILED_LOGIN_DELAY_MS)).await;
    AppError::invalid_credentials()
}

/// POST /api/auth/register
///
/// Multipart form: text fields carry the applicant profile, file fields
/// carry the identity documents. Documents are stored before the gate
/// runs; a rejected submission leaves only orphaned content-addressed
/// blobs, which are reused if the applicant retries.
pub async fn register(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let mut username = String::new();
    let mut email = String::new();
    let mut password = String::new();
    let mut date_of_birth = String::new();
    let mut reentry_code = String::new();
    let mut guardian_email: Option<String> = None;
    let mut law_enforcement = false;
    let mut id_front_ref = String::new();
    let mut id_back_ref = String::new();
    let mut medical_ref: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "username" => username = field.text().await?,
            "email" => email = field.text().await?,
            "password" => password = field.text().await?,
            "date_of_birth" => date_of_birth = field.text().await?,
            "reentry_code" => reentry_code = field.text().await?,
            "guardian_email" => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    guardian_email = Some(value);
                }
            }
            "law_enforcement" => {
                let value = field.text().await?;
                law_enforcement = matches!(value.trim(), "true" | "1" | "yes");
            }
            "id_front" => {
                let data = field.bytes().await?;
                id_front_ref = state.documents().store(&data).await?;
            }
            "id_back" => {
                let data = field.bytes().await?;
                id_back_ref = state.documents().store(&data).await?;
            }
            "medical_record" => {
                let data = field.bytes().await?;
                medical_ref = Some(state.documents().store(&data).await?);
            }
            _ => {
                tracing::debug!("Ignoring unknown register field: {name}");
            }
        }
    }

    let date_of_birth = NaiveDate::parse_from_str(date_of_birth.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation("date_of_birth must be formatted as YYYY-MM-DD"))?;

    let submission = RegisterSubmission {
        username,
        email,
        password,
        date_of_birth,
        reentry_code,
        id_front_ref,
        id_back_ref,
        medical_ref,
        guardian_email,
        law_enforcement,
    };

    let registered =
        verification::register(state.pool(), &state.jwt_service(), submission).await?;

    tracing::info!(
        member_id = registered.member.id,
        status = ?registered.identity.status,
        "New member registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            token: registered.token,
            member_id: registered.member.id,
            status: registered.identity.status,
            requires_medical: registered.identity.requires_medical,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let Some(found) = member::find_by_username(state.pool(), &payload.username).await? else {
        return Err(reject_login().await);
    };

    if !verification::verify_password(&payload.password, &found.hash_pass)? {
        return Err(reject_login().await);
    }

    let role = found.membership_tier.as_str();
    let token = state
        .jwt_service()
        .generate_token(found.id, &found.username, Principal::Member, role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(member_id = found.id, "Member logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: found.id,
            username: found.username,
            principal: "member".to_string(),
            role: role.to_string(),
        },
    }))
}

/// POST /api/auth/admin/login
pub async fn admin_login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let Some(found) = admin::find_by_username(state.pool(), &payload.username).await? else {
        return Err(reject_login().await);
    };

    if !found.is_active || !verification::verify_password(&payload.password, &found.hash_pass)? {
        return Err(reject_login().await);
    }

    let role = found.role.as_str();
    let token = state
        .jwt_service()
        .generate_token(found.id, &found.username, Principal::Admin, role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(admin_id = found.id, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: found.id,
            username: found.username,
            principal: "admin".to_string(),
            role: role.to_string(),
        },
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        principal: user.principal.as_str().to_string(),
        role: user.role,
    })
}
