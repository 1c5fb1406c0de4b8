//! Principal extractors
//!
//! [`CurrentMember`] and [`CurrentAdmin`] narrow the authenticated
//! [`CurrentUser`] to one principal space. The admin extractor re-checks
//! `is_active` against the database on every request so a deactivated
//! admin is cut off immediately, token or not.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService, Principal};
use crate::core::ServerState;
use crate::db::repository::admin;
use crate::security_log;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or(AppError::InvalidToken)?,
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                return Err(AppError::Unauthorized);
            }
        };

        match state.jwt_service().validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims).map_err(|_| AppError::InvalidToken)?;
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(crate::auth::JwtError::ExpiredToken) => Err(AppError::TokenExpired),
            Err(_) => Err(AppError::InvalidToken),
        }
    }
}

/// An authenticated member principal
#[derive(Debug, Clone)]
pub struct CurrentMember(pub CurrentUser);

impl FromRequestParts<ServerState> for CurrentMember {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.principal != Principal::Member {
            return Err(AppError::forbidden("Member account required"));
        }
        Ok(Self(user))
    }
}

/// An authenticated, currently-active admin principal
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: i64,
    pub username: String,
    pub role: String,
}

impl FromRequestParts<ServerState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.principal != Principal::Admin {
            return Err(AppError::forbidden("Admin account required"));
        }

        // Deactivation must take effect before token expiry
        let record = admin::find_by_id(state.pool(), user.id)
            .await?
            .ok_or_else(|| AppError::forbidden("Admin account not found"))?;
        if !record.is_active {
            security_log!(
                "WARN",
                "admin_inactive",
                admin_id = user.id,
                username = user.username.clone()
            );
            return Err(AppError::forbidden("Admin account has been disabled"));
        }

        Ok(Self {
            id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}
