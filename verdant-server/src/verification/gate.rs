//! Verification gate
//!
//! Decides whether a registering person may ever transact. The submission
//! runs through an ordered validation pipeline; the first violation fails
//! the whole request and nothing is written. On success the member and its
//! identity record are persisted in one SQL transaction and a session
//! token is minted.
//!
//! Pipeline order matters: the law-enforcement self-declaration is an
//! unconditional policy deny and is checked before any field validation,
//! so a submission that is otherwise garbage still gets the 403.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::auth::{JwtService, Principal};
use crate::db::repository::member;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_email, validate_optional_text,
    validate_reentry_code, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use crate::verification::age::{MEDICAL_AGE, MIN_AGE, current_age};
use shared::models::{IdentityRecord, Member, MembershipTier, VerificationStatus};
use shared::util::{now_millis, snowflake_id};

/// A registration submission, already parsed out of the multipart request.
/// Document fields carry opaque blob-store reference tokens.
#[derive(Debug, Clone)]
pub struct RegisterSubmission {
    pub username: String,
    pub email: String,
    pub password: String,
    pub date_of_birth: NaiveDate,
    /// Numeric re-entry code, 4-8 digits
    pub reentry_code: String,
    pub id_front_ref: String,
    pub id_back_ref: String,
    pub medical_ref: Option<String>,
    pub guardian_email: Option<String>,
    /// Law-enforcement self-declaration; true is an unconditional deny
    pub law_enforcement: bool,
}

/// Outcome of a successful registration.
#[derive(Debug)]
pub struct RegisteredMember {
    pub member: Member,
    pub identity: IdentityRecord,
    pub token: String,
}

/// Evaluate and persist a registration.
pub async fn register(
    pool: &SqlitePool,
    jwt: &JwtService,
    submission: RegisterSubmission,
) -> AppResult<RegisteredMember> {
    // 1. Hard policy deny, before any field validation
    if submission.law_enforcement {
        tracing::warn!(
            username = %submission.username,
            "Registration denied: law-enforcement self-declaration"
        );
        return Err(AppError::policy(
            "Registration is not available to law enforcement personnel",
        ));
    }

    // 2. Identity fields
    validate_required_text(&submission.username, "username", MAX_NAME_LEN)?;
    validate_email(&submission.email, "email")?;
    validate_required_text(&submission.password, "password", MAX_PASSWORD_LEN)?;
    if member::username_exists(pool, &submission.username).await? {
        return Err(AppError::validation("username is already registered"));
    }
    if member::email_exists(pool, &submission.email).await? {
        return Err(AppError::validation("email is already registered"));
    }

    // 3. Re-entry code shape
    validate_reentry_code(&submission.reentry_code)?;

    // 4. Document references
    validate_required_text(&submission.id_front_ref, "ID document (front)", MAX_NAME_LEN)?;
    validate_required_text(&submission.id_back_ref, "ID document (back)", MAX_NAME_LEN)?;

    // 5. Age floor
    let age = current_age(submission.date_of_birth);
    if age < MIN_AGE {
        return Err(AppError::validation(format!(
            "applicants must be at least {MIN_AGE} years old"
        )));
    }

    // 6. Medical branching: under MEDICAL_AGE both the medical document
    // and a guardian contact become mandatory; at or above, both are ignored.
    let requires_medical = age < MEDICAL_AGE;
    let (medical_ref, guardian_email) = if requires_medical {
        let medical = submission
            .medical_ref
            .clone()
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| {
                AppError::validation(format!(
                    "a medical document is required for applicants under {MEDICAL_AGE}"
                ))
            })?;
        let guardian = submission
            .guardian_email
            .clone()
            .filter(|g| !g.trim().is_empty())
            .ok_or_else(|| {
                AppError::validation(format!(
                    "a guardian email is required for applicants under {MEDICAL_AGE}"
                ))
            })?;
        validate_email(&guardian, "guardian email")?;
        (Some(medical), Some(guardian))
    } else {
        (None, None)
    };
    validate_optional_text(&medical_ref, "medical document", MAX_NAME_LEN)?;

    // Approval always requires an explicit admin review, even for adult
    // non-medical registrants.
    let status = if requires_medical {
        VerificationStatus::NeedsMedical
    } else {
        VerificationStatus::Pending
    };

    let hash_pass = hash_password(&submission.password)?;

    let member_id = snowflake_id();
    let now = now_millis();
    let dob = submission.date_of_birth.format("%Y-%m-%d").to_string();

    // Member + identity record land atomically
    let mut tx = pool.begin().await.map_err(AppError::from)?;

    let insert_result = sqlx::query(
        "INSERT INTO member (id, username, email, hash_pass, date_of_birth, membership_tier, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 'basic', ?, ?)",
    )
    .bind(member_id)
    .bind(&submission.username)
    .bind(&submission.email)
    .bind(&hash_pass)
    .bind(&dob)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await;

    if let Err(e) = insert_result {
        // Lost a race with a concurrent registration; name the column the
        // UNIQUE index rejected so the message matches the pre-check's.
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            let field = if db.message().contains("member.username") {
                "username"
            } else {
                "email"
            };
            return Err(AppError::validation(format!(
                "{field} is already registered"
            )));
        }
        return Err(AppError::from(e));
    }

    sqlx::query(
        "INSERT INTO identity_record (member_id, status, age_verified, requires_medical, id_front_ref, id_back_ref, medical_ref, guardian_email, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(member_id)
    .bind(status)
    .bind(age as i64)
    .bind(requires_medical)
    .bind(&submission.id_front_ref)
    .bind(&submission.id_back_ref)
    .bind(&medical_ref)
    .bind(&guardian_email)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(AppError::from)?;

    tx.commit().await.map_err(AppError::from)?;

    let token = jwt
        .generate_token(
            member_id,
            &submission.username,
            Principal::Member,
            MembershipTier::Basic.as_str(),
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(
        member_id,
        status = %status,
        requires_medical,
        "Member registered"
    );

    Ok(RegisteredMember {
        member: Member {
            id: member_id,
            username: submission.username,
            email: submission.email,
            hash_pass,
            date_of_birth: dob,
            membership_tier: MembershipTier::Basic,
            created_at: now,
            updated_at: now,
        },
        identity: IdentityRecord {
            member_id,
            status,
            age_verified: age as i64,
            requires_medical,
            id_front_ref: submission.id_front_ref,
            id_back_ref: submission.id_back_ref,
            medical_ref,
            guardian_email,
            rejected_reason: None,
            verified_at: None,
            created_at: now,
            updated_at: now,
        },
        token,
    })
}

/// Hash a password using argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against an argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Corrupt password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
