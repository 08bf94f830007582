use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicCustomer, RefreshRequest, RegisterRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::NewCustomer,
        repo_types::Customer,
    },
    error::{is_unique_violation, ApiError},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn issue_tokens(state: &AppState, customer: Customer) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(customer.id)?;
    let refresh_token = keys.sign_refresh(customer.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        customer: customer.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    let first_name = payload.first_name.trim();
    let last_name = payload.last_name.trim();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::BadRequest("Password too short".into()));
    }
    if first_name.is_empty() || last_name.is_empty() {
        warn!("missing customer name");
        return Err(ApiError::BadRequest("First and last name are required".into()));
    }

    if Customer::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let customer = Customer::create(
        &state.db,
        NewCustomer {
            email: &payload.email,
            password_hash: &hash,
            first_name,
            last_name,
        },
    )
    .await
    .map_err(|e| {
        // lost a race with a concurrent registration
        if is_unique_violation(&e) {
            ApiError::Conflict("Email already registered".into())
        } else {
            ApiError::Internal(e)
        }
    })?;

    info!(customer_id = %customer.id, email = %customer.email, "customer registered");
    Ok(Json(issue_tokens(&state, customer)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let customer = match Customer::find_by_email(&state.db, &payload.email).await? {
        Some(c) => c,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &customer.password_hash)? {
        warn!(email = %payload.email, customer_id = %customer.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    info!(customer_id = %customer.id, email = %customer.email, "customer logged in");
    Ok(Json(issue_tokens(&state, customer)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let claims = JwtKeys::from_ref(&state)
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let customer = Customer::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Customer not found".into()))?;

    Ok(Json(issue_tokens(&state, customer)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
) -> Result<Json<PublicCustomer>, ApiError> {
    let customer = Customer::find_by_id(&state.db, customer_id)
        .await?
        .ok_or_else(|| {
            warn!(%customer_id, "customer not found");
            ApiError::Unauthorized("Customer not found".into())
        })?;

    Ok(Json(customer.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("cook@example.com"));
        assert!(!is_valid_email("cook@example"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two words@example.com"));
    }

    #[test]
    fn public_customer_hides_password_hash() {
        let customer = Customer {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            created_at: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&PublicCustomer::from(customer.clone())).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("Ada"));
        assert!(!json.contains("argon2"));

        let raw = serde_json::to_string(&customer).unwrap();
        assert!(!raw.contains("argon2"));
    }
}
