use tracing::{info, warn};

use super::dto::{AuthResponse, LoginRequest, RegisterRequest};
use super::password::{hash_password_blocking, verify_password_blocking};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::StoreError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

pub async fn register(st: &AppState, req: RegisterRequest) -> Result<AuthResponse, AppError> {
    let (Some(email), Some(password)) = (non_empty(req.email), non_empty(req.password)) else {
        return Err(AppError::BadRequest("Email and password required".into()));
    };

    // Fast path only; the store's unique key is what actually decides.
    if st.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User exists".into()));
    }

    let hash = hash_password_blocking(password).await?;

    let user = match st.users.create(req.name.as_deref(), &email, &hash).await {
        Ok(u) => u,
        Err(StoreError::Conflict) => {
            warn!(email = %email, "lost registration race");
            return Err(AppError::Conflict("User exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let token = st.keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

pub async fn login(st: &AppState, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let Some(user) = st.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthenticated(INVALID_CREDENTIALS.into()));
    }

    let token = st.keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}
