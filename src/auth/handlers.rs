use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthSuccess, GithubLinkResponse, GithubTokenQuery, LoginRequest, SignupRequest,
            TokenUser, VerifyResponse,
        },
        jwt::{AuthUser, JwtKeys, SESSION_COOKIE},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/verify", post(verify))
        .route("/auth/github/set-token", post(github_set_token))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccess>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidEmail(payload.email));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateUser);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create_local(&state.db, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(&token)),
        Json(AuthSuccess {
            message: "User created successfully".into(),
            user_id: user.id,
            email: user.email,
            auth_token: token,
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthSuccess>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidEmail(payload.email));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::NotFound
        })?;

    // GitHub-only accounts have no hash to check against.
    let Some(stored_hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.id, "password login against oauth-only account");
        return Err(ApiError::WrongAuthMethod);
    };

    if !verify_password(&payload.password, stored_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((
        StatusCode::OK,
        jar.add(session_cookie(&token)),
        Json(AuthSuccess {
            message: "User logged in successfully".into(),
            user_id: user.id,
            email: user.email,
            auth_token: token,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn verify(AuthUser(claims): AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        message: "Token is valid".into(),
        user_data: TokenUser {
            user_id: claims.sub,
            email: claims.email,
        },
    })
}

#[instrument(skip(state, jar, query))]
pub async fn github_set_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<GithubTokenQuery>,
) -> Result<(CookieJar, Json<GithubLinkResponse>), ApiError> {
    if query.token.len() < 20 {
        return Err(ApiError::OAuthExchange("Invalid GitHub code format".into()));
    }

    let access_token = state
        .github
        .exchange_code(&query.token)
        .await
        .map_err(|e| ApiError::OAuthExchange(format!("{e:#}")))?;

    let gh_user = state
        .github
        .fetch_user(&access_token)
        .await
        .map_err(|e| ApiError::OAuthExchange(format!("{e:#}")))?;

    let email = gh_user
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .ok_or_else(|| ApiError::OAuthExchange("GitHub account has no public email".into()))?;

    let (user, message) = match User::find_by_email(&state.db, &email).await? {
        Some(existing) => {
            info!(user_id = %existing.id, "github account already linked, logging in");
            (existing, "GitHub account already linked".to_string())
        }
        None => {
            let created = User::create_github(&state.db, &email, &access_token).await?;
            info!(user_id = %created.id, email = %created.email, "user signed up via github");
            (
                created,
                "GitHub access token and user info received".to_string(),
            )
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.email)?;

    Ok((
        jar.add(session_cookie(&token)),
        Json(GithubLinkResponse {
            message,
            user_data: gh_user,
            auth_token: token,
        }),
    ))
}
