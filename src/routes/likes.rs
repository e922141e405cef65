use crate::core::{LikeError, LikeOutcome, LikeReconciler};
use crate::models::{ErrorResponse, LikeRequest, MessageResponse, ProfilesResponse};
use crate::services::{auth, FirebaseTokenVerifier, FirestoreClient};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub firestore: Arc<FirestoreClient>,
    pub auth: Arc<FirebaseTokenVerifier>,
    pub reconciler: LikeReconciler<Arc<FirestoreClient>>,
}

/// Configure all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/profiles", web::get().to(list_profiles))
        .route("/api/like", web::post().to(record_like));
}

/// Root endpoint
async fn root() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse::new("Hello from our backend!"))
}

/// Profile listing endpoint
///
/// GET /profiles
///
/// Returns every stored profile with its raw attributes. No pagination
/// or ordering guarantees on the wire.
async fn list_profiles(state: web::Data<AppState>) -> impl Responder {
    match state.firestore.list_profiles().await {
        Ok(users) => HttpResponse::Ok().json(ProfilesResponse { users }),
        Err(e) => {
            tracing::error!("Failed to list profiles: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Error fetching profiles for display"))
        }
    }
}

/// Like endpoint
///
/// POST /api/like
///
/// Request body:
/// ```json
/// { "toUserId": "string" }
/// ```
///
/// Requires an `Authorization: Bearer <token>` header; the verified
/// subject becomes the acting user. Responds `200` with
/// "Like recorded" or "Match detected".
async fn record_like(
    state: web::Data<AppState>,
    req: web::Json<LikeRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let auth_header = http_req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = match auth::extract_bearer(auth_header) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::Unauthorized().json(ErrorResponse::new(e.to_string()));
        }
    };

    let user = match state.auth.verify(token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::info!("Token verification failed on /api/like: {}", e);
            return HttpResponse::Unauthorized()
                .json(ErrorResponse::with_details("Unauthorized", e.to_string()));
        }
    };

    if req.validate().is_err() {
        return HttpResponse::BadRequest().json(MessageResponse::new("Invalid payload."));
    }

    tracing::info!("Like request: {} -> {}", user.uid, req.to_user_id);

    match state.reconciler.record_like(&user.uid, &req.to_user_id).await {
        Ok(LikeOutcome::LikeRecorded) => {
            HttpResponse::Ok().json(MessageResponse::new("Like recorded"))
        }
        Ok(LikeOutcome::MatchDetected) => {
            HttpResponse::Ok().json(MessageResponse::new("Match detected"))
        }
        Err(e) => {
            if let LikeError::Backend(ref inner) = e {
                tracing::error!("Like flow backend failure: {}", inner);
            }
            like_error_response(&e)
        }
    }
}

/// Map a reconciler error to its HTTP response. The error's `Display`
/// text is the message body.
fn like_error_response(err: &LikeError) -> HttpResponse {
    let body = MessageResponse::new(err.to_string());
    match err {
        LikeError::ActorNotFound | LikeError::TargetNotFound => {
            HttpResponse::NotFound().json(body)
        }
        LikeError::InvalidPayload | LikeError::DuplicateLike | LikeError::Backend(_) => {
            HttpResponse::BadRequest().json(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreError;

    #[test]
    fn test_like_error_status_mapping() {
        assert_eq!(like_error_response(&LikeError::InvalidPayload).status(), 400);
        assert_eq!(like_error_response(&LikeError::ActorNotFound).status(), 404);
        assert_eq!(like_error_response(&LikeError::TargetNotFound).status(), 404);
        assert_eq!(like_error_response(&LikeError::DuplicateLike).status(), 400);
        assert_eq!(
            like_error_response(&LikeError::Backend(StoreError::new("boom"))).status(),
            400
        );
    }
}
