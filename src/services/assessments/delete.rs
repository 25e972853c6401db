use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AssessmentService;
use crate::cache::keys;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 软删除测验：置 is_active=false，不物理删除
/// DELETE /assessments/{id}
pub async fn delete_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let role = RequireJWT::extract_user_role(request);

    let existing = match storage.get_assessment_by_id(assessment_id).await {
        Ok(Some(assessment)) => assessment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssessmentNotFound,
                "Assessment not found",
            )));
        }
        Err(e) => {
            error!("Failed to load assessment {}: {}", assessment_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load assessment: {e}"),
                )),
            );
        }
    };

    if existing.created_by != user_id && role != Some(UserRole::Admin) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "You do not have permission to delete this assessment",
        )));
    }

    match storage.soft_delete_assessment(assessment_id).await {
        Ok(true) => {
            cache
                .remove(&keys::active_assessment(existing.course_id))
                .await;
            info!("Assessment {} soft-deleted by {}", assessment_id, user_id);
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success_empty("Assessment deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete assessment: {e}"),
            )),
        ),
    }
}
