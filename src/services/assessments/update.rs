use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AssessmentService;
use crate::cache::keys;
use crate::middlewares::RequireJWT;
use crate::models::assessments::entities::validate_questions;
use crate::models::assessments::requests::UpdateAssessmentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

/// 更新测验（全文档补丁，重新校验）
/// PUT /assessments/{id}
pub async fn update_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    assessment_id: i64,
    req: UpdateAssessmentRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let role = RequireJWT::extract_user_role(request);

    // 新题目集合同样必须满足四选项约束
    if let Some(ref questions) = req.questions
        && let Err(msg) = validate_questions(questions)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssessmentValidationFailed,
            msg,
        )));
    }

    // 只有创建者本人（或管理员）能修改
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
            "You do not have permission to update this assessment",
        )));
    }

    match storage.update_assessment(assessment_id, req).await {
        Ok(Some(assessment)) => {
            cache
                .remove(&keys::active_assessment(assessment.course_id))
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assessment,
                "Assessment updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssessmentNotFound,
            "Assessment not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update assessment: {e}"),
            )),
        ),
    }
}
