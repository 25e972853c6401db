use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AssessmentService;
use crate::cache::{ObjectCache, keys};
use crate::models::assessments::entities::validate_questions;
use crate::models::assessments::requests::CreateAssessmentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub async fn create_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    created_by: i64,
    req: CreateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let role = crate::middlewares::RequireJWT::extract_user_role(request);

    persist_assessment(&storage, cache, created_by, role, req).await
}

/// 校验并落库，结构化创建与 JSON 导入共用
pub(super) async fn persist_assessment(
    storage: &Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    created_by: i64,
    role: Option<UserRole>,
    req: CreateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    // 标题必填
    if req.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssessmentValidationFailed,
            "Assessment title is required",
        )));
    }

    // 每题必须恰好四个选项
    if let Err(msg) = validate_questions(&req.questions) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AssessmentValidationFailed,
            msg,
        )));
    }

    // 课程必须存在，且只有课程讲师本人（或管理员）能挂测验
    let course = match storage.get_course_by_id(req.course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            error!("Failed to load course {}: {}", req.course_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load course: {e}"),
                )),
            );
        }
    };

    if course.instructor_id != created_by && role != Some(UserRole::Admin) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to create an assessment for this course",
        )));
    }

    let course_id = req.course_id;
    match storage.create_assessment(created_by, req).await {
        Ok(assessment) => {
            // 课程反向引用指向新测验，后创建者覆盖先创建者
            if let Err(e) = storage
                .set_course_assessment(course_id, assessment.id)
                .await
            {
                error!("Failed to link assessment to course {}: {}", course_id, e);
            }
            cache.remove(&keys::active_assessment(course_id)).await;

            info!(
                "Assessment {} created for course {} by {}",
                assessment.id, course_id, created_by
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assessment,
                "Assessment created successfully",
            )))
        }
        Err(e) => {
            error!("Assessment creation failed: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AssessmentCreationFailed,
                    format!("Assessment creation failed: {e}"),
                )),
            )
        }
    }
}
