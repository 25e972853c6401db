use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::ProgressService;
use super::complete_lesson::completion_percent;
use crate::middlewares::RequireJWT;
use crate::models::progress::responses::ProgressResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 查询当前学员的课程进度
/// GET /progress/{course_id}
///
/// 尚未学习过的课程返回一条空进度而不是 404。
pub async fn get_progress(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let learner_id = match RequireJWT::extract_user_id(request) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            error!("Failed to load course {}: {}", course_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load course: {e}"),
                )),
            );
        }
    };

    match storage.get_progress(learner_id, course_id).await {
        Ok(progress) => {
            let (completed_lessons, certificate_unlocked) = progress
                .map(|p| (p.completed_lessons, p.certificate_unlocked))
                .unwrap_or_default();
            let percent = completion_percent(completed_lessons.len(), course.lesson_count);

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProgressResponse {
                    course_id,
                    completed_lessons,
                    lesson_count: course.lesson_count,
                    percent,
                    certificate_unlocked,
                },
                "Progress retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load progress: {e}"),
            )),
        ),
    }
}
