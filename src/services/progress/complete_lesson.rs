use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::ProgressService;
use crate::middlewares::RequireJWT;
use crate::models::progress::responses::ProgressResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 记录课时完成
/// POST /progress/{course_id}/lessons/{lesson_id}/complete
///
/// 重复完成同一课时幂等；去重后的完成数达到课程课时总数时
/// 解锁证书，证书颁发读取该标记。
pub async fn complete_lesson(
    service: &ProgressService,
    request: &HttpRequest,
    course_id: i64,
    lesson_id: i64,
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

    // 课时必须属于课程的编号区间
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

    if course.lesson_count > 0 && lesson_id > course.lesson_count as i64 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ProgressUpdateFailed,
            "Lesson does not belong to this course",
        )));
    }

    match storage
        .record_lesson_completion(learner_id, course_id, lesson_id, course.lesson_count)
        .await
    {
        Ok(progress) => {
            if progress.certificate_unlocked {
                info!(
                    "Learner {} completed course {} and unlocked the certificate",
                    learner_id, course_id
                );
            }
            let percent = completion_percent(progress.completed_lessons.len(), course.lesson_count);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProgressResponse {
                    course_id,
                    completed_lessons: progress.completed_lessons,
                    lesson_count: course.lesson_count,
                    percent,
                    certificate_unlocked: progress.certificate_unlocked,
                },
                "Lesson completion recorded",
            )))
        }
        Err(e) => {
            error!("Failed to record lesson completion: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ProgressUpdateFailed,
                    format!("Failed to record lesson completion: {e}"),
                )),
            )
        }
    }
}

/// 完成百分比，课时数为零时记 0
pub(super) fn completion_percent(completed: usize, lesson_count: i32) -> i32 {
    if lesson_count <= 0 {
        return 0;
    }
    ((completed as f64 / lesson_count as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::completion_percent;

    #[test]
    fn test_completion_percent() {
        assert_eq!(completion_percent(0, 4), 0);
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(3, 3), 100);
        assert_eq!(completion_percent(1, 0), 0);
    }
}
