use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::responses::{SubmissionStatusResponse, SubmissionSummary};
use crate::models::{ApiResponse, ErrorCode};

/// 检查当前学员在某课程是否已提交
/// GET /assessments/submission/{course_id}
///
/// 已提交时附带成绩摘要，前端据此拦截重考入口。
pub async fn get_submission_status(
    service: &AssessmentService,
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

    match storage
        .get_submission_by_learner_and_course(learner_id, course_id)
        .await
    {
        Ok(Some(submission)) => {
            let response = SubmissionStatusResponse {
                submitted: true,
                submission: Some(SubmissionSummary {
                    score: submission.score,
                    percentage: submission.percentage,
                    status: submission.status,
                    submitted_at: submission.submitted_at,
                    total_questions: submission.total_questions,
                    correct_answers: submission.correct_answers,
                }),
            };
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(response, "Submission already exists")))
        }
        Ok(None) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionStatusResponse {
                submitted: false,
                submission: None,
            },
            "No submission yet",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to check submission: {e}"),
            )),
        ),
    }
}
