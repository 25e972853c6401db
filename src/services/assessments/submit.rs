//! 测验提交
//!
//! 请求只携带作答内容；得分、百分比与通过状态由这里依据
//! 存储的测验定义重新计算，客户端给出的任何分数都不会被采信。
//!
//! (learner, course) 的先查重只是快速路径，并发重复提交的最终
//! 裁决在存储层的唯一索引上，输掉竞争的一方拿到同样的
//! DuplicateSubmission 错误。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AssessmentService;
use crate::cache::{self, CacheResult, keys};
use crate::config::AppConfig;
use crate::errors::UpSkillrError;
use crate::middlewares::RequireJWT;
use crate::models::assessments::entities::Assessment;
use crate::models::submissions::requests::SubmitQuizRequest;
use crate::models::submissions::responses::SubmitQuizResult;
use crate::models::{ApiResponse, ErrorCode};
use crate::quiz::scoring::grade_attempt;

/// 提交测验作答
/// POST /assessments/submit
pub async fn submit_quiz(
    service: &AssessmentService,
    request: &HttpRequest,
    req: SubmitQuizRequest,
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

    // 1. 快速查重：已提交直接拒绝
    match storage
        .get_submission_by_learner_and_course(learner_id, req.course_id)
        .await
    {
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::DuplicateSubmission,
                "Assessment already submitted for this course",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check submission: {e}"),
                )),
            );
        }
    }

    // 2. 解析课程当前生效的测验；提交计入的是查询时刻的生效定义，
    //    不采信请求中携带的测验 ID
    let assessment = match resolve_active_assessment(service, request, req.course_id).await {
        Ok(Some(assessment)) => assessment,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssessmentNotFound,
                "Assessment not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to resolve assessment: {e}"),
                )),
            );
        }
    };

    // 3. 服务端重新评分
    let graded = grade_attempt(
        &assessment.questions,
        assessment.passing_percentage,
        &req.answers,
    );

    // 4. 落库，唯一索引兜底并发竞争
    match storage
        .create_submission(
            learner_id,
            req.course_id,
            assessment.id,
            &req.answers,
            &graded,
        )
        .await
    {
        Ok(submission) => {
            info!(
                "Submission recorded: learner {} course {} -> {} ({}%)",
                learner_id, req.course_id, submission.status, submission.percentage
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmitQuizResult {
                    score: submission.score,
                    percentage: submission.percentage,
                    status: submission.status,
                },
                "Assessment submitted successfully",
            )))
        }
        Err(UpSkillrError::DuplicateSubmission(_)) => {
            // 并发竞争的失败方与先查重拿到同样的错误
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::DuplicateSubmission,
                "Assessment already submitted for this course",
            )))
        }
        Err(e) => {
            error!("Failed to record submission: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::SubmissionFailed,
                    format!("Failed to record submission: {e}"),
                )),
            )
        }
    }
}

/// 取课程当前生效的测验，带缓存
async fn resolve_active_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    course_id: i64,
) -> crate::errors::Result<Option<Assessment>> {
    let cache_backend = service.get_cache(request);
    let cache_key = keys::active_assessment(course_id);

    if let CacheResult::Found(assessment) =
        cache::get_json::<Assessment>(cache_backend.as_ref(), &cache_key).await
    {
        return Ok(Some(assessment));
    }

    let storage = service.get_storage(request);
    let assessment = storage.get_active_assessment_by_course(course_id).await?;

    if let Some(ref assessment) = assessment {
        cache::insert_json(
            cache_backend.as_ref(),
            cache_key,
            assessment,
            AppConfig::get().cache.default_ttl,
        )
        .await;
    }

    Ok(assessment)
}
