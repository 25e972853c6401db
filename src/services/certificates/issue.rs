//! 证书颁发
//!
//! 懒生成：第一次请求且两个前置条件都成立时才写入——
//! (1) 该 (学员, 课程) 存在提交；(2) 进度记录已解锁证书。
//! 再次请求原样返回已有证书，不换编号、不覆盖成绩。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use tracing::{error, info};

use super::CertificateService;
use crate::errors::UpSkillrError;
use crate::middlewares::RequireJWT;
use crate::models::certificates::entities::{
    Certificate, DEFAULT_CERTIFICATE_SCORE, DEFAULT_FETCH_STATUS, DEFAULT_ISSUE_STATUS,
};
use crate::models::certificates::responses::CertificateView;
use crate::models::submissions::entities::Submission;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::certificate_code;

/// 颁发或返回已有证书
/// GET /certificates/course/{course_id}/certificate
pub async fn issue_certificate(
    service: &CertificateService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let learner = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    // 1. 必须已有提交
    let submission = match require_submission(&storage, learner.id, course_id).await {
        Ok(submission) => submission,
        Err(response) => return Ok(response),
    };

    // 2. 必须已解锁证书
    match storage.get_progress(learner.id, course_id).await {
        Ok(Some(progress)) if progress.certificate_unlocked => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CertificateLocked,
                "Complete the course to unlock certificate",
            )));
        }
        Err(e) => {
            error!("Failed to load progress: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load progress: {e}"),
                )),
            );
        }
    }

    // 3. 已有证书原样返回（幂等）
    match storage
        .get_certificate_by_learner_and_course(learner.id, course_id)
        .await
    {
        Ok(Some(existing)) => {
            let view =
                match build_view(&storage, &learner, existing, DEFAULT_ISSUE_STATUS).await {
                    Ok(view) => view,
                    Err(response) => return Ok(response),
                };
            return Ok(HttpResponse::Ok()
                .json(ApiResponse::success(view, "Certificate already issued")));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to look up certificate: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to look up certificate: {e}"),
                )),
            );
        }
    }

    // 4. 生成编号并落库；编号不查重，唯一索引兜底
    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load course: {e}"),
                )),
            );
        }
    };

    let instructor_name = match storage.get_user_by_id(course.instructor_id).await {
        Ok(Some(instructor)) => instructor.public_name().to_string(),
        _ => "Unknown instructor".to_string(),
    };

    let code = certificate_code(chrono::Utc::now().year());
    match storage
        .create_certificate(
            &code,
            learner.id,
            course_id,
            &instructor_name,
            Some(submission.percentage),
            Some(submission.status.to_string()),
        )
        .await
    {
        Ok(certificate) => {
            info!(
                "Certificate {} issued for learner {} course {}",
                certificate.code, learner.id, course_id
            );
            let view = CertificateView {
                certificate_id: certificate.code.clone(),
                learner_name: learner.public_name().to_string(),
                course_title: course.title,
                instructor_name,
                date_issued: certificate.issued_at,
                score: certificate.score.unwrap_or(DEFAULT_CERTIFICATE_SCORE),
                status: certificate
                    .status
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ISSUE_STATUS.to_string()),
            };
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(view, "Certificate issued successfully")))
        }
        Err(UpSkillrError::DuplicateKey(msg)) => {
            // 编号撞车或并发重复请求，原样上抛重复键错误
            error!("Certificate duplicate key: {}", msg);
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CertificateIssueFailed,
                "Certificate issue conflict",
            )))
        }
        Err(e) => {
            error!("Failed to issue certificate: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::CertificateIssueFailed,
                    format!("Failed to issue certificate: {e}"),
                )),
            )
        }
    }
}

/// 只读查询已有证书，未颁发时返回 404
/// GET /certificates/course/{course_id}
pub async fn fetch_existing_certificate(
    service: &CertificateService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let learner = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    match storage
        .get_certificate_by_learner_and_course(learner.id, course_id)
        .await
    {
        Ok(Some(certificate)) => {
            let view = match build_view(&storage, &learner, certificate, DEFAULT_FETCH_STATUS)
                .await
            {
                Ok(view) => view,
                Err(response) => return Ok(response),
            };
            Ok(HttpResponse::Ok()
                .json(ApiResponse::success(view, "Certificate retrieved successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CertificateNotFound,
            "Certificate not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load certificate: {e}"),
            )),
        ),
    }
}

async fn require_submission(
    storage: &Arc<dyn Storage>,
    learner_id: i64,
    course_id: i64,
) -> Result<Submission, HttpResponse> {
    match storage
        .get_submission_by_learner_and_course(learner_id, course_id)
        .await
    {
        Ok(Some(submission)) => Ok(submission),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "Assessment submission not found",
        ))),
        Err(e) => {
            error!("Failed to load submission: {}", e);
            Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load submission: {e}"),
                )),
            )
        }
    }
}

/// 从已有证书拼装展示投影
async fn build_view(
    storage: &Arc<dyn Storage>,
    learner: &User,
    certificate: Certificate,
    default_status: &str,
) -> Result<CertificateView, HttpResponse> {
    let course_title = match storage.get_course_by_id(certificate.course_id).await {
        Ok(Some(course)) => course.title,
        Ok(None) => "Unknown course".to_string(),
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load course: {e}"),
                )),
            );
        }
    };

    Ok(CertificateView {
        certificate_id: certificate.code,
        learner_name: learner.public_name().to_string(),
        course_title,
        instructor_name: certificate.instructor_name,
        date_issued: certificate.issued_at,
        score: certificate.score.unwrap_or(DEFAULT_CERTIFICATE_SCORE),
        status: certificate
            .status
            .unwrap_or_else(|| default_status.to_string()),
    })
}
