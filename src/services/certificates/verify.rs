//! 证书公开核验
//!
//! 无需登录，持编号即可查询。未命中统一返回
//! "Invalid certificate ID"，不区分格式错误与未颁发，
//! 避免向外部确认哪些编号真实存在。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CertificateService;
use crate::models::certificates::entities::DEFAULT_CERTIFICATE_SCORE;
use crate::models::certificates::responses::VerifiedCertificate;
use crate::models::{ApiResponse, ErrorCode};

/// 核验证书编号
/// GET /certificates/{certificate_id}
pub async fn verify_certificate(
    service: &CertificateService,
    request: &HttpRequest,
    code: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let certificate = match storage.get_certificate_by_code(&code).await {
        Ok(Some(certificate)) => certificate,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CertificateNotFound,
                "Invalid certificate ID",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to verify certificate: {e}"),
                )),
            );
        }
    };

    let learner_name = match storage.get_user_by_id(certificate.learner_id).await {
        Ok(Some(learner)) => learner.public_name().to_string(),
        _ => "Unknown learner".to_string(),
    };
    let course_title = match storage.get_course_by_id(certificate.course_id).await {
        Ok(Some(course)) => course.title,
        _ => "Unknown course".to_string(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        VerifiedCertificate {
            learner_name,
            course_title,
            instructor_name: certificate.instructor_name,
            score: certificate.score.unwrap_or(DEFAULT_CERTIFICATE_SCORE),
            issued_at: certificate.issued_at,
        },
        "Certificate is valid",
    )))
}
