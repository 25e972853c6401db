//! 安全路径参数提取器
//!
//! 将路径参数解析集中到 FromRequest 实现里，
//! 解析失败时直接返回统一响应，处理函数只拿到合法值。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 生成解析指定路径参数为 i64 的提取器
macro_rules! define_i64_extractor {
    ($(#[$doc:meta])* $name:ident, $param:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|id| *id > 0);

                ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => {
                        let response = HttpResponse::BadRequest().json(
                            ApiResponse::error_empty(
                                ErrorCode::BadRequest,
                                concat!("Invalid path parameter: ", $param),
                            ),
                        );
                        Err(InternalError::from_response(
                            concat!("Invalid path parameter: ", $param),
                            response,
                        )
                        .into())
                    }
                })
            }
        }
    };
}

define_i64_extractor!(
    /// 通用资源 ID（路径参数 `id`）
    SafeIDI64,
    "id"
);
define_i64_extractor!(
    /// 课程 ID（路径参数 `course_id`）
    SafeCourseIdI64,
    "course_id"
);
define_i64_extractor!(
    /// 课时 ID（路径参数 `lesson_id`）
    SafeLessonIdI64,
    "lesson_id"
);

/// 证书编号（路径参数 `certificate_id`）
///
/// 这里只做长度防护，格式不合法与不存在统一走 404，
/// 避免向外部泄露编号的有效模式。
#[derive(Debug, Clone)]
pub struct SafeCertificateCode(pub String);

impl FromRequest for SafeCertificateCode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let code = req
            .match_info()
            .get("certificate_id")
            .map(str::trim)
            .filter(|raw| !raw.is_empty() && raw.len() <= 64)
            .map(str::to_string);

        ready(match code {
            Some(code) => Ok(SafeCertificateCode(code)),
            None => {
                let response = HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::CertificateNotFound,
                    "Invalid certificate ID",
                ));
                Err(InternalError::from_response("Invalid certificate ID", response).into())
            }
        })
    }
}
