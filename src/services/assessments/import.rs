//! JSON 导入创建测验
//!
//! 入口只负责取课程 ID 并调用归一化适配器，
//! 松散负载在 models::assessments::import 中转换为结构化请求。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::Value;

use super::AssessmentService;
use super::create::persist_assessment;
use crate::middlewares::RequireJWT;
use crate::models::assessments::import::normalize_import_payload;
use crate::models::{ApiResponse, ErrorCode};

pub async fn import_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    created_by: i64,
    payload: Value,
) -> ActixResult<HttpResponse> {
    // 课程 ID 同样存在两种键名
    let course_id = payload
        .get("courseId")
        .or_else(|| payload.get("course_id"))
        .and_then(Value::as_i64);

    let Some(course_id) = course_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ImportPayloadInvalid,
            "Course id is required",
        )));
    };

    let normalized = match normalize_import_payload(course_id, &payload) {
        Ok(normalized) => normalized,
        Err(e) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(e.error_code(), e.message())));
        }
    };

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let role = RequireJWT::extract_user_role(request);

    persist_assessment(&storage, cache, created_by, role, normalized).await
}
