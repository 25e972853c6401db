use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::models::assessments::responses::AssessmentListResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 列出课程下所有活跃测验
/// GET /assessments/course/{course_id}
pub async fn list_assessments(
    service: &AssessmentService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_assessments_by_course(course_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssessmentListResponse { items },
            "Assessments retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list assessments: {e}"),
            )),
        ),
    }
}
