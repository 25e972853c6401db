use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireJWT};
use crate::models::assessments::requests::{CreateAssessmentRequest, UpdateAssessmentRequest};
use crate::models::submissions::requests::SubmitQuizRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::AssessmentService;
use crate::utils::{SafeCourseIdI64, SafeIDI64};

// 懒加载的全局 AssessmentService 实例
static ASSESSMENT_SERVICE: Lazy<AssessmentService> = Lazy::new(AssessmentService::new_lazy);

// 创建测验
pub async fn create_assessment(
    req: HttpRequest,
    body: web::Json<CreateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    ASSESSMENT_SERVICE
        .create_assessment(&req, user_id, body.into_inner())
        .await
}

// 从松散 JSON 导入创建测验
pub async fn upload_assessment_json(
    req: HttpRequest,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    ASSESSMENT_SERVICE
        .import_assessment(&req, user_id, body.into_inner())
        .await
}

// 列出课程下的活跃测验
pub async fn list_assessments(req: HttpRequest, path: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.list_assessments(&req, path.0).await
}

// 获取测验详情
pub async fn get_assessment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.get_assessment(&req, path.0).await
}

// 更新测验
pub async fn update_assessment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAssessmentRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    ASSESSMENT_SERVICE
        .update_assessment(&req, path.0, body.into_inner(), user_id)
        .await
}

// 软删除测验
pub async fn delete_assessment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    let user_id = match RequireJWT::extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    ASSESSMENT_SERVICE
        .delete_assessment(&req, path.0, user_id)
        .await
}

// 检查当前学员是否已提交
pub async fn get_submission_status(
    req: HttpRequest,
    path: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.get_submission_status(&req, path.0).await
}

// 提交测验作答
pub async fn submit_quiz(
    req: HttpRequest,
    body: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    ASSESSMENT_SERVICE.submit_quiz(&req, body.into_inner()).await
}

// 配置路由
//
// GET /assessments/{id} 对外公开，其余路由逐条挂认证中间件。
pub fn configure_assessment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/assessments")
            .service(
                web::resource("")
                    // 创建测验 - 仅讲师和管理员
                    .route(
                        web::post()
                            .to(create_assessment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/upload-json")
                    // JSON 导入 - 仅讲师和管理员
                    .route(
                        web::post()
                            .to(upload_assessment_json)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/course/{course_id}")
                    // 课程测验列表 - 所有登录用户
                    .route(web::get().to(list_assessments).wrap(middlewares::RequireJWT)),
            )
            .service(
                web::resource("/submission/{course_id}")
                    // 提交状态检查 - 仅学员
                    .route(
                        web::get()
                            .to(get_submission_status)
                            .wrap(middlewares::RequireRole::new_any(UserRole::learner_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/submit")
                    // 提交作答 - 仅学员；限流防重复轰炸
                    .route(
                        web::post()
                            .to(submit_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::learner_roles()))
                            .wrap(middlewares::RequireJWT),
                    )
                    .wrap(RateLimit::quiz_submit()),
            )
            .service(
                web::resource("/{id}")
                    // 获取测验详情 - 公开
                    .route(web::get().to(get_assessment))
                    // 更新测验 - 仅讲师和管理员
                    .route(
                        web::put()
                            .to(update_assessment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireJWT),
                    )
                    // 软删除测验 - 仅讲师和管理员
                    .route(
                        web::delete()
                            .to(delete_assessment)
                            .wrap(middlewares::RequireRole::new_any(
                                UserRole::instructor_roles(),
                            ))
                            .wrap(middlewares::RequireJWT),
                    ),
            ),
    );
}
