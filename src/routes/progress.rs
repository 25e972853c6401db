use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::ProgressService;
use crate::utils::{SafeCourseIdI64, SafeLessonIdI64};

// 懒加载的全局 ProgressService 实例
static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

// 查询课程进度
pub async fn get_progress(req: HttpRequest, path: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get_progress(&req, path.0).await
}

// 记录课时完成
pub async fn complete_lesson(
    req: HttpRequest,
    course: SafeCourseIdI64,
    lesson: SafeLessonIdI64,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE
        .complete_lesson(&req, course.0, lesson.0)
        .await
}

// 配置路由
pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/progress")
            .wrap(middlewares::RequireRole::new_any(UserRole::learner_roles()))
            .wrap(middlewares::RequireJWT)
            .service(web::resource("/{course_id}").route(web::get().to(get_progress)))
            .service(
                web::resource("/{course_id}/lessons/{lesson_id}/complete")
                    .route(web::post().to(complete_lesson)),
            ),
    );
}
