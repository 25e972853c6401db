use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::CertificateService;
use crate::utils::{SafeCertificateCode, SafeCourseIdI64};

// 懒加载的全局 CertificateService 实例
static CERTIFICATE_SERVICE: Lazy<CertificateService> = Lazy::new(CertificateService::new_lazy);

// 颁发或返回已有证书
pub async fn issue_certificate(
    req: HttpRequest,
    path: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE.issue_certificate(&req, path.0).await
}

// 只读查询已有证书
pub async fn fetch_certificate(
    req: HttpRequest,
    path: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .fetch_existing_certificate(&req, path.0)
        .await
}

// 公开核验证书编号
pub async fn verify_certificate(
    req: HttpRequest,
    path: SafeCertificateCode,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE.verify_certificate(&req, path.0).await
}

// 配置路由
//
// 核验入口对外公开，持证书编号即可查询，无需登录。
pub fn configure_certificate_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/certificates")
            .service(
                web::resource("/course/{course_id}/certificate")
                    // 颁发或返回证书 - 仅学员
                    .route(
                        web::get()
                            .to(issue_certificate)
                            .wrap(middlewares::RequireRole::new_any(UserRole::learner_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/course/{course_id}")
                    // 只读查询 - 仅学员
                    .route(
                        web::get()
                            .to(fetch_certificate)
                            .wrap(middlewares::RequireRole::new_any(UserRole::learner_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/{certificate_id}")
                    // 公开核验
                    .route(web::get().to(verify_certificate)),
            ),
    );
}
