pub mod issue;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct CertificateService {
    storage: Option<Arc<dyn Storage>>,
}

impl CertificateService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 颁发或返回已有证书（幂等）
    pub async fn issue_certificate(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        issue::issue_certificate(self, request, course_id).await
    }

    /// 只读查询已有证书
    pub async fn fetch_existing_certificate(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        issue::fetch_existing_certificate(self, request, course_id).await
    }

    /// 公开核验证书编号
    pub async fn verify_certificate(
        &self,
        request: &HttpRequest,
        code: String,
    ) -> ActixResult<HttpResponse> {
        verify::verify_certificate(self, request, code).await
    }
}
