pub mod complete_lesson;
pub mod detail;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct ProgressService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProgressService {
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

    /// 记录课时完成
    pub async fn complete_lesson(
        &self,
        request: &HttpRequest,
        course_id: i64,
        lesson_id: i64,
    ) -> ActixResult<HttpResponse> {
        complete_lesson::complete_lesson(self, request, course_id, lesson_id).await
    }

    /// 查询当前学员的课程进度
    pub async fn get_progress(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_progress(self, request, course_id).await
    }
}
