pub mod create;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::{CourseListQuery, CreateCourseRequest};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
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

    /// 创建课程
    pub async fn create_course(
        &self,
        request: &HttpRequest,
        instructor_id: i64,
        req: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, request, instructor_id, req).await
    }

    /// 列出课程
    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, request, query).await
    }

    /// 获取课程详情
    pub async fn get_course(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_course(self, request, course_id).await
    }
}
