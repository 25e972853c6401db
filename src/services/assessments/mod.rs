pub mod create;
pub mod delete;
pub mod detail;
pub mod import;
pub mod list;
pub mod submission_status;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::assessments::requests::{CreateAssessmentRequest, UpdateAssessmentRequest};
use crate::models::submissions::requests::SubmitQuizRequest;
use crate::storage::Storage;

pub struct AssessmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssessmentService {
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

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    /// 创建测验（结构化表单）
    pub async fn create_assessment(
        &self,
        request: &HttpRequest,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assessment(self, request, created_by, req).await
    }

    /// 从松散 JSON 导入创建测验
    pub async fn import_assessment(
        &self,
        request: &HttpRequest,
        created_by: i64,
        payload: serde_json::Value,
    ) -> ActixResult<HttpResponse> {
        import::import_assessment(self, request, created_by, payload).await
    }

    /// 列出课程下的活跃测验
    pub async fn list_assessments(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_assessments(self, request, course_id).await
    }

    /// 获取测验详情
    pub async fn get_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assessment(self, request, assessment_id).await
    }

    /// 更新测验
    pub async fn update_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
        req: UpdateAssessmentRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::update_assessment(self, request, assessment_id, req, user_id).await
    }

    /// 软删除测验
    pub async fn delete_assessment(
        &self,
        request: &HttpRequest,
        assessment_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assessment(self, request, assessment_id, user_id).await
    }

    /// 检查当前学员是否已提交
    pub async fn get_submission_status(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        submission_status::get_submission_status(self, request, course_id).await
    }

    /// 提交测验作答
    pub async fn submit_quiz(
        &self,
        request: &HttpRequest,
        req: SubmitQuizRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_quiz(self, request, req).await
    }
}
