use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    assessments::{
        entities::Assessment,
        requests::{CreateAssessmentRequest, UpdateAssessmentRequest},
        responses::AssessmentListItem,
    },
    certificates::entities::Certificate,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseListResponse,
    },
    progress::entities::CourseProgress,
    submissions::entities::Submission,
    users::{entities::User, requests::CreateUserRequest},
};
use crate::quiz::scoring::GradedAttempt;

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数（启动时判断是否需要种子管理员）
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(
        &self,
        instructor_id: i64,
        course: CreateCourseRequest,
    ) -> Result<Course>;
    // 通过ID获取课程信息
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 更新课程的当前测验反向引用（最后写入生效）
    async fn set_course_assessment(&self, course_id: i64, assessment_id: i64) -> Result<bool>;

    /// 测验定义管理方法
    // 创建测验定义
    async fn create_assessment(
        &self,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment>;
    // 列出课程下所有活跃测验（附创建者信息）
    async fn list_assessments_by_course(&self, course_id: i64) -> Result<Vec<AssessmentListItem>>;
    // 通过ID获取测验（不过滤活跃标记）
    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>>;
    // 获取课程当前生效的测验
    async fn get_active_assessment_by_course(&self, course_id: i64) -> Result<Option<Assessment>>;
    // 更新测验定义
    async fn update_assessment(
        &self,
        id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>>;
    // 软删除测验（is_active=false，保留历史提交的可回溯性）
    async fn soft_delete_assessment(&self, id: i64) -> Result<bool>;

    /// 提交台账方法
    // 查询学员在某课程的提交
    async fn get_submission_by_learner_and_course(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<Submission>>;
    // 写入一条评分后的提交；(learner, course) 已存在时返回 DuplicateSubmission
    async fn create_submission(
        &self,
        learner_id: i64,
        course_id: i64,
        assessment_id: i64,
        answers: &HashMap<u32, String>,
        graded: &GradedAttempt,
    ) -> Result<Submission>;

    /// 证书方法
    // 查询学员在某课程的证书
    async fn get_certificate_by_learner_and_course(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<Certificate>>;
    // 通过证书编号查询（公开核验）
    async fn get_certificate_by_code(&self, code: &str) -> Result<Option<Certificate>>;
    // 写入证书；编号或 (learner, course) 冲突时返回 DuplicateKey
    async fn create_certificate(
        &self,
        code: &str,
        learner_id: i64,
        course_id: i64,
        instructor_name: &str,
        score: Option<i32>,
        status: Option<String>,
    ) -> Result<Certificate>;

    /// 学习进度方法
    // 查询学员在某课程的进度
    async fn get_progress(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseProgress>>;
    // 记录课时完成；全部完成时置 certificate_unlocked
    async fn record_lesson_completion(
        &self,
        learner_id: i64,
        course_id: i64,
        lesson_id: i64,
        lesson_count: i32,
    ) -> Result<CourseProgress>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
