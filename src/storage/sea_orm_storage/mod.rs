//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assessments;
mod certificates;
mod courses;
mod progress;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, UpSkillrError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| UpSkillrError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| UpSkillrError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| UpSkillrError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(UpSkillrError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突判定，覆盖三种后端的报错文案
pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    let message = err.to_string();
    message.contains("UNIQUE constraint failed")
        || message.contains("duplicate key value")
        || message.contains("Duplicate entry")
}

// Storage trait 实现
use std::collections::HashMap;

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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(
        &self,
        instructor_id: i64,
        course: CreateCourseRequest,
    ) -> Result<Course> {
        self.create_course_impl(instructor_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn set_course_assessment(&self, course_id: i64, assessment_id: i64) -> Result<bool> {
        self.set_course_assessment_impl(course_id, assessment_id)
            .await
    }

    // 测验定义模块
    async fn create_assessment(
        &self,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        self.create_assessment_impl(created_by, req).await
    }

    async fn list_assessments_by_course(&self, course_id: i64) -> Result<Vec<AssessmentListItem>> {
        self.list_assessments_by_course_impl(course_id).await
    }

    async fn get_assessment_by_id(&self, id: i64) -> Result<Option<Assessment>> {
        self.get_assessment_by_id_impl(id).await
    }

    async fn get_active_assessment_by_course(&self, course_id: i64) -> Result<Option<Assessment>> {
        self.get_active_assessment_by_course_impl(course_id).await
    }

    async fn update_assessment(
        &self,
        id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>> {
        self.update_assessment_impl(id, update).await
    }

    async fn soft_delete_assessment(&self, id: i64) -> Result<bool> {
        self.soft_delete_assessment_impl(id).await
    }

    // 提交台账模块
    async fn get_submission_by_learner_and_course(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_learner_and_course_impl(learner_id, course_id)
            .await
    }

    async fn create_submission(
        &self,
        learner_id: i64,
        course_id: i64,
        assessment_id: i64,
        answers: &HashMap<u32, String>,
        graded: &GradedAttempt,
    ) -> Result<Submission> {
        self.create_submission_impl(learner_id, course_id, assessment_id, answers, graded)
            .await
    }

    // 证书模块
    async fn get_certificate_by_learner_and_course(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<Certificate>> {
        self.get_certificate_by_learner_and_course_impl(learner_id, course_id)
            .await
    }

    async fn get_certificate_by_code(&self, code: &str) -> Result<Option<Certificate>> {
        self.get_certificate_by_code_impl(code).await
    }

    async fn create_certificate(
        &self,
        code: &str,
        learner_id: i64,
        course_id: i64,
        instructor_name: &str,
        score: Option<i32>,
        status: Option<String>,
    ) -> Result<Certificate> {
        self.create_certificate_impl(code, learner_id, course_id, instructor_name, score, status)
            .await
    }

    // 学习进度模块
    async fn get_progress(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseProgress>> {
        self.get_progress_impl(learner_id, course_id).await
    }

    async fn record_lesson_completion(
        &self,
        learner_id: i64,
        course_id: i64,
        lesson_id: i64,
        lesson_count: i32,
    ) -> Result<CourseProgress> {
        self.record_lesson_completion_impl(learner_id, course_id, lesson_id, lesson_count)
            .await
    }
}
