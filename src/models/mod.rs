//! 业务数据模型
//!
//! 与 entity 模块的数据库实体分离，按领域拆分为 entities/requests/responses。

pub mod assessments;
pub mod auth;
pub mod certificates;
pub mod common;
pub mod courses;
pub mod progress;
pub mod submissions;
pub mod users;

pub use common::pagination::PaginationInfo;
pub use common::response::ApiResponse;

/// 应用启动时间，用于运行状态展示
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，序列化进统一响应的 code 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    TooManyRequests = 1005,

    // 用户与认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserNameAlreadyExists = 2006,
    UserEmailAlreadyExists = 2007,

    // 课程
    CourseNotFound = 3000,
    CoursePermissionDenied = 3001,
    CourseCreationFailed = 3002,

    // 测验定义
    AssessmentNotFound = 4000,
    AssessmentValidationFailed = 4001,
    AssessmentCreationFailed = 4002,
    ImportPayloadInvalid = 4003,

    // 提交台账
    DuplicateSubmission = 5000,
    SubmissionNotFound = 5001,
    SubmissionFailed = 5002,

    // 证书
    CertificateNotFound = 6000,
    CertificateLocked = 6001,
    CertificateIssueFailed = 6002,

    // 学习进度
    ProgressNotFound = 7000,
    ProgressUpdateFailed = 7001,
}
