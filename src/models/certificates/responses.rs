use serde::Serialize;
use ts_rs::TS;

/// 证书展示投影（颁发与查询接口共用）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/certificate.ts")]
pub struct CertificateView {
    pub certificate_id: String,
    pub learner_name: String,
    pub course_title: String,
    pub instructor_name: String,
    pub date_issued: chrono::DateTime<chrono::Utc>,
    pub score: i32,
    pub status: String,
}

/// 公开核验响应，持证书编号即可查询
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/certificate.ts")]
pub struct VerifiedCertificate {
    pub learner_name: String,
    pub course_title: String,
    pub instructor_name: String,
    pub score: i32,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}
