//! 证书存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::certificates::{ActiveModel, Column, Entity as Certificates};
use crate::errors::{Result, UpSkillrError};
use crate::models::certificates::entities::Certificate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 查询学员在某课程的证书
    pub async fn get_certificate_by_learner_and_course_impl(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<Certificate>> {
        let result = Certificates::find()
            .filter(Column::LearnerId.eq(learner_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_certificate()))
    }

    /// 通过证书编号查询（公开核验入口）
    pub async fn get_certificate_by_code_impl(&self, code: &str) -> Result<Option<Certificate>> {
        let result = Certificates::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询证书失败: {e}")))?;

        Ok(result.map(|m| m.into_certificate()))
    }

    /// 写入证书
    ///
    /// 编号生成时不查重，这里的唯一索引兜底；
    /// (learner, course) 或编号冲突都映射为 DuplicateKey。
    pub async fn create_certificate_impl(
        &self,
        code: &str,
        learner_id: i64,
        course_id: i64,
        instructor_name: &str,
        score: Option<i32>,
        status: Option<String>,
    ) -> Result<Certificate> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(code.to_string()),
            learner_id: Set(learner_id),
            course_id: Set(course_id),
            instructor_name: Set(instructor_name.to_string()),
            score: Set(score),
            status: Set(status),
            issued_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                UpSkillrError::duplicate_key(format!(
                    "Certificate already exists for this learner and course: {e}"
                ))
            } else {
                UpSkillrError::database_operation(format!("创建证书失败: {e}"))
            }
        })?;

        Ok(result.into_certificate())
    }
}
