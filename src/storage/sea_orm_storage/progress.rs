//! 学习进度存储操作

use super::SeaOrmStorage;
use crate::entity::progress::{ActiveModel, Column, Entity as Progress};
use crate::errors::{Result, UpSkillrError};
use crate::models::progress::entities::CourseProgress;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};

impl SeaOrmStorage {
    /// 查询学员在某课程的进度
    pub async fn get_progress_impl(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseProgress>> {
        let result = Progress::find()
            .filter(Column::LearnerId.eq(learner_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询进度失败: {e}")))?;

        Ok(result.map(|m| m.into_progress()))
    }

    /// 记录课时完成
    ///
    /// 重复完成同一课时是幂等的；去重后的完成数达到课程课时总数时
    /// 置 certificate_unlocked，解锁后不再回退。
    pub async fn record_lesson_completion_impl(
        &self,
        learner_id: i64,
        course_id: i64,
        lesson_id: i64,
        lesson_count: i32,
    ) -> Result<CourseProgress> {
        let now = chrono::Utc::now().timestamp();

        let existing = Progress::find()
            .filter(Column::LearnerId.eq(learner_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询进度失败: {e}")))?;

        let mut completed: Vec<i64> = existing
            .as_ref()
            .map(|m| serde_json::from_str(&m.completed_lessons).unwrap_or_default())
            .unwrap_or_default();

        if !completed.contains(&lesson_id) {
            completed.push(lesson_id);
        }

        let unlocked = existing.as_ref().map(|m| m.certificate_unlocked).unwrap_or(false)
            || (lesson_count > 0 && completed.len() as i32 >= lesson_count);

        let completed_json = serde_json::to_string(&completed)
            .map_err(|e| UpSkillrError::serialization(format!("进度序列化失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.completed_lessons = Set(completed_json);
                active.certificate_unlocked = Set(unlocked);
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| UpSkillrError::database_operation(format!("更新进度失败: {e}")))?
            }
            None => {
                let active = ActiveModel {
                    learner_id: Set(learner_id),
                    course_id: Set(course_id),
                    completed_lessons: Set(completed_json),
                    certificate_unlocked: Set(unlocked),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active
                    .insert(&self.db)
                    .await
                    .map_err(|e| UpSkillrError::database_operation(format!("创建进度失败: {e}")))?
            }
        };

        Ok(result.into_progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn storage_with_pair() -> (SeaOrmStorage, i64, i64) {
        use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

        // 内存库必须固定单连接，连接池超过 1 会各拿一个空库
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let storage = SeaOrmStorage { db };

        let instructor = storage
            .create_user_impl(CreateUserRequest {
                username: "teach_02".to_string(),
                email: "teach2@upskillr.app".to_string(),
                password: "hash".to_string(),
                role: UserRole::Instructor,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        let learner = storage
            .create_user_impl(CreateUserRequest {
                username: "learn_02".to_string(),
                email: "learn2@upskillr.app".to_string(),
                password: "hash".to_string(),
                role: UserRole::Learner,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();
        let course = storage
            .create_course_impl(
                instructor.id,
                crate::models::courses::requests::CreateCourseRequest {
                    title: "Progress course".to_string(),
                    description: None,
                    lesson_count: 2,
                },
            )
            .await
            .unwrap();

        (storage, learner.id, course.id)
    }

    #[tokio::test]
    async fn test_completion_unlocks_at_full_count() {
        let (storage, learner_id, course_id) = storage_with_pair().await;

        let progress = storage
            .record_lesson_completion_impl(learner_id, course_id, 1, 2)
            .await
            .unwrap();
        assert!(!progress.certificate_unlocked);

        // 重复完成同一课时不推进进度
        let progress = storage
            .record_lesson_completion_impl(learner_id, course_id, 1, 2)
            .await
            .unwrap();
        assert_eq!(progress.completed_lessons.len(), 1);
        assert!(!progress.certificate_unlocked);

        let progress = storage
            .record_lesson_completion_impl(learner_id, course_id, 2, 2)
            .await
            .unwrap();
        assert_eq!(progress.completed_lessons.len(), 2);
        assert!(progress.certificate_unlocked);
    }
}
