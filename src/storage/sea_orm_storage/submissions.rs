//! 提交台账存储操作
//!
//! (learner_id, course_id) 上有唯一索引：应用层先查重只是快速路径，
//! 并发下的最终裁决在这里的插入上，输掉竞争的一方拿到
//! DuplicateSubmission 而不是笼统的存储错误。

use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, UpSkillrError};
use crate::models::submissions::entities::Submission;
use crate::quiz::scoring::GradedAttempt;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 查询学员在某课程的提交
    pub async fn get_submission_by_learner_and_course_impl(
        &self,
        learner_id: i64,
        course_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::LearnerId.eq(learner_id))
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 写入一条评分后的提交
    pub async fn create_submission_impl(
        &self,
        learner_id: i64,
        course_id: i64,
        assessment_id: i64,
        answers: &HashMap<u32, String>,
        graded: &GradedAttempt,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let answers_json = serde_json::to_string(answers)
            .map_err(|e| UpSkillrError::serialization(format!("作答序列化失败: {e}")))?;

        let model = ActiveModel {
            learner_id: Set(learner_id),
            course_id: Set(course_id),
            assessment_id: Set(assessment_id),
            answers: Set(answers_json),
            score: Set(graded.score),
            total_marks: Set(graded.total_marks),
            percentage: Set(graded.percentage),
            status: Set(graded.status.to_string()),
            total_questions: Set(graded.total_questions),
            correct_answers: Set(graded.correct_answers),
            submitted_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                UpSkillrError::duplicate_submission(
                    "Assessment already submitted for this course",
                )
            } else {
                UpSkillrError::database_operation(format!("创建提交失败: {e}"))
            }
        })?;

        Ok(result.into_submission())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionStatus;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn memory_storage() -> SeaOrmStorage {
        // 内存库必须固定单连接，连接池超过 1 会各拿一个空库
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1);
        let db = Database::connect(opt)
            .await
            .expect("connect in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        SeaOrmStorage { db }
    }

    async fn seed_learner_and_course(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

        let instructor = storage
            .create_user_impl(CreateUserRequest {
                username: "teach_01".to_string(),
                email: "teach@upskillr.app".to_string(),
                password: "hash".to_string(),
                role: UserRole::Instructor,
                display_name: Some("Tutor".to_string()),
                avatar_url: None,
            })
            .await
            .unwrap();

        let learner = storage
            .create_user_impl(CreateUserRequest {
                username: "learn_01".to_string(),
                email: "learn@upskillr.app".to_string(),
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
                    title: "Rust 入门".to_string(),
                    description: None,
                    lesson_count: 2,
                },
            )
            .await
            .unwrap();

        let assessment = storage
            .create_assessment_impl(
                instructor.id,
                crate::models::assessments::requests::CreateAssessmentRequest {
                    course_id: course.id,
                    title: "Final quiz".to_string(),
                    description: None,
                    duration_minutes: None,
                    total_marks: None,
                    passing_percentage: None,
                    questions: vec![crate::models::assessments::entities::Question {
                        text: "Q1".to_string(),
                        options: vec![
                            "A".to_string(),
                            "B".to_string(),
                            "C".to_string(),
                            "D".to_string(),
                        ],
                        correct_answer: "A".to_string(),
                    }],
                },
            )
            .await
            .unwrap();

        (learner.id, course.id, assessment.id)
    }

    fn graded() -> GradedAttempt {
        GradedAttempt {
            score: 1,
            total_marks: 2,
            percentage: 100,
            status: SubmissionStatus::Pass,
            total_questions: 1,
            correct_answers: 1,
        }
    }

    #[tokio::test]
    async fn test_second_submission_hits_unique_index() {
        let storage = memory_storage().await;
        let (learner_id, course_id, assessment_id) = seed_learner_and_course(&storage).await;

        let answers: HashMap<u32, String> = [(0u32, "A".to_string())].into_iter().collect();

        let first = storage
            .create_submission_impl(learner_id, course_id, assessment_id, &answers, &graded())
            .await
            .expect("first submission succeeds");
        assert_eq!(first.score, 1);

        // 第二次提交必须被唯一索引拒绝，并映射为 DuplicateSubmission
        let second = storage
            .create_submission_impl(learner_id, course_id, assessment_id, &answers, &graded())
            .await
            .unwrap_err();
        assert!(matches!(second, UpSkillrError::DuplicateSubmission(_)));

        // 先写入的提交保持原样
        let stored = storage
            .get_submission_by_learner_and_course_impl(learner_id, course_id)
            .await
            .unwrap()
            .expect("submission exists");
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.status, SubmissionStatus::Pass);
    }

    #[tokio::test]
    async fn test_certificate_pair_is_unique() {
        let storage = memory_storage().await;
        let (learner_id, course_id, _) = seed_learner_and_course(&storage).await;

        storage
            .create_certificate_impl(
                "USK-2025-AAAAAA",
                learner_id,
                course_id,
                "Tutor",
                Some(95),
                Some("PASS".to_string()),
            )
            .await
            .expect("first certificate succeeds");

        let duplicate = storage
            .create_certificate_impl(
                "USK-2025-BBBBBB",
                learner_id,
                course_id,
                "Tutor",
                Some(95),
                Some("PASS".to_string()),
            )
            .await
            .unwrap_err();
        assert!(matches!(duplicate, UpSkillrError::DuplicateKey(_)));
    }
}
