//! 提交台账实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub learner_id: i64,
    pub course_id: i64,
    pub assessment_id: i64,
    /// 题目下标 -> 所选选项文本，JSON 序列化存储
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    pub score: i32,
    pub total_marks: i32,
    pub percentage: i32,
    pub status: String,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::LearnerId",
        to = "super::users::Column::Id"
    )]
    Learner,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::assessments::Entity",
        from = "Column::AssessmentId",
        to = "super::assessments::Column::Id"
    )]
    Assessment,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Learner.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::assessments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assessment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionStatus};
        use chrono::{DateTime, Utc};

        Submission {
            id: self.id,
            learner_id: self.learner_id,
            course_id: self.course_id,
            assessment_id: self.assessment_id,
            answers: serde_json::from_str(&self.answers).unwrap_or_default(),
            score: self.score,
            total_marks: self.total_marks,
            percentage: self.percentage,
            status: self.status.parse().unwrap_or(SubmissionStatus::Fail),
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
        }
    }
}
