//! 学习进度实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub learner_id: i64,
    pub course_id: i64,
    /// 已完成课时 ID 列表，JSON 序列化存储
    #[sea_orm(column_type = "Text")]
    pub completed_lessons: String,
    pub certificate_unlocked: bool,
    pub updated_at: i64,
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

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_progress(self) -> crate::models::progress::entities::CourseProgress {
        use crate::models::progress::entities::CourseProgress;
        use chrono::{DateTime, Utc};

        CourseProgress {
            id: self.id,
            learner_id: self.learner_id,
            course_id: self.course_id,
            completed_lessons: serde_json::from_str(&self.completed_lessons).unwrap_or_default(),
            certificate_unlocked: self.certificate_unlocked,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
