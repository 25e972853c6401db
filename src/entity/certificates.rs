//! 证书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub learner_id: i64,
    pub course_id: i64,
    pub instructor_name: String,
    pub score: Option<i32>,
    pub status: Option<String>,
    pub issued_at: i64,
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
    pub fn into_certificate(self) -> crate::models::certificates::entities::Certificate {
        use crate::models::certificates::entities::Certificate;
        use chrono::{DateTime, Utc};

        Certificate {
            id: self.id,
            code: self.code,
            learner_id: self.learner_id,
            course_id: self.course_id,
            instructor_name: self.instructor_name,
            score: self.score,
            status: self.status,
            issued_at: DateTime::<Utc>::from_timestamp(self.issued_at, 0).unwrap_or_default(),
        }
    }
}
