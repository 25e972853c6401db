//! 测验定义存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assessments::{ActiveModel, Column, Entity as Assessments};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, UpSkillrError};
use crate::models::assessments::{
    entities::{
        Assessment, DEFAULT_DURATION_MINUTES, DEFAULT_PASSING_PERCENTAGE, MARKS_PER_QUESTION,
    },
    requests::{CreateAssessmentRequest, UpdateAssessmentRequest},
    responses::{AssessmentCreator, AssessmentListItem},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建测验定义（题目校验由服务层完成）
    pub async fn create_assessment_impl(
        &self,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();
        let question_count = req.questions.len() as i32;

        let questions_json = serde_json::to_string(&req.questions)
            .map_err(|e| UpSkillrError::serialization(format!("题目序列化失败: {e}")))?;

        let model = ActiveModel {
            course_id: Set(req.course_id),
            created_by: Set(created_by),
            title: Set(req.title),
            description: Set(req.description),
            duration_minutes: Set(req.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES)),
            total_marks: Set(req
                .total_marks
                .unwrap_or(question_count * MARKS_PER_QUESTION)),
            passing_percentage: Set(req
                .passing_percentage
                .unwrap_or(DEFAULT_PASSING_PERCENTAGE)),
            questions: Set(questions_json),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("创建测验失败: {e}")))?;

        Ok(result.into_assessment())
    }

    /// 列出课程下所有活跃测验，附创建者信息
    pub async fn list_assessments_by_course_impl(
        &self,
        course_id: i64,
    ) -> Result<Vec<AssessmentListItem>> {
        let assessments = Assessments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询测验列表失败: {e}")))?;

        // 批量查询创建者信息
        let creator_ids: Vec<i64> = assessments
            .iter()
            .map(|a| a.created_by)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let creators = Users::find()
            .filter(UserColumn::Id.is_in(creator_ids))
            .all(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询创建者信息失败: {e}")))?;
        let creator_map: HashMap<i64, _> = creators.into_iter().map(|u| (u.id, u)).collect();

        let items = assessments
            .into_iter()
            .map(|a| {
                let creator = creator_map.get(&a.created_by);
                let creator = AssessmentCreator {
                    id: creator.map(|u| u.id).unwrap_or(a.created_by),
                    username: creator
                        .map(|u| u.username.clone())
                        .unwrap_or_else(|| "Unknown user".to_string()),
                    display_name: creator.and_then(|u| u.display_name.clone()),
                };
                AssessmentListItem {
                    assessment: a.into_assessment(),
                    creator,
                }
            })
            .collect();

        Ok(items)
    }

    /// 通过 ID 获取测验（不过滤 is_active）
    pub async fn get_assessment_by_id_impl(&self, id: i64) -> Result<Option<Assessment>> {
        let result = Assessments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    /// 获取课程当前生效的测验
    ///
    /// 同一课程存在多个活跃定义时取最新创建的一个。
    pub async fn get_active_assessment_by_course_impl(
        &self,
        course_id: i64,
    ) -> Result<Option<Assessment>> {
        let result = Assessments::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::IsActive.eq(true))
            .order_by_desc(Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询生效测验失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    /// 更新测验定义（全文档补丁）
    pub async fn update_assessment_impl(
        &self,
        id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>> {
        let Some(existing) = Assessments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询测验失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(duration_minutes) = update.duration_minutes {
            model.duration_minutes = Set(duration_minutes);
        }
        if let Some(total_marks) = update.total_marks {
            model.total_marks = Set(total_marks);
        }
        if let Some(passing_percentage) = update.passing_percentage {
            model.passing_percentage = Set(passing_percentage);
        }
        if let Some(questions) = update.questions {
            let questions_json = serde_json::to_string(&questions)
                .map_err(|e| UpSkillrError::serialization(format!("题目序列化失败: {e}")))?;
            model.questions = Set(questions_json);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("更新测验失败: {e}")))?;

        Ok(Some(result.into_assessment()))
    }

    /// 软删除：仅置 is_active=false
    pub async fn soft_delete_assessment_impl(&self, id: i64) -> Result<bool> {
        let result = Assessments::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("删除测验失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
