//! 课程存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, UpSkillrError};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::{CourseListItem, CourseListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        instructor_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            instructor_id: Set(instructor_id),
            title: Set(req.title),
            description: Set(req.description),
            lesson_count: Set(req.lesson_count.max(0)),
            active_assessment_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 列出课程（分页，附讲师展示名）
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Courses::find();

        // 标题关键字过滤
        if let Some(ref keyword) = query.keyword
            && !keyword.trim().is_empty()
        {
            select = select.filter(Column::Title.contains(keyword.trim()));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询课程总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询课程列表失败: {e}")))?;

        // 批量查询讲师信息
        let instructor_ids: Vec<i64> = courses
            .iter()
            .map(|c| c.instructor_id)
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        let instructors = Users::find()
            .filter(UserColumn::Id.is_in(instructor_ids))
            .all(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("查询讲师信息失败: {e}")))?;
        let instructor_map: HashMap<i64, _> =
            instructors.into_iter().map(|u| (u.id, u)).collect();

        let items = courses
            .into_iter()
            .map(|c| {
                let instructor = instructor_map.get(&c.instructor_id);
                let instructor_name = instructor
                    .map(|u| {
                        u.display_name
                            .clone()
                            .unwrap_or_else(|| u.username.clone())
                    })
                    .unwrap_or_else(|| "Unknown instructor".to_string());
                CourseListItem {
                    course: c.into_course(),
                    instructor_name,
                }
            })
            .collect();

        Ok(CourseListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 覆盖课程的当前测验反向引用
    pub async fn set_course_assessment_impl(
        &self,
        course_id: i64,
        assessment_id: i64,
    ) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Courses::update_many()
            .col_expr(
                Column::ActiveAssessmentId,
                sea_orm::sea_query::Expr::value(assessment_id),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| UpSkillrError::database_operation(format!("更新课程测验引用失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
