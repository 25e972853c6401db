use serde::Deserialize;
use ts_rs::TS;

use crate::models::users::entities::UserRole;

// 创建用户请求（注册与启动种子共用）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Learner
}
