//! 缓存键构造
//!
//! 集中在一处，避免各调用点散落手拼字符串。

/// 鉴权中间件：access token -> 用户
pub fn user_by_token(token: &str) -> String {
    format!("user:token:{token}")
}

/// 提交与测验获取热路径：课程 -> 当前生效测验
pub fn active_assessment(course_id: i64) -> String {
    format!("assessment:active:{course_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        assert_eq!(user_by_token("abc"), "user:token:abc");
        assert_eq!(active_assessment(42), "assessment:active:42");
    }
}
