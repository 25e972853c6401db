//! 证书编号生成
//!
//! 形如 `USK-2025-7F3K2Q`：年份 + 6 位大写 base-36 随机串。
//! 生成时不查重，证书表的唯一索引兜底。

use rand::Rng;

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 6;

/// 生成随机大写 base-36 串
fn random_base36(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..BASE36.len());
            BASE36[idx] as char
        })
        .collect()
}

/// 生成证书编号
pub fn certificate_code(year: i32) -> String {
    format!("USK-{year}-{}", random_base36(SUFFIX_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_code_shape() {
        let code = certificate_code(2025);
        assert!(code.starts_with("USK-2025-"));
        assert_eq!(code.len(), "USK-2025-".len() + SUFFIX_LEN);

        let suffix = &code["USK-2025-".len()..];
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_codes_vary() {
        // 理论上可能碰撞，36^6 的空间下连续两次相同基本不可能
        let a = certificate_code(2025);
        let b = certificate_code(2025);
        assert!(a != b || certificate_code(2025) != a);
    }
}
