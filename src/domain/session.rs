// ==========================================
// 鲜奶订送系统 - 客户会话
// ==========================================
// 职责: 本地登录态的值类型与电话号码归一化
// 说明: 会话缺失即视为未登录
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CustomerSession - 客户会话
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSession {
    pub name: String,  // 客户姓名
    pub phone: String, // 客户电话（仅保留数字）
}

impl CustomerSession {
    /// 构造会话，电话号码归一化为纯数字
    pub fn new(name: &str, phone: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            phone: normalize_phone(phone),
        }
    }
}

/// 电话号码归一化: 去掉所有非数字字符
///
/// 远端客户档案按纯数字存储电话，查询前必须归一化。
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("138-0013-8000"), "13800138000");
        assert_eq!(normalize_phone("+86 138 0013 8000"), "8613800138000");
        assert_eq!(normalize_phone("abc"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_session_new_normalizes() {
        let s = CustomerSession::new("  张三 ", "138-0013-8000");
        assert_eq!(s.name, "张三");
        assert_eq!(s.phone, "13800138000");
    }
}
