// ==========================================
// 鲜奶订送系统 - 订购计划领域模型
// ==========================================
// 职责:
// 1) 长期订购计划（每产品早/晚升数）
// 2) 按日覆盖（停送/加量/改量）及其合并规则
// 3) 生效日视图（派生结果，不落库）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;

/// 日期键格式（本地日历日）
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// 格式化日期键
pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// 解析日期键（YYYY-MM-DD）
pub fn parse_date_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT).ok()
}

// ==========================================
// ScheduleLine - 订购计划行
// ==========================================
// 不变式: 每个 product_id 至多一行（由 Schedule 校验保证）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLine {
    pub product_id: String,  // 产品ID
    pub liters_morning: f64, // 早班升数
    pub liters_evening: f64, // 晚班升数
}

impl ScheduleLine {
    pub fn new(product_id: &str, liters_morning: f64, liters_evening: f64) -> Self {
        Self {
            product_id: product_id.to_string(),
            liters_morning,
            liters_evening,
        }
    }
}

// ==========================================
// Schedule - 长期订购计划
// ==========================================
// 整体替换式更新：替换后旧计划即丢弃，不保留历史版本
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub lines: Vec<ScheduleLine>,
}

impl Schedule {
    pub fn new(lines: Vec<ScheduleLine>) -> Self {
        Self { lines }
    }

    /// 为目录中每个产品生成零升数的初始计划
    pub fn zero_for(catalog: &[Product]) -> Self {
        Self {
            lines: catalog
                .iter()
                .map(|p| ScheduleLine::new(&p.product_id, 0.0, 0.0))
                .collect(),
        }
    }

    /// 按产品ID查找计划行
    pub fn line_for(&self, product_id: &str) -> Option<&ScheduleLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }
}

// ==========================================
// OverrideAction - 按日覆盖动作
// ==========================================
// 三种动作互斥，各自只携带有意义的字段:
// - Skip: 当日该产品两班次清零，不携带升数
// - Extra: 在计划升数之上加量（缺省按 0 处理）
// - Adjust: 按班次替换计划升数，未给出的班次沿用计划值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverrideAction {
    Skip,
    Extra {
        #[serde(default)]
        liters_morning: f64,
        #[serde(default)]
        liters_evening: f64,
    },
    Adjust {
        liters_morning: Option<f64>,
        liters_evening: Option<f64>,
    },
}

impl OverrideAction {
    /// 从存储形态（动作类型 + 两个可空升数）还原
    ///
    /// 未识别的动作类型返回 None；Skip 忽略升数字段。
    pub fn from_parts(
        kind: &str,
        liters_morning: Option<f64>,
        liters_evening: Option<f64>,
    ) -> Option<Self> {
        match kind.to_uppercase().as_str() {
            "SKIP" => Some(OverrideAction::Skip),
            "EXTRA" => Some(OverrideAction::Extra {
                liters_morning: liters_morning.unwrap_or(0.0),
                liters_evening: liters_evening.unwrap_or(0.0),
            }),
            "ADJUST" => Some(OverrideAction::Adjust {
                liters_morning,
                liters_evening,
            }),
            _ => None,
        }
    }

    /// 转换为数据库存储的动作类型字符串
    pub fn kind_db_str(&self) -> &'static str {
        match self {
            OverrideAction::Skip => "SKIP",
            OverrideAction::Extra { .. } => "EXTRA",
            OverrideAction::Adjust { .. } => "ADJUST",
        }
    }

    /// 存储用的早班升数列
    pub fn stored_liters_morning(&self) -> Option<f64> {
        match self {
            OverrideAction::Skip => None,
            OverrideAction::Extra { liters_morning, .. } => Some(*liters_morning),
            OverrideAction::Adjust { liters_morning, .. } => *liters_morning,
        }
    }

    /// 存储用的晚班升数列
    pub fn stored_liters_evening(&self) -> Option<f64> {
        match self {
            OverrideAction::Skip => None,
            OverrideAction::Extra { liters_evening, .. } => Some(*liters_evening),
            OverrideAction::Adjust { liters_evening, .. } => *liters_evening,
        }
    }

    /// 对计划升数应用覆盖，得到生效升数 (早, 晚)
    ///
    /// 合并规则:
    /// - Skip → (0, 0)，无视计划与覆盖自带的升数
    /// - Extra → 计划值 + 覆盖值
    /// - Adjust → 覆盖值替换计划值，按班次独立回落
    pub fn apply(&self, schedule_morning: f64, schedule_evening: f64) -> (f64, f64) {
        match self {
            OverrideAction::Skip => (0.0, 0.0),
            OverrideAction::Extra {
                liters_morning,
                liters_evening,
            } => (
                schedule_morning + liters_morning,
                schedule_evening + liters_evening,
            ),
            OverrideAction::Adjust {
                liters_morning,
                liters_evening,
            } => (
                liters_morning.unwrap_or(schedule_morning),
                liters_evening.unwrap_or(schedule_evening),
            ),
        }
    }
}

// ==========================================
// DayOverride - 按日覆盖记录
// ==========================================
// 键: (日期键, product_id)，日期只存在于存储键中，记录本身不重复保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOverride {
    pub product_id: String,     // 产品ID
    pub action: OverrideAction, // 覆盖动作
}

impl DayOverride {
    pub fn new(product_id: &str, action: OverrideAction) -> Self {
        Self {
            product_id: product_id.to_string(),
            action,
        }
    }
}

// ==========================================
// EffectiveDayRow - 生效日视图行
// ==========================================
// 派生结果: 长期计划与当日覆盖合并后的每产品升数，按需计算，不持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveDayRow {
    pub product: Product,    // 产品引用
    pub liters_morning: f64, // 生效早班升数
    pub liters_evening: f64, // 生效晚班升数
}

impl EffectiveDayRow {
    /// 当日合计升数
    pub fn total_liters(&self) -> f64 {
        self.liters_morning + self.liters_evening
    }

    /// 当日金额（升数 × 单价）
    pub fn amount(&self) -> f64 {
        self.total_liters() * self.product.price_per_liter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_roundtrip() {
        let d = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date_key(d), "2024-05-01");
        assert_eq!(parse_date_key("2024-05-01"), Some(d));
        assert_eq!(parse_date_key(" 2024-05-01 "), Some(d));
        assert_eq!(parse_date_key("2024-13-01"), None);
        assert_eq!(parse_date_key("not-a-date"), None);
    }

    #[test]
    fn test_apply_skip_ignores_liters() {
        // Skip 不携带升数字段，合并结果恒为 (0,0)
        let action = OverrideAction::from_parts("SKIP", Some(5.0), Some(3.0)).unwrap();
        assert_eq!(action, OverrideAction::Skip);
        assert_eq!(action.apply(2.0, 1.0), (0.0, 0.0));
    }

    #[test]
    fn test_apply_extra_defaults_to_zero() {
        let action = OverrideAction::from_parts("EXTRA", Some(1.0), None).unwrap();
        assert_eq!(action.apply(2.0, 1.0), (3.0, 1.0));
    }

    #[test]
    fn test_apply_adjust_per_shift_fallback() {
        let action = OverrideAction::from_parts("ADJUST", Some(4.0), None).unwrap();
        // 未给出的晚班沿用计划值
        assert_eq!(action.apply(2.0, 1.0), (4.0, 1.0));

        let action = OverrideAction::from_parts("ADJUST", None, None).unwrap();
        assert_eq!(action.apply(2.0, 1.0), (2.0, 1.0));
    }

    #[test]
    fn test_from_parts_unknown_kind() {
        assert_eq!(OverrideAction::from_parts("REPLACE", None, None), None);
        assert_eq!(OverrideAction::from_parts("", None, None), None);
    }

    #[test]
    fn test_from_parts_case_insensitive() {
        assert_eq!(
            OverrideAction::from_parts("skip", None, None),
            Some(OverrideAction::Skip)
        );
    }

    #[test]
    fn test_stored_columns_roundtrip() {
        let action = OverrideAction::Adjust {
            liters_morning: Some(3.0),
            liters_evening: None,
        };
        let restored = OverrideAction::from_parts(
            action.kind_db_str(),
            action.stored_liters_morning(),
            action.stored_liters_evening(),
        )
        .unwrap();
        assert_eq!(restored, action);
    }

    #[test]
    fn test_schedule_line_lookup() {
        let schedule = Schedule::new(vec![
            ScheduleLine::new("cow", 2.0, 1.0),
            ScheduleLine::new("buffalo", 0.0, 0.0),
        ]);
        assert_eq!(schedule.line_for("cow").unwrap().liters_morning, 2.0);
        assert!(schedule.line_for("goat").is_none());
    }
}
