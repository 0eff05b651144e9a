// ==========================================
// 鲜奶订送系统 - 配送记录领域模型
// ==========================================
// 职责: 配送历史、配送员指派、驾驶舱统计的只读视图
// 说明: 数据均来自远端服务，本侧不产生也不修改
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::Shift;

// ==========================================
// DeliveryRecord - 单班次配送记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub date: NaiveDate,                      // 配送日期
    pub shift: Shift,                         // 班次
    pub liters: f64,                          // 升数
    pub delivered: bool,                      // 是否已送达
    pub delivered_at: Option<NaiveDateTime>,  // 送达时间
    pub agent_id: Option<String>,             // 配送员ID
    pub agent_name: Option<String>,           // 配送员姓名
    pub agent_phone: Option<String>,          // 配送员电话
}

// ==========================================
// AgentAssignment - 当前配送员指派
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAssignment {
    pub assignment_id: String,               // 指派ID
    pub assigned_at: Option<NaiveDateTime>,  // 指派时间
    pub default_liters: f64,                 // 默认升数
    pub agent_id: String,                    // 配送员ID
    pub agent_name: Option<String>,          // 配送员姓名
    pub agent_phone: Option<String>,         // 配送员电话
}

// ==========================================
// DashboardCounts - 驾驶舱统计
// ==========================================
// 今日与近7日的应送/已送升数，由远端服务聚合返回
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub today_assigned: f64,  // 今日应送
    pub today_delivered: f64, // 今日已送
    pub days7_assigned: f64,  // 近7日应送
    pub days7_delivered: f64, // 近7日已送
}
