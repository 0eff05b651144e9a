// ==========================================
// 鲜奶订送系统 - 订购计划 API
// ==========================================
// 职责: 封装解析引擎，在边界处完成日期与覆盖动作的解析校验
// 说明: 界面层以字符串形式传日期（YYYY-MM-DD），本层负责转换
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::catalog::Product;
use crate::domain::schedule::{
    parse_date_key, DayOverride, EffectiveDayRow, OverrideAction, Schedule,
};
use crate::engine::resolver::ScheduleResolver;

// ==========================================
// QuickOrderLine - 快速下单行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct QuickOrderLine {
    pub product_id: String,
    pub liters_morning: f64,
    pub liters_evening: f64,
}

// ==========================================
// ScheduleApi - 订购计划 API
// ==========================================
pub struct ScheduleApi {
    resolver: Arc<ScheduleResolver>,
    config: Arc<ConfigManager>,
}

impl ScheduleApi {
    pub fn new(resolver: Arc<ScheduleResolver>, config: Arc<ConfigManager>) -> Self {
        Self { resolver, config }
    }

    /// 产品目录
    pub fn get_catalog(&self) -> Vec<Product> {
        self.resolver.catalog().to_vec()
    }

    /// 读取长期计划（独立副本）
    pub fn get_schedule(&self) -> ApiResult<Schedule> {
        Ok(self.resolver.schedule()?)
    }

    /// 整体替换长期计划
    pub fn replace_schedule(&self, next: Schedule) -> ApiResult<()> {
        self.resolver.replace_schedule(next)?;
        Ok(())
    }

    /// 计算指定日期的生效订单
    pub fn resolve_day(&self, date: &str) -> ApiResult<Vec<EffectiveDayRow>> {
        let date = Self::parse_date(date)?;
        Ok(self.resolver.resolve_day(date)?)
    }

    /// 计算今日（本地日历日）的生效订单
    pub fn resolve_today(&self) -> ApiResult<Vec<EffectiveDayRow>> {
        let today = chrono::Local::now().date_naive();
        Ok(self.resolver.resolve_day(today)?)
    }

    /// 写入按日覆盖
    ///
    /// # 参数
    /// - date: 日期键（YYYY-MM-DD）
    /// - product_id: 产品ID
    /// - kind: 覆盖动作类型（SKIP / EXTRA / ADJUST，忽略大小写）
    /// - liters_morning / liters_evening: 升数字段，按动作类型解释
    pub fn set_override(
        &self,
        date: &str,
        product_id: &str,
        kind: &str,
        liters_morning: Option<f64>,
        liters_evening: Option<f64>,
    ) -> ApiResult<()> {
        let date = Self::parse_date(date)?;
        let action = OverrideAction::from_parts(kind, liters_morning, liters_evening)
            .ok_or_else(|| {
                ApiError::ValidationError(format!("未识别的覆盖动作类型: {}", kind))
            })?;
        self.resolver
            .set_override(date, DayOverride::new(product_id, action))?;
        Ok(())
    }

    /// 写入已构造好的覆盖动作（类型安全入口）
    pub fn set_override_action(&self, date: &str, record: DayOverride) -> ApiResult<()> {
        let date = Self::parse_date(date)?;
        self.resolver.set_override(date, record)?;
        Ok(())
    }

    /// 把 from 日的生效订单复制到 to 日
    pub fn repeat_order(&self, from: &str, to: &str) -> ApiResult<()> {
        let from = Self::parse_date(from)?;
        let to = Self::parse_date(to)?;
        self.resolver.repeat_order(from, to)?;
        Ok(())
    }

    /// 快速下单: 把给定升数作为当日 ADJUST 覆盖逐产品写入
    ///
    /// 未出现在 lines 中的产品不受影响。
    pub fn quick_order(&self, date: &str, lines: &[QuickOrderLine]) -> ApiResult<()> {
        let date = Self::parse_date(date)?;
        for line in lines {
            self.resolver.set_override(
                date,
                DayOverride::new(
                    &line.product_id,
                    OverrideAction::Adjust {
                        liters_morning: Some(line.liters_morning),
                        liters_evening: Some(line.liters_evening),
                    },
                ),
            )?;
        }
        Ok(())
    }

    /// 快速下单合计 (总升数, 总金额)，目录外产品行忽略
    pub fn quick_order_totals(&self, lines: &[QuickOrderLine]) -> (f64, f64) {
        let mut liters = 0.0;
        let mut amount = 0.0;
        for line in lines {
            let Some(product) = self
                .resolver
                .catalog()
                .iter()
                .find(|p| p.product_id == line.product_id)
            else {
                continue;
            };
            let line_liters = line.liters_morning + line.liters_evening;
            liters += line_liters;
            amount += line_liters * product.price_per_liter;
        }
        (liters, amount)
    }

    /// 按配置的保留天数清理过期覆盖记录，返回删除条数
    pub fn prune_expired_overrides(&self, today: NaiveDate) -> ApiResult<usize> {
        let retention_days = self
            .config
            .get_override_retention_days()
            .map_err(|e| ApiError::InternalError(format!("读取保留配置失败: {}", e)))?;
        let cutoff = today - chrono::Duration::days(retention_days as i64);
        Ok(self.resolver.prune_overrides_before(cutoff)?)
    }

    fn parse_date(raw: &str) -> ApiResult<NaiveDate> {
        parse_date_key(raw)
            .ok_or_else(|| ApiError::ValidationError(format!("无法解析日期: {}", raw)))
    }
}
