//! 动态定价引擎
//!
//! 纯函数：相同的基础价格、日期范围和特殊日期表总是得到相同的逐晚明细。
//! 每晚的系数按优先级确定：
//! 1. 特殊日期存在时，直接使用其系数和名称，跳过其余规则；
//! 2. 否则按 周末 × 季节 相乘。
//!
//! 价格在内部不做舍入，只在展示时保留两位小数。

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::entities::special_date::SpecialDate;

/// 周六、周日
pub const WEEKEND_COEFFICIENT: f64 = 1.25;
/// 旺季：4 月至 9 月
pub const HIGH_SEASON_COEFFICIENT: f64 = 1.3;
/// 淡季：10 月至次年 3 月
pub const LOW_SEASON_COEFFICIENT: f64 = 0.9;

const WEEKEND_REASON: &str = "Weekend";
const HIGH_SEASON_REASON: &str = "High season";
const LOW_SEASON_REASON: &str = "Low season";

/// 单晚价格明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPriceInfo {
    pub date: NaiveDate,
    pub base_price: f64,
    pub coefficient: f64,
    pub reason: String,
    pub day_price: f64,
}

/// 整段住宿的价格计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCalculation {
    pub base_price: f64,
    pub total_price: f64,
    pub nights: i64,
    pub daily_breakdown: Vec<DayPriceInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct PriceCalculator {
    special_dates: HashMap<NaiveDate, SpecialDate>,
}

impl PriceCalculator {
    pub fn new(special_dates: impl IntoIterator<Item = SpecialDate>) -> Self {
        let special_dates = special_dates
            .into_iter()
            .map(|special| (special.date, special))
            .collect();
        Self { special_dates }
    }

    /// 计算 `[check_in, check_out)` 的总价。
    ///
    /// 夜数不足一晚（包括退房早于入住）时按一晚计算。
    pub fn calculate_total_price(
        &self,
        base_price: f64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> PriceCalculation {
        let nights = (check_out - check_in).num_days().max(1);

        let daily_breakdown: Vec<DayPriceInfo> = check_in
            .iter_days()
            .take(nights as usize)
            .map(|date| self.calculate_day_price(base_price, date))
            .collect();
        let total_price = daily_breakdown.iter().map(|day| day.day_price).sum();

        PriceCalculation {
            base_price,
            total_price,
            nights,
            daily_breakdown,
        }
    }

    pub fn calculate_day_price(&self, base_price: f64, date: NaiveDate) -> DayPriceInfo {
        let (coefficient, reason) = match self.special_dates.get(&date) {
            Some(special) => (special.coefficient, special.name.clone()),
            None => standard_coefficient(date),
        };

        DayPriceInfo {
            date,
            base_price,
            coefficient,
            reason,
            day_price: base_price * coefficient,
        }
    }
}

fn standard_coefficient(date: NaiveDate) -> (f64, String) {
    let mut coefficient = 1.0;
    let mut reasons = Vec::with_capacity(2);

    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        coefficient *= WEEKEND_COEFFICIENT;
        reasons.push(WEEKEND_REASON);
    }

    if (4..=9).contains(&date.month()) {
        coefficient *= HIGH_SEASON_COEFFICIENT;
        reasons.push(HIGH_SEASON_REASON);
    } else {
        coefficient *= LOW_SEASON_COEFFICIENT;
        reasons.push(LOW_SEASON_REASON);
    }

    (coefficient, reasons.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn special(on: NaiveDate, name: &str, coefficient: f64) -> SpecialDate {
        SpecialDate {
            id: 1,
            date: on,
            name: name.to_string(),
            coefficient,
            created_at: Utc::now(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn saturday_in_july_combines_weekend_and_high_season() {
        let calculator = PriceCalculator::default();
        // 2024-07-06 是星期六
        let day = calculator.calculate_day_price(2500.0, date(2024, 7, 6));

        assert_close(day.coefficient, 1.625);
        assert_close(day.day_price, 4062.5);
        assert_eq!(day.reason, "Weekend, High season");
    }

    #[test]
    fn weekday_in_low_season_only_applies_season() {
        let calculator = PriceCalculator::default();
        // 2024-11-05 是星期二
        let day = calculator.calculate_day_price(2000.0, date(2024, 11, 5));

        assert_close(day.coefficient, 0.9);
        assert_close(day.day_price, 1800.0);
        assert_eq!(day.reason, "Low season");
    }

    #[test]
    fn special_date_overrides_weekend_and_season() {
        // 2030-01-01 是星期二，2028-01-01 是星期六
        let calculator = PriceCalculator::new(vec![
            special(date(2030, 1, 1), "New Year", 2.0),
            special(date(2028, 1, 1), "New Year", 2.0),
        ]);

        for on in [date(2030, 1, 1), date(2028, 1, 1)] {
            let day = calculator.calculate_day_price(2500.0, on);
            assert_close(day.coefficient, 2.0);
            assert_close(day.day_price, 5000.0);
            assert_eq!(day.reason, "New Year");
        }
    }

    #[test]
    fn breakdown_covers_each_night_in_calendar_order() {
        let calculator = PriceCalculator::default();
        let result = calculator.calculate_total_price(1000.0, date(2024, 6, 1), date(2024, 6, 3));

        assert_eq!(result.nights, 2);
        let dates: Vec<_> = result.daily_breakdown.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2024, 6, 1), date(2024, 6, 2)]);

        // 2024-06-01 周六、06-02 周日，均在旺季
        assert_close(result.total_price, 2.0 * 1000.0 * 1.625);
    }

    #[test]
    fn empty_or_inverted_span_is_charged_as_one_night() {
        let calculator = PriceCalculator::default();

        let same_day = calculator.calculate_total_price(1000.0, date(2024, 6, 4), date(2024, 6, 4));
        assert_eq!(same_day.nights, 1);
        assert_eq!(same_day.daily_breakdown.len(), 1);
        assert_eq!(same_day.daily_breakdown[0].date, date(2024, 6, 4));

        let inverted = calculator.calculate_total_price(1000.0, date(2024, 6, 4), date(2024, 6, 1));
        assert_eq!(inverted.nights, 1);
    }

    #[test]
    fn repeated_calculation_yields_identical_result() {
        let calculator = PriceCalculator::new(vec![special(date(2024, 12, 31), "New Year's Eve", 1.8)]);
        let first = calculator.calculate_total_price(3200.0, date(2024, 12, 27), date(2025, 1, 3));
        let second = calculator.calculate_total_price(3200.0, date(2024, 12, 27), date(2025, 1, 3));

        assert_eq!(first, second);
        assert_eq!(first.nights, 7);
        let eve = &first.daily_breakdown[4];
        assert_eq!(eve.date, date(2024, 12, 31));
        assert_eq!(eve.reason, "New Year's Eve");
    }
}
