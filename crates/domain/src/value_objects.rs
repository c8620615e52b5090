//! 值对象

use chrono::NaiveDate;

use crate::errors::{DomainError, DomainResult};

/// 半开区间 `[check_in, check_out)` 的住宿日期范围。
///
/// 构造时保证 `check_in < check_out`，退房当天不计入住宿夜数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        if check_in >= check_out {
            return Err(DomainError::InvalidDateRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// 住宿夜数
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// 两个半开区间是否重叠：`a.start < b.end && b.start < a.end`
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.overlaps_dates(other.check_in, other.check_out)
    }

    pub fn overlaps_dates(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start < self.check_out && end > self.check_in
    }

    /// 日期是否落在区间内（包含入住日，不包含退房日）
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_ranges() {
        assert_eq!(
            DateRange::new(date(2024, 6, 3), date(2024, 6, 3)),
            Err(DomainError::InvalidDateRange)
        );
        assert_eq!(
            DateRange::new(date(2024, 6, 3), date(2024, 6, 1)),
            Err(DomainError::InvalidDateRange)
        );
    }

    #[test]
    fn back_to_back_stays_do_not_overlap() {
        let first = DateRange::new(date(2024, 6, 1), date(2024, 6, 3)).unwrap();
        let second = DateRange::new(date(2024, 6, 3), date(2024, 6, 5)).unwrap();
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn partial_and_nested_stays_overlap() {
        let outer = DateRange::new(date(2024, 6, 1), date(2024, 6, 10)).unwrap();
        let inner = DateRange::new(date(2024, 6, 4), date(2024, 6, 5)).unwrap();
        let tail = DateRange::new(date(2024, 6, 9), date(2024, 6, 12)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&tail));
        assert_eq!(outer.nights(), 9);
        assert!(outer.contains(date(2024, 6, 1)));
        assert!(!outer.contains(date(2024, 6, 10)));
    }
}
