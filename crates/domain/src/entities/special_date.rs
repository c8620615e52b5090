//! 特殊日期：管理员为某个日历日指定的价格系数，优先级高于所有常规定价规则

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDate {
    pub id: i64,
    /// 每个日期最多一条记录
    pub date: NaiveDate,
    pub name: String,
    pub coefficient: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpecialDate {
    pub date: NaiveDate,
    pub name: String,
    pub coefficient: f64,
}

impl NewSpecialDate {
    pub fn validate(&self) -> DomainResult<()> {
        validate_special_date(&self.name, self.coefficient)
    }
}

impl SpecialDate {
    pub fn validate(&self) -> DomainResult<()> {
        validate_special_date(&self.name, self.coefficient)
    }
}

fn validate_special_date(name: &str, coefficient: f64) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }
    if !(coefficient.is_finite() && coefficient > 0.0) {
        return Err(DomainError::validation(
            "coefficient",
            "must be greater than zero",
        ));
    }
    Ok(())
}
