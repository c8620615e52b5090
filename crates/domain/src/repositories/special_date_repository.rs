//! 特殊日期Repository接口定义

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::special_date::{NewSpecialDate, SpecialDate};
use crate::errors::RepositoryResult;
use crate::value_objects::DateRange;

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait SpecialDateRepository: Send + Sync {
    /// 按日期升序
    async fn get_all(&self) -> RepositoryResult<Vec<SpecialDate>>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<SpecialDate>>;

    async fn get_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<SpecialDate>>;

    /// 落在 `[check_in, check_out)` 内的特殊日期
    async fn get_by_date_range(&self, range: DateRange) -> RepositoryResult<Vec<SpecialDate>>;

    /// 同一日期已存在时返回 `RepositoryError::Conflict`
    async fn create(&self, special_date: NewSpecialDate) -> RepositoryResult<SpecialDate>;

    async fn update(&self, special_date: SpecialDate) -> RepositoryResult<SpecialDate>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;
}
