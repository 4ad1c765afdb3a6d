//! 計劃週期與週曆

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 計劃週期（第 n 週，從 1 開始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Period(u32);

impl Period {
    /// 創建週期，週次必須 >= 1
    pub fn new(number: u32) -> Option<Self> {
        (number >= 1).then_some(Self(number))
    }

    /// 第一週
    pub fn first() -> Self {
        Self(1)
    }

    /// 週次（1 起算）
    pub fn number(&self) -> u32 {
        self.0
    }

    /// 陣列索引（0 起算）
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }

}

impl TryFrom<u32> for Period {
    type Error = String;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::new(number).ok_or_else(|| format!("週次必須 >= 1，實際 {}", number))
    }
}

impl From<Period> for u32 {
    fn from(period: Period) -> Self {
        period.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// 計劃時界：起始日期 + 連續的週數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningHorizon {
    /// 第一週的起始日期
    pub start_date: NaiveDate,

    /// 週數
    pub weeks: u32,
}

impl PlanningHorizon {
    /// 創建新的計劃時界
    pub fn new(start_date: NaiveDate, weeks: u32) -> Self {
        Self { start_date, weeks }
    }

    /// 週數
    pub fn len(&self) -> usize {
        self.weeks as usize
    }

    pub fn is_empty(&self) -> bool {
        self.weeks == 0
    }

    /// 依序列出所有週期（1..=N）
    pub fn periods(&self) -> impl Iterator<Item = Period> {
        (1..=self.weeks).map(Period)
    }

    /// 最後一週
    pub fn last_period(&self) -> Option<Period> {
        Period::new(self.weeks)
    }

    /// 是否在時界內
    pub fn contains(&self, period: Period) -> bool {
        period.number() <= self.weeks
    }

    /// 週期的起始日期
    pub fn week_start(&self, period: Period) -> NaiveDate {
        self.start_date + Duration::weeks(i64::from(period.number() - 1))
    }

    /// 週期的最後一天
    pub fn week_end(&self, period: Period) -> NaiveDate {
        self.week_start(period) + Duration::days(6)
    }

    /// 找出日期所屬的週期
    pub fn period_of(&self, date: NaiveDate) -> Option<Period> {
        if date < self.start_date {
            return None;
        }
        let week = (date - self.start_date).num_days() / 7 + 1;
        u32::try_from(week)
            .ok()
            .and_then(Period::new)
            .filter(|p| self.contains(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizon() -> PlanningHorizon {
        PlanningHorizon::new(NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(), 4)
    }

    #[test]
    fn test_period_numbering() {
        assert!(Period::new(0).is_none());
        let p = Period::new(3).unwrap();
        assert_eq!(p.number(), 3);
        assert_eq!(p.index(), 2);
        assert_eq!(p.to_string(), "S3");
    }

    #[test]
    fn test_period_json_rejects_zero() {
        assert_eq!(serde_json::from_str::<Period>("3").unwrap(), Period::new(3).unwrap());
        assert_eq!(serde_json::to_string(&Period::first()).unwrap(), "1");
        assert!(serde_json::from_str::<Period>("0").is_err());
    }

    #[test]
    fn test_horizon_periods() {
        let periods: Vec<u32> = horizon().periods().map(|p| p.number()).collect();
        assert_eq!(periods, vec![1, 2, 3, 4]);
        assert_eq!(horizon().last_period(), Period::new(4));
        assert!(!horizon().contains(Period::new(5).unwrap()));
    }

    #[test]
    fn test_week_dates() {
        let h = horizon();
        assert_eq!(
            h.week_start(Period::new(2).unwrap()),
            NaiveDate::from_ymd_opt(2025, 9, 16).unwrap()
        );
        assert_eq!(
            h.week_end(Period::first()),
            NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
        );
    }

    #[test]
    fn test_period_of_date() {
        let h = horizon();
        assert_eq!(
            h.period_of(NaiveDate::from_ymd_opt(2025, 9, 23).unwrap()),
            Period::new(3)
        );
        assert_eq!(h.period_of(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()), None);
        assert_eq!(h.period_of(NaiveDate::from_ymd_opt(2025, 10, 30).unwrap()), None);
    }
}
