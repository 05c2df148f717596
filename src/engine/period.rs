// ==========================================
// ONE Tracker 质检分析引擎 - 分析期间
// ==========================================
// 职责: 选定月份集合、快捷预设、上一可比期推导
// 上一可比期: 紧邻本期之前、日历跨度相同的连续月份
// ==========================================

use crate::domain::types::MonthKey;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// AnalysisPeriod - 分析期间
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisPeriod {
    months: Vec<MonthKey>,
}

impl AnalysisPeriod {
    /// 构造（自动排序去重）
    pub fn new<I: IntoIterator<Item = MonthKey>>(months: I) -> Self {
        Self {
            months: months
                .into_iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }

    pub fn single(month: MonthKey) -> Self {
        Self {
            months: vec![month],
        }
    }

    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn contains(&self, month: MonthKey) -> bool {
        self.months.binary_search(&month).is_ok()
    }

    /// 锚定月份（期间内最晚月份）
    pub fn anchor(&self) -> Option<MonthKey> {
        self.months.last().copied()
    }

    /// 上一可比期
    pub fn prior_comparable(&self) -> Option<AnalysisPeriod> {
        let first = *self.months.first()?;
        let last = *self.months.last()?;
        let span = last.months_since(first) + 1;
        let start = first.offset(-span);
        Some(Self::new((0..span).map(|i| start.offset(i))))
    }

    /// 快捷预设
    ///
    /// 以可用月份中最晚的月份为锚点；结果只包含实际可用的月份
    pub fn preset(preset: PeriodPreset, available: &[MonthKey]) -> Option<Self> {
        let available: BTreeSet<MonthKey> = available.iter().copied().collect();
        let anchor = *available.iter().next_back()?;

        let picked: Vec<MonthKey> = match preset {
            PeriodPreset::Latest => vec![anchor],
            PeriodPreset::Last3 => trailing(&available, anchor, 3),
            PeriodPreset::Last6 => trailing(&available, anchor, 6),
            PeriodPreset::YearToDate => available
                .iter()
                .copied()
                .filter(|m| m.year() == anchor.year())
                .collect(),
            PeriodPreset::All => available.iter().copied().collect(),
        };

        Some(Self::new(picked))
    }

    /// 解析期间选择
    ///
    /// # 支持格式
    /// - 预设名: latest / last3 / last6 / ytd / all
    /// - 逗号分隔的月份: `2026-01,2026-02` 或 `JAN26,FEB26`
    pub fn parse_selection(raw: &str, available: &[MonthKey]) -> Option<Self> {
        if let Some(preset) = PeriodPreset::parse(raw) {
            return Self::preset(preset, available);
        }

        let months: Option<Vec<MonthKey>> = raw
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(MonthKey::parse)
            .collect();
        let period = Self::new(months?);
        if period.is_empty() {
            None
        } else {
            Some(period)
        }
    }
}

fn trailing(available: &BTreeSet<MonthKey>, anchor: MonthKey, n: i32) -> Vec<MonthKey> {
    let start = anchor.offset(-(n - 1));
    available.range(start..=anchor).copied().collect()
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.months.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", parts.join(", "))
    }
}

// ==========================================
// PeriodPreset - 期间预设
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPreset {
    Latest,
    Last3,
    Last6,
    YearToDate,
    All,
}

impl PeriodPreset {
    pub const ALL: [PeriodPreset; 5] = [
        PeriodPreset::Latest,
        PeriodPreset::Last3,
        PeriodPreset::Last6,
        PeriodPreset::YearToDate,
        PeriodPreset::All,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "latest" => Some(PeriodPreset::Latest),
            "last3" | "last_3" => Some(PeriodPreset::Last3),
            "last6" | "last_6" => Some(PeriodPreset::Last6),
            "ytd" | "year_to_date" => Some(PeriodPreset::YearToDate),
            "all" => Some(PeriodPreset::All),
            _ => None,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            PeriodPreset::Latest => "period.latest",
            PeriodPreset::Last3 => "period.last3",
            PeriodPreset::Last6 => "period.last6",
            PeriodPreset::YearToDate => "period.ytd",
            PeriodPreset::All => "period.all",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn test_prior_comparable_single_month() {
        let period = AnalysisPeriod::single(m(2026, 1));
        let prior = period.prior_comparable().unwrap();
        assert_eq!(prior.months(), &[m(2025, 12)]);
    }

    #[test]
    fn test_prior_comparable_span() {
        let period = AnalysisPeriod::new(vec![m(2026, 3), m(2026, 1), m(2026, 2)]);
        let prior = period.prior_comparable().unwrap();
        assert_eq!(prior.months(), &[m(2025, 10), m(2025, 11), m(2025, 12)]);
    }

    #[test]
    fn test_presets_only_available_months() {
        let available = vec![m(2025, 11), m(2025, 12), m(2026, 2), m(2026, 3)];

        let latest = AnalysisPeriod::preset(PeriodPreset::Latest, &available).unwrap();
        assert_eq!(latest.months(), &[m(2026, 3)]);

        let last3 = AnalysisPeriod::preset(PeriodPreset::Last3, &available).unwrap();
        assert_eq!(last3.months(), &[m(2026, 2), m(2026, 3)]);

        let ytd = AnalysisPeriod::preset(PeriodPreset::YearToDate, &available).unwrap();
        assert_eq!(ytd.months(), &[m(2026, 2), m(2026, 3)]);

        assert!(AnalysisPeriod::preset(PeriodPreset::All, &[]).is_none());
    }

    #[test]
    fn test_parse_selection() {
        let available = vec![m(2026, 1), m(2026, 2)];
        let parsed = AnalysisPeriod::parse_selection("JAN26, 2026-02", &available).unwrap();
        assert_eq!(parsed.months(), &[m(2026, 1), m(2026, 2)]);
        assert_eq!(
            AnalysisPeriod::parse_selection("latest", &available)
                .unwrap()
                .months(),
            &[m(2026, 2)]
        );
        assert!(AnalysisPeriod::parse_selection("bogus", &available).is_none());
    }
}
