// ==========================================
// ONE Tracker 质检分析引擎 - 领域类型定义
// ==========================================
// 红线: 零分母比率必须显式为"未定义"，不得渲染为 0%
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ==========================================
// 比率 (Rate)
// ==========================================
// 百分比数值；分母为 0 时为 None（N/A）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Rate(Option<f64>);

impl Rate {
    /// 未定义比率（分母为 0）
    pub const fn undefined() -> Self {
        Rate(None)
    }

    /// numerator / denominator × 100，分母为 0 时返回未定义
    pub fn percent(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Rate(None);
        }
        Rate(Some(numerator as f64 / denominator as f64 * 100.0))
    }

    /// 由已知百分比值构造（非有限值视为未定义）
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Rate(Some(value))
        } else {
            Rate(None)
        }
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_defined(self) -> bool {
        self.0.is_some()
    }

    /// value >= threshold（未定义时恒为 false）
    pub fn at_least(self, threshold: f64) -> bool {
        matches!(self.0, Some(v) if v >= threshold)
    }

    /// value < threshold（未定义时恒为 false）
    pub fn below(self, threshold: f64) -> bool {
        matches!(self.0, Some(v) if v < threshold)
    }

    /// 与上期的差值（百分点），任一方未定义则未定义
    pub fn delta(self, prior: Rate) -> Rate {
        match (self.0, prior.0) {
            (Some(current), Some(previous)) => Rate(Some(current - previous)),
            _ => Rate(None),
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.1}%", v),
            None => write!(f, "N/A"),
        }
    }
}

// ==========================================
// 月份键 (MonthKey)
// ==========================================
// 排序: 先年后月，即时间顺序
// 不变式: 字段私有，只能经 new / of / parse / offset 构造，month 始终在 1 ~ 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

const MONTH_ABBR: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    /// 月份（1 ~ 12）
    pub fn month(self) -> u32 {
        self.month
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 按月偏移（可为负）
    pub fn offset(self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u32,
        }
    }

    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    /// 月份序号差 (self - other)
    pub fn months_since(self, other: MonthKey) -> i32 {
        (self.year * 12 + self.month as i32) - (other.year * 12 + other.month as i32)
    }

    /// 工作表命名格式，例如 JAN26
    pub fn sheet_name(self) -> String {
        format!(
            "{}{:02}",
            MONTH_ABBR[(self.month - 1) as usize],
            self.year.rem_euclid(100)
        )
    }

    /// 解析月份
    ///
    /// # 支持格式
    /// - `2026-01`
    /// - `JAN26` / `JAN2026`（工作表命名）
    /// - `Jan 2026`
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Some((y, m)) = s.split_once('-') {
            let year = y.trim().parse::<i32>().ok()?;
            let month = m.trim().parse::<u32>().ok()?;
            return Self::new(year, month);
        }

        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() < 5 || !compact.is_char_boundary(3) {
            return None;
        }
        let (abbr, digits) = compact.split_at(3);
        let abbr = abbr.to_ascii_uppercase();
        let month = MONTH_ABBR.iter().position(|m| *m == abbr)? as u32 + 1;
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year = match digits.len() {
            2 => 2000 + digits.parse::<i32>().ok()?,
            4 => digits.parse::<i32>().ok()?,
            _ => return None,
        };
        Self::new(year, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MonthKey::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("无法解析月份: {}", raw)))
    }
}

// ==========================================
// 角色 (Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    ProductionManager,
    QcManager,
    SewingManager,
    OperationsDirector,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::ProductionManager,
        Role::QcManager,
        Role::SewingManager,
        Role::OperationsDirector,
    ];

    /// 洞察条数上限
    pub fn insight_cap(self) -> usize {
        match self {
            Role::ProductionManager => 6,
            Role::QcManager => 5,
            Role::SewingManager => 4,
            Role::OperationsDirector => 5,
        }
    }

    /// 文案 key
    pub fn label_key(self) -> &'static str {
        match self {
            Role::ProductionManager => "role.production_manager",
            Role::QcManager => "role.qc_manager",
            Role::SewingManager => "role.sewing_manager",
            Role::OperationsDirector => "role.operations_director",
        }
    }

    /// 解析角色名（大小写不敏感，支持简称）
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "production" | "production_manager" | "pm" => Some(Role::ProductionManager),
            "qc" | "qc_manager" => Some(Role::QcManager),
            "sewing" | "sewing_manager" => Some(Role::SewingManager),
            "operations" | "ops" | "operations_director" => Some(Role::OperationsDirector),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::ProductionManager => write!(f, "PRODUCTION_MANAGER"),
            Role::QcManager => write!(f, "QC_MANAGER"),
            Role::SewingManager => write!(f, "SEWING_MANAGER"),
            Role::OperationsDirector => write!(f, "OPERATIONS_DIRECTOR"),
        }
    }
}

// ==========================================
// 洞察严重度 (Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Positive, // 表现良好
    Info,     // 中性信息
    Warning,  // 需关注
    Critical, // 需立即处理
}

impl Severity {
    /// 是否属于告警类（Warning / Critical）
    pub fn is_alert(self) -> bool {
        matches!(self, Severity::Warning | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Positive => write!(f, "POSITIVE"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}
