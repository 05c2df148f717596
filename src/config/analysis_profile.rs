// ==========================================
// ONE Tracker 质检分析引擎 - 分析配置档
// ==========================================
// 职责: 阈值 + SKU 目录 + 检验员名册 + 文案语言 打包
// 存储: JSON 文件（所有字段可省略，省略即取默认值）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::inspector_roster::InspectorRoster;
use crate::config::sku_catalog::SkuCatalog;
use crate::config::thresholds::ThresholdConfig;
use crate::i18n::SUPPORTED_LOCALES;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisProfile {
    pub thresholds: ThresholdConfig,
    pub sku_catalog: SkuCatalog,
    pub roster: InspectorRoster,
    /// 文案语言（en / zh-CN）
    pub locale: String,
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            sku_catalog: SkuCatalog::default(),
            roster: InspectorRoster::default(),
            locale: "en".to_string(),
        }
    }
}

impl AnalysisProfile {
    /// 从 JSON 字符串加载并校验
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let profile: AnalysisProfile = serde_json::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    /// 从 JSON 文件加载并校验
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let profile = Self::from_json_str(&raw)?;
        debug!(path = %path.display(), locale = %profile.locale, "分析配置档已加载");
        Ok(profile)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.thresholds.validate()?;
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            return Err(ConfigError::UnknownLocale(self.locale.clone()));
        }
        Ok(())
    }
}
