// ==========================================
// NCR 质量系统 - 配置管理器
// ==========================================
// 职责: 配置加载（TOML 文件 + 环境变量覆写）与默认值
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 配置键（环境变量）
pub mod config_keys {
    /// 配置文件路径
    pub const CONFIG_PATH: &str = "NCR_QC_CONFIG";
    /// 界面语言
    pub const LOCALE: &str = "NCR_QC_LOCALE";
}

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 模拟提交耗时（毫秒）
    pub submit_delay_ms: u64,
    /// 模拟分析耗时（毫秒）
    pub analysis_delay_ms: u64,
    /// 收到记录时自动分析
    pub auto_analyze: bool,
    /// 分析完成时发送通知
    pub notify_analysis_complete: bool,
    /// 界面语言
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 1000,
            analysis_delay_ms: 2000,
            auto_analyze: true,
            notify_analysis_complete: true,
            locale: "en".to_string(),
        }
    }
}

impl AppConfig {
    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    /// 从 TOML 文本解析（缺省项使用默认值）
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw).context("TOML 格式错误")?;
        config.validate()?;
        Ok(config)
    }

    /// 按优先级加载配置
    ///
    /// 1. NCR_QC_CONFIG 指定的文件（必须存在）
    /// 2. 用户配置目录下的 config.toml（不存在则使用默认值）
    /// 3. 应用环境变量覆写
    pub fn load_or_default() -> Result<Self> {
        let mut config = match std::env::var(config_keys::CONFIG_PATH) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim()))?,
            _ => {
                let path = get_default_config_path();
                if path.exists() {
                    Self::load(&path)?
                } else {
                    tracing::debug!("未找到配置文件，使用默认配置: {}", path.display());
                    Self::default()
                }
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// 应用环境变量覆写
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(locale) = std::env::var(config_keys::LOCALE) {
            let locale = locale.trim();
            if !locale.is_empty() {
                self.locale = locale.to_string();
            }
        }
        self.validate()
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<()> {
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            bail!(
                "不支持的语言: {}（可选: {}）",
                self.locale,
                SUPPORTED_LOCALES.join(", ")
            );
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

/// 默认配置文件路径
///
/// 使用用户配置目录；无法获取时回退到当前目录
pub fn get_default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("ncr-qc").join("config.toml"),
        None => PathBuf::from("./ncr-qc.toml"),
    }
}
