// ==========================================
// NCR 质量系统 - 配置层
// ==========================================
// 职责: 模拟延迟、自动分析、通知开关与界面语言
// 存储: TOML 文件 + 环境变量
// ==========================================

pub mod config_manager;

// 重导出核心配置
pub use config_manager::{config_keys, get_default_config_path, AppConfig, SUPPORTED_LOCALES};
