//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，`PORT` / `RUST_LOG` 环境变量可覆盖部分字段

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 上游行情页面配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 行情页面基础地址，股票代码作为最后一段路径追加
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 页面语言（hl 参数），选择器按英文页面编写
    #[serde(default = "default_language")]
    pub language: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 浏览器 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 上游配置
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 实际加载的配置文件路径（未找到则为 None）
    #[serde(skip)]
    pub source: Option<String>,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8002 }
fn default_base_url() -> String { "https://www.google.com/finance/quote".to_string() }
fn default_language() -> String { "en".to_string() }
fn default_timeout() -> u64 { 5 }
fn default_connect_timeout() -> u64 { 3 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36"
        .to_string()
}
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，找不到则使用默认值
    ///
    /// 日志系统在此之后才初始化，所以这里不打日志；存在但无法解析的配置文件视为启动错误
    pub fn load() -> anyhow::Result<Self> {
        let config_paths = ["config.json", "config/config.json"];

        let mut config = Self::default();
        for path in config_paths {
            if Path::new(path).exists() {
                config = Self::from_file(path)
                    .map_err(|e| anyhow::anyhow!("加载配置文件 {} 失败: {}", path, e))?;
                config.source = Some(path.to_string());
                break;
            }
        }

        config.apply_env(env::var("PORT").ok().as_deref())?;
        Ok(config)
    }

    /// 应用环境变量覆盖
    fn apply_env(&mut self, port: Option<&str>) -> anyhow::Result<()> {
        if let Some(port) = port {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT 环境变量无效 ({}): {}", port, e))?;
        }
        Ok(())
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
