//! 客户端网络配置

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use protocol::{DEFAULT_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_DELAY_SECS};

/// 网络配置，可从 JSON 文件加载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// 服务器地址，支持 `host:port` 或 `tcp://host:port`
    pub server_url: String,
    /// 连接超时（秒）
    pub connect_timeout_secs: u64,
    /// 连接意外断开后是否自动重连
    pub auto_reconnect: bool,
    /// 最大重连次数
    pub reconnect_attempts: u32,
    /// 重连间隔（秒）
    pub reconnect_delay_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server_url: "tcp://127.0.0.1:8766".to_string(),
            connect_timeout_secs: 10,
            auto_reconnect: true,
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            reconnect_delay_secs: DEFAULT_RECONNECT_DELAY_SECS,
        }
    }
}

impl NetworkConfig {
    /// 从文件加载配置，文件不存在时返回默认配置
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self).context("序列化配置失败")?;
        std::fs::write(path, content)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}
