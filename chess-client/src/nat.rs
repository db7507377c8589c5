//! NAT 探测与域名解析接口
//!
//! 具体探测逻辑由平台相关的实现提供，这里只定义接口和结果记录。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// NAT 探测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatInfo {
    pub public_ip: String,
    pub public_port: u16,
    pub local_ip: String,
    pub local_port: u16,
    pub nat_type: String,
    pub is_behind_nat: bool,
}

/// NAT 类型探测器
#[async_trait]
pub trait NatDiscovery: Send + Sync {
    async fn discover(&self) -> anyhow::Result<NatInfo>;
}

/// 域名解析器，用于连接前把主机名换成 IP
#[async_trait]
pub trait DomainResolver: Send + Sync {
    async fn resolve(&self, hostname: &str) -> anyhow::Result<String>;
}
