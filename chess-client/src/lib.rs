//! 中国象棋客户端库
//!
//! 包含:
//! - 网络会话管理 (NetworkManager)
//! - 引擎与网络的桥接层 (GameBridge)
//! - 事件回调 trait (GameEvents)
//! - 客户端配置与 NAT 探测接口

pub mod bridge;
pub mod config;
pub mod events;
pub mod nat;
pub mod network;

pub use bridge::GameBridge;
pub use config::NetworkConfig;
pub use events::GameEvents;
pub use nat::{DomainResolver, NatDiscovery, NatInfo};
pub use network::{NetworkManager, SessionState};
