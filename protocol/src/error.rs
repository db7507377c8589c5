//! 协议错误定义

use thiserror::Error;

/// 协议层错误
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("消息解码失败: {reason}")]
    Decode { reason: String },

    #[error("协议版本不匹配: 期望 {expected}，收到 {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    #[error("帧过大: {size} 字节，上限 {max} 字节")]
    FrameTooLarge { size: usize, max: usize },

    #[error("连接超时")]
    ConnectionTimeout,

    #[error("连接已关闭")]
    ConnectionClosed,

    #[error("无效的服务器地址: {url}")]
    InvalidUrl { url: String },
}

impl ProtocolError {
    /// 解码错误不致命，连接仍可继续读取后续帧
    pub fn is_decode(&self) -> bool {
        matches!(self, ProtocolError::Decode { .. })
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Decode {
            reason: err.to_string(),
        }
    }
}

/// 协议层结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
