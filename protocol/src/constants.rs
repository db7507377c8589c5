//! 协议常量

use std::time::Duration;

/// 协议版本号
pub const PROTOCOL_VERSION: u8 = 1;

/// 棋盘行数
pub const BOARD_ROWS: usize = 10;

/// 棋盘列数
pub const BOARD_COLS: usize = 9;

/// 房间最少玩家数
pub const MIN_ROOM_PLAYERS: u32 = 2;

/// 单帧最大字节数
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// 连接超时
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// 默认重连次数
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;

/// 默认重连间隔（秒）
pub const DEFAULT_RECONNECT_DELAY_SECS: u64 = 3;
