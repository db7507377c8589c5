//! 网络事件回调
//!
//! 上层（界面或桥接层）实现此 trait 订阅网络事件，所有方法都有空默认实现，
//! 只需覆盖关心的事件。

use protocol::{Color, GameStatus, RoomInfo};

/// 对局网络事件观察者
pub trait GameEvents: Send + Sync {
    /// 连接建立并收到服务器应答
    fn on_network_connected(&self) {}

    /// 收到服务器错误
    fn on_network_error(&self, _error_code: u32, _error_message: &str) {}

    /// 收到房间列表
    fn on_room_list_received(&self, _rooms: &[RoomInfo]) {}

    /// 房间信息变化
    fn on_room_updated(&self, _room_info: &RoomInfo) {}

    /// 对局开始
    fn on_network_game_start(&self, _players: &[String], _current_player: Color) {}

    /// 远端走子
    fn on_network_game_move(&self, _from_row: u8, _from_col: u8, _to_row: u8, _to_col: u8) {}

    /// 服务器推送的对局状态
    fn on_network_game_state(&self, _current_player: Color, _status: GameStatus) {}

    /// 对局重新开始
    fn on_network_game_restart(&self) {}

    /// 重连尝试耗尽，连接彻底丢失
    fn on_connection_lost(&self) {}
}
