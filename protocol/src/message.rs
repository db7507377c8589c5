//! 网络消息定义
//!
//! 所有消息统一为 `{type, data, player_id, timestamp}` 的 JSON 信封，
//! data 字段按消息类型携带不同的负载。

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::MIN_ROOM_PLAYERS;
use crate::error::Result;
use crate::game::GameStatus;
use crate::piece::Color;

/// 玩家标识
pub type PlayerId = String;

/// 房间标识
pub type RoomId = String;

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Connect,
    Disconnect,
    CreateRoom,
    JoinRoom,
    LeaveRoom,
    RoomList,
    RoomUpdate,
    GameStart,
    GameMove,
    GameState,
    GameEnd,
    GameRestart,
    PlayerReady,
    PlayerList,
    Error,
    Success,
}

/// 房间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

/// 房间信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub room_name: String,
    pub max_players: u32,
    pub players: Vec<String>,
    pub status: RoomStatus,
}

impl RoomInfo {
    pub fn is_full(&self) -> bool {
        self.players.len() as u32 >= self.max_players
    }
}

/// 网络消息信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl NetworkMessage {
    /// 创建带时间戳的消息
    pub fn new(message_type: MessageType, player_id: Option<PlayerId>) -> Self {
        Self {
            message_type,
            data: Map::new(),
            player_id,
            timestamp: Some(Utc::now().timestamp_millis()),
        }
    }

    /// 连接请求
    pub fn connect(player_name: &str) -> Self {
        let mut msg = Self::new(MessageType::Connect, None);
        msg.data
            .insert("player_name".into(), Value::String(player_name.into()));
        msg
    }

    /// 创建房间，人数下限为 2
    pub fn create_room(room_name: &str, max_players: u32, player_id: Option<PlayerId>) -> Self {
        let mut msg = Self::new(MessageType::CreateRoom, player_id);
        msg.data
            .insert("room_name".into(), Value::String(room_name.into()));
        msg.data.insert(
            "max_players".into(),
            Value::from(max_players.max(MIN_ROOM_PLAYERS)),
        );
        msg
    }

    /// 加入房间
    pub fn join_room(room_id: &str, player_id: Option<PlayerId>) -> Self {
        let mut msg = Self::new(MessageType::JoinRoom, player_id);
        msg.data
            .insert("room_id".into(), Value::String(room_id.into()));
        msg
    }

    /// 离开房间
    pub fn leave_room(player_id: Option<PlayerId>) -> Self {
        Self::new(MessageType::LeaveRoom, player_id)
    }

    /// 请求房间列表
    pub fn room_list(player_id: Option<PlayerId>) -> Self {
        Self::new(MessageType::RoomList, player_id)
    }

    /// 走子
    pub fn game_move(
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
        player_id: Option<PlayerId>,
    ) -> Self {
        let mut msg = Self::new(MessageType::GameMove, player_id);
        msg.data.insert("from_row".into(), Value::from(from_row));
        msg.data.insert("from_col".into(), Value::from(from_col));
        msg.data.insert("to_row".into(), Value::from(to_row));
        msg.data.insert("to_col".into(), Value::from(to_col));
        msg
    }

    /// 准备状态
    pub fn player_ready(is_ready: bool, player_id: Option<PlayerId>) -> Self {
        let mut msg = Self::new(MessageType::PlayerReady, player_id);
        msg.data.insert("is_ready".into(), Value::Bool(is_ready));
        msg
    }

    /// 请求重新开局
    pub fn game_restart(player_id: Option<PlayerId>) -> Self {
        Self::new(MessageType::GameRestart, player_id)
    }

    /// 把 data 字段解析成指定负载类型
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// 序列化为 JSON 字节
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// 从 JSON 字节解析
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// connect 请求负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectPayload {
    pub player_name: String,
}

/// connect 应答负载，服务器分配的玩家标识
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectAckPayload {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
}

/// create_room 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomPayload {
    pub room_name: String,
    pub max_players: u32,
}

/// join_room 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomPayload {
    pub room_id: RoomId,
}

/// game_move 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMovePayload {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
}

/// game_start 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStartPayload {
    pub players: Vec<String>,
    pub current_player: Color,
}

/// game_state 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatePayload {
    pub current_player: Color,
    pub game_status: GameStatus,
}

/// player_ready 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReadyPayload {
    pub is_ready: bool,
}

/// room_list 应答负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomListPayload {
    #[serde(default)]
    pub rooms: Vec<RoomInfo>,
}

/// room_update 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomUpdatePayload {
    pub room_info: RoomInfo,
}

/// error 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error_code: u32,
    pub error_message: String,
}

/// success 负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

/// 服务器错误码
pub mod error_code {
    pub const ROOM_FULL: u32 = 1001;
    pub const ROOM_NOT_FOUND: u32 = 1002;
    pub const INVALID_MOVE: u32 = 1003;
    pub const NOT_YOUR_TURN: u32 = 1004;
    pub const GAME_NOT_STARTED: u32 = 1005;
    pub const PLAYER_NOT_IN_ROOM: u32 = 1006;
    pub const NETWORK_ERROR: u32 = 2001;
    pub const SERVER_ERROR: u32 = 2002;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_roundtrip() {
        let msg = NetworkMessage::connect("张三");
        let bytes = msg.to_json().unwrap();
        let parsed = NetworkMessage::from_json(&bytes).unwrap();

        assert_eq!(parsed.message_type, MessageType::Connect);
        assert!(parsed.timestamp.is_some());
        let payload: ConnectPayload = parsed.payload().unwrap();
        assert_eq!(payload.player_name, "张三");
    }

    #[test]
    fn test_game_move_payload() {
        let msg = NetworkMessage::game_move(6, 0, 5, 0, Some("p1".into()));
        let payload: GameMovePayload = msg.payload().unwrap();
        assert_eq!(
            payload,
            GameMovePayload {
                from_row: 6,
                from_col: 0,
                to_row: 5,
                to_col: 0,
            }
        );
        assert_eq!(msg.player_id.as_deref(), Some("p1"));
    }

    #[test]
    fn test_create_room_clamps_min_players() {
        let msg = NetworkMessage::create_room("房间", 1, None);
        let payload: CreateRoomPayload = msg.payload().unwrap();
        assert_eq!(payload.max_players, MIN_ROOM_PLAYERS);

        let msg = NetworkMessage::create_room("房间", 4, None);
        let payload: CreateRoomPayload = msg.payload().unwrap();
        assert_eq!(payload.max_players, 4);
    }

    #[test]
    fn test_player_ready_payload() {
        let msg = NetworkMessage::player_ready(true, Some("p1".into()));
        let payload: PlayerReadyPayload = msg.payload().unwrap();
        assert!(payload.is_ready);
    }

    #[test]
    fn test_type_tag_wire_format() {
        let msg = NetworkMessage::room_list(None);
        let value: Value = serde_json::from_slice(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "room_list");
    }

    #[test]
    fn test_unknown_type_rejected() {
        let raw = br#"{"type": "teleport", "data": {}}"#;
        assert!(NetworkMessage::from_json(raw).is_err());
    }

    #[test]
    fn test_missing_type_rejected() {
        let raw = br#"{"data": {}}"#;
        assert!(NetworkMessage::from_json(raw).is_err());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let raw = br#"{"type": "room_list"}"#;
        let msg = NetworkMessage::from_json(raw).unwrap();
        assert!(msg.data.is_empty());
        assert_eq!(msg.player_id, None);
        assert_eq!(msg.timestamp, None);
    }

    #[test]
    fn test_extra_data_keys_tolerated() {
        let raw = r#"{"type": "game_move", "data": {"from_row": 6, "from_col": 0, "to_row": 5, "to_col": 0, "annotation": "好棋"}}"#;
        let msg = NetworkMessage::from_json(raw.as_bytes()).unwrap();
        let payload: GameMovePayload = msg.payload().unwrap();
        assert_eq!(payload.from_row, 6);
    }

    #[test]
    fn test_error_payload() {
        let raw = r#"{"type": "error", "data": {"error_code": 1004, "error_message": "还没轮到你"}}"#;
        let msg = NetworkMessage::from_json(raw.as_bytes()).unwrap();
        let payload: ErrorPayload = msg.payload().unwrap();
        assert_eq!(payload.error_code, error_code::NOT_YOUR_TURN);
        assert_eq!(payload.error_message, "还没轮到你");
    }

    #[test]
    fn test_room_info_is_full() {
        let mut room = RoomInfo {
            room_id: "r1".into(),
            room_name: "房间".into(),
            max_players: 2,
            players: vec!["a".into()],
            status: RoomStatus::Waiting,
        };
        assert!(!room.is_full());
        room.players.push("b".into());
        assert!(room.is_full());
    }

    #[test]
    fn test_game_start_payload_roundtrip() {
        let raw = br#"{"type": "game_start", "data": {"players": ["a", "b"], "current_player": "red"}}"#;
        let msg = NetworkMessage::from_json(raw).unwrap();
        let payload: GameStartPayload = msg.payload().unwrap();
        assert_eq!(payload.current_player, Color::Red);
        assert_eq!(payload.players, vec!["a", "b"]);
    }
}
