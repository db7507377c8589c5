//! 中国象棋共享协议库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 走法生成和对局状态机
//! - 消息类型定义 (NetworkMessage 及各负载)
//! - 传输层抽象 (Connector, Connection, Listener traits)
//! - 帧编解码 (FrameReader/FrameWriter)

mod board;
mod constants;
mod error;
mod game;
mod message;
mod moves;
mod piece;
mod transport;

pub use board::Board;
pub use constants::*;
pub use error::{ProtocolError, Result};
pub use game::{Game, GameStatus, MoveRecord};
pub use message::{
    error_code, ConnectAckPayload, ConnectPayload, CreateRoomPayload, ErrorPayload,
    GameMovePayload, GameStartPayload, GameStatePayload, JoinRoomPayload, MessageType,
    NetworkMessage, PlayerId, PlayerReadyPayload, RoomId, RoomInfo, RoomListPayload, RoomStatus,
    RoomUpdatePayload, SuccessPayload,
};
pub use moves::{Move, MoveGenerator};
pub use piece::{Color, Piece, PieceType, Position};
pub use transport::{
    Connection, Connector, FrameReader, FrameWriter, Listener, ServerUrl, TcpConnection,
    TcpConnector, TcpListener,
};
