use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use protocol::{Color, GameStatus, RoomInfo};

use chess_client::{GameBridge, GameEvents, NetworkConfig, NetworkManager};

/// 把网络事件打到日志的观察者
struct ConsoleEvents;

impl GameEvents for ConsoleEvents {
    fn on_network_connected(&self) {
        info!("已连接服务器");
    }

    fn on_network_error(&self, error_code: u32, error_message: &str) {
        warn!("服务器错误 {}: {}", error_code, error_message);
    }

    fn on_room_list_received(&self, rooms: &[RoomInfo]) {
        info!("房间列表: {} 个房间", rooms.len());
        for room in rooms {
            info!(
                "  [{}] {} ({}/{})",
                room.room_id,
                room.room_name,
                room.players.len(),
                room.max_players
            );
        }
    }

    fn on_room_updated(&self, room_info: &RoomInfo) {
        info!("房间更新: {} {:?}", room_info.room_name, room_info.status);
    }

    fn on_network_game_start(&self, players: &[String], current_player: Color) {
        info!("对局开始: {:?}，{} 先行", players, current_player);
    }

    fn on_network_game_move(&self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) {
        info!(
            "对方走子: ({}, {}) -> ({}, {})",
            from_row, from_col, to_row, to_col
        );
    }

    fn on_network_game_state(&self, current_player: Color, status: GameStatus) {
        info!("对局状态: 轮到 {}，{:?}", current_player, status);
    }

    fn on_network_game_restart(&self) {
        info!("对局已重新开始");
    }

    fn on_connection_lost(&self) {
        warn!("连接丢失，重连已放弃");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("chess_client=debug".parse()?))
        .init();

    info!("中国象棋客户端启动中...");

    let config = NetworkConfig::load(&PathBuf::from("network.json"))?;

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| config.server_url.clone());
    let player_name = args.next().unwrap_or_else(|| "玩家".to_string());

    let manager = NetworkManager::new(config);
    let bridge = GameBridge::new(Arc::clone(&manager), Arc::new(ConsoleEvents));

    println!("{}", bridge.with_game(|game| game.board().to_string()));

    manager.connect(&url, &player_name).await?;
    manager.request_room_list();

    tokio::signal::ctrl_c().await?;
    info!("退出中...");
    manager.disconnect();

    Ok(())
}
