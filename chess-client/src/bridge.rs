//! 对局桥接层
//!
//! 把本地棋局引擎和网络会话粘在一起：本地走子先过引擎校验再上网，
//! 远端走子先过引擎校验再转发给界面层。

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use protocol::{Color, Game, GameStatus, RoomInfo};

use crate::events::GameEvents;
use crate::network::NetworkManager;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// 引擎与网络之间的桥
///
/// 自身注册为网络观察者，处理后把事件转发给下游（界面层）。
pub struct GameBridge {
    game: Mutex<Game>,
    net: Arc<NetworkManager>,
    downstream: Arc<dyn GameEvents>,
}

impl GameBridge {
    /// 创建桥接层并注册为网络观察者
    pub fn new(net: Arc<NetworkManager>, downstream: Arc<dyn GameEvents>) -> Arc<Self> {
        let bridge = Arc::new(Self {
            game: Mutex::new(Game::new()),
            net,
            downstream,
        });
        bridge
            .net
            .register_observer(Arc::clone(&bridge) as Arc<dyn GameEvents>);
        bridge
    }

    /// 本地走子
    ///
    /// 引擎接受后才发送到服务器；未连接时只在本地生效。
    pub fn play_move(&self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        if !lock(&self.game).move_piece(from_row, from_col, to_row, to_col) {
            return false;
        }
        if !self.net.send_move(from_row, from_col, to_row, to_col) {
            debug!("走子未发送到服务器，仅在本地生效");
        }
        true
    }

    /// 读取对局状态
    pub fn with_game<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&lock(&self.game))
    }

    /// 悔一步棋
    pub fn undo(&self) -> bool {
        lock(&self.game).undo()
    }

    /// 重置本地对局
    pub fn reset(&self) {
        lock(&self.game).reset();
    }
}

impl GameEvents for GameBridge {
    fn on_network_connected(&self) {
        self.downstream.on_network_connected();
    }

    fn on_network_error(&self, error_code: u32, error_message: &str) {
        self.downstream.on_network_error(error_code, error_message);
    }

    fn on_room_list_received(&self, rooms: &[RoomInfo]) {
        self.downstream.on_room_list_received(rooms);
    }

    fn on_room_updated(&self, room_info: &RoomInfo) {
        self.downstream.on_room_updated(room_info);
    }

    fn on_network_game_start(&self, players: &[String], current_player: Color) {
        lock(&self.game).reset();
        self.downstream.on_network_game_start(players, current_player);
    }

    fn on_network_game_move(&self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) {
        if lock(&self.game).move_piece(from_row, from_col, to_row, to_col) {
            self.downstream
                .on_network_game_move(from_row, from_col, to_row, to_col);
        } else {
            warn!(
                "忽略非法的远端走子: ({}, {}) -> ({}, {})",
                from_row, from_col, to_row, to_col
            );
        }
    }

    fn on_network_game_state(&self, current_player: Color, status: GameStatus) {
        self.downstream.on_network_game_state(current_player, status);
    }

    fn on_network_game_restart(&self) {
        lock(&self.game).reset();
        self.downstream.on_network_game_restart();
    }

    fn on_connection_lost(&self) {
        self.downstream.on_connection_lost();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::config::NetworkConfig;

    #[derive(Default)]
    struct CountingEvents {
        moves: AtomicU32,
        restarts: AtomicU32,
    }

    impl GameEvents for CountingEvents {
        fn on_network_game_move(&self, _: u8, _: u8, _: u8, _: u8) {
            self.moves.fetch_add(1, Ordering::SeqCst);
        }

        fn on_network_game_restart(&self) {
            self.restarts.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn make_bridge() -> (Arc<GameBridge>, Arc<CountingEvents>) {
        let net = NetworkManager::new(NetworkConfig::default());
        let ui = Arc::new(CountingEvents::default());
        let bridge = GameBridge::new(net, ui.clone() as Arc<dyn GameEvents>);
        (bridge, ui)
    }

    #[tokio::test]
    async fn test_local_move_through_engine() {
        let (bridge, _ui) = make_bridge();

        assert!(bridge.play_move(6, 0, 5, 0));
        assert_eq!(bridge.with_game(|g| g.current_player()), Color::Black);

        // 黑方回合，红方再走被拒
        assert!(!bridge.play_move(6, 2, 5, 2));
    }

    #[tokio::test]
    async fn test_remote_move_applied_and_forwarded() {
        let (bridge, ui) = make_bridge();

        bridge.on_network_game_move(6, 0, 5, 0);
        assert_eq!(ui.moves.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.with_game(|g| g.history().len()), 1);

        // 非法的远端走子被丢弃，不转发
        bridge.on_network_game_move(0, 0, 5, 5);
        assert_eq!(ui.moves.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.with_game(|g| g.history().len()), 1);
    }

    #[tokio::test]
    async fn test_restart_resets_engine() {
        let (bridge, ui) = make_bridge();

        assert!(bridge.play_move(6, 0, 5, 0));
        bridge.on_network_game_restart();

        assert_eq!(ui.restarts.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.with_game(|g| g.history().len()), 0);
        assert_eq!(bridge.with_game(|g| g.current_player()), Color::Red);
    }

    #[tokio::test]
    async fn test_undo_and_reset() {
        let (bridge, _ui) = make_bridge();

        assert!(!bridge.undo());
        assert!(bridge.play_move(6, 0, 5, 0));
        assert!(bridge.undo());
        assert_eq!(bridge.with_game(|g| g.current_player()), Color::Red);

        assert!(bridge.play_move(6, 0, 5, 0));
        bridge.reset();
        assert_eq!(bridge.with_game(|g| g.history().len()), 0);
    }
}
