//! 网络会话管理
//!
//! 维护与服务器的长连接：后台接收循环、独立写任务、断线自动重连，
//! 并把收到的消息分发给注册的观察者。

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use protocol::{
    ConnectAckPayload, Connector, ErrorPayload, FrameReader, FrameWriter, GameMovePayload,
    GameStartPayload, GameStatePayload, MessageType, NetworkMessage, PlayerId, RoomListPayload,
    RoomUpdatePayload, ServerUrl, TcpConnector,
};

use crate::config::NetworkConfig;
use crate::events::GameEvents;
use crate::nat::{DomainResolver, NatDiscovery, NatInfo};

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// 网络会话管理器
pub struct NetworkManager {
    config: NetworkConfig,
    state: Mutex<SessionState>,
    outbound: Mutex<Option<UnboundedSender<NetworkMessage>>>,
    player_id: Mutex<Option<PlayerId>>,
    observer: Mutex<Option<Arc<dyn GameEvents>>>,
    resolver: Mutex<Option<Arc<dyn DomainResolver>>>,
    nat_info: Mutex<Option<NatInfo>>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
    running: AtomicBool,
}

/// 忽略锁中毒，直接取内部数据
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl NetworkManager {
    /// 创建网络管理器
    pub fn new(config: NetworkConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            state: Mutex::new(SessionState::Disconnected),
            outbound: Mutex::new(None),
            player_id: Mutex::new(None),
            observer: Mutex::new(None),
            resolver: Mutex::new(None),
            nat_info: Mutex::new(None),
            shutdown: Mutex::new(None),
            running: AtomicBool::new(false),
        })
    }

    /// 注册事件观察者，覆盖之前注册的
    pub fn register_observer(&self, observer: Arc<dyn GameEvents>) {
        *lock(&self.observer) = Some(observer);
    }

    /// 注册域名解析器
    pub fn register_resolver(&self, resolver: Arc<dyn DomainResolver>) {
        *lock(&self.resolver) = Some(resolver);
    }

    /// 当前会话状态
    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// 服务器分配的玩家标识
    pub fn player_id(&self) -> Option<PlayerId> {
        lock(&self.player_id).clone()
    }

    /// 最近一次 NAT 探测结果
    pub fn nat_info(&self) -> Option<NatInfo> {
        lock(&self.nat_info).clone()
    }

    /// 连接服务器并发送连接请求
    ///
    /// 成功后接收循环在后台运行，首次连接失败不触发自动重连。
    pub async fn connect(self: &Arc<Self>, url: &str, player_name: &str) -> anyhow::Result<()> {
        *lock(&self.state) = SessionState::Connecting;
        match self.try_connect(url, player_name).await {
            Ok(()) => Ok(()),
            Err(e) => {
                *lock(&self.state) = SessionState::Disconnected;
                Err(e)
            }
        }
    }

    async fn try_connect(self: &Arc<Self>, url: &str, player_name: &str) -> anyhow::Result<()> {
        let server_url = ServerUrl::parse(url)?;
        let resolver = lock(&self.resolver).clone();
        let host = match resolver {
            Some(resolver) => resolver.resolve(&server_url.host).await?,
            None => server_url.host.clone(),
        };
        let addr = format!("{}:{}", host, server_url.port);

        info!("连接服务器 {}", addr);
        let connector = TcpConnector::with_timeout(self.config.connect_timeout());
        let conn = connector.connect(&addr).await?;
        let (reader, mut writer) = conn.split();

        writer
            .write_frame(&NetworkMessage::connect(player_name))
            .await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        *lock(&self.outbound) = Some(tx);
        *lock(&self.shutdown) = Some(shutdown_tx);
        self.running.store(true, Ordering::SeqCst);
        *lock(&self.state) = SessionState::Connected;

        tokio::spawn(write_loop(writer, rx));

        let manager = Arc::clone(self);
        let url = url.to_string();
        let player_name = player_name.to_string();
        tokio::spawn(manager.receive_loop(reader, shutdown_rx, url, player_name));

        Ok(())
    }

    /// 后台接收循环
    ///
    /// 主动断开通过 shutdown 通道立即结束循环，解码错误跳过当前帧继续读。
    /// 重连路径会重新派生本循环，返回装箱的 future 切断异步递归。
    fn receive_loop(
        self: Arc<Self>,
        mut reader: FrameReader<OwnedReadHalf>,
        mut shutdown: watch::Receiver<bool>,
        url: String,
        player_name: String,
    ) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            loop {
                tokio::select! {
                    _ = shutdown.changed() => return,
                    result = reader.read_frame::<NetworkMessage>() => match result {
                        Ok(msg) => self.dispatch(msg),
                        Err(e) if e.is_decode() => {
                            warn!("丢弃无法解码的消息: {}", e);
                        }
                        Err(e) => {
                            warn!("连接中断: {}", e);
                            break;
                        }
                    },
                }
            }
            self.handle_transport_loss(shutdown, url, player_name).await;
        })
    }

    /// 连接意外断开后的重连流程
    ///
    /// 等待和重新拨号都与 shutdown 通道竞争，保证重连期间的 `disconnect()`
    /// 立即终止整个流程。
    async fn handle_transport_loss(
        self: Arc<Self>,
        mut shutdown: watch::Receiver<bool>,
        url: String,
        player_name: String,
    ) {
        lock(&self.outbound).take();

        // 主动断开时停止标志已清除，不做重连也不通知
        if !self.running.load(Ordering::SeqCst) {
            return;
        }

        if !self.config.auto_reconnect || self.config.reconnect_attempts == 0 {
            *lock(&self.state) = SessionState::Disconnected;
            self.notify(|events| events.on_connection_lost());
            return;
        }

        *lock(&self.state) = SessionState::Reconnecting;
        let mut attempt = 0;
        while attempt < self.config.reconnect_attempts {
            if !self.running.load(Ordering::SeqCst) {
                return;
            }
            attempt += 1;
            info!(
                "第 {}/{} 次重连...",
                attempt, self.config.reconnect_attempts
            );
            tokio::select! {
                _ = shutdown.changed() => return,
                _ = tokio::time::sleep(self.config.reconnect_delay()) => {}
            }
            if !self.running.load(Ordering::SeqCst) {
                return;
            }
            tokio::select! {
                _ = shutdown.changed() => return,
                result = self.try_connect(&url, &player_name) => match result {
                    Ok(()) => {
                        info!("重连成功");
                        return;
                    }
                    Err(e) => warn!("重连失败: {}", e),
                },
            }
        }

        *lock(&self.state) = SessionState::Disconnected;
        self.notify(|events| events.on_connection_lost());
    }

    /// 按消息类型分发给观察者
    fn dispatch(&self, msg: NetworkMessage) {
        match msg.message_type {
            MessageType::Connect => {
                match msg.payload::<ConnectAckPayload>() {
                    Ok(payload) => {
                        if let Some(id) = payload.player_id {
                            debug!("服务器分配玩家标识: {}", id);
                            *lock(&self.player_id) = Some(id);
                        }
                    }
                    Err(e) => warn!("connect 应答负载无效: {}", e),
                }
                self.notify(|events| events.on_network_connected());
            }
            MessageType::Error => match msg.payload::<ErrorPayload>() {
                Ok(payload) => self.notify(|events| {
                    events.on_network_error(payload.error_code, &payload.error_message)
                }),
                Err(e) => warn!("error 负载无效: {}", e),
            },
            MessageType::RoomList => match msg.payload::<RoomListPayload>() {
                Ok(payload) => self.notify(|events| events.on_room_list_received(&payload.rooms)),
                Err(e) => warn!("room_list 负载无效: {}", e),
            },
            MessageType::RoomUpdate => match msg.payload::<RoomUpdatePayload>() {
                Ok(payload) => self.notify(|events| events.on_room_updated(&payload.room_info)),
                Err(e) => warn!("room_update 负载无效: {}", e),
            },
            MessageType::GameStart => match msg.payload::<GameStartPayload>() {
                Ok(payload) => self.notify(|events| {
                    events.on_network_game_start(&payload.players, payload.current_player)
                }),
                Err(e) => warn!("game_start 负载无效: {}", e),
            },
            MessageType::GameMove => match msg.payload::<GameMovePayload>() {
                Ok(payload) => self.notify(|events| {
                    events.on_network_game_move(
                        payload.from_row,
                        payload.from_col,
                        payload.to_row,
                        payload.to_col,
                    )
                }),
                Err(e) => warn!("game_move 负载无效: {}", e),
            },
            MessageType::GameState => match msg.payload::<GameStatePayload>() {
                Ok(payload) => self.notify(|events| {
                    events.on_network_game_state(payload.current_player, payload.game_status)
                }),
                Err(e) => warn!("game_state 负载无效: {}", e),
            },
            MessageType::GameRestart => {
                self.notify(|events| events.on_network_game_restart());
            }
            MessageType::Success => {
                debug!("服务器确认: {:?}", msg.data);
            }
            other => {
                debug!("忽略未处理的消息类型: {:?}", other);
            }
        }
    }

    fn notify<F: FnOnce(&dyn GameEvents)>(&self, f: F) {
        let observer = lock(&self.observer).clone();
        if let Some(observer) = observer {
            f(observer.as_ref());
        }
    }

    /// 主动断开连接，可重复调用
    ///
    /// 丢弃 shutdown 发送端唤醒接收循环，丢弃发送队列结束写任务。
    pub fn disconnect(&self) {
        self.running.store(false, Ordering::SeqCst);
        lock(&self.shutdown).take();
        lock(&self.outbound).take();
        *lock(&self.state) = SessionState::Disconnected;
    }

    /// 发送消息，未连接或发送失败返回 false
    pub fn send(&self, msg: NetworkMessage) -> bool {
        if *lock(&self.state) != SessionState::Connected {
            return false;
        }
        match lock(&self.outbound).as_ref() {
            Some(tx) => tx.send(msg).is_ok(),
            None => false,
        }
    }

    /// 创建房间
    pub fn create_room(&self, room_name: &str, max_players: u32) -> bool {
        self.send(NetworkMessage::create_room(
            room_name,
            max_players,
            self.player_id(),
        ))
    }

    /// 加入房间
    pub fn join_room(&self, room_id: &str) -> bool {
        self.send(NetworkMessage::join_room(room_id, self.player_id()))
    }

    /// 离开房间
    pub fn leave_room(&self) -> bool {
        self.send(NetworkMessage::leave_room(self.player_id()))
    }

    /// 发送走子
    pub fn send_move(&self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        self.send(NetworkMessage::game_move(
            from_row,
            from_col,
            to_row,
            to_col,
            self.player_id(),
        ))
    }

    /// 设置准备状态
    pub fn set_ready(&self, ready: bool) -> bool {
        self.send(NetworkMessage::player_ready(ready, self.player_id()))
    }

    /// 请求房间列表
    pub fn request_room_list(&self) -> bool {
        self.send(NetworkMessage::room_list(self.player_id()))
    }

    /// 请求重新开局
    pub fn request_restart(&self) -> bool {
        self.send(NetworkMessage::game_restart(self.player_id()))
    }

    /// 执行 NAT 探测并缓存结果
    pub async fn discover_nat(&self, provider: &dyn NatDiscovery) -> anyhow::Result<NatInfo> {
        let info = provider.discover().await?;
        *lock(&self.nat_info) = Some(info.clone());
        Ok(info)
    }
}

/// 写任务，独占连接写端
async fn write_loop(
    mut writer: FrameWriter<OwnedWriteHalf>,
    mut rx: UnboundedReceiver<NetworkMessage>,
) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = writer.write_frame(&msg).await {
            warn!("发送消息失败: {}", e);
            break;
        }
    }
}
