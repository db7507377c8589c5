//! 对局状态机

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Color, Piece, Position};

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    RedWins,
    BlackWins,
}

/// 走子记录，供悔棋恢复
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,
    pub captured: Option<Piece>,
    pub mover: Color,
}

/// 一局棋
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    current_player: Color,
    status: GameStatus,
    history: Vec<MoveRecord>,
}

impl Game {
    /// 创建新对局，红方先行
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            current_player: Color::Red,
            status: GameStatus::Playing,
            history: Vec::new(),
        }
    }

    /// 从给定局面创建对局
    pub fn with_board(board: Board, current_player: Color) -> Self {
        let mut game = Self {
            board,
            current_player,
            status: GameStatus::Playing,
            history: Vec::new(),
        };
        game.recompute_status();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// 获取指定位置棋子的所有合法目标格
    pub fn get_valid_moves(&self, row: u8, col: u8) -> Vec<Position> {
        MoveGenerator::valid_moves(&self.board, row, col)
    }

    /// 尝试走一步棋
    ///
    /// 起点无子、不是当前玩家的棋子、或目标不在合法走法内时返回 false，
    /// 此时对局状态不发生任何变化。
    pub fn move_piece(&mut self, from_row: u8, from_col: u8, to_row: u8, to_col: u8) -> bool {
        let Some(from) = Position::new(from_row, from_col) else {
            return false;
        };
        let Some(to) = Position::new(to_row, to_col) else {
            return false;
        };
        let Some(piece) = self.board.get(from) else {
            return false;
        };
        if piece.color != self.current_player {
            return false;
        }
        if !MoveGenerator::valid_moves(&self.board, from_row, from_col).contains(&to) {
            return false;
        }

        let captured = self.board.move_piece(from, to);
        self.history.push(MoveRecord {
            mv: Move::new(from, to),
            captured,
            mover: self.current_player,
        });
        self.current_player = self.current_player.opponent();
        self.recompute_status();
        true
    }

    /// 悔一步棋，无历史时返回 false
    pub fn undo(&mut self) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };
        let piece = self.board.get(record.mv.to);
        self.board.set(record.mv.from, piece);
        self.board.set(record.mv.to, record.captured);
        self.current_player = record.mover;
        // 终局唯一触发条件是吃将，撤销后必然回到对局中
        self.status = GameStatus::Playing;
        true
    }

    /// 重置为初始对局
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 扫描双方将帅，更新对局状态
    fn recompute_status(&mut self) {
        self.status = if self.board.find_general(Color::Red).is_none() {
            GameStatus::BlackWins
        } else if self.board.find_general(Color::Black).is_none() {
            GameStatus::RedWins
        } else {
            GameStatus::Playing
        };
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
