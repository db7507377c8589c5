//! 走法生成

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{Color, PieceType, Position};

/// 一步走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// 走法生成器
///
/// 只按各棋子的走子规则生成伪合法走法，不做将军检测。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定位置棋子的所有合法目标格
    ///
    /// 位置越界或格子为空时返回空列表。
    pub fn valid_moves(board: &Board, row: u8, col: u8) -> Vec<Position> {
        let Some(pos) = Position::new(row, col) else {
            return Vec::new();
        };
        let Some(piece) = board.get(pos) else {
            return Vec::new();
        };

        match piece.piece_type {
            PieceType::General => Self::general_moves(board, pos, piece.color),
            PieceType::Advisor => Self::advisor_moves(board, pos, piece.color),
            PieceType::Elephant => Self::elephant_moves(board, pos, piece.color),
            PieceType::Horse => Self::horse_moves(board, pos, piece.color),
            PieceType::Chariot => Self::chariot_moves(board, pos, piece.color),
            PieceType::Cannon => Self::cannon_moves(board, pos, piece.color),
            PieceType::Soldier => Self::soldier_moves(board, pos, piece.color),
        }
    }

    /// 将/帅：九宫格内上下左右走一格
    fn general_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            if let Some(to) = pos.offset(dr, dc) {
                if to.is_in_palace(color) {
                    Self::try_add_move(board, to, color, &mut moves);
                }
            }
        }
        moves
    }

    /// 士/仕：九宫格内斜走一格
    fn advisor_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        for (dr, dc) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
            if let Some(to) = pos.offset(dr, dc) {
                if to.is_in_palace(color) {
                    Self::try_add_move(board, to, color, &mut moves);
                }
            }
        }
        moves
    }

    /// 象/相：走田字，不过河，象眼有子不能走
    fn elephant_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        for (dr, dc) in [(-2, -2), (-2, 2), (2, -2), (2, 2)] {
            let Some(to) = pos.offset(dr, dc) else {
                continue;
            };
            if !to.is_own_side(color) {
                continue;
            }
            // 象眼
            let Some(eye) = pos.offset(dr / 2, dc / 2) else {
                continue;
            };
            if board.get(eye).is_some() {
                continue;
            }
            Self::try_add_move(board, to, color, &mut moves);
        }
        moves
    }

    /// 马：走日字，蹩马腿不能走
    fn horse_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let offsets: [(i8, i8, i8, i8); 8] = [
            (-2, -1, -1, 0),
            (-2, 1, -1, 0),
            (2, -1, 1, 0),
            (2, 1, 1, 0),
            (-1, -2, 0, -1),
            (1, -2, 0, -1),
            (-1, 2, 0, 1),
            (1, 2, 0, 1),
        ];

        let mut moves = Vec::new();
        for (dr, dc, leg_dr, leg_dc) in offsets {
            let Some(to) = pos.offset(dr, dc) else {
                continue;
            };
            // 马腿
            let Some(leg) = pos.offset(leg_dr, leg_dc) else {
                continue;
            };
            if board.get(leg).is_some() {
                continue;
            }
            Self::try_add_move(board, to, color, &mut moves);
        }
        moves
    }

    /// 车：直线滑行，遇子停止，敌子可吃
    fn chariot_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let mut current = pos;
            while let Some(to) = current.offset(dr, dc) {
                match board.get(to) {
                    None => {
                        moves.push(to);
                        current = to;
                    }
                    Some(piece) => {
                        if piece.color != color {
                            moves.push(to);
                        }
                        break;
                    }
                }
            }
        }
        moves
    }

    /// 炮：移动同车，吃子需隔一个炮架
    fn cannon_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let mut current = pos;
            let mut jumped = false;
            while let Some(to) = current.offset(dr, dc) {
                match board.get(to) {
                    None => {
                        if !jumped {
                            moves.push(to);
                        }
                        current = to;
                    }
                    Some(piece) => {
                        if jumped {
                            if piece.color != color {
                                moves.push(to);
                            }
                            break;
                        }
                        jumped = true;
                        current = to;
                    }
                }
            }
        }
        moves
    }

    /// 兵/卒：只进不退，过河后可横走
    fn soldier_moves(board: &Board, pos: Position, color: Color) -> Vec<Position> {
        let mut moves = Vec::new();
        if let Some(to) = pos.offset(color.forward(), 0) {
            Self::try_add_move(board, to, color, &mut moves);
        }
        if pos.has_crossed_river(color) {
            for dc in [-1, 1] {
                if let Some(to) = pos.offset(0, dc) {
                    Self::try_add_move(board, to, color, &mut moves);
                }
            }
        }
        moves
    }

    /// 目标格为空或有敌方棋子时加入走法
    fn try_add_move(board: &Board, to: Position, color: Color, moves: &mut Vec<Position>) {
        match board.get(to) {
            None => moves.push(to),
            Some(piece) if piece.color != color => moves.push(to),
            Some(_) => {}
        }
    }
}
