//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_COLS, BOARD_ROWS};
use crate::piece::{Color, Piece, PieceType, Position};

/// 棋盘
///
/// 10 行 9 列，按行优先存储。第 0 行是黑方底线，第 9 行是红方底线。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; BOARD_ROWS * BOARD_COLS],
        }
    }

    /// 创建初始局面
    pub fn initial() -> Self {
        let mut board = Self::empty();

        let back_rank = [
            PieceType::Chariot,
            PieceType::Horse,
            PieceType::Elephant,
            PieceType::Advisor,
            PieceType::General,
            PieceType::Advisor,
            PieceType::Elephant,
            PieceType::Horse,
            PieceType::Chariot,
        ];

        // 黑方在上
        for (col, &piece_type) in back_rank.iter().enumerate() {
            board.set(
                Position::new_unchecked(0, col as u8),
                Some(Piece::new(piece_type, Color::Black)),
            );
        }
        board.set(
            Position::new_unchecked(2, 1),
            Some(Piece::new(PieceType::Cannon, Color::Black)),
        );
        board.set(
            Position::new_unchecked(2, 7),
            Some(Piece::new(PieceType::Cannon, Color::Black)),
        );
        for col in [0u8, 2, 4, 6, 8] {
            board.set(
                Position::new_unchecked(3, col),
                Some(Piece::new(PieceType::Soldier, Color::Black)),
            );
        }

        // 红方在下
        for (col, &piece_type) in back_rank.iter().enumerate() {
            board.set(
                Position::new_unchecked(9, col as u8),
                Some(Piece::new(piece_type, Color::Red)),
            );
        }
        board.set(
            Position::new_unchecked(7, 1),
            Some(Piece::new(PieceType::Cannon, Color::Red)),
        );
        board.set(
            Position::new_unchecked(7, 7),
            Some(Piece::new(PieceType::Cannon, Color::Red)),
        );
        for col in [0u8, 2, 4, 6, 8] {
            board.set(
                Position::new_unchecked(6, col),
                Some(Piece::new(PieceType::Soldier, Color::Red)),
            );
        }

        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    /// 移动棋子，返回被吃掉的棋子
    ///
    /// 原地移动不改变棋盘。
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        if from == to {
            return None;
        }
        let piece = self.get(from)?;
        let captured = self.get(to);
        self.set(to, Some(piece));
        self.set(from, None);
        captured
    }

    /// 查找指定阵营的将/帅
    pub fn find_general(&self, color: Color) -> Option<Position> {
        for (index, square) in self.squares.iter().enumerate() {
            if let Some(piece) = square {
                if piece.piece_type == PieceType::General && piece.color == color {
                    return Position::from_index(index);
                }
            }
        }
        None
    }

    /// 获取指定阵营的所有棋子及位置
    pub fn pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取棋盘上的所有棋子及位置
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, square)| {
                square.and_then(|piece| Position::from_index(index).map(|pos| (pos, piece)))
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..BOARD_ROWS as u8 {
            for col in 0..BOARD_COLS as u8 {
                match self.get(Position::new_unchecked(row, col)) {
                    Some(piece) => write!(f, "{}", piece.display_char())?,
                    None => write!(f, "＋")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        assert_eq!(
            board.get(Position::new_unchecked(0, 4)),
            Some(Piece::new(PieceType::General, Color::Black))
        );
        assert_eq!(
            board.get(Position::new_unchecked(9, 4)),
            Some(Piece::new(PieceType::General, Color::Red))
        );
        assert_eq!(
            board.get(Position::new_unchecked(2, 1)),
            Some(Piece::new(PieceType::Cannon, Color::Black))
        );
        assert_eq!(
            board.get(Position::new_unchecked(7, 1)),
            Some(Piece::new(PieceType::Cannon, Color::Red))
        );
        assert_eq!(
            board.get(Position::new_unchecked(3, 0)),
            Some(Piece::new(PieceType::Soldier, Color::Black))
        );
        assert_eq!(
            board.get(Position::new_unchecked(6, 0)),
            Some(Piece::new(PieceType::Soldier, Color::Red))
        );
        assert_eq!(board.get(Position::new_unchecked(5, 4)), None);

        assert_eq!(board.all_pieces().len(), 32);
        assert_eq!(board.pieces(Color::Red).len(), 16);
    }

    #[test]
    fn test_move_piece() {
        let mut board = Board::initial();
        let from = Position::new_unchecked(6, 0);
        let to = Position::new_unchecked(5, 0);

        let captured = board.move_piece(from, to);
        assert_eq!(captured, None);
        assert_eq!(board.get(from), None);
        assert_eq!(
            board.get(to),
            Some(Piece::new(PieceType::Soldier, Color::Red))
        );
    }

    #[test]
    fn test_move_piece_capture() {
        let mut board = Board::empty();
        let from = Position::new_unchecked(5, 4);
        let to = Position::new_unchecked(4, 4);
        board.set(from, Some(Piece::new(PieceType::Chariot, Color::Red)));
        board.set(to, Some(Piece::new(PieceType::Soldier, Color::Black)));

        let captured = board.move_piece(from, to);
        assert_eq!(captured, Some(Piece::new(PieceType::Soldier, Color::Black)));
        assert_eq!(
            board.get(to),
            Some(Piece::new(PieceType::Chariot, Color::Red))
        );
    }

    #[test]
    fn test_move_piece_same_square_is_noop() {
        let mut board = Board::initial();
        let pos = Position::new_unchecked(6, 0);

        assert_eq!(board.move_piece(pos, pos), None);
        assert_eq!(
            board.get(pos),
            Some(Piece::new(PieceType::Soldier, Color::Red))
        );
    }

    #[test]
    fn test_find_general() {
        let board = Board::initial();
        assert_eq!(
            board.find_general(Color::Red),
            Some(Position::new_unchecked(9, 4))
        );
        assert_eq!(
            board.find_general(Color::Black),
            Some(Position::new_unchecked(0, 4))
        );

        let empty = Board::empty();
        assert_eq!(empty.find_general(Color::Red), None);
    }
}
