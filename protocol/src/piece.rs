//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_COLS, BOARD_ROWS};

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceType {
    /// 将/帅
    General,
    /// 士/仕
    Advisor,
    /// 象/相
    Elephant,
    /// 马/傌
    Horse,
    /// 车/俥
    Chariot,
    /// 炮/砲
    Cannon,
    /// 兵/卒
    Soldier,
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// 红方（先手，在下方，行号大的一侧）
    Red,
    /// 黑方（后手，在上方，行号小的一侧）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// 前进方向的行增量：红方向行号减小的方向走，黑方相反
    pub fn forward(&self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// 棋子
///
/// 位置由所在的棋盘格决定，棋子本身不保存坐标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    /// 获取棋子显示的汉字
    pub fn display_char(&self) -> char {
        match (self.piece_type, self.color) {
            (PieceType::General, Color::Red) => '帥',
            (PieceType::General, Color::Black) => '將',
            (PieceType::Advisor, Color::Red) => '仕',
            (PieceType::Advisor, Color::Black) => '士',
            (PieceType::Elephant, Color::Red) => '相',
            (PieceType::Elephant, Color::Black) => '象',
            (PieceType::Horse, Color::Red) => '傌',
            (PieceType::Horse, Color::Black) => '馬',
            (PieceType::Chariot, Color::Red) => '俥',
            (PieceType::Chariot, Color::Black) => '車',
            (PieceType::Cannon, Color::Red) => '炮',
            (PieceType::Cannon, Color::Black) => '砲',
            (PieceType::Soldier, Color::Red) => '兵',
            (PieceType::Soldier, Color::Black) => '卒',
        }
    }
}

/// 棋盘位置
///
/// row: 0-9，从黑方底线向红方底线递增；col: 0-8，从左到右。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-9)
    pub row: u8,
    /// 列 (0-8)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_ROWS && (col as usize) < BOARD_COLS {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_ROWS && (self.col as usize) < BOARD_COLS
    }

    /// 检查位置是否在指定阵营的九宫格内
    pub fn is_in_palace(&self, color: Color) -> bool {
        let in_col = (3..=5).contains(&self.col);
        let in_row = match color {
            Color::Red => (7..=9).contains(&self.row),
            Color::Black => (0..=2).contains(&self.row),
        };
        in_col && in_row
    }

    /// 检查指定阵营的棋子在此位置是否已过河
    pub fn has_crossed_river(&self, color: Color) -> bool {
        match color {
            Color::Red => self.row <= 4,
            Color::Black => self.row >= 5,
        }
    }

    /// 检查位置是否仍在本方半场（象不能过河）
    pub fn is_own_side(&self, color: Color) -> bool {
        match color {
            Color::Red => self.row >= 5,
            Color::Black => self.row <= 4,
        }
    }

    /// 获取偏移后的位置
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let new_row = self.row as i8 + dr;
        let new_col = self.col as i8 + dc;
        if new_row >= 0
            && (new_row as usize) < BOARD_ROWS
            && new_col >= 0
            && (new_col as usize) < BOARD_COLS
        {
            Some(Position {
                row: new_row as u8,
                col: new_col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_COLS + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_ROWS * BOARD_COLS {
            Some(Position {
                row: (index / BOARD_COLS) as u8,
                col: (index % BOARD_COLS) as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_display_char() {
        let red_general = Piece::new(PieceType::General, Color::Red);
        assert_eq!(red_general.display_char(), '帥');

        let black_general = Piece::new(PieceType::General, Color::Black);
        assert_eq!(black_general.display_char(), '將');

        let red_soldier = Piece::new(PieceType::Soldier, Color::Red);
        assert_eq!(red_soldier.display_char(), '兵');

        let black_soldier = Piece::new(PieceType::Soldier, Color::Black);
        assert_eq!(black_soldier.display_char(), '卒');
    }

    #[test]
    fn test_position_valid() {
        assert!(Position::new(0, 0).is_some());
        assert!(Position::new(9, 8).is_some());
        assert!(Position::new(10, 0).is_none());
        assert!(Position::new(0, 9).is_none());
    }

    #[test]
    fn test_position_palace() {
        // 红方九宫格在下方
        assert!(Position::new_unchecked(9, 4).is_in_palace(Color::Red));
        assert!(Position::new_unchecked(7, 3).is_in_palace(Color::Red));
        assert!(!Position::new_unchecked(6, 4).is_in_palace(Color::Red));
        assert!(!Position::new_unchecked(9, 2).is_in_palace(Color::Red));

        // 黑方九宫格在上方
        assert!(Position::new_unchecked(0, 4).is_in_palace(Color::Black));
        assert!(Position::new_unchecked(2, 5).is_in_palace(Color::Black));
        assert!(!Position::new_unchecked(3, 4).is_in_palace(Color::Black));
    }

    #[test]
    fn test_crossed_river() {
        // 红兵初始在第 6 行，未过河；到第 4 行算过河
        assert!(!Position::new_unchecked(6, 0).has_crossed_river(Color::Red));
        assert!(Position::new_unchecked(4, 0).has_crossed_river(Color::Red));

        assert!(!Position::new_unchecked(3, 0).has_crossed_river(Color::Black));
        assert!(Position::new_unchecked(5, 0).has_crossed_river(Color::Black));
    }

    #[test]
    fn test_offset_bounds() {
        let pos = Position::new_unchecked(0, 0);
        assert!(pos.offset(-1, 0).is_none());
        assert!(pos.offset(0, -1).is_none());
        assert_eq!(pos.offset(1, 1), Some(Position::new_unchecked(1, 1)));
    }

    #[test]
    fn test_color_opponent() {
        assert_eq!(Color::Red.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::Red);
    }
}
