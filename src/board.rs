//! NoGo board representation and move legality.
//!
//! NoGo is played with Go stones on a Go board, but a move is illegal if it
//! would capture anything, including the mover's own stones (suicide). The
//! first player left without a legal move loses.
//!
//! The board is a 1D array with padding, see [`crate::constants`] for the
//! layout. Row 1 is the bottom edge, as in GTP coordinates.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{BLACK, BORDER, EMPTY, MAX_BOARD_CELLS, MAX_SIZE, MIN_SIZE, WHITE};

/// A point on the board, represented as an index into the 1D board array.
pub type Point = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The stone this color places on the board.
    #[inline]
    pub fn stone(self) -> Stone {
        match self {
            Color::Black => Stone::Black,
            Color::White => Stone::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color: {0}")]
pub struct ParseColorError(String);

/// State of a single cell.
///
/// The discriminants are the values folded into pattern codes, so they must
/// not change without retraining the weight table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Stone {
    Empty = EMPTY,
    Black = BLACK,
    White = WHITE,
    Border = BORDER,
}

impl Stone {
    /// Numeric code of this cell state (0..4).
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Reason a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: point is off the board")]
    OffBoard,
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("illegal move: capture")]
    Capture,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unacceptable board size {0}")]
pub struct InvalidSize(pub usize);

/// A NoGo position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Row stride (size + 1).
    ns: usize,
    cells: Vec<Stone>,
    current: Color,
}

impl Board {
    /// Create an empty board with Black to play.
    pub fn new(size: usize) -> Result<Self, InvalidSize> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(InvalidSize(size));
        }
        let ns = size + 1;
        let mut cells = vec![Stone::Border; ns * (size + 2) + 1];
        for row in 1..=size {
            for col in 1..=size {
                cells[row * ns + col] = Stone::Empty;
            }
        }
        Ok(Self {
            size,
            ns,
            cells,
            current: Color::Black,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The color whose turn it is.
    #[inline]
    pub fn current_player(&self) -> Color {
        self.current
    }

    /// Point index for a 1-based (row, col) pair.
    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point {
        debug_assert!((1..=self.size).contains(&row) && (1..=self.size).contains(&col));
        row * self.ns + col
    }

    #[inline]
    pub fn get(&self, pt: Point) -> Stone {
        self.cells.get(pt).copied().unwrap_or(Stone::Border)
    }

    #[inline]
    pub fn is_on_board(&self, pt: Point) -> bool {
        self.get(pt) != Stone::Border
    }

    /// All empty points in ascending index order.
    pub fn empty_points(&self) -> impl Iterator<Item = Point> + '_ {
        (1..=self.size)
            .flat_map(move |row| (1..=self.size).map(move |col| row * self.ns + col))
            .filter(|&pt| self.cells[pt] == Stone::Empty)
    }

    /// Check a move without playing it.
    pub fn check_move(&self, pt: Point, color: Color) -> Result<(), MoveError> {
        match self.get(pt) {
            Stone::Border => return Err(MoveError::OffBoard),
            Stone::Black | Stone::White => return Err(MoveError::Occupied),
            Stone::Empty => {}
        }

        let own = color.stone();
        let opp = color.opponent().stone();
        let mut breathes = false;
        for n in self.neighbors(pt) {
            match self.cells[n] {
                Stone::Empty => breathes = true,
                s if s == opp => {
                    if !self.has_liberty_besides(n, pt) {
                        return Err(MoveError::Capture);
                    }
                }
                s if s == own => {
                    if !breathes && self.has_liberty_besides(n, pt) {
                        breathes = true;
                    }
                }
                _ => {}
            }
        }

        if breathes {
            Ok(())
        } else {
            Err(MoveError::Suicide)
        }
    }

    #[inline]
    pub fn is_legal(&self, pt: Point, color: Color) -> bool {
        self.check_move(pt, color).is_ok()
    }

    /// All legal moves for `color`, in ascending point order.
    pub fn legal_moves(&self, color: Color) -> Vec<Point> {
        self.empty_points()
            .filter(|&pt| self.is_legal(pt, color))
            .collect()
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.empty_points().any(|pt| self.is_legal(pt, color))
    }

    /// Place a stone for `color` and hand the turn to the opponent.
    pub fn play_move(&mut self, pt: Point, color: Color) -> Result<(), MoveError> {
        self.check_move(pt, color)?;
        self.cells[pt] = color.stone();
        self.current = color.opponent();
        Ok(())
    }

    /// The 8 cells around `pt`, in pattern order:
    ///
    /// ```text
    /// 0 1 2
    /// 3 . 4
    /// 5 6 7
    /// ```
    ///
    /// with the top row being `row + 1`. Weight tables are trained against
    /// this exact order.
    pub fn neighbors8(&self, pt: Point) -> [Stone; 8] {
        let ns = self.ns;
        [
            self.cells[pt + ns - 1],
            self.cells[pt + ns],
            self.cells[pt + ns + 1],
            self.cells[pt - 1],
            self.cells[pt + 1],
            self.cells[pt - ns - 1],
            self.cells[pt - ns],
            self.cells[pt - ns + 1],
        ]
    }

    /// Get the 4 orthogonal neighbors (up, right, down, left) of a point.
    #[inline]
    fn neighbors(&self, pt: Point) -> [Point; 4] {
        [pt + self.ns, pt + 1, pt - self.ns, pt - 1]
    }

    /// Whether the block containing `start` has a liberty other than `besides`.
    fn has_liberty_besides(&self, start: Point, besides: Point) -> bool {
        let color = self.cells[start];
        // Points are marked when pushed, so each enters the stack at most once.
        let mut visited = [false; MAX_BOARD_CELLS];
        let mut stack = [0 as Point; MAX_BOARD_CELLS];
        let mut len = 1;
        stack[0] = start;
        visited[start] = true;

        while len > 0 {
            len -= 1;
            let pt = stack[len];
            for n in self.neighbors(pt) {
                match self.cells[n] {
                    Stone::Empty if n != besides => return true,
                    c if c == color && !visited[n] => {
                        visited[n] = true;
                        stack[len] = n;
                        len += 1;
                    }
                    _ => {}
                }
            }
        }
        false
    }

    /// Parse a GTP vertex (e.g. "c4") into a point on this board.
    ///
    /// Columns use letters from A, skipping I. Returns `None` for anything
    /// that is not an on-board vertex, including "pass".
    pub fn parse_point(&self, s: &str) -> Option<Point> {
        let s = s.trim().to_ascii_lowercase();
        let mut chars = s.chars();
        let letter = chars.next().filter(|c| c.is_ascii_lowercase() && *c != 'i')?;
        let mut col = (letter as u8 - b'a' + 1) as usize;
        if letter > 'i' {
            col -= 1;
        }
        let row: usize = chars.as_str().parse().ok()?;
        if (1..=self.size).contains(&row) && (1..=self.size).contains(&col) {
            Some(self.point(row, col))
        } else {
            None
        }
    }

    /// Convert a point to a GTP vertex (e.g. "C4").
    pub fn format_point(&self, pt: Point) -> String {
        let row = pt / self.ns;
        let col = pt % self.ns;
        let mut c = b'A' + col as u8 - 1;
        if c >= b'I' {
            c += 1;
        }
        format!("{}{row}", c as char)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.size).rev() {
            write!(f, "{row:2} ")?;
            for col in 1..=self.size {
                let ch = match self.cells[self.point(row, col)] {
                    Stone::Black => 'X',
                    Stone::White => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 1..=self.size {
            let pt = self.point(1, col);
            let letter = self.format_point(pt);
            write!(f, "{} ", &letter[..1])?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: usize) -> Board {
        Board::new(size).unwrap()
    }

    #[test]
    fn test_empty_board() {
        let b = board(5);
        assert_eq!(b.empty_points().count(), 25);
        assert_eq!(b.legal_moves(Color::Black).len(), 25);
        assert_eq!(b.current_player(), Color::Black);
    }

    #[test]
    fn test_invalid_size() {
        assert_eq!(Board::new(1), Err(InvalidSize(1)));
        assert_eq!(Board::new(MAX_SIZE + 1), Err(InvalidSize(MAX_SIZE + 1)));
    }

    #[test]
    fn test_play_move_switches_player() {
        let mut b = board(5);
        let pt = b.parse_point("C3").unwrap();
        b.play_move(pt, Color::Black).unwrap();
        assert_eq!(b.get(pt), Stone::Black);
        assert_eq!(b.current_player(), Color::White);
        assert_eq!(b.play_move(pt, Color::White), Err(MoveError::Occupied));
    }

    #[test]
    fn test_suicide_in_corner() {
        let mut b = board(3);
        b.play_move(b.parse_point("A2").unwrap(), Color::White).unwrap();
        b.play_move(b.parse_point("B1").unwrap(), Color::White).unwrap();
        let a1 = b.parse_point("A1").unwrap();
        assert_eq!(b.check_move(a1, Color::Black), Err(MoveError::Suicide));
        // White connects out through A2 and B1.
        assert!(b.is_legal(a1, Color::White));
    }

    #[test]
    fn test_capture_is_illegal() {
        let mut b = board(3);
        b.play_move(b.parse_point("A1").unwrap(), Color::White).unwrap();
        b.play_move(b.parse_point("A2").unwrap(), Color::Black).unwrap();
        let b1 = b.parse_point("B1").unwrap();
        assert_eq!(b.check_move(b1, Color::Black), Err(MoveError::Capture));
    }

    #[test]
    fn test_long_block_on_largest_board() {
        let mut b = board(MAX_SIZE);
        for col in 1..=MAX_SIZE {
            b.play_move(b.point(1, col), Color::Black).unwrap();
        }
        for col in 1..MAX_SIZE {
            b.play_move(b.point(2, col), Color::White).unwrap();
        }
        // The whole bottom row has a single liberty left, in the far corner.
        let last = b.point(2, MAX_SIZE);
        assert_eq!(b.check_move(last, Color::White), Err(MoveError::Capture));
        assert!(b.is_legal(last, Color::Black));
    }

    #[test]
    fn test_off_board() {
        let b = board(3);
        assert_eq!(b.check_move(0, Color::Black), Err(MoveError::OffBoard));
        assert_eq!(b.check_move(10_000, Color::Black), Err(MoveError::OffBoard));
    }

    #[test]
    fn test_neighbors8_order() {
        let mut b = board(3);
        // Centre of the board, with a white stone directly above it.
        b.play_move(b.parse_point("B3").unwrap(), Color::White).unwrap();
        let n = b.neighbors8(b.parse_point("B2").unwrap());
        assert_eq!(n[1], Stone::White);
        assert!(n.iter().enumerate().all(|(i, s)| i == 1 || *s == Stone::Empty));

        // Bottom-left corner sees the border on the left and below.
        let n = b.neighbors8(b.parse_point("A1").unwrap());
        assert_eq!(
            n,
            [
                Stone::Border,
                Stone::Empty,
                Stone::Empty,
                Stone::Border,
                Stone::Empty,
                Stone::Border,
                Stone::Border,
                Stone::Border,
            ]
        );
    }

    #[test]
    fn test_parse_format_roundtrip() {
        let b = board(9);
        for pt in b.empty_points() {
            let s = b.format_point(pt);
            assert_eq!(b.parse_point(&s), Some(pt), "roundtrip failed for {s}");
        }
        assert_eq!(b.format_point(b.point(1, 9)), "J1");
        assert_eq!(b.parse_point("I5"), None);
        assert_eq!(b.parse_point("pass"), None);
        assert_eq!(b.parse_point("A10"), None);
    }

    #[test]
    fn test_color_parse() {
        assert_eq!("B".parse::<Color>(), Ok(Color::Black));
        assert_eq!("white".parse::<Color>(), Ok(Color::White));
        assert!("red".parse::<Color>().is_err());
    }
}
