use std::io::{self, Stdout, Write, stdout};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::game::{GameStatus, Grid, Snapshot};
use crate::snake::{Cell, Direction};

type Coords = (u16, u16);

const EMPTY_GLYPH: [char; 2] = [' ', ' '];
const BODY_GLYPH: [char; 2] = ['█', '█'];
const DEAD_GLYPH: [char; 2] = ['X', 'X'];
const FOOD_GLYPH: [char; 2] = ['(', ')'];

const INTRO: &[&str] = &[
    "Arrow keys or WASD to move",
    "R to restart, Q to quit",
    "",
    "Press Enter to begin",
];

/// Draws snapshots into the terminal. Keeps a copy of every character on
/// screen so unchanged cells are skipped and message boxes can be lifted
/// without redrawing the board.
pub struct TermManager<W = Stdout> {
    width: u16,
    height: u16,
    out: W,
    screen: Vec<char>,
    board: Option<Board>,
    current_msg: Option<Message>,
}

/// Where the grid lands on screen. Every cell takes two columns.
#[derive(Clone, Copy)]
struct Board {
    top_left: Coords,
    side: u16,
    cell_size: i32,
}

struct Message {
    top_left: Coords,
    width: u16,
    height: u16,
    lines: Vec<String>,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(TermManager::with_writer(width, height, stdout()))
    }
}

impl<W: Write> TermManager<W> {
    /// A `width` x `height` screen drawn into `out`.
    pub fn with_writer(width: u16, height: u16, out: W) -> Self {
        let screen = vec![' '; width as usize * height as usize];
        TermManager { width, height, out, screen, board: None, current_msg: None }
    }

    /// Whether a bordered board for `grid` fits, with a spare row above for
    /// the score.
    pub fn fits(&self, grid: &Grid) -> bool {
        let side = grid.cells_per_side();
        side <= i32::from(u16::MAX / 4)
            && i32::from(self.width) >= side * 2 + 2
            && i32::from(self.height) >= side + 3
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.out, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.out, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    /// Clears the screen and draws the frame for `grid`. The caller checks
    /// [`TermManager::fits`] first.
    pub fn layout(&mut self, grid: &Grid) -> io::Result<()> {
        self.clear()?;

        let side = grid.cells_per_side() as u16;
        let (outer_w, outer_h) = (side * 2 + 2, side + 2);
        let top_left = ((self.width - outer_w) / 2, ((self.height - outer_h) / 2).max(1));

        self.board = Some(Board { top_left, side, cell_size: grid.cell_size() });
        self.draw_borders(top_left, (outer_w, outer_h))?;
        self.flush()
    }

    pub fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let Some(board) = self.board else {
            return Ok(());
        };

        self.draw_board(board, snapshot)?;
        self.print_str_at((board.top_left.0, board.top_left.1 - 1), &format!("Score: {:<8}", snapshot.score))?;

        match snapshot.status {
            GameStatus::NotStarted => self.show_message(INTRO)?,
            GameStatus::Running => self.hide_message()?,
            GameStatus::Over => self.show_message(&[
                "Game over!",
                &format!("Score: {}", snapshot.score),
                "",
                "Press Enter to play again,",
                "or Q to quit.",
            ])?,
            GameStatus::Won => self.show_message(&[
                "You won!",
                &format!("Score: {}", snapshot.score),
                "",
                "Press Enter to play again,",
                "or Q to quit.",
            ])?,
        }

        self.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_board(&mut self, board: Board, snapshot: &Snapshot) -> io::Result<()> {
        let side = usize::from(board.side);
        let mut glyphs = vec![EMPTY_GLYPH; side * side];
        let index = |cell: &Cell| {
            let (col, row) = (cell.x / board.cell_size, cell.y / board.cell_size);
            row as usize * side + col as usize
        };

        if let Some(food) = snapshot.food {
            glyphs[index(&food)] = FOOD_GLYPH;
        }

        let dead = snapshot.status == GameStatus::Over;
        for (i, cell) in snapshot.body.iter().enumerate() {
            glyphs[index(cell)] = match (dead, i) {
                (true, _) => DEAD_GLYPH,
                (false, 0) => head_glyph(snapshot.direction),
                (false, _) => BODY_GLYPH,
            };
        }

        for (i, glyph) in glyphs.iter().enumerate() {
            let col = board.top_left.0 + 1 + (i % side) as u16 * 2;
            let row = board.top_left.1 + 1 + (i / side) as u16;
            self.print_at((col, row), glyph[0])?;
            self.print_at((col + 1, row), glyph[1])?;
        }

        Ok(())
    }

    fn draw_borders(&mut self, top_left: Coords, size: Coords) -> io::Result<()> {
        let (left, top) = top_left;
        let (end_x, end_y) = (left + size.0 - 1, top + size.1 - 1);

        for x in left..=end_x {
            let ch = if x == left || x == end_x { '+' } else { '-' };
            self.print_at((x, top), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in top + 1..end_y {
            self.print_at((left, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        let unchanged = self
            .current_msg
            .as_ref()
            .is_some_and(|msg| msg.lines.iter().map(String::as_str).eq(lines.iter().copied()));
        if unchanged {
            return Ok(());
        }
        self.hide_message()?;

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Blank top and bottom rows
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message {
            top_left,
            width: msg_width,
            height: msg_height,
            lines: lines.iter().map(|line| (*line).to_owned()).collect(),
        });
        Ok(())
    }

    fn hide_message(&mut self) -> io::Result<()> {
        let Some(msg) = self.current_msg.take() else {
            return Ok(());
        };

        // Put back whatever the box was covering
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(&ch) = self.offset((x, y)).and_then(|offset| self.screen.get(offset)) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        Ok(())
    }

    /// Records `ch` and draws it if it changed and is not under a message.
    fn print_at(&mut self, pos: Coords, ch: char) -> io::Result<()> {
        let Some(slot) = self.offset(pos).and_then(|offset| self.screen.get_mut(offset)) else {
            return Ok(());
        };
        if *slot == ch {
            return Ok(());
        }
        *slot = ch;

        if self.current_msg.as_ref().is_some_and(|msg| msg.covers(pos)) {
            return Ok(());
        }
        self.print_at_no_save(pos, ch)
    }

    fn print_str_at(&mut self, pos: Coords, text: &str) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as u16, pos.1), ch)?;
        }
        Ok(())
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> io::Result<()> {
        // For message boxes: the buffer keeps what lies underneath
        if self.offset(pos).is_none() {
            return Ok(());
        }
        queue!(self.out, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }

    fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, terminal::Clear(ClearType::All))?;
        self.screen = vec![' '; self.width as usize * self.height as usize];
        self.current_msg = None;
        Ok(())
    }

    /// Index into `screen`, or `None` off the edge. Text is clipped there
    /// rather than wrapped onto the next row.
    fn offset(&self, pos: Coords) -> Option<usize> {
        (pos.0 < self.width && pos.1 < self.height)
            .then(|| self.width as usize * pos.1 as usize + pos.0 as usize)
    }
}

impl Message {
    fn covers(&self, pos: Coords) -> bool {
        (self.top_left.0..self.top_left.0 + self.width).contains(&pos.0)
            && (self.top_left.1..self.top_left.1 + self.height).contains(&pos.1)
    }
}

fn head_glyph(direction: Direction) -> [char; 2] {
    match direction {
        Direction::Up => ['^', '^'],
        Direction::Down => ['v', 'v'],
        Direction::Left => ['<', '<'],
        Direction::Right => ['>', '>'],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn screen(width: u16, height: u16) -> TermManager<Vec<u8>> {
        TermManager::with_writer(width, height, Vec::new())
    }

    fn row(term: &TermManager<Vec<u8>>, y: u16) -> String {
        let start = term.width as usize * y as usize;
        term.screen[start..start + term.width as usize].iter().collect()
    }

    fn two_by_two() -> Grid {
        Grid::new(40, 20).unwrap()
    }

    #[test]
    fn fits_needs_two_columns_per_cell_and_three_spare_rows() {
        let grid = Grid::new(400, 20).unwrap();

        assert!(screen(42, 23).fits(&grid));
        assert!(screen(200, 60).fits(&grid));
        assert!(!screen(41, 23).fits(&grid));
        assert!(!screen(42, 22).fits(&grid));
    }

    #[test]
    fn cells_are_two_columns_wide() {
        let mut term = screen(20, 8);
        let game = Game::from_parts(
            two_by_two(),
            vec![Cell::new(20, 0), Cell::new(0, 0)],
            Direction::Right,
            Cell::new(0, 20),
            3,
        )
        .unwrap();

        term.layout(&game.grid()).unwrap();
        term.render(&game.snapshot()).unwrap();

        // Board is 6x4 with its corner at (7, 2), score on the row above.
        assert_eq!(&row(&term, 1)[7..], "Score: 3     ");
        assert_eq!(&row(&term, 2)[7..13], "+----+");
        assert_eq!(row(&term, 3).chars().skip(7).take(6).collect::<String>(), "|██>>|");
        assert_eq!(&row(&term, 4)[7..13], "|()  |");
        assert_eq!(&row(&term, 5)[7..13], "+----+");
    }

    #[test]
    fn crashed_snake_is_drawn_dead() {
        let mut term = screen(20, 8);
        let mut game = Game::from_parts(two_by_two(), vec![Cell::ORIGIN], Direction::Left, Cell::new(20, 20), 0).unwrap();
        game.tick();
        assert_eq!(game.status(), GameStatus::Over);

        term.layout(&game.grid()).unwrap();
        term.render(&game.snapshot()).unwrap();

        // The game-over box sits on top, the buffer still holds the board.
        assert!(term.current_msg.is_some());
        assert_eq!(&row(&term, 3)[7..13], "|XX  |");
        assert_eq!(&row(&term, 4)[7..13], "|  ()|");
    }

    #[test]
    fn score_is_clipped_at_the_right_edge() {
        let mut term = screen(6, 5);
        let game = Game::from_parts(two_by_two(), vec![Cell::ORIGIN], Direction::Right, Cell::new(20, 20), 0).unwrap();
        assert!(term.fits(&game.grid()));

        term.layout(&game.grid()).unwrap();
        term.render(&game.snapshot()).unwrap();

        assert_eq!(row(&term, 0), "Score:");
        assert_eq!(row(&term, 1), "+----+");
        assert_eq!(row(&term, 2), "|>>  |");
    }

    #[test]
    fn restore_after_a_half_finished_setup() {
        // Alternate screen entered, raw mode never reached.
        let mut term = screen(20, 8);
        execute!(term.out, EnterAlternateScreen).unwrap();
        term.out.clear();

        term.restore().unwrap();
        let written = String::from_utf8(term.out).unwrap();
        assert!(written.contains("\x1b[?25h"));
        assert!(written.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn unchanged_frame_writes_nothing() {
        let mut term = screen(20, 8);
        let game = Game::from_parts(two_by_two(), vec![Cell::ORIGIN], Direction::Down, Cell::new(20, 20), 0).unwrap();

        term.layout(&game.grid()).unwrap();
        term.render(&game.snapshot()).unwrap();
        assert!(!term.out.is_empty());

        term.out.clear();
        term.render(&game.snapshot()).unwrap();
        assert!(term.out.is_empty());
    }

    #[test]
    fn message_box_bounds() {
        let msg = Message { top_left: (10, 5), width: 4, height: 3, lines: vec![] };
        assert!(msg.covers((10, 5)));
        assert!(msg.covers((13, 7)));
        assert!(!msg.covers((14, 7)));
        assert!(!msg.covers((10, 8)));
        assert!(!msg.covers((9, 5)));
    }

    #[test]
    fn head_points_where_the_snake_goes() {
        assert_eq!(head_glyph(Direction::Right), ['>', '>']);
        assert_eq!(head_glyph(Direction::Up), ['^', '^']);
    }
}
