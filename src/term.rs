use crate::{TermInt, Coords};
use crate::game::{InputEvent, InputSource, Renderer};
use crate::snake::Direction::*;
use crate::state::{GameState, OverReason, Status};
use std::{collections::VecDeque, io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read, poll};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const EMPTY_CHAR: char = ' ';

// Held keys auto-repeat faster than the game ticks; anything past this is dropped
const MAX_PENDING_INPUTS: usize = 3;

/// Crossterm-backed renderer and input source.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    // What is currently on screen, so a frame only rewrites changed cells
    screen: Vec<char>,
    borders_drawn: bool,
    pending: VecDeque<InputEvent>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("Failed to read the terminal size")?;
        let stdout = stdout();
        let screen = vec![EMPTY_CHAR; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, borders_drawn: false, pending: VecDeque::new() })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("Failed to enter the alternate screen")?;
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking).context("Failed to hide the cursor")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
            .context("Failed to leave the alternate screen")?;
        Ok(())
    }

    pub fn get_terminal_size(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    pub fn draw_borders(&mut self, size: Option<(TermInt, TermInt)>) -> Result<()> {
        let (width, height) = match size {
            Some((x, y)) => (x, y),
            None => (self.width, self.height)
        };

        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 {'+'} else {'-'};
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..height - 1 {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        self.flush()
    }

    /// Shows a boxed message centred on the given area.
    pub fn show_message(&mut self, area: (TermInt, TermInt), lines: &[&str]) -> Result<()> {
        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (area.0 / 2, area.1 / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: (TermInt, TermInt), ch: char) -> Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }

        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("Failed to clear the terminal")?;
        self.screen = vec![EMPTY_CHAR; self.width as usize * self.height as usize];
        self.borders_drawn = false;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("Failed to flush the terminal")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn screen_at(&self, pos: (TermInt, TermInt)) -> char {
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize]
    }

    // Like print_at, but skips cells that already show `ch`
    fn update_at(&mut self, pos: (TermInt, TermInt), ch: char) -> Result<()> {
        if pos.0 < self.width && pos.1 < self.height && self.screen_at(pos) != ch {
            self.print_at(pos, ch)?;
        }
        Ok(())
    }

    fn read_pending_events(&mut self) -> Result<()> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                if let Some(input) = map_key(&ev) {
                    queue_input(&mut self.pending, input);
                }
            }
        }
        Ok(())
    }
}

impl Renderer for TermManager {
    fn render(&mut self, state: &GameState) -> Result<()> {
        let size = (state.width() as TermInt, state.height() as TermInt);

        if !self.borders_drawn {
            self.draw_borders(Some(size))?;
            self.borders_drawn = true;
        }

        let mut frame = vec![EMPTY_CHAR; state.width() as usize * state.height() as usize];
        let index = |pos: Coords| state.width() as usize * pos.1 as usize + pos.0 as usize;

        frame[index(state.food())] = FOOD_CHAR;
        for pos in state.snake().body() {
            frame[index(*pos)] = SNAKE_BODY_CHAR;
        }
        frame[index(state.snake().head())] = head_char(state);

        for y in 1..size.1 - 1 {
            for x in 1..size.0 - 1 {
                self.update_at((x, y), frame[index((x as i32, y as i32))])?;
            }
        }

        self.flush()
    }

    fn render_game_over(&mut self, state: &GameState) -> Result<()> {
        let won = state.status() == Status::Over(OverReason::BoardFilled);

        if !won {
            for pos in state.snake().body() {
                self.print_at(to_term(*pos), DEAD_SNAKE_CHAR)?;
            }
        }

        let score = format!("Score: {}", state.score());
        let size = (state.width() as TermInt, state.height() as TermInt);
        self.show_message(size, &[banner_title(state.status()), &score])
    }
}

impl InputSource for TermManager {
    fn poll_input(&mut self) -> Result<Option<InputEvent>> {
        self.read_pending_events().context("Failed to read terminal events")?;
        Ok(self.pending.pop_front())
    }
}

/// Queues a game input. Quit jumps the queue and nothing is taken after it;
/// repeats of the last queued key are merged and the queue never grows past
/// `MAX_PENDING_INPUTS`, keeping the newest entries.
fn queue_input(pending: &mut VecDeque<InputEvent>, input: InputEvent) {
    if pending.front() == Some(&InputEvent::Quit) {
        return;
    }

    if input == InputEvent::Quit {
        pending.clear();
        pending.push_back(input);
        return;
    }

    if pending.back() == Some(&input) {
        return;
    }

    if pending.len() >= MAX_PENDING_INPUTS {
        pending.pop_front();
    }
    pending.push_back(input);
}

fn banner_title(status: Status) -> &'static str {
    match status {
        Status::Over(OverReason::BoardFilled) => "You won!",
        _ => "GAME OVER",
    }
}

/// Maps a key press to a game input. Releases and repeats don't count.
pub fn map_key(ev: &KeyEvent) -> Option<InputEvent> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }

    if is_ctrl_c(ev) {
        return Some(InputEvent::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(InputEvent::Up),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(InputEvent::Left),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(InputEvent::Down),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(InputEvent::Right),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputEvent::Quit),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

fn head_char(state: &GameState) -> char {
    match state.direction() {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn to_term(pos: Coords) -> (TermInt, TermInt) {
    (pos.0 as TermInt, pos.1 as TermInt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_steer() {
        assert_eq!(map_key(&press(KeyCode::Up)), Some(InputEvent::Up));
        assert_eq!(map_key(&press(KeyCode::Down)), Some(InputEvent::Down));
        assert_eq!(map_key(&press(KeyCode::Left)), Some(InputEvent::Left));
        assert_eq!(map_key(&press(KeyCode::Right)), Some(InputEvent::Right));

        assert_eq!(map_key(&press(KeyCode::Char('w'))), Some(InputEvent::Up));
        assert_eq!(map_key(&press(KeyCode::Char('a'))), Some(InputEvent::Left));
        assert_eq!(map_key(&press(KeyCode::Char('s'))), Some(InputEvent::Down));
        assert_eq!(map_key(&press(KeyCode::Char('D'))), Some(InputEvent::Right));
    }

    #[test]
    fn escape_q_and_ctrl_c_quit() {
        assert_eq!(map_key(&press(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Some(InputEvent::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(InputEvent::Quit));
    }

    #[test]
    fn other_keys_and_releases_are_ignored() {
        assert_eq!(map_key(&press(KeyCode::Char('x'))), None);
        assert_eq!(map_key(&press(KeyCode::Char('c'))), None);
        assert_eq!(map_key(&press(KeyCode::Enter)), None);

        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Up,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(&release), None);
    }

    #[test]
    fn held_key_does_not_build_a_backlog() {
        let mut pending = VecDeque::new();
        for _ in 0..90 {
            queue_input(&mut pending, InputEvent::Up);
        }
        assert_eq!(pending, vec![InputEvent::Up]);

        for input in [InputEvent::Left, InputEvent::Down, InputEvent::Right, InputEvent::Up, InputEvent::Left].iter() {
            queue_input(&mut pending, *input);
        }
        assert_eq!(pending.len(), MAX_PENDING_INPUTS);
        assert_eq!(pending, vec![InputEvent::Right, InputEvent::Up, InputEvent::Left]);
    }

    #[test]
    fn quit_comes_out_first() {
        let mut pending: VecDeque<InputEvent> = vec![InputEvent::Up, InputEvent::Left, InputEvent::Down].into();

        queue_input(&mut pending, InputEvent::Quit);
        queue_input(&mut pending, InputEvent::Right);
        queue_input(&mut pending, InputEvent::Up);

        assert_eq!(pending.pop_front(), Some(InputEvent::Quit));
        assert!(pending.is_empty());
    }

    #[test]
    fn filled_board_is_a_win() {
        assert_eq!(banner_title(Status::Over(OverReason::BoardFilled)), "You won!");
        assert_eq!(banner_title(Status::Over(OverReason::Wall)), "GAME OVER");
        assert_eq!(banner_title(Status::Over(OverReason::SelfCollision)), "GAME OVER");
        assert_eq!(banner_title(Status::Over(OverReason::Quit)), "GAME OVER");
    }
}
