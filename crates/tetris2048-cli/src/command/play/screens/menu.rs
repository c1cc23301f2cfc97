use std::cell::Cell;

use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use log::error;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    text::Line,
};
use tetris2048_engine::Difficulty;
use tetris2048_runtime::{RenderMode, Runtime, Screen, ScreenTransition};

use super::{PlayScreen, ScreenContext};
use crate::view::widgets::{ButtonDisplay, KeyBinding, KeyBindingDisplay, style};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Up,
    Down,
    Choose,
    Back,
    Quit,
}

impl Action {
    fn from_key_event(event: &KeyEvent) -> Option<Self> {
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Self::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Self::Down),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Self::Choose),
            KeyCode::Esc => Some(Self::Back),
            KeyCode::Char('q') => Some(Self::Quit),
            _ => None,
        }
    }

    fn bindings() -> &'static [KeyBinding<'static>] {
        &[
            (&["↑", "↓"], "Select"),
            (&["Enter", "Click"], "Choose"),
            (&["Esc"], "Back"),
            (&["q"], "Quit"),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::IsVariant)]
enum Phase {
    Title,
    Difficulty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    Start,
    Quit,
    Difficulty(Difficulty),
}

impl Phase {
    fn choices(self) -> &'static [(&'static str, Choice)] {
        match self {
            Phase::Title => &[("Start", Choice::Start), ("Quit", Choice::Quit)],
            Phase::Difficulty => &[
                ("Easy", Choice::Difficulty(Difficulty::Easy)),
                ("Medium", Choice::Difficulty(Difficulty::Medium)),
                ("Hard", Choice::Difficulty(Difficulty::Hard)),
            ],
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Phase::Title => "Merge tiles to reach 2048",
            Phase::Difficulty => "Choose a speed",
        }
    }
}

/// Title menu followed by difficulty selection, driven by keys or mouse.
#[derive(Debug)]
pub(crate) struct MenuScreen {
    context: ScreenContext,
    phase: Phase,
    selected: usize,
    /// Frame area of the last draw, for mouse hit-testing.
    last_area: Cell<Rect>,
}

struct MenuLayout {
    title: Rect,
    heading: Rect,
    buttons: Vec<Rect>,
    help: Rect,
}

impl MenuLayout {
    fn new(area: Rect, buttons: usize) -> Self {
        let [main_area, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let button_rows = (0..buttons).map(|_| Constraint::Length(ButtonDisplay::height()));
        let rows = Layout::vertical(
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .into_iter()
            .chain(button_rows),
        )
        .flex(Flex::Center)
        .split(main_area);
        let horizontal =
            Layout::horizontal([Constraint::Length(ButtonDisplay::width())]).flex(Flex::Center);
        let column = |area: Rect| area.layout::<1>(&horizontal)[0];
        Self {
            title: rows[0],
            heading: rows[2],
            buttons: rows[4..].iter().copied().map(column).collect(),
            help,
        }
    }
}

impl MenuScreen {
    pub(crate) fn new(context: ScreenContext) -> Self {
        Self {
            context,
            phase: Phase::Title,
            selected: 0,
            last_area: Cell::new(Rect::ZERO),
        }
    }

    /// Opens directly on difficulty selection.
    pub(crate) fn difficulty(context: ScreenContext) -> Self {
        let mut screen = Self::new(context);
        screen.enter_phase(Phase::Difficulty);
        screen
    }

    fn enter_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.selected = match phase {
            Phase::Title => 0,
            Phase::Difficulty => Difficulty::ALL
                .iter()
                .position(|&d| d == Difficulty::default())
                .unwrap_or(0),
        };
    }

    fn move_selection(&mut self, action: Action) {
        let len = self.phase.choices().len();
        self.selected = match action {
            Action::Up => (self.selected + len - 1) % len,
            Action::Down => (self.selected + 1) % len,
            _ => self.selected,
        };
    }

    fn button_at(&self, column: u16, row: u16) -> Option<usize> {
        let layout = MenuLayout::new(self.last_area.get(), self.phase.choices().len());
        layout
            .buttons
            .iter()
            .position(|button| button.contains(Position::new(column, row)))
    }

    fn choose(&mut self, index: usize) -> ScreenTransition {
        let Some(&(_, choice)) = self.phase.choices().get(index) else {
            return ScreenTransition::Stay;
        };
        match choice {
            Choice::Start => {
                self.enter_phase(Phase::Difficulty);
                ScreenTransition::Stay
            }
            Choice::Quit => ScreenTransition::Exit,
            Choice::Difficulty(difficulty) => {
                match PlayScreen::new(self.context.clone(), difficulty) {
                    Ok(screen) => ScreenTransition::Replace(Box::new(screen)),
                    Err(e) => {
                        error!("failed to start a session: {e}");
                        ScreenTransition::Exit
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> ScreenTransition {
        let Some(action) = Action::from_key_event(event) else {
            return ScreenTransition::Stay;
        };
        match action {
            Action::Up | Action::Down => self.move_selection(action),
            Action::Choose => return self.choose(self.selected),
            Action::Back if self.phase.is_difficulty() => self.enter_phase(Phase::Title),
            Action::Back | Action::Quit => return ScreenTransition::Exit,
        }
        ScreenTransition::Stay
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> ScreenTransition {
        let Some(index) = self.button_at(event.column, event.row) else {
            return ScreenTransition::Stay;
        };
        match event.kind {
            MouseEventKind::Moved => self.selected = index,
            MouseEventKind::Down(MouseButton::Left) => return self.choose(index),
            _ => {}
        }
        ScreenTransition::Stay
    }
}

impl Screen for MenuScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(None);
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        match event {
            Event::Key(_) => match event.as_key_press_event() {
                Some(key) => self.handle_key(&key),
                None => ScreenTransition::Stay,
            },
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => ScreenTransition::Stay,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area.set(area);
        let choices = self.phase.choices();
        let layout = MenuLayout::new(area, choices.len());

        frame.render_widget(
            Line::styled("T E T R I S   2 0 4 8", style::TITLE).centered(),
            layout.title,
        );
        frame.render_widget(
            Line::styled(self.phase.heading(), style::HINT).centered(),
            layout.heading,
        );
        for (i, (&(label, _), &button)) in choices.iter().zip(&layout.buttons).enumerate() {
            frame.render_widget(
                ButtonDisplay::new(label).selected(i == self.selected),
                button,
            );
        }
        frame.render_widget(KeyBindingDisplay::new(Action::bindings()), layout.help);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::KeyModifiers;
    use tetris2048_engine::SessionConfig;

    use super::*;

    fn menu() -> MenuScreen {
        let context = ScreenContext::new(SessionConfig::default(), Rc::new(RefCell::new(vec![])));
        MenuScreen::new(context)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_start_opens_difficulty_selection() {
        let mut menu = menu();
        assert!(menu.phase.is_title());
        let transition = menu.handle_key(&key(KeyCode::Enter));
        assert!(matches!(transition, ScreenTransition::Stay));
        assert!(menu.phase.is_difficulty());
        assert_eq!(menu.phase.choices()[menu.selected].0, "Medium");
    }

    #[test]
    fn test_selection_wraps() {
        let mut menu = MenuScreen::difficulty(menu().context);
        menu.handle_key(&key(KeyCode::Down));
        assert_eq!(menu.selected, 2);
        menu.handle_key(&key(KeyCode::Down));
        assert_eq!(menu.selected, 0);
        menu.handle_key(&key(KeyCode::Up));
        assert_eq!(menu.selected, 2);
    }

    #[test]
    fn test_choosing_difficulty_starts_play() {
        let mut menu = MenuScreen::difficulty(menu().context);
        let transition = menu.handle_key(&key(KeyCode::Enter));
        assert!(matches!(transition, ScreenTransition::Replace(_)));
    }

    #[test]
    fn test_back_and_quit() {
        let mut menu = MenuScreen::difficulty(menu().context);
        assert!(matches!(
            menu.handle_key(&key(KeyCode::Esc)),
            ScreenTransition::Stay
        ));
        assert!(menu.phase.is_title());
        assert!(matches!(
            menu.handle_key(&key(KeyCode::Esc)),
            ScreenTransition::Exit
        ));

        let mut menu = self::menu();
        menu.handle_key(&key(KeyCode::Down));
        assert!(matches!(
            menu.handle_key(&key(KeyCode::Enter)),
            ScreenTransition::Exit
        ));
    }

    #[test]
    fn test_mouse_hover_and_click() {
        let mut menu = MenuScreen::difficulty(menu().context);
        let area = Rect::new(0, 0, 80, 24);
        menu.last_area.set(area);
        let layout = MenuLayout::new(area, 3);
        let hard = layout.buttons[2];

        let transition =
            menu.handle_mouse(&mouse(MouseEventKind::Moved, hard.x + 1, hard.y + 1));
        assert!(matches!(transition, ScreenTransition::Stay));
        assert_eq!(menu.selected, 2);

        let transition = menu.handle_mouse(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            hard.x + 1,
            hard.y + 1,
        ));
        match transition {
            ScreenTransition::Replace(screen) => {
                assert!(format!("{screen:?}").contains("Hard"));
            }
            other => panic!("unexpected transition {other:?}"),
        }
    }

    #[test]
    fn test_click_outside_buttons_is_ignored() {
        let mut menu = menu();
        menu.last_area.set(Rect::new(0, 0, 80, 24));
        let transition = menu.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0));
        assert!(matches!(transition, ScreenTransition::Stay));
        assert!(menu.phase.is_title());
    }

    #[test]
    fn test_buttons_do_not_overlap() {
        let layout = MenuLayout::new(Rect::new(0, 0, 80, 24), 3);
        for pair in layout.buttons.windows(2) {
            assert!(!pair[0].intersects(pair[1]));
            assert_eq!(pair[0].width, ButtonDisplay::width());
        }
        assert!(layout.title.y < layout.heading.y);
        assert!(layout.heading.y < layout.buttons[0].y);
    }
}
