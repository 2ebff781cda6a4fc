use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::{DefaultTerminal, Frame};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::fmt::money;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const EXPENSE_STYLE: Style = Style::new().fg(Color::Red);
pub const SALES_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const MISSING_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub fn expense_span(amount: Option<Decimal>) -> Span<'static> {
    match amount {
        Some(a) => Span::styled(money(a), EXPENSE_STYLE),
        None => Span::styled("missing", MISSING_STYLE),
    }
}

pub fn sales_span(amount: Option<Decimal>) -> Span<'static> {
    match amount {
        Some(a) => Span::styled(money(a), SALES_STYLE),
        None => Span::styled("\u{2014}", MISSING_STYLE),
    }
}

pub enum ViewAction {
    Continue,
    Close,
}

pub trait View {
    fn draw(&mut self, frame: &mut Frame);
    fn handle_key(&mut self, code: KeyCode) -> ViewAction;
}

/// Put the terminal in raw alternate-screen mode, feed key presses to `view`
/// until it closes or Ctrl-C is pressed, then put the terminal back. A panic
/// hook restores the terminal before the panic message is printed.
pub fn run_view(view: &mut dyn View) -> Result<()> {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        previous(info);
    }));

    let mut terminal = ratatui::init();
    let result = drive(&mut terminal, view);
    ratatui::restore();
    result
}

fn drive(terminal: &mut DefaultTerminal, view: &mut dyn View) -> Result<()> {
    loop {
        terminal.draw(|frame| view.draw(frame))?;
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if is_interrupt(&key) {
            return Ok(());
        }
        if let ViewAction::Close = view.handle_key(key.code) {
            return Ok(());
        }
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_c_interrupts_but_plain_c_does_not() {
        assert!(is_interrupt(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_interrupt(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_interrupt(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_missing_amounts_render_as_placeholders() {
        assert_eq!(expense_span(None).content, "missing");
        assert_eq!(sales_span(None).content, "\u{2014}");
        assert_eq!(expense_span(Some(Decimal::from(1250))).content, "1,250.00");
    }
}
