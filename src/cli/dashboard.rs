use crossterm::event::KeyCode;
use rand::seq::SliceRandom;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::warn;

use crate::books::Books;
use crate::cli::expenses::status_choices;
use crate::cli::{today, FilterArgs};
use crate::error::Result;
use crate::fmt::compact;
use crate::models::Tables;
use crate::reports::{self, DashboardReport};
use crate::settings::{load_settings, Settings};
use crate::tui::{
    expense_span, run_view, sales_span, View, ViewAction, EXPENSE_STYLE, FOOTER_STYLE,
    HEADER_STYLE, MISSING_STYLE, SALES_STYLE, SELECTED_STYLE,
};

const GREETINGS: &[&str] = &[
    "Morning. Beans are ground.",
    "Let's see where the milk money went.",
    "Receipts in, numbers out.",
    "Another day behind the counter.",
    "Suppliers first, coffee second.",
    "Pull up a stool.",
    "Right then, the till awaits.",
    "Nothing a flat white can't fix.",
];

const TOP_COMPANIES: usize = 10;
const PAGE_SIZE: usize = 10;

enum Mode {
    Browse,
    Search(String),
}

/// Everything drawn from one load: the report plus the picker choices.
struct Snapshot {
    report: DashboardReport,
    companies: Vec<String>,
    statuses: Vec<String>,
}

fn snapshot(tables: &Tables, filters: &FilterArgs, settings: &Settings) -> Result<Snapshot> {
    let filter = filters.to_filter(tables, today())?;
    Ok(Snapshot {
        report: reports::build_report(tables, &filter, &settings.paid_status),
        companies: tables.companies.iter().map(|c| c.name.clone()).collect(),
        statuses: status_choices(tables, settings),
    })
}

/// Recorded sales across the periods in view, `None` when there are none.
fn sales_total(report: &DashboardReport) -> Option<Decimal> {
    reports::has_sales(&report.vs_sales)
        .then(|| report.vs_sales.iter().filter_map(|r| r.amount_sales).sum())
}

/// Bar height for an amount. Negative amounts draw as empty bars.
fn bar_value(amount: Decimal) -> u64 {
    amount.max(Decimal::ZERO).to_u64().unwrap_or(0)
}

/// Step through `None` then each choice in order, wrapping back to `None`.
fn cycle(current: &Option<String>, choices: &[String]) -> Option<String> {
    let next = match current {
        None => 0,
        Some(c) => match choices.iter().position(|x| x == c) {
            Some(i) => i + 1,
            None => 0,
        },
    };
    choices.get(next).cloned()
}

pub struct Dashboard {
    books: Books,
    settings: Settings,
    filters: FilterArgs,
    greeting: String,
    mode: Mode,
    data: Option<Snapshot>,
    selected: usize,
    table_state: TableState,
    status_message: Option<String>,
}

impl Dashboard {
    pub fn new(books: Books, settings: Settings, filters: FilterArgs) -> Self {
        let mut rng = rand::thread_rng();
        let greeting = GREETINGS.choose(&mut rng).unwrap_or(&"Hello.").to_string();
        Self {
            books,
            settings,
            filters,
            greeting,
            mode: Mode::Browse,
            data: None,
            selected: 0,
            table_state: TableState::default(),
            status_message: None,
        }
    }

    /// Rebuild the report. `force` drops the cache first. When the store
    /// cannot be read the last good load is used and the error is returned.
    pub fn refresh(&mut self, force: bool) -> Result<()> {
        let loaded = if force {
            self.books.reload()
        } else {
            self.books.tables()
        };
        let result = loaded.and_then(|tables| snapshot(tables, &self.filters, &self.settings));
        match result {
            Ok(snap) => {
                self.install(snap);
                Ok(())
            }
            Err(e) => {
                warn!(target: "till::dashboard", error = %e, "refresh failed");
                if let Some(tables) = self.books.last_snapshot() {
                    if let Ok(snap) = snapshot(tables, &self.filters, &self.settings) {
                        self.install(snap);
                    }
                }
                Err(e)
            }
        }
    }

    fn install(&mut self, snap: Snapshot) {
        let rows = snap.report.expenses.len();
        self.selected = self.selected.min(rows.saturating_sub(1));
        self.data = Some(snap);
    }

    fn refresh_with_message(&mut self, force: bool, ok_message: Option<&str>) {
        self.status_message = match self.refresh(force) {
            Ok(()) => ok_message.map(String::from),
            Err(e) => Some(format!("Could not load: {e}")),
        };
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map(|d| d.report.expenses.len()).unwrap_or(0)
    }

    fn move_selection(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, rows as isize - 1) as usize;
    }

    fn cycle_company(&mut self) {
        let choices = self.data.as_ref().map(|d| d.companies.clone()).unwrap_or_default();
        self.filters.company = cycle(&self.filters.company, &choices);
        self.selected = 0;
        self.refresh_with_message(false, None);
    }

    fn cycle_status(&mut self) {
        let choices = self.data.as_ref().map(|d| d.statuses.clone()).unwrap_or_default();
        self.filters.status = cycle(&self.filters.status, &choices);
        self.selected = 0;
        self.refresh_with_message(false, None);
    }

    /// The buffer is used as typed. Only an empty buffer clears the search.
    fn apply_search(&mut self, text: String) {
        self.filters.search = if text.is_empty() { None } else { Some(text) };
        self.selected = 0;
        self.refresh_with_message(false, None);
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> ViewAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(PAGE_SIZE as isize),
            KeyCode::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.row_count().saturating_sub(1),
            KeyCode::Char('/') => {
                let current = self.filters.search.clone().unwrap_or_default();
                self.mode = Mode::Search(current);
            }
            KeyCode::Char('c') => self.cycle_company(),
            KeyCode::Char('s') => self.cycle_status(),
            KeyCode::Char('r') => self.refresh_with_message(true, Some("Reloaded.")),
            _ => {}
        }
        ViewAction::Continue
    }

    fn handle_search_key(&mut self, code: KeyCode) -> ViewAction {
        let Mode::Search(buffer) = &mut self.mode else {
            return ViewAction::Continue;
        };
        match code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Enter => {
                let text = std::mem::take(buffer);
                self.mode = Mode::Browse;
                self.apply_search(text);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
        ViewAction::Continue
    }

    fn draw_kpis(&self, frame: &mut Frame, area: Rect, report: &DashboardReport) {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
        let t = &report.totals;
        let mut lines = vec![
            Line::from(vec![Span::raw(" Total spent    "), expense_span(Some(t.total_spent))]),
            Line::from(vec![Span::raw(" Unpaid         "), expense_span(Some(t.unpaid_total))]),
            Line::from(vec![Span::raw(" Sales          "), sales_span(sales_total(report))]),
            Line::from(format!(" Expenses       {}", t.count)),
            Line::from(format!(" Companies      {}", report.companies.len())),
        ];
        if t.missing_amounts > 0 {
            lines.push(Line::from(Span::styled(
                format!(" {} without a readable amount", t.missing_amounts),
                MISSING_STYLE,
            )));
        }
        frame.render_widget(Paragraph::new(lines), left);

        let f = &report.filter;
        let filter_lines = vec![
            Line::from(Span::styled(" Filters", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(format!(" Dates    {} to {}", f.range.start, f.range.end)),
            Line::from(format!(
                " Search   {}",
                if f.search.is_empty() { "(none)" } else { f.search.as_str() }
            )),
            Line::from(format!(" Company  {}", f.company.as_deref().unwrap_or("all"))),
            Line::from(format!(" Status   {}", f.status.as_deref().unwrap_or("all"))),
        ];
        frame.render_widget(Paragraph::new(filter_lines), right);
    }

    fn draw_chart(&self, frame: &mut Frame, area: Rect, report: &DashboardReport) {
        let title = if reports::has_sales(&report.vs_sales) {
            "Expenses vs Sales"
        } else {
            "Expenses vs Sales (no sales recorded)"
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::NONE);

        if report.vs_sales.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" Nothing in range.", FOOTER_STYLE)).block(block),
                area,
            );
            return;
        }

        let max_val = report
            .vs_sales
            .iter()
            .flat_map(|r| [r.amount_expenses, r.amount_sales.unwrap_or_default()])
            .max()
            .unwrap_or_default()
            .to_f64()
            .unwrap_or(0.0);
        let (top_tick, mid_tick) = y_axis_ticks(max_val);
        let top_label = compact(top_tick);
        let mid_label = compact(mid_tick);
        let y_label_width = top_label.len().max(mid_label.len()) as u16 + 1;

        let [y_axis_area, bar_area] =
            Layout::horizontal([Constraint::Length(y_label_width), Constraint::Fill(1)]).areas(area);

        let inner_height = bar_area.height.saturating_sub(2);
        let mid_row = inner_height / 2;
        let mut y_lines = vec![Line::from("")];
        for row in 0..inner_height {
            let label = if row == 0 {
                top_label.as_str()
            } else if row == mid_row {
                mid_label.as_str()
            } else {
                ""
            };
            y_lines.push(Line::from(Span::styled(
                format!("{:>width$}", label, width = y_label_width as usize),
                FOOTER_STYLE,
            )));
        }
        frame.render_widget(Paragraph::new(y_lines), y_axis_area);

        // Every group is at least as wide as a "YYYY-MM" label: two 4-wide
        // bars when sales exist (an empty one where a month has none),
        // otherwise a single 7-wide bar.
        let with_sales = reports::has_sales(&report.vs_sales);
        let bar_width = if with_sales { 4 } else { 7 };
        let groups: Vec<BarGroup> = report
            .vs_sales
            .iter()
            .map(|row| {
                let mut bars = vec![Bar::default()
                    .value(bar_value(row.amount_expenses))
                    .text_value(String::new())
                    .style(EXPENSE_STYLE)];
                if with_sales {
                    bars.push(
                        Bar::default()
                            .value(row.amount_sales.map(bar_value).unwrap_or(0))
                            .text_value(String::new())
                            .style(SALES_STYLE),
                    );
                }
                BarGroup::default().label(Line::from(row.period.clone())).bars(&bars)
            })
            .collect();

        let mut chart = BarChart::default()
            .block(block)
            .bar_width(bar_width)
            .bar_gap(0)
            .group_gap(1)
            .max(top_tick as u64);
        for group in &groups {
            chart = chart.data(group.clone());
        }
        frame.render_widget(chart, bar_area);
    }

    fn draw_companies(&self, frame: &mut Frame, area: Rect, report: &DashboardReport) {
        let mut lines = vec![Line::from(Span::styled(
            " Top Companies",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        let top: Vec<(String, Decimal)> = report
            .companies
            .iter()
            .take(TOP_COMPANIES)
            .map(|c| {
                let name = c.name.clone().unwrap_or_else(|| format!("#{}", c.company_id));
                (name, c.amount)
            })
            .collect();
        let name_width = top.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(10);
        for (name, amount) in &top {
            lines.push(Line::from(vec![
                Span::raw(format!(" {:<width$}  ", name, width = name_width)),
                expense_span(Some(*amount)),
            ]));
        }
        if top.is_empty() {
            lines.push(Line::from(Span::styled(" (none)", FOOTER_STYLE)));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        let Some(data) = &self.data else {
            return;
        };
        let report = &data.report;
        let rows: Vec<Row> = report
            .expenses
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(e.expense_date.map(|d| d.to_string()).unwrap_or_default()),
                    Cell::from(e.expense_number.clone()),
                    Cell::from(report.company_name(e.company_id).unwrap_or("").to_string()),
                    Cell::from(e.status.clone().unwrap_or_default()),
                    Cell::from(Line::from(expense_span(e.amount)).right_aligned()),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Fill(1),
            Constraint::Length(10),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["Date", "Number", "Company", "Status", "Amount"])
                    .style(HEADER_STYLE)
                    .bottom_margin(1),
            )
            .column_spacing(1)
            .row_highlight_style(SELECTED_STYLE);

        self.table_state.select(if report.expenses.is_empty() {
            None
        } else {
            Some(self.selected)
        });
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}

impl View for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep1, kpi_area, sep2, charts_area, sep3, table_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(6),
                Constraint::Length(1),
                Constraint::Length(12),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .areas(area);

        let header = if self.settings.cafe_name.is_empty() {
            format!(" Till: {}", self.greeting)
        } else {
            format!(" {}: {}", self.settings.cafe_name, self.greeting)
        };
        frame.render_widget(Paragraph::new(header).style(HEADER_STYLE), header_area);

        let sep_line = "\u{2501}".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(border_style);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget.clone(), sep2);
        frame.render_widget(sep_widget, sep3);

        if let Some(data) = &self.data {
            self.draw_kpis(frame, kpi_area, &data.report);
            let [chart_left, chart_right] =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(charts_area);
            self.draw_chart(frame, chart_left, &data.report);
            self.draw_companies(frame, chart_right, &data.report);
        }
        self.draw_table(frame, table_area);

        let hints = match (&self.mode, &self.status_message) {
            (Mode::Search(buffer), _) => Line::from(vec![
                Span::raw(" Search: "),
                Span::raw(format!("{buffer}\u{2588}")),
                Span::styled("   Enter apply  Esc cancel", FOOTER_STYLE),
            ]),
            (Mode::Browse, Some(msg)) => Line::from(Span::styled(format!(" {msg}"), FOOTER_STYLE)),
            (Mode::Browse, None) => Line::from(Span::styled(
                " / search  c company  s status  r reload  \u{2191}\u{2193} scroll  q quit",
                FOOTER_STYLE,
            )),
        };
        frame.render_widget(Paragraph::new(hints), hints_area);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        match self.mode {
            Mode::Browse => {
                self.status_message = None;
                self.handle_browse_key(code)
            }
            Mode::Search(_) => self.handle_search_key(code),
        }
    }
}

/// Round axis ticks for the given maximum: the first step at or above it,
/// and half of that.
fn y_axis_ticks(max_val: f64) -> (f64, f64) {
    let steps = [
        100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 25000.0, 50000.0, 100000.0,
        250000.0, 500000.0, 1000000.0, 2500000.0, 5000000.0, 10000000.0,
    ];
    let top = steps.iter().copied().find(|&s| s >= max_val).unwrap_or(max_val);
    (top, top / 2.0)
}

pub fn run(filters: FilterArgs) -> Result<()> {
    let settings = load_settings();
    let books = Books::open(&settings)?;
    let mut dashboard = Dashboard::new(books, settings, filters);
    dashboard.refresh(false)?;
    run_view(&mut dashboard)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use std::str::FromStr;

    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::db::{SqliteStore, Store};
    use crate::models::NewExpense;

    fn test_dashboard() -> (tempfile::TempDir, Dashboard) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db")).unwrap();
        store.init_schema().unwrap();
        let mut books = Books::new(Box::new(store), Duration::from_secs(300));
        books.add_company("Almarai").unwrap();
        books.add_company("Nadec").unwrap();
        let almarai = books.company_id("Almarai").unwrap();
        let nadec = books.company_id("Nadec").unwrap();
        let rows = [
            ("INV-1", "120", almarai, "paid", (2024, 1, 4)),
            ("INV-2", "80", nadec, "unpaid", (2024, 1, 20)),
            ("R-3", "45.5", almarai, "unpaid", (2024, 2, 2)),
        ];
        for (number, amount, company_id, status, (y, m, d)) in rows {
            books
                .add_expense(&NewExpense {
                    expense_number: number.to_string(),
                    amount: Some(dec(amount)),
                    amount_raw: Some(amount.to_string()),
                    company_id,
                    status: Some(status.to_string()),
                    date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                })
                .unwrap();
        }
        books.set_sale(1, 2024, Decimal::from(900)).unwrap();
        let mut dash = Dashboard::new(books, Settings::default(), FilterArgs::default());
        dash.refresh(false).unwrap();
        (dir, dash)
    }

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    /// Render into a 120x40 buffer and return the text of each row.
    fn screen_rows(dash: &mut Dashboard) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| dash.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(120)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn report(dash: &Dashboard) -> &DashboardReport {
        &dash.data.as_ref().unwrap().report
    }

    #[test]
    fn test_initial_load_covers_all_expenses() {
        let (_dir, dash) = test_dashboard();
        let r = report(&dash);
        assert_eq!(r.expenses.len(), 3);
        assert_eq!(r.totals.total_spent, dec("245.5"));
        assert_eq!(r.vs_sales[0].amount_sales, Some(Decimal::from(900)));
    }

    #[test]
    fn test_cycle_wraps_through_all() {
        let choices = vec!["a".to_string(), "b".to_string()];
        assert_eq!(cycle(&None, &choices), Some("a".into()));
        assert_eq!(cycle(&Some("a".into()), &choices), Some("b".into()));
        assert_eq!(cycle(&Some("b".into()), &choices), None);
        assert_eq!(cycle(&Some("gone".into()), &choices), Some("a".into()));
    }

    #[test]
    fn test_company_key_narrows_report() {
        let (_dir, mut dash) = test_dashboard();
        dash.handle_key(KeyCode::Char('c'));
        assert_eq!(dash.filters.company.as_deref(), Some("Almarai"));
        assert_eq!(report(&dash).expenses.len(), 2);
        dash.handle_key(KeyCode::Char('c'));
        dash.handle_key(KeyCode::Char('c'));
        assert!(dash.filters.company.is_none());
        assert_eq!(report(&dash).expenses.len(), 3);
    }

    #[test]
    fn test_status_key_narrows_report() {
        let (_dir, mut dash) = test_dashboard();
        dash.handle_key(KeyCode::Char('s'));
        assert_eq!(dash.filters.status.as_deref(), Some("unpaid"));
        assert_eq!(report(&dash).totals.total_spent, dec("125.5"));
    }

    #[test]
    fn test_search_mode_applies_on_enter() {
        let (_dir, mut dash) = test_dashboard();
        dash.handle_key(KeyCode::Char('/'));
        for c in "inv".chars() {
            dash.handle_key(KeyCode::Char(c));
        }
        assert_eq!(report(&dash).expenses.len(), 3);
        dash.handle_key(KeyCode::Enter);
        assert_eq!(dash.filters.search.as_deref(), Some("inv"));
        assert_eq!(report(&dash).expenses.len(), 2);
    }

    #[test]
    fn test_search_keeps_surrounding_spaces() {
        let (_dir, mut dash) = test_dashboard();
        dash.handle_key(KeyCode::Char('/'));
        for c in "inv-1 ".chars() {
            dash.handle_key(KeyCode::Char(c));
        }
        dash.handle_key(KeyCode::Enter);
        assert_eq!(dash.filters.search.as_deref(), Some("inv-1 "));
        assert!(report(&dash).expenses.is_empty());

        dash.handle_key(KeyCode::Char('/'));
        for _ in 0.."inv-1 ".len() {
            dash.handle_key(KeyCode::Backspace);
        }
        dash.handle_key(KeyCode::Enter);
        assert!(dash.filters.search.is_none());
        assert_eq!(report(&dash).expenses.len(), 3);
    }

    #[test]
    fn test_search_escape_keeps_previous_term() {
        let (_dir, mut dash) = test_dashboard();
        dash.handle_key(KeyCode::Char('/'));
        dash.handle_key(KeyCode::Char('x'));
        dash.handle_key(KeyCode::Esc);
        assert!(dash.filters.search.is_none());
        assert!(matches!(dash.handle_key(KeyCode::Char('q')), ViewAction::Close));
    }

    #[test]
    fn test_reload_sees_new_rows() {
        let (_dir, mut dash) = test_dashboard();
        dash.books.set_sale(2, 2024, Decimal::from(300)).unwrap();
        dash.handle_key(KeyCode::Char('r'));
        assert_eq!(dash.status_message.as_deref(), Some("Reloaded."));
        assert_eq!(report(&dash).vs_sales[1].amount_sales, Some(Decimal::from(300)));
    }

    #[test]
    fn test_selection_is_clamped() {
        let (_dir, mut dash) = test_dashboard();
        dash.handle_key(KeyCode::PageDown);
        assert_eq!(dash.selected, 2);
        dash.handle_key(KeyCode::Up);
        assert_eq!(dash.selected, 1);
        dash.handle_key(KeyCode::Home);
        assert_eq!(dash.selected, 0);
    }

    #[test]
    fn test_y_axis_ticks() {
        assert_eq!(y_axis_ticks(900.0), (1000.0, 500.0));
        assert_eq!(y_axis_ticks(0.0), (100.0, 50.0));
    }

    #[test]
    fn test_draw_renders_without_panic() {
        let (_dir, mut dash) = test_dashboard();
        let text = screen_rows(&mut dash).concat();
        assert!(text.contains("Top Companies"));
        assert!(text.contains("INV-1"));
    }

    #[test]
    fn test_chart_labels_carry_the_year() {
        let (_dir, mut dash) = test_dashboard();
        dash.books
            .add_expense(&NewExpense {
                expense_number: "INV-0".to_string(),
                amount: Some(Decimal::from(60)),
                amount_raw: Some("60".to_string()),
                company_id: None,
                status: Some("paid".to_string()),
                date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            })
            .unwrap();
        dash.refresh(false).unwrap();
        // Chart occupies rows 9..21 and the left 72 columns.
        let chart: String = screen_rows(&mut dash)[9..21]
            .iter()
            .map(|row| row.chars().take(72).collect::<String>())
            .collect();
        assert!(chart.contains("2023-01"));
        assert!(chart.contains("2024-01"));
        assert!(chart.contains("2024-02"));
    }
}
