use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use spendsense_panels::panels::{GoalStatus, PanelState, TransactionList, TransactionModal};
use spendsense_panels::{DashboardSnapshot, DashboardView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Goals,
    Milestones,
    Forecast,
    Merchants,
    Transactions,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Goals,
        Page::Milestones,
        Page::Forecast,
        Page::Merchants,
        Page::Transactions,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Goals => Page::Milestones,
            Page::Milestones => Page::Forecast,
            Page::Forecast => Page::Merchants,
            Page::Merchants => Page::Transactions,
            Page::Transactions => Page::Goals,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Goals => Page::Transactions,
            Page::Milestones => Page::Goals,
            Page::Forecast => Page::Milestones,
            Page::Merchants => Page::Forecast,
            Page::Transactions => Page::Merchants,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Goals => "Goals",
            Page::Milestones => "Milestones",
            Page::Forecast => "Forecast",
            Page::Merchants => "Merchants",
            Page::Transactions => "Transactions",
        }
    }
}

pub struct App {
    pub snapshot: DashboardSnapshot,
    pub view: DashboardView,
    pub currency: String,
    pub current_page: Page,
    pub merchants_state: TableState,
    pub transactions_state: TableState,
    pub modal: Option<TransactionModal>,
    pub modal_state: TableState,
}

impl App {
    pub fn new(snapshot: DashboardSnapshot, currency: &str) -> Self {
        let view = DashboardView::derive(&snapshot);

        let mut merchants_state = TableState::default();
        if view.merchants.is_ready() {
            merchants_state.select(Some(0));
        }

        let mut transactions_state = TableState::default();
        if !view.transactions.rows().is_empty() {
            transactions_state.select(Some(0));
        }

        Self {
            snapshot,
            view,
            currency: currency.to_string(),
            current_page: Page::Goals,
            merchants_state,
            transactions_state,
            modal: None,
            modal_state: TableState::default(),
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn modal_open(&self) -> bool {
        self.modal.as_ref().is_some_and(TransactionModal::is_open)
    }

    fn selected_merchant(&self) -> Option<&str> {
        let breakdown = self.view.merchants.ready()?;
        let index = self.merchants_state.selected()?;
        breakdown.shares.get(index).map(|share| share.merchant.as_str())
    }

    /// Open the transaction modal for the highlighted merchant
    pub fn open_merchant_modal(&mut self) {
        let Some(merchant) = self.selected_merchant().map(str::to_string) else {
            return;
        };

        let list = self.snapshot.transaction_list(Some(&merchant));
        self.modal_state = TableState::default();
        if !list.rows().is_empty() {
            self.modal_state.select(Some(0));
        }

        tracing::debug!(merchant = %merchant, rows = list.rows().len(), "Opened merchant transactions");
        self.modal = Some(TransactionModal::new(list, move || {
            tracing::debug!(merchant = %merchant, "Closed merchant transactions");
        }));
    }

    pub fn close_modal(&mut self) {
        if let Some(mut modal) = self.modal.take() {
            modal.dismiss();
        }
    }

    fn active_table(&mut self) -> Option<(&mut TableState, usize)> {
        if self.modal_open() {
            let len = self.modal.as_ref().map_or(0, |m| m.list.rows().len());
            return Some((&mut self.modal_state, len));
        }
        match self.current_page {
            Page::Merchants => {
                let len = self.view.merchants.ready().map_or(0, |b| b.shares.len());
                Some((&mut self.merchants_state, len))
            }
            Page::Transactions => {
                let len = self.view.transactions.rows().len();
                Some((&mut self.transactions_state, len))
            }
            _ => None,
        }
    }

    pub fn next(&mut self) {
        if let Some((state, len)) = self.active_table() {
            if len == 0 {
                return;
            }
            let i = match state.selected() {
                Some(i) if i + 1 < len => i + 1,
                _ => 0,
            };
            state.select(Some(i));
        }
    }

    pub fn previous(&mut self) {
        if let Some((state, len)) = self.active_table() {
            if len == 0 {
                return;
            }
            let i = match state.selected() {
                Some(0) | None => len - 1,
                Some(i) => i - 1,
            };
            state.select(Some(i));
        }
    }

    fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if app.modal_open() {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_modal(),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter if app.current_page == Page::Merchants => app.open_merchant_modal(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Goals => render_goals(f, chunks[1], app),
        Page::Milestones => render_milestones(f, chunks[1], app),
        Page::Forecast => render_forecast(f, chunks[1], app),
        Page::Merchants => render_merchants(f, chunks[1], app),
        Page::Transactions => render_transactions(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    if app.modal_open() {
        render_modal(f, app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("As of {}", app.view.as_of),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", title))
}

/// Text for every state except `Ready`
fn state_notice<T>(state: &PanelState<T>) -> Option<String> {
    match state {
        PanelState::Loading => Some("Loading...".to_string()),
        PanelState::Message(message) => Some(message.clone()),
        PanelState::Empty => Some("Not enough data yet".to_string()),
        PanelState::Ready(_) => None,
    }
}

fn render_notice(f: &mut Frame, area: Rect, title: &str, notice: String) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", notice),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(panel_block(title));

    f.render_widget(paragraph, area);
}

fn header_row(titles: &[&str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(h.to_string()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

// ============================================================================
// PAGES
// ============================================================================

fn render_goals(f: &mut Frame, area: Rect, app: &App) {
    let rows = match &app.view.goals {
        PanelState::Ready(rows) => rows,
        other => {
            if let Some(notice) = state_notice(other) {
                render_notice(f, area, "Goal Progress", notice);
            }
            return;
        }
    };

    let mut constraints: Vec<Constraint> = rows.iter().map(|_| Constraint::Length(4)).collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, chunk) in rows.iter().zip(chunks.iter()) {
        let color = match row.status {
            GoalStatus::OnTrack => Color::Green,
            GoalStatus::NeedsAttention => Color::Yellow,
        };

        let gauge = Gauge::default()
            .block(panel_block(&row.goal_name))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent(row.display_progress.clamp(0.0, 100.0).round() as u16)
            .label(format!(
                "{:.1}% · {} of {} · {}",
                row.display_progress,
                app.money(row.current_amount),
                app.money(row.target_amount),
                row.status.label()
            ));

        f.render_widget(gauge, *chunk);
    }

    let mut lines = vec![Line::from(Span::styled(
        format!("  {}", app.view.goal_summary),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(rows.iter().filter_map(|row| row.impact_message.as_ref()).map(|message| {
        Line::from(Span::styled(format!("  • {}", message), Style::default().fg(Color::DarkGray)))
    }));
    lines.extend(app.view.goal_tips.iter().map(|tip| {
        Line::from(Span::styled(format!("  💡 {}", tip), Style::default().fg(Color::Yellow)))
    }));

    if let Some(last) = chunks.last() {
        f.render_widget(Paragraph::new(lines).block(panel_block("Coaching")), *last);
    }
}

fn render_milestones(f: &mut Frame, area: Rect, app: &App) {
    let milestones = &app.view.milestones;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3 * milestones.badges.len() as u16),
            Constraint::Min(0),
        ])
        .split(area);

    let badge_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); milestones.badges.len()])
        .split(chunks[0]);

    for (badge, chunk) in milestones.badges.iter().zip(badge_chunks.iter()) {
        let (marker, color) = if badge.achieved {
            ("🏆", Color::Green)
        } else {
            ("…", Color::DarkGray)
        };

        let gauge = Gauge::default()
            .block(panel_block(&format!("{} {}", marker, badge.title)))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .percent(u16::from(badge.progress.min(100)))
            .label(badge.description.clone());

        f.render_widget(gauge, *chunk);
    }

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Wants spent this month: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                "{} of {}",
                app.money(app.snapshot.wants_current),
                app.money(app.snapshot.wants_target)
            )),
        ]),
    ];

    match &app.view.cashflow {
        Some(cashflow) => {
            lines.push(Line::from(vec![
                Span::styled("  Balance: ", Style::default().fg(Color::Cyan)),
                Span::raw(app.money(cashflow.current_balance)),
                Span::raw("   avg in "),
                Span::styled(app.money(cashflow.average_monthly_income), Style::default().fg(Color::Green)),
                Span::raw(" / out "),
                Span::styled(app.money(cashflow.average_monthly_expenses), Style::default().fg(Color::Red)),
            ]));
            for month in &cashflow.projections {
                lines.push(Line::from(format!(
                    "    {} → {} (net {})",
                    month.month,
                    app.money(month.projected_balance),
                    app.money(month.net_flow)
                )));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "  No recent activity to project cashflow",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    f.render_widget(Paragraph::new(lines).block(panel_block("Cashflow")), chunks[1]);
}

fn render_forecast(f: &mut Frame, area: Rect, app: &App) {
    let rows = match &app.view.forecast {
        PanelState::Ready(rows) => rows,
        other => {
            if let Some(notice) = state_notice(other) {
                render_notice(f, area, "Spending Forecast", notice);
            }
            return;
        }
    };

    let table_rows = rows.iter().map(|row| {
        let (arrow, color) = if row.rising {
            ("▲", Color::Red)
        } else {
            ("▼", Color::Green)
        };

        Row::new(vec![
            Cell::from(truncate(&row.category_name, 24)),
            Cell::from(app.money(row.predicted_amount)),
            Cell::from(app.money(row.last_amount)),
            Cell::from(format!("{} {}%", arrow, row.change_display)).style(Style::default().fg(color)),
            Cell::from(format!("{}%", row.confidence_display)),
            Cell::from(row.method.label()),
        ])
        .height(1)
    });

    let table = Table::new(
        table_rows,
        [
            Constraint::Length(26),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header_row(&["Category", "Next month", "Last month", "Change", "Confidence", "Method"]))
    .block(panel_block("Spending Forecast"));

    f.render_widget(table, area);
}

fn render_merchants(f: &mut Frame, area: Rect, app: &mut App) {
    let breakdown = match &app.view.merchants {
        PanelState::Ready(breakdown) => breakdown.clone(),
        other => {
            if let Some(notice) = state_notice(other) {
                render_notice(f, area, "Top Merchants", notice);
            }
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let labels: Vec<String> = breakdown.shares.iter().map(|s| truncate(&s.merchant, 8)).collect();
    let bars: Vec<(&str, u64)> = labels
        .iter()
        .zip(breakdown.shares.iter())
        .map(|(label, share)| (label.as_str(), share.percentage.round() as u64))
        .collect();

    let chart = BarChart::default()
        .block(panel_block("Share of spend (%)"))
        .data(bars.as_slice())
        .bar_width(8)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(chart, chunks[0]);

    let rows = breakdown.shares.iter().map(|share| {
        Row::new(vec![
            Cell::from(format!("#{}", share.rank)),
            Cell::from(truncate(&share.merchant, 24)),
            Cell::from(app.money(share.total_spending)),
            Cell::from(format!("{:.1}%", share.percentage)),
            Cell::from(share.transaction_count.to_string()),
            Cell::from(
                share
                    .average_ticket
                    .map(|avg| app.money(avg))
                    .unwrap_or_else(|| "—".to_string()),
            ),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(26),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(14),
        ],
    )
    .header(header_row(&["#", "Merchant", "Spend", "Share", "Txns", "Avg ticket"]))
    .block(panel_block(&format!("Top Merchants · {}", app.money(breakdown.subtotal))))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[1], &mut app.merchants_state);
}

fn transaction_table<'a>(list: &'a TransactionList, currency: &str) -> Table<'a> {
    let rows = list.rows().iter().map(|row| {
        let color = if row.is_debit { Color::Red } else { Color::Green };
        Row::new(vec![
            Cell::from(row.date.to_string()),
            Cell::from(truncate(&row.merchant, 24)),
            Cell::from(truncate(&row.description, 30)),
            Cell::from(format!("{}{:.2}", currency, row.amount)).style(Style::default().fg(color)),
            Cell::from(row.category.clone().unwrap_or_default()),
        ])
        .height(1)
    });

    let title = match &list.subtitle {
        Some(subtitle) => format!("{} · {} · {}{:.2}", list.title, subtitle, currency, list.total()),
        None => format!("{} · {}{:.2}", list.title, currency, list.total()),
    };

    Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(26),
            Constraint::Length(32),
            Constraint::Length(14),
            Constraint::Length(16),
        ],
    )
    .header(header_row(&["Date", "Merchant", "Description", "Amount", "Category"]))
    .block(panel_block(&title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ")
}

fn render_transactions(f: &mut Frame, area: Rect, app: &mut App) {
    let list = &app.view.transactions;
    if let Some(notice) = state_notice(&list.state) {
        render_notice(f, area, &list.title, notice);
        return;
    }

    let table = transaction_table(list, &app.currency);
    f.render_stateful_widget(table, area, &mut app.transactions_state);
}

fn render_modal(f: &mut Frame, app: &mut App) {
    let Some(modal) = app.modal.as_ref() else {
        return;
    };

    let area = centered_rect(80, 70, f.size());
    f.render_widget(Clear, area);

    if let Some(notice) = state_notice(&modal.list.state) {
        render_notice(f, area, &modal.list.title, notice);
        return;
    }

    let table = transaction_table(&modal.list, &app.currency);
    f.render_stateful_widget(table, area, &mut app.modal_state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.current_page.title()),
        Style::default().fg(Color::Cyan),
    )];

    status_spans.push(Span::raw(" | "));
    if app.modal_open() {
        status_spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Close | "));
    } else {
        if app.current_page == Page::Merchants {
            status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Transactions | "));
        }
        status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Page | "));
    }
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use spendsense_panels::panels::{MerchantAggregate, TransactionRecord};

    fn snapshot() -> DashboardSnapshot {
        let as_of = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let record = |merchant: &str, amount: f64| TransactionRecord {
            merchant_name_raw: Some(merchant.to_string()),
            amount,
            txn_date: Some(as_of),
            ..Default::default()
        };

        DashboardSnapshot {
            as_of,
            transactions_title: "Recent Transactions".to_string(),
            transactions_subtitle: None,
            transactions: vec![record("Swiggy", -400.0), record("Swiggy", -100.0), record("Uber", -250.0)],
            goals: vec![],
            goals_message: Some("No active goals found".to_string()),
            goal_tips: vec![],
            income_expense: vec![],
            cashflow: None,
            forecasts: vec![],
            merchants: vec![
                MerchantAggregate {
                    merchant: "Swiggy".to_string(),
                    total_spending: 500.0,
                    transaction_count: 2,
                },
                MerchantAggregate {
                    merchant: "Uber".to_string(),
                    total_spending: 250.0,
                    transaction_count: 1,
                },
            ],
            merchant_transactions: Default::default(),
            merchant_metrics: vec![],
            wants_target: 25_000.0,
            wants_current: 0.0,
        }
    }

    #[test]
    fn test_page_cycle() {
        let mut page = Page::Goals;
        for _ in 0..Page::ALL.len() {
            page = page.next();
        }
        assert_eq!(page, Page::Goals);
        assert_eq!(Page::Goals.previous(), Page::Transactions);
    }

    #[test]
    fn test_merchant_modal_open_and_close() {
        let mut app = App::new(snapshot(), "₹");
        app.current_page = Page::Merchants;

        app.next();
        app.open_merchant_modal();
        assert!(app.modal_open());
        assert_eq!(app.modal.as_ref().unwrap().list.title, "Uber");
        assert_eq!(app.modal.as_ref().unwrap().list.rows().len(), 1);

        app.close_modal();
        assert!(!app.modal_open());
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_merchant_modal_prefers_full_merchant_list() {
        let mut snapshot = snapshot();
        let older = TransactionRecord {
            merchant_name_raw: Some("Uber".to_string()),
            amount: -180.0,
            ..Default::default()
        };
        snapshot.merchants[1].transaction_count = 3;
        snapshot
            .merchant_transactions
            .insert("Uber".to_string(), vec![older.clone(), older.clone(), older]);

        let mut app = App::new(snapshot, "₹");
        app.current_page = Page::Merchants;
        app.next();
        app.open_merchant_modal();

        assert_eq!(app.modal.as_ref().unwrap().list.rows().len(), 3);
    }

    #[test]
    fn test_every_page_renders() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = App::new(snapshot(), "₹");

        for _ in 0..Page::ALL.len() {
            terminal.draw(|f| ui(f, &mut app)).unwrap();
            app.next_page();
        }

        app.current_page = Page::Merchants;
        app.open_merchant_modal();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Café Coffee Day", 8), "Café ...");
    }
}
