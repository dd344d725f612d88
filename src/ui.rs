use crate::matcher::{ComparisonSummary, DifferenceType, MatchFilter, MatchResult};
use crate::report::{format_value, status_marker, MatchReport};
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
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Results,
    Summary,
    Views,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Results => Page::Summary,
            Page::Summary => Page::Views,
            Page::Views => Page::Results,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Results => Page::Views,
            Page::Summary => Page::Results,
            Page::Views => Page::Summary,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Results => "Results",
            Page::Summary => "Summary",
            Page::Views => "Views",
        }
    }
}

pub struct App {
    pub report: MatchReport,
    pub filtered_results: Vec<MatchResult>,
    pub state: TableState,
    pub current_page: Page,
    pub active_filter: MatchFilter,
    pub show_detail: bool,
}

impl App {
    pub fn new(report: MatchReport) -> Self {
        let mut state = TableState::default();
        if !report.results.is_empty() {
            state.select(Some(0));
        }

        let filtered_results = report.results.clone();

        Self {
            report,
            filtered_results,
            state,
            current_page: Page::Results,
            active_filter: MatchFilter::All,
            show_detail: false,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_result(&self) -> Option<&MatchResult> {
        self.state.selected().and_then(|i| self.filtered_results.get(i))
    }

    pub fn apply_filter(&mut self, filter: MatchFilter) {
        self.active_filter = filter;
        self.filtered_results = self
            .report
            .results
            .iter()
            .filter(|r| filter.matches(r.status))
            .cloned()
            .collect();

        // Reset selection to first item
        if !self.filtered_results.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(MatchFilter::All);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn summary(&self) -> ComparisonSummary {
        self.report.summary.clone()
    }

    pub fn next(&mut self) {
        let len = self.filtered_results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered_results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered_results.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                let next = i + 20;
                if next >= len {
                    len - 1
                } else {
                    next
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => {
                if i < 20 {
                    0
                } else {
                    i - 20
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
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
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Char('c') => {
                    app.clear_filter();
                    app.current_page = Page::Results;
                }
                KeyCode::Char('1') if app.current_page == Page::Views => {
                    app.apply_filter(MatchFilter::All);
                    app.current_page = Page::Results;
                }
                KeyCode::Char('2') if app.current_page == Page::Views => {
                    app.apply_filter(MatchFilter::Matched);
                    app.current_page = Page::Results;
                }
                KeyCode::Char('3') if app.current_page == Page::Views => {
                    app.apply_filter(MatchFilter::SystemOnly);
                    app.current_page = Page::Results;
                }
                KeyCode::Char('4') if app.current_page == Page::Views => {
                    app.apply_filter(MatchFilter::WalletOnly);
                    app.current_page = Page::Results;
                }
                KeyCode::Char('5') if app.current_page == Page::Views => {
                    app.apply_filter(MatchFilter::FrequencyMismatch);
                    app.current_page = Page::Results;
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => {
                    if !app.filtered_results.is_empty() {
                        app.state.select(Some(app.filtered_results.len() - 1));
                    }
                }
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

    // Header with page navigation
    render_header(f, chunks[0], app);

    // Content area with optional split for detail panel
    if app.show_detail && app.current_page == Page::Results {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Result list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Results => render_table(f, chunks[1], app),
            Page::Summary => render_summary(f, chunks[1], app),
            Page::Views => render_views(f, chunks[1], app),
        }
    }

    // Status bar
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.summary();

    // Page tabs
    let pages = [Page::Results, Page::Summary, Page::Views];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
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

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("System: {}", summary.total_system),
        Style::default().fg(Color::Blue),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Wallet: {}", summary.total_wallet),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("✓ {}", summary.matched_count),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("≠ {}", summary.differences_count),
        Style::default().fg(Color::Red),
    ));

    let header_text = vec![Line::from(tab_spans)];

    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn status_color(status: DifferenceType) -> Color {
    match status {
        DifferenceType::Matched => Color::Green,
        DifferenceType::SystemOnly => Color::Blue,
        DifferenceType::WalletOnly => Color::Yellow,
        DifferenceType::FrequencyMismatch => Color::Red,
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Value", "Status", "System", "Wallet", "Description"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered_results.iter().map(|r| {
        let color = status_color(r.status);

        let cells = vec![
            Cell::from(format_value(r.value)),
            Cell::from(format!("{} {}", status_marker(r.status), r.status.label()))
                .style(Style::default().fg(color)),
            Cell::from(format!("{}", r.system_count)),
            Cell::from(format!("{}", r.wallet_count)),
            Cell::from(r.description.clone()),
        ];

        Row::new(cells).height(1)
    });

    let title = format!(
        " Results ({}) - sorted largest → smallest ",
        app.active_filter.label()
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(22),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(30),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.summary();
    let report = &app.report;

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Reconciliation Summary",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Total system entries:  ", Style::default().fg(Color::Blue)),
            Span::styled(
                format!("{}", summary.total_system),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   ({} tokens ignored)", report.system_parse.rejected),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Total wallet entries:  ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("{}", summary.total_wallet),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   ({} tokens ignored)", report.wallet_parse.rejected),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Exact matches:         ", Style::default().fg(Color::Green)),
            Span::styled(
                format!("{}", summary.matched_count),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Differences:           ", Style::default().fg(Color::Red)),
            Span::styled(
                format!("{}", summary.differences_count),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  System only:           ", Style::default().fg(Color::Blue)),
            Span::raw(format!("{}", report.count_for(MatchFilter::SystemOnly))),
        ]),
        Line::from(vec![
            Span::styled("  Wallet only:           ", Style::default().fg(Color::Yellow)),
            Span::raw(format!("{}", report.count_for(MatchFilter::WalletOnly))),
        ]),
        Line::from(vec![
            Span::styled("  Frequency mismatches:  ", Style::default().fg(Color::Red)),
            Span::raw(format!("{}", report.count_for(MatchFilter::FrequencyMismatch))),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Generated at:          ", Style::default().fg(Color::Cyan)),
            Span::styled(
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_views(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Quick Views & Filters",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];

    for (i, filter) in MatchFilter::ALL_FILTERS.iter().enumerate() {
        let count = app.report.count_for(*filter);
        let marker = if app.active_filter == *filter {
            Span::styled("→", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(" ")
        };

        content.push(Line::from(vec![
            Span::raw("  "),
            marker,
            Span::raw(" "),
            Span::styled(format!("{}", i + 1), Style::default().fg(Color::Yellow)),
            Span::raw(format!(". {:<22}", filter.label())),
            Span::styled(
                format!("{:>5} rows", count),
                Style::default().fg(Color::White),
            ),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Hint: ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
        Span::styled(
            "Press 1-5 to filter, c to clear",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Views - Quick Access Filters "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered_results.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    // Show filter status if active
    if app.active_filter != MatchFilter::All {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", app.active_filter.label()),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_text = vec![Line::from(status_spans)];

    let status_bar = Paragraph::new(status_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let r = match app.selected_result() {
        Some(r) => r,
        None => {
            let no_selection = Paragraph::new("No result selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Result Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let color = status_color(r.status);

    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Value: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(
                format_value(r.value),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Status: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(r.status.label(), Style::default().fg(color)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  System count: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}", r.system_count)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Wallet count: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{}", r.wallet_count)),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                r.description.clone(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Result Details "),
    );

    f.render_widget(detail_panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::reconcile;
    use crate::parser::ParseStats;

    fn sample_app() -> App {
        let results = reconcile(&[5.0, 5.0, 3.0, 8.0], &[5.0, 3.0, 3.0, 1.0]);
        App::new(MatchReport::new(results, ParseStats::default(), ParseStats::default()))
    }

    #[test]
    fn test_app_starts_unfiltered() {
        let app = sample_app();
        assert_eq!(app.active_filter, MatchFilter::All);
        assert_eq!(app.filtered_results.len(), app.report.results.len());
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_apply_filter_resets_selection() {
        let mut app = sample_app();
        app.next();
        app.apply_filter(MatchFilter::WalletOnly);

        assert_eq!(app.filtered_results.len(), 1);
        assert_eq!(app.filtered_results[0].value, 1.0);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_apply_empty_filter_clears_selection() {
        let mut app = sample_app();
        app.apply_filter(MatchFilter::Matched);
        // 5 and 3 mismatch, 8 is system-only, 1 is wallet-only
        assert!(app.filtered_results.is_empty());
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = sample_app();
        let len = app.filtered_results.len();

        app.previous();
        assert_eq!(app.state.selected(), Some(len - 1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_page_cycle() {
        let mut app = sample_app();
        assert_eq!(app.current_page, Page::Results);
        app.next_page();
        assert_eq!(app.current_page, Page::Summary);
        app.next_page();
        assert_eq!(app.current_page, Page::Views);
        app.next_page();
        assert_eq!(app.current_page, Page::Results);
        app.previous_page();
        assert_eq!(app.current_page, Page::Views);
    }
}
