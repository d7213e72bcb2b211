use super::app::{App, CopyFeedback, LienForm, Status, View};
use crate::ledger::format::{format_currency, format_date, format_number, format_percent};
use crate::ledger::CoverageBand;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_main(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if let Some(form) = app.lien_form.as_ref() {
        let area = f.area();
        draw_lien_form(f, form, area);
    }
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let num = format!("[{}] ", i + 1);
            let style = if *v == app.current_view {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(num, Style::default().fg(Color::DarkGray)),
                Span::styled(v.title(), style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Credit Collateral Analyzer  [←/→ or Tab to switch tabs] "),
        )
        .highlight_style(Style::default().fg(Color::Yellow))
        .select(View::all().iter().position(|v| *v == app.current_view).unwrap_or(0));

    f.render_widget(tabs, area);
}

fn draw_main(f: &mut Frame, app: &mut App, area: Rect) {
    if app.current_view == View::Summary {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        draw_summary(f, app, chunks[0]);
        draw_report(f, app, chunks[1]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    match app.current_view {
        View::Property => draw_property(f, app, chunks[0]),
        View::Liens => draw_liens(f, app, chunks[0]),
        View::Summary => {}
    }
    draw_summary(f, app, chunks[1]);
}

fn field_line<'a>(label: &'a str, value: String, hint: &'a str, is_selected: bool) -> (Line<'a>, Color) {
    let (label_style, input_style, border_color) = if is_selected {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            Color::Yellow,
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Gray),
            Color::DarkGray,
        )
    };

    let cursor = if is_selected { "█" } else { "" };
    let display_value = if value.is_empty() && !is_selected {
        format!("({})", hint)
    } else {
        format!("{}{}", value, cursor)
    };

    let indicator = if is_selected { "▶ " } else { "  " };
    let line = Line::from(vec![
        Span::styled(indicator, label_style),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(display_value, input_style),
    ]);
    (line, border_color)
}

fn draw_fields(f: &mut Frame, fields: &[(&str, String, &str)], selected: usize, chunks: &[Rect]) {
    for (i, (label, value, hint)) in fields.iter().enumerate() {
        let (text, border_color) = field_line(label, value.clone(), hint, selected == i);
        let paragraph = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(border_color)),
        );
        f.render_widget(paragraph, chunks[i]);
    }
}

fn draw_property(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Registration
            Constraint::Length(3), // Appraisal
            Constraint::Length(3), // New risk
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let title = format!(
        " Property Information (Field {}/3) ",
        app.property_form.selected_field + 1
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);
    f.render_widget(block, area);

    let ledger = &app.ledger;
    let fields = [
        ("Title Registration", ledger.registration_id.clone(), "e.g. 1234"),
        ("Appraisal Value (R$)", format_number(ledger.appraisal_value), "digits only"),
        ("New Risk Amount (R$)", format_number(ledger.new_risk_amount), "digits only"),
    ];
    draw_fields(f, &fields, app.property_form.selected_field, &chunks);
}

fn draw_liens(f: &mut Frame, app: &mut App, area: Rect) {
    let total = app.ledger.len();
    let title = if total == 0 {
        " Title Liens ".to_string()
    } else {
        let selected_idx = app.lien_state.selected().unwrap_or(0);
        format!(" Title Liens ({}/{}) ", selected_idx + 1, total)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);

    if total == 0 {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No liens added.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Press 'a' to add the first lien.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("Priority").style(header_style),
        Cell::from("Kind").style(header_style),
        Cell::from("Institution").style(header_style),
        Cell::from("Issued").style(header_style),
        Cell::from("Due").style(header_style),
        Cell::from("Amount").style(header_style),
    ])
    .height(1)
    .bottom_margin(1);

    let selected = app.lien_state.selected();
    let rows: Vec<Row> = app
        .ledger
        .liens()
        .iter()
        .enumerate()
        .map(|(i, lien)| {
            let is_selected = selected == Some(i);
            let prefix = if is_selected { "▶ " } else { "  " };
            Row::new(vec![
                Cell::from(format!("{}{}", prefix, lien.priority)),
                Cell::from(lien.kind.label()).style(Style::default().fg(if is_selected {
                    Color::White
                } else {
                    Color::Cyan
                })),
                Cell::from(lien.institution.clone()),
                Cell::from(format_date(&lien.issued_on)),
                Cell::from(format_date(&lien.due_on)),
                Cell::from(format_currency(lien.amount)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(14),
        Constraint::Percentage(20),
        Constraint::Percentage(18),
        Constraint::Percentage(13),
        Constraint::Percentage(13),
        Constraint::Percentage(22),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    f.render_stateful_widget(table, chunks[0], &mut app.lien_state);
    f.render_widget(copy_control(&app.copy_feedback), chunks[1]);
}

fn copy_control(feedback: &CopyFeedback) -> Paragraph<'static> {
    let copy_style = if feedback.is_active() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Paragraph::new(Line::from(vec![
        Span::styled("[c] ", Style::default().fg(Color::DarkGray)),
        Span::styled(feedback.label(), copy_style),
    ]))
    .alignment(ratatui::layout::Alignment::Right)
}

/// The exported report, exactly as it will be copied.
fn draw_report(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let lines: Vec<Line> = app
        .ledger
        .summary_text()
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    let report = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Summary Report "),
        );

    f.render_widget(report, chunks[0]);
    f.render_widget(copy_control(&app.copy_feedback), chunks[1]);
}

/// Left label, right-aligned value, padded to `width` columns.
fn spread_line(label: &str, value: &str, width: u16) -> String {
    let used = label.width() + value.width();
    let pad = (width as usize).saturating_sub(used).max(1);
    format!("{}{}{}", label, " ".repeat(pad), value)
}

fn draw_summary(f: &mut Frame, app: &App, area: Rect) {
    let totals = app.ledger.totals();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Analysis Result ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Encumbrance
            Constraint::Length(1), // Debt
            Constraint::Length(1),
            Constraint::Length(1), // Coverage
            Constraint::Length(3), // Gauge
            Constraint::Length(1), // Formula
            Constraint::Min(0),
        ])
        .horizontal_margin(1)
        .split(inner);

    let width = chunks[0].width;
    let encumbrance = Paragraph::new(Span::styled(
        spread_line("Total Liens", &format_currency(totals.total_encumbrance), width),
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    ));
    let debt = Paragraph::new(Span::styled(
        spread_line("Total Debt", &format_currency(totals.total_debt), width),
        Style::default().fg(Color::Gray),
    ));
    let coverage = Paragraph::new(Span::styled(
        spread_line(
            "Coverage Ratio",
            &format!("{}%", format_percent(totals.coverage_ratio)),
            width,
        ),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    let gauge_color = match totals.band() {
        CoverageBand::Strong => Color::Green,
        CoverageBand::Moderate => Color::Yellow,
        CoverageBand::Weak => Color::Red,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(gauge_color).bg(Color::DarkGray))
        .ratio(totals.coverage_ratio.clamp(0.0, 1.0))
        .label(format!("{}%", format_percent(totals.coverage_ratio)));

    let formula = Paragraph::new(Span::styled(
        "Appraisal / (Liens + New Risk)",
        Style::default().fg(Color::DarkGray),
    ))
    .alignment(ratatui::layout::Alignment::Right);

    f.render_widget(encumbrance, chunks[0]);
    f.render_widget(debt, chunks[1]);
    f.render_widget(coverage, chunks[3]);
    f.render_widget(gauge, chunks[4]);
    f.render_widget(formula, chunks[5]);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_lien_form(f: &mut Frame, form: &LienForm, area: Rect) {
    let area = centered_rect(64, 24, area);
    f.render_widget(Clear, area);

    let title = format!(
        " {} (Field {}/6) ",
        form.title(),
        form.selected_field + 1
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Priority
            Constraint::Length(3), // Kind
            Constraint::Length(3), // Institution
            Constraint::Length(3), // Issued
            Constraint::Length(3), // Due
            Constraint::Length(3), // Amount
            Constraint::Min(0),    // Hint
        ])
        .margin(1)
        .split(area);

    let draft = &form.draft;
    let fields = [
        ("Priority", format!("◀ {} ▶", draft.priority), "←/→ to change"),
        ("Kind", format!("◀ {} ▶", draft.kind), "←/→ to change"),
        ("Institution", draft.institution.clone(), "e.g. Bank X"),
        ("Issued On", draft.issued_on.clone(), "YYYY-MM-DD"),
        ("Due On", draft.due_on.clone(), "YYYY-MM-DD"),
        ("Amount (R$)", format_number(draft.amount), "5.000.000,00"),
    ];
    draw_fields(f, &fields, form.selected_field, &chunks);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Cyan)),
        Span::styled(" Fields  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::styled(" Save  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::styled(" Cancel", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(hint, chunks[6]);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.lien_form.is_some() {
        " ↑/↓:Fields  ←/→:Change  Enter:Save  Esc:Cancel ".to_string()
    } else {
        match app.current_view {
            View::Property => {
                " ↑/↓:Fields  Type to edit  Tab/Esc:Liens  Ctrl+R:Clear  Ctrl+C:Quit ".to_string()
            }
            View::Liens => format!(
                " ↑/↓:Select  a:Add  e:Edit  d:Remove  c:{}  Ctrl+R:Clear  q:Quit ",
                CopyFeedback::IDLE_LABEL
            ),
            View::Summary => format!(
                " c:{}  Tab:Property  Ctrl+R:Clear  q:Quit ",
                CopyFeedback::IDLE_LABEL
            ),
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let help = Paragraph::new(Line::from(Span::styled(
        help_text,
        Style::default().fg(Color::Cyan),
    )))
    .block(Block::default().borders(Borders::ALL).title(" Keys "));

    // Right: latest status, or a count of liens
    let info = match &app.status {
        Some(Status::Error(msg)) => Line::from(vec![
            Span::styled("✗ ", Style::default().fg(Color::Red)),
            Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        ]),
        Some(Status::Info(msg)) => Line::from(vec![
            Span::styled("✓ ", Style::default().fg(Color::Green)),
            Span::styled(msg.as_str(), Style::default().fg(Color::Green)),
        ]),
        None => Line::from(Span::styled(
            format!(" {} liens ", app.ledger.len()),
            Style::default().fg(Color::DarkGray),
        )),
    };
    let info_widget = Paragraph::new(info)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Info "));

    f.render_widget(help, chunks[0]);
    f.render_widget(info_widget, chunks[1]);
}
