use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{
        Block, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs,
        Wrap,
    },
};

use crate::domain::{HELP_TEXT, HelipeConfig};
use crate::model::{Focus, Model, SIDEBAR_ENTRIES, StatusKind, TableSlot};
use crate::navigation::Screen;
use crate::screens::{
    DashboardMetrics, FieldKind, FinancialSection, Form, InventoryCategory, format_brl,
};

pub const SIDEBAR_WIDTH: u16 = 24;
pub const STATUS_LINE_HEIGHT: u16 = 1;
const BACK_LABEL: &str = "⬅ Voltar";

#[derive(Debug)]
pub struct DashboardUI {
    max_column_width: usize,
}

impl DashboardUI {
    pub fn new(config: &HelipeConfig) -> Self {
        Self {
            max_column_width: config.max_column_width.max(1),
        }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let banner_height = if model.connection_error().is_some() { 3 } else { 0 };
        let [header, banner, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .areas(frame.area());
        let [sidebar, content] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)]).areas(body);

        self.draw_header(model, frame, header);
        if let Some(error) = model.connection_error() {
            let paragraph = Paragraph::new(error.to_string())
                .style(Style::new().fg(Color::Red).bold())
                .wrap(Wrap { trim: true })
                .block(Block::bordered().border_style(Style::new().fg(Color::Red)));
            frame.render_widget(paragraph, banner);
        }
        self.draw_sidebar(model, frame, sidebar);
        self.draw_content(model, frame, content);
        self.draw_status(model, frame, status);

        if model.show_help() {
            self.draw_help(frame);
        }
    }

    fn draw_header(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let mut spans = vec![" 🏭 Helipe Ateliê ".bold()];
        if !model.store_title().is_empty() {
            spans.push(" ".into());
            spans.push(model.store_title().to_string().yellow());
        }
        frame.render_widget(Line::from(spans), area);
    }

    fn draw_sidebar(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let current = model.current_screen();
        let mut items: Vec<ListItem> = Screen::ALL
            .iter()
            .map(|&screen| {
                let marker = if screen == current { "▶ " } else { "  " };
                let item = ListItem::new(format!("{marker}{}", screen.label()));
                if screen == current {
                    item.style(Style::new().fg(Color::Green).bold())
                } else {
                    item
                }
            })
            .collect();
        items.push(ListItem::new(format!("  {BACK_LABEL}")));
        debug_assert_eq!(items.len(), SIDEBAR_ENTRIES);

        let focused = model.focus() == Focus::Sidebar;
        let list = List::new(items)
            .block(focus_block(" Menu ", focused))
            .highlight_style(Style::new().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        if focused {
            state.select(Some(model.sidebar_cursor()));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_content(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let screen = model.current_screen();
        let block = Block::bordered()
            .title(Line::from(format!(" {} ", screen.title()).bold()).centered())
            .border_set(border::THICK);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let page = model.page();
        let form = model.form();
        let diagnostics = model.diagnostics();

        let mut constraints = Vec::new();
        let selector = matches!(screen, Screen::Financial | Screen::Inventory);
        if selector {
            constraints.push(Constraint::Length(1));
        }
        if page.metrics.is_some() {
            constraints.push(Constraint::Length(3));
        }
        if !diagnostics.is_empty() {
            constraints.push(Constraint::Length(diagnostics.len() as u16));
        }
        let form_height = form.map(|f| f.fields.len() as u16 + 2).unwrap_or(0);
        let below = form.is_some_and(Form::below_table);
        if form.is_some() && !below {
            constraints.push(Constraint::Length(form_height));
        }
        constraints.push(Constraint::Min(3));
        if below {
            constraints.push(Constraint::Length(form_height));
        }
        let areas = Layout::vertical(constraints).split(inner);
        let mut areas = areas.iter().copied();
        let mut next_area = || areas.next().unwrap_or_default();

        if selector {
            self.draw_selector(model, frame, next_area());
        }
        if let Some(metrics) = &page.metrics {
            self.draw_metrics(metrics, frame, next_area());
        }
        if !diagnostics.is_empty() {
            let lines: Vec<Line> = diagnostics
                .iter()
                .map(|d| Line::from(d.as_str().red()))
                .collect();
            frame.render_widget(Paragraph::new(lines), next_area());
        }
        let form_focused = model.focus() == Focus::Form;
        if let Some(form) = form.filter(|_| !below) {
            self.draw_form(form, form_focused, frame, next_area());
        }
        match &page.table {
            Some(slot) => self.draw_table(slot, model.focus() == Focus::Table, frame, next_area()),
            None => {
                let message = if model.connection_error().is_some() {
                    "Planilha não conectada"
                } else {
                    ""
                };
                frame.render_widget(Paragraph::new(message.dark_gray()), next_area());
            }
        }
        if let Some(form) = form.filter(|_| below) {
            self.draw_form(form, form_focused, frame, next_area());
        }
    }

    fn draw_selector(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let (titles, selected): (Vec<&str>, usize) = match model.current_screen() {
            Screen::Financial => (
                FinancialSection::ALL.iter().map(FinancialSection::label).collect(),
                FinancialSection::ALL
                    .iter()
                    .position(|s| *s == model.financial_section())
                    .unwrap_or(0),
            ),
            _ => (
                InventoryCategory::ALL.iter().map(InventoryCategory::tab).collect(),
                InventoryCategory::ALL
                    .iter()
                    .position(|c| *c == model.inventory_category())
                    .unwrap_or(0),
            ),
        };
        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(Style::new().fg(Color::Yellow).bold())
            .padding("", "")
            .divider(" | ");
        frame.render_widget(tabs, area);
    }

    fn draw_metrics(&self, metrics: &DashboardMetrics, frame: &mut Frame, area: Rect) {
        let [payables, orders, stock] =
            Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(area);
        let metric = |label: &str, value: String| {
            Paragraph::new(Line::from(value.bold()).centered())
                .block(Block::bordered().title(Line::from(label.to_string()).centered()))
        };
        frame.render_widget(
            metric("Contas a Pagar", format_brl(metrics.payables_pending)),
            payables,
        );
        frame.render_widget(
            metric("Pedidos Pendentes", metrics.orders_pending.to_string()),
            orders,
        );
        frame.render_widget(
            metric(
                "Estoque Crítico",
                metrics.critical_stock.clone().unwrap_or_else(|| "-".to_string()),
            ),
            stock,
        );
    }

    fn draw_form(&self, form: &Form, focused: bool, frame: &mut Frame, area: Rect) {
        let instructions = Line::from(vec![
            " [Enter] ".blue().bold(),
            form.submit_label().into(),
            " ".into(),
        ]);
        let block = focus_block(&format!(" {} ", form.title()), focused)
            .title_bottom(instructions.centered());
        let inner = block.inner(area);

        let label_width = form
            .fields
            .iter()
            .map(|f| f.label.chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<Line> = form
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let label = format!("{:<label_width$}: ", field.label);
                let value = match field.kind {
                    FieldKind::Choice(_) => format!("◀ {} ▶", field.value()),
                    _ => field.value().to_string(),
                };
                let style = if focused && idx == form.focused {
                    Style::new().fg(Color::Yellow)
                } else {
                    Style::new()
                };
                Line::from(vec![Span::styled(label, style.bold()), Span::styled(value, style)])
            })
            .collect();
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);

        if let Some(field) = form.fields.get(form.focused).filter(|_| focused)
            && !matches!(field.kind, FieldKind::Choice(_))
        {
            let x = inner.x + (label_width + 2 + field.input.cursor()) as u16;
            let y = inner.y + form.focused as u16;
            if x < inner.right() && y < inner.bottom() {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }

    fn draw_table(&self, slot: &TableSlot, focused: bool, frame: &mut Frame, area: Rect) {
        let block = focus_block(&format!(" {} ", slot.title), focused);
        let view = &slot.view;
        if view.is_empty() {
            frame.render_widget(Paragraph::new("Sem dados".dark_gray()).block(block), area);
            return;
        }

        let widths: Vec<Constraint> = (0..view.width())
            .map(|column| {
                let width = std::iter::once(view.header()[column].as_str())
                    .chain(view.rows().iter().map(|row| row[column].as_str()))
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0)
                    .clamp(1, self.max_column_width);
                Constraint::Length(width as u16)
            })
            .collect();
        let header = Row::new(view.header().iter().map(|h| Cell::from(h.as_str())))
            .style(Style::new().bold().underlined());
        let rows = view
            .rows()
            .iter()
            .map(|row| Row::new(row.iter().map(|c| Cell::from(c.as_str()))));

        let mut table = Table::new(rows, widths).header(header).block(block);
        if focused {
            table = table.row_highlight_style(Style::new().add_modifier(Modifier::REVERSED));
        }
        let mut state = TableState::default();
        if view.height() > 0 {
            state.select(Some(slot.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_status(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let (message, kind, updated) = model.status_message();
        let style = match kind {
            StatusKind::Info => Style::new(),
            StatusKind::Success => Style::new().fg(Color::Green),
            StatusKind::Error => Style::new().fg(Color::Red).bold(),
        };
        let line = Line::from(vec![
            Span::styled(format!(" {message}"), style),
            format!("  ({}s)", updated.elapsed().as_secs()).dark_gray(),
            "  [?] Ajuda".blue(),
        ]);
        frame.render_widget(line, area);
    }

    fn draw_help(&self, frame: &mut Frame) {
        let [area] = Layout::horizontal([Constraint::Percentage(70)])
            .flex(Flex::Center)
            .areas(frame.area());
        let [area] = Layout::vertical([Constraint::Length(HELP_TEXT.lines().count() as u16 + 2)])
            .flex(Flex::Center)
            .areas(area);
        let popup = Paragraph::new(HELP_TEXT).block(
            Block::bordered()
                .title(Line::from(" Ajuda ".bold()).centered())
                .border_set(border::DOUBLE),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

fn focus_block(title: &str, focused: bool) -> Block<'static> {
    let block = Block::bordered().title(title.to_string());
    if focused {
        block.border_style(Style::new().fg(Color::Yellow))
    } else {
        block
    }
}
