use std::time::Instant;

use arboard::Clipboard;
use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, trace};

use crate::domain::{
    ConnectionError, HelipeError, Message, TAB_ORDERS, TAB_PAYABLES, TAB_RAW_MATERIALS,
};
use crate::navigation::{Navigation, Screen};
use crate::screens::{
    DashboardMetrics, FinancialSection, Form, FormEvent, InventoryCategory, displayed_tab,
};
use crate::store::{self, TabularStore};
use crate::table::{Diagnostics, TabularView, read_tab_or_empty};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Sidebar,
    Table,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Sidebar entries: every screen plus the "Voltar" button.
pub const SIDEBAR_ENTRIES: usize = Screen::ALL.len() + 1;

/// One tab read during the current render pass.
#[derive(Debug)]
pub struct TableSlot {
    pub title: &'static str,
    pub tab: &'static str,
    pub view: TabularView,
    pub selected: usize,
}

/// Everything the current render pass fetched. Replaced, never patched, by the next pass.
#[derive(Debug, Default)]
pub struct Page {
    pub table: Option<TableSlot>,
    pub metrics: Option<DashboardMetrics>,
}

pub struct Model {
    pub status: Status,
    store: Option<Box<dyn TabularStore>>,
    store_title: String,
    connection_error: Option<String>,
    navigation: Navigation,
    focus: Focus,
    sidebar_cursor: usize,
    financial_section: FinancialSection,
    inventory_category: InventoryCategory,
    page: Page,
    form: Option<Form>,
    diagnostics: Diagnostics,
    status_message: String,
    status_kind: StatusKind,
    last_status_message_update: Instant,
    show_help: bool,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Model {
    pub fn init(connection: Result<Box<dyn TabularStore>, ConnectionError>) -> Self {
        let (store, connection_error) = match connection {
            Ok(store) => (Some(store), None),
            Err(e) => {
                error!("Erro de conexão: {e}");
                (None, Some(format!("Erro de conexão: {e}")))
            }
        };
        let store_title = store.as_ref().map(|s| s.title()).unwrap_or_default();

        let mut model = Self {
            status: Status::READY,
            store,
            store_title,
            connection_error,
            navigation: Navigation::default(),
            focus: Focus::Sidebar,
            sidebar_cursor: 0,
            financial_section: FinancialSection::default(),
            inventory_category: InventoryCategory::default(),
            page: Page::default(),
            form: None,
            diagnostics: Diagnostics::default(),
            status_message: "Helipe iniciado".to_string(),
            status_kind: StatusKind::Info,
            last_status_message_update: Instant::now(),
            show_help: false,
            today: local_today,
        };
        model.enter_screen();
        model
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), HelipeError> {
        let Some(msg) = message else {
            return Ok(());
        };
        trace!("Update: focus {:?}, message {:?}", self.focus, msg);

        if self.show_help {
            match msg {
                Message::Quit => self.quit(),
                Message::Help | Message::Exit | Message::Enter => self.show_help = false,
                _ => (),
            }
            return Ok(());
        }

        match msg {
            Message::Quit => self.quit(),
            Message::Help => self.show_help = true,
            Message::Navigate(screen) => self.navigate(screen),
            Message::Back => self.navigate(Screen::Dashboard),
            Message::FocusNext => self.focus_next(),
            Message::MoveUp => self.move_selection_up(1),
            Message::MoveDown => self.move_selection_down(1),
            Message::MovePageUp => self.move_selection_up(10),
            Message::MovePageDown => self.move_selection_down(10),
            Message::Enter => self.enter(),
            Message::Exit => self.exit(),
            Message::Refresh => {
                self.render_pass();
                self.set_status_message(StatusKind::Info, "Dados recarregados");
            }
            Message::NextSection => self.next_section(),
            Message::CopyRow => self.copy_selected_row(),
            Message::RawKey(key) => match self.form.as_mut().map(|form| form.handle_key(key)) {
                Some(FormEvent::Submit) => self.submit_form(),
                Some(FormEvent::Cancel) => self.focus = Focus::Sidebar,
                Some(FormEvent::Continue) | None => {}
            },
        }
        Ok(())
    }

    // -------------------- Control handling functions ---------------------- //

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn navigate(&mut self, screen: Screen) {
        self.navigation.navigate(screen);
        self.sidebar_cursor = screen.index();
        self.enter_screen();
    }

    /// Builds the form of the current screen and runs a fresh render pass.
    fn enter_screen(&mut self) {
        self.form = Form::for_screen(
            self.navigation.current(),
            self.financial_section,
            self.inventory_category,
            (self.today)(),
        );
        if self.focus == Focus::Form && self.form.is_none() {
            self.focus = Focus::Sidebar;
        }
        self.render_pass();
    }

    /// Re-reads every tab the current screen shows. Read failures end up in the diagnostics.
    fn render_pass(&mut self) {
        self.diagnostics.clear();
        let previous = self.page.table.take();
        let Some(store) = self.store.as_deref() else {
            self.page = Page::default();
            return;
        };
        let start = Instant::now();
        let screen = self.navigation.current();

        let table = displayed_tab(screen, self.financial_section, self.inventory_category).map(
            |(title, tab)| {
                let view = read_tab_or_empty(store, tab, &mut self.diagnostics);
                let selected = previous
                    .as_ref()
                    .filter(|p| p.tab == tab)
                    .map(|p| p.selected.min(view.height().saturating_sub(1)))
                    .unwrap_or(0);
                TableSlot {
                    title,
                    tab,
                    view,
                    selected,
                }
            },
        );

        let metrics = if screen == Screen::Dashboard {
            let payables = read_tab_or_empty(store, TAB_PAYABLES, &mut self.diagnostics);
            let orders = read_tab_or_empty(store, TAB_ORDERS, &mut self.diagnostics);
            let stock = read_tab_or_empty(store, TAB_RAW_MATERIALS, &mut self.diagnostics);
            Some(DashboardMetrics::compute(&payables, &orders, &stock))
        } else {
            None
        };

        self.page = Page { table, metrics };
        debug!(
            "Render pass for {screen} took {}ms",
            start.elapsed().as_millis()
        );
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar if self.page.table.is_some() => Focus::Table,
            Focus::Sidebar | Focus::Table if self.form.is_some() => Focus::Form,
            _ => Focus::Sidebar,
        };
    }

    fn enter(&mut self) {
        match self.focus {
            Focus::Sidebar => match Screen::ALL.get(self.sidebar_cursor) {
                Some(&screen) => self.navigate(screen),
                None => self.navigate(Screen::Dashboard),
            },
            Focus::Table if self.form.is_some() => self.focus = Focus::Form,
            _ => {}
        }
    }

    fn exit(&mut self) {
        self.focus = Focus::Sidebar;
    }

    fn next_section(&mut self) {
        match self.navigation.current() {
            Screen::Financial => self.financial_section = self.financial_section.next(),
            Screen::Inventory => self.inventory_category = self.inventory_category.next(),
            _ => return,
        }
        self.enter_screen();
    }

    fn move_selection_up(&mut self, size: usize) {
        match self.focus {
            Focus::Sidebar => self.sidebar_cursor = self.sidebar_cursor.saturating_sub(size),
            Focus::Table => {
                if let Some(slot) = self.page.table.as_mut() {
                    slot.selected = slot.selected.saturating_sub(size);
                }
            }
            Focus::Form => {}
        }
    }

    fn move_selection_down(&mut self, size: usize) {
        match self.focus {
            Focus::Sidebar => {
                self.sidebar_cursor = (self.sidebar_cursor + size).min(SIDEBAR_ENTRIES - 1)
            }
            Focus::Table => {
                if let Some(slot) = self.page.table.as_mut() {
                    let last = slot.view.height().saturating_sub(1);
                    slot.selected = (slot.selected + size).min(last);
                }
            }
            Focus::Form => {}
        }
    }

    /// Appends the form's row. Only a confirmed write clears the form and reloads the screen.
    fn submit_form(&mut self) {
        let today = (self.today)();
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let row = match form.to_row(today) {
            Ok(row) => row,
            Err(e) => {
                self.set_status_message(StatusKind::Error, e.to_string());
                return;
            }
        };
        let success = form.success_message();

        match store::append_row(self.store.as_deref(), row.tab, &row.values) {
            Ok(()) => {
                info!("Appended row to {}", row.tab);
                if let Some(form) = self.form.as_mut() {
                    form.clear(today);
                }
                self.render_pass();
                self.set_status_message(StatusKind::Success, success);
            }
            Err(e) => {
                error!("{e}");
                self.set_status_message(StatusKind::Error, e.to_string());
            }
        }
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',' || c == '"');
        let out = c.replace('"', "\"\"");
        if needs_wrapping {
            format!("\"{out}\"")
        } else {
            out
        }
    }

    /// Copies the selected row to the clipboard as one CSV line.
    fn copy_selected_row(&mut self) {
        let Some(row) = self
            .page
            .table
            .as_ref()
            .and_then(|slot| slot.view.rows().get(slot.selected))
        else {
            return;
        };
        let row_content = row
            .iter()
            .map(|c| Model::wrap_cell_content(c))
            .collect::<Vec<String>>()
            .join(",");
        trace!("Row content: {row_content}");

        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(row_content)) {
            Ok(()) => self.set_status_message(StatusKind::Info, "Linha copiada"),
            Err(e) => {
                error!("Error copying to clipboard: {e:?}");
                self.set_status_message(StatusKind::Error, format!("Erro ao copiar: {e}"));
            }
        }
    }

    fn set_status_message(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_kind = kind;
        self.last_status_message_update = Instant::now();
    }

    // ----------------------------- Accessors ------------------------------ //

    pub fn raw_keyevents(&self) -> bool {
        self.focus == Focus::Form && self.form.is_some() && !self.show_help
    }

    pub fn current_screen(&self) -> Screen {
        self.navigation.current()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn sidebar_cursor(&self) -> usize {
        self.sidebar_cursor
    }

    pub fn financial_section(&self) -> FinancialSection {
        self.financial_section
    }

    pub fn inventory_category(&self) -> InventoryCategory {
        self.inventory_category
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn diagnostics(&self) -> &[String] {
        self.diagnostics.messages()
    }

    pub fn connection_error(&self) -> Option<&str> {
        self.connection_error.as_deref()
    }

    pub fn store_title(&self) -> &str {
        &self.store_title
    }

    pub fn status_message(&self) -> (&str, StatusKind, Instant) {
        (
            &self.status_message,
            self.status_kind,
            self.last_status_message_update,
        )
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StoreError, TAB_CASH_FLOW, TAB_PRODUCTION, TAB_SHIPPING};
    use crate::store::memory::MemoryStore;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn workshop() -> MemoryStore {
        MemoryStore::default()
            .with_tab(TAB_PRODUCTION, &[&["OP", "Produto"], &["1", "Mesa"]])
            .with_tab(
                TAB_PAYABLES,
                &[
                    &["Descrição", "Valor", "Vencimento", "Status"],
                    &["Luz", "450.0", "10/03/2024", "Pendente"],
                ],
            )
            .with_tab(
                TAB_CASH_FLOW,
                &[&["Data", "Tipo", "Descrição", "Entrada", "Saída", ""]],
            )
            .with_tab(TAB_RAW_MATERIALS, &[&["Item", "Quantidade"], &["Pinus 20mm", "2"]])
            .with_tab(TAB_ORDERS, &[&["Nº", "Cliente", "Produto", "Valor", "Status", ""]])
    }

    fn model_with(store: MemoryStore) -> Model {
        let mut model = Model::init(Ok(Box::new(store)));
        model.today = fixed_today;
        model
    }

    fn send(model: &mut Model, message: Message) {
        model.update(Some(message)).unwrap();
    }

    fn type_str(model: &mut Model, s: &str) {
        for c in s.chars() {
            send(model, Message::RawKey(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        }
    }

    fn key(model: &mut Model, code: KeyCode) {
        send(model, Message::RawKey(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    /// Raw rows of a tab, header included.
    fn rows_of(model: &Model, tab: &str) -> Vec<Vec<String>> {
        model.store.as_deref().unwrap().read_rows(tab).unwrap()
    }

    #[test]
    fn starts_on_dashboard_with_metrics() {
        let model = model_with(workshop());

        assert_eq!(model.current_screen(), Screen::Dashboard);
        let page = model.page();
        assert_eq!(page.table.as_ref().unwrap().tab, TAB_PRODUCTION);
        let metrics = page.metrics.as_ref().unwrap();
        assert_eq!(metrics.payables_pending, 450.0);
        assert_eq!(metrics.critical_stock.as_deref(), Some("Pinus 20mm"));
        assert!(model.diagnostics().is_empty());
    }

    #[test]
    fn missing_tab_only_degrades_its_table() {
        let mut model = model_with(workshop());

        send(&mut model, Message::Navigate(Screen::Shipping));

        assert_eq!(model.current_screen(), Screen::Shipping);
        let slot = model.page().table.as_ref().unwrap();
        assert_eq!(slot.tab, TAB_SHIPPING);
        assert!(slot.view.is_empty());
        assert_eq!(model.diagnostics().len(), 1);
        assert!(model.diagnostics()[0].contains(TAB_SHIPPING));
    }

    #[test]
    fn sidebar_enter_opens_screen_and_back_returns() {
        let mut model = model_with(workshop());

        send(&mut model, Message::MoveDown);
        send(&mut model, Message::MoveDown);
        send(&mut model, Message::Enter);
        assert_eq!(model.current_screen(), Screen::Inventory);

        for _ in 0..10 {
            send(&mut model, Message::MoveDown);
        }
        assert_eq!(model.sidebar_cursor(), SIDEBAR_ENTRIES - 1);
        send(&mut model, Message::Enter);
        assert_eq!(model.current_screen(), Screen::Dashboard);

        send(&mut model, Message::Navigate(Screen::Orders));
        send(&mut model, Message::Back);
        assert_eq!(model.current_screen(), Screen::Dashboard);
    }

    #[test]
    fn submitting_cash_flow_appends_and_clears_form() {
        let mut model = model_with(workshop());
        send(&mut model, Message::Navigate(Screen::Financial));
        send(&mut model, Message::NextSection);
        assert_eq!(model.page().table.as_ref().unwrap().tab, TAB_CASH_FLOW);

        send(&mut model, Message::FocusNext);
        send(&mut model, Message::FocusNext);
        assert!(model.raw_keyevents());
        key(&mut model, KeyCode::Tab);
        type_str(&mut model, "150");
        key(&mut model, KeyCode::Tab);
        type_str(&mut model, "Venda mesa");
        key(&mut model, KeyCode::Enter);

        assert_eq!(
            rows_of(&model, TAB_CASH_FLOW).last().unwrap(),
            &vec!["05/03/2024", "Entrada", "Venda mesa", "150.0", "", ""]
        );
        assert_eq!(model.status_message().0, "Lançado!");
        assert_eq!(model.status_message().1, StatusKind::Success);
        assert_eq!(model.form().unwrap().fields[2].value(), "");
        assert_eq!(model.page().table.as_ref().unwrap().view.height(), 1);
        assert_eq!(model.current_screen(), Screen::Financial);
    }

    #[test]
    fn failed_write_keeps_form_and_reports_error() {
        let mut model = model_with(workshop().failing_writes());
        send(&mut model, Message::Navigate(Screen::Inventory));
        send(&mut model, Message::FocusNext);
        send(&mut model, Message::FocusNext);
        type_str(&mut model, "Pinus 20mm");
        key(&mut model, KeyCode::Tab);
        type_str(&mut model, "50");
        key(&mut model, KeyCode::Enter);

        let (message, kind, _) = model.status_message();
        assert_eq!(kind, StatusKind::Error);
        assert!(message.contains(TAB_RAW_MATERIALS));
        assert_eq!(model.form().unwrap().fields[0].value(), "Pinus 20mm");
        assert_eq!(model.form().unwrap().fields[1].value(), "50");
        assert_eq!(model.current_screen(), Screen::Inventory);
        assert_eq!(rows_of(&model, TAB_RAW_MATERIALS).len(), 2);
    }

    #[test]
    fn invalid_amount_is_not_written() {
        let mut model = model_with(workshop());
        send(&mut model, Message::Navigate(Screen::Orders));
        send(&mut model, Message::FocusNext);
        send(&mut model, Message::FocusNext);
        for _ in 0..3 {
            key(&mut model, KeyCode::Tab);
        }
        type_str(&mut model, "dez");
        key(&mut model, KeyCode::Enter);

        assert_eq!(model.status_message().1, StatusKind::Error);
        assert_eq!(rows_of(&model, TAB_ORDERS).len(), 1);
    }

    #[test]
    fn inventory_category_switch_changes_tab_and_form() {
        let store = workshop().with_tab("Estoque_Pecas", &[&["Item", "Quantidade"]]);
        let mut model = model_with(store);
        send(&mut model, Message::Navigate(Screen::Inventory));
        send(&mut model, Message::NextSection);

        assert_eq!(model.inventory_category(), InventoryCategory::Parts);
        assert_eq!(model.page().table.as_ref().unwrap().tab, "Estoque_Pecas");
        assert_eq!(model.form().unwrap().title(), "Adicionar item em Estoque_Pecas");
    }

    #[test]
    fn escape_leaves_the_form() {
        let mut model = model_with(workshop());
        send(&mut model, Message::Navigate(Screen::Orders));
        send(&mut model, Message::FocusNext);
        send(&mut model, Message::FocusNext);
        assert_eq!(model.focus(), Focus::Form);
        key(&mut model, KeyCode::Esc);
        assert_eq!(model.focus(), Focus::Sidebar);
        assert!(!model.raw_keyevents());
    }

    #[test]
    fn table_selection_is_clamped() {
        let mut model = model_with(workshop());
        send(&mut model, Message::FocusNext);
        assert_eq!(model.focus(), Focus::Table);
        send(&mut model, Message::MovePageDown);
        assert_eq!(model.page().table.as_ref().unwrap().selected, 0);
        send(&mut model, Message::MoveUp);
        assert_eq!(model.page().table.as_ref().unwrap().selected, 0);
    }

    #[test]
    fn connection_failure_runs_degraded() {
        let error = ConnectionError::Open(StoreError::Auth("invalid_grant".to_string()));
        let mut model = Model::init(Err(error));

        assert!(model.connection_error().unwrap().contains("invalid_grant"));
        assert!(model.page().table.is_none());

        send(&mut model, Message::Navigate(Screen::Orders));
        assert_eq!(model.current_screen(), Screen::Orders);
        assert!(model.page().table.is_none());

        send(&mut model, Message::FocusNext);
        assert_eq!(model.focus(), Focus::Form);
        key(&mut model, KeyCode::Enter);
        assert_eq!(model.status_message().1, StatusKind::Error);
        assert!(model.status_message().0.contains("não conectada"));

        send(&mut model, Message::Quit);
        assert_eq!(model.status, Status::QUITTING);
    }

    #[test]
    fn copied_cells_are_csv_wrapped() {
        assert_eq!(Model::wrap_cell_content("Mesa"), "Mesa");
        assert_eq!(Model::wrap_cell_content("Mesa de centro"), "\"Mesa de centro\"");
        assert_eq!(Model::wrap_cell_content("12\" pol"), "\"12\"\" pol\"");
    }

    #[test]
    fn help_swallows_messages_until_closed() {
        let mut model = model_with(workshop());
        send(&mut model, Message::Help);
        assert!(model.show_help());
        send(&mut model, Message::Navigate(Screen::Orders));
        assert_eq!(model.current_screen(), Screen::Dashboard);
        send(&mut model, Message::Exit);
        assert!(!model.show_help());
    }
}
