use std::fmt;

use chrono::NaiveDate;
use derive_setters::Setters;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use tracing::trace;

use crate::domain::{
    TAB_CASH_FLOW, TAB_ORDERS, TAB_PARTS, TAB_PAYABLES, TAB_PRODUCTION, TAB_RAW_MATERIALS,
    TAB_SHIPPING,
};
use crate::inputter::Inputter;
use crate::navigation::Screen;
use crate::table::TabularView;

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const STATUS_PENDING: &str = "Pendente";
const CASH_FLOW_TYPES: &[&str] = &["Entrada", "Saída"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinancialSection {
    #[default]
    Payables,
    CashFlow,
}

impl FinancialSection {
    pub const ALL: [FinancialSection; 2] =
        [FinancialSection::Payables, FinancialSection::CashFlow];

    pub fn label(&self) -> &'static str {
        match self {
            FinancialSection::Payables => "Contas a Pagar",
            FinancialSection::CashFlow => "Fluxo de Caixa",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FinancialSection::Payables => FinancialSection::CashFlow,
            FinancialSection::CashFlow => FinancialSection::Payables,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventoryCategory {
    #[default]
    RawMaterials,
    Parts,
}

impl InventoryCategory {
    pub const ALL: [InventoryCategory; 2] =
        [InventoryCategory::RawMaterials, InventoryCategory::Parts];

    pub fn tab(&self) -> &'static str {
        match self {
            InventoryCategory::RawMaterials => TAB_RAW_MATERIALS,
            InventoryCategory::Parts => TAB_PARTS,
        }
    }

    pub fn next(self) -> Self {
        match self {
            InventoryCategory::RawMaterials => InventoryCategory::Parts,
            InventoryCategory::Parts => InventoryCategory::RawMaterials,
        }
    }
}

/// Title and tab of the table a screen displays.
pub fn displayed_tab(
    screen: Screen,
    section: FinancialSection,
    category: InventoryCategory,
) -> Option<(&'static str, &'static str)> {
    match screen {
        Screen::Dashboard => Some(("Produção em Andamento", TAB_PRODUCTION)),
        Screen::Financial => match section {
            FinancialSection::Payables => Some(("Contas a Pagar", TAB_PAYABLES)),
            FinancialSection::CashFlow => Some(("Histórico do Fluxo de Caixa", TAB_CASH_FLOW)),
        },
        Screen::Inventory => Some(("Itens", category.tab())),
        Screen::Orders => Some(("Pedidos", TAB_ORDERS)),
        Screen::Shipping => Some(("Expedição", TAB_SHIPPING)),
    }
}

// ------------------------------- Parsing ---------------------------------- //

#[derive(Debug, PartialEq)]
pub struct FormError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parses a non-negative amount. Accepts `1234.5`, `1.234,50` and a leading `R$`.
/// An empty input is zero.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim().trim_start_matches("R$").trim();
    if s.is_empty() {
        return Some(0.0);
    }
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

pub fn parse_quantity(input: &str) -> Option<u64> {
    let s = input.trim();
    if s.is_empty() {
        return Some(0);
    }
    s.parse().ok()
}

pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Amount as written to the sheet, in the shortest round-trip form: integral
/// values keep one decimal (`150.0`), magnitudes from 1e16 up or below 1e-4
/// switch to exponent notation with a signed two digit exponent (`1e+16`, `1e-05`).
pub fn amount_cell(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        format!("{mantissa}e{sign}{digits:0>2}")
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Brazilian currency display, e.g. `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (int_part, frac_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, c) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

// -------------------------------- Forms ----------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Amount,
    Quantity,
    Date,
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct Field {
    #[setters(skip)]
    pub label: &'static str,
    pub kind: FieldKind,
    #[setters(skip)]
    pub input: Inputter,
    #[setters(skip)]
    pub choice: usize,
}

impl Field {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            kind: FieldKind::Text,
            input: Inputter::default(),
            choice: 0,
        }
    }

    /// Current value as entered, or the selected option of a choice field.
    pub fn value(&self) -> &str {
        match self.kind {
            FieldKind::Choice(options) => options.get(self.choice).copied().unwrap_or(""),
            _ => self.input.value(),
        }
    }

    fn cycle(&mut self, step: isize) {
        if let FieldKind::Choice(options) = self.kind
            && !options.is_empty()
        {
            let len = options.len() as isize;
            self.choice = (self.choice as isize + step).rem_euclid(len) as usize;
        }
    }

    fn error(&self, message: &str) -> FormError {
        FormError {
            field: self.label.to_string(),
            message: message.to_string(),
        }
    }

    fn amount(&self) -> Result<f64, FormError> {
        parse_amount(self.value()).ok_or_else(|| self.error("valor inválido"))
    }

    fn quantity(&self) -> Result<u64, FormError> {
        parse_quantity(self.value()).ok_or_else(|| self.error("quantidade inválida"))
    }

    fn date(&self) -> Result<NaiveDate, FormError> {
        parse_date(self.value()).ok_or_else(|| self.error("use o formato DD/MM/AAAA"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormKind {
    Payable,
    CashFlow,
    StockItem(InventoryCategory),
    Order,
}

/// A row ready to be appended.
#[derive(Debug, PartialEq)]
pub struct PendingRow {
    pub tab: &'static str,
    pub values: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum FormEvent {
    Continue,
    Submit,
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focused: usize,
}

impl Form {
    pub fn new(kind: FormKind, today: NaiveDate) -> Self {
        let fields = match kind {
            FormKind::Payable => vec![
                Field::text("Descrição da Despesa"),
                Field::text("Valor (R$)").with_kind(FieldKind::Amount),
                Field::text("Vencimento").with_kind(FieldKind::Date),
            ],
            FormKind::CashFlow => vec![
                Field::text("Tipo").with_kind(FieldKind::Choice(CASH_FLOW_TYPES)),
                Field::text("Valor R$").with_kind(FieldKind::Amount),
                Field::text("Descrição"),
            ],
            FormKind::StockItem(_) => vec![
                Field::text("Nome do Item"),
                Field::text("Quantidade Inicial").with_kind(FieldKind::Quantity),
            ],
            FormKind::Order => vec![
                Field::text("Nº Pedido"),
                Field::text("Cliente"),
                Field::text("Produto"),
                Field::text("Valor Total").with_kind(FieldKind::Amount),
            ],
        };
        let mut form = Self {
            kind,
            fields,
            focused: 0,
        };
        form.clear(today);
        form
    }

    /// The form shown on a screen, if it has one.
    pub fn for_screen(
        screen: Screen,
        section: FinancialSection,
        category: InventoryCategory,
        today: NaiveDate,
    ) -> Option<Self> {
        let kind = match (screen, section) {
            (Screen::Financial, FinancialSection::Payables) => FormKind::Payable,
            (Screen::Financial, FinancialSection::CashFlow) => FormKind::CashFlow,
            (Screen::Inventory, _) => FormKind::StockItem(category),
            (Screen::Orders, _) => FormKind::Order,
            _ => return None,
        };
        Some(Self::new(kind, today))
    }

    pub fn title(&self) -> String {
        match self.kind {
            FormKind::Payable => "Registrar Conta a Pagar".to_string(),
            FormKind::CashFlow => "Registrar Entrada/Saída Avulsa".to_string(),
            FormKind::StockItem(category) => format!("Adicionar item em {}", category.tab()),
            FormKind::Order => "Cadastrar Novo Pedido".to_string(),
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.kind {
            FormKind::Payable => "Salvar Conta",
            FormKind::CashFlow => "Lançar no Caixa",
            FormKind::StockItem(_) => "Adicionar",
            FormKind::Order => "Cadastrar Pedido",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self.kind {
            FormKind::Payable => "Salvo!",
            FormKind::CashFlow => "Lançado!",
            FormKind::StockItem(_) => "Item adicionado!",
            FormKind::Order => "Pedido Cadastrado!",
        }
    }

    /// Cash flow entries are listed before their form, the other screens put the form first.
    pub fn below_table(&self) -> bool {
        self.kind == FormKind::CashFlow
    }

    /// Resets every field. Date fields start on `today`.
    pub fn clear(&mut self, today: NaiveDate) {
        for field in self.fields.iter_mut() {
            field.input.clear();
            field.choice = 0;
            if field.kind == FieldKind::Date {
                field.input.set(&today.format(DATE_FORMAT).to_string());
            }
        }
        self.focused = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        let count = self.fields.len();
        match key.code {
            KeyCode::Enter => return FormEvent::Submit,
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Tab | KeyCode::Down => self.focused = (self.focused + 1) % count.max(1),
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = (self.focused + count.max(1) - 1) % count.max(1)
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    match (field.kind, key.code) {
                        (FieldKind::Choice(_), KeyCode::Left) => field.cycle(-1),
                        (FieldKind::Choice(_), KeyCode::Right | KeyCode::Char(' ')) => {
                            field.cycle(1)
                        }
                        (FieldKind::Choice(_), _) => {}
                        _ => field.input.read(key),
                    }
                }
            }
        }
        trace!("Form {:?}: focused field {}", self.kind, self.focused);
        FormEvent::Continue
    }

    fn field(&self, idx: usize) -> &Field {
        &self.fields[idx]
    }

    /// Converts the entered values into the row layout of the target tab.
    pub fn to_row(&self, today: NaiveDate) -> Result<PendingRow, FormError> {
        let text = |idx: usize| self.field(idx).value().to_string();
        let row = match self.kind {
            FormKind::Payable => PendingRow {
                tab: TAB_PAYABLES,
                values: vec![
                    text(0),
                    amount_cell(self.field(1).amount()?),
                    self.field(2).date()?.format(DATE_FORMAT).to_string(),
                    STATUS_PENDING.to_string(),
                ],
            },
            FormKind::CashFlow => {
                let kind = text(0);
                let amount = amount_cell(self.field(1).amount()?);
                let (entry, exit) = if kind == CASH_FLOW_TYPES[0] {
                    (amount, String::new())
                } else {
                    (String::new(), amount)
                };
                PendingRow {
                    tab: TAB_CASH_FLOW,
                    values: vec![
                        today.format(DATE_FORMAT).to_string(),
                        kind,
                        text(2),
                        entry,
                        exit,
                        String::new(),
                    ],
                }
            }
            FormKind::StockItem(category) => PendingRow {
                tab: category.tab(),
                values: vec![text(0), self.field(1).quantity()?.to_string()],
            },
            FormKind::Order => PendingRow {
                tab: TAB_ORDERS,
                values: vec![
                    text(0),
                    text(1),
                    text(2),
                    amount_cell(self.field(3).amount()?),
                    STATUS_PENDING.to_string(),
                    String::new(),
                ],
            },
        };
        Ok(row)
    }
}

// ------------------------------ Dashboard --------------------------------- //

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardMetrics {
    pub payables_pending: f64,
    pub orders_pending: usize,
    pub critical_stock: Option<String>,
}

/// Column by header name, or else the tab column an appended row writes it to.
fn column(view: &TabularView, name: &str, position: usize) -> Option<usize> {
    view.position(name).or_else(|| view.source_column(position))
}

fn is_pending(cell: Option<&str>) -> bool {
    cell.is_some_and(|s| s.trim().eq_ignore_ascii_case(STATUS_PENDING))
}

impl DashboardMetrics {
    pub fn compute(payables: &TabularView, orders: &TabularView, stock: &TabularView) -> Self {
        let mut metrics = DashboardMetrics::default();

        if let (Some(amount), Some(status)) = (
            column(payables, "Valor", 1),
            column(payables, "Status", 3),
        ) {
            metrics.payables_pending = (0..payables.height())
                .filter(|&r| is_pending(payables.cell(r, status)))
                .filter_map(|r| payables.cell(r, amount).and_then(parse_amount))
                .sum();
        }

        if let Some(status) = column(orders, "Status", 4) {
            metrics.orders_pending = (0..orders.height())
                .filter(|&r| is_pending(orders.cell(r, status)))
                .count();
        }

        if let (Some(name), Some(quantity)) =
            (column(stock, "Item", 0), column(stock, "Quantidade", 1))
        {
            metrics.critical_stock = (0..stock.height())
                .filter_map(|r| {
                    let qty = stock.cell(r, quantity).and_then(parse_amount)?;
                    let item = stock.cell(r, name).filter(|s| !s.trim().is_empty())?;
                    Some((qty, item))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, item)| item.to_string());
        }

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::crossterm::event::KeyModifiers;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn view(rows: &[&[&str]]) -> TabularView {
        TabularView::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn amounts_are_parsed_in_both_notations() {
        assert_eq!(parse_amount("150"), Some(150.0));
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("R$ 450,00"), Some(450.0));
        assert_eq!(parse_amount(""), Some(0.0));
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn amount_cells_match_sheet_layout() {
        assert_eq!(amount_cell(150.0), "150.0");
        assert_eq!(amount_cell(12.5), "12.5");
        assert_eq!(amount_cell(0.0), "0.0");
        assert_eq!(amount_cell(0.0001), "0.0001");
        assert_eq!(amount_cell(9_999_999_999_999_998.0), "9999999999999998.0");
    }

    #[test]
    fn extreme_amounts_use_exponent_notation() {
        assert_eq!(amount_cell(1e16), "1e+16");
        assert_eq!(amount_cell(2.5e20), "2.5e+20");
        assert_eq!(amount_cell(1e-5), "1e-05");
        assert_eq!(amount_cell(1.5e-7), "1.5e-07");
        assert_eq!(amount_cell(1e100), "1e+100");
    }

    #[test]
    fn brl_formatting_groups_thousands() {
        assert_eq!(format_brl(450.0), "R$ 450,00");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1234567.0), "R$ 1.234.567,00");
        assert_eq!(format_brl(0.0), "R$ 0,00");
    }

    #[test]
    fn payable_row_layout() {
        let mut form = Form::new(FormKind::Payable, today());
        type_str(&mut form, "Madeira");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "320,5");
        form.handle_key(key(KeyCode::Tab));
        for _ in 0..10 {
            form.handle_key(key(KeyCode::Backspace));
        }
        type_str(&mut form, "10/04/2024");

        let row = form.to_row(today()).unwrap();

        assert_eq!(row.tab, TAB_PAYABLES);
        assert_eq!(row.values, vec!["Madeira", "320.5", "10/04/2024", "Pendente"]);
    }

    #[test]
    fn due_date_defaults_to_today() {
        let form = Form::new(FormKind::Payable, today());
        assert_eq!(form.fields[2].value(), "05/03/2024");
        assert_eq!(form.to_row(today()).unwrap().values[2], "05/03/2024");
    }

    #[test]
    fn cash_flow_entry_row_layout() {
        let mut form = Form::new(FormKind::CashFlow, today());
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "150");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "Venda mesa");

        let row = form.to_row(today()).unwrap();

        assert_eq!(row.tab, TAB_CASH_FLOW);
        assert_eq!(
            row.values,
            vec!["05/03/2024", "Entrada", "Venda mesa", "150.0", "", ""]
        );
    }

    #[test]
    fn cash_flow_exit_goes_to_exit_column() {
        let mut form = Form::new(FormKind::CashFlow, today());
        form.handle_key(key(KeyCode::Right));
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "12.5");

        let row = form.to_row(today()).unwrap();

        assert_eq!(row.values[1], "Saída");
        assert_eq!(row.values[3], "");
        assert_eq!(row.values[4], "12.5");
    }

    #[test]
    fn stock_item_goes_to_selected_category() {
        let mut form = Form::new(FormKind::StockItem(InventoryCategory::Parts), today());
        type_str(&mut form, "Dobradiça");
        form.handle_key(key(KeyCode::Down));
        type_str(&mut form, "12");

        let row = form.to_row(today()).unwrap();

        assert_eq!(
            row,
            PendingRow {
                tab: TAB_PARTS,
                values: vec!["Dobradiça".to_string(), "12".to_string()],
            }
        );
    }

    #[test]
    fn order_row_layout() {
        let mut form = Form::new(FormKind::Order, today());
        for value in ["42", "Ana", "Mesa de centro", "1.200,00"] {
            type_str(&mut form, value);
            form.handle_key(key(KeyCode::Tab));
        }
        assert_eq!(form.focused, 0);

        let row = form.to_row(today()).unwrap();

        assert_eq!(row.tab, TAB_ORDERS);
        assert_eq!(
            row.values,
            vec!["42", "Ana", "Mesa de centro", "1200.0", "Pendente", ""]
        );
    }

    #[test]
    fn invalid_input_names_the_field() {
        let mut form = Form::new(FormKind::StockItem(InventoryCategory::RawMaterials), today());
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "muito");

        let err = form.to_row(today()).unwrap_err();

        assert_eq!(err.field, "Quantidade Inicial");
    }

    #[test]
    fn enter_and_escape_end_editing() {
        let mut form = Form::new(FormKind::Order, today());
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancel);
        assert_eq!(form.handle_key(key(KeyCode::BackTab)), FormEvent::Continue);
        assert_eq!(form.focused, 3);
    }

    #[test]
    fn screens_without_forms() {
        for screen in [Screen::Dashboard, Screen::Shipping] {
            assert!(
                Form::for_screen(screen, Default::default(), Default::default(), today()).is_none()
            );
        }
        let form = Form::for_screen(
            Screen::Financial,
            FinancialSection::CashFlow,
            InventoryCategory::default(),
            today(),
        )
        .unwrap();
        assert!(form.below_table());
    }

    #[test]
    fn dashboard_metrics_from_named_columns() {
        let payables = view(&[
            &["Descrição", "Valor", "Vencimento", "Status"],
            &["Luz", "150.0", "10/03/2024", "Pendente"],
            &["Cola", "300,00", "11/03/2024", "pendente"],
            &["Água", "80.0", "01/03/2024", "Pago"],
        ]);
        let orders = view(&[
            &["Nº", "Cliente", "Produto", "Valor", "Status", ""],
            &["1", "Ana", "Mesa", "10", "Pendente", ""],
            &["2", "Bia", "Cadeira", "10", "Entregue", ""],
            &["3", "Caio", "Banco", "10", "Pendente", ""],
        ]);
        let stock = view(&[
            &["Item", "Quantidade"],
            &["Pinus 20mm", "3"],
            &["MDF 15mm", "12"],
            &["Cola", "?"],
        ]);

        let metrics = DashboardMetrics::compute(&payables, &orders, &stock);

        assert_eq!(
            metrics,
            DashboardMetrics {
                payables_pending: 450.0,
                orders_pending: 2,
                critical_stock: Some("Pinus 20mm".to_string()),
            }
        );
    }

    #[test]
    fn dashboard_metrics_fall_back_to_positions() {
        let payables = view(&[&["A", "B", "C", "D"], &["x", "10.0", "", "Pendente"]]);
        let orders = view(&[&["A", "B", "C", "D", "E"], &["1", "", "", "", "Pendente"]]);
        let stock = view(&[&["Nome", "Qtd"], &["Verniz", "1"]]);

        let metrics = DashboardMetrics::compute(&payables, &orders, &stock);

        assert_eq!(metrics.payables_pending, 10.0);
        assert_eq!(metrics.orders_pending, 1);
        assert_eq!(metrics.critical_stock.as_deref(), Some("Verniz"));
    }

    #[test]
    fn positional_fallback_skips_blank_columns() {
        // Appended payables land in tab columns 0..4; column 2 has no name.
        let payables = view(&[
            &["Conta", "Quanto", "", "Situação", "Notas"],
            &["Luz", "150.0", "10/03/2024", "Pendente", "Pago"],
            &["Cola", "300.0", "11/03/2024", "Pago", "Pendente"],
        ]);
        let orders = view(&[&["A", "", "C", "D", "E"], &["1", "", "", "", "Pendente"]]);

        let metrics = DashboardMetrics::compute(&payables, &orders, &TabularView::empty());

        assert_eq!(metrics.payables_pending, 150.0);
        assert_eq!(metrics.orders_pending, 1);
    }

    #[test]
    fn dashboard_metrics_of_empty_views() {
        let empty = TabularView::empty();
        assert_eq!(
            DashboardMetrics::compute(&empty, &empty, &empty),
            DashboardMetrics::default()
        );
    }
}
