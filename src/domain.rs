use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use clap::Parser;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use tracing::warn;

use crate::navigation::Screen;

pub const SPREADSHEET_ID: &str = "1vOjr5SnrTHHf6lV5pP73nyfl42QwWiahw25lvHFCKnw";

pub const TAB_PRODUCTION: &str = "Producao_OP";
pub const TAB_PAYABLES: &str = "Financeiro_Pagar";
pub const TAB_CASH_FLOW: &str = "Fluxo_Caixa";
pub const TAB_RAW_MATERIALS: &str = "Estoque_MP";
pub const TAB_PARTS: &str = "Estoque_Pecas";
pub const TAB_ORDERS: &str = "Pedidos";
pub const TAB_SHIPPING: &str = "Expedicao";

pub const HELP_TEXT: &str = "\
Navegação
  1..5        Dashboard / Financeiro / Estoque / Pedidos / Expedição
  b           Voltar ao Dashboard
  Tab         Alternar foco: menu > tabela > formulário
  j/k ↑/↓     Mover seleção
  PgUp/PgDn   Rolar tabela
  Enter       Abrir tela do menu / editar formulário
  c           Trocar seção (Financeiro) ou categoria (Estoque)
  r           Recarregar dados
  y           Copiar linha selecionada
  ?           Ajuda
  q           Sair

Formulário
  Tab/↓ ↑     Próximo / campo anterior
  ←/→         Alternar opção
  Enter       Salvar
  Esc         Sair do formulário
";

/// Command line configuration of the dashboard.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Painel de gestão Helipe Ateliê")]
pub struct HelipeConfig {
    /// Secret configuration (TOML) that may hold a [gcp_service_account] table
    #[arg(long, default_value = ".streamlit/secrets.toml")]
    pub secrets: String,

    /// Service account credential file used when no secret entry is present
    #[arg(long, default_value = "credenciais.json")]
    pub credentials: String,

    /// Identifier of the spreadsheet document
    #[arg(long, default_value = SPREADSHEET_ID)]
    pub spreadsheet_id: String,

    /// Use a directory of <tab>.csv files instead of the remote spreadsheet
    #[arg(long)]
    pub workbook: Option<String>,

    #[arg(long, default_value = "helipe.log")]
    pub log_file: String,

    #[arg(long, default_value_t = 100)]
    pub event_poll_ms: u64,

    #[arg(long, default_value_t = 40)]
    pub max_column_width: usize,
}

impl Default for HelipeConfig {
    fn default() -> Self {
        Self {
            secrets: ".streamlit/secrets.toml".to_string(),
            credentials: "credenciais.json".to_string(),
            spreadsheet_id: SPREADSHEET_ID.to_string(),
            workbook: None,
            log_file: "helipe.log".to_string(),
            event_poll_ms: 100,
            max_column_width: 40,
        }
    }
}

/// Expands `~` and environment variables. Falls back to the raw path if a variable is undefined.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            warn!("Could not expand path {raw:?}: {e}");
            PathBuf::from(raw)
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Quit,
    Navigate(Screen),
    Back,
    FocusNext,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    Enter,
    Exit,
    Refresh,
    NextSection,
    CopyRow,
    Help,
    RawKey(KeyEvent),
}

/// Failures of the backing tabular store.
#[derive(Debug)]
pub enum StoreError {
    Http(reqwest::Error),
    Api { status: u16, message: String },
    Auth(String),
    TabNotFound(String),
    InvalidRequest(String),
    IoError(Error),
    PolarsError(PolarsError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(e) => write!(f, "HTTP request failed: {e}"),
            StoreError::Api { status, message } => write!(f, "API error {status}: {message}"),
            StoreError::Auth(e) => write!(f, "authentication failed: {e}"),
            StoreError::TabNotFound(tab) => write!(f, "worksheet not found: {tab}"),
            StoreError::InvalidRequest(e) => write!(f, "invalid request: {e}"),
            StoreError::IoError(e) => write!(f, "{e}"),
            StoreError::PolarsError(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Http(err)
    }
}

impl From<Error> for StoreError {
    fn from(err: Error) -> Self {
        StoreError::IoError(err)
    }
}

impl From<PolarsError> for StoreError {
    fn from(err: PolarsError) -> Self {
        StoreError::PolarsError(err)
    }
}

/// The store could not be reached or authenticated. The app keeps running without data.
#[derive(Debug)]
pub enum ConnectionError {
    Secrets { path: PathBuf, message: String },
    CredentialsFile { path: PathBuf, source: Error },
    InvalidCredentials { origin: String, message: String },
    Runtime(Error),
    Auth(String),
    Open(StoreError),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::Secrets { path, message } => {
                write!(f, "invalid secrets file {}: {message}", path.display())
            }
            ConnectionError::CredentialsFile { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConnectionError::InvalidCredentials { origin, message } => {
                write!(f, "invalid credentials in {origin}: {message}")
            }
            ConnectionError::Runtime(e) => write!(f, "cannot start runtime: {e}"),
            ConnectionError::Auth(e) => write!(f, "authentication failed: {e}"),
            ConnectionError::Open(e) => write!(f, "cannot open spreadsheet: {e}"),
        }
    }
}

impl From<StoreError> for ConnectionError {
    fn from(err: StoreError) -> Self {
        ConnectionError::Open(err)
    }
}

/// A single tab could not be read. Contained per tab, never aborts rendering.
#[derive(Debug)]
pub struct TabReadError {
    pub tab: String,
    pub source: StoreError,
}

impl fmt::Display for TabReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Erro ao ler aba {}: {}", self.tab, self.source)
    }
}

#[derive(Debug)]
pub enum StoreWriteError {
    NotConnected,
    Backend { tab: String, source: StoreError },
}

impl fmt::Display for StoreWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreWriteError::NotConnected => write!(f, "Erro ao salvar: planilha não conectada"),
            StoreWriteError::Backend { tab, source } => {
                write!(f, "Erro ao salvar na aba {tab}: {source}")
            }
        }
    }
}

#[derive(Debug)]
pub enum HelipeError {
    IoError(Error),
    Logging(String),
}

impl From<Error> for HelipeError {
    fn from(err: Error) -> Self {
        HelipeError::IoError(err)
    }
}
