use std::fmt;
use std::str::FromStr;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    Financial,
    Inventory,
    Orders,
    Shipping,
}

impl Screen {
    /// Sidebar order.
    pub const ALL: [Screen; 5] = [
        Screen::Dashboard,
        Screen::Financial,
        Screen::Inventory,
        Screen::Orders,
        Screen::Shipping,
    ];

    /// Session key of the screen, as used by the sidebar buttons.
    pub fn key(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Financial => "Financeiro",
            Screen::Inventory => "Estoque",
            Screen::Orders => "Pedidos",
            Screen::Shipping => "Expedicao",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Dashboard => "📊 Dashboard",
            Screen::Financial => "💰 Financeiro",
            Screen::Inventory => "📦 Estoque & Produção",
            Screen::Orders => "📋 Pedidos",
            Screen::Shipping => "🚚 Expedição",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "🌿 Painel de Controle Helipe",
            Screen::Financial => "💰 Gestão Financeira",
            Screen::Inventory => "📦 Marcenaria - Estoque",
            Screen::Orders => "📋 Pedidos",
            Screen::Shipping => "🚚 Expedição e Logística",
        }
    }

    pub fn index(&self) -> usize {
        Screen::ALL.iter().position(|s| s == self).unwrap_or(0)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, PartialEq)]
pub struct UnknownScreen(pub String);

impl FromStr for Screen {
    type Err = UnknownScreen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.key() == s)
            .ok_or_else(|| UnknownScreen(s.to_string()))
    }
}

/// Per-session screen selector. Any screen is reachable from any other.
#[derive(Debug, Default)]
pub struct Navigation {
    current_screen: Screen,
}

impl Navigation {
    pub fn current(&self) -> Screen {
        self.current_screen
    }

    pub fn navigate(&mut self, screen: Screen) {
        debug!("Navigate {} -> {}", self.current_screen, screen);
        self.current_screen = screen;
    }
}
