//! Page navigation: the fixed page set, the parent map, and the per-session
//! state machine that tracks the current page.

use std::fmt;
use std::str::FromStr;

/// Countries with an individual analysis page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Nepal,
    Estonia,
    SierraLeone,
    Usa,
}

impl Country {
    pub const ALL: [Country; 4] = [
        Country::Nepal,
        Country::Estonia,
        Country::SierraLeone,
        Country::Usa,
    ];

    /// ISO alpha-3 code used in the `country_id` column.
    pub fn code(&self) -> &'static str {
        match self {
            Country::Nepal => "NPL",
            Country::Estonia => "EST",
            Country::SierraLeone => "SLE",
            Country::Usa => "USA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::Nepal => "Nepal",
            Country::Estonia => "Estonia",
            Country::SierraLeone => "Sierra Leone",
            Country::Usa => "USA",
        }
    }

    /// Theme color key for this country's chart series.
    pub fn color_key(&self) -> &'static str {
        match self {
            Country::Nepal => "country_nepal",
            Country::Estonia => "country_estonia",
            Country::SierraLeone => "country_sierra_leone",
            Country::Usa => "country_usa",
        }
    }

    /// Country for a `country_id` code, if it is one of the dashboard's four.
    pub fn from_code(code: &str) -> Option<Country> {
        Country::ALL.iter().copied().find(|c| c.code() == code)
    }
}

/// The fixed set of pages. Adding a page means adding a variant here and a
/// handler arm in the App, not another chain of string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Individual,
    Cross,
    Country(Country),
}

impl Page {
    /// Parent used by back-navigation. Home has no parent.
    pub fn parent(&self) -> Option<Page> {
        match self {
            Page::Home => None,
            Page::Individual | Page::Cross => Some(Page::Home),
            Page::Country(_) => Some(Page::Individual),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Page::Home => "Home".to_string(),
            Page::Individual => "Individual Analysis".to_string(),
            Page::Cross => "Cross-country Analysis".to_string(),
            Page::Country(country) => format!("{} Analysis", country.name()),
        }
    }

    /// Parse a user-facing page name. Names are matched case-insensitively;
    /// anything outside the fixed set fails with [`UnknownPageError`].
    pub fn from_name(name: &str) -> Result<Page, UnknownPageError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Page::Home),
            "individual" => Ok(Page::Individual),
            "cross" => Ok(Page::Cross),
            "nepal" => Ok(Page::Country(Country::Nepal)),
            "estonia" => Ok(Page::Country(Country::Estonia)),
            "sierra leone" => Ok(Page::Country(Country::SierraLeone)),
            "usa" => Ok(Page::Country(Country::Usa)),
            _ => Err(UnknownPageError {
                name: name.to_string(),
            }),
        }
    }
}

impl FromStr for Page {
    type Err = UnknownPageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::from_name(s)
    }
}

/// A page name outside the fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPageError {
    pub name: String,
}

impl fmt::Display for UnknownPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown page '{}' (expected home, individual, cross, or a country name)",
            self.name
        )
    }
}

impl std::error::Error for UnknownPageError {}

/// Per-session navigation state. Starts at home and is mutated only by
/// explicit `goto`/`back` calls; owned by the App rather than hidden in a
/// global so the transitions are testable in isolation.
#[derive(Debug, Default)]
pub struct Nav {
    current: Page,
}

impl Nav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn goto(&mut self, page: Page) {
        self.current = page;
    }

    /// Move to the parent page. No-op on home.
    pub fn back(&mut self) {
        if let Some(parent) = self.current.parent() {
            self.current = parent;
        }
    }

    pub fn is_home(&self) -> bool {
        self.current == Page::Home
    }
}
