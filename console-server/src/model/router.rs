//! Dashboard view routing

use async_graphql::Enum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Unknown section {0}")]
    UnknownSection(String),
}

/// Dashboard section, exactly one is visible at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Users,
    Products,
    Orders,
    Analytics,
    Settings,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Self::Dashboard,
        Self::Users,
        Self::Products,
        Self::Orders,
        Self::Analytics,
        Self::Settings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Users => "users",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Analytics => "analytics",
            Self::Settings => "settings",
        }
    }

    /// Page title shown while the section is active
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "User management",
            Self::Products => "Product management",
            Self::Orders => "Order management",
            Self::Analytics => "Analytics",
            Self::Settings => "Settings",
        }
    }

    /// Whether entering the section requires loading its data
    pub fn loads_data(self) -> bool {
        matches!(
            self,
            Self::Users | Self::Products | Self::Orders | Self::Analytics
        )
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| Error::UnknownSection(s.to_owned()))
    }
}

/// Receives section data load requests
pub trait SectionLoader {
    fn load(&mut self, section: Section);
}

/// Keeps track of the visible section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRouter {
    current: Section,
}

impl ViewRouter {
    /// Router starting on the dashboard
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn title(&self) -> &'static str {
        self.current.title()
    }

    /// Makes `target` the visible section and loads its data
    ///
    /// Switching to the section which is already visible is a regular transition, and the data
    /// are loaded again.
    pub fn switch_section(&mut self, target: Section, loader: &mut impl SectionLoader) {
        debug!(from = %self.current, to = %target, "Switching section");
        self.current = target;
        self.reload(loader);
    }

    /// Loads the data of the visible section again
    pub fn reload(&self, loader: &mut impl SectionLoader) {
        if self.current.loads_data() {
            loader.load(self.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every load request
    #[derive(Debug, Default)]
    struct Loads(Vec<Section>);

    impl SectionLoader for Loads {
        fn load(&mut self, section: Section) {
            self.0.push(section);
        }
    }

    #[test]
    fn starts_on_dashboard() {
        let router = ViewRouter::new();
        assert_eq!(router.current(), Section::Dashboard);
        assert_eq!(router.title(), "Dashboard");
    }

    #[test]
    fn reentering_section_loads_again() {
        let mut router = ViewRouter::new();
        let mut loads = Loads::default();

        router.switch_section(Section::Users, &mut loads);
        router.switch_section(Section::Users, &mut loads);

        assert_eq!(router.current(), Section::Users);
        assert_eq!(loads.0, vec![Section::Users, Section::Users]);
    }

    #[test]
    fn only_data_sections_load() {
        let mut router = ViewRouter::new();
        let mut loads = Loads::default();

        for section in Section::ALL {
            router.switch_section(section, &mut loads);
            assert_eq!(router.current(), section);
        }

        assert_eq!(
            loads.0,
            vec![
                Section::Users,
                Section::Products,
                Section::Orders,
                Section::Analytics
            ]
        );
        assert_eq!(router.title(), "Settings");
    }

    #[test]
    fn reload_current_section() {
        let mut router = ViewRouter::new();
        let mut loads = Loads::default();

        router.reload(&mut loads);
        assert!(loads.0.is_empty());

        router.switch_section(Section::Orders, &mut loads);
        router.reload(&mut loads);
        assert_eq!(loads.0, vec![Section::Orders, Section::Orders]);
    }

    #[test]
    fn parsing_sections() {
        for section in Section::ALL {
            assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
        }

        assert_eq!(
            "reports".parse::<Section>().unwrap_err(),
            Error::UnknownSection("reports".to_owned())
        );
        // Identifiers are case sensitive
        assert!("Users".parse::<Section>().is_err());
    }
}
