//! Core data type definitions

use serde::{Deserialize, Serialize};

/// Platform role; gates content visibility and available actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Founder,
    Investor,
    Mentor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Founder, Role::Investor, Role::Mentor];

    /// Capitalized name for display
    pub fn label(&self) -> &'static str {
        match self {
            Role::Founder => "Founder",
            Role::Investor => "Investor",
            Role::Mentor => "Mentor",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Founder => "founder",
            Role::Investor => "investor",
            Role::Mentor => "mentor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "founder" => Ok(Role::Founder),
            "investor" => Ok(Role::Investor),
            "mentor" => Ok(Role::Mentor),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Colour theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}
