// src/llm/taxonomy.rs

//! The fixed severity/category/priority taxonomy. The system prompt and the
//! response schema are both generated from these enums, so the guideline text
//! the model sees and the values the validator accepts cannot drift apart.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }

    /// Guideline sentence embedded verbatim in the system prompt.
    pub fn guideline(&self) -> &'static str {
        match self {
            Severity::Critical => "Breaks production, data loss, security breach",
            Severity::High => "Major feature broken, significant performance impact",
            Severity::Medium => "Minor feature broken, inconvenience, cosmetic issues",
            Severity::Low => "Documentation, typos, future improvements",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bug,
    Feature,
    Docs,
    Refactor,
    Chore,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Bug,
        Category::Feature,
        Category::Docs,
        Category::Refactor,
        Category::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::Feature => "feature",
            Category::Docs => "docs",
            Category::Refactor => "refactor",
            Category::Chore => "chore",
        }
    }

    pub fn guideline(&self) -> &'static str {
        match self {
            Category::Bug => "Something is broken",
            Category::Feature => "New functionality request",
            Category::Docs => "Documentation improvements",
            Category::Refactor => "Code quality improvements",
            Category::Chore => "Maintenance tasks (deps, tooling, etc.)",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    P0,
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::P0,
        Priority::P1,
        Priority::P2,
        Priority::P3,
        Priority::P4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
        }
    }

    pub fn guideline(&self) -> &'static str {
        match self {
            Priority::P0 => "Fix immediately (production down)",
            Priority::P1 => "Fix this sprint (blocking other work)",
            Priority::P2 => "Fix soon (affects users)",
            Priority::P3 => "Fix when possible (nice to have)",
            Priority::P4 => "Backlog (maybe never)",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s).ok_or(())
    }
}
