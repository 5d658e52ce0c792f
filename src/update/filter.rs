//! Dependency filter configuration
//!
//! This module provides the DependencyFilter struct that restricts which
//! declared dependencies are checked for updates.

use crate::domain::Dependency;

/// Allow-lists for repositories and dependency names
#[derive(Debug, Clone, Default)]
pub struct DependencyFilter {
    /// Repository substrings (empty means all)
    pub repositories: Vec<String>,
    /// Dependency name substrings (empty means all)
    pub dependency_names: Vec<String>,
}

impl DependencyFilter {
    /// Create a new DependencyFilter that retains everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Set repository terms
    pub fn with_repositories(mut self, repositories: Vec<String>) -> Self {
        self.repositories = normalize_terms(repositories);
        self
    }

    /// Set dependency name terms
    pub fn with_dependency_names(mut self, names: Vec<String>) -> Self {
        self.dependency_names = normalize_terms(names);
        self
    }

    /// Returns true if no restriction is configured
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.dependency_names.is_empty()
    }

    /// Check a dependency against every non-empty list
    pub fn matches(&self, dependency: &Dependency) -> bool {
        contains_any(&self.repositories, &dependency.repository)
            && contains_any(&self.dependency_names, &dependency.name)
    }

    /// Retain the dependencies that match, preserving order
    pub fn apply(&self, dependencies: Vec<Dependency>) -> Vec<Dependency> {
        if self.is_empty() {
            return dependencies;
        }
        dependencies
            .into_iter()
            .filter(|dep| self.matches(dep))
            .collect()
    }
}

fn normalize_terms(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn contains_any(terms: &[String], field: &str) -> bool {
    if terms.is_empty() {
        return true;
    }
    let field = field.trim().to_lowercase();
    terms.iter().any(|term| field.contains(term.as_str()))
}
