//! Use-case catalog produced by the use-case agent.

use serde::{Deserialize, Serialize};

/// The catalog of identified use cases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UseCaseCatalog {
    /// All identified use cases.
    #[serde(default)]
    pub all_use_cases: Vec<UseCase>,

    /// Number of use cases in the catalog.
    #[serde(default)]
    pub total_count: u32,
}

impl UseCaseCatalog {
    /// Parses an agent response, falling back to an empty catalog.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::error!(error = %err, "use-case agent output was not valid JSON, using empty catalog");
                Self::default()
            }
        }
    }

    /// Returns the use cases relevant to one entity, capped at `limit`.
    ///
    /// Relevance is a simple containment heuristic, not a ranking: a use
    /// case matches when its identifier contains the upper-cased entity
    /// name or its required data references the entity.
    #[must_use]
    pub fn related_to(&self, entity: &str, limit: usize) -> Vec<&UseCase> {
        let marker = entity.to_uppercase();
        self.all_use_cases
            .iter()
            .filter(|uc| {
                uc.uc_id.contains(&marker)
                    || uc.data_required.iter().any(|d| d == entity)
            })
            .take(limit)
            .collect()
    }
}

/// One use case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UseCase {
    /// Use-case identifier (e.g. `UC_FOURNISSEURS_01`).
    pub uc_id: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Tables whose data this use case needs.
    #[serde(default)]
    pub data_required: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> UseCaseCatalog {
        UseCaseCatalog {
            all_use_cases: vec![
                UseCase {
                    uc_id: "UC_FOURNISSEURS_01".to_string(),
                    description: "Créer un fournisseur".to_string(),
                    data_required: vec!["Fournisseurs".to_string()],
                },
                UseCase {
                    uc_id: "UC_PRODUITS_01".to_string(),
                    description: "Lister les produits".to_string(),
                    data_required: vec!["Produits".to_string(), "Fournisseurs".to_string()],
                },
                UseCase {
                    uc_id: "UC_GLOBAL_01".to_string(),
                    description: "Vue d'ensemble".to_string(),
                    data_required: vec![],
                },
            ],
            total_count: 3,
        }
    }

    #[test]
    fn test_parse_failure_yields_empty_default() {
        let catalog = UseCaseCatalog::parse_or_default("<html>");
        assert!(catalog.all_use_cases.is_empty());
        assert_eq!(catalog.total_count, 0);
    }

    #[test]
    fn test_related_matches_uc_id_and_data_required() {
        let catalog = catalog();
        let related = catalog.related_to("Fournisseurs", 5);
        let ids: Vec<&str> = related.iter().map(|uc| uc.uc_id.as_str()).collect();
        assert_eq!(ids, vec!["UC_FOURNISSEURS_01", "UC_PRODUITS_01"]);
    }

    #[test]
    fn test_related_respects_limit() {
        let catalog = catalog();
        assert_eq!(catalog.related_to("Fournisseurs", 1).len(), 1);
    }

    #[test]
    fn test_related_no_match() {
        let catalog = catalog();
        assert!(catalog.related_to("Commandes", 5).is_empty());
    }
}
