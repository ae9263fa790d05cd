//! Action strategies

use super::Action;
use crate::catalog::{TechniqueCatalog, TechniqueSelector};
use crate::core::error::DomainError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configured strategy for a participant.
///
/// ```toml
/// [participants.strategy]
/// name = "therapy"
/// technique = 3        # or -1, "random", "none"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySpec {
    pub name: String,
    #[serde(default)]
    pub technique: TechniqueSelector,
}

impl StrategySpec {
    pub const THERAPY: &'static str = "therapy";
    pub const HUMAN: &'static str = "human";

    pub fn therapy(technique: TechniqueSelector) -> Self {
        Self {
            name: Self::THERAPY.to_string(),
            technique,
        }
    }

    pub fn human() -> Self {
        Self {
            name: Self::HUMAN.to_string(),
            technique: TechniqueSelector::Disabled,
        }
    }
}

/// Produces one action per turn
#[derive(Debug, Clone)]
pub enum ActionStrategy {
    /// Renders therapy directives, drawing techniques from the catalog
    Catalog {
        selector: TechniqueSelector,
        catalog: Arc<TechniqueCatalog>,
    },
    /// Human-operated participant
    Human,
}

impl ActionStrategy {
    /// Build a strategy, validating the technique selector immediately.
    pub fn from_spec(
        spec: &StrategySpec,
        catalog: Arc<TechniqueCatalog>,
    ) -> Result<Self, DomainError> {
        match spec.name.to_lowercase().as_str() {
            StrategySpec::THERAPY => {
                spec.technique.validate(&catalog)?;
                Ok(ActionStrategy::Catalog {
                    selector: spec.technique,
                    catalog,
                })
            }
            StrategySpec::HUMAN => Ok(ActionStrategy::Human),
            _ => Err(DomainError::UnknownStrategy(spec.name.clone())),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, ActionStrategy::Human)
    }

    pub fn sample(&self) -> Action {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Produce an action, drawing random selections from `rng`.
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Action {
        match self {
            ActionStrategy::Catalog { selector, catalog } => {
                let index = match selector {
                    TechniqueSelector::Index(i) => Some(*i),
                    TechniqueSelector::Random => Some(rng.gen_range(0..catalog.len())),
                    TechniqueSelector::Disabled => None,
                };
                Action::Directive {
                    technique: index.and_then(|i| catalog.get(i)).cloned(),
                    catalog: Arc::clone(catalog),
                }
            }
            ActionStrategy::Human => Action::HumanInput,
        }
    }

    /// Short label recorded in the settings snapshot and turn records
    pub fn descriptor(&self) -> String {
        match self {
            ActionStrategy::Catalog { selector, catalog } => match selector {
                TechniqueSelector::Random => "Random".to_string(),
                TechniqueSelector::Disabled => "None".to_string(),
                TechniqueSelector::Index(i) => catalog
                    .get(*i)
                    .map(|t| t.name().to_string())
                    .unwrap_or_else(|| "None".to_string()),
            },
            ActionStrategy::Human => "Human".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use std::collections::HashSet;

    fn catalog() -> Arc<TechniqueCatalog> {
        Arc::new(sample_catalog())
    }

    #[test]
    fn test_fixed_index_sources_that_technique() {
        let strategy =
            ActionStrategy::from_spec(&StrategySpec::therapy(TechniqueSelector::Index(1)), catalog())
                .unwrap();
        for _ in 0..5 {
            assert_eq!(strategy.sample().technique_name(), Some("Logical Appeal"));
        }
        assert_eq!(strategy.descriptor(), "Logical Appeal");
    }

    #[test]
    fn test_random_covers_whole_catalog() {
        let strategy =
            ActionStrategy::from_spec(&StrategySpec::therapy(TechniqueSelector::Random), catalog())
                .unwrap();
        let seen: HashSet<String> = (0..300)
            .filter_map(|_| strategy.sample().technique_name().map(str::to_string))
            .collect();
        assert_eq!(seen.len(), 3);
        assert_eq!(strategy.descriptor(), "Random");
    }

    #[test]
    fn test_disabled_selects_nothing() {
        let strategy = ActionStrategy::from_spec(
            &StrategySpec::therapy(TechniqueSelector::Disabled),
            catalog(),
        )
        .unwrap();
        let action = strategy.sample();
        assert!(!action.is_human());
        assert_eq!(action.technique_name(), None);
        assert_eq!(strategy.descriptor(), "None");
    }

    #[test]
    fn test_out_of_range_index_fails_at_construction() {
        let err =
            ActionStrategy::from_spec(&StrategySpec::therapy(TechniqueSelector::Index(9)), catalog())
                .unwrap_err();
        assert_eq!(err, DomainError::TechniqueOutOfRange { index: 9, len: 3 });
    }

    #[test]
    fn test_human_strategy_yields_sentinel() {
        let strategy = ActionStrategy::from_spec(&StrategySpec::human(), catalog()).unwrap();
        assert!(strategy.is_human());
        assert_eq!(strategy.sample(), Action::HumanInput);
        assert_eq!(strategy.descriptor(), "Human");
    }

    #[test]
    fn test_unknown_strategy_name() {
        let spec = StrategySpec {
            name: "resistant".to_string(),
            technique: TechniqueSelector::Disabled,
        };
        assert_eq!(
            ActionStrategy::from_spec(&spec, catalog()).unwrap_err(),
            DomainError::UnknownStrategy("resistant".to_string())
        );
    }

    #[test]
    fn test_spec_deserializes_with_default_technique() {
        let spec: StrategySpec = serde_json::from_str(r#"{"name": "therapy"}"#).unwrap();
        assert_eq!(spec.technique, TechniqueSelector::Random);
        let spec: StrategySpec =
            serde_json::from_str(r#"{"name": "therapy", "technique": -1}"#).unwrap();
        assert_eq!(spec.technique, TechniqueSelector::Disabled);
    }
}
