use crate::core::selection::Resolved;
use crate::utils::error::{ArchitectError, Result};
use serde::Serialize;

pub const FLAVOR_SYSTEM_PROMPT: &str =
    "You are a technical coffee architect. Use precise, sensory language.";
pub const GUIDE_SYSTEM_PROMPT: &str =
    "You are a coffee engineer. Output in Markdown. Use bold for key metrics.";
pub const SCOUT_SYSTEM_PROMPT: &str =
    "You are a coffee scout. Only recommend highly rated specialty shops.";

pub const CURRENT_LOCATION: &str = "Current Location";

/// Where to look for shops: a typed city, or the device's own position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopLocation {
    City(String),
    Current,
}

impl ShopLocation {
    /// The device flag wins over whatever was typed. Neither is an error.
    pub fn from_input(city: Option<&str>, use_current: bool) -> Result<Self> {
        if use_current {
            return Ok(ShopLocation::Current);
        }
        match city.map(str::trim) {
            Some(c) if !c.is_empty() => Ok(ShopLocation::City(c.to_string())),
            _ => Err(ArchitectError::ValidationError {
                message: "enter a city or use the current location".to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ShopLocation::City(c) => c,
            ShopLocation::Current => CURRENT_LOCATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiAction {
    FlavorAnalysis,
    BrewGuide,
    ShopSearch(ShopLocation),
}

/// Body the proxy expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptPair {
    pub prompt: String,
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
}

impl AiAction {
    pub fn name(&self) -> &'static str {
        match self {
            AiAction::FlavorAnalysis => "flavor-analysis",
            AiAction::BrewGuide => "brew-guide",
            AiAction::ShopSearch(_) => "shop-search",
        }
    }

    pub fn build(&self, selection: &Resolved<'_>) -> PromptPair {
        match self {
            AiAction::FlavorAnalysis => PromptPair {
                prompt: format!(
                    "Describe the sensory experience of a {} {} made with {} beans and {}. 40 words max.",
                    if selection.iced { "Iced" } else { "Hot" },
                    selection.drink.name,
                    selection.bean.name,
                    selection.milk.name
                ),
                system_prompt: FLAVOR_SYSTEM_PROMPT.to_string(),
            },
            AiAction::BrewGuide => PromptPair {
                prompt: format!(
                    "Create a brewing guide for {} ({}). Include Dose, Ratio, Temp, and Time.",
                    selection.drink.name, selection.method.name
                ),
                system_prompt: GUIDE_SYSTEM_PROMPT.to_string(),
            },
            AiAction::ShopSearch(location) => PromptPair {
                prompt: format!(
                    "List 3 real specialty coffee shops in {}. Format as markdown list.",
                    location.as_str()
                ),
                system_prompt: SCOUT_SYSTEM_PROMPT.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::{Controller, Selection};
    use crate::domain::catalog::Catalog;

    #[test]
    fn test_flavor_prompt() {
        let catalog = Catalog::builtin();
        let controller = Controller::new(&catalog);
        let selection = controller.set_iced(&Selection::default(), true);
        let resolved = controller.resolve(&selection).unwrap();

        let pair = AiAction::FlavorAnalysis.build(&resolved);
        assert_eq!(
            pair.prompt,
            "Describe the sensory experience of a Iced CAFFÈ LATTE made with ETHIOPIAN YIRGACHEFFE beans and WHOLE MILK. 40 words max."
        );
        assert_eq!(pair.system_prompt, FLAVOR_SYSTEM_PROMPT);
    }

    #[test]
    fn test_brew_guide_prompt() {
        let catalog = Catalog::builtin();
        let controller = Controller::new(&catalog);
        let selection = controller.set_method(&Selection::default(), "french").unwrap();
        let resolved = controller.resolve(&selection).unwrap();

        let pair = AiAction::BrewGuide.build(&resolved);
        assert_eq!(
            pair.prompt,
            "Create a brewing guide for FILTER COFFEE (FRENCH PRESS). Include Dose, Ratio, Temp, and Time."
        );
    }

    #[test]
    fn test_shop_location_input() {
        assert_eq!(
            ShopLocation::from_input(Some("  Lisbon "), false).unwrap(),
            ShopLocation::City("Lisbon".to_string())
        );
        assert_eq!(
            ShopLocation::from_input(Some("Lisbon"), true).unwrap(),
            ShopLocation::Current
        );
        assert!(ShopLocation::from_input(Some("   "), false).is_err());
        assert!(ShopLocation::from_input(None, false).is_err());
    }

    #[test]
    fn test_shop_prompt_uses_current_location() {
        let catalog = Catalog::builtin();
        let controller = Controller::new(&catalog);
        let resolved = controller.resolve(&Selection::default()).unwrap();

        let pair = AiAction::ShopSearch(ShopLocation::Current).build(&resolved);
        assert_eq!(
            pair.prompt,
            "List 3 real specialty coffee shops in Current Location. Format as markdown list."
        );
        assert_eq!(pair.system_prompt, SCOUT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_prompt_pair_wire_names() {
        let pair = PromptPair {
            prompt: "p".to_string(),
            system_prompt: "s".to_string(),
        };
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "p", "systemPrompt": "s"}));
    }
}
