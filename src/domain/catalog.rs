use crate::domain::model::{Bean, BrewMethod, Drink, LayerSpec, MethodCategory, MilkType, Substance};
use crate::utils::error::{ArchitectError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_non_negative, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// The recipe tables. Declaration order is significant: compatibility
/// fallback picks the first matching drink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub beans: Vec<Bean>,
    pub methods: Vec<BrewMethod>,
    pub milks: Vec<MilkType>,
    pub drinks: Vec<Drink>,
}

fn bean(id: &str, name: &str, color: &str, notes: &str) -> Bean {
    Bean {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        notes: notes.to_string(),
    }
}

fn method(id: &str, name: &str, category: MethodCategory) -> BrewMethod {
    BrewMethod {
        id: id.to_string(),
        name: name.to_string(),
        category,
    }
}

fn milk(id: &str, name: &str, color: &str) -> MilkType {
    MilkType {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

fn drink(id: &str, name: &str, layers: Vec<LayerSpec>, compatible: &[&str]) -> Drink {
    Drink {
        id: id.to_string(),
        name: name.to_string(),
        compatible: compatible.iter().map(|m| m.to_string()).collect(),
        layers,
    }
}

const MANUAL: &[&str] = &["v60", "french", "aeropress"];

impl Catalog {
    pub fn builtin() -> Self {
        use Substance::*;

        Self {
            beans: vec![
                bean("ethiopia", "ETHIOPIAN YIRGACHEFFE", "#D2691E", "Jasmine, Lemon, Tea"),
                bean("colombia", "COLOMBIAN SUPREMO", "#8B4513", "Caramel, Walnut, Cherry"),
                bean("brazil", "BRAZILIAN SANTOS", "#A0522D", "Chocolate, Nuts, Low Acidity"),
                bean("kenya", "KENYAN AA", "#654321", "Blackcurrant, Citrus, Wine"),
                bean("sumatra", "SUMATRAN MANDHELING", "#3E2723", "Earthy, Herbal, Full Body"),
            ],
            methods: vec![
                method("machine", "ESPRESSO MACHINE", MethodCategory::Espresso),
                method("v60", "HARIO V60", MethodCategory::Manual),
                method("french", "FRENCH PRESS", MethodCategory::Manual),
                method("aeropress", "AEROPRESS", MethodCategory::Manual),
            ],
            milks: vec![
                milk("whole", "WHOLE MILK", "#fef3c7"),
                milk("oat", "OAT MILK", "#f5e6d3"),
                milk("almond", "ALMOND MILK", "#faf8f3"),
                milk("soy", "SOY MILK", "#f8f4e6"),
                milk(MilkType::NONE_ID, "NO MILK", "transparent"),
            ],
            drinks: vec![
                drink(
                    "espresso",
                    "ESPRESSO",
                    vec![LayerSpec::new(Espresso, 30.0, "Single Shot")],
                    &["machine"],
                ),
                drink(
                    "doppio",
                    "DOPPIO",
                    vec![LayerSpec::new(Espresso, 60.0, "Double Shot")],
                    &["machine"],
                ),
                drink(
                    "latte",
                    "CAFFÈ LATTE",
                    vec![
                        LayerSpec::new(Espresso, 15.0, "Espresso"),
                        LayerSpec::new(Milk, 60.0, "Steamed Milk"),
                        LayerSpec::new(Foam, 10.0, "Microfoam"),
                    ],
                    &["machine"],
                ),
                drink(
                    "cappuccino",
                    "CAPPUCCINO",
                    vec![
                        LayerSpec::new(Espresso, 20.0, "Espresso"),
                        LayerSpec::new(Milk, 40.0, "Steamed Milk"),
                        LayerSpec::new(Foam, 25.0, "Foam"),
                    ],
                    &["machine"],
                ),
                drink(
                    "flatwhite",
                    "FLAT WHITE",
                    vec![
                        LayerSpec::new(Espresso, 20.0, "Ristretto"),
                        LayerSpec::new(Milk, 60.0, "Microfoam"),
                        LayerSpec::new(Foam, 5.0, "Thin Layer"),
                    ],
                    &["machine"],
                ),
                drink(
                    "macchiato",
                    "MACCHIATO",
                    vec![
                        LayerSpec::new(Espresso, 40.0, "Espresso"),
                        LayerSpec::new(Foam, 20.0, "Foam Mark"),
                    ],
                    &["machine"],
                ),
                drink(
                    "americano",
                    "AMERICANO",
                    vec![
                        LayerSpec::new(Espresso, 20.0, "Espresso"),
                        LayerSpec::new(Water, 60.0, "Hot Water"),
                    ],
                    &["machine"],
                ),
                drink(
                    "filter",
                    "FILTER COFFEE",
                    vec![LayerSpec::new(Filter, 80.0, "Brewed Coffee")],
                    MANUAL,
                ),
                drink(
                    "aulait",
                    "CAFÉ AU LAIT",
                    vec![
                        LayerSpec::new(Filter, 40.0, "Brewed Coffee"),
                        LayerSpec::new(Milk, 40.0, "Steamed Milk"),
                    ],
                    MANUAL,
                ),
            ],
        }
    }

    /// Load a catalog from a TOML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        tracing::debug!(
            "Loaded catalog: {} beans, {} methods, {} milks, {} drinks",
            catalog.beans.len(),
            catalog.methods.len(),
            catalog.milks.len(),
            catalog.drinks.len()
        );
        Ok(catalog)
    }

    pub fn bean(&self, id: &str) -> Result<&Bean> {
        self.beans
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| unknown("bean", id))
    }

    pub fn method(&self, id: &str) -> Result<&BrewMethod> {
        self.methods
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| unknown("method", id))
    }

    pub fn milk(&self, id: &str) -> Result<&MilkType> {
        self.milks
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| unknown("milk", id))
    }

    pub fn drink(&self, id: &str) -> Result<&Drink> {
        self.drinks
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| unknown("drink", id))
    }

    /// First drink in declaration order that the method can brew.
    pub fn first_compatible_drink(&self, method_id: &str) -> Option<&Drink> {
        self.drinks.iter().find(|d| d.is_compatible_with(method_id))
    }
}

fn unknown(kind: &'static str, id: &str) -> ArchitectError {
    ArchitectError::UnknownId {
        kind,
        id: id.to_string(),
    }
}

fn catalog_error(message: String) -> ArchitectError {
    ArchitectError::CatalogError { message }
}

fn ensure_unique<'a>(table: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        validate_non_empty_string(&format!("{}.id", table), id)?;
        if !seen.insert(id) {
            return Err(catalog_error(format!("duplicate id '{}' in {}", id, table)));
        }
    }
    Ok(())
}

impl Validate for Catalog {
    fn validate(&self) -> Result<()> {
        ensure_unique("beans", self.beans.iter().map(|b| b.id.as_str()))?;
        ensure_unique("methods", self.methods.iter().map(|m| m.id.as_str()))?;
        ensure_unique("milks", self.milks.iter().map(|m| m.id.as_str()))?;
        ensure_unique("drinks", self.drinks.iter().map(|d| d.id.as_str()))?;

        if self.beans.is_empty() || self.methods.is_empty() || self.milks.is_empty() {
            return Err(catalog_error(
                "beans, methods and milks must each have at least one entry".to_string(),
            ));
        }

        let method_ids: HashSet<&str> = self.methods.iter().map(|m| m.id.as_str()).collect();

        for drink in &self.drinks {
            if drink.layers.is_empty() {
                return Err(catalog_error(format!("drink '{}' has no layers", drink.id)));
            }
            if drink.compatible.is_empty() {
                return Err(catalog_error(format!(
                    "drink '{}' is not compatible with any method",
                    drink.id
                )));
            }
            for method_id in &drink.compatible {
                if !method_ids.contains(method_id.as_str()) {
                    return Err(catalog_error(format!(
                        "drink '{}' references unknown method '{}'",
                        drink.id, method_id
                    )));
                }
            }
            for layer in &drink.layers {
                validate_non_negative(&format!("drinks.{}.volume_ml", drink.id), layer.volume_ml)?;
            }
        }

        for method in &self.methods {
            if self.first_compatible_drink(&method.id).is_none() {
                return Err(catalog_error(format!(
                    "method '{}' has no compatible drink",
                    method.id
                )));
            }
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
