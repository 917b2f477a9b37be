use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bean {
    pub id: String,
    pub name: String,
    pub color: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodCategory {
    Espresso,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewMethod {
    pub id: String,
    pub name: String,
    pub category: MethodCategory,
}

/// `none` is the "no milk" entry; its swatch is `transparent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkType {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl MilkType {
    pub const NONE_ID: &'static str = "none";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Substance {
    Espresso,
    Milk,
    Foam,
    Water,
    Filter,
    Ice,
}

impl Substance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Substance::Espresso => "espresso",
            Substance::Milk => "milk",
            Substance::Foam => "foam",
            Substance::Water => "water",
            Substance::Filter => "filter",
            Substance::Ice => "ice",
        }
    }

    /// Milk and foam layers are the ones a milk choice applies to.
    pub fn is_dairy(&self) -> bool {
        matches!(self, Substance::Milk | Substance::Foam)
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub substance: Substance,
    pub volume_ml: f64,
    pub label: String,
}

impl LayerSpec {
    pub fn new(substance: Substance, volume_ml: f64, label: impl Into<String>) -> Self {
        Self {
            substance,
            volume_ml,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drink {
    pub id: String,
    pub name: String,
    /// Method ids this recipe can be brewed with.
    pub compatible: Vec<String>,
    /// Pour order, bottom first.
    pub layers: Vec<LayerSpec>,
}

impl Drink {
    pub fn is_compatible_with(&self, method_id: &str) -> bool {
        self.compatible.iter().any(|m| m == method_id)
    }

    pub fn has_milk(&self) -> bool {
        self.layers.iter().any(|l| l.substance.is_dairy())
    }
}

/// One layer of a composed drink, ready to draw. Rebuilt on every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLayer {
    pub substance: Substance,
    pub label: String,
    pub volume_ml: f64,
    pub height_px: f64,
}
