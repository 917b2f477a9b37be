//! Layer composition: recipe + temperature mode -> stacked, scaled layers.
//!
//! The overflow decision is made once per stack and stored in
//! [`LayerStack::policy`]; heights and center offsets are both derived from
//! that single decision so the two can never disagree.

use crate::domain::model::{Drink, LayerSpec, RenderedLayer, Substance};
use crate::utils::error::Result;
use crate::utils::validation::validate_range;
use serde::Serialize;

pub const ICE_VOLUME_ML: f64 = 20.0;
pub const ICE_LABEL: &str = "Ice Cubes";

/// Tallest vessel a shell is asked to draw.
pub const MAX_BUDGET_PX: f64 = 10_000.0;

pub const ICED_SERVING_CELSIUS: u8 = 2;
pub const HOT_SERVING_CELSIUS: u8 = 93;

/// Drawing area for one drink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vessel {
    /// Usable height in visual units.
    pub budget_px: f64,
    /// Volume that exactly fills the budget at linear scale ("full cup").
    pub reference_volume_ml: f64,
}

impl Vessel {
    pub const STANDARD: Vessel = Vessel {
        budget_px: 340.0,
        reference_volume_ml: 200.0,
    };

    pub fn new(budget_px: f64, reference_volume_ml: f64) -> Result<Self> {
        validate_range("vessel.budget_px", budget_px, f64::MIN_POSITIVE, MAX_BUDGET_PX)?;
        validate_range(
            "vessel.reference_volume_ml",
            reference_volume_ml,
            f64::MIN_POSITIVE,
            f64::MAX,
        )?;
        Ok(Self {
            budget_px,
            reference_volume_ml,
        })
    }

    pub fn scale_factor(&self) -> f64 {
        self.budget_px / self.reference_volume_ml
    }

    /// `total * scale > budget`, evaluated on volumes (same condition for a
    /// positive budget) so a drink of exactly the reference volume stays linear.
    pub fn overflows(&self, total_volume_ml: f64) -> bool {
        total_volume_ml > self.reference_volume_ml
    }
}

impl Default for Vessel {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalePolicy {
    /// Every layer is `volume * scale_factor`; small drinks stay small.
    Linear,
    /// Recipe would overflow: the budget is shared out by volume fraction.
    Redistributed,
}

impl ScalePolicy {
    pub fn for_volume(vessel: &Vessel, total_volume_ml: f64) -> Self {
        if vessel.overflows(total_volume_ml) {
            ScalePolicy::Redistributed
        } else {
            ScalePolicy::Linear
        }
    }

    fn height(&self, vessel: &Vessel, volume_ml: f64, total_volume_ml: f64) -> f64 {
        let height = match self {
            ScalePolicy::Linear => volume_ml * vessel.scale_factor(),
            ScalePolicy::Redistributed => (volume_ml / total_volume_ml) * vessel.budget_px,
        };
        height.max(0.0)
    }
}

/// Hot layers pass through untouched. Iced: milk, foam and water get their
/// cold labels and one ice layer is put on top.
pub fn apply_temperature(layers: &[LayerSpec], iced: bool) -> Vec<LayerSpec> {
    if !iced {
        return layers.to_vec();
    }

    let mut transformed: Vec<LayerSpec> = layers
        .iter()
        .map(|layer| {
            let label = match layer.substance {
                Substance::Milk => "Cold Milk",
                Substance::Foam => "Cold Foam",
                Substance::Water => "Cold Water",
                _ => return layer.clone(),
            };
            LayerSpec {
                label: label.to_string(),
                ..layer.clone()
            }
        })
        .collect();

    transformed.push(LayerSpec::new(Substance::Ice, ICE_VOLUME_ML, ICE_LABEL));
    transformed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutSide {
    Left,
    Right,
}

/// Label box attached to a layer by the presentation shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Callout {
    /// Counted from the top of the stack: the top layer is 1.
    pub layer_number: usize,
    pub side: CalloutSide,
    pub center_px: f64,
    pub title: String,
    pub volume_ml: f64,
}

/// A composed drink. Layers are bottom first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStack {
    pub layers: Vec<RenderedLayer>,
    pub policy: ScalePolicy,
    pub total_volume_ml: f64,
    pub vessel: Vessel,
}

impl LayerStack {
    pub fn build(drink: &Drink, iced: bool, vessel: Vessel) -> Self {
        let specs = apply_temperature(&drink.layers, iced);
        let total_volume_ml: f64 = specs.iter().map(|l| l.volume_ml).sum();
        let policy = ScalePolicy::for_volume(&vessel, total_volume_ml);

        tracing::debug!(
            "Composing '{}' (iced: {}): {} layers, {} ml, {:?}",
            drink.id,
            iced,
            specs.len(),
            total_volume_ml,
            policy
        );

        let layers = specs
            .into_iter()
            .map(|spec| RenderedLayer {
                height_px: policy.height(&vessel, spec.volume_ml, total_volume_ml),
                substance: spec.substance,
                label: spec.label,
                volume_ml: spec.volume_ml,
            })
            .collect();

        Self {
            layers,
            policy,
            total_volume_ml,
            vessel,
        }
    }

    pub fn total_height_px(&self) -> f64 {
        self.layers.iter().map(|l| l.height_px).sum()
    }

    /// Distance from the vessel bottom to the middle of each layer.
    pub fn center_offsets(&self) -> Vec<f64> {
        let mut below = 0.0;
        self.layers
            .iter()
            .map(|layer| {
                let center = below + layer.height_px / 2.0;
                below += layer.height_px;
                center
            })
            .collect()
    }

    pub fn callouts(&self) -> Vec<Callout> {
        let count = self.layers.len();
        self.layers
            .iter()
            .zip(self.center_offsets())
            .enumerate()
            .map(|(i, (layer, center_px))| Callout {
                layer_number: count - i,
                side: if i % 2 == 0 {
                    CalloutSide::Right
                } else {
                    CalloutSide::Left
                },
                center_px,
                title: layer.label.to_uppercase(),
                volume_ml: layer.volume_ml,
            })
            .collect()
    }
}

/// Rendered layers for the standard vessel.
pub fn compose(drink: &Drink, iced: bool) -> Vec<RenderedLayer> {
    LayerStack::build(drink, iced, Vessel::STANDARD).layers
}

pub fn serving_temperature_celsius(iced: bool) -> u8 {
    if iced {
        ICED_SERVING_CELSIUS
    } else {
        HOT_SERVING_CELSIUS
    }
}
