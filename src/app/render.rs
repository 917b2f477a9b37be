//! Terminal rendering of a composed drink.

use crate::core::composition::{serving_temperature_celsius, CalloutSide, LayerStack};
use crate::core::selection::Resolved;
use crate::domain::model::Substance;
use crate::utils::error::{ArchitectError, Result};
use serde::Serialize;
use std::fmt::Write;
use std::str::FromStr;

/// Width of the vessel drawing in characters.
const VESSEL_WIDTH: usize = 24;
/// Visual units per text row.
const PX_PER_ROW: f64 = 17.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = ArchitectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(ArchitectError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: table, json, csv".to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct VesselView<'a> {
    method: &'a str,
    drink: &'a str,
    bean: &'a str,
    milk: Option<&'a str>,
    iced: bool,
    serving_temperature_celsius: u8,
    #[serde(flatten)]
    stack: &'a LayerStack,
    center_offsets_px: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    position: usize,
    layer_number: usize,
    substance: &'a str,
    label: &'a str,
    volume_ml: f64,
    height_px: f64,
    center_px: f64,
}

pub fn render(stack: &LayerStack, selection: &Resolved<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(stack, selection)),
        OutputFormat::Json => render_json(stack, selection),
        OutputFormat::Csv => render_csv(stack),
    }
}

fn milk_name<'a>(selection: &Resolved<'a>) -> Option<&'a str> {
    if selection.drink.has_milk() {
        Some(selection.milk.name.as_str())
    } else {
        None
    }
}

pub fn render_table(stack: &LayerStack, selection: &Resolved<'_>) -> String {
    let mut out = String::new();
    let callouts = stack.callouts();
    let rim = "=".repeat(VESSEL_WIDTH + 2);

    let _ = writeln!(out, "{} // {}", selection.drink.name, selection.method.name);
    let _ = writeln!(out, " {}", rim);

    // Top of the cup first, so walk the stack in reverse.
    for (layer, callout) in stack.layers.iter().zip(&callouts).rev() {
        let rows = ((layer.height_px / PX_PER_ROW).round() as usize).max(1);
        let fill = fill_char(layer.substance);
        for row in 0..rows {
            let body: String = std::iter::repeat(fill).take(VESSEL_WIDTH).collect();
            if row == rows / 2 {
                let marker = match callout.side {
                    CalloutSide::Right => "-->",
                    CalloutSide::Left => "<--",
                };
                let _ = writeln!(
                    out,
                    " |{}| {} LAYER {}  {}  VOL: {}ml  ({:.1}px)",
                    body,
                    marker,
                    callout.layer_number,
                    callout.title,
                    callout.volume_ml,
                    layer.height_px
                );
            } else {
                let _ = writeln!(out, " |{}|", body);
            }
        }
    }

    let _ = writeln!(out, " \\{}/", "_".repeat(VESSEL_WIDTH));
    let _ = writeln!(
        out,
        "COORD: {} / {}   TEMP: {}°C",
        selection.method.id.to_uppercase(),
        selection.drink.id.to_uppercase(),
        serving_temperature_celsius(selection.iced)
    );
    let _ = writeln!(out, "BEAN: {} ({})", selection.bean.name, selection.bean.notes);
    match milk_name(selection) {
        Some(milk) => {
            let _ = writeln!(out, "MILK: {}", milk);
        }
        None => {
            let _ = writeln!(out, "MILK: NOT APPLICABLE FOR {}", selection.drink.name);
        }
    }
    let _ = writeln!(
        out,
        "TOTAL: {}ml -> {:.1}/{}px ({:?})",
        stack.total_volume_ml,
        stack.total_height_px(),
        stack.vessel.budget_px,
        stack.policy
    );

    out
}

fn fill_char(substance: Substance) -> char {
    match substance {
        Substance::Espresso => '#',
        Substance::Filter => '%',
        Substance::Milk => '=',
        Substance::Foam => '~',
        Substance::Water => '.',
        Substance::Ice => 'o',
    }
}

pub fn render_json(stack: &LayerStack, selection: &Resolved<'_>) -> Result<String> {
    let view = VesselView {
        method: &selection.method.id,
        drink: &selection.drink.id,
        bean: &selection.bean.id,
        milk: milk_name(selection),
        iced: selection.iced,
        serving_temperature_celsius: serving_temperature_celsius(selection.iced),
        stack,
        center_offsets_px: stack.center_offsets(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn render_csv(stack: &LayerStack) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (position, (layer, callout)) in stack.layers.iter().zip(stack.callouts()).enumerate() {
        writer.serialize(CsvRow {
            position,
            layer_number: callout.layer_number,
            substance: layer.substance.as_str(),
            label: &layer.label,
            volume_ml: layer.volume_ml,
            height_px: layer.height_px,
            center_px: callout.center_px,
        })?;
    }
    let data = writer.into_inner().map_err(|e| ArchitectError::IoError(e.into_error()))?;
    String::from_utf8(data).map_err(|e| ArchitectError::ValidationError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}
