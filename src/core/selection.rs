//! Selection state and the commands that move it.
//!
//! [`Selection`] is a plain value. Every [`Controller`] command takes the
//! current selection and returns the next one, so the drink/method
//! compatibility invariant is re-established inside each command.

use crate::core::composition::{LayerStack, Vessel};
use crate::domain::catalog::Catalog;
use crate::domain::model::{Bean, BrewMethod, Drink, MilkType};
use crate::utils::error::{ArchitectError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub method: String,
    pub bean: String,
    pub milk: String,
    pub drink: String,
    pub iced: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            method: "machine".to_string(),
            bean: "ethiopia".to_string(),
            milk: "whole".to_string(),
            drink: "latte".to_string(),
            iced: false,
        }
    }
}

/// Catalog entries a selection points at.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub method: &'a BrewMethod,
    pub bean: &'a Bean,
    pub milk: &'a MilkType,
    pub drink: &'a Drink,
    pub iced: bool,
}

/// A drink button as a shell shows it for the current method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrinkOption {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub selected: bool,
}

pub struct Controller<'a> {
    catalog: &'a Catalog,
}

impl<'a> Controller<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// The default selection when the catalog has all of its entries,
    /// otherwise the first method, its first drink, the first bean and milk.
    pub fn initial_selection(&self) -> Result<Selection> {
        let preferred = Selection::default();
        if self.resolve(&preferred).is_ok() && self.is_consistent(&preferred) {
            return Ok(preferred);
        }

        let method = self.catalog.methods.first().ok_or_else(empty_catalog)?;
        let drink = self
            .catalog
            .first_compatible_drink(&method.id)
            .ok_or_else(empty_catalog)?;
        Ok(Selection {
            method: method.id.clone(),
            bean: self.catalog.beans.first().ok_or_else(empty_catalog)?.id.clone(),
            milk: self.catalog.milks.first().ok_or_else(empty_catalog)?.id.clone(),
            drink: drink.id.clone(),
            iced: false,
        })
    }

    pub fn is_consistent(&self, selection: &Selection) -> bool {
        self.catalog
            .drink(&selection.drink)
            .map(|d| d.is_compatible_with(&selection.method))
            .unwrap_or(false)
    }

    /// Switch method. An incompatible drink is replaced by the first
    /// compatible drink in catalog order, without reporting anything.
    pub fn set_method(&self, current: &Selection, method_id: &str) -> Result<Selection> {
        let method = self.catalog.method(method_id)?;
        let mut next = Selection {
            method: method.id.clone(),
            ..current.clone()
        };

        if !self.is_consistent(&next) {
            let fallback = self.catalog.first_compatible_drink(&method.id).ok_or_else(|| {
                ArchitectError::CatalogError {
                    message: format!("method '{}' has no compatible drink", method.id),
                }
            })?;
            tracing::debug!(
                "Drink '{}' not brewable with '{}', switching to '{}'",
                current.drink,
                method.id,
                fallback.id
            );
            next.drink = fallback.id.clone();
        }

        Ok(next)
    }

    pub fn set_drink(&self, current: &Selection, drink_id: &str) -> Result<Selection> {
        let drink = self.catalog.drink(drink_id)?;
        if !drink.is_compatible_with(&current.method) {
            return Err(ArchitectError::IncompatibleDrink {
                drink: drink.id.clone(),
                method: current.method.clone(),
            });
        }
        Ok(Selection {
            drink: drink.id.clone(),
            ..current.clone()
        })
    }

    pub fn set_bean(&self, current: &Selection, bean_id: &str) -> Result<Selection> {
        let bean = self.catalog.bean(bean_id)?;
        Ok(Selection {
            bean: bean.id.clone(),
            ..current.clone()
        })
    }

    /// Ignored (selection returned unchanged) when the drink has no milk or foam.
    pub fn set_milk(&self, current: &Selection, milk_id: &str) -> Result<Selection> {
        let milk = self.catalog.milk(milk_id)?;
        if !self.has_milk(current) {
            tracing::debug!("Milk '{}' ignored: '{}' has no milk layer", milk.id, current.drink);
            return Ok(current.clone());
        }
        Ok(Selection {
            milk: milk.id.clone(),
            ..current.clone()
        })
    }

    pub fn set_iced(&self, current: &Selection, iced: bool) -> Selection {
        Selection {
            iced,
            ..current.clone()
        }
    }

    pub fn has_milk(&self, selection: &Selection) -> bool {
        self.catalog
            .drink(&selection.drink)
            .map(Drink::has_milk)
            .unwrap_or(false)
    }

    pub fn resolve(&self, selection: &Selection) -> Result<Resolved<'a>> {
        Ok(Resolved {
            method: self.catalog.method(&selection.method)?,
            bean: self.catalog.bean(&selection.bean)?,
            milk: self.catalog.milk(&selection.milk)?,
            drink: self.catalog.drink(&selection.drink)?,
            iced: selection.iced,
        })
    }

    pub fn drink_options(&self, selection: &Selection) -> Vec<DrinkOption> {
        self.catalog
            .drinks
            .iter()
            .map(|d| DrinkOption {
                id: d.id.clone(),
                name: d.name.clone(),
                enabled: d.is_compatible_with(&selection.method),
                selected: d.id == selection.drink,
            })
            .collect()
    }

    pub fn compose(&self, selection: &Selection, vessel: Vessel) -> Result<LayerStack> {
        let drink = self.catalog.drink(&selection.drink)?;
        Ok(LayerStack::build(drink, selection.iced, vessel))
    }
}

fn empty_catalog() -> ArchitectError {
    ArchitectError::CatalogError {
        message: "catalog has no entries to select".to_string(),
    }
}
