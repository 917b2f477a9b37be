pub mod proxy;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::app::SelectionFlags;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "coffee-architect")]
#[command(about = "Compose coffee drinks layer by layer and consult the AI uplink")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Brewing method id (machine, v60, french, aeropress, ...)
    #[arg(long, global = true)]
    pub method: Option<String>,

    /// Drink id; must be offered for the method
    #[arg(long, global = true)]
    pub drink: Option<String>,

    #[arg(long, global = true)]
    pub bean: Option<String>,

    /// Milk id; ignored for drinks without milk or foam
    #[arg(long, global = true)]
    pub milk: Option<String>,

    #[arg(long, global = true)]
    pub iced: bool,

    /// Deployed proxy endpoint, overrides `proxy.url`
    #[arg(long, global = true)]
    pub proxy_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Draw the composed drink
    Show {
        /// table, json or csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// List methods, drinks, beans and milks
    Catalog,
    /// Ask for a sensory description of the current drink
    Flavor,
    /// Ask for a brewing guide for the current drink and method
    Guide,
    /// Ask for specialty coffee shops nearby
    Shops {
        #[arg(long)]
        city: Option<String>,

        #[arg(long)]
        current_location: bool,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn selection_flags(&self) -> SelectionFlags {
        SelectionFlags {
            method: self.method.clone(),
            drink: self.drink.clone(),
            bean: self.bean.clone(),
            milk: self.milk.clone(),
            iced: self.iced,
        }
    }
}
