use crate::app::markdown::MarkdownLines;
use crate::app::render::{render, OutputFormat};
use crate::core::assistant::AssistantSession;
use crate::core::composition::Vessel;
use crate::core::prompts::{AiAction, PromptPair};
use crate::core::selection::{Controller, Selection};
use crate::domain::catalog::Catalog;
use crate::domain::ports::CompletionBackend;
use crate::utils::error::Result;
use std::fmt::Write;

/// Selection changes requested on the command line, applied in the order a
/// user would click them: method, drink, bean, milk, temperature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionFlags {
    pub method: Option<String>,
    pub drink: Option<String>,
    pub bean: Option<String>,
    pub milk: Option<String>,
    pub iced: bool,
}

/// Terminal front-end state: one catalog, one vessel, one selection.
pub struct Shell {
    catalog: Catalog,
    vessel: Vessel,
    selection: Selection,
    markdown: MarkdownLines,
}

impl Shell {
    pub fn new(catalog: Catalog, vessel: Vessel) -> Result<Self> {
        let selection = Controller::new(&catalog).initial_selection()?;
        Ok(Self {
            catalog,
            vessel,
            selection,
            markdown: MarkdownLines::new(),
        })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn apply(&mut self, flags: &SelectionFlags) -> Result<()> {
        let controller = Controller::new(&self.catalog);
        let mut next = self.selection.clone();

        if let Some(method) = &flags.method {
            next = controller.set_method(&next, method)?;
        }
        if let Some(drink) = &flags.drink {
            next = controller.set_drink(&next, drink)?;
        }
        if let Some(bean) = &flags.bean {
            next = controller.set_bean(&next, bean)?;
        }
        if let Some(milk) = &flags.milk {
            let before = next.milk.clone();
            next = controller.set_milk(&next, milk)?;
            if next.milk == before && before != *milk {
                tracing::warn!("Milk choice '{}' does not apply to '{}'", milk, next.drink);
            }
        }
        next = controller.set_iced(&next, flags.iced);

        tracing::debug!("Selection: {:?}", next);
        self.selection = next;
        Ok(())
    }

    pub fn show(&self, format: OutputFormat) -> Result<String> {
        let controller = Controller::new(&self.catalog);
        let stack = controller.compose(&self.selection, self.vessel)?;
        let resolved = controller.resolve(&self.selection)?;
        render(&stack, &resolved, format)
    }

    /// Every table of the catalog, with the drinks the current method offers.
    pub fn catalog_listing(&self) -> String {
        let controller = Controller::new(&self.catalog);
        let mut out = String::new();

        let _ = writeln!(out, "METHODS");
        for m in &self.catalog.methods {
            let _ = writeln!(out, "  {:<10} {} ({:?})", m.id, m.name, m.category);
        }
        let _ = writeln!(out, "DRINKS (method: {})", self.selection.method);
        for option in controller.drink_options(&self.selection) {
            let marker = match (option.selected, option.enabled) {
                (true, _) => "*",
                (false, true) => " ",
                (false, false) => "x",
            };
            let _ = writeln!(out, "  {} {:<10} {}", marker, option.id, option.name);
        }
        let _ = writeln!(out, "BEANS");
        for b in &self.catalog.beans {
            let _ = writeln!(out, "  {:<10} {} [{}] {}", b.id, b.name, b.color, b.notes);
        }
        let _ = writeln!(out, "MILKS");
        for m in &self.catalog.milks {
            let _ = writeln!(out, "  {:<10} {} [{}]", m.id, m.name, m.color);
        }
        out
    }

    pub fn prompt_for(&self, action: &AiAction) -> Result<PromptPair> {
        let resolved = Controller::new(&self.catalog).resolve(&self.selection)?;
        Ok(action.build(&resolved))
    }

    /// Send the action through the session; the answer comes back styled for
    /// the terminal.
    pub async fn ask<B: CompletionBackend>(
        &self,
        session: &AssistantSession<B>,
        action: &AiAction,
    ) -> Result<String> {
        let pair = self.prompt_for(action)?;
        tracing::info!("Requesting {}", action.name());
        session.request(&pair).await;
        Ok(self.markdown.to_terminal(session.snapshot().display_text()))
    }
}
