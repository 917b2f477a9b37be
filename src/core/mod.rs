pub mod assistant;
pub mod composition;
pub mod loading;
pub mod prompts;
pub mod selection;

pub use crate::domain::catalog::Catalog;
pub use crate::domain::model::{Drink, LayerSpec, RenderedLayer, Substance};
pub use crate::domain::ports::{CompletionBackend, CredentialProvider};
pub use crate::utils::error::Result;
