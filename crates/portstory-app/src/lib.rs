pub mod codec;
mod engine;
mod error;
mod filter_ui;
mod settings;

pub use codec::ReplaySummary;
pub use engine::DiagramEngine;
pub use error::EngineError;
pub use filter_ui::FilterPresenter;
pub use settings::EngineSettings;
