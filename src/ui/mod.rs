pub mod input;
pub mod navigation;
#[cfg(feature = "gui")]
pub mod overlay;
pub mod selector;
pub mod tooltip;
