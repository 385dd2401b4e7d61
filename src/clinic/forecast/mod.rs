//! 销售预测面板（只负责取数，不负责绘图）

pub mod api;
pub mod models;
pub mod panel;

pub use api::ForecastApi;
pub use models::{ForecastPoint, ForecastResponse, InventorySuggestion};
pub use panel::ForecastPanel;
