//! 预测面板状态
//!
//! 失败只记录日志并显示内联错误，不弹出提示。

use crate::clinic::error::Result;
use crate::clinic::forecast::api::ForecastApi;
use crate::clinic::forecast::models::{ForecastPoint, ForecastResponse, InventorySuggestion};
use crate::clinic::notifier::messages;
use tracing::{error, info, warn};

pub struct ForecastPanel {
    api: ForecastApi,
    loading: bool,
    error: Option<String>,
    forecast: Option<Vec<ForecastPoint>>,
    summary: Option<String>,
    suggestions: Option<Vec<InventorySuggestion>>,
}

impl ForecastPanel {
    pub fn new(api: ForecastApi) -> Self {
        Self {
            api,
            loading: false,
            error: None,
            forecast: None,
            summary: None,
            suggestions: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn forecast(&self) -> Option<&[ForecastPoint]> {
        self.forecast.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn suggestions(&self) -> Option<&[InventorySuggestion]> {
        self.suggestions.as_deref()
    }

    /// 请求一次预测，替换面板上的旧结果
    pub async fn generate(&mut self) -> Result<()> {
        self.loading = true;
        self.error = None;
        self.forecast = None;
        self.summary = None;
        self.suggestions = None;
        info!("[Forecast] 📡 请求销售预测...");

        let result = self.api.sales_forecast().await;
        self.loading = false;

        match result {
            Ok(ForecastResponse::Unavailable { message }) => {
                warn!("[Forecast] 后端无法生成预测: {}", message);
                self.error = Some(message);
                Ok(())
            }
            Ok(ForecastResponse::Ready {
                forecast,
                summary,
                inventory_suggestions,
            }) => {
                info!(
                    "[Forecast] ✅ 预测完成，天数: {}, 补货建议: {}",
                    forecast.len(),
                    inventory_suggestions.len()
                );
                self.forecast = Some(forecast);
                self.summary = summary;
                self.suggestions = Some(inventory_suggestions);
                Ok(())
            }
            Err(e) => {
                error!("[Forecast] 获取预测失败: {}", e);
                self.error = Some(messages::FORECAST_FAILED.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinic::gateway::RestGateway;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn panel_with(response: ResponseTemplate) -> (ForecastPanel, MockServer) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast/sales"))
            .respond_with(response)
            .mount(&server)
            .await;
        let panel = ForecastPanel::new(ForecastApi::new(
            RestGateway::connect(&server.uri()).unwrap(),
        ));
        (panel, server)
    }

    #[tokio::test]
    async fn ready_response_fills_panel() {
        let (mut panel, _server) = panel_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "forecast": [
                    {"date": "2025-04-01", "predicted_sales": 100.0},
                    {"date": "2025-04-02", "predicted_sales": 80.0}
                ],
                "summary": "Previsão de vendas para os próximos 30 dias.",
                "inventory_suggestions": []
            }),
        ))
        .await;

        panel.generate().await.unwrap();
        assert!(!panel.is_loading());
        assert!(panel.error().is_none());
        assert_eq!(panel.forecast().unwrap().len(), 2);
        assert_eq!(
            panel.summary(),
            Some("Previsão de vendas para os próximos 30 dias.")
        );
        assert!(panel.suggestions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn message_becomes_inline_error() {
        let (mut panel, _server) = panel_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"message": "No sales data available for forecasting."}),
        ))
        .await;

        panel.generate().await.unwrap();
        assert_eq!(panel.error(), Some("No sales data available for forecasting."));
        assert!(panel.forecast().is_none());
    }

    #[tokio::test]
    async fn http_failure_sets_generic_error() {
        let (mut panel, _server) = panel_with(ResponseTemplate::new(500)).await;

        assert!(panel.generate().await.is_err());
        assert!(!panel.is_loading());
        assert_eq!(panel.error(), Some(messages::FORECAST_FAILED));
        assert!(panel.suggestions().is_none());
    }
}
