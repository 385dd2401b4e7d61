use crate::clinic::error::Result;
use crate::clinic::forecast::models::ForecastResponse;
use crate::clinic::gateway::RestGateway;

pub const FORECAST_PATH: &str = "/forecast/sales";

#[derive(Clone)]
pub struct ForecastApi {
    gateway: RestGateway,
}

impl ForecastApi {
    pub fn new(gateway: RestGateway) -> Self {
        Self { gateway }
    }

    pub async fn sales_forecast(&self) -> Result<ForecastResponse> {
        self.gateway.get(FORECAST_PATH).await
    }
}
