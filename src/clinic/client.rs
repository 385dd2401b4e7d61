//! 诊所客户端入口
//!
//! 持有唯一的数据同步器，按页面分发状态切片，并为各页面创建控制器。

use crate::clinic::appointments::{Appointment, AppointmentApi, AppointmentService};
use crate::clinic::error::{ClinicError, Result};
use crate::clinic::forecast::{ForecastApi, ForecastPanel};
use crate::clinic::gateway::RestGateway;
use crate::clinic::guard::MutationGuard;
use crate::clinic::inventory::history::DEFAULT_PAGE_SIZE;
use crate::clinic::inventory::overview::DEFAULT_LOW_STOCK_THRESHOLD;
use crate::clinic::inventory::{
    CrudManager, InventoryApi, InventoryOverview, Product, Sale, SaleBuilder, SalesHistory,
    Service,
};
use crate::clinic::notifier::Notifier;
use crate::clinic::patients::{Client, PatientApi, PatientService};
use crate::clinic::state::{AppState, SharedState};
use crate::clinic::sync::{DataSyncer, Resync, SyncReport};
use crate::clinic::types::Page;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const ENV_API_URL: &str = "UNISOVET_API_URL";
pub const ENV_SALES_PAGE_SIZE: &str = "UNISOVET_SALES_PAGE_SIZE";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "UNISOVET_LOW_STOCK_THRESHOLD";

/// 客户端配置
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// 后端 API 根地址，所有请求共用
    pub api_base_url: String,
    /// 销售历史每页条数
    pub sales_page_size: usize,
    /// 库存不高于该值视为低库存
    pub low_stock_threshold: i64,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            sales_page_size: DEFAULT_PAGE_SIZE,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    /// 从环境变量读取，未设置的项使用默认值
    pub fn from_env() -> Result<Self> {
        let api_base_url =
            std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(api_base_url);

        if let Ok(raw) = std::env::var(ENV_SALES_PAGE_SIZE) {
            config.sales_page_size = parse_env(ENV_SALES_PAGE_SIZE, &raw)?;
            if config.sales_page_size == 0 {
                return Err(ClinicError::Config(format!("{} 必须大于 0", ENV_SALES_PAGE_SIZE)));
            }
        }
        if let Ok(raw) = std::env::var(ENV_LOW_STOCK_THRESHOLD) {
            config.low_stock_threshold = parse_env(ENV_LOW_STOCK_THRESHOLD, &raw)?;
        }
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ClinicError::Config(format!("{} 不是有效的数字: {:?}", name, raw)))
}

/// 每个页面拿到的状态切片
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Dashboard {
        clients: Vec<Client>,
        appointments: Vec<Appointment>,
    },
    Clients {
        clients: Vec<Client>,
    },
    Appointments {
        appointments: Vec<Appointment>,
        clients: Vec<Client>,
    },
    Inventory {
        products: Vec<Product>,
        services: Vec<Service>,
        sales: Vec<Sale>,
        appointments: Vec<Appointment>,
    },
}

impl PageView {
    pub fn page(&self) -> Page {
        match self {
            PageView::Dashboard { .. } => Page::Dashboard,
            PageView::Clients { .. } => Page::Clients,
            PageView::Appointments { .. } => Page::Appointments,
            PageView::Inventory { .. } => Page::Inventory,
        }
    }

    fn from_state(page: Page, state: &AppState) -> Self {
        match page {
            Page::Dashboard => PageView::Dashboard {
                clients: state.clients.clone(),
                appointments: state.appointments.clone(),
            },
            Page::Clients => PageView::Clients {
                clients: state.clients.clone(),
            },
            Page::Appointments => PageView::Appointments {
                appointments: state.appointments.clone(),
                clients: state.clients.clone(),
            },
            Page::Inventory => PageView::Inventory {
                products: state.products.clone(),
                services: state.services.clone(),
                sales: state.sales.clone(),
                appointments: state.appointments.clone(),
            },
        }
    }
}

/// 每个实体家族一个防重入标志，同一客户端创建的所有控制器共用
#[derive(Clone, Default)]
struct FamilyGuards {
    patients: MutationGuard,
    appointments: MutationGuard,
    products: MutationGuard,
    services: MutationGuard,
    sales: MutationGuard,
}

/// 诊所客户端
#[derive(Clone)]
pub struct ClinicClient {
    config: Arc<ClientConfig>,
    gateway: RestGateway,
    syncer: Arc<DataSyncer>,
    notifier: Arc<dyn Notifier>,
    guards: FamilyGuards,
}

impl ClinicClient {
    /// 校验配置并创建客户端，不发起任何请求
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let gateway = RestGateway::connect(&config.api_base_url)?;
        info!("[Client] 🚀 客户端已创建，API: {}", gateway.base_url());
        Ok(Self {
            config: Arc::new(config),
            syncer: Arc::new(DataSyncer::new(gateway.clone())),
            gateway,
            notifier,
            guards: FamilyGuards::default(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 启动时的全量拉取
    pub async fn fetch_all(&self) -> SyncReport {
        self.syncer.fetch_all().await
    }

    pub async fn refetch_all(&self) -> SyncReport {
        self.syncer.refetch_all().await
    }

    pub fn state(&self) -> SharedState {
        self.syncer.state()
    }

    pub async fn snapshot(&self) -> AppState {
        self.syncer.snapshot().await
    }

    /// 指定页面当前应显示的数据
    pub async fn page_view(&self, page: Page) -> PageView {
        let state = self.syncer.state();
        let state = state.read().await;
        PageView::from_state(page, &state)
    }

    pub async fn overview(&self) -> InventoryOverview {
        let state = self.syncer.state();
        let state = state.read().await;
        InventoryOverview::compute(&state.products, &state.sales, self.config.low_stock_threshold)
    }

    pub fn patients(&self) -> PatientService {
        PatientService::new(
            PatientApi::new(self.gateway.clone()),
            self.syncer.state(),
            self.resync(),
            self.notifier.clone(),
        )
        .with_guard(self.guards.patients.clone())
    }

    pub fn appointments(&self) -> AppointmentService {
        AppointmentService::new(
            AppointmentApi::new(self.gateway.clone()),
            self.syncer.state(),
            self.notifier.clone(),
        )
        .with_guard(self.guards.appointments.clone())
    }

    pub fn products(&self) -> CrudManager<Product> {
        CrudManager::new(self.inventory_api(), self.syncer.state(), self.notifier.clone())
            .with_guard(self.guards.products.clone())
    }

    pub fn services(&self) -> CrudManager<Service> {
        CrudManager::new(self.inventory_api(), self.syncer.state(), self.notifier.clone())
            .with_guard(self.guards.services.clone())
    }

    /// 新的空购物车；同一时刻只允许一笔销售在提交
    pub fn new_sale(&self) -> SaleBuilder {
        SaleBuilder::new(self.inventory_api(), self.resync(), self.notifier.clone())
            .with_guard(self.guards.sales.clone())
    }

    pub fn sales_history(&self) -> SalesHistory {
        SalesHistory::new(
            self.inventory_api(),
            self.notifier.clone(),
            self.config.sales_page_size,
        )
    }

    pub fn forecast_panel(&self) -> ForecastPanel {
        ForecastPanel::new(ForecastApi::new(self.gateway.clone()))
    }

    fn inventory_api(&self) -> InventoryApi {
        InventoryApi::new(self.gateway.clone())
    }

    fn resync(&self) -> Arc<dyn Resync> {
        self.syncer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clinic::inventory::{ItemKind, ProductDraft, ServiceDraft};
    use crate::clinic::notifier::messages;
    use crate::clinic::patients::NewClient;
    use crate::clinic::testing::{
        client_for, fixtures, init_test_logger, mount_collections, RecordingNotifier,
    };
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn invalid_base_url_is_config_error() {
        let notifier = Arc::new(RecordingNotifier::new(true));
        let err = ClinicClient::new(ClientConfig::new("ftp://clinic"), notifier).err();
        assert!(matches!(err, Some(ClinicError::Config(_))));
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.sales_page_size, 10);
        assert_eq!(config.low_stock_threshold, 5);
        assert!(parse_env::<usize>(ENV_SALES_PAGE_SIZE, "dez").is_err());
        assert_eq!(parse_env::<i64>(ENV_LOW_STOCK_THRESHOLD, " 3 ").unwrap(), 3);
    }

    #[tokio::test]
    async fn page_views_receive_their_slices() {
        init_test_logger();
        let server = MockServer::start().await;
        mount_collections(&server).await;
        let notifier = Arc::new(RecordingNotifier::new(true));
        let client = client_for(&server, notifier);

        // 拉取前各页面看到的都是空集合
        match client.page_view(Page::Clients).await {
            PageView::Clients { clients } => assert!(clients.is_empty()),
            other => panic!("unexpected view: {:?}", other.page()),
        }

        assert!(client.fetch_all().await.is_complete());

        match client.page_view(Page::Dashboard).await {
            PageView::Dashboard {
                clients,
                appointments,
            } => {
                assert_eq!(clients.len(), 1);
                assert_eq!(appointments.len(), 1);
            }
            other => panic!("unexpected view: {:?}", other.page()),
        }
        match client.page_view(Page::Inventory).await {
            PageView::Inventory {
                products,
                services,
                sales,
                appointments,
            } => {
                assert_eq!(products.len(), 2);
                assert_eq!(services.len(), 1);
                assert_eq!(sales.len(), 1);
                assert_eq!(appointments.len(), 1);
            }
            other => panic!("unexpected view: {:?}", other.page()),
        }
        assert_eq!(client.page_view(Page::Appointments).await.page(), Page::Appointments);

        let overview = client.overview().await;
        assert_eq!(overview.product_count, 2);
        assert_eq!(overview.low_stock_count, 1);
        assert_eq!(overview.total_revenue, 10.0);
    }

    #[tokio::test]
    async fn finalized_sale_refreshes_shared_state() {
        let server = MockServer::start().await;
        mount_collections(&server).await;
        Mock::given(method("POST"))
            .and(path("/inventory/sales"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(crate::clinic::testing::fixtures::sale(2, 10.0)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Arc::new(RecordingNotifier::new(true));
        let client = client_for(&server, notifier.clone());
        client.fetch_all().await;

        let products = client.snapshot().await.products;
        let mut cart = client.new_sale();
        cart.add_product(&products[0]).await.unwrap();
        assert_eq!(cart.quantity_of(ItemKind::Product, 1), 1);

        cart.finalize().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(notifier.alerts(), vec![messages::SALE_FINALIZED.to_string()]);
        // 5 个集合的 GET 各被请求两次：初始拉取 + 成交后的全量同步
        let gets = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == "GET")
            .count();
        assert_eq!(gets, 10);
    }

    fn delayed(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(body)
            .set_delay(Duration::from_millis(200))
    }

    fn assert_one_ok_one_busy<T>(a: Result<T>, b: Result<T>) {
        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ClinicError::MutationInProgress))));
    }

    fn ana() -> NewClient {
        NewClient {
            name: "Ana".into(),
            phone: "111".into(),
            email: "ana@example.com".into(),
            address: "Rua 1".into(),
        }
    }

    #[tokio::test]
    async fn concurrent_add_client_from_two_services_posts_once() {
        init_test_logger();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/clients/"))
            .respond_with(delayed(serde_json::json!({
                "id": 1, "name": "Ana", "phone": "111",
                "email": "ana@example.com", "address": "Rua 1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Arc::new(RecordingNotifier::new(true));
        let client = client_for(&server, notifier.clone());
        let (first, second) = (client.patients(), client.patients());

        let (a, b) = tokio::join!(first.add_client(ana()), second.add_client(ana()));
        assert_one_ok_one_busy(a, b);
        assert!(!first.is_busy() && !second.is_busy());
        assert_eq!(client.snapshot().await.clients.len(), 1);
        assert!(notifier.alerts().is_empty());
    }

    #[tokio::test]
    async fn concurrent_finalize_from_two_carts_posts_once() {
        let server = MockServer::start().await;
        mount_collections(&server).await;
        Mock::given(method("POST"))
            .and(path("/inventory/sales"))
            .respond_with(delayed(fixtures::sale(2, 25.5)))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = Arc::new(RecordingNotifier::new(true));
        let client = client_for(&server, notifier.clone());
        client.fetch_all().await;
        let coleira = client.snapshot().await.products[1].clone();

        let mut first = client.new_sale();
        let mut second = client.new_sale();
        first.add_product(&coleira).await.unwrap();
        second.add_product(&coleira).await.unwrap();

        let (a, b) = tokio::join!(first.finalize(), second.finalize());
        assert_one_ok_one_busy(a, b);
        // 被拒绝的购物车保留明细，可以稍后重试
        assert_eq!(first.lines().len() + second.lines().len(), 1);
        assert!(!first.is_busy() && !second.is_busy());
        assert_eq!(notifier.alerts(), vec![messages::SALE_FINALIZED.to_string()]);
    }

    #[tokio::test]
    async fn concurrent_saves_block_within_family_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/inventory/products"))
            .respond_with(delayed(fixtures::product(3, "Shampoo", 0.0, 0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/inventory/services"))
            .respond_with(delayed(fixtures::service(2, "Tosa", 0.0)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Arc::new(RecordingNotifier::new(true)));
        let shampoo = ProductDraft {
            name: "Shampoo".into(),
            ..Default::default()
        };
        let tosa = ServiceDraft {
            name: "Tosa".into(),
            ..Default::default()
        };

        let (products_a, products_b, services) =
            (client.products(), client.products(), client.services());
        let (a, b, c) = tokio::join!(
            products_a.save(None, shampoo.clone()),
            products_b.save(None, shampoo.clone()),
            services.save(None, tosa),
        );
        assert_one_ok_one_busy(a, b);
        assert_eq!(c.unwrap().id, 2);

        let state = client.snapshot().await;
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.services.len(), 1);
    }
}
