//! 测试公共设施：日志、记录型通知器、固定数据和 mock 路由

use crate::clinic::client::{ClientConfig, ClinicClient};
use crate::clinic::notifier::Notifier;
use crate::clinic::sync::{Resync, SyncReport};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT_LOGGER: Once = Once::new();

pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::EnvFilter;

        // 当前 crate 打开 debug，底层 HTTP 客户端只保留 info
        let filter_layer =
            EnvFilter::new("info,unisovet_sdk_core=debug,hyper_util::client=info,reqwest=info");

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_test_writer();

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt_layer)
            .init();
    });
}

/// 记录所有提示和确认请求，确认结果固定
pub(crate) struct RecordingNotifier {
    confirm_answer: bool,
    alerts: Mutex<Vec<String>>,
    confirmations: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub(crate) fn new(confirm_answer: bool) -> Self {
        Self {
            confirm_answer,
            alerts: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub(crate) fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn alert(&self, message: String) {
        self.alerts.lock().unwrap().push(message);
    }

    async fn confirm(&self, message: String) -> bool {
        self.confirmations.lock().unwrap().push(message);
        self.confirm_answer
    }
}

/// 只统计调用次数的全量同步
#[derive(Default)]
pub(crate) struct CountingResync {
    calls: AtomicUsize,
}

impl CountingResync {
    pub(crate) fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resync for CountingResync {
    async fn refetch_all(&self) -> SyncReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SyncReport::default()
    }
}

pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub(crate) fn pet(id: i64, owner_id: i64) -> Value {
        json!({
            "id": id,
            "name": format!("Pet {}", id),
            "species": "Cachorro",
            "breed": "SRD",
            "birthDate": "2020-05-10",
            "ownerId": owner_id
        })
    }

    /// 客户 1 名下有宠物 7 和 8
    pub(crate) fn clients() -> Value {
        json!([{
            "id": 1,
            "name": "Ana",
            "phone": "111",
            "email": "ana@example.com",
            "address": "Rua 1",
            "pets": [pet(7, 1), pet(8, 1)]
        }])
    }

    pub(crate) fn appointment(id: i64) -> Value {
        json!({
            "id": id,
            "clientId": 1,
            "petId": 7,
            "date": "2025-03-01T10:00",
            "reason": "Vacina",
            "status": "Agendado"
        })
    }

    pub(crate) fn appointments() -> Value {
        json!([appointment(3)])
    }

    pub(crate) fn product(id: i64, name: &str, price: f64, stock: i64) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "",
            "price": price,
            "stock": stock
        })
    }

    pub(crate) fn products() -> Value {
        json!([
            product(1, "Ração Premium", 10.0, 2),
            product(2, "Coleira", 25.5, 10)
        ])
    }

    pub(crate) fn service(id: i64, name: &str, price: f64) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": "",
            "price": price
        })
    }

    pub(crate) fn services() -> Value {
        json!([service(1, "Banho", 20.0)])
    }

    /// 一笔包含一件商品 1 的销售
    pub(crate) fn sale(id: i64, total: f64) -> Value {
        json!({
            "id": id,
            "items": [{
                "id": id * 10,
                "product_id": 1,
                "service_id": null,
                "quantity": 1,
                "price": total
            }],
            "total": total,
            "date": "2025-03-01T12:00:00.000Z"
        })
    }

    pub(crate) fn sales() -> Value {
        json!([sale(1, 10.0)])
    }
}

/// 挂载五个集合的 GET 路由
pub(crate) async fn mount_collections(server: &MockServer) {
    let routes = [
        ("/clients/", fixtures::clients()),
        ("/appointments/", fixtures::appointments()),
        ("/inventory/products", fixtures::products()),
        ("/inventory/services", fixtures::services()),
        ("/inventory/sales", fixtures::sales()),
    ];
    for (route, body) in routes {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

/// 指向 mock 服务器的客户端（未拉取数据）
pub(crate) fn client_for(server: &MockServer, notifier: Arc<RecordingNotifier>) -> ClinicClient {
    ClinicClient::new(ClientConfig::new(server.uri()), notifier).unwrap()
}
