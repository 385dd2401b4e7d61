//! REST 网关
//!
//! 后端所有实体家族共用的一组 HTTP 操作：列表、创建、更新、删除、状态变更、分页列表。
//! 每个操作都是一次独立的网络往返，不重试，也不做额外的超时处理。

use crate::clinic::error::{ClinicError, Result};
use crate::clinic::types::Paged;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// 分页列表中携带精确总数的响应头
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// 后端 HTTP 网关
///
/// 持有唯一的 API 基础地址，所有模块通过它访问后端。
#[derive(Clone, Debug)]
pub struct RestGateway {
    client: reqwest::Client,
    api_base_url: String,
}

impl RestGateway {
    /// 使用外部配置好的 HTTP 客户端创建网关
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 校验基础地址并创建默认 HTTP 客户端
    pub fn connect(api_base_url: &str) -> Result<Self> {
        let parsed = Url::parse(api_base_url)
            .map_err(|e| ClinicError::Config(format!("无效的 API 地址 {}: {}", api_base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ClinicError::Config(format!(
                "API 地址只支持 http/https: {}",
                api_base_url
            )));
        }

        let client = reqwest::ClientBuilder::new()
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                headers
            })
            .build()?;

        Ok(Self::new(client, api_base_url.to_string()))
    }

    /// API 基础地址（已去掉结尾的 `/`）
    pub fn base_url(&self) -> &str {
        &self.api_base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    fn item_path(path: &str, id: i64) -> String {
        format!("{}/{}", path.trim_end_matches('/'), id)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        let operation_id = Uuid::new_v4().to_string();
        debug!("[Gateway] {} {} (operationID: {})", method, url, operation_id);
        self.client
            .request(method, &url)
            .header("operationID", operation_id)
    }

    /// GET 集合路径，返回实体数组
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let response = self.request(Method::GET, path).send().await?;
        handle_http_response(response, path).await
    }

    /// GET 任意 JSON 文档
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        handle_http_response(response, path).await
    }

    /// POST 创建实体，请求体不含 id，返回服务器分配 id 后的实体
    pub async fn create<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)
            .json(payload)
            .send()
            .await?;
        handle_http_response(response, path).await
    }

    /// PUT 更新实体
    pub async fn update<B, T>(&self, path: &str, id: i64, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let item_path = Self::item_path(path, id);
        let response = self
            .request(Method::PUT, &item_path)
            .json(payload)
            .send()
            .await?;
        handle_http_response(response, &item_path).await
    }

    /// DELETE 实体，只关心是否成功，响应体被忽略
    pub async fn delete(&self, path: &str, id: i64) -> Result<()> {
        let item_path = Self::item_path(path, id);
        let response = self.request(Method::DELETE, &item_path).send().await?;
        read_success_body(response, &item_path).await?;
        Ok(())
    }

    /// PUT `{path}/{id}/status`，只修改状态字段
    pub async fn status_transition<S, T>(&self, path: &str, id: i64, status: &S) -> Result<T>
    where
        S: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let status_path = format!("{}/status", Self::item_path(path, id));
        let response = self
            .request(Method::PUT, &status_path)
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        handle_http_response(response, &status_path).await
    }

    /// GET `{path}?skip=N&limit=M`，总数来自可选的 `X-Total-Count` 响应头
    pub async fn list_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        skip: usize,
        limit: usize,
    ) -> Result<Paged<T>> {
        let response = self
            .request(Method::GET, path)
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;

        let total_count = parse_total_count(response.headers());
        let items = handle_http_response(response, path).await?;
        Ok(Paged { items, total_count })
    }
}

fn parse_total_count(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get(TOTAL_COUNT_HEADER)?;
    match raw.to_str().ok().and_then(|s| s.trim().parse::<u64>().ok()) {
        Some(total) => Some(total),
        None => {
            warn!("[Gateway] 忽略无法解析的 {}: {:?}", TOTAL_COUNT_HEADER, raw);
            None
        }
    }
}

/// 读取响应 body，非 2xx 视为失败
async fn read_success_body(response: reqwest::Response, operation: &str) -> Result<Vec<u8>> {
    let status = response.status();
    let body_bytes = response.bytes().await?;
    let body_str = String::from_utf8_lossy(&body_bytes);
    debug!("[Gateway] {} 响应 Body: {}", operation, body_str);

    if !status.is_success() {
        error!(
            "[Gateway] {} 请求失败，HTTP状态: {}, 响应: {}",
            operation, status, body_str
        );
        return Err(ClinicError::Http {
            status: status.as_u16(),
            body: body_str.into_owned(),
        });
    }

    Ok(body_bytes.to_vec())
}

/// 通用 HTTP 响应处理：检查状态码后反序列化 body
pub(crate) async fn handle_http_response<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> Result<T> {
    let body_bytes = read_success_body(response, operation).await?;
    serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[Gateway] {} 反序列化失败: {:?}\n原始响应: {}",
            operation,
            e,
            String::from_utf8_lossy(&body_bytes)
        );
        ClinicError::Decode(e)
    })
}
