//! HTTP 传输层
//!
//! 所有请求都相对于配置的基础地址发出，会话中存在令牌时附加
//! `Authorization: Bearer <token>`。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use tracing::debug;

use super::config::ApiConfig;
use crate::app::product::{Product, ProductApi, ProductPayload};
use crate::app::session::SessionContext;
use crate::core::error::{CoreError, Result};
use crate::core::response::parse_product_list;

const PRODUCTS_PATH: [&str; 2] = ["api", "products"];

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    session: SessionContext,
}

fn invalid_url(detail: String) -> CoreError {
    CoreError::Transport {
        status: None,
        message: None,
        detail,
    }
}

impl HttpTransport {
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| invalid_url(format!("无效的 API 地址 {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid_url(format!("无效的 API 地址: {}", config.base_url)));
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// 在基础地址后逐段追加路径，每段单独做百分号编码
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| invalid_url(format!("无效的 API 地址: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 附加会话令牌
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// 非 2xx 响应转换为错误，保留服务端的 message
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(CoreError::from_status(status.as_u16(), &body))
    }
}

#[async_trait]
impl ProductApi for HttpTransport {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let url = self.endpoint(&PRODUCTS_PATH)?;
        debug!("GET {}", url.path());
        let request = self.authorize(self.client.get(url));
        let response = Self::check(request.send().await?).await?;
        let body = response.text().await?;
        parse_product_list(&body)
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
        let url = self.endpoint(&PRODUCTS_PATH)?;
        debug!("POST {} ({})", url.path(), payload.product_name);
        let request = self.authorize(self.client.post(url).json(payload));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        let [root, products] = PRODUCTS_PATH;
        let url = self.endpoint(&[root, products, id])?;
        debug!("DELETE {}", url.path());
        let request = self.authorize(self.client.delete(url));
        Self::check(request.send().await?).await?;
        Ok(())
    }
}
