//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了管理端写入客户端：先执行写入，成功后再路由失效。

use crate::error::FetchResult;
use crate::manager::GeoCache;
use crate::model::AdminRecord;
use crate::sync::invalidation::InvalidationRouter;
use crate::transport::{AdminTransport, Mutation};
use std::sync::Arc;
use tracing::{instrument, warn};

/// 管理端客户端
pub struct AdminClient {
    transport: Arc<dyn AdminTransport>,
    router: InvalidationRouter,
}

impl AdminClient {
    /// 创建新的管理端客户端
    ///
    /// # 参数
    ///
    /// * `transport` - 写入传输层
    /// * `cache` - 会话内的参考数据缓存
    pub fn new(transport: Arc<dyn AdminTransport>, cache: Arc<GeoCache>) -> Self {
        Self {
            transport,
            router: InvalidationRouter::new(cache),
        }
    }

    /// 执行一次写入
    ///
    /// 写入失败时原样返回错误，不触碰任何缓存；
    /// 写入成功后按返回记录的层级判别字段执行失效。
    ///
    /// # 返回值
    ///
    /// 返回服务端写入后的记录
    #[instrument(skip(self), level = "debug", fields(kind = %mutation.kind(), tier = %mutation.tier()))]
    pub async fn execute(&self, mutation: Mutation) -> FetchResult<AdminRecord> {
        let record = self.transport.apply_mutation(&mutation).await?;

        if record.tier() != mutation.tier() {
            warn!(
                "Mutation targeted {} but server returned a {} record (id={}); routing by record",
                mutation.tier(),
                record.tier(),
                record.id()
            );
        }

        self.router.route(mutation.kind(), &record);
        Ok(record)
    }

    pub fn router(&self) -> &InvalidationRouter {
        &self.router
    }
}
