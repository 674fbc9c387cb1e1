//! 商品状态仓库
//!
//! 本地商品集合始终等于最近一次完成的拉取结果：新建和删除成功后都会触发一次
//! 全量重新拉取，从不在本地合并或乐观更新。多个重新拉取并发时，最后到达的
//! 响应覆盖集合，不保证因果顺序。
//!
//! 每次拉取都会记录当前请求上下文的代号，视图退出（[`ProductStore::retire`]）
//! 之后才到达的响应会被直接丢弃。

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::draft::DraftForm;
use super::filter::filter_products;
use super::model::{Product, ProductPayload};
use crate::core::error::{CoreError, Result};
use crate::core::notice::{
    Notice, NoticeSink, CREATE_FAILED, CREATE_SUCCEEDED, DELETE_FAILED, FETCH_FAILED,
};

/// 商品接口传输层
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// 获取全部商品，按服务端顺序返回
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn create_product(&self, payload: &ProductPayload) -> Result<()>;
    async fn delete_product(&self, id: &str) -> Result<()>;
}

#[derive(Debug, Default)]
struct StoreState {
    products: Vec<Product>,
    in_flight_fetches: usize,
    submitting: bool,
    generation: u64,
}

pub struct ProductStore {
    api: Arc<dyn ProductApi>,
    notices: Arc<dyn NoticeSink>,
    state: Mutex<StoreState>,
}

/// 拉取期间持有，析构时释放 loading
struct LoadingGuard<'a> {
    state: &'a Mutex<StoreState>,
    generation: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        // 上下文已退出时计数已被清零
        if state.generation == self.generation {
            state.in_flight_fetches = state.in_flight_fetches.saturating_sub(1);
        }
    }
}

/// 提交期间持有，析构时释放 submitting
struct SubmittingGuard<'a> {
    state: &'a Mutex<StoreState>,
    generation: u64,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.generation == self.generation {
            state.submitting = false;
        }
    }
}

impl ProductStore {
    pub fn new(api: Arc<dyn ProductApi>, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            api,
            notices,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// 当前商品集合快照
    pub fn products(&self) -> Vec<Product> {
        self.state.lock().products.clone()
    }

    /// 按搜索词过滤后的快照
    pub fn filtered(&self, search: &str) -> Vec<Product> {
        let state = self.state.lock();
        filter_products(&state.products, search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight_fetches > 0
    }

    pub fn is_submitting(&self) -> bool {
        self.state.lock().submitting
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// 退出当前请求上下文
    ///
    /// 尚未返回的请求在到达后不会再修改集合，也不会发布通知。
    /// 之后发起的请求属于新的上下文。
    pub fn retire(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.in_flight_fetches = 0;
        state.submitting = false;
        debug!(generation = state.generation, "商品请求上下文已退出");
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.lock().generation == generation
    }

    fn begin_fetch(&self) -> LoadingGuard<'_> {
        let mut state = self.state.lock();
        state.in_flight_fetches += 1;
        LoadingGuard {
            state: &self.state,
            generation: state.generation,
        }
    }

    fn begin_submit(&self) -> Result<SubmittingGuard<'_>> {
        let mut state = self.state.lock();
        if state.submitting {
            return Err(CoreError::SubmissionInProgress);
        }
        state.submitting = true;
        Ok(SubmittingGuard {
            state: &self.state,
            generation: state.generation,
        })
    }

    /// 全量拉取商品并替换本地集合
    ///
    /// 失败时保留原集合、发布失败通知并记录错误详情。
    pub async fn fetch_all(&self) -> Result<()> {
        let loading = self.begin_fetch();
        let generation = loading.generation;

        let result = self.api.list_products().await;

        let outcome = {
            let mut state = self.state.lock();
            if state.generation != generation {
                None
            } else {
                Some(result.map(|products| {
                    let count = products.len();
                    state.products = products;
                    count
                }))
            }
        };
        drop(loading);

        match outcome {
            None => {
                debug!(generation, "丢弃过期的商品列表响应");
                Ok(())
            }
            Some(Ok(count)) => {
                info!("商品列表已同步: {} 条", count);
                Ok(())
            }
            Some(Err(err)) => {
                error!("获取商品列表失败: {}", err);
                self.notices.publish(Notice::failure(FETCH_FAILED));
                Err(err)
            }
        }
    }

    /// 提交新商品
    ///
    /// 成功后清空草稿并重新拉取；失败时草稿保持原样，方便用户直接重试。
    pub async fn create(&self, draft: &mut DraftForm) -> Result<()> {
        let payload = draft.to_payload()?;

        let submitting = self.begin_submit()?;
        let generation = submitting.generation;
        let result = self.api.create_product(&payload).await;
        drop(submitting);

        if !self.is_current(generation) {
            debug!(generation, "上下文已退出，忽略新建结果");
            return result;
        }

        match result {
            Ok(()) => {
                info!("商品已创建: {}", payload.product_name);
                draft.reset();
                self.notices.publish(Notice::success(CREATE_SUCCEEDED));
                self.resync().await;
                Ok(())
            }
            Err(err) => {
                error!("新建商品失败: {}", err);
                let message = err.server_message().unwrap_or(CREATE_FAILED);
                self.notices.publish(Notice::failure(message));
                Err(err)
            }
        }
    }

    /// 删除商品，成功后重新拉取
    pub async fn remove(&self, id: &str) -> Result<()> {
        let generation = self.generation();
        let result = self.api.delete_product(id).await;

        if !self.is_current(generation) {
            debug!(generation, "上下文已退出，忽略删除结果");
            return result;
        }

        match result {
            Ok(()) => {
                info!("商品已删除: {}", id);
                self.resync().await;
                Ok(())
            }
            Err(err) => {
                error!("删除商品 {} 失败: {}", id, err);
                self.notices.publish(Notice::failure(DELETE_FAILED));
                Err(err)
            }
        }
    }

    /// 变更后的重新拉取，失败已在 fetch_all 内部通知
    async fn resync(&self) {
        if let Err(err) = self.fetch_all().await {
            warn!("变更后重新同步失败: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notice::{ChannelSink, NoticeKind};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, oneshot};

    enum Reply<T> {
        Ready(Result<T>),
        Gated(oneshot::Receiver<Result<T>>),
    }

    fn gate<T>() -> (oneshot::Sender<Result<T>>, Reply<T>) {
        let (tx, rx) = oneshot::channel();
        (tx, Reply::Gated(rx))
    }

    fn transport_error(message: Option<&str>) -> CoreError {
        CoreError::Transport {
            status: Some(500),
            message: message.map(str::to_string),
            detail: "internal error".to_string(),
        }
    }

    #[derive(Default)]
    struct ScriptedApi {
        lists: Mutex<VecDeque<Reply<Vec<Product>>>>,
        creates: Mutex<VecDeque<Reply<()>>>,
        deletes: Mutex<VecDeque<Reply<()>>>,
        submitted: Mutex<Vec<ProductPayload>>,
        pending: AtomicUsize,
    }

    impl ScriptedApi {
        fn list(self, reply: Reply<Vec<Product>>) -> Self {
            self.lists.lock().push_back(reply);
            self
        }

        fn create(self, reply: Reply<()>) -> Self {
            self.creates.lock().push_back(reply);
            self
        }

        fn delete(self, reply: Reply<()>) -> Self {
            self.deletes.lock().push_back(reply);
            self
        }

        fn pending(&self) -> usize {
            self.pending.load(Ordering::SeqCst)
        }

        async fn resolve<T>(&self, reply: Option<Reply<T>>) -> Result<T> {
            match reply.expect("unexpected api call") {
                Reply::Ready(result) => result,
                Reply::Gated(rx) => {
                    self.pending.fetch_add(1, Ordering::SeqCst);
                    let result = rx.await.expect("gate dropped");
                    self.pending.fetch_sub(1, Ordering::SeqCst);
                    result
                }
            }
        }
    }

    #[async_trait]
    impl ProductApi for ScriptedApi {
        async fn list_products(&self) -> Result<Vec<Product>> {
            let reply = self.lists.lock().pop_front();
            self.resolve(reply).await
        }

        async fn create_product(&self, payload: &ProductPayload) -> Result<()> {
            self.submitted.lock().push(payload.clone());
            let reply = self.creates.lock().pop_front();
            self.resolve(reply).await
        }

        async fn delete_product(&self, _id: &str) -> Result<()> {
            let reply = self.deletes.lock().pop_front();
            self.resolve(reply).await
        }
    }

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            product_name: name.to_string(),
            price: 10.0,
            rating: 4.0,
            discount: 0.0,
            availability: "In Stock".to_string(),
            category: "Stationery".to_string(),
            company: "Acme".to_string(),
        }
    }

    fn cup_draft() -> DraftForm {
        DraftForm {
            product_name: "Cup".to_string(),
            price: "5".to_string(),
            rating: "4".to_string(),
            category: "Kitchen".to_string(),
            company: "Acme".to_string(),
            ..DraftForm::default()
        }
    }

    fn setup(
        api: ScriptedApi,
    ) -> (Arc<ProductStore>, Arc<ScriptedApi>, mpsc::UnboundedReceiver<Notice>) {
        let api = Arc::new(api);
        let (sink, rx) = ChannelSink::channel();
        let store = Arc::new(ProductStore::new(api.clone(), Arc::new(sink)));
        (store, api, rx)
    }

    async fn until(cond: impl Fn() -> bool) {
        while !cond() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_collection() {
        let (store, _api, mut notices) = setup(
            ScriptedApi::default()
                .list(Reply::Ready(Ok(vec![product("1", "Pen")])))
                .list(Reply::Ready(Ok(vec![product("2", "Mug"), product("3", "Cup")]))),
        );

        store.fetch_all().await.unwrap();
        assert_eq!(store.products(), vec![product("1", "Pen")]);

        store.fetch_all().await.unwrap();
        let ids: Vec<_> = store.products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["2", "3"]);
        assert!(!store.is_loading());
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_collection() {
        let (store, _api, mut notices) = setup(
            ScriptedApi::default()
                .list(Reply::Ready(Ok(vec![product("1", "Pen")])))
                .list(Reply::Ready(Err(transport_error(None)))),
        );

        store.fetch_all().await.unwrap();
        let before = store.products();

        assert!(store.fetch_all().await.is_err());
        assert_eq!(store.products(), before);
        assert!(!store.is_loading());

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.kind, NoticeKind::Failure);
        assert_eq!(notice.message, FETCH_FAILED);
    }

    #[tokio::test]
    async fn test_loading_flag_lifecycle() {
        let (tx, reply) = gate();
        let (store, api, _notices) = setup(ScriptedApi::default().list(reply));

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_all().await }
        });

        until(|| api.pending() == 1).await;
        assert!(store.is_loading());

        tx.send(Err(transport_error(None))).unwrap();
        assert!(task.await.unwrap().is_err());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_create_success_resets_draft_and_resyncs() {
        let (tx, reply) = gate();
        let (store, api, mut notices) = setup(
            ScriptedApi::default()
                .create(Reply::Ready(Ok(())))
                .list(reply),
        );

        let task = tokio::spawn({
            let store = store.clone();
            async move {
                let mut draft = cup_draft();
                let result = store.create(&mut draft).await;
                (result, draft)
            }
        });

        // 重新拉取完成之前集合不包含新商品
        until(|| api.pending() == 1).await;
        assert!(store.products().is_empty());
        assert!(!store.is_submitting());

        tx.send(Ok(vec![product("9", "Cup")])).unwrap();
        let (result, draft) = task.await.unwrap();

        assert!(result.is_ok());
        assert_eq!(draft, DraftForm::default());
        assert_eq!(store.products(), vec![product("9", "Cup")]);

        let submitted = api.submitted.lock().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].price, 5.0);
        assert_eq!(submitted[0].rating, 4.0);
        assert_eq!(submitted[0].discount, 0.0);
        assert_eq!(submitted[0].availability, "In Stock");

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, CREATE_SUCCEEDED);
    }

    #[tokio::test]
    async fn test_create_failure_keeps_draft() {
        let (store, _api, mut notices) = setup(
            ScriptedApi::default()
                .create(Reply::Ready(Err(transport_error(Some(
                    "Product already exists",
                )))))
                .create(Reply::Ready(Err(transport_error(None)))),
        );

        let mut draft = cup_draft();
        let before = draft.clone();

        assert!(store.create(&mut draft).await.is_err());
        assert_eq!(draft, before);
        assert_eq!(notices.try_recv().unwrap().message, "Product already exists");

        assert!(store.create(&mut draft).await.is_err());
        assert_eq!(draft, before);
        assert_eq!(notices.try_recv().unwrap().message, CREATE_FAILED);

        assert!(!store.is_submitting());
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn test_create_validation_sends_nothing() {
        let (store, api, mut notices) = setup(ScriptedApi::default());

        let mut draft = cup_draft();
        draft.company.clear();
        let before = draft.clone();

        let err = store.create(&mut draft).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(draft, before);
        assert!(api.submitted.lock().is_empty());
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_concurrent_create_rejected() {
        let (tx, reply) = gate();
        let (store, api, _notices) = setup(
            ScriptedApi::default()
                .create(reply)
                .list(Reply::Ready(Ok(vec![product("9", "Cup")]))),
        );

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.create(&mut cup_draft()).await }
        });

        until(|| api.pending() == 1).await;
        assert!(store.is_submitting());

        let mut second = cup_draft();
        let err = store.create(&mut second).await.unwrap_err();
        assert!(matches!(err, CoreError::SubmissionInProgress));
        assert_eq!(second, cup_draft());

        tx.send(Ok(())).unwrap();
        assert!(task.await.unwrap().is_ok());
        assert!(!store.is_submitting());
        assert_eq!(api.submitted.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_resyncs_without_id() {
        let (store, _api, _notices) = setup(
            ScriptedApi::default()
                .list(Reply::Ready(Ok(vec![product("1", "Pen"), product("2", "Mug")])))
                .delete(Reply::Ready(Ok(())))
                .list(Reply::Ready(Ok(vec![product("2", "Mug")]))),
        );

        store.fetch_all().await.unwrap();
        store.remove("1").await.unwrap();

        assert!(store.products().iter().all(|p| p.id != "1"));
        assert_eq!(store.products().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_collection() {
        let (store, _api, mut notices) = setup(
            ScriptedApi::default()
                .list(Reply::Ready(Ok(vec![product("1", "Pen")])))
                .delete(Reply::Ready(Err(transport_error(Some("not found"))))),
        );

        store.fetch_all().await.unwrap();
        let before = store.products();

        assert!(store.remove("1").await.is_err());
        assert_eq!(store.products(), before);

        let notice = notices.try_recv().unwrap();
        assert!(notice.is_failure());
        assert_eq!(notice.message, DELETE_FAILED);
    }

    #[tokio::test]
    async fn test_overlapping_resyncs_last_response_wins() {
        let (first_tx, first) = gate();
        let (second_tx, second) = gate();
        let (store, api, _notices) = setup(
            ScriptedApi::default()
                .create(Reply::Ready(Ok(())))
                .delete(Reply::Ready(Ok(())))
                .list(first)
                .list(second),
        );

        let creating = tokio::spawn({
            let store = store.clone();
            async move { store.create(&mut cup_draft()).await }
        });
        let removing = tokio::spawn({
            let store = store.clone();
            async move { store.remove("1").await }
        });

        until(|| api.pending() == 2).await;

        first_tx
            .send(Ok(vec![product("1", "Pen"), product("9", "Cup")]))
            .unwrap();
        until(|| api.pending() == 1).await;
        assert_eq!(store.products().len(), 2);
        assert!(store.is_loading());

        second_tx.send(Ok(vec![product("2", "Mug")])).unwrap();
        assert!(creating.await.unwrap().is_ok());
        assert!(removing.await.unwrap().is_ok());

        assert_eq!(store.products(), vec![product("2", "Mug")]);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_retired_context_ignores_late_response() {
        let (tx, reply) = gate();
        let (store, api, mut notices) = setup(
            ScriptedApi::default()
                .list(Reply::Ready(Ok(vec![product("1", "Pen")])))
                .list(reply),
        );

        store.fetch_all().await.unwrap();

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_all().await }
        });
        until(|| api.pending() == 1).await;

        store.retire();
        assert!(!store.is_loading());

        tx.send(Err(transport_error(None))).unwrap();
        assert!(task.await.unwrap().is_ok());

        assert_eq!(store.products(), vec![product("1", "Pen")]);
        assert!(!store.is_loading());
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_retired_context_ignores_late_create() {
        let (tx, reply) = gate();
        let (store, api, mut notices) = setup(
            ScriptedApi::default()
                .create(reply)
                .list(Reply::Ready(Ok(vec![product("9", "Cup")]))),
        );

        let task = tokio::spawn({
            let store = store.clone();
            async move {
                let mut draft = cup_draft();
                let result = store.create(&mut draft).await;
                (result, draft)
            }
        });
        until(|| api.pending() == 1).await;
        assert!(store.is_submitting());

        store.retire();
        assert!(!store.is_submitting());

        tx.send(Ok(())).unwrap();
        let (result, draft) = task.await.unwrap();

        assert!(result.is_ok());
        assert_eq!(draft, cup_draft());
        assert!(!store.is_submitting());
        assert!(!store.is_loading());
        assert!(store.products().is_empty());
        // 没有触发重新拉取
        assert_eq!(api.lists.lock().len(), 1);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_retired_context_ignores_late_remove() {
        let (tx, reply) = gate();
        let (store, api, mut notices) = setup(
            ScriptedApi::default()
                .list(Reply::Ready(Ok(vec![product("1", "Pen"), product("2", "Mug")])))
                .delete(reply)
                .list(Reply::Ready(Ok(vec![product("2", "Mug")]))),
        );

        store.fetch_all().await.unwrap();
        let before = store.products();

        let task = tokio::spawn({
            let store = store.clone();
            async move { store.remove("1").await }
        });
        until(|| api.pending() == 1).await;

        store.retire();
        tx.send(Err(transport_error(Some("not found")))).unwrap();
        assert!(task.await.unwrap().is_err());

        assert_eq!(store.products(), before);
        assert!(!store.is_loading());
        assert_eq!(api.lists.lock().len(), 1);
        assert!(notices.try_recv().is_err());

        // 成功的删除结果同样被忽略
        let (tx, reply) = gate();
        api.deletes.lock().push_back(reply);
        let task = tokio::spawn({
            let store = store.clone();
            async move { store.remove("1").await }
        });
        until(|| api.pending() == 1).await;

        store.retire();
        tx.send(Ok(())).unwrap();
        assert!(task.await.unwrap().is_ok());

        assert_eq!(store.products(), before);
        assert_eq!(api.lists.lock().len(), 1);
        assert!(notices.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_filtered_snapshot() {
        let (store, _api, _notices) = setup(ScriptedApi::default().list(Reply::Ready(Ok(vec![
            product("1", "Pen"),
            product("2", "Mug"),
        ]))));

        store.fetch_all().await.unwrap();
        assert_eq!(store.filtered("PEN"), vec![product("1", "Pen")]);
        assert_eq!(store.filtered("").len(), 2);
    }
}
