//! Pagination controller
//!
//! Owns the page state of one paginated listing and merges fetched pages
//! into it, either replacing (jump to page) or appending (load more).

use super::types::{
    ConcurrencyPolicy, NavigationIntent, PageState, PaginationItems, PaginatorInfo,
};
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::navigation::{NavigateOptions, Navigator, NoopNavigator};
use crate::query::{QueryClient, QueryRequest};
use crate::types::{DependencyKey, JsonObject, JsonValue};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How a resolved page is merged into the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    Replace,
    Append,
}

struct Inner<TModel, TData> {
    client: Arc<dyn QueryClient>,
    extractor: Arc<dyn Extractor<TData, TModel>>,
    navigator: Arc<dyn Navigator>,
    document: String,
    variables: JsonObject,
    page_variable: String,
    navigate_on_page_ops: bool,
    concurrency: ConcurrencyPolicy,
    initial: PageState<TModel>,
    state: RwLock<PageState<TModel>>,
    dependencies: Mutex<Vec<DependencyKey>>,
    /// Generation of the most recently issued request or reset
    issued: AtomicU64,
}

/// Client-side pagination state machine
///
/// Cloning yields another handle to the same state.
pub struct PaginationController<TModel, TData = JsonValue> {
    inner: Arc<Inner<TModel, TData>>,
}

impl<TModel, TData> Clone for PaginationController<TModel, TData> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<TModel, TData> std::fmt::Debug for PaginationController<TModel, TData> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("page_variable", &self.inner.page_variable)
            .field("navigate_on_page_ops", &self.inner.navigate_on_page_ops)
            .field("concurrency", &self.inner.concurrency)
            .finish_non_exhaustive()
    }
}

impl<TModel, TData> PaginationController<TModel, TData>
where
    TModel: Clone + Send + Sync + 'static,
    TData: DeserializeOwned + Send + 'static,
{
    /// Start building a controller for a query document
    pub fn builder(
        client: Arc<dyn QueryClient>,
        document: impl Into<String>,
    ) -> PaginationControllerBuilder<TModel, TData> {
        PaginationControllerBuilder::new(client, document)
    }

    // ========================================================================
    // State access
    // ========================================================================

    fn read(&self) -> RwLockReadGuard<'_, PageState<TModel>> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PageState<TModel>> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current items
    pub fn items(&self) -> Vec<TModel> {
        self.read().items.clone()
    }

    /// Current paginator info
    pub fn paginator_info(&self) -> PaginatorInfo {
        self.read().paginator_info.clone()
    }

    /// Copy of the whole current state
    pub fn snapshot(&self) -> PageState<TModel> {
        self.read().clone()
    }

    /// State the controller resets to
    pub fn initial_state(&self) -> &PageState<TModel> {
        &self.inner.initial
    }

    /// Dependency set currently tracked
    pub fn dependencies(&self) -> Vec<DependencyKey> {
        self.inner
            .dependencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrite the state wholesale, bypassing any fetch
    pub fn set_items(&self, state: PageState<TModel>) {
        *self.write() = state;
    }

    /// Reset to the initial state if the dependency set changed
    ///
    /// Keys are compared structurally and in order. Returns whether a reset
    /// happened. In-flight fetches are not awaited or cancelled.
    pub fn reset_state(&self, dependencies: &[DependencyKey]) -> bool {
        let mut tracked = self
            .inner
            .dependencies
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if tracked.as_slice() == dependencies {
            return false;
        }
        *tracked = dependencies.to_vec();

        let mut state = self.write();
        if self.inner.concurrency == ConcurrencyPolicy::LatestIssuedWins {
            self.inner.issued.fetch_add(1, Ordering::SeqCst);
        }
        *state = self.inner.initial.clone();
        debug!("Dependencies changed, state reset to initial page");
        true
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Jump to a page, replacing the current items
    ///
    /// On failure the state is left untouched and the error is returned.
    pub async fn go_to_page(&self, page: u32, url: &str) -> Result<()> {
        self.fetch(page, url, Merge::Replace).await
    }

    /// Fetch a page and append its items to the current ones
    ///
    /// Items are appended to whatever the state holds when the fetch
    /// resolves, not when it was issued.
    pub async fn load_more(&self, page: u32, url: &str) -> Result<()> {
        self.fetch(page, url, Merge::Append).await
    }

    /// Dispatch a navigation intent
    pub async fn navigate(&self, intent: NavigationIntent) -> Result<()> {
        match intent {
            NavigationIntent::PageChange { page, url } => self.go_to_page(page, &url).await,
            NavigationIntent::LoadMore { page, url } => self.load_more(page, &url).await,
        }
    }

    /// Fire-and-forget [`go_to_page`](Self::go_to_page) on the tokio runtime
    pub fn on_page_changed(&self, page: u32, url: impl Into<String>) -> JoinHandle<Result<()>> {
        self.spawn(NavigationIntent::page_change(page, url))
    }

    /// Fire-and-forget [`load_more`](Self::load_more) on the tokio runtime
    pub fn on_load_more(&self, page: u32, url: impl Into<String>) -> JoinHandle<Result<()>> {
        self.spawn(NavigationIntent::load_more(page, url))
    }

    fn spawn(&self, intent: NavigationIntent) -> JoinHandle<Result<()>> {
        let controller = self.clone();
        tokio::spawn(async move {
            let page = intent.page();
            let result = controller.navigate(intent).await;
            if let Err(ref e) = result {
                warn!("Navigation to page {} failed: {}", page, e);
            }
            result
        })
    }

    fn request(&self, page: u32) -> QueryRequest {
        let mut variables = self.inner.variables.clone();
        variables.insert(self.inner.page_variable.clone(), JsonValue::from(page));
        QueryRequest::new(self.inner.document.clone()).with_variables(variables)
    }

    async fn fetch(&self, page: u32, url: &str, merge: Merge) -> Result<()> {
        let generation = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Fetching page {} ({:?}, generation {})", page, merge, generation);

        let raw = self.inner.client.execute(&self.request(page)).await?;
        let data: TData = serde_json::from_value(raw)
            .map_err(|e| Error::decode(format!("Unexpected payload for page {page}: {e}")))?;
        let extracted: Option<PaginationItems<TModel>> = self.inner.extractor.extract(data);

        {
            let mut state = self.write();
            if self.inner.concurrency == ConcurrencyPolicy::LatestIssuedWins
                && self.inner.issued.load(Ordering::SeqCst) != generation
            {
                debug!("Discarding superseded page {} (generation {})", page, generation);
                return Ok(());
            }
            match merge {
                Merge::Replace => *state = PageState::from_items(extracted),
                Merge::Append => state.append(extracted),
            }
            debug!(
                "Applied page {}: {} item(s), current page {}",
                page,
                state.items.len(),
                state.paginator_info.current_page
            );
        }

        if self.inner.navigate_on_page_ops {
            self.inner.navigator.publish(url, NavigateOptions::shallow());
            if merge == Merge::Replace {
                self.inner.navigator.reset_scroll();
            }
        }

        Ok(())
    }
}

/// Builder for [`PaginationController`]
pub struct PaginationControllerBuilder<TModel, TData = JsonValue> {
    client: Arc<dyn QueryClient>,
    document: String,
    variables: JsonObject,
    page_variable: String,
    extractor: Option<Arc<dyn Extractor<TData, TModel>>>,
    navigator: Arc<dyn Navigator>,
    initial: Option<PaginationItems<TModel>>,
    dependencies: Vec<DependencyKey>,
    navigate_on_page_ops: bool,
    concurrency: ConcurrencyPolicy,
}

impl<TModel, TData> PaginationControllerBuilder<TModel, TData>
where
    TModel: Clone + Send + Sync + 'static,
    TData: DeserializeOwned + Send + 'static,
{
    /// Create a builder
    pub fn new(client: Arc<dyn QueryClient>, document: impl Into<String>) -> Self {
        Self {
            client,
            document: document.into(),
            variables: JsonObject::new(),
            page_variable: "page".to_string(),
            extractor: None,
            navigator: Arc::new(NoopNavigator),
            initial: None,
            dependencies: Vec::new(),
            navigate_on_page_ops: true,
            concurrency: ConcurrencyPolicy::default(),
        }
    }

    /// Set base query variables
    #[must_use]
    pub fn variables(mut self, variables: JsonObject) -> Self {
        self.variables = variables;
        self
    }

    /// Set a single base query variable
    #[must_use]
    pub fn variable(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Name of the variable carrying the page number (default: "page")
    #[must_use]
    pub fn page_variable(mut self, name: impl Into<String>) -> Self {
        self.page_variable = name.into();
        self
    }

    /// Set the extractor
    #[must_use]
    pub fn extractor(mut self, extractor: impl Extractor<TData, TModel> + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Set the navigator (default: [`NoopNavigator`])
    #[must_use]
    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Arc::new(navigator);
        self
    }

    /// Set the initial page
    #[must_use]
    pub fn initial(mut self, page: PaginationItems<TModel>) -> Self {
        self.initial = Some(page);
        self
    }

    /// Set the initial dependency set
    #[must_use]
    pub fn dependencies(mut self, dependencies: Vec<DependencyKey>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Publish locations and reset scroll after navigation (default: true)
    #[must_use]
    pub fn navigate_on_page_ops(mut self, enabled: bool) -> Self {
        self.navigate_on_page_ops = enabled;
        self
    }

    /// Set the concurrency policy
    #[must_use]
    pub fn concurrency(mut self, policy: ConcurrencyPolicy) -> Self {
        self.concurrency = policy;
        self
    }

    /// Build the controller
    pub fn build(self) -> Result<PaginationController<TModel, TData>> {
        let extractor = self
            .extractor
            .ok_or_else(|| Error::config("Pagination controller requires an extractor"))?;
        if self.page_variable.is_empty() {
            return Err(Error::config("Page variable name cannot be empty"));
        }

        let initial = PageState::from_items(self.initial);

        Ok(PaginationController {
            inner: Arc::new(Inner {
                client: self.client,
                extractor,
                navigator: self.navigator,
                document: self.document,
                variables: self.variables,
                page_variable: self.page_variable,
                navigate_on_page_ops: self.navigate_on_page_ops,
                concurrency: self.concurrency,
                state: RwLock::new(initial.clone()),
                initial,
                dependencies: Mutex::new(self.dependencies),
                issued: AtomicU64::new(0),
            }),
        })
    }
}
