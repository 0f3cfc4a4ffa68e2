//! Lazy, restartable account listing

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::warn;

use crate::domain::entities::{AccountIdentity, AccountPage, Operation, PageRequest};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::IdentityProvider;

use super::config::MAX_PAGE_SIZE;
use super::upstream::{bounded, upstream};

/// Upper bound on pages walked by one stream
pub const MAX_LISTING_PAGES: u32 = 10_000;

/// Accounts matching a filter, fetched from the provider one page at a time
///
/// Nothing is fetched until `page` is awaited or `stream` is polled. Each
/// call to `stream` starts again from the first page.
pub struct AccountListing<P>
where
    P: IdentityProvider + 'static,
{
    provider: Arc<P>,
    email_filter: Option<String>,
    per_page: u32,
    timeout: Duration,
}

impl<P> AccountListing<P>
where
    P: IdentityProvider + 'static,
{
    pub(crate) fn new(
        provider: Arc<P>,
        email_filter: Option<String>,
        per_page: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            email_filter,
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
            timeout,
        }
    }

    /// Use a different page size, clamped to the provider maximum
    pub fn with_page_size(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn email_filter(&self) -> Option<&str> {
        self.email_filter.as_deref()
    }

    /// Fetch a single page; pages start at 1
    pub async fn page(&self, page: u32) -> DomainResult<AccountPage> {
        if page == 0 {
            return Err(DomainError::validation("page", "must be at least 1"));
        }
        let request = PageRequest {
            page,
            per_page: self.per_page,
            email_filter: self.email_filter.clone(),
        };
        fetch_page(self.provider.as_ref(), &request, self.timeout).await
    }

    /// A fresh stream over every matching account
    ///
    /// A page can come back empty after filtering while later pages still
    /// match, so only `has_more` ends the walk. The stream ends after the
    /// first provider failure.
    pub fn stream(&self) -> BoxStream<'static, DomainResult<AccountIdentity>> {
        let provider = Arc::clone(&self.provider);
        let timeout = self.timeout;
        let first = PageRequest::first(self.per_page, self.email_filter.clone());

        stream::try_unfold(Some(first), move |next: Option<PageRequest>| {
            let provider = Arc::clone(&provider);
            async move {
                let Some(request) = next else {
                    return Ok(None);
                };
                let page = fetch_page(provider.as_ref(), &request, timeout).await?;
                let following = if !page.has_more {
                    None
                } else if request.page >= MAX_LISTING_PAGES {
                    warn!(
                        pages = request.page,
                        "Provider still reports more accounts; listing stopped"
                    );
                    None
                } else {
                    Some(request.next())
                };
                Ok::<_, DomainError>(Some((page.accounts, following)))
            }
        })
        .map_ok(|accounts| stream::iter(accounts.into_iter().map(Ok::<_, DomainError>)))
        .try_flatten()
        .boxed()
    }

    /// Drain `stream` into memory
    pub async fn collect_all(&self) -> DomainResult<Vec<AccountIdentity>> {
        self.stream().try_collect().await
    }
}

impl<P> Clone for AccountListing<P>
where
    P: IdentityProvider + 'static,
{
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            email_filter: self.email_filter.clone(),
            per_page: self.per_page,
            timeout: self.timeout,
        }
    }
}

async fn fetch_page<P>(provider: &P, request: &PageRequest, limit: Duration) -> DomainResult<AccountPage>
where
    P: IdentityProvider + ?Sized,
{
    bounded(limit, provider.list_users(request))
        .await
        .map_err(|e| upstream(Operation::ListAccounts.as_str(), &e))
}
