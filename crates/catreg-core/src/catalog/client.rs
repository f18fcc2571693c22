use super::endpoint::{CatalogEndpoint, ViewType};
use crate::auth::TokenProvider;
use crate::http::{HttpExecutor, RequestTarget, Transport};
use crate::retry::Failure;

/// The two catalog operations the publisher needs.
pub trait Catalog {
    /// Registers `payload` under `view`; returns the created resource's `Location`.
    fn register(&self, view: ViewType, payload: &str) -> Result<String, Failure>;

    /// Posts `payload` as the `annotation` sub-resource of the resource at `location`.
    fn annotate(&self, location: &str, annotation: &str, payload: &str) -> Result<(), Failure>;
}

/// Catalog REST client on top of the resilient executor.
pub struct CatalogClient<T, P> {
    executor: HttpExecutor<T, P>,
    endpoint: CatalogEndpoint,
}

impl<T: Transport, P: TokenProvider> CatalogClient<T, P> {
    pub fn new(executor: HttpExecutor<T, P>, endpoint: CatalogEndpoint) -> Self {
        Self { executor, endpoint }
    }

    pub fn endpoint(&self) -> &CatalogEndpoint {
        &self.endpoint
    }
}

impl<T: Transport, P: TokenProvider> Catalog for CatalogClient<T, P> {
    fn register(&self, view: ViewType, payload: &str) -> Result<String, Failure> {
        let url = self.endpoint.view_url(view);
        let response = self
            .executor
            .execute(|| RequestTarget::post(url.as_str()), Some(payload.as_bytes()))?;
        let location = response.location().ok_or_else(|| {
            Failure::other(format!(
                "{} registration returned HTTP {} without a Location header",
                view,
                response.status()
            ))
        })?;
        tracing::info!(%view, status = response.status(), status_text = response.status_text(), %location, "registered");
        Ok(location.to_string())
    }

    fn annotate(&self, location: &str, annotation: &str, payload: &str) -> Result<(), Failure> {
        let url = self.endpoint.annotation_url(location, annotation);
        let response = self
            .executor
            .execute(|| RequestTarget::post(url.as_str()), Some(payload.as_bytes()))?;
        tracing::info!(%annotation, %location, status = response.status(), "annotated");
        Ok(())
    }
}
