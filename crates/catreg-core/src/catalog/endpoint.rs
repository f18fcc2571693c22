use std::fmt;

/// Catalog view a payload is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Containers,
    Tables,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Containers => "containers",
            ViewType::Tables => "tables",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URL, catalog name and API version; builds every catalog URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoint {
    base_url: String,
    catalog: String,
    api_version: String,
}

impl CatalogEndpoint {
    pub const DEFAULT_API_VERSION: &'static str = "2015-07.1.0-Preview";

    pub fn new(base_url: &str, catalog: &str, api_version: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            catalog: catalog.to_string(),
            api_version: api_version.to_string(),
        }
    }

    /// `https://{tenant}.datacatalog.azure.com`.
    pub fn for_tenant(tenant: &str, catalog: &str, api_version: &str) -> Self {
        Self::new(&format!("https://{}.datacatalog.azure.com", tenant), catalog, api_version)
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    fn views_root(&self) -> String {
        format!("{}/{}/views", self.base_url, self.catalog)
    }

    /// `{base}/{catalog}/views/{view}?api-version=..`
    pub fn view_url(&self, view: ViewType) -> String {
        format!("{}/{}?api-version={}", self.views_root(), view, self.api_version)
    }

    /// URL of a created resource given its `Location`, resolved like a browser
    /// would against the views root: absolute values stand, `/...` replaces the
    /// path, and bare ids such as `tables/abc` land under `views/`. Query dropped.
    pub fn resource_url(&self, location: &str) -> String {
        let location = location.split('?').next().unwrap_or(location);
        let root = format!("{}/", self.views_root());
        let resolved = url::Url::parse(&root)
            .and_then(|base| base.join(location))
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", root, location.trim_start_matches('/')));
        resolved.trim_end_matches('/').to_string()
    }

    /// `{resource}/{annotation}?api-version=..`, e.g. the `descriptions` of an asset.
    pub fn annotation_url(&self, location: &str, annotation: &str) -> String {
        format!(
            "{}/{}?api-version={}",
            self.resource_url(location),
            annotation,
            self.api_version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> CatalogEndpoint {
        CatalogEndpoint::for_tenant("contoso", "DefaultCatalog", CatalogEndpoint::DEFAULT_API_VERSION)
    }

    #[test]
    fn view_urls() {
        assert_eq!(
            endpoint().view_url(ViewType::Containers),
            "https://contoso.datacatalog.azure.com/DefaultCatalog/views/containers?api-version=2015-07.1.0-Preview"
        );
        assert_eq!(
            endpoint().view_url(ViewType::Tables),
            "https://contoso.datacatalog.azure.com/DefaultCatalog/views/tables?api-version=2015-07.1.0-Preview"
        );
    }

    #[test]
    fn annotation_url_from_absolute_location() {
        let loc = "https://contoso.datacatalog.azure.com/DefaultCatalog/views/tables/abc?api-version=x";
        assert_eq!(
            endpoint().annotation_url(loc, "descriptions"),
            "https://contoso.datacatalog.azure.com/DefaultCatalog/views/tables/abc/descriptions?api-version=2015-07.1.0-Preview"
        );
    }

    #[test]
    fn annotation_url_from_relative_location() {
        assert_eq!(
            endpoint().annotation_url("tables/abc", "descriptions"),
            "https://contoso.datacatalog.azure.com/DefaultCatalog/views/tables/abc/descriptions?api-version=2015-07.1.0-Preview"
        );
    }

    #[test]
    fn annotation_url_from_host_relative_location() {
        assert_eq!(
            endpoint().annotation_url("/DefaultCatalog/views/tables/t1", "descriptions"),
            "https://contoso.datacatalog.azure.com/DefaultCatalog/views/tables/t1/descriptions?api-version=2015-07.1.0-Preview"
        );
    }

    #[test]
    fn host_relative_location_keeps_base_host_and_port() {
        let e = CatalogEndpoint::new("http://127.0.0.1:8080", "DefaultCatalog", "v1");
        assert_eq!(
            e.resource_url("/DefaultCatalog/views/tables/t1?api-version=v1"),
            "http://127.0.0.1:8080/DefaultCatalog/views/tables/t1"
        );
        assert_eq!(
            e.resource_url("tables/t1/"),
            "http://127.0.0.1:8080/DefaultCatalog/views/tables/t1"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let e = CatalogEndpoint::new("http://127.0.0.1:8080/", "c", "v1");
        assert_eq!(e.view_url(ViewType::Tables), "http://127.0.0.1:8080/c/views/tables?api-version=v1");
    }
}
