//! Canonical `self` and collection link construction.
//!
//! Entity payloads echo a `self` link and paged collections a `next` link,
//! both rooted at the request's connection info so they survive reverse
//! proxies that rewrite the host.

use actix_web::HttpRequest;
use url::Url;

use crate::domain::{PackageId, TruckId};

/// Scheme and authority of the incoming request.
#[must_use]
pub fn request_base(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

/// Canonical link to one truck.
#[must_use]
pub fn truck_link(base: &str, id: TruckId) -> String {
    format!("{base}/trucks/{id}")
}

/// Canonical link to one package.
#[must_use]
pub fn package_link(base: &str, id: PackageId) -> String {
    format!("{base}/packages/{id}")
}

/// Parsed URL of a collection root, for pagination links.
#[must_use]
pub fn collection_url(base: &str, segment: &str) -> Option<Url> {
    Url::parse(&format!("{base}/{segment}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn entity_links_embed_the_numeric_id() {
        assert_eq!(
            truck_link("http://localhost:8080", TruckId::new(7251)),
            "http://localhost:8080/trucks/7251"
        );
        assert_eq!(
            package_link("http://localhost:8080", PackageId::new(938)),
            "http://localhost:8080/packages/938"
        );
    }

    #[rstest]
    fn collection_urls_parse() {
        let url = collection_url("http://localhost:8080", "packages").expect("parses");
        assert_eq!(url.as_str(), "http://localhost:8080/packages");
    }
}
