//! Pagination limit/offset : `{count, next, previous, results}`

use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};

/// Taille de page maximale acceptée dans `limit`
pub const MAX_LIMIT: usize = 100;

/// Paramètres bruts ; les valeurs invalides retombent sur les valeurs par défaut
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageParams {
    pub fn limit(&self, default: usize) -> usize {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(default)
            .min(MAX_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(req: &HttpRequest, count: usize, limit: usize, offset: usize, results: Vec<T>) -> Self {
        let base = {
            let info = req.connection_info();
            format!("{}://{}{}", info.scheme(), info.host(), req.path())
        };

        let next_offset = offset.saturating_add(limit);
        let next = (next_offset < count)
            .then(|| format!("{}?limit={}&offset={}", base, limit, next_offset));

        let previous = match offset {
            0 => None,
            o if o <= limit => Some(format!("{}?limit={}", base, limit)),
            o => Some(format!("{}?limit={}&offset={}", base, limit, o - limit)),
        };

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case(None, 10)]
    #[case(Some("5"), 5)]
    #[case(Some("0"), 10)]
    #[case(Some("-3"), 10)]
    #[case(Some("abc"), 10)]
    fn limit_falls_back_to_default(#[case] raw: Option<&str>, #[case] expected: usize) {
        let params = PageParams {
            limit: raw.map(String::from),
            offset: None,
        };
        assert_eq!(params.limit(10), expected);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn huge_limit_is_capped() {
        let params = PageParams {
            limit: Some(usize::MAX.to_string()),
            offset: Some(usize::MAX.to_string()),
        };
        assert_eq!(params.limit(10), MAX_LIMIT);
        assert_eq!(params.offset(), usize::MAX);
    }

    #[rstest]
    #[case::huge_offset(10, usize::MAX)]
    #[case::huge_limit(usize::MAX, 10)]
    #[case::both(usize::MAX, usize::MAX)]
    fn huge_values_do_not_overflow(#[case] limit: usize, #[case] offset: usize) {
        let req = TestRequest::get()
            .uri("/api/v1/users/")
            .insert_header(("Host", "api.example"))
            .to_http_request();

        let page: Page<u8> = Page::new(&req, 1, limit, offset, vec![]);

        assert!(page.next.is_none());
        assert!(page.previous.is_some());
    }

    #[test]
    fn links_follow_limit_offset_rules() {
        let req = TestRequest::get()
            .uri("/api/v1/users/")
            .insert_header(("Host", "api.example"))
            .to_http_request();

        let first: Page<u8> = Page::new(&req, 25, 10, 0, vec![]);
        assert_eq!(
            first.next.as_deref(),
            Some("http://api.example/api/v1/users/?limit=10&offset=10")
        );
        assert!(first.previous.is_none());

        let second: Page<u8> = Page::new(&req, 25, 10, 10, vec![]);
        assert_eq!(second.previous.as_deref(), Some("http://api.example/api/v1/users/?limit=10"));

        let last: Page<u8> = Page::new(&req, 25, 10, 20, vec![]);
        assert!(last.next.is_none());
        assert_eq!(
            last.previous.as_deref(),
            Some("http://api.example/api/v1/users/?limit=10&offset=10")
        );
    }
}
