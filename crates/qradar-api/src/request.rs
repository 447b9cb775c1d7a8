// Request construction.
//
// Maps a resource path plus the standard QRadar query knobs (fields, filter,
// item range, optional id, optional body) onto one outbound request. Pure:
// no I/O happens here, so the mapping is testable without a console.

use reqwest::Method;
use serde::Serialize;
use url::{Url, form_urlencoded};

use crate::error::Error;

/// Inclusive item window `[from, to]` sent as `Range: items=from-to`.
///
/// `ItemRange::default()` (both zero) means "no range requested". Bounds are
/// sent verbatim; the console rejects malformed windows itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemRange {
    pub from: u64,
    pub to: u64,
}

impl ItemRange {
    pub const fn new(from: u64, to: u64) -> Self {
        Self { from, to }
    }

    /// `true` when no range header should be attached.
    pub const fn is_unset(&self) -> bool {
        self.from == 0 && self.to == 0
    }

    /// The `Range` header value, or `None` for an unset range.
    pub fn header_value(&self) -> Option<String> {
        if self.is_unset() {
            None
        } else {
            Some(format!("items={}-{}", self.from, self.to))
        }
    }
}

/// Named request parameters for one QRadar call.
///
/// Empty `fields` means "server default fields"; empty `filter` means no
/// filter. A body makes the request a `POST` regardless of `id`.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec<'a> {
    pub path_prefix: &'a str,
    pub fields: &'a str,
    pub filter: &'a str,
    pub range: ItemRange,
    pub id: Option<i64>,
    pub body: Option<serde_json::Value>,
}

impl<'a> RequestSpec<'a> {
    pub fn new(path_prefix: &'a str) -> Self {
        Self {
            path_prefix,
            ..Self::default()
        }
    }

    pub fn fields(mut self, fields: &'a str) -> Self {
        self.fields = fields;
        self
    }

    pub fn filter(mut self, filter: &'a str) -> Self {
        self.filter = filter;
        self
    }

    pub fn range(mut self, range: ItemRange) -> Self {
        self.range = range;
        self
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach a JSON body. Encoding follows the type's `Serialize` impl, so
    /// [`Field::Missing`](crate::Field::Missing) members are left out.
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Error> {
        self.body = Some(serde_json::to_value(body).map_err(Error::Encode)?);
        Ok(self)
    }
}

/// A fully built request, ready for a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Value for the `Range` header, e.g. `items=0-49`.
    pub range: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Build a request against `base_url` (which must end with `/`).
///
/// Fails only if the resulting URL cannot be formed.
pub fn build_request(base_url: &Url, spec: RequestSpec<'_>) -> Result<ApiRequest, Error> {
    let method = if spec.body.is_some() {
        Method::POST
    } else {
        Method::GET
    };

    let path = match spec.id {
        Some(id) => format!("{}/{id}", spec.path_prefix),
        None => spec.path_prefix.to_owned(),
    };
    let mut url = base_url.join(&path)?;

    let query: Vec<String> = [("fields", spec.fields), ("filter", spec.filter)]
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| {
            let encoded: String = form_urlencoded::byte_serialize(v.as_bytes()).collect();
            format!("{k}={encoded}")
        })
        .collect();
    if !query.is_empty() {
        url.set_query(Some(&query.join("&")));
    }

    Ok(ApiRequest {
        method,
        url,
        range: spec.range.header_value(),
        body: spec.body,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const PREFIX: &str = "api/siem/offenses";

    fn base() -> Url {
        Url::parse("https://console.example.com/").unwrap()
    }

    #[test]
    fn method_is_post_only_with_body() {
        for id in [None, Some(9)] {
            for with_body in [false, true] {
                let mut spec = RequestSpec::new(PREFIX);
                spec.id = id;
                if with_body {
                    spec = spec.body(&json!({ "status": "OPEN" })).unwrap();
                }
                let req = build_request(&base(), spec).unwrap();
                let expected = if with_body { Method::POST } else { Method::GET };
                assert_eq!(req.method, expected, "id={id:?} body={with_body}");
            }
        }
    }

    #[test]
    fn path_with_and_without_id() {
        let req = build_request(&base(), RequestSpec::new(PREFIX)).unwrap();
        assert_eq!(req.url.path(), "/api/siem/offenses");

        let req = build_request(&base(), RequestSpec::new(PREFIX).id(42)).unwrap();
        assert_eq!(req.url.path(), "/api/siem/offenses/42");
    }

    #[test]
    fn no_query_string_when_fields_and_filter_empty() {
        let req = build_request(&base(), RequestSpec::new(PREFIX)).unwrap();
        assert_eq!(req.url.query(), None);
        assert_eq!(req.url.as_str(), "https://console.example.com/api/siem/offenses");
    }

    #[test]
    fn fields_and_filter_are_independent() {
        let req = build_request(&base(), RequestSpec::new(PREFIX).fields("id,status")).unwrap();
        let pairs: Vec<_> = req.url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "fields");
        assert_eq!(pairs[0].1, "id,status");

        let req = build_request(&base(), RequestSpec::new(PREFIX).filter("severity>5")).unwrap();
        let pairs: Vec<_> = req.url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "filter");
        assert_eq!(pairs[0].1, "severity>5");

        let req = build_request(
            &base(),
            RequestSpec::new(PREFIX).fields("id").filter("status = \"OPEN\""),
        )
        .unwrap();
        let pairs: Vec<(String, String)> = req.url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("fields".to_owned(), "id".to_owned()),
                ("filter".to_owned(), "status = \"OPEN\"".to_owned()),
            ]
        );
    }

    #[test]
    fn filter_is_url_encoded() {
        let req = build_request(&base(), RequestSpec::new(PREFIX).filter("a and b")).unwrap();
        assert_eq!(req.url.query(), Some("filter=a+and+b"));
    }

    #[test]
    fn range_header_only_when_non_zero() {
        let req = build_request(&base(), RequestSpec::new(PREFIX)).unwrap();
        assert_eq!(req.range, None);

        let req =
            build_request(&base(), RequestSpec::new(PREFIX).range(ItemRange::new(0, 49))).unwrap();
        assert_eq!(req.range.as_deref(), Some("items=0-49"));

        let req =
            build_request(&base(), RequestSpec::new(PREFIX).range(ItemRange::new(5, 0))).unwrap();
        assert_eq!(req.range.as_deref(), Some("items=5-0"));
    }

    #[test]
    fn inverted_range_is_sent_verbatim() {
        let req =
            build_request(&base(), RequestSpec::new(PREFIX).range(ItemRange::new(50, 10))).unwrap();
        assert_eq!(req.range.as_deref(), Some("items=50-10"));
    }

    #[test]
    fn body_is_carried_as_json() {
        let spec = RequestSpec::new(PREFIX)
            .id(7)
            .body(&json!({ "status": "CLOSED" }))
            .unwrap();
        let req = build_request(&base(), spec).unwrap();
        assert_eq!(req.body, Some(json!({ "status": "CLOSED" })));
        assert_eq!(req.url.path(), "/api/siem/offenses/7");
    }

    #[test]
    fn base_url_sub_path_is_kept() {
        let base = Url::parse("https://gw.example.com/qradar/").unwrap();
        let req = build_request(&base, RequestSpec::new(PREFIX)).unwrap();
        assert_eq!(req.url.path(), "/qradar/api/siem/offenses");
    }
}
