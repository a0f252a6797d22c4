use serde::{de::DeserializeOwned, Deserialize};

use crate::Error;

/// One page of a list, whatever envelope the server wrapped it in
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Zero-based index of this page
    pub page: usize,

    /// Requested page size, if the server echoed it
    pub limit: Option<usize>,

    pub total_pages: usize,
    pub total_elements: usize,

    /// Only set by the children endpoint of comments
    pub has_more: Option<bool>,
}

impl<T> Page<T> {
    pub fn single(items: Vec<T>) -> Page<T> {
        let total_elements = items.len();
        Page {
            items,
            page: 0,
            limit: None,
            total_pages: 1,
            total_elements,
            has_more: None,
        }
    }

    /// Whether a page after this one exists
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body<T> {
    data: Vec<T>,
    #[serde(default)]
    page: Option<usize>,
    #[serde(default, alias = "size")]
    limit: Option<usize>,
    #[serde(default)]
    total_pages: Option<usize>,
    #[serde(default)]
    total_elements: Option<usize>,
    #[serde(default)]
    has_more_children: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content<T> {
    content: Vec<T>,
    #[serde(default, alias = "pageNumber")]
    number: Option<usize>,
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    total_pages: Option<usize>,
    #[serde(default)]
    total_elements: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope<T> {
    Nested { data: Body<T> },
    Flat(Body<T>),
    Content(Content<T>),
    Bare(Vec<T>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SingleEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

fn from_parts<T>(
    items: Vec<T>,
    page: Option<usize>,
    limit: Option<usize>,
    total_pages: Option<usize>,
    total_elements: Option<usize>,
    has_more: Option<bool>,
) -> Page<T> {
    let total_elements = total_elements.unwrap_or(items.len());
    let total_pages = total_pages.unwrap_or_else(|| match limit {
        Some(l) if l > 0 => (total_elements + l - 1) / l,
        _ => usize::from(!items.is_empty()),
    });
    Page {
        items,
        page: page.unwrap_or(0),
        limit,
        total_pages,
        total_elements,
        has_more,
    }
}

/// Decodes a list response in any of the envelope shapes the server uses
pub fn decode_list<T: DeserializeOwned>(value: serde_json::Value) -> Result<Page<T>, Error> {
    let env = serde_json::from_value::<ListEnvelope<T>>(value)
        .map_err(|e| Error::MalformedResponse(format!("decoding list envelope: {e}")))?;
    Ok(match env {
        ListEnvelope::Nested { data: b } | ListEnvelope::Flat(b) => from_parts(
            b.data,
            b.page,
            b.limit,
            b.total_pages,
            b.total_elements,
            b.has_more_children,
        ),
        ListEnvelope::Content(c) => from_parts(
            c.content,
            c.number,
            c.size,
            c.total_pages,
            c.total_elements,
            None,
        ),
        ListEnvelope::Bare(items) => Page::single(items),
    })
}

/// Decodes a single-entity response, wrapped in `{data: ..}` or bare
pub fn decode_single<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, Error> {
    match serde_json::from_value::<SingleEnvelope<T>>(value) {
        Ok(SingleEnvelope::Wrapped { data }) | Ok(SingleEnvelope::Bare(data)) => Ok(data),
        Err(e) => Err(Error::MalformedResponse(format!(
            "decoding entity envelope: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    fn ids(p: &Page<Item>) -> Vec<u32> {
        p.items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn all_list_shapes_decode() {
        let nested = decode_list::<Item>(json!({
            "success": true,
            "data": {"data": [{"id": 1}, {"id": 2}], "totalPages": 3, "totalElements": 12, "page": 1, "limit": 5},
        }))
        .unwrap();
        assert_eq!(ids(&nested), vec![1, 2]);
        assert_eq!((nested.page, nested.total_pages, nested.total_elements), (1, 3, 12));
        assert!(nested.has_next());

        let flat = decode_list::<Item>(json!({
            "data": [{"id": 3}], "totalPages": 1, "hasMoreChildren": false,
        }))
        .unwrap();
        assert_eq!(ids(&flat), vec![3]);
        assert_eq!(flat.has_more, Some(false));

        let data_only = decode_list::<Item>(json!({"data": [{"id": 4}, {"id": 5}]})).unwrap();
        assert_eq!((data_only.total_elements, data_only.total_pages), (2, 1));

        let content = decode_list::<Item>(json!({"content": [{"id": 6}], "totalPages": 4})).unwrap();
        assert_eq!(ids(&content), vec![6]);
        assert_eq!(content.total_pages, 4);

        let bare = decode_list::<Item>(json!([{"id": 7}])).unwrap();
        assert_eq!(ids(&bare), vec![7]);
        assert!(!bare.has_next());
    }

    #[test]
    fn empty_list_has_no_pages() {
        let p = decode_list::<Item>(json!({"data": []})).unwrap();
        assert_eq!((p.total_pages, p.total_elements), (0, 0));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            decode_list::<Item>(json!({"items": 3})),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            decode_single::<Item>(json!("nope")),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn single_shapes_decode() {
        assert_eq!(
            decode_single::<Item>(json!({"data": {"id": 9}})).unwrap(),
            Item { id: 9 }
        );
        assert_eq!(decode_single::<Item>(json!({"id": 9})).unwrap(), Item { id: 9 });
    }
}
