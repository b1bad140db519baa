use serde_json::Value;

/// One step of a traversal path: an object key or a sequence index.
#[derive(Debug, Clone, Copy)]
pub enum Seg<'a> {
    Key(&'a str),
    Idx(usize),
}

impl<'a> From<&'a str> for Seg<'a> {
    fn from(k: &'a str) -> Self {
        Seg::Key(k)
    }
}

impl From<usize> for Seg<'_> {
    fn from(i: usize) -> Self {
        Seg::Idx(i)
    }
}

/// Builds a `&[Seg]` path from string keys and integer indices.
#[macro_export]
macro_rules! jpath {
    ($($seg:expr),* $(,)?) => {
        &[$($crate::extract::Seg::from($seg)),*][..]
    };
}

/// Walks `root` one segment at a time. Returns `None` the moment a segment
/// does not apply: missing key, out-of-range index, a node of the wrong
/// shape, or a `null` leaf. Upstream payloads are inconsistently shaped, so
/// absence is a value here, not an error.
pub fn extract<'v>(root: &'v Value, path: &[Seg<'_>]) -> Option<&'v Value> {
    let mut cur = root;
    for seg in path {
        cur = match seg {
            Seg::Key(k) => cur.as_object()?.get(*k)?,
            Seg::Idx(i) => cur.as_array()?.get(*i)?,
        };
    }
    match cur {
        Value::Null => None,
        v => Some(v),
    }
}

pub fn extract_str<'v>(root: &'v Value, path: &[Seg<'_>]) -> Option<&'v str> {
    extract(root, path)?.as_str()
}

/// Integer lookup. The upstream API types numbers loosely, so numeric
/// strings are accepted too.
pub fn extract_i64(root: &Value, path: &[Seg<'_>]) -> Option<i64> {
    match extract(root, path)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
