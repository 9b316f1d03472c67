use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MappingError(String);

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for MappingError {}

/// The ordered header row of the dataset along with a lookup from header name to column index.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Mapping {
    headers: Vec<Header>,
    header_map: HashMap<Header, usize>,
}

impl Mapping {
    /// Create a new `Mapping` from the header row. Header names must be unique.
    pub fn new<S, I>(headers: I) -> Result<Self, MappingError>
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let mut mapping = Mapping::default();
        for header in headers {
            mapping.push(header)?;
        }
        Ok(mapping)
    }

    /// Appends a header to the end of the mapping and returns its index.
    pub fn push(&mut self, header: impl Into<String>) -> Result<usize, MappingError> {
        let header = Header::from(header.into());
        if self.header_map.contains_key(&header) {
            return Err(MappingError(format!(
                "Encountered a duplicate header '{}'",
                header.as_ref()
            )));
        }
        let ix = self.headers.len();
        self.header_map.insert(header.clone(), ix);
        self.headers.push(header);
        Ok(ix)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn index(&self, header: &str) -> Option<usize> {
        self.header_map.get(header).cloned()
    }
}

impl Serialize for Mapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.headers.serialize(serializer)
    }
}

/// Renames repeated header names so that every column can be addressed: the second `x` becomes
/// `x.1`, the third `x.2`, skipping any name that is already taken.
pub(crate) fn dedupe<I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .into_iter()
        .map(|header| {
            let mut name = header;
            let mut count = seen.get(&name).copied().unwrap_or_default();
            while count > 0 {
                seen.insert(name.clone(), count + 1);
                name = format!("{name}.{count}");
                count = seen.get(&name).copied().unwrap_or_default();
            }
            seen.insert(name.clone(), count + 1);
            name
        })
        .collect()
}

/// A column header in the source file, for example `total_inversion_ifc_aprobada_junta_millones_usd`
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct Header(String);

impl AsRef<str> for Header {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::borrow::Borrow<str> for Header {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<S: Into<String>> From<S> for Header {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl FromStr for Header {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_preserves_order() {
        let mapping = Mapping::new(["pais", "estado", "industria"]).unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.index("estado"), Some(1));
        assert_eq!(mapping.index("missing"), None);
        let names: Vec<&str> = mapping.headers().iter().map(|h| h.as_ref()).collect();
        assert_eq!(names, vec!["pais", "estado", "industria"]);
    }

    #[test]
    fn test_mapping_duplicate_header() {
        let err = Mapping::new(["pais", "estado", "pais"]).unwrap_err();
        assert!(err.to_string().contains("duplicate header 'pais'"));
    }

    #[test]
    fn test_dedupe() {
        let headers = ["pais", "monto", "pais", "pais"].map(String::from);
        assert_eq!(dedupe(headers), vec!["pais", "monto", "pais.1", "pais.2"]);
    }

    #[test]
    fn test_dedupe_skips_taken_names() {
        let headers = ["a", "a", "a.1"].map(String::from);
        assert_eq!(dedupe(headers), vec!["a", "a.1", "a.1.1"]);
    }

    #[test]
    fn test_push() {
        let mut mapping = Mapping::new(["a"]).unwrap();
        assert_eq!(mapping.push("b").unwrap(), 1);
        assert!(mapping.push("a").is_err());
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"["a","b"]"#);
    }
}
