use std::{
    borrow::Borrow,
    fmt::Display,
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::{fs::File, sync::RwLock};

/// An immutable, cheaply cloneable string.
///
/// Used for keys and values that are passed around between actors so that a
/// clone never copies the underlying bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcStr(Arc<str>);

impl ArcStr {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ArcStr {
    fn default() -> Self {
        Self::from("")
    }
}

impl Deref for ArcStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ArcStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ArcStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for ArcStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArcStr {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for ArcStr {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&String> for ArcStr {
    fn from(value: &String) -> Self {
        Self(Arc::from(value.as_str()))
    }
}

impl Serialize for ArcStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ArcStr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// An immutable, cheaply cloneable path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcPath(Arc<Path>);

impl Deref for ArcPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for ArcPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl From<&Path> for ArcPath {
    fn from(value: &Path) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&PathBuf> for ArcPath {
    fn from(value: &PathBuf) -> Self {
        Self(Arc::from(value.as_path()))
    }
}

impl From<PathBuf> for ArcPath {
    fn from(value: PathBuf) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&str> for ArcPath {
    fn from(value: &str) -> Self {
        Self(Arc::from(Path::new(value)))
    }
}

impl Serialize for ArcPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Path::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for ArcPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PathBuf::deserialize(deserializer).map(Self::from)
    }
}

/// An immutable, cheaply cloneable slice.
pub type ArcSlice<T> = Arc<[T]>;

/// A file handle shared between the [`Fs`](crate::fs::Fs) actor and its users.
pub type ArcFile = Arc<RwLock<File>>;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_arc_str_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(ArcStr::from("https://example.com/rss"), 1);
        assert_eq!(map.get("https://example.com/rss"), Some(&1));
        assert_eq!(map.get("https://example.com/RSS"), None);
    }

    #[test]
    fn test_arc_str_serde() {
        let value = ArcStr::from("hello");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"hello\"");
        let back: ArcStr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_arc_str_default_is_empty() {
        assert!(ArcStr::default().is_empty());
        assert_eq!(ArcStr::default().to_string(), "");
    }

    #[test]
    fn test_arc_path_from_str() {
        let path = ArcPath::from("/tmp/newsfeed/logs");
        assert_eq!(path.to_str(), Some("/tmp/newsfeed/logs"));
        assert_eq!(path.join("latest.log").to_str(), Some("/tmp/newsfeed/logs/latest.log"));
    }

    #[test]
    fn test_macros() {
        let url = crate::arc_str!("https://example.com/rss");
        assert_eq!(url.as_str(), "https://example.com/rss");

        let slice: ArcSlice<ArcStr> = crate::arc_slice!["a", "b"];
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[1].as_str(), "b");
    }
}
