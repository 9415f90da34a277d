use std::collections::HashSet;

/// An unordered set of lower-cased tags.
///
/// Every entry point lower-cases its input, so `"Rust"` and `"rust"` name the
/// same tag. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: HashSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the given tags. Tags already present are left alone.
    pub fn add<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.tags.insert(tag.as_ref().to_lowercase());
        }
    }

    /// Removes the given tags, ignoring any that are not present.
    pub fn delete<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.tags.remove(&tag.as_ref().to_lowercase());
        }
    }

    pub fn reset(&mut self) {
        self.tags.clear();
    }

    /// True when every given tag is present. An empty list is trivially contained.
    pub fn has<I, S>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .all(|tag| self.tags.contains(&tag.as_ref().to_lowercase()))
    }

    pub fn list(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        set.add(iter);
        set
    }
}
