#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::with_capacity(32),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Appends a `key=value` line.
    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.push(Entry::Item(key.into(), value.into()));
    }

    /// Appends a line that has no `=`, e.g. an `HKR` directive or a file name in a copy list.
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.push(Entry::Item(line.into(), String::new()));
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.push(Entry::Comment(text.into()));
    }

    pub fn add_blank(&mut self) {
        self.push(Entry::Blank);
    }

    /// Iterates over the data entries as `(key, value)` pairs, skipping comments and spacers.
    pub fn items(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Item(key, value) => Some((key.as_str(), value.as_str())),
            Entry::Comment(..) | Entry::Blank => None,
        })
    }

    /// Returns the key as spelled in the file, matched case-insensitively.
    #[must_use]
    pub fn find_key(&self, name: &str) -> Option<&str> {
        self.find_item(name).map(|(key, _)| key)
    }

    /// Returns the value of the first matching key, or `""` when the key is absent.
    #[must_use]
    pub fn get_value(&self, name: &str) -> &str {
        self.find_item(name).map_or("", |(_, value)| value)
    }

    fn find_item(&self, name: &str) -> Option<(&str, &str)> {
        let name = name.trim();
        self.items()
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A data line. The value is empty for lines that carry no `=`.
    Item(String, String),
    /// Comment text, without the leading `;`.
    Comment(String),
    Blank,
}
