use std::collections::HashMap;

/// Interned id of a categorical value within one [`Dictionary`].
///
/// Codes are only minted by [`Dictionary::intern`], so any code held by a
/// filter or a record refers to a value that was observed at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryCode(u32);

impl CategoryCode {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Closed set of distinct labels observed for one categorical column.
#[derive(Debug, Default, Clone)]
pub struct Dictionary {
    labels: Vec<String>,
    index: HashMap<String, CategoryCode>,
}

impl Dictionary {
    /// Returns the code for `label`, adding it if this is its first occurrence.
    pub(crate) fn intern(&mut self, label: &str) -> CategoryCode {
        if let Some(code) = self.index.get(label) {
            return *code;
        }
        let code = CategoryCode(self.labels.len() as u32);
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), code);
        code
    }

    pub fn lookup(&self, label: &str) -> Option<CategoryCode> {
        self.index.get(label).copied()
    }

    /// Label for a code minted by this dictionary. Foreign codes yield `""`.
    pub fn label(&self, code: CategoryCode) -> &str {
        self.labels
            .get(code.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates `(code, label)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryCode, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (CategoryCode(i as u32), label.as_str()))
    }
}
