/// Display lines of a postal address, as reported by a geocoding
/// service. Ordered from most to least specific.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    pub lines: Vec<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

impl From<Vec<String>> for Address {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}
