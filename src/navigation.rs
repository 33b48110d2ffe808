// Back/forward stack of visited targets
#[derive(Debug, Default, Clone)]
pub struct NavigationStack {
    entries: Vec<String>,
    position: Option<usize>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new visit. Anything ahead of the cursor is discarded first.
    pub fn visit(&mut self, url: impl Into<String>) {
        if let Some(index) = self.position {
            self.entries.truncate(index + 1);
        }
        self.entries.push(url.into());
        self.position = Some(self.entries.len() - 1);
    }

    pub fn can_go_back(&self) -> bool {
        self.position.is_some_and(|i| i > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.position.is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.position = self.position.map(|i| i - 1);
        self.current()
    }

    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.position = self.position.map(|i| i + 1);
        self.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.position
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_after_back_discards_forward_branch() {
        let mut nav = NavigationStack::new();
        nav.visit("A");
        nav.visit("B");
        assert_eq!(nav.back(), Some("A"));
        nav.visit("C");

        assert_eq!(nav.entries(), ["A".to_string(), "C".to_string()]);
        assert_eq!(nav.position(), Some(1));
        assert!(!nav.can_go_forward());
    }

    #[test]
    fn test_back_and_forward_bounds() {
        let mut nav = NavigationStack::new();
        assert!(!nav.can_go_back());
        assert!(!nav.can_go_forward());
        assert_eq!(nav.back(), None);

        nav.visit("https://example.com");
        nav.visit("https://example.com/page1");
        nav.visit("https://example.com/page2");
        assert!(nav.can_go_back());
        assert!(!nav.can_go_forward());
        assert_eq!(nav.forward(), None);

        assert_eq!(nav.back(), Some("https://example.com/page1"));
        assert_eq!(nav.back(), Some("https://example.com"));
        assert!(!nav.can_go_back());
        assert!(nav.can_go_forward());
        assert_eq!(nav.back(), None);
        assert_eq!(nav.position(), Some(0));

        assert_eq!(nav.forward(), Some("https://example.com/page1"));
        assert_eq!(nav.len(), 3);
    }
}
