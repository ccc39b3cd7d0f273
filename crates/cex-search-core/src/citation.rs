//! CTS citation identifiers.
//!
//! A citation is a colon-delimited URN of the form
//! `Base:Protocol:Namespace:Work:Passage`, for example
//! `urn:cts:greekLit:tlg0012.tlg001.perseus-grc2:1.1`. The first four
//! components name the work; the last names the passage inside it.

const SEPARATOR: char = ':';
const COMPONENTS: usize = 5;

/// A decoded citation identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationId {
    pub base: String,
    pub protocol: String,
    pub namespace: String,
    pub work: String,
    pub passage: String,
}

impl CitationId {
    /// Decode a citation string.
    ///
    /// Returns `None` when there are fewer than five components or any
    /// component is empty. Colons past the fourth stay in the passage.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.trim().splitn(COMPONENTS, SEPARATOR).collect();
        if parts.len() < COMPONENTS || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        Some(Self {
            base: parts[0].to_string(),
            protocol: parts[1].to_string(),
            namespace: parts[2].to_string(),
            work: parts[3].to_string(),
            passage: parts[4].to_string(),
        })
    }

    /// The work-identifying prefix shared by all passages of one work.
    pub fn work_key(&self) -> String {
        [
            self.base.as_str(),
            self.protocol.as_str(),
            self.namespace.as_str(),
            self.work.as_str(),
        ]
        .join(":")
    }

    /// Full passage identifier: the work key plus the passage component.
    pub fn passage_id(&self) -> String {
        format!("{}:{}", self.work_key(), self.passage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_urn() {
        let c = CitationId::parse("urn:cts:greekLit:tlg0012.tlg001.perseus-grc2:1.1").unwrap();
        assert_eq!(c.base, "urn");
        assert_eq!(c.protocol, "cts");
        assert_eq!(c.namespace, "greekLit");
        assert_eq!(c.work, "tlg0012.tlg001.perseus-grc2");
        assert_eq!(c.passage, "1.1");
        assert_eq!(c.work_key(), "urn:cts:greekLit:tlg0012.tlg001.perseus-grc2");
        assert_eq!(
            c.passage_id(),
            "urn:cts:greekLit:tlg0012.tlg001.perseus-grc2:1.1"
        );
    }

    #[test]
    fn test_extra_colons_stay_in_passage() {
        let c = CitationId::parse("urn:cts:x:a.b:1.1:extra").unwrap();
        assert_eq!(c.passage, "1.1:extra");
        assert_eq!(c.work_key(), "urn:cts:x:a.b");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let c = CitationId::parse("  urn:cts:x:a.b:1.1 ").unwrap();
        assert_eq!(c.passage_id(), "urn:cts:x:a.b:1.1");
    }

    #[test]
    fn test_rejects_too_few_components() {
        assert!(CitationId::parse("urn:cts:x:a.b").is_none());
        assert!(CitationId::parse("hello world").is_none());
        assert!(CitationId::parse("").is_none());
    }

    #[test]
    fn test_rejects_empty_component() {
        assert!(CitationId::parse("urn:cts::a.b:1.1").is_none());
        assert!(CitationId::parse("urn:cts:x:a.b:").is_none());
    }
}
