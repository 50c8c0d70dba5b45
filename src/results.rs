/// A single entry on the results page.
///
/// Results are display-only, the `url` is never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub title: &'static str,
    pub url: &'static str,
    pub snippet: &'static str,
    pub source: &'static str,
}

const CATALOG: [SearchResult; 5] = [
    SearchResult {
        title: "The Ultimate Guide to Deep Research",
        url: "https://deepknowledge.io/research-guide",
        snippet: "Discover comprehensive methodologies for conducting thorough research that goes beyond surface-level findings...",
        source: "deepknowledge.io",
    },
    SearchResult {
        title: "Understanding Complex Topics Made Simple",
        url: "https://learnmore.edu/complex-topics",
        snippet: "Break down intricate subjects into digestible pieces with our expert-curated explanations and examples...",
        source: "learnmore.edu",
    },
    SearchResult {
        title: "Expert Insights & Analysis Hub",
        url: "https://insighthub.com/analysis",
        snippet: "Access premium analysis from industry experts who take the time to understand every angle of the topic...",
        source: "insighthub.com",
    },
    SearchResult {
        title: "Comprehensive Knowledge Database",
        url: "https://knowledgebase.org/comprehensive",
        snippet: "Our curated database contains meticulously verified information spanning thousands of subjects...",
        source: "knowledgebase.org",
    },
    SearchResult {
        title: "In-Depth Topic Explorer",
        url: "https://topicexplorer.net/depth",
        snippet: "Explore topics with unprecedented depth. Quality takes time, and our results prove it's worth the wait...",
        source: "topicexplorer.net",
    },
];

/// The curated results. Every query gets the same five.
pub fn catalog() -> &'static [SearchResult] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_five_entries() {
        let results = catalog();

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "The Ultimate Guide to Deep Research");
        assert_eq!(results[4].source, "topicexplorer.net");
    }

    #[test]
    fn sources_match_url_hosts() {
        for result in catalog() {
            let host = result
                .url
                .trim_start_matches("https://")
                .split('/')
                .next()
                .unwrap();

            assert_eq!(host, result.source);
        }
    }
}
