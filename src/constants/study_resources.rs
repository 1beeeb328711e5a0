use crate::models::domain::MaterialType;

#[derive(Debug, Clone, Copy)]
pub struct StudySite {
    pub name: &'static str,
    pub search_url: &'static str,
    pub query_param: &'static str,
    pub query_suffix: &'static str,
    pub material_type: MaterialType,
}

pub const STUDY_SITES: &[StudySite] = &[
    StudySite {
        name: "GeeksforGeeks",
        search_url: "https://www.geeksforgeeks.org/search/",
        query_param: "q",
        query_suffix: "",
        material_type: MaterialType::Article,
    },
    StudySite {
        name: "TutorialsPoint",
        search_url: "https://www.tutorialspoint.com/search/search-results",
        query_param: "search_string",
        query_suffix: "",
        material_type: MaterialType::Article,
    },
    StudySite {
        name: "YouTube",
        search_url: "https://www.youtube.com/results",
        query_param: "search_query",
        query_suffix: " tutorial",
        material_type: MaterialType::Video,
    },
    StudySite {
        name: "SlideShare",
        search_url: "https://www.slideshare.net/search/slideshow",
        query_param: "q",
        query_suffix: "",
        material_type: MaterialType::Notes,
    },
    StudySite {
        name: "Khan Academy",
        search_url: "https://www.khanacademy.org/search",
        query_param: "page_search_query",
        query_suffix: "",
        material_type: MaterialType::Practice,
    },
    StudySite {
        name: "Wikipedia",
        search_url: "https://en.wikipedia.org/w/index.php",
        query_param: "search",
        query_suffix: "",
        material_type: MaterialType::Article,
    },
];

/// Placeholders: {concept} {your_answer} {correct_answer}
pub const REVIEW_TIPS: &[&str] = &[
    "You selected '{your_answer}' instead of '{correct_answer}'. Focus on understanding the key differences between these concepts.",
    "Review the fundamental principles of {concept} to avoid similar mistakes in the future.",
    "Pay attention to the specific context and requirements when answering questions about {concept}.",
    "Practice distinguishing between similar concepts in {concept} to strengthen your understanding.",
    "Consider the relationships and dependencies within {concept} when selecting your answer.",
];

pub const SKIPPED_TIP: &str =
    "This question was left blank. Revisit {concept} and attempt every question, even when unsure.";

impl StudySite {
    /// Search link for `query` on this site.
    pub fn link_for(&self, query: &str) -> String {
        let query = format!("{}{}", query.trim(), self.query_suffix);
        match reqwest::Url::parse_with_params(self.search_url, &[(self.query_param, query.as_str())]) {
            Ok(url) => url.to_string(),
            Err(_) => self.search_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_for_encodes_query() {
        let link = STUDY_SITES[0].link_for("Operating System Unit 1");
        assert_eq!(
            link,
            "https://www.geeksforgeeks.org/search/?q=Operating+System+Unit+1"
        );
    }

    #[test]
    fn test_link_for_appends_suffix() {
        let youtube = STUDY_SITES
            .iter()
            .find(|s| s.name == "YouTube")
            .expect("youtube site should be listed");
        assert!(youtube.link_for("Paging").ends_with("search_query=Paging+tutorial"));
    }

    #[test]
    fn test_review_tips_mention_placeholders() {
        assert!(REVIEW_TIPS.iter().all(|t| t.contains('{')));
    }
}
