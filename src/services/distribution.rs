/// Number of items one topic must contribute to a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicQuota {
    pub topic: String,
    pub quota: usize,
}

/// Splits `requested_count` across `topics` in input order: every topic gets
/// `requested_count / topics.len()` and the first `requested_count % topics.len()`
/// topics get one more. Quotas always sum to `requested_count`.
pub fn plan(requested_count: usize, topics: &[String]) -> Vec<TopicQuota> {
    if topics.is_empty() {
        return Vec::new();
    }

    let base = requested_count / topics.len();
    let remainder = requested_count % topics.len();

    topics
        .iter()
        .enumerate()
        .map(|(i, topic)| TopicQuota {
            topic: topic.clone(),
            quota: base + usize::from(i < remainder),
        })
        .collect()
}
