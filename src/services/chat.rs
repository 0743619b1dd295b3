use std::sync::Arc;
use crate::core::{
    merge_with_query, summarize, KeywordExtractor, MentionKeywords, PolicyClassifier,
    PreferenceExtractor, Ranker,
};
use crate::models::{ChatReply, PreferenceProfile, RankingPreferences, ScoredListing};
use crate::services::executor::QueryExecutor;
use crate::services::policy::PolicyAnswerer;
use crate::services::sessions::SessionStore;

pub const POLICY_SOURCE: &str = "accommodation_policies";

const POLICY_FAILED_MESSAGE: &str = "Sorry, I couldn't access the policy information at the moment. \
     Please try asking about specific accommodations instead.";

const POLICY_UNAVAILABLE_MESSAGE: &str = "Policy information service is currently unavailable. \
     Please contact support for policy questions.";

const SEARCH_FAILED_MESSAGE: &str = "I'm having trouble processing your request right now. \
     Please try again or rephrase your question.";

const NO_RESULTS_MESSAGE: &str = "I couldn't find any accommodations matching your criteria. \
     Try adjusting your preferences like budget range or location.";

/// Chat turn orchestration
///
/// Policy questions go straight to the policy service. Everything else is a
/// search: the session profile is updated, merged into the query, executed
/// and the candidates ranked.
pub struct ChatService {
    sessions: Arc<SessionStore>,
    extractor: Arc<dyn PreferenceExtractor>,
    mentions: MentionKeywords,
    classifier: PolicyClassifier,
    ranker: Ranker,
    executor: Arc<dyn QueryExecutor>,
    policy: Option<Arc<dyn PolicyAnswerer>>,
}

impl ChatService {
    pub fn new(sessions: Arc<SessionStore>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            sessions,
            extractor: Arc::new(KeywordExtractor::default()),
            mentions: MentionKeywords::default(),
            classifier: PolicyClassifier::default(),
            ranker: Ranker::default(),
            executor,
            policy: None,
        }
    }

    /// Use keyword tables from configuration for extraction and merging
    pub fn with_keyword_extractor(mut self, extractor: KeywordExtractor) -> Self {
        self.mentions = extractor.tables().mentions.clone();
        self.extractor = Arc::new(extractor);
        self
    }

    /// Swap in a different extractor (merging keeps the current mention keywords)
    pub fn with_extractor(mut self, extractor: Arc<dyn PreferenceExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_classifier(mut self, classifier: PolicyClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn PolicyAnswerer>) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one chat turn for `session_id`
    pub async fn handle(&self, session_id: &str, query: &str) -> ChatReply {
        if self.classifier.is_policy_question(query) {
            return self.answer_policy(query).await;
        }

        self.search(session_id, query).await
    }

    /// Stored profile and summary for a session, if it exists
    pub async fn preferences(&self, session_id: &str) -> Option<(PreferenceProfile, String)> {
        self.sessions
            .get(session_id)
            .await
            .map(|profile| {
                let summary = summarize(&profile);
                (profile, summary)
            })
    }

    async fn answer_policy(&self, question: &str) -> ChatReply {
        let Some(policy) = &self.policy else {
            return ChatReply::Error {
                question: question.to_string(),
                answer: POLICY_UNAVAILABLE_MESSAGE.to_string(),
            };
        };

        match policy.answer(question).await {
            Ok(answer) => ChatReply::PolicyAnswer {
                question: question.to_string(),
                answer,
                source: POLICY_SOURCE.to_string(),
            },
            Err(e) => {
                tracing::error!("Policy service failed: {}", e);
                ChatReply::Error {
                    question: question.to_string(),
                    answer: POLICY_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }

    async fn search(&self, session_id: &str, query: &str) -> ChatReply {
        let profile = self.update_profile(session_id, query).await;
        let memory_summary = summarize(&profile);
        let enhanced_query = merge_with_query(query, &profile, &self.mentions);

        tracing::info!("Session {}: searching with '{}'", session_id, enhanced_query);

        let execution = match self.executor.execute(&enhanced_query, &profile).await {
            Ok(execution) => execution,
            Err(e) => {
                tracing::error!("Search failed for session {}: {}", session_id, e);
                return ChatReply::Error {
                    question: query.to_string(),
                    answer: SEARCH_FAILED_MESSAGE.to_string(),
                };
            }
        };

        if execution.listings.is_empty() {
            return ChatReply::NoResults {
                query: query.to_string(),
                enhanced_query,
                sql_generated: execution.sql,
                response: NO_RESULTS_MESSAGE.to_string(),
                memory: profile,
                memory_summary,
            };
        }

        let result = self
            .ranker
            .rank(execution.listings, &RankingPreferences::from(&profile));

        tracing::info!(
            "Session {}: returning {} of {} candidates",
            session_id,
            result.listings.len(),
            result.total_candidates
        );

        ChatReply::AccommodationSearch {
            query: query.to_string(),
            enhanced_query,
            sql_generated: execution.sql,
            results_count: result.total_candidates,
            response: describe_results(&result.listings, result.total_candidates),
            accommodations: result.listings,
            memory: profile,
            memory_summary,
        }
    }

    /// Apply `query` to the session profile and return a snapshot
    ///
    /// The session lock is held across extraction and the snapshot write so
    /// concurrent turns of one session apply in order.
    async fn update_profile(&self, session_id: &str, query: &str) -> PreferenceProfile {
        let handle = self.sessions.session(session_id).await;
        let mut profile = handle.lock().await;

        self.extractor.extract(query, &mut profile);
        let snapshot = profile.clone();

        if let Err(e) = self.sessions.persist(session_id, &snapshot).await {
            tracing::warn!("Failed to persist session {}: {}", session_id, e);
        }

        tracing::debug!("Session {} preferences: {:?}", session_id, snapshot);
        snapshot
    }
}

fn describe_results(listings: &[ScoredListing], total: usize) -> String {
    match listings.first() {
        Some(top) => format!(
            "Found {} accommodations. Top pick: {} in {} at ₹{}/month, {:.1} km from college ({}).",
            total,
            top.listing.kind.to_uppercase(),
            top.listing.location,
            top.listing.rent,
            top.listing.distance_from_college_km,
            top.reason
        ),
        None => NO_RESULTS_MESSAGE.to_string(),
    }
}
