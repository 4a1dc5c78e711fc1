use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of entries in each top-languages list of a snapshot.
pub const TOP_LANGUAGES: usize = 5;

/// On-disk shape of the stats document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStats {
    pub total_requests: u64,
    pub successful_translations: u64,
    pub failed_translations: u64,
    /// Sum of successful translation times, in milliseconds.
    pub total_response_time: f64,
    pub source_languages: BTreeMap<String, u64>,
    pub target_languages: BTreeMap<String, u64>,
    pub last_updated: DateTime<Utc>,
}

impl StoredStats {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            total_requests: 0,
            successful_translations: 0,
            failed_translations: 0,
            total_response_time: 0.0,
            source_languages: BTreeMap::new(),
            target_languages: BTreeMap::new(),
            last_updated: now,
        }
    }

    pub fn record_success(
        &mut self,
        response_time_ms: f64,
        source_lang: &str,
        target_lang: &str,
        now: DateTime<Utc>,
    ) {
        self.total_requests += 1;
        self.successful_translations += 1;
        self.total_response_time += response_time_ms;
        *self.source_languages.entry(source_lang.to_string()).or_insert(0) += 1;
        *self.target_languages.entry(target_lang.to_string()).or_insert(0) += 1;
        self.last_updated = now;
    }

    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.total_requests += 1;
        self.failed_translations += 1;
        self.last_updated = now;
    }

    /// Mean time of successful translations, 0 when there are none.
    pub fn average_response_time(&self) -> f64 {
        if self.successful_translations == 0 {
            0.0
        } else {
            self.total_response_time / self.successful_translations as f64
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total_requests == self.successful_translations + self.failed_translations
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests,
            successful_translations: self.successful_translations,
            failed_translations: self.failed_translations,
            average_response_time: self.average_response_time(),
            top_source_languages: top_languages(&self.source_languages),
            top_target_languages: top_languages(&self.target_languages),
            last_updated: self.last_updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    pub code: String,
    pub count: u64,
}

/// Aggregate view served by `GET /api/v1/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_requests: u64,
    pub successful_translations: u64,
    pub failed_translations: u64,
    pub average_response_time: f64,
    pub top_source_languages: Vec<LanguageCount>,
    pub top_target_languages: Vec<LanguageCount>,
    pub last_updated: DateTime<Utc>,
}

fn top_languages(counts: &BTreeMap<String, u64>) -> Vec<LanguageCount> {
    let mut entries: Vec<LanguageCount> = counts
        .iter()
        .map(|(code, count)| LanguageCount {
            code: code.clone(),
            count: *count,
        })
        .collect();

    // BTreeMap order already breaks ties by code; the sort is stable.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(TOP_LANGUAGES);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_and_failure_keep_totals_consistent() {
        let now = Utc::now();
        let mut stats = StoredStats::new(now);
        stats.record_success(10.0, "en", "pt", now);
        stats.record_failure(now);
        stats.record_success(30.0, "en", "fr", now);

        assert_eq!(stats.total_requests, 3);
        assert_eq!(stats.successful_translations, 2);
        assert_eq!(stats.failed_translations, 1);
        assert!(stats.is_consistent());
        assert_eq!(stats.source_languages["en"], 2);
        assert_eq!(stats.target_languages["pt"], 1);
    }

    #[test]
    fn failures_do_not_skew_the_average() {
        let now = Utc::now();
        let mut stats = StoredStats::new(now);
        assert_eq!(stats.average_response_time(), 0.0);

        let times = [12.25, 7.5, 100.125];
        for t in times {
            stats.record_success(t, "en", "pt", now);
        }
        stats.record_failure(now);

        let expected = times.iter().sum::<f64>() / times.len() as f64;
        assert!((stats.average_response_time() - expected).abs() < 1e-9);
    }

    #[test]
    fn top_languages_are_ranked_and_capped() {
        let now = Utc::now();
        let mut stats = StoredStats::new(now);
        let plan = [("pt", 3), ("en", 5), ("es", 3), ("fr", 1), ("de", 2), ("it", 1), ("ja", 4)];
        for (lang, n) in plan {
            for _ in 0..n {
                stats.record_success(1.0, lang, "en", now);
            }
        }

        let top = stats.snapshot().top_source_languages;
        let codes: Vec<&str> = top.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["en", "ja", "es", "pt", "de"]);
        assert_eq!(top[0].count, 5);
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let stats = StoredStats::new(Utc::now());
        let json = serde_json::to_value(&stats).unwrap();
        for key in [
            "totalRequests",
            "successfulTranslations",
            "failedTranslations",
            "totalResponseTime",
            "sourceLanguages",
            "targetLanguages",
            "lastUpdated",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }
}
