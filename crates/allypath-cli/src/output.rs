//! JSON reports printed on stdout

use allypath_core::ranking::max_score;
use allypath_core::{RelayRanker, ScoreMap, SelectedPath, Tier};
use serde::Serialize;

/// Fingerprints of a selected path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub guard: String,
    pub middle: String,
    pub exit: String,
}

impl From<&SelectedPath> for PathReport {
    fn from(path: &SelectedPath) -> Self {
        Self {
            guard: path.guard.fingerprint().to_string(),
            middle: path.middle.fingerprint().to_string(),
            exit: path.exit.fingerprint().to_string(),
        }
    }
}

/// One scored guard candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardReport {
    pub fingerprint: String,
    pub nickname: String,
    pub score: f64,
    pub tier: Tier,
}

/// Tiered guard candidates: the safe tier first, then the acceptable tier,
/// each in scoring order. Excluded relays are omitted.
pub fn guard_reports(scores: &ScoreMap<'_>, ranker: &RelayRanker) -> Vec<GuardReport> {
    let best = max_score(scores);
    let mut reports: Vec<GuardReport> = scores
        .iter()
        .filter_map(|(relay, &score)| {
            ranker
                .classify(score, best)
                .map(|tier| GuardReport {
                    fingerprint: relay.fingerprint().to_string(),
                    nickname: relay.nickname().to_string(),
                    score,
                    tier,
                })
        })
        .collect();
    reports.sort_by_key(|report| report.tier != Tier::Safe);
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use allypath_core::{AlphaParams, Bandwidth, Relay};

    fn relay(fp: &str) -> Relay {
        Relay::new(fp, "192.0.2.1").with_bandwidth(Bandwidth::measured(10))
    }

    #[test]
    fn test_guard_reports_order_and_exclusion() {
        let a = relay("A");
        let b = relay("B");
        let c = relay("C");
        let scores: ScoreMap<'_> = [(&a, 0.5), (&b, 0.8), (&c, 0.1)].into_iter().collect();
        let ranker = RelayRanker::new(AlphaParams::new(0.9, 2.0, 0.5, 4.0, 0.2));

        let reports = guard_reports(&scores, &ranker);
        let names: Vec<&str> = reports.iter().map(|r| r.fingerprint.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(reports[0].tier, Tier::Safe);
        assert_eq!(reports[1].tier, Tier::Acceptable);
    }

    #[test]
    fn test_path_report_json_shape() {
        let path = SelectedPath {
            guard: relay("G"),
            middle: relay("M"),
            exit: relay("E"),
        };
        let json = serde_json::to_value(PathReport::from(&path)).unwrap();
        assert_eq!(json, serde_json::json!({ "guard": "G", "middle": "M", "exit": "E" }));
    }
}
