use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// One day of aggregated GitHub activity for the current user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct GithubDailyStat {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub commit_count: i64,
    #[serde(default)]
    pub pr_count: i64,
    #[serde(default)]
    pub issue_count: i64,
    #[serde(default)]
    pub star_delta: i64,
    #[serde(with = "super::timestamp")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub created_at: NaiveDateTime,
    #[serde(with = "super::timestamp")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub updated_at: NaiveDateTime,
}

impl GithubDailyStat {
    pub fn total_activity(&self) -> i64 {
        self.commit_count + self.pr_count + self.issue_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct GithubDailyStatsResponse {
    pub data: Vec<GithubDailyStat>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct GithubSyncResponse {
    pub message: String,
    pub repos_count: i64,
    pub stats_updated: i64,
    pub date_range: Option<String>,
}

/// How far back a sync reaches.
/// `Standard` uses the 90-day events feed, `Deep` walks arbitrary ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    #[default]
    Standard,
    Deep,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Standard => "standard",
            SyncMode::Deep => "deep",
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(SyncMode::Standard),
            "deep" => Ok(SyncMode::Deep),
            other => Err(format!("unknown sync mode: {}", other)),
        }
    }
}

/// Query parameters for `POST /github/sync`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncParams {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub mode: Option<SyncMode>,
}

impl SyncParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.from_date {
            query.push(("from_date", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to_date {
            query.push(("to_date", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(mode) = self.mode {
            query.push(("mode", mode.as_str().to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_daily_stats_response() {
        let json = r#"{"data":[{"id":1,"user_id":7,"date":"2025-12-09","commit_count":5,"pr_count":2,"issue_count":1,"star_delta":3,"created_at":"2025-12-09T10:00:00Z","updated_at":"2025-12-09T10:00:00Z"}],"total":1}"#;

        let resp: GithubDailyStatsResponse = serde_json::from_str(json)
            .expect("Failed to parse stats test JSON");
        assert_eq!(resp.total, 1);
        assert_eq!(resp.data[0].date, NaiveDate::from_ymd_opt(2025, 12, 9).unwrap());
        assert_eq!(resp.data[0].total_activity(), 8);
    }

    #[test]
    fn test_parse_daily_stats_with_naive_timestamps() {
        let json = r#"{"data":[{"id":1,"user_id":7,"date":"2025-12-09","commit_count":5,"created_at":"2025-12-09T10:00:00.514210","updated_at":"2025-12-09T10:00:00.514210"}],"total":1}"#;

        let resp: GithubDailyStatsResponse = serde_json::from_str(json)
            .expect("Failed to parse stats test JSON");
        assert_eq!(resp.data[0].created_at.date(), NaiveDate::from_ymd_opt(2025, 12, 9).unwrap());
        assert_eq!(resp.data[0].total_activity(), 5);
    }

    #[test]
    fn test_sync_mode_from_str() {
        assert_eq!("standard".parse::<SyncMode>(), Ok(SyncMode::Standard));
        assert_eq!("DEEP".parse::<SyncMode>(), Ok(SyncMode::Deep));
        assert!("shallow".parse::<SyncMode>().is_err());
    }

    #[test]
    fn test_sync_params_query_skips_unset() {
        let params = SyncParams {
            from_date: NaiveDate::from_ymd_opt(2025, 11, 9),
            to_date: None,
            mode: Some(SyncMode::Deep),
        };
        assert_eq!(
            params.to_query(),
            vec![
                ("from_date", "2025-11-09".to_string()),
                ("mode", "deep".to_string()),
            ]
        );
        assert!(SyncParams::default().to_query().is_empty());
    }
}
