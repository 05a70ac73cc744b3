//! Realtime feed messages
//!
//! Text frames from the platform's realtime channel, parsed into the small
//! closed set of events actors react to. Anything unrecognized is dropped.

use serde::Deserialize;

/// Contest lifecycle phases announced over the realtime channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContestPhase {
    Started,
    TimeWarning,
    Ended,
}

/// One parsed realtime message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    /// The leaderboard changed
    LeaderboardUpdate,

    /// A submission got its verdict
    SubmissionUpdate { team_id: i64, accepted: bool },

    /// A contest phase transition
    ContestNotification { phase: ContestPhase },
}

#[derive(Deserialize)]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "teamId")]
    team_id: Option<i64>,
    verdict: Option<String>,
    phase: Option<String>,
}

impl RealtimeEvent {
    /// Parse one text frame. Malformed or unknown messages yield `None`
    pub fn parse(text: &str) -> Option<Self> {
        let wire: WireEvent = serde_json::from_str(text).ok()?;

        match wire.kind.as_str() {
            "leaderboard-update" => Some(RealtimeEvent::LeaderboardUpdate),

            "submission-update" => Some(RealtimeEvent::SubmissionUpdate {
                team_id: wire.team_id?,
                accepted: wire.verdict.as_deref() == Some("accepted"),
            }),

            "contest-notification" => {
                let phase = match wire.phase?.as_str() {
                    "started" => ContestPhase::Started,
                    "time-warning" => ContestPhase::TimeWarning,
                    "ended" => ContestPhase::Ended,
                    _ => return None,
                };
                Some(RealtimeEvent::ContestNotification { phase })
            }

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaderboard_update() {
        let event = RealtimeEvent::parse(r#"{"type":"leaderboard-update"}"#);
        assert_eq!(event, Some(RealtimeEvent::LeaderboardUpdate));
    }

    #[test]
    fn test_parse_submission_update() {
        let event =
            RealtimeEvent::parse(r#"{"type":"submission-update","teamId":7,"verdict":"wrong_answer"}"#);
        assert_eq!(
            event,
            Some(RealtimeEvent::SubmissionUpdate {
                team_id: 7,
                accepted: false,
            })
        );

        let accepted =
            RealtimeEvent::parse(r#"{"type":"submission-update","teamId":7,"verdict":"accepted"}"#);
        assert_eq!(
            accepted,
            Some(RealtimeEvent::SubmissionUpdate {
                team_id: 7,
                accepted: true,
            })
        );
    }

    #[test]
    fn test_parse_contest_phases() {
        let warning = RealtimeEvent::parse(r#"{"type":"contest-notification","phase":"time-warning"}"#);
        assert_eq!(
            warning,
            Some(RealtimeEvent::ContestNotification {
                phase: ContestPhase::TimeWarning,
            })
        );
    }

    #[test]
    fn test_unknown_and_malformed_dropped() {
        assert_eq!(RealtimeEvent::parse(r#"{"type":"chat-message"}"#), None);
        assert_eq!(RealtimeEvent::parse(r#"{"type":"submission-update"}"#), None);
        assert_eq!(RealtimeEvent::parse("not json"), None);
    }
}
