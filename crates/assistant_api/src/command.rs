use serde::{Deserialize, Serialize};

use crate::message::Rating;

/// Outbound command envelope, tagged by the `action` field.
///
/// `Rate` with no rating clears a previously recorded verdict, so the field
/// is omitted from the frame rather than sent as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatCommand {
    Query {
        message: String,
    },
    Rate {
        message_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rating: Option<Rating>,
    },
    Formalize {
        message_id: String,
    },
    Summary,
    Auth {
        user_id: String,
        user_password: String,
    },
    Create,
    LoadChat {
        session_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::ChatCommand;
    use crate::message::Rating;

    fn encoded(command: &ChatCommand) -> String {
        serde_json::to_string(command).expect("command serializes")
    }

    #[test]
    fn query_frame_shape() {
        let frame = encoded(&ChatCommand::Query {
            message: "hi".to_owned(),
        });
        assert_eq!(frame, r#"{"action":"QUERY","message":"hi"}"#);
    }

    #[test]
    fn rate_frame_omits_absent_rating() {
        let cleared = encoded(&ChatCommand::Rate {
            message_id: "m1".to_owned(),
            rating: None,
        });
        assert_eq!(cleared, r#"{"action":"RATE","message_id":"m1"}"#);

        let liked = encoded(&ChatCommand::Rate {
            message_id: "m1".to_owned(),
            rating: Some(Rating::Like),
        });
        assert_eq!(liked, r#"{"action":"RATE","message_id":"m1","rating":"like"}"#);
    }

    #[test]
    fn bare_action_frames_carry_only_the_tag() {
        assert_eq!(encoded(&ChatCommand::Summary), r#"{"action":"SUMMARY"}"#);
        assert_eq!(encoded(&ChatCommand::Create), r#"{"action":"CREATE"}"#);
    }

    #[test]
    fn auth_and_load_chat_frame_shapes() {
        let auth = encoded(&ChatCommand::Auth {
            user_id: "u1".to_owned(),
            user_password: "secret".to_owned(),
        });
        assert_eq!(
            auth,
            r#"{"action":"AUTH","user_id":"u1","user_password":"secret"}"#
        );

        let load = encoded(&ChatCommand::LoadChat {
            session_id: "s1".to_owned(),
        });
        assert_eq!(load, r#"{"action":"LOAD_CHAT","session_id":"s1"}"#);
    }
}
