//! Integration tests for server line classification.
//!
//! Lines here mirror real chat traffic: the welcome burst after login,
//! membership events, mode grants, and relayed chat messages.

use tmi_proto::{ModeChange, ParseError, ServerEvent};

#[test]
fn test_welcome_burst_is_unknown_not_error() {
    let burst = [
        ":tmi.twitch.tv 001 songbot :Welcome, GLHF!",
        ":tmi.twitch.tv 002 songbot :Your host is tmi.twitch.tv",
        ":tmi.twitch.tv 003 songbot :This server is rather new",
        ":tmi.twitch.tv 004 songbot :-",
        ":tmi.twitch.tv 375 songbot :-",
        ":tmi.twitch.tv 372 songbot :You are in a maze of twisty passages.",
        ":tmi.twitch.tv 376 songbot :>",
        ":tmi.twitch.tv CAP * ACK :twitch.tv/membership",
    ];

    for line in burst {
        let event = line
            .parse::<ServerEvent>()
            .unwrap_or_else(|e| panic!("failed to classify '{}': {}", line, e));
        assert!(
            matches!(event, ServerEvent::Unknown { .. }),
            "expected Unknown for '{}'",
            line
        );
    }
}

#[test]
fn test_chat_message_flow() {
    let event: ServerEvent = ":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa Keepo Kappa"
        .parse()
        .unwrap();
    assert_eq!(
        event,
        ServerEvent::Message {
            sender: "ronni".to_string(),
            text: "Kappa Keepo Kappa".to_string(),
        }
    );

    // Command-looking text stays text
    let event: ServerEvent = ":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :!song JOIN PART"
        .parse()
        .unwrap();
    assert_eq!(
        event,
        ServerEvent::Message {
            sender: "ronni".to_string(),
            text: "!song JOIN PART".to_string(),
        }
    );
}

#[test]
fn test_membership_events() {
    let join: ServerEvent = ":ronni!ronni@ronni.tmi.twitch.tv JOIN #dallas"
        .parse()
        .unwrap();
    assert_eq!(
        join,
        ServerEvent::Join {
            user: "ronni".to_string()
        }
    );

    let part: ServerEvent = ":ronni!ronni@ronni.tmi.twitch.tv PART #dallas"
        .parse()
        .unwrap();
    assert_eq!(
        part,
        ServerEvent::Part {
            user: "ronni".to_string()
        }
    );
}

#[test]
fn test_operator_grants() {
    let op: ServerEvent = ":jtv MODE #dallas +o ronni".parse().unwrap();
    assert_eq!(
        op,
        ServerEvent::Mode {
            change: ModeChange::Op,
            user: "ronni".to_string(),
        }
    );

    let deop: ServerEvent = ":jtv MODE #dallas -o ronni".parse().unwrap();
    assert_eq!(
        deop,
        ServerEvent::Mode {
            change: ModeChange::Deop,
            user: "ronni".to_string(),
        }
    );
}

#[test]
fn test_ping_token_shapes() {
    assert_eq!(
        "PING :tmi.twitch.tv".parse::<ServerEvent>().unwrap(),
        ServerEvent::Ping {
            token: "tmi.twitch.tv".to_string()
        }
    );
    assert_eq!(
        "PING 12345".parse::<ServerEvent>().unwrap(),
        ServerEvent::Ping {
            token: "12345".to_string()
        }
    );
}

#[test]
fn test_malformed_lines_are_errors_not_panics() {
    let cases: [(&str, ParseError); 5] = [
        (
            ":ronni!impostor@ronni.tmi.twitch.tv PRIVMSG #dallas :hi",
            ParseError::InvalidPrefix("ronni!impostor@ronni.tmi.twitch.tv".to_string()),
        ),
        (
            ":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas",
            ParseError::MissingText,
        ),
        ("PRIVMSG #dallas :hi", ParseError::MissingPrefix),
        (
            ":jtv MODE #dallas +b ronni",
            ParseError::InvalidModeArgs("#dallas +b ronni".to_string()),
        ),
        ("PING", ParseError::MissingPingToken),
    ];

    for (line, expected) in cases {
        let err = line
            .parse::<ServerEvent>()
            .expect_err(&format!("expected error for '{}'", line));
        assert_eq!(err, expected, "line: '{}'", line);
    }
}

#[test]
fn test_privmsg_to_other_channels_still_classifies() {
    // The bot only joins one channel, but the parser does not care
    // which channel a message targets.
    let event: ServerEvent = ":a2!a2@a2.tmi.twitch.tv PRIVMSG #elsewhere :hello"
        .parse()
        .unwrap();
    assert_eq!(
        event,
        ServerEvent::Message {
            sender: "a2".to_string(),
            text: "hello".to_string(),
        }
    );
}
