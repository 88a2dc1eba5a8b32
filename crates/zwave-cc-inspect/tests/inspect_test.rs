//! Tests for the cc-inspect library layer.

use zwave_cc::central_scene::KeyAttribute;
use zwave_cc::{Command, Decoded, Registry};
use zwave_cc_inspect::{
    decode_frame, encode_frame, format_hex, list_commands, render, render_text, EncodeCommand,
    OutputFormat,
};

#[test]
fn test_decode_notification_text() {
    let cc = decode_frame(Registry::global(), "01 05 5B 03 07 82 08").unwrap();
    let text = render_text(&cc);

    assert!(text.starts_with("node 1 Central Scene (0x5B) Notification"));
    assert!(text.contains("sequence: 7"));
    assert!(text.contains("scene 8: key held down"));
    assert!(text.contains("slow refresh: true"));
}

#[test]
fn test_decode_supported_report_text() {
    let cc = decode_frame(Registry::global(), "01085B0202840103 1500").unwrap();
    let text = render(&cc, OutputFormat::Text).unwrap();

    assert!(text.contains("scenes: 2"));
    assert!(text.contains("scene 1: [1, 9, 10]"));
    assert!(text.contains("scene 2: [1, 3, 5]"));
}

#[test]
fn test_decode_json() {
    let cc = decode_frame(Registry::global(), "01 03 5B 06 80").unwrap();
    let json = render(&cc, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["node_id"], 1);
    assert_eq!(value["class_id"], 0x5B);
    assert_eq!(value["body"]["kind"], "command");
    assert_eq!(
        value["body"]["value"]["command"]["ConfigurationReport"]["slow_refresh"],
        true
    );
}

#[test]
fn test_decode_errors_are_reported() {
    // Length byte claims more than is present
    let err = decode_frame(Registry::global(), "01 09 5B 03").unwrap_err();
    assert!(format!("{:#}", err).contains("Malformed frame"));

    // Notification missing its scene byte
    let err = decode_frame(Registry::global(), "01 04 5B 03 07 00").unwrap_err();
    assert!(format!("{:#}", err).contains("Truncated Notification"));

    assert!(decode_frame(Registry::global(), "not hex").is_err());
}

#[test]
fn test_encode_then_decode() {
    for command in [
        EncodeCommand::SupportedGet,
        EncodeCommand::ConfigurationGet,
        EncodeCommand::ConfigurationSet { slow_refresh: false },
        EncodeCommand::ConfigurationSet { slow_refresh: true },
    ] {
        let frame = encode_frame(9, &command).unwrap();
        let cc = decode_frame(Registry::global(), &format_hex(&frame)).unwrap();
        assert_eq!(cc.node_id, 9);
        assert_eq!(cc.body, Decoded::Command(command.to_command()));
    }
}

#[test]
fn test_encode_supported_get() {
    assert_eq!(
        format_hex(&encode_frame(1, &EncodeCommand::SupportedGet).unwrap()),
        "01 02 5B 01"
    );
}

#[test]
fn test_list_commands() {
    let lines = list_commands(Registry::global());
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "0x5B 0x01 Central Scene SupportedGet");
    assert_eq!(lines[5], "0x5B 0x06 Central Scene ConfigurationReport");

    assert!(list_commands(&Registry::new()).is_empty());
}

#[test]
fn test_decoded_key_attribute() {
    let cc = decode_frame(Registry::global(), "0105 5B03 0105 02").unwrap();
    match cc.command() {
        Some(Command::CentralScene(cmd)) => {
            assert_eq!(cmd.name(), "Notification");
        }
        other => panic!("Expected Central Scene command, got {:?}", other),
    }
    assert!(render_text(&cc).contains(&KeyAttribute::KeyPressed4x.to_string()));
}
