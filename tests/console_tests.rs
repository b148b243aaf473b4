use lens::console::Command;
use lens::memory::types::{InsightStatus, OriginStatus, Resolution};

#[test]
fn test_plain_text_is_speech() {
    assert_eq!(Command::parse("  I hate mornings  "), Command::Say("I hate mornings".to_string()));
}

#[test]
fn test_listing_and_session_commands() {
    assert_eq!(Command::parse("/hypotheses"), Command::Hypotheses);
    assert_eq!(Command::parse("/insights"), Command::Insights);
    assert_eq!(Command::parse("/origins"), Command::Origins);
    assert_eq!(Command::parse("/profile"), Command::Profile);
    assert_eq!(Command::parse("/stats"), Command::Stats);
    assert_eq!(Command::parse("/stop"), Command::Stop);
    assert_eq!(Command::parse("/quit"), Command::Quit);
    assert_eq!(Command::parse("/exit"), Command::Quit);
    assert_eq!(Command::parse("/help"), Command::Help);
}

#[test]
fn test_indices_are_one_based_on_screen() {
    assert_eq!(
        Command::parse("/confirm 1 primary"),
        Command::Resolve { index: 0, resolution: Resolution::ConfirmedPrimary }
    );
    assert_eq!(
        Command::parse("/confirm 3 competing"),
        Command::Resolve { index: 2, resolution: Resolution::ConfirmedCompeting }
    );
    assert_eq!(Command::parse("/reject 2"), Command::Resolve { index: 1, resolution: Resolution::RejectedAll });
    assert_eq!(Command::parse("/agree 1"), Command::Insight { index: 0, status: InsightStatus::Agreed });
    assert_eq!(Command::parse("/disagree 4"), Command::Insight { index: 3, status: InsightStatus::Disagreed });
    assert_eq!(Command::parse("/origin 1 confirm"), Command::Origin { index: 0, status: OriginStatus::Confirmed });
    assert_eq!(Command::parse("/origin 2 reject"), Command::Origin { index: 1, status: OriginStatus::Rejected });
}

#[test]
fn test_malformed_commands_are_invalid() {
    for line in ["/confirm 0 primary", "/confirm 1 both", "/reject x", "/agree", "/stop now", "/dance"] {
        assert!(matches!(Command::parse(line), Command::Invalid(_)), "{} should be invalid", line);
    }
}
