use super::*;

#[test]
fn quoted_words_stay_together() {
    assert_eq!(
        parse_line(r#"search "taylor swift" --location 'Los Angeles, CA'"#).expect("parse"),
        Some(LineCommand::Search {
            keyword: vec!["taylor swift".into()],
            distance: String::new(),
            category: String::new(),
            location: "Los Angeles, CA".into(),
        })
    );
    assert_eq!(parse_line("   ").expect("parse"), None);
}

#[test]
fn unterminated_quote_is_an_error() {
    assert!(parse_line(r#"search "open"#).is_err());
}

#[test]
fn parses_search_with_options() {
    let command = parse_line("search jazz fest --distance 25 --category music --location Pasadena")
        .expect("parse")
        .expect("command");
    assert_eq!(
        command,
        LineCommand::Search {
            keyword: vec!["jazz".into(), "fest".into()],
            distance: "25".into(),
            category: "music".into(),
            location: "Pasadena".into(),
        }
    );
}

#[test]
fn bare_search_has_empty_fields() {
    assert_eq!(
        parse_line("search").expect("parse"),
        Some(LineCommand::Search {
            keyword: Vec::new(),
            distance: String::new(),
            category: String::new(),
            location: String::new(),
        })
    );
}

#[test]
fn parses_panel_and_toggle_commands() {
    assert_eq!(
        parse_line("auto on").expect("parse"),
        Some(LineCommand::Auto { state: Toggle::On })
    );
    assert_eq!(
        parse_line("close-venue").expect("parse"),
        Some(LineCommand::CloseVenue)
    );
    assert_eq!(
        parse_line("open 3").expect("parse"),
        Some(LineCommand::Open { target: "3".into() })
    );
    assert_eq!(parse_line("exit").expect("parse"), Some(LineCommand::Quit));
    assert_eq!(parse_line("").expect("parse"), None);
}

#[test]
fn rejects_unknown_commands() {
    assert!(parse_line("dance").is_err());
    assert!(parse_line("auto maybe").is_err());
}
