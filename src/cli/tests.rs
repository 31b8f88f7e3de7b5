use super::*;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv)
        .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
}

#[test]
fn no_subcommand_defaults_to_chat() {
    let args = parse_args(&["rag-chat"]);
    assert!(args.command.is_none());
    assert!(args.endpoint.is_none());
    assert!(args.log.is_none());
}

#[test]
fn global_flags_are_accepted_after_subcommand() {
    let argv = [
        "rag-chat",
        "chat",
        "--endpoint",
        "http://127.0.0.1:9000/ask",
        "--log",
        "chat.log",
    ];
    let args = parse_args(&argv);

    assert!(matches!(args.command, Some(Commands::Chat)));
    assert_eq!(args.endpoint.as_deref(), Some("http://127.0.0.1:9000/ask"));
    assert_eq!(args.log.as_deref(), Some("chat.log"));
}

#[test]
fn ask_collects_words_including_leading_hyphens() {
    let argv = ["rag-chat", "ask", "what", "is", "-O2", "?"];
    match parse_args(&argv).command {
        Some(Commands::Ask { prompt }) => assert_eq!(prompt.join(" "), "what is -O2 ?"),
        _ => panic!("expected ask subcommand for argv={argv:?}"),
    }
}

#[test]
fn set_joins_multi_word_values() {
    let argv = ["rag-chat", "set", "title", "Cloud", "Helper"];
    match parse_args(&argv).command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key, "title");
            assert_eq!(value.join(" "), "Cloud Helper");
        }
        _ => panic!("expected set subcommand for argv={argv:?}"),
    }
}

#[test]
fn unset_and_config_parse() {
    assert!(matches!(
        parse_args(&["rag-chat", "unset", "endpoint"]).command,
        Some(Commands::Unset { key }) if key == "endpoint"
    ));
    assert!(matches!(
        parse_args(&["rag-chat", "config"]).command,
        Some(Commands::Config)
    ));
}

#[test]
fn log_flag_takes_precedence_over_config() {
    let config = Config {
        log_file: Some("from-config.log".into()),
        ..Config::default()
    };

    assert_eq!(chat_log_path(Some("flag.log"), &config), Some("flag.log"));
    assert_eq!(chat_log_path(None, &config), Some("from-config.log"));
    assert_eq!(chat_log_path(Some("  "), &Config::default()), None);
    assert_eq!(chat_log_path(None, &Config::default()), None);
}
