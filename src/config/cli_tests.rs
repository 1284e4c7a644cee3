//! Tests for CLI argument parsing.

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn parse_request_command() {
        let cli = Cli::parse_from_iter([
            "hookline",
            "request",
            "get",
            "/users",
            "--query",
            "page=2",
            "-H",
            "Accept: application/json",
            "--unwrap",
        ]);

        let Command::Request {
            verb,
            endpoint,
            query,
            headers,
            data,
            form,
            unwrap,
        } = cli.command
        else {
            panic!("expected request command");
        };

        assert_eq!(verb, "get");
        assert_eq!(endpoint, "/users");
        assert_eq!(query, vec!["page=2".to_string()]);
        assert_eq!(headers, vec!["Accept: application/json".to_string()]);
        assert!(data.is_none());
        assert!(form.is_empty());
        assert!(unwrap);
    }

    #[test]
    fn parse_global_options_after_subcommand() {
        let cli = Cli::parse_from_iter([
            "hookline",
            "request",
            "POST",
            "https://example.com/hook",
            "--data",
            "raw",
            "--base-uri",
            "https://api.example.com",
            "--timeout",
            "2.5",
            "--retry-max",
            "4",
            "--retry-interval",
            "250",
            "-v",
        ]);

        assert_eq!(cli.base_uri.as_deref(), Some("https://api.example.com"));
        assert_eq!(cli.timeout, Some(2.5));
        assert_eq!(cli.retry_max, Some(4));
        assert_eq!(cli.retry_interval, Some(250));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_notify_defaults() {
        let cli = Cli::parse_from_iter(["hookline", "notify", "--description", "deploy done"]);

        let Command::Notify {
            key,
            description,
            payload,
            msg_type,
        } = cli.command
        else {
            panic!("expected notify command");
        };

        assert!(key.is_none());
        assert_eq!(description, "deploy done");
        assert_eq!(payload, "null");
        assert_eq!(msg_type, "text");
    }

    #[test]
    fn parse_init_default_output() {
        let cli = Cli::parse_from_iter(["hookline", "init"]);

        assert!(cli.is_init());
        let Command::Init { output } = cli.command else {
            panic!("expected init command");
        };
        assert_eq!(output, std::path::PathBuf::from("hookline.toml"));
    }

    #[test]
    fn data_conflicts_with_form() {
        let result = <Cli as clap::Parser>::try_parse_from([
            "hookline", "request", "post", "/x", "--data", "a", "--form", "b=c",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn subcommand_is_required() {
        let result = <Cli as clap::Parser>::try_parse_from(["hookline"]);

        assert!(result.is_err());
    }
}
