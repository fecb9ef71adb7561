mod host;
mod load;

use clap::{Arg, ArgAction, ArgMatches, Command};
use gametext_l10n::{
    Delimiter, PackInfo, PlayerGender, Template, TranslationService, Worksheet, expand, parse,
};
use host::CliHost;
use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("translate", sub)) => translate(&matches, sub),
        Some(("segment", sub)) => segment(sub),
        Some(("expand", sub)) => {
            for text in input_texts(sub)? {
                for variant in expand(&text) {
                    println!("{variant}");
                }
            }
            Ok(())
        }
        Some(("extract", sub)) => extract(sub),
        _ => Err("missing subcommand".into()),
    }
}

fn cli() -> Command {
    let text_arg = Arg::new("text")
        .help("Game text to process (default: one text per line from stdin)")
        .num_args(0..);

    Command::new("gametext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Segment, expand and translate game text")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("dict")
                .long("dict")
                .short('d')
                .help("Dictionary file (repeatable; loaded in sorted path order)")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("delimiter")
                .long("delimiter")
                .help("Dictionary column separator: comma, semicolon or auto")
                .value_parser(|s: &str| s.parse::<Delimiter>())
                .default_value("auto")
                .global(true),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .help("Language code of the dictionaries (default: und)")
                .conflicts_with("pack-info")
                .global(true),
        )
        .arg(
            Arg::new("pack-info")
                .long("pack-info")
                .help("Language pack metadata JSON file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("player-name")
                .long("player-name")
                .help("Current player's name")
                .global(true),
        )
        .arg(
            Arg::new("gender")
                .long("gender")
                .help("Current player's gender: male or female")
                .value_parser(|s: &str| s.parse::<PlayerGender>())
                .global(true),
        )
        .arg(
            Arg::new("missing")
                .long("missing")
                .help("Ledger file that missing keys are appended to")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log pack loading and run summaries (RUST_LOG overrides)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate game text with the loaded dictionaries")
                .arg(text_arg.clone()),
        )
        .subcommand(
            Command::new("segment")
                .about("Print the translatable units of game text")
                .arg(text_arg.clone())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print units and template as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("expand")
                .about("Print every conditional variant of game text")
                .arg(text_arg),
        )
        .subcommand(
            Command::new("extract")
                .about("Build a translator worksheet from texts on stdin")
                .arg(
                    Arg::new("comment")
                        .long("comment")
                        .short('c')
                        .help("Comment column for every row")
                        .default_value(""),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Texts given as arguments, or one text per stdin line when none are.
fn input_texts(matches: &ArgMatches) -> io::Result<Vec<String>> {
    let args: Vec<String> = matches
        .get_many::<String>("text")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if !args.is_empty() {
        return Ok(args);
    }
    io::stdin().lock().lines().collect()
}

fn translate(matches: &ArgMatches, sub: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let host = CliHost::new(
        matches.get_one::<String>("player-name").cloned(),
        matches.get_one::<PlayerGender>("gender").copied(),
        matches.get_one::<PathBuf>("missing").cloned(),
    );
    let service = TranslationService::new(Arc::new(host));

    let dicts: Vec<PathBuf> = matches
        .get_many::<PathBuf>("dict")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if !dicts.is_empty() {
        let info = match matches.get_one::<PathBuf>("pack-info") {
            Some(path) => load::load_pack_info(path)?,
            None => {
                let code = matches.get_one::<String>("language").map_or("und", String::as_str);
                PackInfo::new(code, code)
            }
        };
        let delimiter = matches.get_one::<Delimiter>("delimiter").copied().unwrap_or_default();
        service.activate(load::load_pack(info, &dicts, delimiter)?);
    }

    for text in input_texts(sub)? {
        println!("{}", service.process(&text));
    }

    let missing = service.missing_keys();
    if !missing.is_empty() {
        info!(count = missing.len(), "Units without translation");
    }
    Ok(())
}

fn segment(sub: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let json = sub.get_flag("json");
    for text in input_texts(sub)? {
        let units = parse(&text);
        if json {
            let template = Template::build(&text, &units);
            let value = serde_json::json!({
                "input": text,
                "units": units,
                "template": template.as_str(),
            });
            println!("{}", serde_json::to_string(&value)?);
        } else {
            for unit in &units {
                println!("{unit}");
            }
        }
    }
    Ok(())
}

fn extract(sub: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let comment = sub.get_one::<String>("comment").map_or("", String::as_str);
    let mut sheet = Worksheet::new();
    for line in io::stdin().lock().lines() {
        sheet.add_text(&line?, comment);
    }
    info!(rows = sheet.len(), "Worksheet built");
    print!("{}", sheet.render());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() -> Result<(), Box<dyn Error>> {
        let matches = cli().try_get_matches_from([
            "gametext",
            "translate",
            "--dict",
            "b.csv",
            "--dict",
            "a.csv",
            "--gender",
            "female",
            "--delimiter",
            "semicolon",
            "Hello",
        ])?;
        let (name, sub) = matches.subcommand().ok_or("no subcommand")?;
        assert_eq!(name, "translate");
        let dicts: Vec<&PathBuf> = sub.get_many::<PathBuf>("dict").ok_or("no dicts")?.collect();
        assert_eq!(dicts, vec![&PathBuf::from("b.csv"), &PathBuf::from("a.csv")]);
        assert_eq!(sub.get_one::<PlayerGender>("gender"), Some(&PlayerGender::Female));
        assert_eq!(sub.get_one::<Delimiter>("delimiter"), Some(&Delimiter::Semicolon));
        assert_eq!(input_texts(sub)?, vec!["Hello"]);
        Ok(())
    }

    #[test]
    fn test_invalid_gender_is_rejected() {
        let result = cli().try_get_matches_from(["gametext", "translate", "--gender", "other"]);
        assert!(result.is_err());
    }
}
