// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::{Session, describe};
use selah_app::{DisplayFormat, DisplayToggle, ViewerResult, ViewerState};
use selah_data::ReferenceData;
use selah_render::render_clarifications;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SELAH_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    init_logging()?;

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `selah --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let api_key = config::api_key_from_env()?;
    let client = selah_api::Client::new(
        config.api_base_url(),
        &api_key,
        config.api_timeout()?,
        config.retry_policy()?,
    )
    .with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values",
            options.config_path.display()
        )
    })?;
    tracing::debug!(
        base_url = client.base_url(),
        timeout = ?client.timeout(),
        attempts = client.retry_policy().max_attempts,
        "api client ready"
    );

    let data_dir = config.data_dir()?;
    let data = ReferenceData::load(&data_dir).with_context(|| {
        format!(
            "load reference data from {} -- if this path is wrong, set [data].dir or {}",
            data_dir.display(),
            config::DATA_DIR_ENV
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let Some(command) = options.command else {
        print_help();
        return Ok(());
    };

    let state = ViewerState::with_settings(config.display_settings());
    let mut session = Session::new(Arc::new(data), client, state);
    for toggle in &options.toggles {
        if !session.state().settings.get(*toggle) {
            session.toggle(*toggle);
        }
    }
    if let Some(format) = options.format {
        session.set_format(format);
    }

    match execute(&mut session, &command) {
        Ok(output) => println!("{output}"),
        Err(error) => println!("{}", describe(&error)),
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Translations {
        language: Option<String>,
        script: Option<String>,
        find: Option<String>,
    },
    Books {
        translation: String,
    },
    Chapters {
        translation: String,
        book: String,
    },
    Read {
        translation: String,
        book: String,
        chapter: String,
    },
    Verse {
        translation: String,
        book: String,
        chapter: String,
        verse: String,
    },
    Open {
        token: String,
    },
    Xref {
        translation: String,
        book: String,
        chapter: String,
        filter: Option<String>,
    },
    Search {
        translation: String,
        query: String,
        offset: u32,
    },
    Passage {
        translation: String,
        passage: String,
    },
    Bibles {
        query: Option<String>,
    },
    Info {
        translation: String,
    },
}

fn execute(session: &mut Session, command: &Command) -> ViewerResult<String> {
    match command {
        Command::Translations {
            language,
            script,
            find,
        } => {
            let rows = if let Some(term) = find {
                vec![session.find_translation(term)?]
            } else if let Some(language) = language {
                session.translations_by_language(language)
            } else if let Some(script) = script {
                session.translations_by_script(script)
            } else {
                session.translations()
            };
            Ok(rows
                .iter()
                .map(|(name, id)| format!("{name}\t{id}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Books { translation } => {
            let books = session.books(translation)?;
            Ok(books
                .iter()
                .map(|book| format!("{}\t{}", book.id, book.name))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Chapters { translation, book } => {
            let chapters = session.chapters(translation, book)?;
            Ok(chapters
                .iter()
                .map(|chapter| chapter.number.as_str())
                .collect::<Vec<_>>()
                .join(" "))
        }
        Command::Read {
            translation,
            book,
            chapter,
        } => {
            let rendered = session.read_chapter(translation, book, chapter)?;
            let mut output = rendered.markup;
            if session.state().settings.show_clarifications {
                let notes = render_clarifications(&rendered.clarifications);
                if !notes.is_empty() {
                    output.push_str("\n\n");
                    output.push_str(&notes);
                }
            }
            Ok(output)
        }
        Command::Verse {
            translation,
            book,
            chapter,
            verse,
        } => session.read_verse(translation, book, chapter, verse),
        Command::Open { token } => session.open_reference(token),
        Command::Xref {
            translation,
            book,
            chapter,
            filter,
        } => {
            let refs = session.cross_references(translation, book, chapter, filter.as_deref())?;
            if refs.is_empty() {
                return Ok(format!("No cross references for {}.", refs.chapter));
            }
            let mut lines = Vec::new();
            for (verse, grid) in &refs.references {
                lines.push(format!("Verse {verse}"));
                for (label, token) in refs.tokens(grid) {
                    lines.push(format!("  {label}\t{token}"));
                }
            }
            Ok(lines.join("\n"))
        }
        Command::Search {
            translation,
            query,
            offset,
        } => {
            let results = session.search(translation, query, *offset)?;
            if results.is_empty() {
                return Ok(format!("No results for {query:?}."));
            }
            let mut lines = vec![format!("{} results", results.total)];
            lines.extend(
                results
                    .verses
                    .iter()
                    .map(|hit| format!("**{}** - {}", hit.reference, hit.text)),
            );
            Ok(lines.join("\n"))
        }
        Command::Passage {
            translation,
            passage,
        } => Ok(session.read_passage(translation, passage)?.markup),
        Command::Bibles { query } => {
            let bibles = session.bibles(query.as_deref())?;
            Ok(bibles
                .iter()
                .map(|bible| format!("{}\t{}\t{}", bible.id, bible.abbreviation, bible.name))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::Info { translation } => {
            let bible = session.bible(translation)?;
            let mut lines = vec![
                format!("{} ({})", bible.name, bible.abbreviation),
                format!("id: {}", bible.id),
            ];
            if let Some(language) = &bible.language {
                lines.push(format!("language: {}", language.name));
            }
            if let Some(description) = bible.description.as_deref().filter(|d| !d.is_empty()) {
                lines.push(format!("description: {description}"));
            }
            Ok(lines.join("\n"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    format: Option<DisplayFormat>,
    toggles: Vec<DisplayToggle>,
    command: Option<Command>,
}

/// Options that belong to a subcommand rather than to the program.
#[derive(Debug, Default)]
struct CommandArgs {
    words: Vec<String>,
    language: Option<String>,
    script: Option<String>,
    find: Option<String>,
    filter: Option<String>,
    offset: Option<u32>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        format: None,
        toggles: Vec::new(),
        command: None,
    };
    let mut command_args = CommandArgs::default();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str, what: &str| -> Result<String> {
            iter.next()
                .map(|value| value.as_ref().to_owned())
                .ok_or_else(|| anyhow!("{flag} requires {what}"))
        };
        match arg.as_ref() {
            "--config" => {
                options.config_path = PathBuf::from(value_for("--config", "a file path")?);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            "--format" => {
                let raw = value_for("--format", "paragraph or verse")?;
                let format = DisplayFormat::parse(&raw).ok_or_else(|| {
                    anyhow!("unknown format {raw:?}; use paragraph or verse")
                })?;
                options.format = Some(format);
            }
            "--language" => command_args.language = Some(value_for("--language", "a language")?),
            "--script" => command_args.script = Some(value_for("--script", "a script name")?),
            "--find" => command_args.find = Some(value_for("--find", "a search term")?),
            "--filter" => command_args.filter = Some(value_for("--filter", "a search term")?),
            "--offset" => {
                let raw = value_for("--offset", "a number")?;
                let offset = raw
                    .parse()
                    .with_context(|| format!("--offset {raw:?} is not a number"))?;
                command_args.offset = Some(offset);
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                let toggle = DisplayToggle::from_flag(flag).ok_or_else(|| {
                    anyhow!("unknown argument {flag:?}; run with --help to see supported options")
                })?;
                if !options.toggles.contains(&toggle) {
                    options.toggles.push(toggle);
                }
            }
            word => command_args.words.push(word.to_owned()),
        }
    }

    options.command = parse_command(command_args)?;
    Ok(options)
}

fn parse_command(args: CommandArgs) -> Result<Option<Command>> {
    let Some((name, rest)) = args.words.split_first() else {
        if args.language.is_some()
            || args.script.is_some()
            || args.find.is_some()
            || args.filter.is_some()
            || args.offset.is_some()
        {
            bail!("command options need a command; run with --help to see supported commands");
        }
        return Ok(None);
    };

    let reject = |flag: &str, set: bool| -> Result<()> {
        if set {
            bail!("{flag} does not apply to `{name}`");
        }
        Ok(())
    };
    if name != "translations" {
        reject("--language", args.language.is_some())?;
        reject("--script", args.script.is_some())?;
        reject("--find", args.find.is_some())?;
    }
    if name != "xref" {
        reject("--filter", args.filter.is_some())?;
    }
    if name != "search" {
        reject("--offset", args.offset.is_some())?;
    }

    let command = match name.as_str() {
        "translations" => {
            if !rest.is_empty() {
                bail!("translations takes no arguments");
            }
            Command::Translations {
                language: args.language,
                script: args.script,
                find: args.find,
            }
        }
        "books" => {
            let [translation] = positional::<1>(name, rest, "<translation>")?;
            Command::Books { translation }
        }
        "chapters" => {
            let [translation, book] = positional::<2>(name, rest, "<translation> <book>")?;
            Command::Chapters { translation, book }
        }
        "read" => {
            let [translation, book, chapter] =
                positional::<3>(name, rest, "<translation> <book> <chapter>")?;
            Command::Read {
                translation,
                book,
                chapter,
            }
        }
        "verse" => {
            let [translation, book, chapter, verse] =
                positional::<4>(name, rest, "<translation> <book> <chapter> <verse>")?;
            Command::Verse {
                translation,
                book,
                chapter,
                verse,
            }
        }
        "open" => {
            let [token] = positional::<1>(name, rest, "<translation_book_chapter_verse>")?;
            Command::Open { token }
        }
        "xref" => {
            let [translation, book, chapter] =
                positional::<3>(name, rest, "<translation> <book> <chapter>")?;
            Command::Xref {
                translation,
                book,
                chapter,
                filter: args.filter,
            }
        }
        "search" => {
            let Some((translation, words)) = rest.split_first() else {
                bail!("search expects <translation-id> <query...>");
            };
            if words.is_empty() {
                bail!("search expects <translation-id> <query...>");
            }
            Command::Search {
                translation: translation.clone(),
                query: words.join(" "),
                offset: args.offset.unwrap_or(0),
            }
        }
        "passage" => {
            let [translation, passage] =
                positional::<2>(name, rest, "<translation-id> <passage-id>")?;
            Command::Passage {
                translation,
                passage,
            }
        }
        "bibles" => Command::Bibles {
            query: (!rest.is_empty()).then(|| rest.join(" ")),
        },
        "info" => {
            let [translation] = positional::<1>(name, rest, "<translation>")?;
            Command::Info { translation }
        }
        unknown => {
            bail!("unknown command {unknown:?}; run with --help to see supported commands")
        }
    };
    Ok(Some(command))
}

fn positional<const N: usize>(
    command: &str,
    rest: &[String],
    usage: &str,
) -> Result<[String; N]> {
    <[String; N]>::try_from(rest.to_vec()).map_err(|_| anyhow!("{command} expects {usage}"))
}

fn print_help() {
    println!("selah: read scripture from the terminal");
    println!();
    println!("usage: selah [options] <command> [arguments]");
    println!();
    println!("commands:");
    println!("  translations [--language L | --script S | --find T]  List known translations");
    println!("  books <translation>                        List books");
    println!("  chapters <translation> <book>              List chapters of a book");
    println!("  read <translation> <book> <chapter>        Render a chapter (or `intro`)");
    println!("  verse <translation> <book> <chapter> <verse>  Show one verse");
    println!("  xref <translation> <book> <chapter> [--filter T]  Cross references");
    println!("  open <translation_book_chapter_verse>      Open a cross reference");
    println!("  search <translation-id> <query...> [--offset N]  Full-text search");
    println!("  passage <translation-id> <passage-id>      Render a passage");
    println!("  bibles [query...]                          Translations offered by the service");
    println!("  info <translation>                         Service details for a translation");
    println!();
    println!("options:");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config, API key, and reference data");
    println!("  --format <paragraph|verse>  Chapter layout");
    for toggle in DisplayToggle::ALL {
        println!("  {:<24} {}", toggle.flag(), toggle.label());
    }
    println!("  --help                   Show this help");
    println!();
    println!("The API key is read from BIBLE_API_KEY. Set SELAH_LOG to adjust logging.");
}
