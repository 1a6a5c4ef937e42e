use meta_sql::config::runtime::RuntimeConfig;
use meta_sql::file_processor::FileProcessor;
use meta_sql::{logging, pipeline, PipelineError, PipelineResult};
use std::env;
use std::path::Path;
use std::process;

enum Input {
    File(String),
    Inline(String),
}

struct Options {
    input: Input,
    json: bool,
    verbose: bool,
    config_path: Option<String>,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("meta_sql");

    if args.len() < 2 {
        eprintln!("Usage: {} <script.sql> [options]", program);
        eprintln!("       {} -e \"<sql>\" [options]", program);
        eprintln!("       {} --help", program);
        process::exit(1);
    }

    if args[1..].iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help(program);
        return;
    }

    let options = match parse_options(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            process::exit(1);
        }
    };

    let config = match load_config(&options) {
        Ok(config) => config,
        Err(error) => {
            eprint!("{}", error.render(""));
            process::exit(1);
        }
    };

    if let Err(e) = logging::config::init_runtime_preferences(config.logging.clone()) {
        eprintln!("Warning: {}", e);
    }
    if let Err(e) = logging::init_global_logging() {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let (outcome, source) = match &options.input {
        Input::File(path) => {
            match FileProcessor::from_preferences(&config.file_processor).process_file(path) {
                Ok(file_result) => (
                    pipeline::process_file_result(&file_result, &config),
                    file_result.source,
                ),
                Err(e) => (Err(PipelineError::from(e)), String::new()),
            }
        }
        Input::Inline(text) => (
            pipeline::process_text_with_config("<inline>", text, &config),
            text.clone(),
        ),
    };

    match outcome {
        Ok(result) => print_result(&result, &options),
        Err(error) => {
            eprint!("{}", error.render(&source));
            if let Some(metadata) = meta_sql::logging::codes::get_error_metadata(
                error.error_code().as_str(),
            ) {
                eprintln!("  = help: {}", metadata.recommended_action);
            }
            process::exit(2);
        }
    }
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut input = None;
    let mut json = false;
    let mut verbose = false;
    let mut config_path = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-e" | "--execute" => {
                let text = args.get(i + 1).ok_or("-e requires an SQL string")?;
                input = Some(Input::Inline(text.clone()));
                i += 1;
            }
            "--config" => {
                let path = args.get(i + 1).ok_or("--config requires a path")?;
                config_path = Some(path.clone());
                i += 1;
            }
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            other if other.starts_with('-') => {
                eprintln!("Warning: Unknown option '{}'", other);
            }
            path => {
                if input.is_some() {
                    return Err(format!("unexpected argument '{}'", path));
                }
                input = Some(Input::File(path.to_string()));
            }
        }
        i += 1;
    }

    let input = input.ok_or("no script file or -e statement given")?;
    Ok(Options {
        input,
        json,
        verbose,
        config_path,
    })
}

fn load_config(options: &Options) -> Result<RuntimeConfig, PipelineError> {
    match &options.config_path {
        Some(path) => RuntimeConfig::from_toml_file(Path::new(path)).map_err(PipelineError::configuration),
        None => Ok(RuntimeConfig::default()),
    }
}

fn print_result(result: &PipelineResult, options: &Options) {
    if options.json {
        match serde_json::to_string_pretty(&result.to_json()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", result.to_sql());
    }

    if options.verbose {
        eprintln!();
        eprintln!("Source:     {}", result.source_name);
        if let Some(metadata) = &result.file_metadata {
            eprintln!(
                "File:       {} ({} lines)",
                metadata.human_readable_size(),
                metadata.line_count
            );
        }
        eprintln!("Statements: {}", result.statement_count());
        eprintln!("Tokens:     {}", result.token_count);
        eprintln!(
            "Duration:   {:.2}ms",
            result.processing_duration.as_secs_f64() * 1000.0
        );
    }
}

fn print_help(program_name: &str) {
    println!("meta_sql v{}", env!("CARGO_PKG_VERSION"));
    println!("Parser for administrative and metadata SQL statements");
    println!();
    println!("USAGE:");
    println!("    {} <script.sql> [options]     # Parse a script file", program_name);
    println!("    {} -e \"<sql>\" [options]       # Parse inline SQL", program_name);
    println!();
    println!("OPTIONS:");
    println!("    -e, --execute <SQL>   Parse the given text instead of a file");
    println!("    --json                Print the AST as JSON");
    println!("    --config <PATH>       Load runtime preferences from a TOML file");
    println!("    -v, --verbose         Print processing statistics to stderr");
    println!("    -h, --help            Show this help message");
    println!();
    println!("OUTPUT:");
    println!("    Success: canonical SQL, one statement per line (or JSON with --json)");
    println!("    Failure: source-mapped diagnostic on stderr, exit status 2");
    println!();
    println!("EXAMPLES:");
    println!("    {} setup.sql", program_name);
    println!("    {} -e \"SHOW TABLES FROM dfs.tmp LIKE 'o%'\" --json", program_name);
}
