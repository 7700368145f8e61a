//! ytoj CLI
//!
//! Command-line interface for converting Swagger 2.0 YAML definitions into
//! a JSON Schema and validating payloads against the result.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use ytoj::{
    check_document, load_definitions_auto, transform, validate_definition, write_document,
    Config, ConfigError, ConfigFile, JsonSchemaDocument, ValidateError, DEFAULT_CONFIG_FILE,
};

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(Parser)]
#[command(name = "ytoj")]
#[command(about = "Convert Swagger 2.0 YAML definitions into a JSON Schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert Swagger definitions to a JSON Schema file (the default)
    Convert {
        #[command(flatten)]
        config: ConfigArgs,

        /// Check the generated schema against its meta-schema before writing
        #[arg(long)]
        check: bool,
    },

    /// Validate a JSON payload against one generated definition
    Validate {
        /// Payload file to validate
        payload: PathBuf,

        /// Definition to validate against (e.g., Pet)
        #[arg(long, short)]
        definition: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json_output: bool,
    },
}

/// Settings that override the config file.
#[derive(Args, Default)]
struct ConfigArgs {
    /// Config file (default: ytoj.json in the working directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Swagger YAML input: file path or URL (http:// or https://)
    #[arg(long)]
    yaml: Option<String>,

    /// Output JSON Schema file
    #[arg(long)]
    json: Option<PathBuf>,

    /// $schema of the generated document
    #[arg(long)]
    schema: Option<String>,

    /// $id of the generated document (absolute URI)
    #[arg(long)]
    id: Option<String>,

    /// Inline $ref pointers instead of keeping them
    #[arg(long, action = clap::ArgAction::Set)]
    resolve_refs: Option<bool>,

    /// additionalProperties applied to object schemas that don't set it
    #[arg(long, action = clap::ArgAction::Set)]
    additional_properties: Option<bool>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so a generated schema piped elsewhere stays clean
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        None => run_convert(ConfigArgs::default(), false),
        Some(Commands::Convert { config, check }) => run_convert(config, check),
        Some(Commands::Validate {
            payload,
            definition,
            config,
            json_output,
        }) => run_validate(&payload, &definition, config, json_output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_convert(args: ConfigArgs, check: bool) -> Result<(), u8> {
    let config = load_config(args)?;
    let output = config.output().map_err(report_config_error)?;

    let document = build_document(&config, false)?;

    if check {
        check_document(&document).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
    }

    write_document(&document, output).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

fn run_validate(
    payload_path: &std::path::Path,
    definition: &str,
    args: ConfigArgs,
    json_output: bool,
) -> Result<(), u8> {
    let config = load_config(args)?;
    let document = build_document(&config, json_output)?;

    let content = std::fs::read_to_string(payload_path).map_err(|e| {
        report_error(
            json_output,
            &format!("cannot read payload {}: {}", payload_path.display(), e),
        );
        3u8
    })?;
    let payload: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        report_error(json_output, &format!("invalid JSON payload: {}", e));
        2u8
    })?;

    match validate_definition(&document, definition, &payload) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(e) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Read the config file, apply flag overrides and validate the result.
fn load_config(args: ConfigArgs) -> Result<Config, u8> {
    let (path, required) = match args.config {
        Some(path) => (path, true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let overrides = ConfigFile {
        yaml: args.yaml,
        json: args.json,
        schema: args.schema,
        id: args.id,
        resolve_refs: args.resolve_refs,
        additional_properties: args.additional_properties,
    };

    let config = Config::load(&path, required, overrides).map_err(report_config_error)?;
    config.validate().map_err(report_config_error)?;
    Ok(config)
}

/// Load the Swagger input and convert it.
fn build_document(config: &Config, json_output: bool) -> Result<JsonSchemaDocument, u8> {
    let definitions = load_definitions_auto(&config.yaml).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    transform(&definitions, &config.options()).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })
}

fn report_config_error(e: ConfigError) -> u8 {
    eprintln!("{}Could not get configuration: {}{}", RED, e, RESET);
    e.exit_code() as u8
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
