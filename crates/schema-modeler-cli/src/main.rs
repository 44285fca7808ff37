//! schema-modeler CLI - schema mapping and relationship inference.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use schema_modeler::{
    Config, LanguageType, ModelerError, SchemaMapper, SchemaSource, SnapshotSource, TypeDecoder,
    TypeDescriptor,
};
use serde::Serialize;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "schema-modeler")]
#[command(about = "Map a relational schema to typed table descriptors and associations")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "modeler.yaml")]
    config: PathBuf,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the schema and emit table descriptors
    Map {
        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json", value_parser = ["json", "yaml"])]
        format: String,
    },

    /// List the tables selected for mapping
    Tables,

    /// Decode raw column type strings (no configuration needed)
    Decode {
        /// Type strings, e.g. "decimal(10,2)" or "enum('a','b')"
        #[arg(required = true)]
        types: Vec<String>,
    },
}

/// Decoded type with its hints, as printed by `decode`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DecodedType<'a> {
    raw_type: &'a str,
    #[serde(flatten)]
    descriptor: TypeDescriptor,
    language_type: LanguageType,
    orm_type: &'static str,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ModelerError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    match cli.command {
        Commands::Decode { types } => decode(&types)?,
        Commands::Tables => {
            let mapper = load_mapper(&cli.config).await?;
            for table in mapper.list_tables().await? {
                println!("{}", table);
            }
        }
        Commands::Map { output, format } => {
            let mapper = load_mapper(&cli.config).await?;
            let (schema, report) = mapper.run().await?;

            let rendered = match format.as_str() {
                "yaml" => schema.to_yaml()?,
                _ => schema.to_json()?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    info!("Wrote schema map to {:?}", path);
                }
                None => println!("{}", rendered),
            }

            eprintln!(
                "Mapped {} tables ({} junction, {} associations) in {:.2}s [run {}]",
                report.tables_mapped,
                report.junction_tables,
                report.associations,
                report.duration_seconds,
                report.run_id
            );
        }
    }

    Ok(())
}

async fn load_mapper(config_path: &Path) -> Result<SchemaMapper, ModelerError> {
    let config = Config::load(config_path)?;
    info!("Loaded configuration from {:?}", config_path);

    let source = open_source(&config, config_path).await?;
    SchemaMapper::from_config(&config, source)
}

fn decode(types: &[String]) -> Result<(), ModelerError> {
    let decoder = TypeDecoder::default();
    let decoded: Vec<DecodedType> = types
        .iter()
        .map(|raw| {
            let descriptor = decoder.decode(raw);
            DecodedType {
                raw_type: raw,
                language_type: descriptor.language_type(),
                orm_type: descriptor.orm_type(),
                descriptor,
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&decoded)?);
    Ok(())
}

/// Open the configured metadata source. Relative snapshot paths resolve
/// against the configuration file's directory.
async fn open_source(config: &Config, config_path: &Path) -> Result<Arc<dyn SchemaSource>, ModelerError> {
    match config.source.r#type.as_str() {
        "snapshot" => {
            let path = PathBuf::from(config.source.path.as_deref().unwrap_or_default());
            let path = match config_path.parent() {
                Some(dir) if path.is_relative() => dir.join(path),
                _ => path,
            };
            Ok(Arc::new(SnapshotSource::load(path)?))
        }
        #[cfg(feature = "mysql")]
        "mysql" => {
            let source = schema_modeler::MysqlSource::new(
                &config.source,
                config.mapping.max_concurrent_tables,
            )
            .await?;
            Ok(Arc::new(source))
        }
        other => Err(ModelerError::Config(format!(
            "source type '{}' is not supported by this build",
            other
        ))),
    }
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
