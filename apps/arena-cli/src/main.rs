mod render;

use anyhow::Context;
use arena_core::{ArenaConfig, ProblemMetadata, TestCase};
use arena_judge::{HttpJudge, JudgeBackend};
use arena_session::{Phase, Session};
use arena_store::FileStore;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Run and submit solutions against an Arena judge")]
struct Cli {
    /// Judge URL (overrides server.url from arena.toml / ARENA_SERVER_URL)
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a problem's definition and sample cases
    Metadata {
        /// Problem id
        problem: String,
    },
    /// Print the code a session would start with
    Code {
        problem: String,
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Run against the sample cases plus any custom cases
    Run {
        problem: String,
        #[arg(short, long)]
        language: Option<String>,
        /// Source file; becomes the persisted code for this problem and language
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Extra case, may be repeated
        #[arg(long = "case", num_args = 2, value_names = ["INPUT", "EXPECTED"])]
        case: Vec<String>,
        /// YAML list of extra cases ({input, expected})
        #[arg(long)]
        cases: Option<PathBuf>,
    },
    /// Submit against the full hidden suite
    Submit {
        problem: String,
        #[arg(short, long)]
        language: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Throw away persisted code and go back to the starter code
    Reset {
        problem: String,
        #[arg(short, long)]
        language: Option<String>,
    },
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Pick the session language: explicit choice first, then the configured
/// default, then whatever the problem lists first.
fn choose_language(
    meta: &ProblemMetadata,
    requested: Option<String>,
    default: &str,
) -> anyhow::Result<String> {
    if let Some(language) = requested {
        return Ok(language);
    }
    if meta.supports(default) {
        return Ok(default.to_string());
    }
    match meta.supported_languages.first() {
        Some(first) => {
            warn!(
                problem_id = %meta.problem_id,
                default = %default,
                using = %first,
                "Default language not supported by this problem"
            );
            Ok(first.clone())
        }
        None => anyhow::bail!("Problem {} lists no supported languages", meta.problem_id),
    }
}

fn load_cases(path: &Path) -> anyhow::Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cases file {:?}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse cases file {:?}", path))
}

struct App {
    config: ArenaConfig,
    judge: HttpJudge,
}

impl App {
    async fn session(
        self,
        problem: &str,
        language: Option<String>,
    ) -> anyhow::Result<Session<HttpJudge, FileStore>> {
        let meta = self.judge.fetch_metadata(problem).await?;
        let language = choose_language(&meta, language, &self.config.session.language)?;
        let store = FileStore::new(self.config.store_path());
        Ok(Session::new(meta, &language, self.judge, store)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ArenaConfig::new().context("Failed to load configuration")?;
    init_tracing(&config.log.level);

    let server = cli.server.unwrap_or_else(|| config.server.url.clone());
    info!("Using judge at {}", server);
    let app = App {
        judge: HttpJudge::new(&server),
        config,
    };

    match cli.command {
        Commands::Metadata { problem } => {
            let meta = app.judge.fetch_metadata(&problem).await?;
            render::metadata(&meta);
        }
        Commands::Code { problem, language } => {
            let session = app.session(&problem, language).await?;
            println!("{}", session.code());
        }
        Commands::Run {
            problem,
            language,
            file,
            case,
            cases,
        } => {
            let mut session = app.session(&problem, language).await?;
            if let Some(file) = file {
                let code = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read file {:?}", file))?;
                session.set_code(code)?;
            }
            for pair in case.chunks(2) {
                if let [input, expected] = pair {
                    session.add_custom_case(input.clone(), expected.clone())?;
                }
            }
            if let Some(path) = cases {
                for tc in load_cases(&path)? {
                    session.add_custom_case(tc.input, tc.expected)?;
                }
            }

            let phase = session.run().await?;
            render::outcome(&session);
            if phase == Phase::Failure {
                std::process::exit(1);
            }
        }
        Commands::Submit {
            problem,
            language,
            file,
        } => {
            let mut session = app.session(&problem, language).await?;
            if let Some(file) = file {
                let code = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read file {:?}", file))?;
                session.set_code(code)?;
            }

            let phase = session.submit().await?;
            render::outcome(&session);
            if phase == Phase::Failure {
                std::process::exit(1);
            }
        }
        Commands::Reset { problem, language } => {
            let mut session = app.session(&problem, language).await?;
            session.reset()?;
            println!(
                "{} {} ({}) is back to the starter code.",
                "Reset:".green().bold(),
                problem,
                session.language()
            );
        }
    }

    Ok(())
}
