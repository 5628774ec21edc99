use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rc_fire_toolbox::app::{self, AppError};
use rc_fire_toolbox::config::{self, Config, DEFAULT_CONFIG_FILE};
use rc_fire_toolbox::cover::CoverLookup;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "rc_fire_toolbox")]
#[command(version)]
#[command(about = "철근콘크리트 내화 설계 조회표 생성/조회 도구")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 원본 표(CSV/XLSX)에서 축거리 조회표 JSON 생성
    BuildAxis {
        #[arg(short, long)]
        source: PathBuf,
        /// 기본값은 설정의 paths.axis_table
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 잘못된 구간을 건너뛰고 계속 진행
        #[arg(long)]
        permissive: bool,
    },

    /// 최소 축거리 조회
    Query {
        #[arg(short, long)]
        rating: String,
        #[arg(long)]
        omega: f64,
        #[arg(short, long)]
        n: f64,
        #[arg(short, long)]
        b: f64,
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// 원본 표에서 최소 피복 조회표 JSON 생성
    BuildCover {
        #[arg(short, long)]
        source: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 최소 피복 조회
    Cover {
        #[arg(short, long)]
        exposure: String,
        #[arg(long)]
        cement: String,
        #[arg(short, long)]
        grade: String,
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// 대화형 축거리 조회
    Interactive {
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// 기본 설정 파일 작성
    InitConfig,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("로그 설정 실패: {err}");
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 명령을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    match try_run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<ExitCode, AppError> {
    if let Commands::InitConfig = cli.command {
        Config::default().save(&cli.config)?;
        println!("기본 설정을 작성했습니다: {}", cli.config.display());
        return Ok(ExitCode::SUCCESS);
    }
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::BuildAxis {
            source,
            output,
            permissive,
        } => {
            let output = output.unwrap_or_else(|| cfg.paths.axis_table.clone());
            let report = app::build_axis(&cfg, &source, &output, permissive)?;
            app::print_axis_report(&report);
            println!("저장: {}", output.display());
        }
        Commands::Query {
            rating,
            omega,
            n,
            b,
            table,
        } => {
            let table = table.unwrap_or_else(|| cfg.paths.axis_table.clone());
            let lookup = app::query_axis(&cfg, &table, &rating, omega, n, b)?;
            app::print_axis_lookup(&lookup);
            if !lookup.is_computable() {
                return Ok(ExitCode::from(2));
            }
        }
        Commands::BuildCover { source, output } => {
            let output = output.unwrap_or_else(|| cfg.paths.cover_table.clone());
            let report = app::build_cover(&cfg, &source, &output)?;
            app::print_cover_report(&report);
            println!("저장: {}", output.display());
        }
        Commands::Cover {
            exposure,
            cement,
            grade,
            table,
        } => {
            let table = table.unwrap_or_else(|| cfg.paths.cover_table.clone());
            let lookup = app::query_cover(&table, &exposure, &cement, &grade)?;
            match &lookup {
                CoverLookup::Cover(mm) => println!("최소 피복 = {mm} mm"),
                CoverLookup::NotTabulated { .. } => {
                    println!("{lookup}");
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Commands::Interactive { table } => {
            let table = table.unwrap_or_else(|| cfg.paths.axis_table.clone());
            app::interactive(&cfg, &table)?;
        }
        Commands::InitConfig => {}
    }
    Ok(ExitCode::SUCCESS)
}
