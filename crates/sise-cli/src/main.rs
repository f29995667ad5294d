//! 네이버 금융 시세 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 삼성전자 현재가
//! sise quote 005930
//!
//! # 최근 30일 일별 시세
//! sise history 005930 --last 30d
//!
//! # 날짜 구간을 wave 단위 동시 수집으로
//! sise history 005930 -f 2020-01-01 -t 2020-03-31 --concurrent
//!
//! # 최근 6개월 종가 차트
//! sise history 005930 --last 6m --chart close
//!
//! # 코스닥 시가총액 상위 30개
//! sise capture -m KOSDAQ -t 30
//!
//! # 요약 API 응답을 JSON으로
//! sise summary 005930 -f json
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;
mod output;

use commands::capture::{run_capture, CaptureConfig};
use commands::history::{run_history, HistoryConfig};
use commands::quote::{run_quote, QuoteConfig};
use commands::summary::{run_summary, SummaryConfig};
use output::OutputFormat;
use sise_core::{init_logging, AppConfig, LogConfig, LogFormat};
use sise_naver::NaverClient;

#[derive(Parser)]
#[command(name = "sise")]
#[command(about = "네이버 금융 기반 국내 주식 시세 조회 도구", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 현재가 스냅샷 조회
    Quote {
        /// 종목 코드 (예: 005930)
        code: String,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 일별 시세 이력 조회
    History {
        /// 종목 코드 (예: 005930)
        code: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD, 기본: 오늘)
        #[arg(short = 't', long)]
        to: Option<String>,

        /// 최신 행 개수
        #[arg(short, long)]
        count: Option<usize>,

        /// 최근 기간 (예: 30d, 2w, 6m, 1y)
        #[arg(short, long)]
        last: Option<String>,

        /// 날짜 구간을 wave 단위로 동시 수집
        #[arg(long, default_value = "false")]
        concurrent: bool,

        /// 정렬 컬럼 (date, open, high, low, close, volume, hl_gap, change)
        #[arg(short, long)]
        sort: Option<String>,

        /// 오름차순 정렬
        #[arg(long, default_value = "false")]
        ascending: bool,

        /// 최신순 상위 n개만
        #[arg(long)]
        top: Option<usize>,

        /// 가장 오래된 n개만
        #[arg(long)]
        bottom: Option<usize>,

        /// 컬럼 차트 출력 (예: close)
        #[arg(long)]
        chart: Option<String>,

        /// 차트 높이 (줄 수)
        #[arg(long, default_value = "15")]
        chart_height: usize,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 시장 순위 스냅샷 조회 (KOSPI/KOSDAQ)
    Capture {
        /// 시장 (KOSPI, KOSDAQ)
        #[arg(short, long, default_value = "KOSPI")]
        market: String,

        /// 상위 n개 종목만
        #[arg(short, long)]
        top: Option<usize>,

        /// 정렬 컬럼 (rank, price, change, market_cap, volume, per, roe)
        #[arg(short, long)]
        sort: Option<String>,

        /// 오름차순 정렬
        #[arg(long, default_value = "false")]
        ascending: bool,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 종목 요약/실시간 API 조회
    Summary {
        /// 종목 코드 (예: 005930)
        code: String,

        /// 실시간 폴링 API 사용
        #[arg(long, default_value = "false")]
        realtime: bool,

        /// 출력 형식 (table, csv, json)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 로깅 초기화: RUST_LOG가 설정돼 있으면 --log-level보다 우선한다.
    init_logging(LogConfig {
        level: format!("sise={0},sise_core={0},sise_naver={0}", cli.log_level),
        format: LogFormat::Compact,
        with_target: false,
    })?;

    // 설정 로드 (SISE__FETCH__* 환경 변수)
    let app_config = AppConfig::from_env()?;
    let client = NaverClient::with_config(app_config.fetch);

    match cli.command {
        Commands::Quote {
            code,
            format,
            output,
        } => {
            let config = QuoteConfig {
                code,
                format: OutputFormat::parse(&format)?,
                output,
            };
            if let Err(e) = run_quote(&client, config).await {
                error!("현재가 조회 실패: {}", e);
                return Err(e.into());
            }
        }

        Commands::History {
            code,
            from,
            to,
            count,
            last,
            concurrent,
            sort,
            ascending,
            top,
            bottom,
            chart,
            chart_height,
            format,
            output,
        } => {
            let config = HistoryConfig {
                code,
                from,
                to,
                count,
                last,
                concurrent,
                sort,
                ascending,
                top,
                bottom,
                chart,
                chart_height,
                format: OutputFormat::parse(&format)?,
                output,
            };
            if let Err(e) = run_history(&client, config).await {
                error!("일별 시세 조회 실패: {}", e);
                return Err(e.into());
            }
        }

        Commands::Capture {
            market,
            top,
            sort,
            ascending,
            format,
            output,
        } => {
            let config = CaptureConfig {
                market,
                top,
                sort,
                ascending,
                format: OutputFormat::parse(&format)?,
                output,
            };
            if let Err(e) = run_capture(&client, config).await {
                error!("시장 순위 조회 실패: {}", e);
                return Err(e.into());
            }
        }

        Commands::Summary {
            code,
            realtime,
            format,
            output,
        } => {
            let config = SummaryConfig {
                code,
                realtime,
                format: OutputFormat::parse(&format)?,
                output,
            };
            if let Err(e) = run_summary(&client, config).await {
                error!("요약 조회 실패: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
