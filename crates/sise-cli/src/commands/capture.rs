//! 시장 순위 스냅샷 조회 기능.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::info;

use sise_core::{group_digits, Market, MarketColumn, MarketSnapshot};
use sise_naver::NaverClient;

use crate::output::{self, Align, OutputFormat};

/// 시장 순위 조회 설정.
#[derive(Debug)]
pub struct CaptureConfig {
    /// 시장 이름 (KOSPI, KOSDAQ)
    pub market: String,
    /// 상위 n개 종목만
    pub top: Option<usize>,
    /// 정렬 컬럼
    pub sort: Option<String>,
    /// 오름차순 정렬 여부
    pub ascending: bool,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 시장 순위 스냅샷 조회.
pub async fn run_capture(client: &NaverClient, config: CaptureConfig) -> Result<()> {
    let market: Market = config.market.parse()?;

    // 진행률 표시줄
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Capturing {market} ranking..."));

    let mut snapshot = client.capture(market, config.top).await?;

    pb.finish_with_message(format!("Captured {} stocks from {market}", snapshot.len()));
    info!(%market, rows = snapshot.len(), "Ranking captured");

    if let Some(ref column) = config.sort {
        let column: MarketColumn = column.parse()?;
        snapshot.sort_by(column, config.ascending);
    }

    let content = match config.format {
        OutputFormat::Table => capture_table(&snapshot),
        OutputFormat::Csv => capture_csv(&snapshot),
        OutputFormat::Json => output::to_json(&snapshot)?,
    };
    output::write_output(&content, config.output.as_deref())
}

/// 테이블 형식 출력. 페이지처럼 PER/ROE가 없는 종목은 `N/A`로 둡니다.
fn capture_table(snapshot: &MarketSnapshot) -> String {
    let headers = [
        "Rank",
        "Code",
        "Name",
        "Price",
        "Change",
        "MarketCap",
        "Volume",
        "PER",
        "ROE",
    ];
    let aligns = [
        Align::Right,
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ];
    let fmt_ratio =
        |v: Option<Decimal>| v.map(|d| format!("{d:.2}")).unwrap_or_else(|| "N/A".to_string());
    let rows: Vec<Vec<String>> = snapshot
        .rows()
        .iter()
        .map(|row| {
            vec![
                row.rank.to_string(),
                row.code.clone(),
                row.name.clone(),
                group_digits(row.price),
                format!("{:.2}", row.change),
                group_digits(row.market_cap),
                group_digits(row.volume),
                fmt_ratio(row.per),
                fmt_ratio(row.roe),
            ]
        })
        .collect();
    output::format_table(&headers, &aligns, &rows)
}

/// CSV 형식 출력. 없는 PER/ROE는 빈 칸입니다.
fn capture_csv(snapshot: &MarketSnapshot) -> String {
    let headers = [
        "rank",
        "code",
        "name",
        "price",
        "change",
        "market_cap",
        "volume",
        "per",
        "roe",
    ];
    let fmt_ratio = |v: Option<Decimal>| v.map(|d| format!("{d:.2}")).unwrap_or_default();
    let rows: Vec<Vec<String>> = snapshot
        .rows()
        .iter()
        .map(|row| {
            vec![
                row.rank.to_string(),
                row.code.clone(),
                row.name.clone(),
                row.price.to_string(),
                format!("{:.2}", row.change),
                row.market_cap.to_string(),
                row.volume.to_string(),
                fmt_ratio(row.per),
                fmt_ratio(row.roe),
            ]
        })
        .collect();
    output::format_csv(&headers, &rows)
}
