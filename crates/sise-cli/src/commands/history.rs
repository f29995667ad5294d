//! 일별 시세 이력 조회 기능.

use anyhow::Result;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sise_core::{
    group_digits, CoreError, HistoryColumn, Period, PriceHistory, Selection, StockCode,
};
use sise_naver::{HistoryRange, NaverClient};

use crate::output::{self, Align, OutputFormat};

/// 이력 조회 설정.
#[derive(Debug)]
pub struct HistoryConfig {
    /// 종목 코드
    pub code: String,
    /// 시작 날짜
    pub from: Option<String>,
    /// 종료 날짜 (기본: 오늘)
    pub to: Option<String>,
    /// 최신 행 개수
    pub count: Option<usize>,
    /// 최근 기간 (예: 30d, 6m)
    pub last: Option<String>,
    /// 날짜 구간을 wave 단위로 동시 수집
    pub concurrent: bool,
    /// 정렬 컬럼
    pub sort: Option<String>,
    /// 오름차순 정렬 여부
    pub ascending: bool,
    /// 최신순 상위 n개만
    pub top: Option<usize>,
    /// 가장 오래된 n개만
    pub bottom: Option<usize>,
    /// 차트로 그릴 컬럼
    pub chart: Option<String>,
    /// 차트 높이 (줄 수)
    pub chart_height: usize,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 일별 시세 이력 조회.
pub async fn run_history(client: &NaverClient, config: HistoryConfig) -> Result<()> {
    let code = StockCode::new(&config.code)?;
    let range = resolve_range(client, &config)?;

    if config.concurrent && matches!(range, HistoryRange::Count(_)) {
        anyhow::bail!("--concurrent requires a date range. Use --from/--to or --last");
    }

    // 진행률 표시줄
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Fetching daily prices for {}...", code));

    let fetched = match range {
        HistoryRange::Dates { start, end } if config.concurrent => {
            client.history_concurrent(&code, start, end).await?
        }
        _ => client.history(&code, &range).await?,
    };

    pb.finish_with_message(format!("Fetched {} rows for {}", fetched.len(), code));
    info!(code = %code, rows = fetched.len(), "History fetched");

    // 행 추리기: --top / --bottom은 날짜 내림차순 기준이다.
    let selection = match (config.top, config.bottom) {
        (Some(_), Some(_)) => anyhow::bail!("--top and --bottom are mutually exclusive"),
        (Some(n), None) => Selection::Top(n),
        (None, Some(n)) => Selection::Bottom(n),
        (None, None) => Selection::All,
    };
    let mut history = fetched.select(selection);

    if let Some(ref column) = config.sort {
        let column: HistoryColumn = column.parse()?;
        history.sort_by(column, config.ascending);
    }

    // 차트는 출력 형식보다 우선한다.
    if let Some(ref column_name) = config.chart {
        let column: HistoryColumn = column_name.parse()?;
        let values = history.values(column)?;
        let chart = output::render_chart(
            &format!("{} {}", code, column_name.to_lowercase()),
            &history.dates(),
            &values,
            config.chart_height,
        );
        return output::write_output(&chart, config.output.as_deref());
    }

    let content = match config.format {
        OutputFormat::Table => history_table(&history),
        OutputFormat::Csv => history_csv(&history),
        OutputFormat::Json => output::to_json(&history)?,
    };
    output::write_output(&content, config.output.as_deref())
}

/// 조회 구간 결정. `--count`, `--last`, `--from/--to` 중 하나만 쓸 수 있습니다.
fn resolve_range(client: &NaverClient, config: &HistoryConfig) -> Result<HistoryRange> {
    let modes = [
        config.count.is_some(),
        config.last.is_some(),
        config.from.is_some() || config.to.is_some(),
    ];
    if modes.iter().filter(|&&used| used).count() > 1 {
        anyhow::bail!("Use only one of --count, --last, or --from/--to");
    }

    if let Some(n) = config.count {
        return Ok(HistoryRange::count(n)?);
    }
    if let Some(ref period) = config.last {
        let period: Period = period.parse()?;
        return Ok(HistoryRange::last(period, client.today()));
    }
    if let Some(ref from) = config.from {
        let start = parse_cli_date(from)?;
        let end = match config.to {
            Some(ref to) => parse_cli_date(to)?,
            None => client.today(),
        };
        return Ok(HistoryRange::dates(start, end)?);
    }
    if config.to.is_some() {
        anyhow::bail!("--to needs --from to make a date range");
    }
    anyhow::bail!("No range given. Use --count, --last, or --from/--to")
}

/// CLI 날짜 인자 파싱. `YYYY-MM-DD`와 `YYYYMMDD`를 받습니다.
pub fn parse_cli_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
        .map_err(|_| {
            CoreError::InvalidDate {
                input: s.to_string(),
            }
            .into()
        })
}

/// 테이블 형식 출력.
fn history_table(history: &PriceHistory) -> String {
    let headers = [
        "Date", "Open", "High", "Low", "Close", "HL_Gap", "Change", "Volume",
    ];
    let aligns = [
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Right,
    ];
    let rows: Vec<Vec<String>> = history
        .rows()
        .iter()
        .map(|row| {
            vec![
                row.date.format("%Y-%m-%d").to_string(),
                group_digits(row.open),
                group_digits(row.high),
                group_digits(row.low),
                group_digits(row.close),
                format!("{:.2}", row.hl_gap()),
                format!("{:.2}", row.change()),
                group_digits(row.volume),
            ]
        })
        .collect();
    output::format_table(&headers, &aligns, &rows)
}

/// CSV 형식 출력.
fn history_csv(history: &PriceHistory) -> String {
    let headers = [
        "date", "open", "high", "low", "close", "hl_gap", "change", "volume",
    ];
    let rows: Vec<Vec<String>> = history
        .rows()
        .iter()
        .map(|row| {
            vec![
                row.date.format("%Y-%m-%d").to_string(),
                row.open.to_string(),
                row.high.to_string(),
                row.low.to_string(),
                row.close.to_string(),
                format!("{:.2}", row.hl_gap()),
                format!("{:.2}", row.change()),
                row.volume.to_string(),
            ]
        })
        .collect();
    output::format_csv(&headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sise_core::DailyPrice;

    fn base_config() -> HistoryConfig {
        HistoryConfig {
            code: "005930".to_string(),
            from: None,
            to: None,
            count: None,
            last: None,
            concurrent: false,
            sort: None,
            ascending: false,
            top: None,
            bottom: None,
            chart: None,
            chart_height: 15,
            format: OutputFormat::Table,
            output: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_history() -> PriceHistory {
        PriceHistory::from_rows(
            "005930",
            vec![
                DailyPrice {
                    date: date(2020, 1, 3),
                    open: 56_000,
                    high: 56_600,
                    low: 54_800,
                    close: 55_500,
                    volume: 15_422_255,
                },
                DailyPrice {
                    date: date(2020, 1, 2),
                    open: 55_500,
                    high: 56_000,
                    low: 55_000,
                    close: 55_200,
                    volume: 12_993_228,
                },
            ],
        )
    }

    #[test]
    fn test_parse_cli_date_accepts_both_forms() {
        assert_eq!(parse_cli_date("2020-01-03").unwrap(), date(2020, 1, 3));
        assert_eq!(parse_cli_date("20200103").unwrap(), date(2020, 1, 3));
        assert_eq!(parse_cli_date(" 2020-01-03 ").unwrap(), date(2020, 1, 3));
    }

    #[test]
    fn test_parse_cli_date_rejects_bad_input() {
        for bad in ["2020-13-01", "2020/01/03", "0103", "not-a-date"] {
            assert!(parse_cli_date(bad).is_err(), "should reject {:?}", bad);
        }
    }

    #[test]
    fn test_resolve_range_requires_exactly_one_mode() {
        let client = NaverClient::new();

        assert!(resolve_range(&client, &base_config()).is_err());

        let mixed = HistoryConfig {
            count: Some(5),
            last: Some("30d".to_string()),
            ..base_config()
        };
        assert!(resolve_range(&client, &mixed).is_err());

        let to_only = HistoryConfig {
            to: Some("2020-01-03".to_string()),
            ..base_config()
        };
        assert!(resolve_range(&client, &to_only).is_err());
    }

    #[test]
    fn test_resolve_range_builds_each_mode() {
        let client = NaverClient::new();

        let counted = HistoryConfig {
            count: Some(15),
            ..base_config()
        };
        assert_eq!(
            resolve_range(&client, &counted).unwrap(),
            HistoryRange::Count(15)
        );

        let dated = HistoryConfig {
            from: Some("2020-01-02".to_string()),
            to: Some("2020-01-31".to_string()),
            ..base_config()
        };
        assert_eq!(
            resolve_range(&client, &dated).unwrap(),
            HistoryRange::Dates {
                start: date(2020, 1, 2),
                end: date(2020, 1, 31),
            }
        );

        // --to를 생략하면 오늘로 끝난다.
        let open_ended = HistoryConfig {
            from: Some("2020-01-02".to_string()),
            ..base_config()
        };
        match resolve_range(&client, &open_ended).unwrap() {
            HistoryRange::Dates { start, end } => {
                assert_eq!(start, date(2020, 1, 2));
                assert_eq!(end, client.today());
            }
            other => panic!("expected date range, got {:?}", other),
        }
    }

    #[test]
    fn test_history_table_layout() {
        let text = history_table(&sample_history());
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Date"));
        assert!(lines[0].trim_end().ends_with("Volume"));
        assert!(lines[2].starts_with("2020-01-03"));
        assert!(lines[2].contains("15,422,255"));
        assert!(text.ends_with("Total: 2 rows"));
    }

    #[test]
    fn test_history_csv_keeps_plain_numbers() {
        let csv = history_csv(&sample_history());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,open,high,low,close,hl_gap,change,volume");
        assert!(lines[1].starts_with("2020-01-03,56000,56600,54800,55500,"));
        assert!(lines[1].ends_with(",15422255"));
    }
}
