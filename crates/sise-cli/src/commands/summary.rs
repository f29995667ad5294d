//! 종목 요약/실시간 API 조회 기능.

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;

use sise_core::{group_digits, StockCode};
use sise_naver::{ItemSummary, NaverClient, RealtimeItem};

use crate::output::{self, OutputFormat};

/// 요약 조회 설정.
#[derive(Debug)]
pub struct SummaryConfig {
    /// 종목 코드
    pub code: String,
    /// 실시간 폴링 API 사용 여부
    pub realtime: bool,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 종목 요약 조회.
pub async fn run_summary(client: &NaverClient, config: SummaryConfig) -> Result<()> {
    let code = StockCode::new(&config.code)?;

    let content = if config.realtime {
        info!(code = %code, "Fetching realtime snapshot...");
        let item = client.realtime(&code).await?;
        match config.format {
            OutputFormat::Table => realtime_table(&item),
            OutputFormat::Csv => realtime_csv(&item),
            OutputFormat::Json => output::to_json(&item)?,
        }
    } else {
        info!(code = %code, "Fetching item summary...");
        let summary = client.summary(&code).await?;
        match config.format {
            OutputFormat::Table => summary_table(&code, &summary),
            OutputFormat::Csv => summary_csv(&code, &summary),
            OutputFormat::Json => output::to_json(&summary)?,
        }
    };
    output::write_output(&content, config.output.as_deref())
}

/// 요약 API 응답의 키-값 출력.
fn summary_table(code: &StockCode, summary: &ItemSummary) -> String {
    let fmt_ratio =
        |v: Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
    let mut text = String::new();
    text.push_str(&format!("[{code}]\n"));
    text.push_str(&format!("Price:        {}\n", group_digits(summary.now)));
    text.push_str(&format!("Diff:         {}\n", group_digits(summary.diff)));
    text.push_str(&format!("Rate:         {:.2}%\n", summary.rate));
    text.push_str(&format!("Volume:       {}\n", group_digits(summary.quant)));
    text.push_str(&format!("High:         {}\n", group_digits(summary.high)));
    text.push_str(&format!("Low:          {}\n", group_digits(summary.low)));
    text.push_str(&format!(
        "Market Cap:   {}억원\n",
        group_digits(summary.market_sum)
    ));
    text.push_str(&format!("PER:          {}\n", fmt_ratio(summary.per)));
    text.push_str(&format!("EPS:          {}\n", fmt_ratio(summary.eps)));
    text.push_str(&format!("PBR:          {}", fmt_ratio(summary.pbr)));
    text
}

fn summary_csv(code: &StockCode, summary: &ItemSummary) -> String {
    let headers = [
        "code",
        "price",
        "diff",
        "rate",
        "volume",
        "high",
        "low",
        "market_sum",
        "per",
        "eps",
        "pbr",
    ];
    let fmt_ratio = |v: Option<Decimal>| v.map(|d| d.to_string()).unwrap_or_default();
    let row = vec![
        code.to_string(),
        summary.now.to_string(),
        summary.diff.to_string(),
        format!("{:.2}", summary.rate),
        summary.quant.to_string(),
        summary.high.to_string(),
        summary.low.to_string(),
        summary.market_sum.to_string(),
        fmt_ratio(summary.per),
        fmt_ratio(summary.eps),
        fmt_ratio(summary.pbr),
    ];
    output::format_csv(&headers, &[row])
}

/// 실시간 폴링 API 응답의 키-값 출력.
fn realtime_table(item: &RealtimeItem) -> String {
    let fmt_opt = |v: Option<i64>| v.map(group_digits).unwrap_or_else(|| "-".to_string());
    let mut text = String::new();
    text.push_str(&format!("[{}] ({})\n", item.nm, item.cd));
    text.push_str(&format!(
        "Status:       {}\n",
        item.ms.as_deref().unwrap_or("-")
    ));
    text.push_str(&format!("Price:        {}\n", group_digits(item.nv)));
    text.push_str(&format!("Diff:         {}\n", group_digits(item.cv)));
    text.push_str(&format!("Rate:         {:.2}%\n", item.cr));
    text.push_str(&format!("Prev Close:   {}\n", fmt_opt(item.pcv)));
    text.push_str(&format!("Open:         {}\n", fmt_opt(item.ov)));
    text.push_str(&format!("High:         {}\n", fmt_opt(item.hv)));
    text.push_str(&format!("Low:          {}\n", fmt_opt(item.lv)));
    text.push_str(&format!("Volume:       {}\n", fmt_opt(item.aq)));
    text.push_str(&format!("Value:        {}", fmt_opt(item.aa)));
    text
}

fn realtime_csv(item: &RealtimeItem) -> String {
    let headers = [
        "code",
        "name",
        "status",
        "price",
        "diff",
        "rate",
        "prev_close",
        "open",
        "high",
        "low",
        "volume",
        "value",
    ];
    let fmt_opt = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
    let row = vec![
        item.cd.clone(),
        item.nm.clone(),
        item.ms.clone().unwrap_or_default(),
        item.nv.to_string(),
        item.cv.to_string(),
        format!("{:.2}", item.cr),
        fmt_opt(item.pcv),
        fmt_opt(item.ov),
        fmt_opt(item.hv),
        fmt_opt(item.lv),
        fmt_opt(item.aq),
        fmt_opt(item.aa),
    ];
    output::format_csv(&headers, &[row])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item_summary() -> ItemSummary {
        ItemSummary {
            market_sum: 3_312_274,
            now: 55_500,
            diff: -500,
            rate: dec!(-0.89),
            quant: 15_422_255,
            high: 56_600,
            low: 54_800,
            per: Some(dec!(8.77)),
            eps: Some(dec!(6461)),
            pbr: None,
        }
    }

    fn realtime_item() -> RealtimeItem {
        RealtimeItem {
            cd: "005930".to_string(),
            nm: "삼성전자".to_string(),
            nv: 55_500,
            cv: -500,
            cr: dec!(-0.89),
            pcv: Some(56_000),
            ov: Some(56_000),
            hv: Some(56_600),
            lv: Some(54_800),
            aq: Some(15_422_255),
            aa: None,
            ms: Some("CLOSE".to_string()),
        }
    }

    #[test]
    fn test_summary_table_marks_missing_ratios() {
        let code = StockCode::new("005930").unwrap();
        let text = summary_table(&code, &item_summary());

        assert!(text.starts_with("[005930]"));
        assert!(text.contains("Price:        55,500"));
        assert!(text.contains("Market Cap:   3,312,274억원"));
        assert!(text.contains("PER:          8.77"));
        assert!(text.ends_with("PBR:          -"));
    }

    #[test]
    fn test_summary_csv_single_row() {
        let code = StockCode::new("005930").unwrap();
        let csv = summary_csv(&code, &item_summary());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("005930,55500,-500,-0.89,"));
        assert!(lines[1].ends_with(",8.77,6461,"));
    }

    #[test]
    fn test_realtime_table_uses_market_status() {
        let text = realtime_table(&realtime_item());

        assert!(text.starts_with("[삼성전자] (005930)"));
        assert!(text.contains("Status:       CLOSE"));
        assert!(text.contains("Volume:       15,422,255"));
        assert!(text.ends_with("Value:        -"));
    }

    #[test]
    fn test_realtime_csv_single_row() {
        let csv = realtime_csv(&realtime_item());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("005930,삼성전자,CLOSE,55500,-500,-0.89,"));
    }
}
