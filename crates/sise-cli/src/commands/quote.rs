//! 현재가 스냅샷 조회 기능.

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::info;

use sise_core::{StockCode, StockQuote};
use sise_naver::NaverClient;

use crate::output::{self, OutputFormat};

/// 현재가 조회 설정.
#[derive(Debug)]
pub struct QuoteConfig {
    /// 종목 코드
    pub code: String,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 현재가 스냅샷 조회.
pub async fn run_quote(client: &NaverClient, config: QuoteConfig) -> Result<()> {
    let code = StockCode::new(&config.code)?;

    info!(code = %code, "Fetching quote...");
    let quote = client.quote(&code).await?;

    let content = match config.format {
        OutputFormat::Table => format_quote(&quote),
        OutputFormat::Csv => quote_csv(&quote),
        OutputFormat::Json => output::to_json(&quote)?,
    };

    output::write_output(&content, config.output.as_deref())
}

/// 사람이 읽는 현재가 출력.
///
/// 기본 필드는 [`StockQuote`]의 `Display` 그대로 쓰고, 비율 항목과
/// 장중 등락률을 뒤에 붙입니다.
fn format_quote(quote: &StockQuote) -> String {
    let mut text = quote.to_string();
    text.push('\n');

    if quote.has_intraday() {
        text.push_str(&format!("Change:       {:.2}%\n", quote.change()));
    }
    if let Some(per) = quote.per {
        text.push_str(&format!("PER:          {per:.2}\n"));
    }
    if let Some(rate) = quote.foreign_rate {
        text.push_str(&format!("Foreign Rate: {rate:.2}%\n"));
    }
    text.push_str(&format!("Market Rank:  {} in {}", quote.rank, quote.market));
    text
}

fn quote_csv(quote: &StockQuote) -> String {
    let headers = [
        "code",
        "name",
        "market",
        "rank",
        "timestamp",
        "price",
        "open",
        "high",
        "low",
        "volume",
        "per",
        "foreign_rate",
    ];
    let fmt_opt_price = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
    let fmt_opt_rate = |v: Option<Decimal>| v.map(|d| format!("{d:.2}")).unwrap_or_default();
    let row = vec![
        quote.code.clone(),
        quote.name.clone(),
        quote.market.to_string(),
        quote.rank.to_string(),
        quote.timestamp.clone(),
        quote.price.to_string(),
        fmt_opt_price(quote.open),
        fmt_opt_price(quote.high),
        fmt_opt_price(quote.low),
        quote.volume.to_string(),
        fmt_opt_rate(quote.per),
        fmt_opt_rate(quote.foreign_rate),
    ];
    output::format_csv(&headers, &[row])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sise_core::Market;

    fn quote() -> StockQuote {
        StockQuote {
            code: "005930".to_string(),
            name: "삼성전자".to_string(),
            market: Market::Kospi,
            rank: 1,
            timestamp: "2020.01.03 15:30".to_string(),
            price: 55_500,
            open: Some(56_000),
            high: Some(56_600),
            low: Some(54_800),
            volume: 15_422_255,
            per: Some(dec!(8.77)),
            foreign_rate: Some(dec!(56.41)),
        }
    }

    #[test]
    fn test_format_quote_appends_ratios() {
        let text = format_quote(&quote());
        assert!(text.contains("Price:        55,500"));
        assert!(text.contains("PER:          8.77"));
        assert!(text.contains("Foreign Rate: 56.41%"));
        assert!(text.ends_with("Market Rank:  1 in KOSPI"));
    }

    #[test]
    fn test_format_quote_omits_missing_ratios() {
        let q = StockQuote {
            per: None,
            foreign_rate: None,
            open: None,
            high: None,
            low: None,
            ..quote()
        };
        let text = format_quote(&q);
        assert!(!text.contains("PER:"));
        assert!(!text.contains("Foreign Rate:"));
        assert!(!text.contains("Change:"));
    }

    #[test]
    fn test_quote_csv_has_one_row() {
        let csv = quote_csv(&quote());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("code,name,market"));
        assert!(lines[1].starts_with("005930,삼성전자,KOSPI,1,"));
    }
}
