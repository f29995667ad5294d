//! HTML 행 파싱.
//!
//! 일별 시세 페이지와 시장 순위 페이지에서 데이터 행을 추출합니다.
//! `scraper::Html`은 스레드 간 이동이 안 되므로 파싱은 전부 동기로
//! 수행하고, await 경계 너머로 문서를 들고 가지 않습니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use tracing::warn;

use sise_core::{DailyPrice, MarketRow};

use crate::error::{NaverError, Result};

/// 일별 시세 행의 `<span>` 개수. 날짜/종가/전일비/시가/고가/저가/거래량.
const DAILY_SPAN_COUNT: usize = 7;

/// 시장 순위 행의 최소 `td.number` 개수.
const MARKET_NUMBER_COUNT: usize = 10;

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| NaverError::Parse(format!("invalid selector `{css}`: {e}")))
}

/// 일별 시세 페이지에서 가격 행을 추출합니다.
///
/// 데이터 행은 `<span>`을 정확히 7개 가진 `<tr>`입니다. 스팬이 없는
/// 행(헤더, 구분선)은 조용히 건너뛰고, 스팬 수가 다르거나 숫자 파싱에
/// 실패한 행은 경고를 남기고 버립니다. 페이지에 데이터 행이 하나도
/// 없으면 빈 벡터가 반환되며, 호출부는 이를 순회 종료로 해석합니다.
pub fn daily_rows(html: &str, code: &str, page: u32) -> Result<Vec<DailyPrice>> {
    let document = Html::parse_document(html);
    let tr = selector("tr")?;
    let span = selector("span")?;

    let mut rows = Vec::new();
    for element in document.select(&tr) {
        let spans: Vec<String> = element
            .select(&span)
            .map(|s| s.text().collect::<String>().trim().to_string())
            .collect();

        if spans.is_empty() {
            continue;
        }
        if spans.len() != DAILY_SPAN_COUNT {
            warn!(code, page, cells = spans.len(), "malformed daily row dropped");
            continue;
        }

        match parse_daily_row(&spans) {
            Some(row) => rows.push(row),
            None => warn!(code, page, row = ?spans, "unparsable daily row dropped"),
        }
    }

    Ok(rows)
}

/// 스팬 7개짜리 행 하나를 [`DailyPrice`]로 변환합니다.
///
/// 인덱스 2(전일비)는 내림/오름 아이콘 텍스트가 섞여 있어 쓰지 않습니다.
fn parse_daily_row(spans: &[String]) -> Option<DailyPrice> {
    Some(DailyPrice {
        date: parse_date(&spans[0])?,
        close: parse_int(&spans[1])?,
        open: parse_int(&spans[3])?,
        high: parse_int(&spans[4])?,
        low: parse_int(&spans[5])?,
        volume: parse_int(&spans[6])?,
    })
}

/// 시장 순위 페이지에서 종목 행을 추출합니다.
///
/// 순위 테이블(`table.type_2`)의 각 `<tr>` 중 순위 셀(`td.no`)과
/// 종목 링크를 모두 가진 행만 데이터 행입니다. 구분선 행은 조용히
/// 건너뜁니다. 마지막 페이지를 넘어선 플레이스홀더 페이지는 데이터
/// 행이 없으므로 빈 벡터가 되고, 호출부는 이를 순회 종료로 해석합니다.
pub fn market_rows(html: &str) -> Result<Vec<MarketRow>> {
    let document = Html::parse_document(html);
    let tr = selector("table.type_2 tbody tr")?;
    let rank_td = selector("td.no")?;
    let link = selector("a")?;
    let number_td = selector("td.number")?;

    let mut rows = Vec::new();
    for element in document.select(&tr) {
        let rank = element
            .select(&rank_td)
            .next()
            .map(|td| td.text().collect::<String>());
        let Some(rank) = rank else {
            continue;
        };

        let Some(anchor) = element.select(&link).next() else {
            continue;
        };
        let name = anchor
            .text()
            .collect::<String>()
            .trim()
            .replace(';', "");
        let code = anchor
            .value()
            .attr("href")
            .and_then(extract_code)
            .unwrap_or_default();

        let nums: Vec<String> = element
            .select(&number_td)
            .map(|td| td.text().collect::<String>())
            .collect();
        if nums.len() < MARKET_NUMBER_COUNT {
            warn!(name, cells = nums.len(), "malformed market row dropped");
            continue;
        }

        match parse_market_row(rank, code, name.clone(), &nums) {
            Some(row) => rows.push(row),
            None => warn!(name, "unparsable market row dropped"),
        }
    }

    Ok(rows)
}

/// 순위 행의 숫자 셀을 [`MarketRow`]로 변환합니다.
///
/// `td.number` 순서: 현재가, 전일비, 등락률, 액면가, 시가총액(억원),
/// 상장주식수, 외국인비율, 거래량, PER, ROE. PER/ROE의 `N/A`는 값
/// 없음으로 취급합니다.
fn parse_market_row(rank: String, code: String, name: String, nums: &[String]) -> Option<MarketRow> {
    Some(MarketRow {
        rank: parse_int(&rank)? as u32,
        code,
        name,
        price: parse_int(&nums[0])?,
        change: parse_decimal(&nums[2])?,
        market_cap: parse_int(&nums[4])?,
        volume: parse_int(&nums[7])?,
        per: parse_optional_decimal(&nums[8]),
        roe: parse_optional_decimal(&nums[9]),
    })
}

/// 종목 링크의 `code=` 쿼리 파라미터에서 종목 코드를 꺼냅니다.
fn extract_code(href: &str) -> Option<String> {
    let (_, rest) = href.split_once("code=")?;
    let code: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

/// 쉼표가 섞인 정수 텍스트 파싱. 숫자와 부호만 남깁니다.
pub(crate) fn parse_int(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse().ok()
}

/// 쉼표/퍼센트 기호가 섞인 소수 텍스트 파싱.
pub(crate) fn parse_decimal(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse().ok()
}

/// `N/A`를 값 없음으로 취급하는 소수 파싱.
pub(crate) fn parse_optional_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.contains("N/A") {
        return None;
    }
    parse_decimal(text)
}

/// `2020.01.02` 형식 날짜 파싱.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y.%m.%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn daily_row_html(date: &str, values: [&str; 6]) -> String {
        let mut cells = format!("<td><span>{date}</span></td>");
        for value in values {
            cells.push_str(&format!("<td><span>{value}</span></td>"));
        }
        format!("<tr>{cells}</tr>")
    }

    #[test]
    fn test_daily_rows_extracts_seven_span_rows() {
        let html = format!(
            "<html><body><table>\
             <tr><th>날짜</th><th>종가</th></tr>\
             {}\
             {}\
             </table></body></html>",
            daily_row_html("2020.01.03", ["55,500", "하락 500", "56,000", "56,600", "54,900", "15,422,255"]),
            daily_row_html("2020.01.02", ["55,200", "상승 450", "55,500", "56,000", "55,000", "12,993,228"]),
        );

        let rows = daily_rows(&html, "005930", 1).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 1, 3).unwrap());
        assert_eq!(first.close, 55_500);
        assert_eq!(first.open, 56_000);
        assert_eq!(first.high, 56_600);
        assert_eq!(first.low, 54_900);
        assert_eq!(first.volume, 15_422_255);
    }

    #[test]
    fn test_daily_rows_drops_malformed_rows() {
        // 스팬 6개짜리 행은 버려져야 한다.
        let html = "<table>\
             <tr><td><span>2020.01.02</span></td><td><span>55,200</span></td>\
             <td><span>55,500</span></td><td><span>56,000</span></td>\
             <td><span>55,000</span></td><td><span>12,993,228</span></td></tr>\
             </table>";

        let rows = daily_rows(html, "005930", 1).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_daily_rows_empty_page_yields_no_rows() {
        let html = "<html><body><table><tr><th>날짜</th></tr></table></body></html>";
        let rows = daily_rows(html, "005930", 99).unwrap();
        assert!(rows.is_empty());
    }

    fn market_row_html(rank: u32, code: &str, name: &str, nums: [&str; 10]) -> String {
        let mut cells = format!(
            "<td class=\"no\">{rank}</td>\
             <td><a href=\"/item/main.nhn?code={code}\">{name}</a></td>"
        );
        for value in nums {
            cells.push_str(&format!("<td class=\"number\">{value}</td>"));
        }
        format!("<tr>{cells}</tr>")
    }

    #[test]
    fn test_market_rows_extracts_data_rows() {
        let html = format!(
            "<table class=\"type_2\"><tbody>\
             <tr><td colspan=\"10\"></td></tr>\
             {}\
             {}\
             </tbody></table>",
            market_row_html(
                1,
                "005930",
                "삼성전자",
                ["55,500", "500", "-0.89%", "100", "3,312,723", "5,969,783", "56.31", "15,422,255", "8.71", "8.69"],
            ),
            market_row_html(
                2,
                "000660",
                "SK하이닉스",
                ["94,900", "1,600", "+1.71%", "5,000", "690,854", "728,002", "50.21", "2,585,118", "31.21", "N/A"],
            ),
        );

        let rows = market_rows(&html).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.rank, 1);
        assert_eq!(first.code, "005930");
        assert_eq!(first.name, "삼성전자");
        assert_eq!(first.price, 55_500);
        assert_eq!(first.change, dec!(-0.89));
        assert_eq!(first.market_cap, 3_312_723);
        assert_eq!(first.volume, 15_422_255);
        assert_eq!(first.per, Some(dec!(8.71)));
        assert_eq!(first.roe, Some(dec!(8.69)));

        assert_eq!(rows[1].change, dec!(1.71));
        assert_eq!(rows[1].roe, None);
    }

    #[test]
    fn test_market_rows_placeholder_page_is_empty() {
        let html = "<table class=\"type_2\"><tbody>\
             <tr><td colspan=\"10\"></td></tr>\
             </tbody></table>";
        let rows = market_rows(html).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_extract_code_handles_extra_params() {
        assert_eq!(
            extract_code("/item/main.nhn?code=005930&page=1"),
            Some("005930".to_string())
        );
        assert_eq!(extract_code("/item/main.nhn"), None);
    }

    #[test]
    fn test_parse_int_strips_commas() {
        assert_eq!(parse_int("15,422,255"), Some(15_422_255));
        assert_eq!(parse_int(" -1,200 "), Some(-1_200));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("N/A"), None);
    }

    #[test]
    fn test_parse_decimal_strips_percent() {
        assert_eq!(parse_decimal("-0.89%"), Some(dec!(-0.89)));
        assert_eq!(parse_decimal("+1.71%"), Some(dec!(1.71)));
        assert_eq!(parse_decimal("-"), None);
    }

    #[test]
    fn test_parse_optional_decimal_treats_na_as_missing() {
        assert_eq!(parse_optional_decimal("N/A"), None);
        assert_eq!(parse_optional_decimal("8.71"), Some(dec!(8.71)));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2020.01.02"),
            NaiveDate::from_ymd_opt(2020, 1, 2)
        );
        assert_eq!(parse_date("garbage"), None);
    }
}
