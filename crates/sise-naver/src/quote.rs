//! 현재가 페이지 수집.
//!
//! `/item/sise.nhn` 한 페이지에서 [`StockQuote`] 스냅샷을 만듭니다.

use scraper::Html;
use tracing::debug;

use sise_core::{Market, StockCode, StockQuote};

use crate::client::{NaverClient, Page};
use crate::error::{NaverError, Result};
use crate::parse;

impl NaverClient {
    /// 종목 하나의 현재가 스냅샷을 수집합니다.
    ///
    /// 장 마감 후에는 당일 종가 기준 스냅샷이 됩니다. 존재하지 않는
    /// 코드는 [`NaverError::SymbolNotFound`]입니다.
    pub async fn quote(&self, code: &StockCode) -> Result<StockQuote> {
        let url = self.quote_url(code.as_str());
        let page = self.fetch_html(&url).await?;
        let Page::Content(html) = page else {
            return Err(NaverError::SymbolNotFound {
                code: code.to_string(),
            });
        };

        let quote = parse_quote(&html, code)?;
        debug!(code = %code, name = %quote.name, "quote fetched");
        Ok(quote)
    }
}

/// 현재가 페이지 HTML에서 스냅샷을 추출합니다.
///
/// 시장/순위 블록(`div.first`)과 가격 블록(`div.rate_info`)이 없으면
/// 종목 페이지가 아니므로 코드가 잘못된 것으로 봅니다. 블록은 있는데
/// 필수 셀이 깨져 있으면 파싱 오류입니다. PER과 외국인 소진율 란은
/// 종목에 따라 아예 없을 수 있어 없으면 값 없음으로 둡니다.
pub(crate) fn parse_quote(html: &str, code: &StockCode) -> Result<StockQuote> {
    let document = Html::parse_document(html);

    // 시장 구분과 순위: div.first 두 번째 tr의 첫 td. 예) "코스피 26위"
    let first_tr = parse::selector("div.first tr")?;
    let td = parse::selector("td")?;
    let info = document
        .select(&first_tr)
        .nth(1)
        .and_then(|tr| tr.select(&td).next())
        .map(|cell| cell.text().collect::<String>())
        .ok_or_else(|| NaverError::SymbolNotFound {
            code: code.to_string(),
        })?;

    let mut tokens = info.split_whitespace();
    let market = tokens
        .next()
        .and_then(Market::from_korean)
        .ok_or_else(|| NaverError::Parse(format!("unrecognized market label in `{info}`")))?;
    let rank = tokens
        .next()
        .and_then(parse::parse_int)
        .ok_or_else(|| NaverError::Parse(format!("missing market rank in `{info}`")))?
        as u32;

    // 기준 시각: em.date의 앞 두 토큰. 예) "2020.01.03 16:41 장마감"
    let date = parse::selector("em.date")?;
    let timestamp = document
        .select(&date)
        .next()
        .map(|el| {
            el.text()
                .collect::<String>()
                .split_whitespace()
                .take(2)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .ok_or_else(|| NaverError::Parse("timestamp element missing".into()))?;

    // 시/고/저/거래량: 첫 번째 테이블의 span.blind 셀.
    // 순서는 페이지 고정: [1] 고가, [3] 거래량, [4] 시가, [5] 저가.
    let table = parse::selector("table")?;
    let blind = parse::selector("span.blind")?;
    let cells: Vec<String> = document
        .select(&table)
        .next()
        .map(|t| {
            t.select(&blind)
                .map(|s| s.text().collect::<String>())
                .collect()
        })
        .unwrap_or_default();
    if cells.len() < 6 {
        return Err(NaverError::Parse(format!(
            "expected 6 price cells, found {}",
            cells.len()
        )));
    }

    let high = parse::parse_int(&cells[1]);
    let volume = parse::parse_int(&cells[3])
        .ok_or_else(|| NaverError::Parse(format!("bad volume cell `{}`", cells[3])))?;
    let open = parse::parse_int(&cells[4]);
    let low = parse::parse_int(&cells[5]);

    // 종목명과 현재가: div.rate_info.
    let rate_info = parse::selector("div.rate_info")?;
    let dt = parse::selector("dt")?;
    let info_block = document
        .select(&rate_info)
        .next()
        .ok_or_else(|| NaverError::SymbolNotFound {
            code: code.to_string(),
        })?;
    let name = info_block
        .select(&dt)
        .next()
        .map(|el| el.text().collect::<String>().trim().replace(';', ""))
        .ok_or_else(|| NaverError::Parse("stock name element missing".into()))?;
    let price = info_block
        .select(&blind)
        .next()
        .and_then(|el| parse::parse_int(&el.text().collect::<String>()))
        .ok_or_else(|| NaverError::Parse("current price cell missing".into()))?;

    // PER (WISEfn 란): 없는 종목이 있어 값 없음을 허용.
    let per_em = parse::selector("table.per_table tbody td em")?;
    let per = document
        .select(&per_em)
        .next()
        .and_then(|el| parse::parse_decimal(&el.text().collect::<String>()));

    // 외국인 소진율: table.lwidth의 세 번째 td.
    let lwidth_td = parse::selector("table.lwidth td")?;
    let foreign_rate = document
        .select(&lwidth_td)
        .nth(2)
        .and_then(|el| parse::parse_decimal(&el.text().collect::<String>()));

    Ok(StockQuote {
        code: code.to_string(),
        name,
        market,
        rank,
        timestamp,
        price,
        open,
        high,
        low,
        volume,
        per,
        foreign_rate,
    })
}
