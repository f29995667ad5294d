//! 시장 순위 스냅샷 수집.
//!
//! `/sise/sise_market_sum.nhn`을 1페이지부터 걸으며 시가총액 순위
//! 행을 모읍니다. 마지막 페이지 다음은 데이터 행이 없는 플레이스홀더
//! 페이지라서 그 지점에서 걷기가 끝납니다.

use tracing::{debug, info};

use sise_core::{CoreError, Market, MarketRow, MarketSnapshot};

use crate::client::{NaverClient, Page};
use crate::error::Result;
use crate::parse;

impl NaverClient {
    /// 시장 전체(또는 상위 `top`개) 순위 스냅샷을 수집합니다.
    ///
    /// `top`은 1 이상이어야 하며, `None`이면 플레이스홀더 페이지가
    /// 나올 때까지 전 종목을 수집합니다. 장 시작 전(08:00~09:00 KST)
    /// 에는 네이버가 빈 목록을 돌려줄 수 있습니다.
    pub async fn capture(&self, market: Market, top: Option<usize>) -> Result<MarketSnapshot> {
        if top == Some(0) {
            return Err(CoreError::InvalidCount.into());
        }

        let mut rows: Vec<MarketRow> = Vec::new();
        let mut page = 1u32;
        loop {
            let url = self.market_url(market, page);
            let Page::Content(html) = self.fetch_html(&url).await? else {
                break;
            };

            let page_rows = parse::market_rows(&html)?;
            if page_rows.is_empty() {
                break;
            }
            debug!(%market, page, rows = page_rows.len(), "market page parsed");
            rows.extend(page_rows);

            if let Some(top) = top {
                if rows.len() >= top {
                    rows.truncate(top);
                    break;
                }
            }

            page += 1;
            self.polite_delay().await;
        }

        info!(%market, rows = rows.len(), "market snapshot captured");
        Ok(MarketSnapshot::new(market, rows))
    }
}
