//! 일별 시세 이력 수집.
//!
//! `/item/sise_day.nhn`은 최신순 10행짜리 페이지로 나뉘어 있습니다.
//! 순차 수집기와 wave 단위 동시 수집기를 제공하며, 둘 다 날짜 중복
//! 필터로 마지막 페이지 너머의 반복 응답을 걸러냅니다.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future;
use tracing::debug;

use sise_core::{CoreError, DailyPrice, Period, PriceHistory, StockCode};

use crate::client::{NaverClient, Page};
use crate::error::Result;
use crate::parse;

/// 일별 시세 페이지 하나에 실리는 행 수. 네이버 고정값입니다.
pub const ROWS_PER_PAGE: usize = 10;

/// 이력 수집 범위.
///
/// 생성자에서 검증을 끝내므로 이 값이 존재하면 범위는 항상 유효합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    /// 최신 n개 행
    Count(usize),
    /// 날짜 구간 (양 끝 포함)
    Dates { start: NaiveDate, end: NaiveDate },
}

impl HistoryRange {
    /// 최신 `n`개 행. `n`은 1 이상이어야 합니다.
    pub fn count(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(CoreError::InvalidCount.into());
        }
        Ok(Self::Count(n))
    }

    /// 날짜 구간. `start`가 `end`보다 늦으면 안 됩니다.
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end }.into());
        }
        Ok(Self::Dates { start, end })
    }

    /// 오늘로 끝나는 최근 기간.
    pub fn last(period: Period, today: NaiveDate) -> Self {
        Self::Dates {
            start: period.before(today),
            end: today,
        }
    }
}

/// 일별 시세 페이지 공급자.
///
/// 실제 구현은 [`NaverClient`]이고, 수집기 테스트에서는 준비해 둔
/// 페이지를 돌려주는 가짜 구현을 씁니다.
#[async_trait]
pub trait DailyPageSource: Send + Sync {
    /// 페이지 하나의 가격 행 (최신순). 페이지 범위를 벗어나면 `None`.
    async fn fetch_daily_page(
        &self,
        code: &StockCode,
        page: u32,
    ) -> Result<Option<Vec<DailyPrice>>>;
}

#[async_trait]
impl DailyPageSource for NaverClient {
    async fn fetch_daily_page(
        &self,
        code: &StockCode,
        page: u32,
    ) -> Result<Option<Vec<DailyPrice>>> {
        let url = self.daily_url(code.as_str(), page);
        match self.fetch_html(&url).await? {
            Page::End => Ok(None),
            Page::Content(html) => Ok(Some(parse::daily_rows(&html, code.as_str(), page)?)),
        }
    }
}

impl NaverClient {
    /// 일별 시세 이력을 순차적으로 수집합니다.
    ///
    /// 날짜 구간 모드에서 오늘이 구간에 들고 현재가 페이지에 당일
    /// 시세가 잡혀 있으면 오늘 행을 현재가 스냅샷으로 합성합니다.
    /// 일별 페이지가 오늘 행을 아직 싣지 않는 공백을 메우는 것으로,
    /// 마감 후 페이지에 같은 날짜가 실려도 중복 필터가 걸러냅니다.
    pub async fn history(&self, code: &StockCode, range: &HistoryRange) -> Result<PriceHistory> {
        let today_row = self.synthesize_today(code, range).await?;
        collect_history(self, code, range, today_row, self.config().request_delay()).await
    }

    /// 날짜 구간 이력을 wave 단위 동시 요청으로 수집합니다.
    ///
    /// 결과는 [`history`](Self::history)의 날짜 구간 모드와 같고,
    /// 페이지 요청만 설정된 상한 안에서 동시에 나갑니다.
    pub async fn history_concurrent(
        &self,
        code: &StockCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory> {
        let range = HistoryRange::dates(start, end)?;
        let today_row = self.synthesize_today(code, &range).await?;
        collect_history_concurrent(
            self,
            code,
            start,
            end,
            self.today(),
            today_row,
            self.wave_cap(),
            self.config().request_delay(),
        )
        .await
    }

    async fn synthesize_today(
        &self,
        code: &StockCode,
        range: &HistoryRange,
    ) -> Result<Option<DailyPrice>> {
        let HistoryRange::Dates { start, end } = range else {
            return Ok(None);
        };
        let today = self.today();
        if today < *start || today > *end {
            return Ok(None);
        }
        let quote = self.quote(code).await?;
        Ok(quote.to_daily(today))
    }
}

/// 순차 수집기. 1페이지부터 차례로 걸으며 범위를 채웁니다.
///
/// 네이버는 마지막 페이지를 넘어선 페이지 번호에 마지막 페이지를
/// 그대로 돌려주는 일이 있어, 새 날짜가 하나도 안 나온 페이지에서
/// 걷기를 멈춥니다. `today_row`는 날짜 구간 모드에서 구간에 들 때만
/// 반영됩니다.
pub async fn collect_history<S>(
    source: &S,
    code: &StockCode,
    range: &HistoryRange,
    today_row: Option<DailyPrice>,
    delay: Duration,
) -> Result<PriceHistory>
where
    S: DailyPageSource + ?Sized,
{
    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut rows: Vec<DailyPrice> = Vec::new();

    if let Some(row) = today_row {
        if fits_range(range, row.date) {
            seen.insert(row.date);
            rows.push(row);
        }
    }

    let wanted = match range {
        HistoryRange::Count(n) => *n,
        HistoryRange::Dates { .. } => usize::MAX,
    };

    let mut page = 1u32;
    'walk: loop {
        let Some(page_rows) = source.fetch_daily_page(code, page).await? else {
            break;
        };
        if page_rows.is_empty() {
            break;
        }

        let mut fresh = 0usize;
        for row in page_rows {
            if !seen.insert(row.date) {
                continue;
            }
            fresh += 1;

            if let HistoryRange::Dates { start, end } = range {
                if row.date > *end {
                    continue;
                }
                if row.date < *start {
                    break 'walk;
                }
            }

            rows.push(row);
            if rows.len() >= wanted {
                break 'walk;
            }
        }

        if fresh == 0 {
            break;
        }

        page += 1;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    debug!(code = %code, rows = rows.len(), "history collected");
    Ok(PriceHistory::from_rows(code.as_str(), rows))
}

/// 동시 수집기. 남은 날짜 수로 필요한 페이지를 어림잡아 한 wave로
/// 함께 요청하고, wave가 전부 끝난 뒤 다음 wave를 계획합니다.
///
/// wave 폭은 `[1, max_pages]`로 제한합니다. wave 안의 요청 하나라도
/// 실패하면 전체가 실패합니다. 수집된 행이 구간을 지나쳤거나 페이지
/// 끝을 만났으면 더 요청하지 않습니다.
#[allow(clippy::too_many_arguments)]
pub async fn collect_history_concurrent<S>(
    source: &S,
    code: &StockCode,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    today_row: Option<DailyPrice>,
    max_pages: usize,
    delay: Duration,
) -> Result<PriceHistory>
where
    S: DailyPageSource + ?Sized,
{
    let range = HistoryRange::dates(start, end)?;

    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut rows: Vec<DailyPrice> = Vec::new();

    if let Some(row) = today_row {
        if fits_range(&range, row.date) {
            seen.insert(row.date);
            rows.push(row);
        }
    }

    let max_pages = max_pages.max(1);
    let mut next_page: u32 = 1;
    let mut oldest: Option<NaiveDate> = None;
    let mut done = false;

    while !done {
        // 아직 안 본 가장 오래된 날짜부터 start까지 며칠 남았는지로
        // 필요한 페이지 수를 어림잡는다.
        let anchor = oldest.unwrap_or(today);
        let remaining_days = (anchor - start).num_days().max(0) as usize;
        let width = (remaining_days / ROWS_PER_PAGE + 1).clamp(1, max_pages);

        let pages: Vec<u32> = (next_page..next_page + width as u32).collect();
        debug!(code = %code, first = pages[0], count = width, "fetching history wave");

        let wave = pages
            .iter()
            .map(|&page| async move { (page, source.fetch_daily_page(code, page).await) });
        let results = future::join_all(wave).await;

        let mut fresh = 0usize;
        for (page, result) in results {
            match result? {
                None => {
                    debug!(code = %code, page, "end of pagination");
                    done = true;
                }
                Some(page_rows) => {
                    if page_rows.is_empty() {
                        done = true;
                        continue;
                    }
                    for row in page_rows {
                        if !seen.insert(row.date) {
                            continue;
                        }
                        fresh += 1;
                        oldest = Some(oldest.map_or(row.date, |o| o.min(row.date)));

                        if row.date < start {
                            done = true;
                            continue;
                        }
                        if row.date > end {
                            continue;
                        }
                        rows.push(row);
                    }
                }
            }
        }

        if fresh == 0 {
            break;
        }

        next_page += width as u32;
        if !done && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    debug!(code = %code, rows = rows.len(), "history collected concurrently");
    Ok(PriceHistory::from_rows(code.as_str(), rows))
}

fn fits_range(range: &HistoryRange, date: NaiveDate) -> bool {
    match range {
        HistoryRange::Count(_) => false,
        HistoryRange::Dates { start, end } => *start <= date && date <= *end,
    }
}
