//! 출력 형식 처리.
//!
//! 표/CSV/JSON 렌더링과 파일 출력, 텍스트 차트를 담당합니다.

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;

use sise_core::domain::stats::reject_outliers;

/// 출력 형식.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, csv, json", s)),
        }
    }
}

/// 컬럼 정렬 방향. 숫자 컬럼은 오른쪽 정렬합니다.
#[derive(Debug, Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// 테이블 형식 출력.
///
/// 각 컬럼 너비는 헤더와 셀의 최대 길이로 잡습니다. 쉼표 구분 숫자는
/// 호출부에서 미리 넣어 두고, 여기서는 정렬만 맞춥니다.
pub fn format_table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut output = String::new();
    for (i, header) in headers.iter().enumerate() {
        if i > 0 {
            output.push_str("  ");
        }
        output.push_str(&pad(header, widths[i], Align::Left));
    }
    output.push('\n');
    output.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    output.push('\n');

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                output.push_str("  ");
            }
            let align = aligns.get(i).copied().unwrap_or(Align::Left);
            output.push_str(&pad(cell, widths[i], align));
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!("Total: {} rows", rows.len()));
    output
}

fn pad(s: &str, width: usize, align: Align) -> String {
    let len = s.chars().count();
    let fill = width.saturating_sub(len);
    match align {
        Align::Left => format!("{}{}", s, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), s),
    }
}

/// CSV 형식 출력.
pub fn format_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut output = String::new();
    output.push_str(&headers.join(","));
    output.push('\n');

    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape_csv(c)).collect();
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

/// CSV 이스케이프 (콤마나 따옴표 포함 시 따옴표로 감싸기).
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// JSON 형식 출력.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}

/// 파일 또는 stdout에 출력.
pub fn write_output(content: &str, output_path: Option<&str>) -> Result<()> {
    if let Some(path) = output_path {
        let mut file =
            File::create(path).with_context(|| format!("Failed to create output file: {path}"))?;
        file.write_all(content.as_bytes())
            .context("Failed to write to file")?;
        file.write_all(b"\n").context("Failed to write to file")?;
        info!("Output written to: {}", path);
    } else {
        println!("{content}");
    }
    Ok(())
}

/// 텍스트 시계열 차트.
///
/// 이력 값은 최신순으로 들어오므로 왼쪽이 과거가 되게 뒤집어 그립니다.
/// 세로 축 범위는 이상치를 뺀 값들로 잡아 급등락 하나가 차트 전체를
/// 누르지 않게 하고, 범위를 벗어난 점은 가장자리에 붙입니다.
pub fn render_chart(
    title: &str,
    dates: &[NaiveDate],
    values: &[Decimal],
    height: usize,
) -> String {
    const MAX_WIDTH: usize = 120;

    if values.is_empty() {
        return format!("{title}: (no data)");
    }

    let mut points: Vec<Decimal> = values.to_vec();
    points.reverse();
    let mut point_dates: Vec<NaiveDate> = dates.to_vec();
    point_dates.reverse();

    // 점이 너무 많으면 일정 간격으로 추린다.
    let stride = points.len().div_ceil(MAX_WIDTH);
    if stride > 1 {
        points = points.iter().copied().step_by(stride).collect();
        point_dates = point_dates.iter().copied().step_by(stride).collect();
    }

    let kept = reject_outliers(&points, dec!(2));
    let scale = if kept.is_empty() { &points } else { &kept };
    let lo = scale.iter().copied().min().unwrap_or(Decimal::ZERO);
    let hi = scale.iter().copied().max().unwrap_or(Decimal::ZERO);
    let span = if hi > lo { hi - lo } else { Decimal::ONE };

    let height = height.max(2);
    let label_width = format!("{hi:.2}").chars().count().max(format!("{lo:.2}").chars().count());

    let mut output = String::new();
    output.push_str(&format!(
        "{title} ({} ~ {})\n",
        point_dates.first().map(|d| d.to_string()).unwrap_or_default(),
        point_dates.last().map(|d| d.to_string()).unwrap_or_default(),
    ));

    for level in (0..height).rev() {
        let threshold = lo + span * Decimal::from(level as u32) / Decimal::from(height as u32 - 1);
        let label = if level == height - 1 {
            format!("{hi:.2}")
        } else if level == 0 {
            format!("{lo:.2}")
        } else {
            String::new()
        };
        output.push_str(&pad(&label, label_width, Align::Right));
        output.push_str(" ┤");
        for point in &points {
            let clamped = (*point).clamp(lo, hi);
            output.push(if clamped >= threshold { '█' } else { ' ' });
        }
        output.push('\n');
    }

    output.push_str(&" ".repeat(label_width));
    output.push_str(" └");
    output.push_str(&"─".repeat(points.len()));
    output
}
