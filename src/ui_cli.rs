use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app::{print_axis_lookup, AppError};
use crate::axis::{codec, TableSlot};
use crate::config::Config;

/// 대화형 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AxisQuery,
    ListRatings,
    Reload,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu<R: BufRead>(input: &mut R) -> Result<MenuChoice, AppError> {
    println!("\n=== RC Fire Toolbox ===");
    println!("1) 최소 축거리 조회");
    println!("2) 내화 등급 목록");
    println!("3) 조회표 다시 읽기");
    println!("0) 종료");
    loop {
        let sel = read_line(input, "메뉴 선택: ")?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::AxisQuery),
            "2" => return Ok(MenuChoice::ListRatings),
            "3" => return Ok(MenuChoice::Reload),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

/// 표준 입력으로 도는 대화형 조회 루프.
pub fn run_axis_queries(cfg: &Config, slot: &TableSlot, table_path: &Path) -> Result<(), AppError> {
    let stdin = io::stdin();
    run_axis_queries_with(cfg, slot, table_path, &mut stdin.lock())
}

/// 대화형 조회 루프. 각 조회는 그 시점의 표 스냅샷으로 수행된다.
/// 입력이 끝나면(EOF) 조회 중이었더라도 종료로 본다.
pub fn run_axis_queries_with<R: BufRead>(
    cfg: &Config,
    slot: &TableSlot,
    table_path: &Path,
    input: &mut R,
) -> Result<(), AppError> {
    loop {
        match until_eof(main_menu(input))? {
            None | Some(MenuChoice::Exit) => break,
            Some(MenuChoice::AxisQuery) => {
                if until_eof(handle_axis_query(cfg, slot, input))?.is_none() {
                    break;
                }
            }
            Some(MenuChoice::ListRatings) => {
                let table = slot.snapshot();
                let labels: Vec<String> = table.fire_ratings().map(|r| r.to_string()).collect();
                println!("표에 있는 내화 등급: {}", labels.join(", "));
            }
            Some(MenuChoice::Reload) => match codec::load(table_path) {
                Ok(table) => {
                    slot.publish(table);
                    println!("조회표를 다시 읽었습니다: {}", table_path.display());
                }
                // 읽기에 실패하면 기존 표를 계속 쓴다.
                Err(e) => println!("다시 읽기 실패: {e}"),
            },
        }
    }
    Ok(())
}

fn until_eof<T>(result: Result<T, AppError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
            println!();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// 축거리 조회 메뉴를 처리한다.
pub fn handle_axis_query<R: BufRead>(
    cfg: &Config,
    slot: &TableSlot,
    input: &mut R,
) -> Result<(), AppError> {
    println!("\n-- 최소 축거리 조회 --");
    println!("참고: 내화 등급은 'REI 90' 또는 'REI90' 형식으로 입력합니다.");
    let rating = read_line(input, "내화 등급: ")?;
    let omega = read_f64(input, "기계적 철근비 ω: ")?;
    let n = read_f64(input, "하중 수준 n: ")?;
    let b = read_f64(input, "단면 폭 b [mm]: ")?;
    let engine = slot.engine(cfg.query.width_policy);
    let lookup = engine.query(rating.trim(), omega, n, b);
    print_axis_lookup(&lookup);
    Ok(())
}

/// 한 줄을 읽는다. 입력이 끝났으면 `UnexpectedEof` 입출력 오류.
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    if input.read_line(&mut buf).map_err(AppError::Io)? == 0 {
        return Err(AppError::Io(io::ErrorKind::UnexpectedEof.into()));
    }
    Ok(buf)
}

fn read_f64<R: BufRead>(input: &mut R, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(input, prompt)?;
        match s.trim().replace(',', ".").parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::build_axis_table;
    use crate::source::SourceTable;

    const TABLE: &str = "\
Standard fire resistance,Mechanical reinforcement ratio,0.15,0.3,0.5,0.7
REI 90,0.1,150/30:200/25,NULL,NULL,NULL
,0.5,150/35:200/28,NULL,NULL,NULL
";

    fn slot() -> TableSlot {
        let src = SourceTable::from_csv_reader(TABLE.as_bytes()).unwrap();
        let cfg = Config::default();
        TableSlot::new(build_axis_table(&src, &cfg.axis_source).unwrap().0)
    }

    fn run(script: &str) -> Result<(), AppError> {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("axis_lookup.json");
        run_axis_queries_with(&Config::default(), &slot(), &missing, &mut script.as_bytes())
    }

    #[test]
    fn closed_input_ends_the_loop() {
        assert!(run("").is_ok());
    }

    #[test]
    fn scripted_session_runs_to_exit() {
        assert!(run("1\nREI 90\n0.3\n0.15\n175\n2\n3\n0\n").is_ok());
    }

    #[test]
    fn input_ending_mid_query_or_after_bad_entries_stops() {
        assert!(run("1\nREI 90\n0.3\n").is_ok());
        assert!(run("9\nx\n").is_ok());
        assert!(run("1\nREI 90\nabc\n").is_ok());
    }

    #[test]
    fn read_line_reports_end_of_input() {
        let mut empty: &[u8] = b"";
        assert!(matches!(
            read_line(&mut empty, ""),
            Err(AppError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof
        ));
        let mut numbers: &[u8] = b"abc\n0,25\n";
        assert_eq!(read_f64(&mut numbers, "").unwrap(), 0.25);
    }
}
