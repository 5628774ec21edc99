//! 철근콘크리트 내화 설계 조회표 계산 로직을 라이브러리로 분리하여 CLI 외의 호출자도 같은 엔진을 쓰게 한다.

pub mod app;
pub mod axis;
pub mod category;
pub mod config;
pub mod cover;
pub mod fire_rating;
pub mod persistence;
pub mod source;
pub mod ui_cli;
