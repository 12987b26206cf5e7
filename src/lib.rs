//! 礼拝時刻ボードライブラリ
//!
//! 年ごとの時刻表からイカーマ時刻を求め、現在の礼拝・次の礼拝・
//! カウントダウンを1秒ごとに表示するためのコア機能を提供する。

pub mod board;
pub mod cli;
pub mod config;
pub mod display;
pub mod iqamah;
pub mod schedule;
pub mod types;
