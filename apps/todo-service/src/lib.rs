//! # Todo Service ライブラリ
//!
//! Todo Service のユースケースとハンドラを公開する。
//! バイナリ（`main.rs`）と統合テストの両方がこのライブラリを使う。

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
